/// Replaces characters that would split a metric name (`:` and `.`) so a
/// listener name can prefix a metric namespace.
pub fn sanitize_metric(name: &str) -> String {
    name.replace([':', '.'], "_")
}
