#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod resolver;
mod tag_match;

pub use self::{resolver::PolicyResolver, tag_match::selector_matches};
