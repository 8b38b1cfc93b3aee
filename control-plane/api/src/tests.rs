use crate::{Api, IndexInfo};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use mesh_control_plane_core::{
    spec::AccessPermissionSpec, Registry, Resource, Selector, Spec, Version, ACCESS_PERMISSION,
};
use mesh_control_plane_store::{MemoryStore, ResourceStore, SharedStore};
use std::sync::Arc;
use tower::Service;

fn api(read_only: bool) -> (Api, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let api = Api::new(
        Registry::default(),
        store.clone() as SharedStore,
        read_only,
        IndexInfo {
            hostname: "cp-0".to_string(),
            instance_id: "cp-0-instance".to_string(),
        },
    );
    (api, store)
}

async fn call(api: &Api, method: Method, uri: &str, body: serde_json::Value) -> Response<Full<Bytes>> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();
    api.clone().call(req).await.unwrap()
}

async fn body_json(rsp: Response<Full<Bytes>>) -> serde_json::Value {
    let bytes = rsp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn permission_body(mesh: &str, name: &str, service: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "AccessPermission",
        "name": name,
        "mesh": mesh,
        "sources": [{"match": {"service": service}}],
        "destinations": [{"match": {"service": "*"}}],
    })
}

#[tokio::test]
async fn put_creates_then_get_round_trips() {
    let (api, store) = api(false);
    let rsp = call(
        &api,
        Method::PUT,
        "/meshes/default/access-permissions/allow-web",
        permission_body("default", "allow-web", "web"),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::CREATED);

    let stored = store
        .get(ACCESS_PERMISSION.name, "default", "allow-web")
        .await
        .unwrap();
    assert_eq!(stored.meta().version, Version::INITIAL);

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/default/access-permissions/allow-web",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::OK);
    assert_eq!(
        body_json(rsp).await,
        permission_body("default", "allow-web", "web")
    );
}

#[tokio::test]
async fn put_updates_an_existing_resource() {
    let (api, store) = api(false);
    for service in ["web", "backend"] {
        call(
            &api,
            Method::PUT,
            "/meshes/default/access-permissions/allow-web",
            permission_body("default", "allow-web", service),
        )
        .await;
    }
    let rsp = call(
        &api,
        Method::PUT,
        "/meshes/default/access-permissions/allow-web",
        permission_body("default", "allow-web", "api"),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::OK);

    let stored = store
        .get(ACCESS_PERMISSION.name, "default", "allow-web")
        .await
        .unwrap();
    assert_eq!(stored.meta().version, Version::INITIAL.next().next());
    let Spec::AccessPermission(spec) = stored.spec() else {
        panic!("wrong spec kind");
    };
    assert_eq!(spec.sources, vec![Selector::service("api")]);
}

#[tokio::test]
async fn envelope_must_agree_with_the_url() {
    let (api, _) = api(false);
    for (uri, body) in [
        (
            // name mismatch
            "/meshes/default/access-permissions/other",
            permission_body("default", "allow-web", "web"),
        ),
        (
            // mesh mismatch
            "/meshes/other/access-permissions/allow-web",
            permission_body("default", "allow-web", "web"),
        ),
        (
            // type mismatch
            "/meshes/default/traffic-routes/allow-web",
            permission_body("default", "allow-web", "web"),
        ),
    ] {
        let rsp = call(&api, Method::PUT, uri, body).await;
        assert_eq!(rsp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn malformed_spec_is_a_bad_request() {
    let (api, _) = api(false);
    let rsp = call(
        &api,
        Method::PUT,
        "/meshes/default/access-permissions/allow-web",
        serde_json::json!({
            "type": "AccessPermission",
            "name": "allow-web",
            "mesh": "default",
            "sources": "not-a-list",
        }),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let (api, _) = api(false);
    let rsp = call(
        &api,
        Method::GET,
        "/meshes/default/access-permissions/absent",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::NOT_FOUND);

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/default/no-such-type/absent",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_the_resource() {
    let (api, _) = api(false);
    call(
        &api,
        Method::PUT,
        "/meshes/default/access-permissions/allow-web",
        permission_body("default", "allow-web", "web"),
    )
    .await;

    let uri = "/meshes/default/access-permissions/allow-web";
    let rsp = call(&api, Method::DELETE, uri, serde_json::json!({})).await;
    assert_eq!(rsp.status(), StatusCode::OK);
    let rsp = call(&api, Method::DELETE, uri, serde_json::json!({})).await;
    assert_eq!(rsp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_scoped_to_the_mesh_and_paginates() {
    let (api, store) = api(false);
    for (mesh, name) in [("a", "p-1"), ("a", "p-2"), ("a", "p-3"), ("b", "p-9")] {
        let mut resource = Resource::new(
            mesh,
            name,
            Spec::AccessPermission(AccessPermissionSpec::default()),
        );
        store.create(&mut resource).await.unwrap();
    }

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/a/access-permissions",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::OK);
    let body = body_json(rsp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert!(body.get("next").is_none());

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/a/access-permissions?size=2",
        serde_json::json!({}),
    )
    .await;
    let body = body_json(rsp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["next"], "p-3");

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/a/access-permissions?size=2&offset=p-3",
        serde_json::json!({}),
    )
    .await;
    let body = body_json(rsp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["name"], "p-3");

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/a/access-permissions?size=oops",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::BAD_REQUEST);

    // A zero page size would stall a client walking via `next`.
    let rsp = call(
        &api,
        Method::GET,
        "/meshes/a/access-permissions?size=0",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn read_only_mode_rejects_writes() {
    let (api, _) = api(true);
    let rsp = call(
        &api,
        Method::PUT,
        "/meshes/default/access-permissions/allow-web",
        permission_body("default", "allow-web", "web"),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let rsp = call(
        &api,
        Method::DELETE,
        "/meshes/default/access-permissions/allow-web",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let rsp = call(
        &api,
        Method::GET,
        "/meshes/default/access-permissions",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(rsp.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_reports_the_instance() {
    let (api, _) = api(false);
    let rsp = call(&api, Method::GET, "/", serde_json::json!({})).await;
    assert_eq!(rsp.status(), StatusCode::OK);
    let body = body_json(rsp).await;
    assert_eq!(body["hostname"], "cp-0");
    assert_eq!(body["instanceId"], "cp-0-instance");
    assert_eq!(body["tagline"], crate::PRODUCT);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
