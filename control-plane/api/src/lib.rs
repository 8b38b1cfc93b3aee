#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! The HTTP/JSON layer exposing the resource store to operators.
//!
//! Routes follow `/meshes/{mesh}/{type-path}[/{name}]`; request and response
//! bodies merge the type-specific spec payload with the common
//! `{type, name, mesh}` envelope.

mod envelope;

#[cfg(test)]
mod tests;

use self::envelope::Document;
use futures::future;
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use mesh_control_plane_core::{Registry, Resource, ResourceTypeDescriptor};
use mesh_control_plane_store::{Page, SharedStore, StoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

pub const PRODUCT: &str = "Mesh Control Plane";

type Body = http_body_util::Full<bytes::Bytes>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The operator-facing resource API, served as a `tower::Service`.
#[derive(Clone)]
pub struct Api {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    store: SharedStore,
    read_only: bool,
    index: IndexInfo,
}

/// Identity reported by the API index endpoint.
#[derive(Clone, Debug)]
pub struct IndexInfo {
    pub hostname: String,
    pub instance_id: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[source] BoxError),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexResponse<'a> {
    hostname: &'a str,
    tagline: &'static str,
    version: &'static str,
    instance_id: &'a str,
}

#[derive(Serialize)]
struct ListResponse {
    items: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

// === impl Api ===

impl<B> tower::Service<Request<B>> for Api
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        trace!(method = %req.method(), path = %req.uri().path());
        let api = self.clone();
        Box::pin(async move { api.handle(req).await })
    }
}

impl Api {
    pub fn new(registry: Registry, store: SharedStore, read_only: bool, index: IndexInfo) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                store,
                read_only,
                index,
            }),
        }
    }

    async fn handle<B>(self, req: Request<B>) -> Result<Response<Body>, Error>
    where
        B: hyper::body::Body + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();
        let segments = path.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();

        match (&parts.method, segments.as_slice()) {
            (&Method::GET, []) => self.get_index(),
            (&Method::GET, ["meshes", mesh, type_path]) => {
                self.list_resources(mesh, type_path, parts.uri.query()).await
            }
            (&Method::GET, ["meshes", mesh, type_path, name]) => {
                self.find_resource(mesh, type_path, name).await
            }
            (&Method::PUT, ["meshes", mesh, type_path, name]) => {
                if self.inner.read_only {
                    return Ok(empty_response(StatusCode::METHOD_NOT_ALLOWED));
                }
                let bytes = body
                    .collect()
                    .await
                    .map_err(|e| Error::Request(e.into()))?
                    .to_bytes();
                self.create_or_update_resource(mesh, type_path, name, &bytes)
                    .await
            }
            (&Method::DELETE, ["meshes", mesh, type_path, name]) => {
                if self.inner.read_only {
                    return Ok(empty_response(StatusCode::METHOD_NOT_ALLOWED));
                }
                self.delete_resource(mesh, type_path, name).await
            }
            _ => Ok(empty_response(StatusCode::NOT_FOUND)),
        }
    }

    fn get_index(&self) -> Result<Response<Body>, Error> {
        let index = &self.inner.index;
        json_response(
            StatusCode::OK,
            &IndexResponse {
                hostname: &index.hostname,
                tagline: PRODUCT,
                version: env!("CARGO_PKG_VERSION"),
                instance_id: &index.instance_id,
            },
        )
    }

    async fn find_resource(
        &self,
        mesh: &str,
        type_path: &str,
        name: &str,
    ) -> Result<Response<Body>, Error> {
        let Some(descriptor) = self.inner.registry.get_by_path(type_path) else {
            return Ok(empty_response(StatusCode::NOT_FOUND));
        };
        match self.inner.store.get(descriptor.name, mesh, name).await {
            Ok(resource) => json_response(StatusCode::OK, &Document::encode(&resource)?),
            Err(error) => store_error_response(&error, "could not retrieve a resource"),
        }
    }

    async fn list_resources(
        &self,
        mesh: &str,
        type_path: &str,
        query: Option<&str>,
    ) -> Result<Response<Body>, Error> {
        let Some(descriptor) = self.inner.registry.get_by_path(type_path) else {
            return Ok(empty_response(StatusCode::NOT_FOUND));
        };
        let page = match page_from_query(query) {
            Ok(page) => page,
            Err(msg) => return bad_request(&msg),
        };
        match self.inner.store.list(descriptor.name, mesh, &page).await {
            Ok(list) => {
                let items = list
                    .items
                    .iter()
                    .map(Document::encode)
                    .collect::<Result<Vec<_>, _>>()?;
                json_response(
                    StatusCode::OK,
                    &ListResponse {
                        items,
                        next: list.next,
                    },
                )
            }
            Err(error) => store_error_response(&error, "could not list resources"),
        }
    }

    async fn create_or_update_resource(
        &self,
        mesh: &str,
        type_path: &str,
        name: &str,
        body: &[u8],
    ) -> Result<Response<Body>, Error> {
        let Some(descriptor) = self.inner.registry.get_by_path(type_path) else {
            return Ok(empty_response(StatusCode::NOT_FOUND));
        };
        let doc = match Document::decode(descriptor, body) {
            Ok(doc) => doc,
            Err(error) => {
                debug!(%error, "could not process the request body");
                return bad_request(&error.to_string());
            }
        };
        if let Err(msg) = validate_envelope(descriptor, mesh, name, &doc) {
            return bad_request(&msg);
        }

        match self.inner.store.get(descriptor.name, mesh, name).await {
            Ok(mut resource) => {
                if let Err(error) = resource.set_spec(doc.spec) {
                    return bad_request(&error.to_string());
                }
                match self.inner.store.update(&mut resource).await {
                    Ok(()) => Ok(empty_response(StatusCode::OK)),
                    Err(error) => store_error_response(&error, "could not update a resource"),
                }
            }
            Err(error) if error.is_not_found() => {
                let mut resource = Resource::new(mesh, name, doc.spec);
                match self.inner.store.create(&mut resource).await {
                    Ok(()) => Ok(empty_response(StatusCode::CREATED)),
                    Err(error) => store_error_response(&error, "could not create a resource"),
                }
            }
            Err(error) => store_error_response(&error, "could not retrieve a resource"),
        }
    }

    async fn delete_resource(
        &self,
        mesh: &str,
        type_path: &str,
        name: &str,
    ) -> Result<Response<Body>, Error> {
        let Some(descriptor) = self.inner.registry.get_by_path(type_path) else {
            return Ok(empty_response(StatusCode::NOT_FOUND));
        };
        match self.inner.store.delete(descriptor.name, mesh, name).await {
            Ok(()) => Ok(empty_response(StatusCode::OK)),
            Err(error) => store_error_response(&error, "could not delete a resource"),
        }
    }
}

/// The URL is authoritative: envelope fields in the body must agree with it.
fn validate_envelope(
    descriptor: &ResourceTypeDescriptor,
    mesh: &str,
    name: &str,
    doc: &Document,
) -> Result<(), String> {
    if doc.name != name {
        return Err("name from the URL has to be the same as in body".to_string());
    }
    if descriptor.name != *doc.kind {
        return Err("type from the URL has to be the same as in body".to_string());
    }
    if doc.mesh != mesh {
        return Err("mesh from the URL has to be the same as in body".to_string());
    }
    Ok(())
}

fn page_from_query(query: Option<&str>) -> Result<Page, String> {
    let mut page = Page::default();
    for pair in query.unwrap_or("").split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "size" => {
                let size: usize = value
                    .parse()
                    .map_err(|_| format!("invalid page size {value:?}"))?;
                if size == 0 {
                    return Err(format!("invalid page size {value:?}"));
                }
                page.size = Some(size);
            }
            "offset" => page.token = Some(value.to_string()),
            _ => {}
        }
    }
    Ok(page)
}

fn store_error_response(error: &StoreError, msg: &str) -> Result<Response<Body>, Error> {
    let status = match error {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::AlreadyExists { .. } | StoreError::Conflict { .. } => StatusCode::CONFLICT,
        StoreError::InvalidPageToken(_) => StatusCode::BAD_REQUEST,
        StoreError::Backend(_) | StoreError::Canceled => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(%error, "{}", msg);
        json_response(status, &ErrorBody { error: msg })
    } else {
        json_response(
            status,
            &ErrorBody {
                error: &error.to_string(),
            },
        )
    }
}

fn bad_request(msg: &str) -> Result<Response<Body>, Error> {
    json_response(StatusCode::BAD_REQUEST, &ErrorBody { error: msg })
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes::Bytes::from(bytes)))
        .expect("response must be valid"))
}

fn empty_response(status: StatusCode) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(Body::default())
        .expect("response must be valid")
}
