//! The wire form of a resource: common `{type, name, mesh}` envelope fields
//! merged with the type-specific spec payload in one JSON document.
//!
//! Encoding and decoding treat the document as a generic key-value map and
//! merge the two halves deterministically, with envelope fields winning on
//! key collision, so no single library's transcoding behavior is relied on.

use mesh_control_plane_core::{spec::SpecError, Resource, ResourceTypeDescriptor, Spec};
use serde_json::{Map, Value};
use thiserror::Error;

const TYPE_FIELD: &str = "type";
const NAME_FIELD: &str = "name";
const MESH_FIELD: &str = "mesh";

/// A decoded request body: envelope fields plus the typed spec payload.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Document {
    pub kind: String,
    pub name: String,
    pub mesh: String,
    pub spec: Spec,
}

#[derive(Debug, Error)]
pub(crate) enum DocumentError {
    #[error("request body is not a JSON object: {0}")]
    NotAnObject(#[source] serde_json::Error),

    #[error("envelope field {0:?} must be a string")]
    NotAString(&'static str),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

// === impl Document ===

impl Document {
    pub(crate) fn decode(
        descriptor: &ResourceTypeDescriptor,
        body: &[u8],
    ) -> Result<Self, DocumentError> {
        let mut doc: Map<String, Value> =
            serde_json::from_slice(body).map_err(DocumentError::NotAnObject)?;
        let kind = take_string(&mut doc, TYPE_FIELD)?;
        let name = take_string(&mut doc, NAME_FIELD)?;
        let mesh = take_string(&mut doc, MESH_FIELD)?;
        let spec = Spec::from_json(descriptor.name, Value::Object(doc))?;
        Ok(Self {
            kind,
            name,
            mesh,
            spec,
        })
    }

    pub(crate) fn encode(resource: &Resource) -> Result<Value, serde_json::Error> {
        let mut doc = match resource.spec().to_json()? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("spec".to_string(), other);
                map
            }
        };
        doc.insert(
            TYPE_FIELD.to_string(),
            Value::String(resource.kind().as_str().to_string()),
        );
        doc.insert(
            NAME_FIELD.to_string(),
            Value::String(resource.meta().name.clone()),
        );
        doc.insert(
            MESH_FIELD.to_string(),
            Value::String(resource.meta().mesh.clone()),
        );
        Ok(Value::Object(doc))
    }
}

/// Removes an envelope field from the document; an absent field decodes as
/// empty and is caught by envelope validation.
fn take_string(doc: &mut Map<String, Value>, field: &'static str) -> Result<String, DocumentError> {
    match doc.remove(field) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(DocumentError::NotAString(field)),
    }
}
