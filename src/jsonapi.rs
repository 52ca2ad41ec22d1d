//! JSON:API document assembly.
//!
//! Resources are built by the serializers, then wrapped in a [`Document`]
//! that handles the `data`/`included`/`meta` envelope.

use std::collections::HashSet;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResourceIdentifier {
    pub fn new(kind: &'static str, id: i64) -> Self {
        Self { id: id.to_string(), kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub attributes: Value,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
}

impl Resource {
    pub fn new(kind: &'static str, id: i64, attributes: Value) -> Self {
        Self {
            kind,
            id: id.to_string(),
            attributes,
            relationships: Map::new(),
        }
    }

    pub fn to_many(mut self, name: &str, kind: &'static str, ids: impl IntoIterator<Item = i64>) -> Self {
        let data: Vec<ResourceIdentifier> = ids
            .into_iter()
            .map(|id| ResourceIdentifier::new(kind, id))
            .collect();
        self.relationships.insert(name.to_string(), json!({ "data": data }));
        self
    }

    pub fn to_one(mut self, name: &str, kind: &'static str, id: Option<i64>) -> Self {
        let data = id.map(|id| ResourceIdentifier::new(kind, id));
        self.relationships.insert(name.to_string(), json!({ "data": data }));
        self
    }

    fn key(&self) -> (&'static str, String) {
        (self.kind, self.id.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum PrimaryData {
    One(Resource),
    Many(Vec<Resource>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    included: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
    #[serde(skip)]
    seen: HashSet<(&'static str, String)>,
}

impl Document {
    pub fn single(resource: Resource) -> Self {
        let mut seen = HashSet::new();
        seen.insert(resource.key());
        Self::build(PrimaryData::One(resource), seen)
    }

    pub fn collection(resources: Vec<Resource>) -> Self {
        let seen = resources.iter().map(Resource::key).collect();
        Self::build(PrimaryData::Many(resources), seen)
    }

    fn build(data: PrimaryData, seen: HashSet<(&'static str, String)>) -> Self {
        Self {
            data,
            included: Vec::new(),
            meta: None,
            seen,
        }
    }

    /// Sideload related resources. Duplicates by `(type, id)`, including
    /// anything already present as primary data, are dropped.
    pub fn include(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        for resource in resources {
            if self.seen.insert(resource.key()) {
                self.included.push(resource);
            }
        }
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
