use serde_json::json;

use super::LEVEL;
use crate::jsonapi::Resource;
use crate::models::Level;

pub fn resource(level: &Level) -> Resource {
    Resource::new(LEVEL, level.id, json!({ "title": level.title }))
}
