use serde_json::json;

use super::{APP, EVENT_TYPE, LEVEL};
use crate::jsonapi::Resource;
use crate::models::{EventType, Level};

pub fn resource(event_type: &EventType) -> Resource {
    Resource::new(EVENT_TYPE, event_type.id, json!({ "name": event_type.name }))
        .to_one("app", APP, Some(event_type.app_id))
}

pub fn with_levels(event_type: &EventType, levels: &[Level]) -> Resource {
    resource(event_type).to_many("levels", LEVEL, levels.iter().map(|l| l.id))
}
