use serde_json::json;

use super::{APP, EVENT_TYPE};
use crate::jsonapi::Resource;
use crate::models::{App, EventType};

/// `event_types` may hold event types of other apps; only this app's are linked.
pub fn resource(app: &App, event_types: &[EventType]) -> Resource {
    Resource::new(APP, app.id, json!({ "name": app.name })).to_many(
        "event_types",
        EVENT_TYPE,
        event_types
            .iter()
            .filter(|et| et.app_id == app.id)
            .map(|et| et.id),
    )
}
