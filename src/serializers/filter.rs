use serde_json::json;

use super::{APP, ENDPOINT, EVENT_TYPE, FILTER, LEVEL};
use crate::jsonapi::Resource;
use crate::models::FilterWithAssociations;

pub fn resource(filter: &FilterWithAssociations) -> Resource {
    Resource::new(FILTER, filter.filter.id, json!({ "enabled": filter.filter.enabled }))
        .to_many("apps", APP, filter.app_ids.iter().copied())
        .to_many("event_types", EVENT_TYPE, filter.event_type_ids.iter().copied())
        .to_many("levels", LEVEL, filter.level_ids.iter().copied())
        .to_one("endpoint", ENDPOINT, filter.filter.endpoint_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Filter;
    use chrono::Utc;

    #[test]
    fn relationships_carry_ids_and_types() {
        let now = Utc::now();
        let filter = FilterWithAssociations {
            filter: Filter {
                id: 1,
                account_id: 9,
                endpoint_id: Some(2),
                enabled: true,
                created_at: now,
                updated_at: now,
            },
            app_ids: vec![1],
            event_type_ids: vec![1, 2],
            level_ids: vec![],
        };
        let r = resource(&filter);
        assert_eq!(r.kind, "filter");
        assert_eq!(r.id, "1");
        assert_eq!(r.attributes, json!({ "enabled": true }));
        assert_eq!(r.relationships["apps"], json!({ "data": [{ "id": "1", "type": "app" }] }));
        assert_eq!(r.relationships["event_types"]["data"].as_array().unwrap().len(), 2);
        assert_eq!(r.relationships["levels"], json!({ "data": [] }));
        assert_eq!(r.relationships["endpoint"]["data"]["id"], "2");
    }
}
