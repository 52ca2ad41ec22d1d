use serde_json::json;

use super::{ENDPOINT, FILTER};
use crate::jsonapi::Resource;
use crate::models::Endpoint;

/// `filter_id` is looked up fresh for every response; `filter_count` derives from it.
pub fn resource(endpoint: &Endpoint, filter_id: Option<i64>) -> Resource {
    Resource::new(
        ENDPOINT,
        endpoint.id,
        json!({
            "name": endpoint.name,
            "url": endpoint.url,
            "active": endpoint.active,
            "filter_count": usize::from(filter_id.is_some()),
        }),
    )
    .to_one("filter", FILTER, filter_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn endpoint() -> Endpoint {
        let now = Utc::now();
        Endpoint {
            id: 7,
            account_id: 1,
            name: "my endpoint".to_string(),
            url: "http://dev.null".to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn filter_count_follows_filter() {
        let with = resource(&endpoint(), Some(4));
        assert_eq!(with.attributes["filter_count"], 1);
        assert_eq!(with.relationships["filter"], json!({ "data": { "id": "4", "type": "filter" } }));

        let without = resource(&endpoint(), None);
        assert_eq!(without.attributes["filter_count"], 0);
        assert_eq!(without.attributes["url"], "http://dev.null");
    }
}
