use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationErrors;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Endpoint {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const MAX_NAME_LEN: usize = 255;
const MAX_URL_LEN: usize = 2048;

/// Endpoint attributes for create and update. Absent fields are left untouched on update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub active: Option<bool>,
}

impl EndpointChanges {
    /// On create both `name` and `url` are required.
    pub fn validate(&self, creating: bool) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self.name.as_deref().map(str::trim) {
            None if creating => errors.add("name", "can't be blank"),
            Some("") => errors.add("name", "can't be blank"),
            Some(name) if name.chars().count() > MAX_NAME_LEN => {
                errors.add("name", "is too long (maximum is 255 characters)")
            }
            _ => {}
        }

        match self.url.as_deref().map(str::trim) {
            None if creating => errors.add("url", "can't be blank"),
            Some("") => errors.add("url", "can't be blank"),
            Some(url) if url.len() > MAX_URL_LEN => {
                errors.add("url", "is too long (maximum is 2048 characters)")
            }
            Some(url) if !is_http_url(url) => errors.add("url", "must be an http or https URL"),
            _ => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(name: Option<&str>, url: Option<&str>) -> EndpointChanges {
        EndpointChanges {
            name: name.map(str::to_string),
            url: url.map(str::to_string),
            active: None,
        }
    }

    #[test]
    fn create_requires_name_and_url() {
        let errors = changes(None, None).validate(true).unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("url").is_some());
    }

    #[test]
    fn update_accepts_partial_changes() {
        assert!(changes(None, None).validate(false).is_ok());
        assert!(changes(Some("renamed"), None).validate(false).is_ok());
    }

    #[test]
    fn url_must_be_http() {
        assert!(changes(Some("hook"), Some("http://dev.null")).validate(true).is_ok());
        assert!(changes(Some("hook"), Some("https://example.com/hook?x=1")).validate(true).is_ok());
        assert!(changes(Some("hook"), Some("ftp://example.com")).validate(true).is_err());
        assert!(changes(Some("hook"), Some("http://")).validate(true).is_err());
        assert!(changes(Some("hook"), Some("not a url")).validate(true).is_err());
    }
}
