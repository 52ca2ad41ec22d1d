use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::identity::Identity;
use crate::error::ValidationErrors;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const MAX_FIELD_LEN: usize = 255;

/// Attributes of a user that does not exist yet, built from identity claims.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewUser {
    pub fn from_identity(identity: &Identity) -> Self {
        let user = identity.user.as_ref();
        NewUser {
            username: user
                .and_then(|u| u.username.as_deref())
                .unwrap_or_default()
                .trim()
                .to_string(),
            email: user.and_then(|u| u.email.clone()),
            first_name: user.and_then(|u| u.first_name.clone()),
            last_name: user.and_then(|u| u.last_name.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.is_empty() {
            errors.add("username", "can't be blank");
        } else if self.username.chars().count() > MAX_FIELD_LEN {
            errors.add("username", "is too long (maximum is 255 characters)");
        }
        for (field, value) in [
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.as_deref().is_some_and(|v| v.chars().count() > MAX_FIELD_LEN) {
                errors.add(field, "is too long (maximum is 255 characters)");
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{Identity, IdentityUser};

    fn identity(username: Option<&str>) -> Identity {
        Identity {
            account_number: "1234".to_string(),
            identity_type: Some("User".to_string()),
            user: Some(IdentityUser {
                username: username.map(str::to_string),
                email: Some("a@b.com".to_string()),
                first_name: None,
                last_name: None,
            }),
            internal: None,
        }
    }

    #[test]
    fn builds_from_identity() {
        let new_user = NewUser::from_identity(&identity(Some("a@b.com")));
        assert_eq!(new_user.username, "a@b.com");
        assert_eq!(new_user.email.as_deref(), Some("a@b.com"));
        assert!(new_user.validate().is_ok());
    }

    #[test]
    fn blank_username_is_invalid() {
        let errors = NewUser::from_identity(&identity(Some("  ")))
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("username").unwrap(), ["can't be blank"]);
    }

    #[test]
    fn missing_user_block_is_invalid() {
        let mut id = identity(None);
        id.user = None;
        assert!(NewUser::from_identity(&id).validate().is_err());
    }

    #[test]
    fn long_username_is_invalid() {
        let long = "x".repeat(256);
        let errors = NewUser::from_identity(&identity(Some(&long)))
            .validate()
            .unwrap_err();
        assert!(errors.get("username").is_some());
    }
}
