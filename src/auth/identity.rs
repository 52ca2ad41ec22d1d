use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer};

pub const IDENTITY_HEADER: &str = "x-rh-identity";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("X-RH-IDENTITY header should be provided")]
    Missing,
    #[error("X-RH-IDENTITY header is empty")]
    Empty,
    #[error("X-RH-IDENTITY header is not valid ASCII")]
    Encoding,
    #[error("X-RH-IDENTITY header is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("X-RH-IDENTITY header is not a valid identity document: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdentityError {
    /// Reason reported to the client. Decode details stay in the logs.
    pub fn reason(&self) -> &'static str {
        match self {
            IdentityError::Missing => "X-RH-IDENTITY header should be provided",
            _ => "Error parsing the X-RH-IDENTITY header",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    identity: Identity,
}

/// Claims asserted by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "string_or_number")]
    pub account_number: String,
    #[serde(rename = "type", default)]
    pub identity_type: Option<String>,
    #[serde(default)]
    pub user: Option<IdentityUser>,
    #[serde(default)]
    pub internal: Option<IdentityInternal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityInternal {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub org_id: Option<String>,
}

impl Identity {
    pub fn org_id(&self) -> Option<&str> {
        self.internal.as_ref().and_then(|i| i.org_id.as_deref())
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }
}

/// Decode the identity header from a request's headers.
pub fn from_headers(headers: &HeaderMap) -> Result<Identity, IdentityError> {
    let value = headers.get(IDENTITY_HEADER).ok_or(IdentityError::Missing)?;
    let value = value.to_str().map_err(|_| IdentityError::Encoding)?;
    decode(value)
}

/// Decode a raw header value: base64, then JSON with an `identity` root.
pub fn decode(value: &str) -> Result<Identity, IdentityError> {
    // MIME encoders wrap at 60 columns
    let compact: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(IdentityError::Empty);
    }
    let bytes = STANDARD.decode(compact.as_bytes())?;
    let envelope: Envelope = serde_json::from_slice(&bytes)?;
    Ok(envelope.identity)
}

/// Encode an identity document the way the identity provider does.
pub fn encode(document: &serde_json::Value) -> String {
    STANDARD.encode(document.to_string())
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "identity": {
                "account_number": "1234",
                "type": "User",
                "user": {
                    "email": "a@b.com",
                    "username": "a@b.com",
                    "first_name": "a",
                    "last_name": "b",
                    "is_active": true,
                    "locale": "en_US"
                },
                "internal": { "org_id": "29329" }
            }
        })
    }

    #[test]
    fn decodes_a_full_identity() {
        let identity = decode(&encode(&document())).unwrap();
        assert_eq!(identity.account_number, "1234");
        assert_eq!(identity.identity_type.as_deref(), Some("User"));
        assert_eq!(identity.username(), Some("a@b.com"));
        assert_eq!(identity.org_id(), Some("29329"));
    }

    #[test]
    fn tolerates_wrapped_base64() {
        let encoded = encode(&document());
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        let identity = decode(&format!("{wrapped}\n")).unwrap();
        assert_eq!(identity.account_number, "1234");
    }

    #[test]
    fn numeric_account_number_and_org_id() {
        let doc = json!({ "identity": { "account_number": 42, "internal": { "org_id": 7 } } });
        let identity = decode(&encode(&doc)).unwrap();
        assert_eq!(identity.account_number, "42");
        assert_eq!(identity.org_id(), Some("7"));
        assert!(identity.user.is_none());
    }

    #[test]
    fn rejects_non_base64() {
        let err = decode("not base64 !!!").unwrap_err();
        assert!(matches!(err, IdentityError::Base64(_)));
        assert_eq!(err.reason(), "Error parsing the X-RH-IDENTITY header");
    }

    #[test]
    fn rejects_non_json() {
        let err = decode(&STANDARD.encode("definitely not json")).unwrap_err();
        assert!(matches!(err, IdentityError::Json(_)));
    }

    #[test]
    fn rejects_missing_identity_root() {
        let err = decode(&encode(&json!({ "account_number": "1" }))).unwrap_err();
        assert!(matches!(err, IdentityError::Json(_)));
    }

    #[test]
    fn blank_header_is_a_parse_error() {
        let err = decode("  ").unwrap_err();
        assert!(matches!(err, IdentityError::Empty));
        assert_eq!(err.reason(), "Error parsing the X-RH-IDENTITY header");
    }

    #[test]
    fn missing_header_is_distinct() {
        let err = from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, IdentityError::Missing));
        assert_eq!(err.reason(), "X-RH-IDENTITY header should be provided");
    }
}
