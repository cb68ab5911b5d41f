use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uniform JSON envelope returned by every user endpoint.
///
/// Exactly one of `data`, `message` or `error` is set: `data` for successful
/// reads and writes, `message` for deletions, `error` when `success` is false.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(with = "millis")]
    pub timestamp: DateTime<Utc>,
}

/// RFC 3339 timestamps with exactly three fractional digits and a `Z` suffix.
mod millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: i32,
        pub name: String,
        pub class: String,
        pub nationality: String,
    }

    /// Body accepted by the create and modify endpoints.
    ///
    /// Every field is optional on the wire so that a missing `name` can be
    /// reported with a proper error envelope instead of a rejection.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserPayload {
        pub name: Option<String>,
        pub class: Option<String>,
        pub nationality: Option<String>,
    }

    /// Query string of the search endpoint (`?field=name&value=Ana`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserSearch {
        pub field: String,
        pub value: String,
    }
}
