use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(UserId)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    /// `None` means lifetime access.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub access_expires_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_analysis_started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickLogRecord {
    pub id: i64,
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    pub button_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub clicked_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ClickLogResponse {
    pub logs: Vec<ClickLogRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub labels: Vec<String>,
    pub telegram: Vec<u64>,
    pub compra: Vec<u64>,
    pub total: Vec<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Access-expiration policy sent when creating a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Serialized as an explicit `null`.
    Lifetime,
    At(DateTime<Utc>),
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expiration::Lifetime => serializer.serialize_none(),
            Expiration::At(at) => serializer.serialize_i64(at.timestamp_millis()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
    /// Omitted from the body when unspecified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_expires_at: Option<Expiration>,
}

/// Partial update body. Absent keys mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub access_expires_at: Option<DateTime<Utc>>,
}

impl UserPatch {
    pub fn renew(until: DateTime<Utc>) -> Self {
        Self {
            access_expires_at: Some(until),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodKey {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKey {
    pub const ALL: [PeriodKey; 3] = [PeriodKey::Daily, PeriodKey::Weekly, PeriodKey::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodKey::Daily => "daily",
            PeriodKey::Weekly => "weekly",
            PeriodKey::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        PeriodKey::ALL
            .into_iter()
            .find(|period| period.as_str() == key)
            .ok_or_else(|| format!("unknown period '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lifetime_is_explicit_null_and_unspecified_is_omitted() {
        let mut user = NewUser {
            email: "a@b.c".into(),
            username: "ana".into(),
            password: "pw".into(),
            is_admin: false,
            access_expires_at: Some(Expiration::Lifetime),
        };
        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(body["access_expires_at"], serde_json::Value::Null);
        assert!(body.as_object().unwrap().contains_key("access_expires_at"));

        user.access_expires_at = None;
        let body = serde_json::to_value(&user).unwrap();
        assert!(!body.as_object().unwrap().contains_key("access_expires_at"));
    }

    #[test]
    fn renew_patch_carries_only_expiration_millis() {
        let until = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let body = serde_json::to_value(UserPatch::renew(until)).unwrap();
        assert_eq!(body, json!({ "access_expires_at": 1_700_000_000_000i64 }));
    }

    #[test]
    fn user_record_reads_null_and_missing_timestamps() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": 7,
            "email": "x@y.z",
            "username": "xy",
            "is_admin": true,
            "access_expires_at": null
        }))
        .unwrap();
        assert_eq!(user.id, UserId(7));
        assert!(user.access_expires_at.is_none());
        assert!(user.last_analysis_started_at.is_none());
    }

    #[test]
    fn period_parses_case_insensitively() {
        assert_eq!(" Weekly ".parse::<PeriodKey>(), Ok(PeriodKey::Weekly));
        assert!("hourly".parse::<PeriodKey>().is_err());
        assert_eq!(PeriodKey::default(), PeriodKey::Daily);
    }
}
