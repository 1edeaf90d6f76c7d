#![allow(clippy::result_large_err)]

use chrono::{DateTime, SecondsFormat, Utc};
use hapnet_core::model::{PayloadDraft, SnapshotPayload};
use serde::Serialize;
use std::fmt;

/// Identifying fields of a stored version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub tag: String,
}

/// What `create` hands back to the caller
pub type VersionIdentity = VersionInfo;

/// A stored version with its decoded payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Version {
    id: i64,
    tag: String,
    created_at: DateTime<Utc>,
    comment: String,
    payload: SnapshotPayload,
}

impl Version {
    pub(crate) fn new(info: VersionInfo, comment: String, payload: SnapshotPayload) -> Self {
        Self {
            id: info.id,
            tag: info.tag,
            created_at: info.created_at,
            comment,
            payload,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn payload(&self) -> &SnapshotPayload {
        &self.payload
    }

    pub fn into_payload(self) -> SnapshotPayload {
        self.payload
    }

    pub fn info(&self) -> VersionInfo {
        VersionInfo {
            id: self.id,
            created_at: self.created_at,
            tag: self.tag.clone(),
        }
    }
}

/// Which version a lookup selects
///
/// `Latest` is the version with the greatest `created_at`. A timestamp
/// matches exactly, at microsecond precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionMatcher {
    Latest,
    Id(i64),
    Tag(String),
    CreatedAt(DateTime<Utc>),
}

impl fmt::Display for VersionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionMatcher::Latest => write!(f, "latest"),
            VersionMatcher::Id(id) => write!(f, "id={}", id),
            VersionMatcher::Tag(tag) => write!(f, "tag={}", tag),
            VersionMatcher::CreatedAt(at) => write!(
                f,
                "created_at={}",
                at.to_rfc3339_opts(SecondsFormat::Micros, true)
            ),
        }
    }
}

impl From<i64> for VersionMatcher {
    fn from(id: i64) -> Self {
        VersionMatcher::Id(id)
    }
}

impl From<&str> for VersionMatcher {
    fn from(tag: &str) -> Self {
        VersionMatcher::Tag(tag.to_string())
    }
}

impl From<String> for VersionMatcher {
    fn from(tag: String) -> Self {
        VersionMatcher::Tag(tag)
    }
}

impl From<DateTime<Utc>> for VersionMatcher {
    fn from(at: DateTime<Utc>) -> Self {
        VersionMatcher::CreatedAt(at)
    }
}

impl<T: Into<VersionMatcher>> From<Option<T>> for VersionMatcher {
    fn from(matcher: Option<T>) -> Self {
        matcher.map_or(VersionMatcher::Latest, Into::into)
    }
}

/// Request to create a version
#[derive(Debug, Clone, PartialEq)]
pub struct NewVersion {
    pub tag: String,
    pub comment: String,
    pub draft: PayloadDraft,
}

impl NewVersion {
    pub fn new(tag: impl Into<String>, draft: PayloadDraft) -> Self {
        Self {
            tag: tag.into(),
            comment: String::new(),
            draft,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Microseconds since the Unix epoch, the stored form of `created_at`
pub(crate) fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_matcher_conversions() {
        assert_eq!(VersionMatcher::from(3), VersionMatcher::Id(3));
        assert_eq!(
            VersionMatcher::from("v1"),
            VersionMatcher::Tag("v1".to_string())
        );
        assert_eq!(VersionMatcher::from(None::<i64>), VersionMatcher::Latest);
        assert_eq!(VersionMatcher::from(Some(7)), VersionMatcher::Id(7));
    }

    #[test]
    fn test_matcher_display() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            VersionMatcher::from(at).to_string(),
            "created_at=2024-05-01T12:00:00.000000Z"
        );
        assert_eq!(VersionMatcher::Latest.to_string(), "latest");
    }

    #[test]
    fn test_micros_round_trip() {
        let at = Utc.timestamp_micros(1_714_564_800_123_456).unwrap();
        assert_eq!(from_micros(to_micros(at)), Some(at));
    }
}
