use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log item as the service stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warning,
    Error,
    Fatal,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Descriptor of attachment data stored alongside a log item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryContent {
    pub id: String,
    #[serde(default)]
    pub thumbnail_id: Option<String>,
    pub content_type: String,
}

/// A log item as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogItemResponse {
    pub id: i64,
    pub uuid: String,
    pub message: String,
    pub level: LogLevel,
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub binary_content: Option<BinaryContent>,
    #[serde(default)]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub launch_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeRepr {
    EpochMillis(i64),
    Rfc3339(DateTime<Utc>),
}

/// Accepts either epoch milliseconds or an RFC 3339 string.
fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match TimeRepr::deserialize(deserializer)? {
        TimeRepr::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", millis))),
        TimeRepr::Rfc3339(time) => Ok(time),
    }
}

/// File attached to a new log item.
///
/// Only `name` goes into the JSON request; the MIME type and bytes are sent
/// as the binary part of the multipart body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attach {
    pub name: String,
    #[serde(skip)]
    pub mime_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Attach {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogItemRequest {
    pub launch_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_uuid: Option<String>,
    pub time: DateTime<Utc>,
    pub message: String,
    pub level: LogLevel,
    #[serde(rename = "file", skip_serializing_if = "Option::is_none")]
    pub attach: Option<Attach>,
}

impl CreateLogItemRequest {
    pub fn new(launch_uuid: impl Into<String>, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            launch_uuid: launch_uuid.into(),
            item_uuid: None,
            time: Utc::now(),
            message: message.into(),
            level,
            attach: None,
        }
    }

    pub fn with_item(mut self, item_uuid: impl Into<String>) -> Self {
        self.item_uuid = Some(item_uuid.into());
        self
    }

    pub fn with_attach(mut self, attach: Attach) -> Self {
        self.attach = Some(attach);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogItemCreatedResponse {
    pub id: String,
}

/// Batch envelope returned by multipart log creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Responses {
    #[serde(rename = "responses")]
    pub log_items: Vec<LogItemCreatedResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub number: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub page: Page,
}
