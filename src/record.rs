// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The event record submitted for one log line.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::Zoned;
use serde::Serialize;
use serde_json::Value;

use crate::Severity;

/// The read-only view of an HTTP request that a record can be summarized with.
///
/// Implement this for the request type of whatever HTTP library is in use; the logger only
/// reads these three strings and never mutates the request.
pub trait Request: fmt::Debug + Send + Sync + 'static {
    /// The address of the remote peer, e.g. `192.168.0.1:12345`.
    fn remote_addr(&self) -> &str;

    /// The request method, e.g. `GET`.
    fn method(&self) -> &str;

    /// The full request URL.
    fn url(&self) -> &str;
}

/// A plain, owned [`Request`].
///
/// # Examples
///
/// ```
/// use fieldlog::HttpRequest;
/// use fieldlog::Request;
///
/// let request =
///     HttpRequest::new("GET", "https://example.com").with_remote_addr("192.168.0.1:12345");
/// assert_eq!(request.method(), "GET");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    remote_addr: String,
    method: String,
    url: String,
}

impl HttpRequest {
    /// Create a request summary with an empty remote address.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            remote_addr: String::new(),
            method: method.into(),
            url: url.into(),
        }
    }

    /// Set the remote address.
    pub fn with_remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.remote_addr = remote_addr.into();
        self
    }
}

impl Request for HttpRequest {
    fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Arbitrary payload data attached to a record, rendered as indented JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedData {
    /// A JSON value.
    Value(Value),
    /// The description of a failed conversion to JSON; rendered in place of the value.
    Invalid(String),
}

impl ProcessedData {
    /// Convert any serializable value. A failed conversion is kept as [`ProcessedData::Invalid`].
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => ProcessedData::Value(value),
            Err(err) => ProcessedData::Invalid(err.to_string()),
        }
    }
}

impl From<Value> for ProcessedData {
    fn from(value: Value) -> Self {
        ProcessedData::Value(value)
    }
}

/// A semi-structured event record, one per log line.
///
/// Every field is optional; empty strings are simply not rendered. Records are plain values and
/// are cloned into the logger on submission.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fieldlog::Container;
/// use fieldlog::Severity;
///
/// let container = Container {
///     severity: Some(Severity::Info),
///     source: "handler/user".to_string(),
///     info: "user created".to_string(),
///     processing_time: Duration::from_millis(3),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct Container {
    pub severity: Option<Severity>,
    pub pretext: String,
    pub id: String,
    pub source: String,
    pub info: String,
    pub data: String,
    pub error: String,
    pub processing_time: Duration,
    /// When unset, the logger fills in the submission time.
    pub timestamp: Option<Zoned>,
    pub http_request: Option<Arc<dyn Request>>,
    pub processed_data: Option<ProcessedData>,
}

impl Container {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with the given severity and free info text.
    pub fn event(severity: Severity, info: impl Into<String>) -> Self {
        Self {
            severity: Some(severity),
            info: info.into(),
            ..Default::default()
        }
    }

    /// Attach an HTTP request to be summarized.
    pub fn with_http_request(mut self, request: impl Request) -> Self {
        self.http_request = Some(Arc::new(request));
        self
    }

    /// Attach payload data, converting it to JSON eagerly.
    pub fn with_processed_data<T: Serialize + ?Sized>(mut self, data: &T) -> Self {
        self.processed_data = Some(ProcessedData::from_serialize(data));
        self
    }

    /// Set the timestamp of this record.
    pub fn with_timestamp(mut self, timestamp: Zoned) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
