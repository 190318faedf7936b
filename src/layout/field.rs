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

use std::borrow::Cow;
use std::time::Duration;

use jiff::Zoned;

use crate::Container;
use crate::Field;
use crate::ProcessedData;
use crate::Request;

/// RFC 3339 at second precision with a numeric offset.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Marker line placed before the JSON body of processed data.
pub(crate) const PROCESSED_DATA_MARKER: &str = ">Processed Data:\n";

const MIN_PROCESSING_MILLIS: f64 = 0.01;

/// Render one field of `record`. `None` means the field contributes nothing to the line.
pub(crate) fn render(field: Field, record: &Container) -> Option<Cow<'_, str>> {
    match field {
        Field::Severity => record.severity.map(|sev| Cow::Borrowed(sev.name())),
        Field::Pretext => text(&record.pretext),
        Field::Id => text(&record.id),
        Field::Source => text(&record.source),
        Field::FreeInfo => text(&record.info),
        Field::Data => text(&record.data),
        Field::ErrorText => text(&record.error),
        Field::ProcessingTime => Some(Cow::Owned(processing_time(record.processing_time))),
        Field::Timestamp => record.timestamp.as_ref().map(|ts| Cow::Owned(timestamp(ts))),
        Field::HttpRequestSummary => record
            .http_request
            .as_deref()
            .and_then(|req| http_request(req))
            .map(Cow::Owned),
        Field::ProcessedDataJson => Some(Cow::Owned(processed_data(
            record.processed_data.as_ref(),
        ))),
    }
}

fn text(s: &str) -> Option<Cow<'_, str>> {
    if s.is_empty() {
        None
    } else {
        Some(Cow::Borrowed(s))
    }
}

pub(crate) fn timestamp(ts: &Zoned) -> String {
    ts.strftime(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn processing_time(elapsed: Duration) -> String {
    let millis = (elapsed.as_secs_f64() * 1000.0).max(MIN_PROCESSING_MILLIS);
    format!("[{millis:.2} ms]")
}

// missing parts are skipped so the token never carries stray separators
fn http_request(req: &dyn Request) -> Option<String> {
    let parts = [req.remote_addr(), req.method(), req.url()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

pub(crate) fn processed_data(data: Option<&ProcessedData>) -> String {
    let body = match data {
        None => Cow::Borrowed("null"),
        Some(ProcessedData::Value(value)) => match serde_json::to_string_pretty(value) {
            Ok(json) => Cow::Owned(json),
            Err(err) => Cow::Owned(err.to_string()),
        },
        Some(ProcessedData::Invalid(reason)) => Cow::Borrowed(reason.as_str()),
    };
    format!("{PROCESSED_DATA_MARKER}{body}")
}
