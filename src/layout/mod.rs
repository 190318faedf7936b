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

//! Compose records into lines.

use crate::Container;
use crate::Field;
use crate::Format;
use crate::Severity;

mod field;

/// A layout that renders the fields of a [`Format`] in order, separated by single spaces.
///
/// Output format for `[TIMESTAMP, SEVERITY, SOURCE, FREE_INFO, PROCESSING_TIME]`:
///
/// ```text
/// 2024-08-11T22:44:57+08:00 INFO handler/user user created [3.00 ms]
/// 2024-08-11T22:44:58+08:00 ERROR handler/user [0.41 ms]
/// ```
///
/// Fields that render nothing (empty strings, no request, no severity) are skipped, so the line
/// never holds two consecutive separators and never starts or ends with one.
///
/// # Examples
///
/// ```
/// use fieldlog::Container;
/// use fieldlog::Field;
/// use fieldlog::LineLayout;
/// use fieldlog::Severity;
///
/// let layout = LineLayout::new([Field::Severity, Field::Id, Field::FreeInfo]);
/// let line = layout.format(&Container::event(Severity::Warn, "disk almost full"));
/// assert_eq!(line.text(), "WARN disk almost full");
/// assert_eq!(line.severity(), Some(Severity::Warn));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineLayout {
    format: Format,
}

/// A composed line, along with the severity it rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    severity: Option<Severity>,
}

impl Line {
    /// The rendered text, without a trailing newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The severity observed while rendering.
    ///
    /// This is `Some` only when the format holds [`Field::Severity`] and the record carries a
    /// severity. Status counters are driven by this value, so a format without the severity
    /// field never counts anything.
    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub(crate) fn into_parts(self) -> (String, Option<Severity>) {
        (self.text, self.severity)
    }
}

impl LineLayout {
    /// Create a layout for the given format.
    pub fn new(format: impl Into<Format>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The format this layout renders.
    pub fn format_spec(&self) -> &Format {
        &self.format
    }

    /// Compose `record` into a line.
    pub fn format(&self, record: &Container) -> Line {
        let mut text = String::new();
        let mut severity = None;

        for &field in self.format.fields() {
            let Some(token) = field::render(field, record) else {
                continue;
            };
            if token.is_empty() {
                continue;
            }
            if field == Field::Severity {
                severity = record.severity;
            }
            text.push_str(&token);
            text.push(' ');
        }

        let len = text.trim_end_matches(' ').len();
        text.truncate(len);

        Line { text, severity }
    }
}
