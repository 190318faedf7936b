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

//! The field format that decides which parts of a record are rendered, and in which order.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;

use crate::Error;

/// A field of a [`Container`](crate::Container) that can appear in a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Severity,
    Pretext,
    Id,
    Source,
    FreeInfo,
    Data,
    ErrorText,
    ProcessingTime,
    Timestamp,
    HttpRequestSummary,
    ProcessedDataJson,
}

impl Field {
    /// All fields, in declaration order.
    pub const ALL: [Field; 11] = [
        Field::Severity,
        Field::Pretext,
        Field::Id,
        Field::Source,
        Field::FreeInfo,
        Field::Data,
        Field::ErrorText,
        Field::ProcessingTime,
        Field::Timestamp,
        Field::HttpRequestSummary,
        Field::ProcessedDataJson,
    ];

    /// The textual identifier of this field, as accepted by [`Field::from_str`].
    pub const fn name(self) -> &'static str {
        match self {
            Field::Severity => "SEVERITY",
            Field::Pretext => "PRETEXT",
            Field::Id => "ID",
            Field::Source => "SOURCE",
            Field::FreeInfo => "FREE_INFO",
            Field::Data => "DATA",
            Field::ErrorText => "ERROR_TEXT",
            Field::ProcessingTime => "PROCESSING_TIME",
            Field::Timestamp => "TIMESTAMP",
            Field::HttpRequestSummary => "HTTP_REQUEST_SUMMARY",
            Field::ProcessedDataJson => "PROCESSED_DATA_JSON",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::new("unknown field").with_context("field", s))
    }
}

/// An ordered sequence of [`Field`]s, fixed for the lifetime of a logger.
///
/// Duplicates are allowed and are rendered once per occurrence. An empty format disables the
/// logger entirely.
///
/// # Examples
///
/// ```
/// use fieldlog::Field;
/// use fieldlog::Format;
///
/// let format = Format::new([Field::Timestamp, Field::Severity, Field::FreeInfo]);
/// assert_eq!(format.len(), 3);
///
/// // unknown names are skipped
/// let format = Format::from_names(["TIMESTAMP", "NOPE", "SEVERITY"]);
/// assert_eq!(format.fields(), &[Field::Timestamp, Field::Severity]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    fields: Vec<Field>,
}

impl Format {
    /// Create a format from the given fields, keeping their order.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Create a format from textual field identifiers. Identifiers that do not name a field are
    /// ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| name.as_ref().parse::<Field>().ok())
            .collect()
    }

    /// The fields of this format, in rendering order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether this format contains no field; a logger with an empty format is disabled.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The number of fields, duplicates included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether `field` occurs at least once.
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

impl FromIterator<Field> for Format {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Field>> for Format {
    fn from(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

impl<const N: usize> From<[Field; N]> for Format {
    fn from(fields: [Field; N]) -> Self {
        Self::new(fields)
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Format::from_names(names))
    }
}
