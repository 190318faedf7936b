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

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Container;
use crate::Error;
use crate::append::Append;

const DATE_FORMAT: &str = "%Y_%m_%d";
const FILENAME_SUFFIX: &str = "log";

/// An appender that writes one file per calendar day, named after the record's timestamp.
///
/// Each line is written by opening `<dir>/<YYYY_MM_DD>.log` in append mode, writing the line
/// and a newline, and closing the file again. No handle is kept between writes, so the file may
/// be moved or removed at any time; the next line simply recreates it.
///
/// # Examples
///
/// ```
/// use fieldlog::append::DailyFile;
///
/// let daily = DailyFile::new("logs").filename_prefix("server");
/// ```
#[derive(Debug, Clone)]
pub struct DailyFile {
    dir: PathBuf,
    prefix: Option<String>,
}

impl DailyFile {
    /// Create an appender that writes into `dir`. An empty path means the working directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: None,
        }
    }

    /// Sets the filename prefix, giving `<prefix>.<YYYY_MM_DD>.log`.
    #[must_use]
    pub fn filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix)
        };
        self
    }

    /// The directory files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a record with timestamp `ts` is written to.
    pub fn path_for(&self, ts: &Zoned) -> PathBuf {
        let date = ts.strftime(DATE_FORMAT);
        let filename = match &self.prefix {
            Some(prefix) => format!("{prefix}.{date}.{FILENAME_SUFFIX}"),
            None => format!("{date}.{FILENAME_SUFFIX}"),
        };
        self.dir.join(filename)
    }
}

impl Append for DailyFile {
    fn append(&self, line: &str, record: &Container) -> Result<(), Error> {
        let path = match &record.timestamp {
            Some(ts) => self.path_for(ts),
            None => self.path_for(&Zoned::now()),
        };

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|err| {
                Error::new("failed to open log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })?;

        // one write per line keeps concurrent appenders from interleaving within a line
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        file.write_all(&bytes).map_err(|err| {
            Error::new("failed to write log file")
                .with_context("path", path.display())
                .with_source(err)
        })
    }
}
