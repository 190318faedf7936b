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

//! Deliver composed lines to various targets.

use std::fmt;

use crate::Container;
use crate::Error;

mod daily_file;
mod stdio;
mod testing;

pub use self::daily_file::DailyFile;
pub use self::stdio::Stdout;
pub use self::testing::Testing;

/// An appender that can deliver composed lines.
///
/// Appenders run on the logger's single worker thread, one line at a time, in submission order.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Deliver `line` (without a trailing newline) composed from `record`.
    ///
    /// The record's timestamp is always set by the time it reaches an appender.
    fn append(&self, line: &str, record: &Container) -> Result<(), Error>;

    /// Flush any buffered lines.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Append> From<T> for Box<dyn Append> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
