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

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Container;
use crate::Error;
use crate::Format;
use crate::Severity;
use crate::StatusCounters;
use crate::Trap;
use crate::clock::Clock;
use crate::worker::Task;
use crate::worker::WorkerState;

mod builder;
mod options;

pub use self::builder::LoggerBuilder;
pub use self::options::Options;
pub use self::options::PermissionPolicy;

/// A logger that renders [`Container`]s in a fixed field [`Format`] and delivers them, in
/// submission order, from a single worker thread.
///
/// Any number of threads may call [`Logger::entry`] concurrently. Dropping the logger waits
/// until every accepted record is delivered and the worker has stopped.
#[derive(Debug)]
pub struct Logger {
    format: Format,
    counters: Arc<StatusCounters>,
    clock: Clock,
    trap: Arc<dyn Trap>,
    // None when the format is empty
    state: Option<WorkerState>,
}

impl Logger {
    /// Create a new [`LoggerBuilder`] rendering `format`.
    pub fn builder(format: impl Into<Format>) -> LoggerBuilder {
        LoggerBuilder::new(format.into())
    }

    /// Create a logger from a format, sink options and an optional startup record.
    ///
    /// # Errors
    ///
    /// See [`LoggerBuilder::build`].
    pub fn new(
        format: impl Into<Format>,
        options: Options,
        startup: Option<Container>,
    ) -> Result<Logger, Error> {
        let mut builder = Logger::builder(format).options(options);
        if let Some(record) = startup {
            builder = builder.startup(record);
        }
        builder.build()
    }

    /// Submit a record.
    ///
    /// An unset timestamp is filled with the current time here, on the caller's thread. The call
    /// waits until the delivery channel accepts the record; rendering and writing happen later on
    /// the worker thread, whose failures go to the trap.
    ///
    /// Does nothing at all when the format is empty.
    pub fn entry(&self, mut record: Container) {
        let Some(state) = &self.state else {
            return;
        };

        if record.timestamp.is_none() {
            record.timestamp = Some(self.clock.now());
        }

        if let Err(err) = state.send_task(Task::Log(Box::new(record))) {
            self.report(&err);
        }
    }

    /// Wait until every record accepted so far has been delivered, then flush all appenders.
    ///
    /// # Errors
    ///
    /// Return an error if the worker is no longer running.
    pub fn flush(&self) -> Result<(), Error> {
        let Some(state) = &self.state else {
            return Ok(());
        };

        let (done, wait) = crossbeam_channel::bounded(1);
        state.send_task(Task::Flush(done))?;
        wait.recv()
            .map_err(|err| Error::new("worker stopped before flushing").with_source(err))
    }

    /// Hand `err` to the configured trap.
    pub(crate) fn report(&self, err: &Error) {
        self.trap.trap(err);
    }

    /// The counters as a single line, e.g.
    /// `Log Level Counters: [INFO: 6] [WARN: 1] [TRACE: 2] [ERROR: 4] [FATAL: 3]`.
    ///
    /// Only severities rendered through [`Field::Severity`](crate::Field::Severity) are counted.
    pub fn summary(&self) -> String {
        self.counters.summary()
    }

    /// The number of rendered records with `severity`.
    pub fn count(&self, severity: Severity) -> u64 {
        self.counters.count(severity)
    }

    /// A copy of all observed counts.
    pub fn status_counters(&self) -> BTreeMap<Severity, u64> {
        self.counters.snapshot()
    }

    /// The format of this logger.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Whether this logger is disabled by an empty format.
    pub fn is_disabled(&self) -> bool {
        self.state.is_none()
    }
}
