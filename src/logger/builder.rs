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

use std::sync::Arc;

use jiff::tz::TimeZone;

use super::Logger;
use super::options::Options;
use super::options::check_writable;
use crate::Container;
use crate::Error;
use crate::Format;
use crate::LineLayout;
use crate::StatusCounters;
use crate::Trap;
use crate::append::Append;
use crate::append::DailyFile;
use crate::append::Stdout;
use crate::clock::Clock;
use crate::trap::DefaultTrap;
use crate::worker::Worker;
use crate::worker::WorkerState;

/// A builder for configuring a [`Logger`]. See also [`Logger::builder`].
///
/// ## Examples
///
/// ```
/// use fieldlog::Container;
/// use fieldlog::Field;
/// use fieldlog::Logger;
/// use fieldlog::Options;
/// use fieldlog::Severity;
///
/// let logger = Logger::builder([Field::Timestamp, Field::Severity, Field::FreeInfo])
///     .options(Options::default().console_output(true))
///     .startup(Container::event(Severity::Info, "logger started"))
///     .build()
///     .unwrap();
///
/// logger.entry(Container::event(Severity::Warn, "cache miss"));
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    format: Format,
    options: Options,
    startup: Option<Container>,
    appends: Vec<Box<dyn Append>>,
    trap: Arc<dyn Trap>,
    buffered_lines_limit: Option<usize>,
    thread_name: String,
    tz: Option<TimeZone>,
    clock: Clock,
}

impl LoggerBuilder {
    pub(super) fn new(format: Format) -> Self {
        Self {
            format,
            options: Options::default(),
            startup: None,
            appends: vec![],
            trap: Arc::new(DefaultTrap::default()),
            buffered_lines_limit: Some(0),
            thread_name: "fieldlog-worker".to_string(),
            tz: None,
            clock: Clock::DefaultClock,
        }
    }

    /// Set the sink options.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set a record to submit once the logger is running, before `build` returns.
    pub fn startup(mut self, record: Container) -> Self {
        self.startup = Some(record);
        self
    }

    /// Add an appender, after the console and file outputs of the [`Options`].
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.appends.push(append.into());
        self
    }

    /// Set the trap receiving errors that cannot be returned to a caller.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = Arc::from(trap.into());
        self
    }

    /// Set the buffer size of pending records.
    ///
    /// Defaults to `Some(0)`: every submission waits until the worker takes it. `None` means an
    /// unbounded buffer where submissions never wait.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Set the name of the worker thread.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Render timestamps, and pick daily files, in `tz` instead of each record's own zone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Validate the options, start the worker and submit the startup record.
    ///
    /// # Errors
    ///
    /// Return an error if the file output is enabled and the output folder cannot be written,
    /// unless the cause is a permission denial and the policy is
    /// [`PermissionPolicy::DisableFile`](crate::PermissionPolicy::DisableFile). Also return an
    /// error if the worker thread cannot be spawned.
    pub fn build(self) -> Result<Logger, Error> {
        let Self {
            format,
            options,
            startup,
            appends: custom_appends,
            trap,
            buffered_lines_limit,
            thread_name,
            tz,
            clock,
        } = self;

        let mut appends: Vec<Box<dyn Append>> = vec![];
        if options.console_output {
            appends.push(Box::new(Stdout::default()));
        }
        if options.file_output {
            match check_writable(&options.output_folder) {
                Ok(()) => appends.push(Box::new(DailyFile::new(&options.output_folder))),
                Err(err) => trap.trap(&options.on_permission_denied.resolve(err)?),
            }
        }
        appends.extend(custom_appends);

        let counters = Arc::new(StatusCounters::new());

        if format.is_empty() {
            return Ok(Logger {
                format,
                counters,
                clock,
                trap,
                state: None,
            });
        }

        let (sender, receiver) = match buffered_lines_limit {
            Some(limit) => crossbeam_channel::bounded(limit),
            None => crossbeam_channel::unbounded(),
        };

        let worker = Worker::new(
            receiver,
            LineLayout::new(format.clone()),
            appends,
            counters.clone(),
            trap.clone(),
            tz,
        );
        let handle = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || worker.run())
            .map_err(|err| {
                Error::new("failed to spawn worker thread")
                    .with_context("thread_name", thread_name)
                    .with_source(err)
            })?;

        let logger = Logger {
            format,
            counters,
            clock,
            trap,
            state: Some(WorkerState::new(sender, handle)),
        };

        if let Some(record) = startup {
            logger.entry(record);
        }

        Ok(logger)
    }
}
