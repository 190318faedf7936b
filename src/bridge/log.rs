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

use crate::Container;
use crate::Logger;
use crate::Severity;

fn severity_of(level: log::Level) -> Severity {
    match level {
        log::Level::Error => Severity::Error,
        log::Level::Warn => Severity::Warn,
        log::Level::Info => Severity::Info,
        log::Level::Debug | log::Level::Trace => Severity::Trace,
    }
}

/// Convert a `log` crate record into a [`Container`].
///
/// The target becomes the source and the formatted message becomes the free text info.
pub fn container_from_record(record: &log::Record) -> Container {
    Container {
        severity: Some(severity_of(record.level())),
        source: record.target().to_string(),
        info: record.args().to_string(),
        ..Default::default()
    }
}

impl log::Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        !self.is_disabled()
    }

    fn log(&self, record: &log::Record) {
        if log::Log::enabled(self, record.metadata()) {
            self.entry(container_from_record(record));
        }
    }

    fn flush(&self) {
        if let Err(err) = Logger::flush(self) {
            self.report(&err);
        }
    }
}

/// Install `logger` as the log crate global logger.
///
/// The logger is leaked: it lives, with its worker thread, until the process exits. Call
/// [`log::logger`]`().flush()` to wait for pending lines before exiting.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use fieldlog::Field;
/// use fieldlog::Logger;
///
/// let logger = Logger::builder([Field::Severity, Field::Source, Field::FreeInfo])
///     .build()
///     .unwrap();
/// fieldlog::bridge::try_setup_log_crate(logger).unwrap();
///
/// log::info!("hello");
/// log::logger().flush();
/// ```
pub fn try_setup_log_crate(logger: Logger) -> Result<(), log::SetLoggerError> {
    let logger: &'static Logger = Box::leak(Box::new(logger));
    log::set_logger(logger)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Install `logger` as the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate(logger: Logger) {
    try_setup_log_crate(logger).expect(
        "fieldlog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
