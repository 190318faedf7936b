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

//! Fieldlog is a structured line logger: every record is rendered as one line whose fields are
//! chosen, and ordered, once when the logger is constructed.
//!
//! # Overview
//!
//! A [`Logger`] is built from a [`Format`], an ordered list of [`Field`]s, and [`Options`] that
//! pick the outputs: stdout, daily files named `YYYY_MM_DD.log` in an output folder, or any
//! custom [`Append`]. Producers on any thread submit [`Container`]s; a single worker thread
//! renders and writes them in submission order and counts the rendered severities.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use fieldlog::Container;
//! use fieldlog::Field;
//! use fieldlog::HttpRequest;
//! use fieldlog::Logger;
//! use fieldlog::Options;
//! use fieldlog::Severity;
//!
//! let logger = Logger::new(
//!     [
//!         Field::Timestamp,
//!         Field::Severity,
//!         Field::HttpRequestSummary,
//!         Field::FreeInfo,
//!         Field::ProcessingTime,
//!     ],
//!     Options::default(),
//!     Some(Container::event(Severity::Info, "server started")),
//! )
//! .unwrap();
//!
//! let mut record = Container::event(Severity::Warn, "slow query")
//!     .with_http_request(HttpRequest::new("GET", "/users").with_remote_addr("10.0.0.7"));
//! record.processing_time = Duration::from_millis(340);
//! logger.entry(record);
//!
//! logger.flush().unwrap();
//! println!("{}", logger.summary());
//! ```
//!
//! The `log` crate can be forwarded to a logger with [`bridge::setup_log_crate`].

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod layout;

mod clock;
mod counter;
mod error;
mod format;
mod logger;
mod record;
mod severity;
mod trap;
mod worker;

pub use self::append::Append;
pub use self::counter::StatusCounters;
pub use self::error::Error;
pub use self::format::Field;
pub use self::format::Format;
pub use self::layout::Line;
pub use self::layout::LineLayout;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::Options;
pub use self::logger::PermissionPolicy;
pub use self::record::Container;
pub use self::record::HttpRequest;
pub use self::record::ProcessedData;
pub use self::record::Request;
pub use self::severity::Severity;
pub use self::trap::DefaultTrap;
pub use self::trap::Trap;

/// Bridge fieldlog with other logging frameworks.
pub mod bridge {
    #[cfg(feature = "bridge-log")]
    mod log;

    #[cfg(feature = "bridge-log")]
    pub use self::log::*;
}
