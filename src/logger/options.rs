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
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde::Deserialize;

use crate::Error;

/// Sink configuration of a [`Logger`](crate::Logger).
///
/// Can be deserialized from any serde format; missing keys take their defaults.
///
/// ```toml
/// console_output = true
/// file_output = true
/// output_folder = "/var/log/server"
/// on_permission_denied = "fail"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Print every line to stdout. Defaults to `true`.
    pub console_output: bool,
    /// Append every line to a daily file in `output_folder`. Defaults to `false`.
    pub file_output: bool,
    /// Where daily files are written. Empty means the working directory.
    pub output_folder: PathBuf,
    /// What to do when the output folder denies writing.
    pub on_permission_denied: PermissionPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            console_output: true,
            file_output: false,
            output_folder: PathBuf::new(),
            on_permission_denied: PermissionPolicy::default(),
        }
    }
}

impl Options {
    /// Enable or disable the console output.
    pub fn console_output(mut self, enabled: bool) -> Self {
        self.console_output = enabled;
        self
    }

    /// Enable daily files in `folder`.
    pub fn file_output(mut self, folder: impl Into<PathBuf>) -> Self {
        self.file_output = true;
        self.output_folder = folder.into();
        self
    }

    /// Set the policy for a permission-denied preflight.
    pub fn on_permission_denied(mut self, policy: PermissionPolicy) -> Self {
        self.on_permission_denied = policy;
        self
    }
}

/// How construction treats an output folder that denies writing.
///
/// Any other failure of the writability check (a missing folder, for instance) always fails
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPolicy {
    /// Build the logger without the file output and report the denial to the trap.
    #[default]
    DisableFile,
    /// Fail construction.
    Fail,
}

impl PermissionPolicy {
    /// Decide how a failed writability check affects construction.
    ///
    /// `Ok` carries the report for the trap when the file output is dropped instead.
    pub(crate) fn resolve(self, err: Error) -> Result<Error, Error> {
        if self == PermissionPolicy::DisableFile && is_permission_denied(&err) {
            Ok(Error::new("file output disabled").with_source(err))
        } else {
            Err(err)
        }
    }
}

/// Check that `dir` accepts new files by creating and removing a marker file.
pub(crate) fn check_writable(dir: &Path) -> Result<(), Error> {
    static SEQ: AtomicUsize = AtomicUsize::new(0);

    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let marker = dir.join(format!(
        ".fieldlog-preflight-{}-{seq}.tmp",
        std::process::id()
    ));

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker)
        .map_err(|err| {
            Error::new("output folder is not writable")
                .with_context("path", marker.display())
                .with_source(err)
        })?;

    std::fs::remove_file(&marker).map_err(|err| {
        Error::new("failed to remove preflight marker file")
            .with_context("path", marker.display())
            .with_source(err)
    })
}

fn is_permission_denied(err: &Error) -> bool {
    err.io_kind() == Some(io::ErrorKind::PermissionDenied)
}
