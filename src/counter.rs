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
use std::fmt::Write;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Severity;

/// Running counts of rendered records per [`Severity`].
///
/// Only the worker thread increments; any thread may read. Reads take a snapshot under the same
/// lock, so a summary never observes a half-applied increment.
#[derive(Debug, Default)]
pub struct StatusCounters {
    counts: Mutex<BTreeMap<Severity, u64>>,
}

impl StatusCounters {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn increment(&self, severity: Severity) {
        *self.lock().entry(severity).or_insert(0) += 1;
    }

    /// The count for `severity`; zero if it was never observed.
    pub fn count(&self, severity: Severity) -> u64 {
        self.lock().get(&severity).copied().unwrap_or(0)
    }

    /// A copy of all observed counts, ordered by severity ordinal.
    pub fn snapshot(&self) -> BTreeMap<Severity, u64> {
        self.lock().clone()
    }

    /// Render the observed counts as a single line.
    ///
    /// ```text
    /// Log Level Counters: [INFO: 6] [WARN: 1] [TRACE: 2] [ERROR: 4] [FATAL: 3]
    /// ```
    pub fn summary(&self) -> String {
        let mut text = String::from("Log Level Counters:");
        for (severity, count) in self.snapshot() {
            // SAFETY: write to a string always succeeds
            write!(&mut text, " [{severity}: {count}]").unwrap();
        }
        text
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Severity, u64>> {
        // a poisoned map is still consistent: the only mutation is a single increment
        self.counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
