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

//! The delivery channel and the single worker that drains it.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use jiff::tz::TimeZone;

use crate::Container;
use crate::Error;
use crate::LineLayout;
use crate::StatusCounters;
use crate::Trap;
use crate::append::Append;

pub(crate) enum Task {
    Log(Box<Container>),
    Flush(Sender<()>),
}

pub(crate) struct Worker {
    receiver: Receiver<Task>,
    layout: LineLayout,
    appends: Vec<Box<dyn Append>>,
    counters: Arc<StatusCounters>,
    trap: Arc<dyn Trap>,
    tz: Option<TimeZone>,
}

impl Worker {
    pub(crate) fn new(
        receiver: Receiver<Task>,
        layout: LineLayout,
        appends: Vec<Box<dyn Append>>,
        counters: Arc<StatusCounters>,
        trap: Arc<dyn Trap>,
        tz: Option<TimeZone>,
    ) -> Self {
        Self {
            receiver,
            layout,
            appends,
            counters,
            trap,
            tz,
        }
    }

    pub(crate) fn run(self) {
        let Self {
            receiver,
            layout,
            appends,
            counters,
            trap,
            tz,
        } = self;

        // ends once every sender is dropped and the channel is drained
        while let Ok(task) = receiver.recv() {
            match task {
                Task::Log(mut record) => {
                    if let (Some(tz), Some(ts)) = (&tz, &record.timestamp) {
                        record.timestamp = Some(ts.with_time_zone(tz.clone()));
                    }

                    let (line, severity) = layout.format(&record).into_parts();
                    if let Some(severity) = severity {
                        counters.increment(severity);
                    }

                    for append in appends.iter() {
                        if let Err(err) = append.append(&line, &record) {
                            let err = Error::new("failed to append record").with_source(err);
                            trap.trap(&err);
                        }
                    }
                }
                Task::Flush(done) => {
                    for append in appends.iter() {
                        if let Err(err) = append.flush() {
                            let err = Error::new("failed to flush").with_source(err);
                            trap.trap(&err);
                        }
                    }
                    let _ = done.send(());
                }
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct WorkerState(Option<State>);

#[derive(Debug)]
struct State {
    sender: Sender<Task>,
    handle: JoinHandle<()>,
}

impl WorkerState {
    pub(crate) fn new(sender: Sender<Task>, handle: JoinHandle<()>) -> Self {
        Self(Some(State { sender, handle }))
    }

    /// Hand `task` to the worker, blocking until the channel accepts it.
    pub(crate) fn send_task(&self, task: Task) -> Result<(), Error> {
        // SAFETY: state is always Some before dropped.
        let State { sender, handle: _ } = self.0.as_ref().unwrap();

        sender.send(task).map_err(|err| {
            Error::new(match err.0 {
                Task::Log(_) => "failed to send log task to worker",
                Task::Flush(_) => "failed to send flush task to worker",
            })
        })
    }
}

impl Drop for WorkerState {
    fn drop(&mut self) {
        // SAFETY: state is always Some before dropped.
        let State { sender, handle } = self.0.take().unwrap();

        // drop our sender, the worker breaks its loop after draining the channel
        drop(sender);

        if handle.join().is_err() {
            eprintln!("fieldlog worker thread panicked");
        }
    }
}
