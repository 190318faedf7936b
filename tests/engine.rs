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
use std::sync::Mutex;
use std::time::Duration;

use fieldlog::Append;
use fieldlog::Container;
use fieldlog::Error;
use fieldlog::Field;
use fieldlog::Format;
use fieldlog::HttpRequest;
use fieldlog::Logger;
use fieldlog::Options;
use fieldlog::PermissionPolicy;
use fieldlog::Severity;
use fieldlog::Trap;
use fieldlog::append::Testing;
use jiff::Zoned;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::json;
use tempfile::TempDir;

#[derive(Debug, Default, Clone)]
struct Capture(Arc<Mutex<Vec<String>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Append for Capture {
    fn append(&self, line: &str, _: &Container) -> Result<(), Error> {
        self.0.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
struct CollectTrap(Arc<Mutex<Vec<String>>>);

impl Trap for CollectTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.message().to_string());
    }
}

fn quiet() -> Options {
    Options::default().console_output(false)
}

fn full_format() -> Format {
    Format::new([
        Field::Timestamp,
        Field::Severity,
        Field::Pretext,
        Field::HttpRequestSummary,
        Field::Id,
        Field::Source,
        Field::FreeInfo,
        Field::Data,
        Field::ErrorText,
        Field::ProcessingTime,
        Field::ProcessedDataJson,
    ])
}

#[test]
fn test_full_format_line() {
    let capture = Capture::default();
    let logger = Logger::builder(full_format())
        .options(quiet())
        .append(Testing::default())
        .append(capture.clone())
        .build()
        .unwrap();

    let record = Container {
        severity: Some(Severity::Error),
        pretext: "SERVER1".to_string(),
        id: "5f322ac4ba".to_string(),
        source: "handler/order".to_string(),
        info: "order rejected".to_string(),
        data: "qty=0".to_string(),
        error: "quantity must be positive".to_string(),
        processing_time: Duration::from_micros(2500),
        timestamp: Some("2024-08-11T22:44:57+08:00[+08:00]".parse::<Zoned>().unwrap()),
        ..Default::default()
    }
    .with_http_request(HttpRequest::new("POST", "/orders").with_remote_addr("10.0.0.7:5555"))
    .with_processed_data(&json!({"order": 17, "items": []}));

    logger.entry(record);
    logger.flush().unwrap();

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    insta::assert_snapshot!(&lines[0], @r#"
    2024-08-11T22:44:57+08:00 ERROR SERVER1 10.0.0.7:5555 POST /orders 5f322ac4ba handler/order order rejected qty=0 quantity must be positive [2.50 ms] >Processed Data:
    {
      "items": [],
      "order": 17
    }
    "#);
    assert_eq!(logger.summary(), "Log Level Counters: [ERROR: 1]");
}

#[test]
fn test_unset_processed_data_renders_null() {
    let capture = Capture::default();
    let logger = Logger::builder([Field::Id, Field::ProcessedDataJson])
        .options(quiet())
        .append(capture.clone())
        .build()
        .unwrap();

    logger.entry(Container {
        id: "1".to_string(),
        ..Default::default()
    });
    logger.flush().unwrap();

    assert_eq!(capture.lines(), vec!["1 >Processed Data:\nnull".to_string()]);
}

#[test]
fn test_status_counters_summary() {
    let capture = Capture::default();
    let startup = Container::event(Severity::Info, "logger started");
    let logger = Logger::builder([Field::Severity, Field::FreeInfo])
        .options(quiet())
        .startup(startup)
        .append(capture.clone())
        .build()
        .unwrap();

    let mut severities = [
        vec![Severity::Info; 5],
        vec![Severity::Warn; 1],
        vec![Severity::Trace; 2],
        vec![Severity::Error; 4],
        vec![Severity::Fatal; 3],
    ]
    .concat();
    severities.shuffle(&mut rand::rng());

    for severity in severities {
        logger.entry(Container::event(severity, "event"));
    }
    // no severity, rendered but not counted
    logger.entry(Container::new());
    logger.flush().unwrap();

    assert_eq!(capture.lines()[0], "INFO logger started");
    assert_eq!(capture.lines().len(), 17);
    assert_eq!(
        logger.summary(),
        "Log Level Counters: [INFO: 6] [WARN: 1] [TRACE: 2] [ERROR: 4] [FATAL: 3]"
    );
    assert_eq!(logger.count(Severity::Fatal), 3);
    assert_eq!(logger.status_counters().values().sum::<u64>(), 16);
}

#[test]
fn test_format_without_severity_counts_nothing() {
    let capture = Capture::default();
    let logger = Logger::builder([Field::FreeInfo])
        .options(quiet())
        .append(capture.clone())
        .build()
        .unwrap();

    logger.entry(Container::event(Severity::Fatal, "out of memory"));
    logger.flush().unwrap();

    assert_eq!(capture.lines(), vec!["out of memory".to_string()]);
    assert_eq!(logger.summary(), "Log Level Counters:");
    assert!(logger.status_counters().is_empty());
}

#[test]
fn test_empty_format_disables_the_logger() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let capture = Capture::default();
    let logger = Logger::builder(Format::default())
        .options(Options::default().file_output(temp_dir.path()))
        .startup(Container::event(Severity::Info, "logger started"))
        .append(capture.clone())
        .build()
        .unwrap();

    assert!(logger.is_disabled());
    logger.entry(Container::event(Severity::Error, "ignored"));
    logger.flush().unwrap();

    assert!(capture.lines().is_empty());
    assert_eq!(logger.summary(), "Log Level Counters:");
    drop(logger);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_output_folder_fails() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let missing = temp_dir.path().join("folder/not/existing");

    for policy in [PermissionPolicy::DisableFile, PermissionPolicy::Fail] {
        let err = Logger::new(
            [Field::FreeInfo],
            quiet().file_output(&missing).on_permission_denied(policy),
            None,
        )
        .unwrap_err();
        assert_eq!(err.message(), "output folder is not writable");
        assert!(err.context("path").unwrap().contains("folder/not/existing"));
    }
}

// A read-only folder, or None when this process can write there anyway (e.g. as root).
#[cfg(unix)]
fn read_only_dir() -> Option<TempDir> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    std::fs::set_permissions(temp_dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
    if std::fs::write(temp_dir.path().join("writable.tmp"), b"").is_ok() {
        return None;
    }
    Some(temp_dir)
}

#[cfg(unix)]
fn restore_permissions(temp_dir: &TempDir) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(temp_dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_permission_denied_disables_file_output() {
    let Some(temp_dir) = read_only_dir() else {
        return;
    };

    let capture = Capture::default();
    let trap = CollectTrap::default();
    let logger = Logger::builder([Field::FreeInfo])
        .options(quiet().file_output(temp_dir.path()))
        .append(capture.clone())
        .trap(trap.clone())
        .build()
        .unwrap();

    logger.entry(Container::event(Severity::Info, "still logged"));
    drop(logger);

    assert_eq!(capture.lines(), vec!["still logged"]);
    assert_eq!(
        trap.0.lock().unwrap().clone(),
        vec!["file output disabled".to_string()]
    );
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    restore_permissions(&temp_dir);
}

#[cfg(unix)]
#[test]
fn test_permission_denied_fails_construction() {
    let Some(temp_dir) = read_only_dir() else {
        return;
    };

    let trap = CollectTrap::default();
    let err = Logger::builder([Field::FreeInfo])
        .options(
            quiet()
                .file_output(temp_dir.path())
                .on_permission_denied(PermissionPolicy::Fail),
        )
        .trap(trap.clone())
        .build()
        .unwrap_err();

    assert_eq!(err.message(), "output folder is not writable");
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::PermissionDenied));
    assert!(trap.0.lock().unwrap().is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    restore_permissions(&temp_dir);
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = Logger::new(
        [Field::Timestamp, Field::Severity, Field::FreeInfo],
        quiet().file_output(temp_dir.path()),
        None,
    )
    .unwrap();

    for (ts, info) in [
        ("2024-08-10T23:59:58+08:00[+08:00]", "first"),
        ("2024-08-10T23:59:59+08:00[+08:00]", "second"),
        ("2024-08-11T00:00:00+08:00[+08:00]", "third"),
    ] {
        let ts: Zoned = ts.parse().unwrap();
        logger.entry(Container::event(Severity::Info, info).with_timestamp(ts));
    }
    drop(logger);

    let day1 = std::fs::read_to_string(temp_dir.path().join("2024_08_10.log")).unwrap();
    assert_eq!(
        day1,
        "2024-08-10T23:59:58+08:00 INFO first\n2024-08-10T23:59:59+08:00 INFO second\n"
    );
    let day2 = std::fs::read_to_string(temp_dir.path().join("2024_08_11.log")).unwrap();
    assert_eq!(day2, "2024-08-11T00:00:00+08:00 INFO third\n");
    // the preflight marker is gone
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
}

#[test]
fn test_file_output_appends_across_loggers() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let ts: Zoned = "2024-03-01T09:00:00+00:00[+00:00]".parse().unwrap();

    for info in ["run 1", "run 2"] {
        let logger = Logger::new([Field::FreeInfo], quiet().file_output(temp_dir.path()), None)
            .unwrap();
        logger.entry(Container::event(Severity::Info, info).with_timestamp(ts.clone()));
    }

    let content = std::fs::read_to_string(temp_dir.path().join("2024_03_01.log")).unwrap();
    assert_eq!(content, "run 1\nrun 2\n");
}

#[derive(Debug)]
struct Failing;

impl Append for Failing {
    fn append(&self, line: &str, _: &Container) -> Result<(), Error> {
        if line.contains("poison") {
            Err(Error::new("sink refused line"))
        } else {
            Ok(())
        }
    }
}

#[test]
fn test_sink_error_goes_to_trap() {
    let capture = Capture::default();
    let trap = CollectTrap::default();
    let logger = Logger::builder([Field::FreeInfo])
        .options(quiet())
        .append(Failing)
        .append(capture.clone())
        .trap(trap.clone())
        .build()
        .unwrap();

    logger.entry(Container::event(Severity::Info, "before"));
    logger.entry(Container::event(Severity::Info, "poison"));
    logger.entry(Container::event(Severity::Info, "after"));
    logger.flush().unwrap();

    // the failing sink does not stop the other sinks nor later records
    assert_eq!(capture.lines(), vec!["before", "poison", "after"]);
    assert_eq!(
        trap.0.lock().unwrap().clone(),
        vec!["failed to append record".to_string()]
    );
}

#[test]
fn test_drop_delivers_everything() {
    let capture = Capture::default();
    let logger = Logger::builder([Field::Id])
        .options(quiet())
        .buffered_lines_limit(None)
        .append(capture.clone())
        .build()
        .unwrap();

    for i in 0..1000 {
        logger.entry(Container {
            id: i.to_string(),
            ..Default::default()
        });
    }
    drop(logger);

    let expected = (0..1000).map(|i| i.to_string()).collect::<Vec<_>>();
    assert_eq!(capture.lines(), expected);
}

#[test]
fn test_concurrent_producers_keep_their_order() {
    const PRODUCERS: usize = 8;
    const RECORDS: usize = 200;

    let capture = Capture::default();
    let logger = Arc::new(
        Logger::builder([Field::Source, Field::Id])
            .options(quiet())
            .append(capture.clone())
            .build()
            .unwrap(),
    );

    let handles = (0..PRODUCERS)
        .map(|p| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                let mut rng = rand::rng();
                for i in 0..RECORDS {
                    if rng.random_bool(0.1) {
                        std::thread::sleep(Duration::from_micros(rng.random_range(0..200)));
                    }
                    logger.entry(Container {
                        source: format!("p{p}"),
                        id: i.to_string(),
                        ..Default::default()
                    });
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().unwrap();

    let lines = capture.lines();
    assert_eq!(lines.len(), PRODUCERS * RECORDS);

    let mut next = [0usize; PRODUCERS];
    for line in lines {
        // every line is whole: exactly one source and one id
        let (source, id) = line.split_once(' ').unwrap();
        let p: usize = source.trim_start_matches('p').parse().unwrap();
        let i: usize = id.parse().unwrap();
        assert_eq!(i, next[p], "producer {p} out of order");
        next[p] += 1;
    }
    assert!(next.iter().all(|&n| n == RECORDS));
}

#[test]
fn test_options_from_config() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let config = json!({
        "format": ["TIMESTAMP", "SEVERITY", "NOT_A_FIELD", "FREE_INFO"],
        "options": {
            "console_output": false,
            "file_output": true,
            "output_folder": temp_dir.path(),
        },
    });

    let format: Format = serde_json::from_value(config["format"].clone()).unwrap();
    let options: Options = serde_json::from_value(config["options"].clone()).unwrap();
    assert_eq!(
        format.fields(),
        &[Field::Timestamp, Field::Severity, Field::FreeInfo]
    );

    let logger = Logger::new(format, options, None).unwrap();
    let ts: Zoned = "2025-02-03T04:05:06+00:00[+00:00]".parse().unwrap();
    logger.entry(Container::event(Severity::Warn, "from config").with_timestamp(ts));
    drop(logger);

    let content = std::fs::read_to_string(temp_dir.path().join("2025_02_03.log")).unwrap();
    assert_eq!(content, "2025-02-03T04:05:06+00:00 WARN from config\n");
}
