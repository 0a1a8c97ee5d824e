use chrono::{DateTime, Local, TimeZone};
use daylog::{FilePolicy, RollingFileSink};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap()
}

/// Создаёт файл и сдвигает его mtime на `age` в прошлое.
fn aged_file(path: &Path, age: Duration) {
    fs::write(path, b"old line\n").unwrap();
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - age)
        .unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn ten_mib_triggers_exactly_one_rotation() {
    let tmp = TempDir::new().unwrap();
    let sink = RollingFileSink::new(tmp.path(), FilePolicy::default()).unwrap();
    let at = noon(2024, 5, 1);
    let date = at.date_naive();

    // 160 строк по 64 КБ вместе с переводом строки — ровно 10 МБ
    let line = "a".repeat(64 * 1024 - 1);
    for _ in 0..160 {
        sink.write(&line, at).unwrap();
    }
    assert!(!sink.backup_path(date, 1).exists());
    assert_eq!(fs::metadata(sink.file_path(date)).unwrap().len(), 10 * 1024 * 1024);

    sink.write("overflow", at).unwrap();

    assert_eq!(
        fs::metadata(sink.backup_path(date, 1)).unwrap().len(),
        10 * 1024 * 1024
    );
    assert!(!sink.backup_path(date, 2).exists());
    assert_eq!(read_lines(&sink.file_path(date)), vec!["overflow"]);
}

#[test]
fn six_rotations_keep_five_backups() {
    let tmp = TempDir::new().unwrap();
    let policy = FilePolicy {
        max_file_size: 1024,
        ..FilePolicy::default()
    };
    let sink = RollingFileSink::new(tmp.path(), policy).unwrap();
    let at = noon(2024, 5, 1);
    let date = at.date_naive();

    let line = "b".repeat(511); // две строки заполняют файл
    for _ in 0..14 {
        sink.write(&line, at).unwrap();
    }

    assert!(!sink.backup_path(date, 1).exists());
    for index in 2..=6 {
        assert_eq!(fs::metadata(sink.backup_path(date, index)).unwrap().len(), 1024);
    }
    assert!(!sink.backup_path(date, 7).exists());
    assert_eq!(fs::metadata(sink.file_path(date)).unwrap().len(), 1024);
}

#[test]
fn concurrent_writers_do_not_interleave() {
    let tmp = TempDir::new().unwrap();
    let sink = Arc::new(RollingFileSink::new(tmp.path(), FilePolicy::default()).unwrap());
    let at = noon(2024, 5, 2);

    let threads = 8;
    let per_thread = 250;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let line = format!("worker={} seq={} {}", t, i, "payload".repeat(8));
                    sink.write(&line, at).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let path = sink.file_path(at.date_naive());
    let lines = read_lines(&path);
    assert_eq!(lines.len(), threads * per_thread);

    let mut expected = HashSet::new();
    let mut expected_size = 0u64;
    for t in 0..threads {
        for i in 0..per_thread {
            let line = format!("worker={} seq={} {}", t, i, "payload".repeat(8));
            expected_size += line.len() as u64 + 1;
            expected.insert(line);
        }
    }
    let actual: HashSet<String> = lines.into_iter().collect();
    assert_eq!(actual, expected);
    assert_eq!(fs::metadata(&path).unwrap().len(), expected_size);
}

#[test]
fn concurrent_writers_across_rotation_lose_nothing() {
    let tmp = TempDir::new().unwrap();
    let policy = FilePolicy {
        max_file_size: 4096,
        max_backups: 10_000,
        ..FilePolicy::default()
    };
    let sink = Arc::new(RollingFileSink::new(tmp.path(), policy).unwrap());
    let at = noon(2024, 5, 3);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..300 {
                    sink.write(&format!("t{}-{:04}", t, i), at).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut seen = HashSet::new();
    for entry in fs::read_dir(tmp.path()).unwrap().flatten() {
        let path = entry.path();
        assert!(fs::metadata(&path).unwrap().len() <= 4096);
        for line in read_lines(&path) {
            assert!(line.starts_with('t') && line.len() == 7, "corrupted line {:?}", line);
            assert!(seen.insert(line));
        }
    }
    assert_eq!(seen.len(), 4 * 300);
}

#[test]
fn new_day_switches_file_and_keeps_previous() {
    let tmp = TempDir::new().unwrap();
    let sink = RollingFileSink::new(tmp.path(), FilePolicy::default()).unwrap();

    sink.write("monday", noon(2024, 5, 6)).unwrap();
    sink.write("tuesday", noon(2024, 5, 7)).unwrap();
    sink.write("monday again", noon(2024, 5, 6)).unwrap();

    assert_eq!(
        read_lines(&tmp.path().join("2024-05-06")),
        vec!["monday", "monday again"]
    );
    assert_eq!(read_lines(&tmp.path().join("2024-05-07")), vec!["tuesday"]);
}

#[test]
fn construction_sweeps_expired_files() {
    let tmp = TempDir::new().unwrap();
    let old = tmp.path().join("2020-01-01");
    let old_backup = tmp.path().join("2020-01-01.bak.3");
    let young = tmp.path().join("2020-01-02");
    aged_file(&old, 6 * DAY + Duration::from_secs(5));
    aged_file(&old_backup, 7 * DAY);
    aged_file(&young, 6 * DAY - Duration::from_secs(60));

    let _sink = RollingFileSink::new(tmp.path(), FilePolicy::default()).unwrap();

    assert!(!old.exists());
    assert!(!old_backup.exists());
    assert!(young.exists());
}

#[test]
fn day_switch_sweeps_expired_files() {
    let tmp = TempDir::new().unwrap();
    let sink = RollingFileSink::new(tmp.path(), FilePolicy::default()).unwrap();
    sink.write("first day", noon(2024, 1, 1)).unwrap();

    // Появился после создания приёмника, поэтому удалить его может только смена дня
    let stale = tmp.path().join("2019-05-05");
    aged_file(&stale, 30 * DAY);

    sink.write("same day", noon(2024, 1, 1)).unwrap();
    assert!(stale.exists());

    sink.write("second day", noon(2024, 1, 2)).unwrap();
    assert!(!stale.exists());
    assert_eq!(read_lines(&tmp.path().join("2024-01-01")), vec!["first day", "same day"]);
}
