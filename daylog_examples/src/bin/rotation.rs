//! example_rotation — демонстрация ротации логов по размеру

use daylog::{debug, error, warn, FilePolicy, Logger, LoggerConfig};
use std::fs;
use std::thread;
use std::time::Duration;

const TAG: &str = "Rotation";

// Маленький максимальный размер — чтобы ротация сработала быстро
const MAX_LOG_SIZE: u64 = 4096; // 4 КБ
const MAX_BACKUPS: usize = 5;

fn main() {
    let policy = FilePolicy {
        max_file_size: MAX_LOG_SIZE,
        max_backups: MAX_BACKUPS,
        ..FilePolicy::default()
    };
    let logger = Logger::with_config(LoggerConfig::new("logs", false).policy(policy));

    debug!(logger, TAG, "Logger initialized with max_size={} bytes, max_backups={}", MAX_LOG_SIZE, MAX_BACKUPS);

    for i in 0..300 {
        debug!(logger, TAG, "This is a debug message number {}", i);
        if i % 30 == 0 {
            warn!(logger, TAG, "Warning message at iteration {}", i);
        }
        if i % 35 == 0 {
            error!(logger, TAG, "Error message at iteration {}", i);
        }
        thread::sleep(Duration::from_millis(2));
    }
    logger.close();

    // Показываем, что осталось в каталоге: файл дня и не больше MAX_BACKUPS копий
    if let Ok(entries) = fs::read_dir("logs") {
        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        for name in names {
            println!("{}", name);
        }
    }
}
