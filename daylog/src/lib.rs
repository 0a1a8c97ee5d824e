//! # daylog
//!
//! Логгер для приложения: строки вида
//! `2024-03-05 07:08:09.045\t[I]\tTAG\tmessage` пишутся в файл текущего дня,
//! файл ротируется по размеру, старые файлы удаляются по возрасту.
//! При желании строки дублируются в консоль.

mod console;
mod error;
mod format;
pub mod global;
mod level;
mod logger;
mod sink;
mod system;

pub use console::{split_chunks, Console, ConsoleLine, MemoryConsole, StderrConsole, MAX_CONSOLE_CHUNK};
pub use error::{LogError, Result};
pub use format::{describe_error, flatten, message_with_error, LogRecord, TIME_PATTERN};
pub use global::{global, init, init_with, shutdown};
pub use level::Level;
pub use logger::{Logger, LoggerConfig, DIAGNOSTIC_TAG};
pub use sink::{
    FilePolicy, RollingFileSink, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_RETENTION_MILLIS,
};

// ===== Макросы =====

#[macro_export]
macro_rules! verbose {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.verbose($tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! debug {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.debug($tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! info {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.info($tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! warn {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.warn($tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! error {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.error($tag, &format!($($arg)*));
    }};
}

// ===== Глобальные макросы =====

#[macro_export]
macro_rules! gverbose {
    ($tag:expr, $($arg:tt)*) => {{
        if let Some(logger) = $crate::global() {
            logger.verbose($tag, &format!($($arg)*));
        }
    }};
}
#[macro_export]
macro_rules! gdebug {
    ($tag:expr, $($arg:tt)*) => {{
        if let Some(logger) = $crate::global() {
            logger.debug($tag, &format!($($arg)*));
        }
    }};
}
#[macro_export]
macro_rules! ginfo {
    ($tag:expr, $($arg:tt)*) => {{
        if let Some(logger) = $crate::global() {
            logger.info($tag, &format!($($arg)*));
        }
    }};
}
#[macro_export]
macro_rules! gwarn {
    ($tag:expr, $($arg:tt)*) => {{
        if let Some(logger) = $crate::global() {
            logger.warn($tag, &format!($($arg)*));
        }
    }};
}
#[macro_export]
macro_rules! gerror {
    ($tag:expr, $($arg:tt)*) => {{
        if let Some(logger) = $crate::global() {
            logger.error($tag, &format!($($arg)*));
        }
    }};
}
