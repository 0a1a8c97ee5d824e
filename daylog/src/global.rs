//! Глобальный логгер процесса.
//!
//! `init` создаёт экземпляр [`Logger`] и кладёт его в общее хранилище,
//! `shutdown` закрывает файл и убирает логгер. До `init` и после `shutdown`
//! все вызовы молча ничего не делают. Код, которому нужен конкретный
//! экземпляр (например, в тестах), может получить его через [`global`].

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::logger::{Logger, LoggerConfig};

static GLOBAL_LOGGER: Lazy<Mutex<Option<Arc<Logger>>>> = Lazy::new(|| Mutex::new(None));

fn slot() -> MutexGuard<'static, Option<Arc<Logger>>> {
    GLOBAL_LOGGER.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn init<P: AsRef<Path>>(dir: P, mirror_to_console: bool) {
    init_with(LoggerConfig::new(dir, mirror_to_console));
}

/// Заменяет текущий глобальный логгер новым. Прежний закрывается.
pub fn init_with(config: LoggerConfig) {
    let logger = Arc::new(Logger::with_config(config));
    let previous = slot().replace(logger);
    if let Some(old) = previous {
        old.close();
    }
}

pub fn shutdown() {
    let previous = slot().take();
    if let Some(old) = previous {
        old.close();
    }
}

pub fn global() -> Option<Arc<Logger>> {
    slot().clone()
}

pub fn v(tag: &str, msg: &str) {
    if let Some(logger) = global() {
        logger.verbose(tag, msg);
    }
}

pub fn d(tag: &str, msg: &str) {
    if let Some(logger) = global() {
        logger.debug(tag, msg);
    }
}

pub fn i(tag: &str, msg: &str) {
    if let Some(logger) = global() {
        logger.info(tag, msg);
    }
}

pub fn w(tag: &str, msg: &str) {
    if let Some(logger) = global() {
        logger.warn(tag, msg);
    }
}

pub fn e(tag: &str, msg: &str) {
    if let Some(logger) = global() {
        logger.error(tag, msg);
    }
}

pub fn v_err(tag: &str, msg: &str, error: Option<&dyn Error>) {
    if let Some(logger) = global() {
        logger.verbose_err(tag, msg, error);
    }
}

pub fn d_err(tag: &str, msg: &str, error: Option<&dyn Error>) {
    if let Some(logger) = global() {
        logger.debug_err(tag, msg, error);
    }
}

pub fn i_err(tag: &str, msg: &str, error: Option<&dyn Error>) {
    if let Some(logger) = global() {
        logger.info_err(tag, msg, error);
    }
}

pub fn w_err(tag: &str, msg: &str, error: Option<&dyn Error>) {
    if let Some(logger) = global() {
        logger.warn_err(tag, msg, error);
    }
}

/// Предупреждение только с описанием ошибки.
pub fn w_cause(tag: &str, error: &dyn Error) {
    if let Some(logger) = global() {
        logger.warn_cause(tag, error);
    }
}

pub fn e_err(tag: &str, msg: &str, error: Option<&dyn Error>) {
    if let Some(logger) = global() {
        logger.error_err(tag, msg, error);
    }
}
