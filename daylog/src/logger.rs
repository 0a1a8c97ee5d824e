use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::console::{Console, StderrConsole};
use crate::format::{describe_error, flatten, message_with_error, LogRecord};
use crate::level::Level;
use crate::sink::{FilePolicy, RollingFileSink};
use crate::system::SystemLog;

/// Тег, под которым логгер сообщает о собственных сбоях.
pub const DIAGNOSTIC_TAG: &str = "daylog";

// ===== Настройки =====

#[derive(Clone)]
pub struct LoggerConfig {
    pub dir: PathBuf,
    pub mirror_to_console: bool,
    pub policy: FilePolicy,
    pub console: Arc<dyn Console>,
    /// Дублировать внутреннюю диагностику в системный журнал.
    pub system_log: bool,
}

impl LoggerConfig {
    pub fn new<P: AsRef<Path>>(dir: P, mirror_to_console: bool) -> Self {
        LoggerConfig {
            dir: dir.as_ref().to_path_buf(),
            mirror_to_console,
            policy: FilePolicy::default(),
            console: Arc::new(StderrConsole),
            system_log: true,
        }
    }

    pub fn policy(mut self, policy: FilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn system_log(mut self, enabled: bool) -> Self {
        self.system_log = enabled;
        self
    }
}

// ===== Основной логгер =====

/// Фасад: форматирует запись, пишет её в файл дня и, если включено,
/// дублирует в консоль. Ни один метод не паникует и не возвращает ошибку.
pub struct Logger {
    sink: Option<RollingFileSink>,
    console: Arc<dyn Console>,
    mirror_to_console: bool,
    system_log: SystemLog,
    write_failure_reported: AtomicBool,
}

impl Logger {
    /// Файловый лог в `dir` с политикой по умолчанию и консолью в stderr.
    pub fn init<P: AsRef<Path>>(dir: P, mirror_to_console: bool) -> Self {
        Self::with_config(LoggerConfig::new(dir, mirror_to_console))
    }

    /// Если каталог создать не удалось, логгер всё равно создаётся:
    /// он пишет только в консоль (при включённом дублировании).
    pub fn with_config(config: LoggerConfig) -> Self {
        let system_log = if config.system_log {
            SystemLog::connect(DIAGNOSTIC_TAG)
        } else {
            SystemLog::disabled()
        };

        let mut logger = Logger {
            sink: None,
            console: config.console,
            mirror_to_console: config.mirror_to_console,
            system_log,
            write_failure_reported: AtomicBool::new(false),
        };

        match RollingFileSink::new(&config.dir, config.policy) {
            Ok(sink) => logger.sink = Some(sink),
            Err(e) => logger.diagnostic(&format!("file logging disabled: {}", e)),
        }
        logger
    }

    pub fn is_file_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn sink(&self) -> Option<&RollingFileSink> {
        self.sink.as_ref()
    }

    pub fn log(&self, record: &LogRecord) {
        let line = flatten(record);

        if let Some(ref sink) = self.sink {
            match sink.write(&line, record.local_time()) {
                Ok(()) => self.write_failure_reported.store(false, Ordering::Relaxed),
                Err(e) => {
                    // Пока запись не восстановится, о сбое сообщаем один раз
                    if !self.write_failure_reported.swap(true, Ordering::Relaxed) {
                        self.diagnostic(&format!("failed to write log: {}", e));
                    }
                }
            }
        }

        if self.mirror_to_console {
            self.console.print(record.level, &record.tag, &line);
        }
    }

    fn emit(&self, level: Level, tag: &str, message: String) {
        self.log(&LogRecord::now(level, tag, message));
    }

    pub fn verbose(&self, tag: &str, msg: &str) {
        self.emit(Level::Verbose, tag, msg.to_owned());
    }

    pub fn verbose_err(&self, tag: &str, msg: &str, error: Option<&dyn Error>) {
        self.emit(Level::Verbose, tag, message_with_error(msg, error));
    }

    pub fn debug(&self, tag: &str, msg: &str) {
        self.emit(Level::Debug, tag, msg.to_owned());
    }

    pub fn debug_err(&self, tag: &str, msg: &str, error: Option<&dyn Error>) {
        self.emit(Level::Debug, tag, message_with_error(msg, error));
    }

    pub fn info(&self, tag: &str, msg: &str) {
        self.emit(Level::Info, tag, msg.to_owned());
    }

    pub fn info_err(&self, tag: &str, msg: &str, error: Option<&dyn Error>) {
        self.emit(Level::Info, tag, message_with_error(msg, error));
    }

    pub fn warn(&self, tag: &str, msg: &str) {
        self.emit(Level::Warn, tag, msg.to_owned());
    }

    pub fn warn_err(&self, tag: &str, msg: &str, error: Option<&dyn Error>) {
        self.emit(Level::Warn, tag, message_with_error(msg, error));
    }

    /// Предупреждение, состоящее только из описания ошибки.
    pub fn warn_cause(&self, tag: &str, error: &dyn Error) {
        self.emit(Level::Warn, tag, describe_error(error));
    }

    pub fn error(&self, tag: &str, msg: &str) {
        self.emit(Level::Error, tag, msg.to_owned());
    }

    pub fn error_err(&self, tag: &str, msg: &str, error: Option<&dyn Error>) {
        self.emit(Level::Error, tag, message_with_error(msg, error));
    }

    /// Закрывает открытый файл; следующий вызов откроет его снова.
    pub fn close(&self) {
        if let Some(ref sink) = self.sink {
            sink.close();
        }
    }

    fn diagnostic(&self, msg: &str) {
        let record = LogRecord::now(Level::Error, DIAGNOSTIC_TAG, msg);
        self.console.print(Level::Error, DIAGNOSTIC_TAG, &flatten(&record));
        self.system_log.report(Level::Error, msg);
    }
}
