// ===== Системный журнал для внутренней диагностики =====
//
// На Linux сообщения о сбоях самого логгера уходят в syslog, на остальных
// платформах остаётся только консольный канал.

use crate::level::Level;

#[cfg(target_os = "linux")]
type Backend = syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>;

pub(crate) struct SystemLog {
    #[cfg(target_os = "linux")]
    backend: Option<std::sync::Mutex<Backend>>,
}

impl SystemLog {
    pub(crate) fn disabled() -> Self {
        SystemLog {
            #[cfg(target_os = "linux")]
            backend: None,
        }
    }

    #[cfg(target_os = "linux")]
    pub(crate) fn connect(process: &str) -> Self {
        let formatter = syslog::Formatter3164 {
            facility: syslog::Facility::LOG_USER,
            hostname: None,
            process: process.to_owned(),
            pid: std::process::id(),
        };
        // Нет сокета syslog (контейнер, песочница) — просто работаем без него
        SystemLog {
            backend: syslog::unix(formatter).ok().map(std::sync::Mutex::new),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub(crate) fn connect(_process: &str) -> Self {
        Self::disabled()
    }

    #[cfg(target_os = "linux")]
    pub(crate) fn report(&self, level: Level, msg: &str) {
        use syslog::Severity::*;

        let backend = match self.backend {
            Some(ref b) => b,
            None => return,
        };
        let mut logger = backend
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = match level.to_syslog_level() {
            LOG_ERR => logger.err(msg),
            LOG_WARNING => logger.warning(msg),
            LOG_INFO => logger.info(msg),
            _ => logger.debug(msg),
        };
    }

    #[cfg(not(target_os = "linux"))]
    pub(crate) fn report(&self, _level: Level, _msg: &str) {}
}
