use std::error::Error;

use chrono::{DateTime, Local};

use crate::level::Level;

/// Шаблон времени в строке лога: `2024-03-05 07:08:09.045`.
pub const TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";

// ===== Запись лога =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Миллисекунды от эпохи Unix.
    pub time_millis: i64,
    pub level: Level,
    pub tag: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(time_millis: i64, level: Level, tag: &str, message: impl Into<String>) -> Self {
        LogRecord {
            time_millis,
            level,
            tag: tag.to_owned(),
            message: message.into(),
        }
    }

    pub fn now(level: Level, tag: &str, message: impl Into<String>) -> Self {
        Self::new(Local::now().timestamp_millis(), level, tag, message)
    }

    /// Локальное время записи. Им же определяется имя дневного файла.
    pub fn local_time(&self) -> DateTime<Local> {
        local_time(self.time_millis)
    }
}

pub(crate) fn local_time(time_millis: i64) -> DateTime<Local> {
    // Вне диапазона chrono откатываемся к эпохе: форматирование не должно падать
    DateTime::from_timestamp_millis(time_millis)
        .unwrap_or_default()
        .with_timezone(&Local)
}

// ===== Форматирование =====

/// Превращает запись в одну строку:
/// `<время>\t[<код уровня>]\t<тег>\t<сообщение>`.
///
/// Переводы строк внутри сообщения сохраняются как есть.
pub fn flatten(record: &LogRecord) -> String {
    format!(
        "{}\t[{}]\t{}\t{}",
        record.local_time().format(TIME_PATTERN),
        record.level.short_name(),
        record.tag,
        record.message
    )
}

/// Описание ошибки вместе с цепочкой причин, по строке на звено.
pub fn describe_error(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str("\nCaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Сообщение с приклеенной ошибкой: `message\n<описание>`.
/// Если ошибки нет, сообщение возвращается без изменений.
pub fn message_with_error(message: &str, error: Option<&dyn Error>) -> String {
    match error {
        Some(e) => format!("{}\n{}", message, describe_error(e)),
        None => message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Reset;

    #[derive(Debug, Error)]
    #[error("sync failed")]
    struct SyncFailed(#[source] Reset);

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: i64) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .timestamp_millis()
            + ms
    }

    #[test]
    fn flatten_uses_tab_separated_template() {
        let record = LogRecord::new(millis(2024, 3, 5, 7, 8, 9, 45), Level::Info, "TAG", "hello");
        assert_eq!(flatten(&record), "2024-03-05 07:08:09.045\t[I]\tTAG\thello");
    }

    #[test]
    fn flatten_maps_every_level() {
        let t = millis(2023, 12, 31, 23, 59, 59, 999);
        for level in Level::ALL {
            let line = flatten(&LogRecord::new(t, level, "net", "x"));
            let expected = format!("2023-12-31 23:59:59.999\t[{}]\tnet\tx", level.short_name());
            assert_eq!(line, expected);
        }
    }

    #[test]
    fn flatten_is_deterministic() {
        let record = LogRecord::new(1_700_000_000_123, Level::Warn, "db", "slow query");
        assert_eq!(flatten(&record), flatten(&record.clone()));
    }

    #[test]
    fn flatten_keeps_newlines_in_message() {
        let t = millis(2024, 1, 2, 3, 4, 5, 6);
        let record = LogRecord::new(t, Level::Error, "io", "first\nsecond");
        assert_eq!(flatten(&record), "2024-01-02 03:04:05.006\t[E]\tio\tfirst\nsecond");
    }

    #[test]
    fn empty_message_renders_empty() {
        let t = millis(2024, 1, 2, 3, 4, 5, 0);
        let record = LogRecord::new(t, Level::Debug, "ui", "");
        assert!(flatten(&record).ends_with("\t[D]\tui\t"));
    }

    #[test]
    fn out_of_range_time_does_not_panic() {
        let record = LogRecord::new(i64::MAX, Level::Info, "t", "m");
        let line = flatten(&record);
        assert!(line.ends_with("\t[I]\tt\tm"));
    }

    #[test]
    fn error_is_appended_after_newline() {
        let msg = message_with_error("boom", Some(&Reset));
        assert_eq!(msg, "boom\nconnection reset");
    }

    #[test]
    fn error_chain_is_listed() {
        let err = SyncFailed(Reset);
        assert_eq!(describe_error(&err), "sync failed\nCaused by: connection reset");
    }

    #[test]
    fn absent_error_is_omitted() {
        assert_eq!(message_with_error("plain", None), "plain");
    }
}
