use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::level::Level;

/// Максимальная длина одного вывода в консоль; длинные строки режутся на части.
pub const MAX_CONSOLE_CHUNK: usize = 4063;

// ===== Консольный канал =====

/// Канал, в который дублируются строки лога и внутренняя диагностика.
/// Реализация не должна блокироваться надолго; ошибки вывода игнорируются.
pub trait Console: Send + Sync {
    fn print(&self, level: Level, tag: &str, line: &str);
}

/// Вывод в stderr процесса.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrConsole;

impl Console for StderrConsole {
    fn print(&self, _level: Level, _tag: &str, line: &str) {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        for chunk in split_chunks(line, MAX_CONSOLE_CHUNK) {
            let _ = writeln!(out, "{}", chunk);
        }
    }
}

/// Строка, попавшая в [`MemoryConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: Level,
    pub tag: String,
    pub text: String,
}

/// Консоль в памяти: запоминает всё, что в неё вывели.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<ConsoleLine>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ConsoleLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries().into_iter().map(|l| l.text).collect()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Console for MemoryConsole {
    fn print(&self, level: Level, tag: &str, line: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        for chunk in split_chunks(line, MAX_CONSOLE_CHUNK) {
            lines.push(ConsoleLine {
                level,
                tag: tag.to_owned(),
                text: chunk.to_owned(),
            });
        }
    }
}

/// Делит текст на куски не длиннее `max` байт. По возможности режет по
/// переводу строки (сам перевод строки выбрасывается), иначе по границе символа.
pub fn split_chunks(text: &str, max: usize) -> Vec<&str> {
    if max == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while rest.len() > max {
        let mut cut = max;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // Первый символ шире лимита: отдаём его целиком
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        let (head, tail) = match rest[..cut].rfind('\n') {
            Some(pos) if pos > 0 => (&rest[..pos], &rest[pos + 1..]),
            _ => (&rest[..cut], &rest[cut..]),
        };
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_single_chunk() {
        assert_eq!(split_chunks("hello", 10), vec!["hello"]);
        assert_eq!(split_chunks("", 10), vec![""]);
    }

    #[test]
    fn splits_at_newline_when_possible() {
        assert_eq!(split_chunks("abc\ndefgh", 6), vec!["abc", "defgh"]);
    }

    #[test]
    fn hard_cut_without_newline() {
        assert_eq!(split_chunks("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn never_cuts_inside_a_char() {
        // 'ж' занимает два байта
        let chunks = split_chunks("жжж", 3);
        assert_eq!(chunks, vec!["ж", "ж", "ж"]);
    }

    #[test]
    fn memory_console_records_chunks() {
        let console = MemoryConsole::new();
        let long = "x".repeat(MAX_CONSOLE_CHUNK + 10);
        console.print(Level::Info, "T", &long);

        let entries = console.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text.len(), MAX_CONSOLE_CHUNK);
        assert_eq!(entries[1].text.len(), 10);
        assert_eq!(entries[1].tag, "T");
    }
}
