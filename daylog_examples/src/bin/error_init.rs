// example_error_init — пример с ошибкой инициализации
// Каталог недоступен: логгер сообщает об этом в консоль и продолжает работать без файла

use daylog::{info, Logger, LoggerConfig, MemoryConsole};
use std::fs;
use std::sync::Arc;

fn main() {
    // Файл на месте каталога — создать каталог лога не получится
    let blocker = std::env::temp_dir().join("daylog-example-blocker");
    let _ = fs::write(&blocker, b"not a directory");

    let console = Arc::new(MemoryConsole::new());
    let logger = Logger::with_config(LoggerConfig::new(&blocker, true).console(console.clone()));

    info!(logger, "Main", "File logging enabled: {}", logger.is_file_enabled());
    info!(logger, "Main", "This line only reaches the console");

    for entry in console.entries() {
        println!("{:<8} {}", entry.tag, entry.text);
    }

    let _ = fs::remove_file(&blocker);
}
