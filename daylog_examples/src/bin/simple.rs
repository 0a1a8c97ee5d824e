// example_simple — простой пример: инициализация, логи в файл и консоль, завершение

use daylog::{debug, error, info, warn, Logger};
use std::io;

const APP_NAME: &str = "example_simple";
const APP_VERSION: &str = "1.0.0";
const TAG: &str = "Main";

fn main() {
    // 1. Инициализация: файлы дня в logs/, дублируем в консоль
    let logger = Logger::init("logs", true);
    info!(logger, TAG, "Starting {} v{}", APP_NAME, APP_VERSION);

    // 2. Основной код
    debug!(logger, TAG, "Processing data block #1");
    warn!(logger, TAG, "Non-critical issue detected");

    let failure = io::Error::new(io::ErrorKind::NotFound, "config.toml is missing");
    logger.error_err(TAG, "Falling back to defaults", Some(&failure));
    error!(logger, TAG, "An error occurred, but we continue");

    // 3. Финальная часть
    info!(logger, TAG, "Application finished successfully");
    logger.close();
}
