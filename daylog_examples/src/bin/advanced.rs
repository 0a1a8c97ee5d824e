// example_advanced — многопоточный пример с "классом" Worker
// Каждый поток — экземпляр структуры Worker, которой передаётся клон логгера

use daylog::{debug, error, warn, Logger};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const APP_NAME: &str = "example_advanced";
const APP_VERSION: &str = "1.1.0";

pub struct Worker {
    id: u32,
    tag: String,
    log: Arc<Logger>,
}

impl Worker {
    pub fn new(id: u32, log: Arc<Logger>) -> Self {
        Self {
            id,
            tag: format!("Worker-{}", id),
            log,
        }
    }

    pub fn run(&self) {
        debug!(self.log, &self.tag, "started execution");

        // Имитация работы
        thread::sleep(Duration::from_millis(50 + (self.id as u64) * 100));

        if self.id % 2 == 1 {
            warn!(self.log, &self.tag, "detected odd workload");
        }

        if self.id == 2 {
            error!(self.log, &self.tag, "encountered a transient error");
        }

        debug!(self.log, &self.tag, "finished");
    }
}

fn main() {
    let shared_logger = Arc::new(Logger::init("logs", false));

    debug!(shared_logger, "Main", "Starting {} v{}", APP_NAME, APP_VERSION);
    debug!(shared_logger, "Main", "Spawning workers...");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger_clone = Arc::clone(&shared_logger);
            thread::spawn(move || Worker::new(i, logger_clone).run())
        })
        .collect();

    for h in handles {
        let _ = h.join();
    }

    debug!(shared_logger, "Main", "All workers have finished");
}
