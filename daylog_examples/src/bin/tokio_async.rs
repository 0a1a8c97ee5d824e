// example_tokio — асинхронный пример с tokio и глобальным логгером
// Запись синхронная и короткая, поэтому её можно вызывать прямо из задач

use daylog::{gdebug, gerror, gwarn};
use tokio::task;
use tokio::time::{sleep, Duration};

const APP_NAME: &str = "example_tokio";
const APP_VERSION: &str = "1.0.0";

pub struct Worker {
    id: u32,
}

impl Worker {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub async fn run(&self) {
        let tag = format!("Task-{}", self.id);
        gdebug!(&tag, "started (async)");

        // Имитация асинхронной работы
        sleep(Duration::from_millis(50 + (self.id as u64) * 100)).await;

        if self.id % 3 == 0 {
            gwarn!(&tag, "has high priority task");
        }

        if self.id == 2 {
            gerror!(&tag, "failed to process data");
        }

        gdebug!(&tag, "completed");
    }
}

#[tokio::main]
async fn main() {
    daylog::init("logs", true);
    gdebug!("Main", "Starting {} v{}", APP_NAME, APP_VERSION);

    let handles: Vec<_> = (0..5)
        .map(|i| task::spawn(async move { Worker::new(i).run().await }))
        .collect();

    for h in handles {
        let _ = h.await;
    }

    gdebug!("Main", "All async tasks completed");
    daylog::shutdown();
}
