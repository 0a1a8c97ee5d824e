//! Ротирующий файловый приёмник.
//!
//! Каталог содержит по одному базовому файлу на календарный день
//! (`2024-03-05`) и его резервные копии (`2024-03-05.bak.1`, `.bak.2`, ...).
//! Когда очередная строка не помещается в лимит размера, базовый файл
//! уходит в копию со следующим номером, а запись продолжается в новый
//! пустой файл. Старые файлы удаляются по времени последнего изменения.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDate};

use crate::error::{LogError, Result};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 МБ
pub const DEFAULT_MAX_BACKUPS: usize = 5;
pub const DEFAULT_RETENTION_MILLIS: u64 = 6 * 24 * 60 * 60 * 1000; // 6 дней

const DATE_PATTERN: &str = "%Y-%m-%d";
const BACKUP_MARK: &str = ".bak.";
const PROBE_NAME: &str = ".daylog-probe";

// ===== Политика файлов =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePolicy {
    /// Предельный размер базового файла в байтах.
    pub max_file_size: u64,
    /// Сколько резервных копий хранить на один базовый файл.
    pub max_backups: usize,
    /// Файлы старше этого срока (по mtime) удаляются при очистке.
    pub retention: Duration,
}

impl Default for FilePolicy {
    fn default() -> Self {
        FilePolicy {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_backups: DEFAULT_MAX_BACKUPS,
            retention: Duration::from_millis(DEFAULT_RETENTION_MILLIS),
        }
    }
}

impl FilePolicy {
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            return Err(LogError::InvalidPolicy(
                "max_file_size must be greater than zero".to_owned(),
            ));
        }
        if self.max_backups == 0 {
            return Err(LogError::InvalidPolicy(
                "max_backups must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

// ===== Открытый файл =====

struct ActiveFile {
    name: String,
    path: PathBuf,
    file: File,
    size: u64,
}

impl ActiveFile {
    fn has_room_for(&self, entry_len: u64, max_size: u64) -> bool {
        // В пустой файл пишем всегда, даже если строка больше лимита
        self.size == 0 || self.size + entry_len <= max_size
    }

    fn append(&mut self, line: &str) -> Result<()> {
        let mut entry = String::with_capacity(line.len() + 1);
        entry.push_str(line);
        entry.push('\n');

        if let Err(e) = self.file.write_all(entry.as_bytes()) {
            // Часть строки могла попасть на диск: сверяем счётчик с реальным размером
            if let Ok(meta) = self.file.metadata() {
                self.size = meta.len();
            }
            return Err(LogError::io("write", &self.path, e));
        }
        self.size += entry.len() as u64;
        Ok(())
    }
}

// ===== Приёмник =====

pub struct RollingFileSink {
    dir: PathBuf,
    policy: FilePolicy,
    active: Mutex<Option<ActiveFile>>,
}

impl RollingFileSink {
    /// Создаёт каталог при необходимости, проверяет, что в него можно
    /// писать, и сразу удаляет устаревшие файлы.
    pub fn new<P: AsRef<Path>>(dir: P, policy: FilePolicy) -> Result<Self> {
        policy.validate()?;

        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| LogError::io("create_dir_all", &dir, e))?;
        if !dir.is_dir() {
            return Err(LogError::NotADirectory(dir));
        }
        probe_writable(&dir)?;

        let sink = RollingFileSink {
            dir,
            policy,
            active: Mutex::new(None),
        };
        sink.sweep()?;
        Ok(sink)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> &FilePolicy {
        &self.policy
    }

    /// Путь базового файла для указанного дня.
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(base_name(date))
    }

    /// Путь резервной копии с номером `index` для указанного дня.
    pub fn backup_path(&self, date: NaiveDate, index: u32) -> PathBuf {
        self.dir.join(backup_name(&base_name(date), index))
    }

    /// Файл, который сейчас открыт на запись, если он есть.
    pub fn active_path(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|a| a.path.clone())
    }

    /// Дописывает строку и перевод строки в файл дня `at`.
    ///
    /// Все изменения (смена дня, ротация, запись) выполняются под одной
    /// блокировкой, поэтому строки конкурентных вызовов не перемешиваются.
    pub fn write(&self, line: &str, at: DateTime<Local>) -> Result<()> {
        let name = base_name(at.date_naive());
        let entry_len = line.len() as u64 + 1;

        let mut slot = self.lock();
        let current = match slot.take() {
            Some(active) if active.name == name => active,
            previous => {
                // Новый день (или первый вызов): закрываем старый файл и чистим каталог.
                // Очистка попутная, её сбой не должен мешать записи.
                drop(previous);
                let _ = self.sweep_locked(SystemTime::now(), None);
                self.open(&name)?
            }
        };

        let current = if current.has_room_for(entry_len, self.policy.max_file_size) {
            current
        } else {
            self.rotate(current)?
        };

        slot.insert(current).append(line)
    }

    /// Закрывает текущий файл. Следующая запись откроет его заново.
    pub fn close(&self) {
        *self.lock() = None;
    }

    /// Удаляет файлы лога старше срока хранения. Возвращает число удалённых.
    pub fn sweep(&self) -> Result<usize> {
        self.sweep_at(SystemTime::now())
    }

    pub fn sweep_at(&self, now: SystemTime) -> Result<usize> {
        let slot = self.lock();
        let open = slot.as_ref().map(|a| a.name.as_str());
        self.sweep_locked(now, open)
    }

    fn sweep_locked(&self, now: SystemTime, open: Option<&str>) -> Result<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|e| LogError::io("read_dir", &self.dir, e))?;

        let mut deleted = 0;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let name = match file_name.to_str() {
                Some(n) => n,
                None => continue,
            };
            // Чужие файлы и открытый на запись не трогаем
            if !is_log_file_name(name) || open == Some(name) {
                continue;
            }

            let meta = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let modified = match meta.modified() {
                Ok(t) => t,
                Err(_) => continue,
            };

            let expired = now
                .duration_since(modified)
                .map(|age| age > self.policy.retention)
                .unwrap_or(false);
            if expired && fs::remove_file(entry.path()).is_ok() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn open(&self, name: &str) -> Result<ActiveFile> {
        let path = self.dir.join(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::io("open", &path, e))?;
        let size = file
            .metadata()
            .map_err(|e| LogError::io("metadata", &path, e))?
            .len();

        Ok(ActiveFile {
            name: name.to_owned(),
            path,
            file,
            size,
        })
    }

    /// Переносит базовый файл в копию со следующим номером и открывает
    /// новый пустой. При ошибке файл остаётся закрытым: следующая запись
    /// откроет его заново и возьмёт размер с диска.
    fn rotate(&self, current: ActiveFile) -> Result<ActiveFile> {
        let ActiveFile {
            name, path, file, ..
        } = current;
        // Закрываем до переименования: на Windows открытый файл не сдвинуть
        drop(file);

        let mut indices = self.backup_indices(&name)?;
        let next = indices.last().map_or(1, |last| last + 1);
        let target = self.dir.join(backup_name(&name, next));
        fs::rename(&path, &target).map_err(|e| LogError::io("rename", &path, e))?;
        indices.push(next);

        // Файл уже переименован: сначала открываем новый, чтобы строка не потерялась
        let fresh = self.open(&name)?;

        // Удаляем самые старые копии сверх лимита. Неудаленные копии
        // останутся в списке и будут удалены при следующей ротации.
        let excess = indices.len().saturating_sub(self.policy.max_backups);
        for index in indices.drain(..excess) {
            let _ = fs::remove_file(self.dir.join(backup_name(&name, index)));
        }

        Ok(fresh)
    }

    /// Номера существующих копий файла `name` по возрастанию.
    fn backup_indices(&self, name: &str) -> Result<Vec<u32>> {
        let prefix = format!("{}{}", name, BACKUP_MARK);
        let entries = fs::read_dir(&self.dir).map_err(|e| LogError::io("read_dir", &self.dir, e))?;

        let mut indices: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let rest = file_name.to_str()?.strip_prefix(&prefix)?;
                rest.parse().ok()
            })
            .collect();
        indices.sort_unstable();
        Ok(indices)
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveFile>> {
        // Паника в другом потоке не должна отключать логгер
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn base_name(date: NaiveDate) -> String {
    date.format(DATE_PATTERN).to_string()
}

fn backup_name(base: &str, index: u32) -> String {
    format!("{}{}{}", base, BACKUP_MARK, index)
}

/// `2024-03-05` или `2024-03-05.bak.N`.
fn is_log_file_name(name: &str) -> bool {
    let (base, index) = match name.split_once(BACKUP_MARK) {
        Some((base, index)) => (base, Some(index)),
        None => (name, None),
    };
    let date_ok = base.len() == 10 && NaiveDate::parse_from_str(base, DATE_PATTERN).is_ok();
    let index_ok = index.map_or(true, |i| i.parse::<u32>().is_ok());
    date_ok && index_ok
}

fn probe_writable(dir: &Path) -> Result<()> {
    let probe = dir.join(PROBE_NAME);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe)
        .map_err(|e| LogError::io("probe", &probe, e))?;
    fs::remove_file(&probe).map_err(|e| LogError::io("probe", &probe, e))
}
