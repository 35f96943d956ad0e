use chrono::{DateTime, Local, TimeDelta};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;

// ===== Системный лог (для ошибок самой ротации) =====

#[cfg(target_os = "linux")]
type SystemLogger = syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>;

#[cfg(target_os = "linux")]
fn init_system_logger() -> Option<SystemLogger> {
    let formatter = syslog::Formatter3164 {
        facility: syslog::Facility::LOG_USER,
        hostname: None,
        process: env!("CARGO_PKG_NAME").to_owned(),
        pid: std::process::id(),
    };
    syslog::unix(formatter).ok()
}

// ===== Ротирующий писатель =====

/// Файл с ротацией по размеру: `app.log` → `app.log.1` → `app.log.2` ...
///
/// Лишние по количеству и устаревшие по возрасту копии удаляются после
/// каждой ротации. Синхронизацию записи обеспечивает владелец.
pub struct RotatingWriter {
    path: PathBuf,
    max_size: u64,
    max_backups: Option<usize>,
    max_age: Option<TimeDelta>,
    file: File,
    size: u64,
    #[cfg(target_os = "linux")]
    system_logger: Option<SystemLogger>,
}

impl RotatingWriter {
    const MEGABYTE: u64 = 1024 * 1024;
    const FALLBACK_MAX_SIZE_MB: u64 = 100;

    /// Лимиты передаются как есть; неположительный размер означает 100 МБ,
    /// неположительные копии и возраст отключают соответствующую очистку.
    pub fn new<P: AsRef<Path>>(
        path: P,
        max_size_mb: i64,
        max_backups: i64,
        max_age_days: i64,
    ) -> io::Result<Self> {
        let size_mb = u64::try_from(max_size_mb)
            .ok()
            .filter(|mb| *mb > 0)
            .unwrap_or(Self::FALLBACK_MAX_SIZE_MB);
        let max_backups = usize::try_from(max_backups).ok().filter(|n| *n > 0);
        let max_age = Some(max_age_days)
            .filter(|days| *days > 0)
            .and_then(TimeDelta::try_days);

        Self::with_limits(
            path.as_ref(),
            size_mb.saturating_mul(Self::MEGABYTE),
            max_backups,
            max_age,
        )
    }

    pub fn from_config(config: &Config) -> io::Result<Self> {
        Self::new(
            config.log_path(),
            config.max_size_mb(),
            config.max_backups(),
            config.max_age_days(),
        )
    }

    pub(crate) fn with_limits(
        path: &Path,
        max_size: u64,
        max_backups: Option<usize>,
        max_age: Option<TimeDelta>,
    ) -> io::Result<Self> {
        let file = open_append(path)?;
        let size = file.metadata()?.len();

        Ok(RotatingWriter {
            path: path.to_path_buf(),
            max_size,
            max_backups,
            max_age,
            file,
            size,
            #[cfg(target_os = "linux")]
            system_logger: init_system_logger(),
        })
    }

    /// Текущий открытый файл (нужен для перенаправления stderr).
    pub fn file(&self) -> &File {
        &self.file
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn existing_backups(&self) -> usize {
        let mut count = 0;
        while self.backup_path(count + 1).exists() {
            count += 1;
        }
        count
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let top = self
            .max_backups
            .unwrap_or_else(|| self.existing_backups() + 1);

        // Удаляем самый старый
        let _ = fs::remove_file(self.backup_path(top));

        // Сдвигаем файлы: .2 → .3, .1 → .2
        for i in (1..top).rev() {
            let src = self.backup_path(i);
            if src.exists() {
                fs::rename(&src, self.backup_path(i + 1))?;
            }
        }

        // Хвост сверх лимита (остался от прежнего запуска с другим лимитом)
        if self.max_backups.is_some() {
            let mut i = top + 1;
            while self.backup_path(i).exists() {
                let _ = fs::remove_file(self.backup_path(i));
                i += 1;
            }
        }

        // Текущий файл → становится .1
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        self.size = 0;

        self.remove_expired();
        Ok(())
    }

    fn remove_expired(&mut self) {
        let Some(max_age) = self.max_age else {
            return;
        };
        let Some(cutoff) = Local::now().checked_sub_signed(max_age) else {
            return;
        };

        // Чем больше номер, тем старше копия: устаревшие идут хвостом
        let count = self.existing_backups();
        let first_expired = (1..=count).find(|&i| {
            fs::metadata(self.backup_path(i))
                .and_then(|m| m.modified())
                .map(|modified| DateTime::<Local>::from(modified) < cutoff)
                .unwrap_or(false)
        });

        if let Some(first) = first_expired {
            for i in first..=count {
                if let Err(e) = fs::remove_file(self.backup_path(i)) {
                    let msg = format!("Failed to remove expired log {}: {}", i, e);
                    self.log_to_system(&msg);
                }
            }
        }
    }

    #[cfg(target_os = "linux")]
    fn log_to_system(&mut self, msg: &str) {
        match self.system_logger {
            Some(ref mut logger) => {
                let _ = logger.err(msg);
            }
            None => eprintln!("{}", msg),
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn log_to_system(&mut self, msg: &str) {
        eprintln!("{}", msg);
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_size {
            if let Err(e) = self.rotate() {
                let msg = format!("Failed to rotate log {}: {}", self.path.display(), e);
                self.log_to_system(&msg);
                // Следующая попытка только после ещё max_size байт
                self.size = 0;
            }
        }

        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn line(i: usize) -> String {
        format!("line {:04} padding padding\n", i)
    }

    #[test]
    fn open_fails_without_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("app.log");
        assert!(RotatingWriter::new(&path, 10, 3, 7).is_err());
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        let mut writer = RotatingWriter::new(&path, 10, 3, 7).unwrap();
        writer.write_all(b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
        assert!(!writer.backup_path(1).exists());
    }

    #[test]
    fn rotates_when_size_exceeded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingWriter::with_limits(&path, 100, Some(3), None).unwrap();

        for i in 0..10 {
            writer.write_all(line(i).as_bytes()).unwrap();
        }

        assert!(path.exists());
        assert!(dir.path().join("app.log.1").exists());
        for file in [path.clone(), dir.path().join("app.log.1")] {
            assert!(fs::metadata(&file).unwrap().len() <= 100);
        }
        // Самая новая строка в текущем файле
        assert!(fs::read_to_string(&path).unwrap().contains("line 0009"));
    }

    #[test]
    fn keeps_at_most_max_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingWriter::with_limits(&path, 30, Some(2), None).unwrap();

        for i in 0..10 {
            writer.write_all(line(i).as_bytes()).unwrap();
        }

        assert!(dir.path().join("app.log.1").exists());
        assert!(dir.path().join("app.log.2").exists());
        assert!(!dir.path().join("app.log.3").exists());
        assert!(fs::read_to_string(dir.path().join("app.log.1"))
            .unwrap()
            .contains("line 0008"));
    }

    #[test]
    fn drops_backups_left_above_lower_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        for i in 1..=6 {
            fs::write(dir.path().join(format!("app.log.{}", i)), line(i)).unwrap();
        }
        fs::write(&path, line(0)).unwrap();

        let mut writer = RotatingWriter::with_limits(&path, 30, Some(2), None).unwrap();
        writer.write_all(line(7).as_bytes()).unwrap();

        let present: Vec<usize> = (1..=6)
            .filter(|i| dir.path().join(format!("app.log.{}", i)).exists())
            .collect();
        assert_eq!(present, [1, 2]);
        assert!(fs::read_to_string(&path).unwrap().contains("line 0007"));
    }

    #[test]
    fn failed_rotation_is_not_retried_on_every_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        // Непустой каталог на месте .1: rename текущего файла не проходит
        fs::create_dir(dir.path().join("app.log.1")).unwrap();
        fs::write(dir.path().join("app.log.1").join("keep"), "x").unwrap();

        let mut writer = RotatingWriter::with_limits(&path, 100, Some(1), None).unwrap();
        for i in 0..6 {
            writer.write_all(line(i).as_bytes()).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 6);
        assert!(writer.size < 100, "size = {}", writer.size);
        assert!(dir.path().join("app.log.1").join("keep").exists());
    }

    #[test]
    fn keeps_all_backups_when_unlimited() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingWriter::with_limits(&path, 30, None, None).unwrap();

        for i in 0..6 {
            writer.write_all(line(i).as_bytes()).unwrap();
        }

        assert_eq!(writer.existing_backups(), 5);
        assert!(fs::read_to_string(dir.path().join("app.log.5"))
            .unwrap()
            .contains("line 0000"));
    }

    #[test]
    fn removes_expired_backups_on_rotation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer =
            RotatingWriter::with_limits(&path, 30, Some(5), TimeDelta::try_days(7)).unwrap();

        for i in 0..3 {
            writer.write_all(line(i).as_bytes()).unwrap();
        }
        assert_eq!(writer.existing_backups(), 2);

        // .2 состарился
        let old = SystemTime::now() - Duration::from_secs(10 * 24 * 60 * 60);
        File::options()
            .write(true)
            .open(dir.path().join("app.log.2"))
            .unwrap()
            .set_modified(old)
            .unwrap();

        writer.write_all(line(3).as_bytes()).unwrap();

        // .2 → .3 при сдвиге, затем удалён как устаревший
        assert_eq!(writer.existing_backups(), 2);
        assert!(!dir.path().join("app.log.3").exists());
    }

    #[test]
    fn non_positive_limits_fall_back() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingWriter::new(dir.path().join("app.log"), -1, -1, -1).unwrap();
        assert_eq!(writer.max_size, 100 * RotatingWriter::MEGABYTE);
        assert_eq!(writer.max_backups, None);
        assert_eq!(writer.max_age, None);
    }
}
