use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ===== Значения по умолчанию =====

pub const DEFAULT_MAX_SIZE_MB: i64 = 10;
pub const DEFAULT_MAX_BACKUPS: i64 = 3;
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

// ===== Конфигурация =====

/// Итоговая конфигурация логгера. Получается только через [`ConfigBuilder::build`]
/// (или десериализацию с последующим `build`), после сборки не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    log_path: PathBuf,
    #[serde(default)]
    max_size_mb: i64,
    #[serde(default)]
    max_backups: i64,
    #[serde(default)]
    max_age_days: i64,
    #[serde(default)]
    include_log_name: bool,
    #[serde(default)]
    capture_stderr: bool,
}

impl Config {
    pub fn builder<P: AsRef<Path>>(log_path: P) -> ConfigBuilder {
        with_config(log_path)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Порог ротации в мегабайтах.
    pub fn max_size_mb(&self) -> i64 {
        self.max_size_mb
    }

    pub fn max_backups(&self) -> i64 {
        self.max_backups
    }

    /// Максимальный возраст резервных копий в днях.
    pub fn max_age_days(&self) -> i64 {
        self.max_age_days
    }

    pub fn include_log_name(&self) -> bool {
        self.include_log_name
    }

    pub fn capture_stderr(&self) -> bool {
        self.capture_stderr
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{path={} max_size_mb={} max_backups={} max_age_days={} log_name={} capture_stderr={}}}",
            self.log_path.display(),
            self.max_size_mb,
            self.max_backups,
            self.max_age_days,
            self.include_log_name,
            self.capture_stderr,
        )
    }
}

// ===== Билдер =====

/// Изменяемая заготовка конфигурации. Сеттеры ничего не проверяют:
/// отрицательные значения доходят до `build` как есть.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

/// Создаёт билдер, в котором задан только путь к файлу.
pub fn with_config<P: AsRef<Path>>(log_path: P) -> ConfigBuilder {
    ConfigBuilder {
        config: Config {
            log_path: log_path.as_ref().to_path_buf(),
            max_size_mb: 0,
            max_backups: 0,
            max_age_days: 0,
            include_log_name: false,
            capture_stderr: false,
        },
    }
}

impl ConfigBuilder {
    pub fn with_max_size(mut self, megabytes: i64) -> Self {
        self.config.max_size_mb = megabytes;
        self
    }

    pub fn with_max_age(mut self, days: i64) -> Self {
        self.config.max_age_days = days;
        self
    }

    pub fn with_max_backups(mut self, count: i64) -> Self {
        self.config.max_backups = count;
        self
    }

    pub fn with_log_name(mut self, enabled: bool) -> Self {
        self.config.include_log_name = enabled;
        self
    }

    /// Перенаправлять ли stderr процесса в файл лога (только unix).
    pub fn with_capture_stderr(mut self, enabled: bool) -> Self {
        self.config.capture_stderr = enabled;
        self
    }

    /// Копирует поля и подставляет значения по умолчанию вместо нулей.
    pub fn build(&self) -> Config {
        let c = &self.config;
        Config {
            log_path: c.log_path.clone(),
            max_size_mb: or_default(c.max_size_mb, DEFAULT_MAX_SIZE_MB),
            max_backups: or_default(c.max_backups, DEFAULT_MAX_BACKUPS),
            max_age_days: or_default(c.max_age_days, DEFAULT_MAX_AGE_DAYS),
            include_log_name: c.include_log_name,
            capture_stderr: c.capture_stderr,
        }
    }
}

// Десериализованная конфигурация проходит через билдер ради умолчаний
impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        ConfigBuilder { config }
    }
}

fn or_default(value: i64, default: i64) -> i64 {
    if value == 0 {
        default
    } else {
        value
    }
}
