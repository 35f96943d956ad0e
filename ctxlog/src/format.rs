use chrono::Local;

use crate::context::{ContextKey, LogContext};

// ===== Уровни =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Debug,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Debug => "DEBUG",
            Level::Error => "ERROR",
        }
    }
}

// ===== Метка времени =====

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Текущее локальное время в виде `2024/05/01 12:00:00`.
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ===== Форматирование строки =====

/// Собирает строку `<prefix>|<user>|<reqID>|<LEVEL>|[<logName>|]<message>`.
///
/// Раскладка выбирается один раз при создании логгера. Разделитель `|`
/// внутри сообщения не экранируется.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormatter {
    include_log_name: bool,
}

impl LineFormatter {
    pub fn new(include_log_name: bool) -> Self {
        LineFormatter { include_log_name }
    }

    pub fn include_log_name(&self) -> bool {
        self.include_log_name
    }

    pub fn format(&self, prefix: &str, ctx: &LogContext, level: Level, message: &str) -> String {
        let user = ctx.field(ContextKey::User).to_lowercase();
        let request_id = ctx.field(ContextKey::RequestId);

        if self.include_log_name {
            format!(
                "{}|{}|{}|{}|{}|{}",
                prefix,
                user,
                request_id,
                level.as_str(),
                ctx.field(ContextKey::LogName),
                message
            )
        } else {
            format!("{}|{}|{}|{}|{}", prefix, user, request_id, level.as_str(), message)
        }
    }
}
