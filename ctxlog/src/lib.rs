//! # ctxlog
//!
//! Логгер с ротацией файла и дублированием в консоль. Поля пользователя,
//! идентификатора запроса и имени лога берутся из [`LogContext`].
//! Если файл открыть нельзя, логгер переходит на вывод только в консоль.
//!
//! ```no_run
//! use ctxlog::{info, with_config, LogContext, Logger};
//!
//! let logger = Logger::new(&with_config("app.log").with_max_backups(8).build())
//!     .unwrap_or_else(|fallback| fallback.into_logger());
//!
//! let ctx = LogContext::background().with_user("Alice").with_request_id("r-1");
//! info!(logger, &ctx, "started in {} ms", 12);
//! ```

pub mod backend;
pub mod capture;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod logger;
pub mod rotation;
pub mod sink;

pub use backend::{FileLogger, Log, PrintLogger};
pub use config::{with_config, Config, ConfigBuilder};
pub use context::{ContextKey, LogContext};
pub use error::Error;
pub use format::{Level, LineFormatter};
pub use logger::{Fallback, Logger};
pub use rotation::RotatingWriter;

// ===== Макросы =====

#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr, $($arg:tt)*) => {{
        use $crate::Log as _;
        $logger.info($ctx, std::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $ctx:expr, $($arg:tt)*) => {{
        use $crate::Log as _;
        $logger.warning($ctx, std::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr, $($arg:tt)*) => {{
        use $crate::Log as _;
        $logger.debug($ctx, std::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr, $($arg:tt)*) => {{
        use $crate::Log as _;
        $logger.error($ctx, std::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! panicf {
    ($logger:expr, $ctx:expr, $($arg:tt)*) => {{
        use $crate::Log as _;
        $logger.panicf($ctx, std::format_args!($($arg)*))
    }};
}
