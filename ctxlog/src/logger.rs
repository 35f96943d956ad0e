use std::fmt;
use std::io::{self, Write};

use crate::backend::{FileLogger, Log, PrintLogger};
use crate::capture;
use crate::config::Config;
use crate::context::LogContext;
use crate::error::Error;
use crate::format::Level;
use crate::rotation::RotatingWriter;

// ===== Фасад =====

/// Логгер, за которым стоит один из двух бэкендов. Бэкенд выбирается
/// в [`Logger::new`] и дальше не меняется. Клоны пишут в один приёмник.
#[derive(Debug, Clone)]
pub enum Logger {
    File(FileLogger),
    Print(PrintLogger),
}

/// Файл открыть не удалось. Внутри уже готовый консольный логгер.
#[derive(Debug, thiserror::Error)]
#[error("{source}; falling back to console logging")]
pub struct Fallback {
    logger: Logger,
    #[source]
    source: Error,
}

impl Fallback {
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn error(&self) -> &Error {
        &self.source
    }

    pub fn into_logger(self) -> Logger {
        self.logger
    }
}

impl Logger {
    /// Открывает файл лога с ротацией и дублированием в stdout.
    ///
    /// Если файл не открывается, печатает предупреждение в консоль и
    /// возвращает [`Fallback`] с консольным логгером внутри.
    pub fn new(config: &Config) -> Result<Logger, Fallback> {
        Self::new_with_console(config, &mut io::stdout())
    }

    /// Как [`Logger::new`], но предупреждение о переходе на консоль
    /// пишется в `console`.
    pub(crate) fn new_with_console<W: Write>(
        config: &Config,
        console: &mut W,
    ) -> Result<Logger, Fallback> {
        let file_logger = RotatingWriter::from_config(config)
            .and_then(|writer| FileLogger::new(writer, config.include_log_name()));

        let file_logger = match file_logger {
            Ok(l) => l,
            Err(source) => {
                let error = Error::Open {
                    path: config.log_path().to_path_buf(),
                    source,
                };
                let _ = writeln!(
                    console,
                    "Could not create/open log file - will use print logger, {}",
                    error
                );
                return Err(Fallback {
                    logger: Logger::print(config.include_log_name()),
                    source: error,
                });
            }
        };

        let logger = Logger::File(file_logger);
        let ctx = LogContext::background();
        logger.info(&ctx, format_args!("Initialized logger with configuration {}", config));

        if config.capture_stderr() {
            if let Err(e) = logger.capture_stderr() {
                logger.warning(&ctx, format_args!("stderr is not captured: {}", e));
            }
        }

        Ok(logger)
    }

    /// Консольный логгер без файла.
    pub fn print(include_log_name: bool) -> Logger {
        Logger::Print(PrintLogger::new(include_log_name))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Logger::File(_))
    }

    pub fn include_log_name(&self) -> bool {
        match self {
            Logger::File(l) => l.include_log_name(),
            Logger::Print(l) => l.include_log_name(),
        }
    }

    /// Дублирует stderr процесса в файл лога.
    ///
    /// Для консольного бэкенда и платформ без `dup2` возвращает
    /// [`Error::CaptureUnsupported`]. Если само перенаправление не удалось,
    /// ошибка пишется в лог и вызывающий поток паникует.
    pub fn capture_stderr(&self) -> Result<(), Error> {
        let file = match self {
            Logger::File(l) if capture::is_supported() => l.log_file(),
            _ => None,
        };
        let Some(file) = file else {
            return Err(Error::CaptureUnsupported);
        };

        if let Err(e) = capture::redirect_stderr(file) {
            self.panicf(&LogContext::background(), format_args!("panic {}", e));
        }
        Ok(())
    }
}

impl Log for Logger {
    fn log(&self, ctx: &LogContext, level: Level, args: fmt::Arguments<'_>) {
        match self {
            Logger::File(l) => l.log(ctx, level, args),
            Logger::Print(l) => l.log(ctx, level, args),
        }
    }
}

impl From<FileLogger> for Logger {
    fn from(l: FileLogger) -> Self {
        Logger::File(l)
    }
}

impl From<PrintLogger> for Logger {
    fn from(l: PrintLogger) -> Self {
        Logger::Print(l)
    }
}
