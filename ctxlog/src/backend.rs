use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use crate::context::LogContext;
use crate::format::{timestamp, Level, LineFormatter};
use crate::rotation::RotatingWriter;
use crate::sink::{LineSink, Tee};

// ===== Общий набор операций =====

/// Операции, одинаковые для обоих бэкендов. Фильтрации по уровню нет:
/// каждый вызов пишет строку.
pub trait Log {
    fn log(&self, ctx: &LogContext, level: Level, args: fmt::Arguments<'_>);

    fn info(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.log(ctx, Level::Info, args)
    }

    fn warning(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.log(ctx, Level::Warning, args)
    }

    fn debug(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.log(ctx, Level::Debug, args)
    }

    fn error(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.log(ctx, Level::Error, args)
    }

    /// Пишет строку `ERROR` и только после этого паникует с тем же сообщением.
    fn panicf(&self, ctx: &LogContext, args: fmt::Arguments<'_>) -> ! {
        let message = fmt::format(args);
        self.error(ctx, format_args!("{}", message));
        panic!("{}", message)
    }
}

// ===== Файловый бэкенд =====

/// Пишет в ротирующий файл и в stdout. Метку времени ставит приёмник.
#[derive(Clone)]
pub struct FileLogger {
    sink: Arc<LineSink>,
    formatter: LineFormatter,
    log_file: Option<Arc<File>>,
}

impl FileLogger {
    pub fn new(writer: RotatingWriter, include_log_name: bool) -> io::Result<Self> {
        let log_file = writer.file().try_clone()?;
        let mut logger = Self::with_writer(Tee::new(io::stdout(), writer), include_log_name);
        logger.log_file = Some(Arc::new(log_file));
        Ok(logger)
    }

    /// Произвольный приёмник вместо файла и консоли.
    pub fn with_writer<W: Write + Send + 'static>(out: W, include_log_name: bool) -> Self {
        FileLogger {
            sink: Arc::new(LineSink::stamped(out)),
            formatter: LineFormatter::new(include_log_name),
            log_file: None,
        }
    }

    pub fn include_log_name(&self) -> bool {
        self.formatter.include_log_name()
    }

    pub(crate) fn log_file(&self) -> Option<&File> {
        self.log_file.as_deref()
    }
}

impl Log for FileLogger {
    fn log(&self, ctx: &LogContext, level: Level, args: fmt::Arguments<'_>) {
        let line = self.formatter.format("", ctx, level, &fmt::format(args));
        let _ = self.sink.write_line(&line);
    }
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("formatter", &self.formatter)
            .field("has_log_file", &self.log_file.is_some())
            .finish()
    }
}

// ===== Консольный бэкенд =====

/// Только stdout. Резервный вариант, когда файл открыть не удалось.
#[derive(Debug, Clone)]
pub struct PrintLogger {
    sink: Arc<LineSink>,
    formatter: LineFormatter,
}

impl PrintLogger {
    pub fn new(include_log_name: bool) -> Self {
        Self::with_writer(io::stdout(), include_log_name)
    }

    pub fn with_writer<W: Write + Send + 'static>(out: W, include_log_name: bool) -> Self {
        PrintLogger {
            sink: Arc::new(LineSink::plain(out)),
            formatter: LineFormatter::new(include_log_name),
        }
    }

    pub fn include_log_name(&self) -> bool {
        self.formatter.include_log_name()
    }
}

impl Log for PrintLogger {
    fn log(&self, ctx: &LogContext, level: Level, args: fmt::Arguments<'_>) {
        // Внешнего штампа времени нет, ставим свой
        let prefix = format!("{} ", timestamp());
        let line = self.formatter.format(&prefix, ctx, level, &fmt::format(args));
        let _ = self.sink.write_line(&line);
    }
}
