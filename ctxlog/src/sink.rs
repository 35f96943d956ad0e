use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::format::timestamp;

// ===== Раздвоение вывода =====

/// Пишет каждый буфер в оба приёмника: сначала в `first`, затем в `second`.
/// Ошибка первого не мешает записи во второй.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Tee { first, second }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let first = self.first.write_all(buf);
        self.second.write_all(buf)?;
        first.map(|_| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let first = self.first.flush();
        self.second.flush()?;
        first
    }
}

// ===== Построчный приёмник =====

/// Общий приёмник строк. Каждая строка уходит одним `write_all` под мьютексом,
/// поэтому строки из разных потоков не перемешиваются.
pub struct LineSink {
    stamped: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl LineSink {
    /// Приёмник сам добавляет метку времени в начало строки.
    pub fn stamped<W: Write + Send + 'static>(out: W) -> Self {
        LineSink {
            stamped: true,
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Строка пишется как есть.
    pub fn plain<W: Write + Send + 'static>(out: W) -> Self {
        LineSink {
            stamped: false,
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);

        let mut buf = String::with_capacity(line.len() + 21);
        if self.stamped {
            buf.push_str(&timestamp());
            buf.push(' ');
        }
        buf.push_str(line);
        if !line.ends_with('\n') {
            buf.push('\n');
        }

        out.write_all(buf.as_bytes())?;
        out.flush()
    }
}

impl fmt::Debug for LineSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSink")
            .field("stamped", &self.stamped)
            .finish_non_exhaustive()
    }
}
