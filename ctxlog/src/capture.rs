//! Перенаправление stderr процесса в файл лога, чтобы паники из чужого кода
//! тоже попадали в файл.
//!
//! Побеждает последний логгер: stderr уходит в файл того, кто перенаправил
//! его последним. Повторный вызов для того же файла ничего не делает.

use once_cell::sync::Lazy;
use std::fs::File;
use std::sync::{Mutex, PoisonError};

use crate::error::Error;

// (устройство, inode) файла, в который сейчас идёт stderr
static REDIRECTED: Lazy<Mutex<Option<(u64, u64)>>> = Lazy::new(|| Mutex::new(None));

pub fn is_supported() -> bool {
    cfg!(unix)
}

pub fn is_redirected() -> bool {
    REDIRECTED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

#[cfg(unix)]
pub(crate) fn redirect_stderr(file: &File) -> Result<(), Error> {
    use std::io;
    use std::os::unix::fs::MetadataExt;
    use std::os::unix::io::AsRawFd;

    let meta = file.metadata().map_err(Error::Capture)?;
    let target = (meta.dev(), meta.ino());

    let mut current = REDIRECTED.lock().unwrap_or_else(PoisonError::into_inner);
    if *current == Some(target) {
        return Ok(());
    }

    // SAFETY: оба дескриптора открыты на время вызова
    let rc = unsafe { libc::dup2(file.as_raw_fd(), libc::STDERR_FILENO) };
    if rc == -1 {
        return Err(Error::Capture(io::Error::last_os_error()));
    }
    *current = Some(target);
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn redirect_stderr(_file: &File) -> Result<(), Error> {
    Err(Error::CaptureUnsupported)
}
