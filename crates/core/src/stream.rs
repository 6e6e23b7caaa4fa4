use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::error::PassError;

/// Shared output handle handed to the manager and to every pass instance.
#[derive(Clone)]
pub struct PassStream {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl PassStream {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// In-memory stream plus a handle to read back what was written.
    pub fn buffer() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    pub fn write_str(&self, text: &str) -> Result<(), PassError> {
        let mut out = self
            .inner
            .lock()
            .map_err(|e| PassError::LockPoisoned(format!("pass stream: {}", e)))?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn flush(&self) -> Result<(), PassError> {
        let mut out = self
            .inner
            .lock()
            .map_err(|e| PassError::LockPoisoned(format!("pass stream: {}", e)))?;
        out.flush()?;
        Ok(())
    }
}

impl Default for PassStream {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Clonable in-memory writer, mostly for tests and captured output.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        match self.bytes.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
