//! Console backend.

use std::fmt;
use std::io::{self, Write};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Notifier;
use crate::error::NotifyError;

/// Writes `[title] message` lines, to standard output by default.
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Write notifications to `writer` instead of standard output.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleNotifier").finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut out = self.out.lock();
        writeln!(out, "[{}] {}", title, message)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_console_format() {
        let buf = SharedBuf::default();
        let notifier = ConsoleNotifier::with_writer(buf.clone());

        notifier
            .notify("🔴 Internet Outage", "Google is unreachable from mci")
            .await
            .unwrap();
        notifier.notify("title", "second").await.unwrap();

        let written = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(
            written,
            "[🔴 Internet Outage] Google is unreachable from mci\n[title] second\n"
        );
    }

    #[tokio::test]
    async fn test_console_write_error() {
        let notifier = ConsoleNotifier::with_writer(BrokenPipe);
        let err = notifier.notify("t", "m").await.unwrap_err();
        assert!(matches!(err, NotifyError::Console(_)));
    }
}
