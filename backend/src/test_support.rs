//! Test utilities for the user service crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). It is
//! compiled for tests and when the `test-support` feature is enabled.

pub mod logs {
    //! Capture of JSON-formatted tracing output.

    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};

    use serde_json::Value;
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory sink for tracing events emitted on the current thread.
    ///
    /// # Examples
    /// ```
    /// use user_service::test_support::logs::LogCapture;
    ///
    /// let capture = LogCapture::new();
    /// {
    ///     let _guard = capture.install();
    ///     tracing::info!(answer = 42, "hello");
    /// }
    /// assert_eq!(capture.events().len(), 1);
    /// ```
    #[derive(Clone, Default)]
    pub struct LogCapture {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl LogCapture {
        /// Create an empty capture.
        pub fn new() -> Self {
            Self::default()
        }

        /// Route events to this capture until the guard drops.
        pub fn install(&self) -> DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_max_level(tracing::Level::TRACE)
                .with_writer(self.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        /// Everything written so far, as text.
        pub fn contents(&self) -> String {
            let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&buffer).into_owned()
        }

        /// Captured events, one JSON object per line.
        pub fn events(&self) -> Vec<Value> {
            self.contents()
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| serde_json::from_str(line).unwrap_or(Value::String(line.to_owned())))
                .collect()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
