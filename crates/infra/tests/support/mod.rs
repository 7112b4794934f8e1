use std::io;
use std::sync::{Arc, Mutex};

use osabridge_domain::RunnerConfig;
use osabridge_infra::OsascriptRunner;
use tracing_subscriber::fmt::MakeWriter;

/// Runner that pipes scripts into `/bin/sh`, which reads its program from
/// stdin the same way `osascript` does.
pub fn sh_runner(timeout_ms: u64) -> OsascriptRunner {
    OsascriptRunner::new(RunnerConfig { timeout_ms, ..RunnerConfig::with_interpreter("sh") })
        .expect("sh runner config should be valid")
}

/// Captures formatted tracing output so tests can assert on emitted events.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Run `f` with a subscriber that writes into this capture.
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

pub struct LogWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().expect("log buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter { buffer: Arc::clone(&self.buffer) }
    }
}
