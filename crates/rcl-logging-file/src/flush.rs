//! Background flushing of a sink on a fixed period.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::trace;

use crate::sink::Sink;

/// Flushes a sink every `interval` until stopped or dropped.
pub struct PeriodicFlusher {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicFlusher {
    pub fn spawn(sink: Arc<dyn Sink>, interval: Duration) -> io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("rcl-logging-flush".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = sink.flush() {
                            trace!(error = %e, "Periodic flush failed");
                        }
                    }
                    // Explicit stop or the owner went away
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PeriodicFlusher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        flushes: AtomicUsize,
        path: PathBuf,
    }

    impl Sink for CountingSink {
        fn write_line(&self, _msg: &str) -> io::Result<()> {
            Ok(())
        }

        fn flush(&self) -> io::Result<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    #[test]
    fn test_flushes_periodically_and_stops() {
        let sink = Arc::new(CountingSink {
            flushes: AtomicUsize::new(0),
            path: PathBuf::from("counting"),
        });

        let mut flusher = PeriodicFlusher::spawn(sink.clone(), Duration::from_millis(10)).unwrap();
        thread::sleep(Duration::from_millis(100));
        flusher.stop();

        let after_stop = sink.flushes.load(Ordering::SeqCst);
        assert!(after_stop >= 1, "expected at least one periodic flush");

        thread::sleep(Duration::from_millis(50));
        assert_eq!(sink.flushes.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let sink = Arc::new(CountingSink {
            flushes: AtomicUsize::new(0),
            path: PathBuf::from("counting"),
        });

        let mut flusher = PeriodicFlusher::spawn(sink, Duration::from_secs(60)).unwrap();
        flusher.stop();
        flusher.stop();
    }
}
