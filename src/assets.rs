//! Background asset loading polled from the frame loop.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::task::Poll;
use std::thread;

use tracing::{info, warn};

use crate::error::ResourceLoadError;

/// A load running on its own thread. The frame loop polls it once per tick and
/// never blocks on it.
pub struct PendingLoad<T> {
    label: String,
    receiver: Receiver<Result<T, ResourceLoadError>>,
}

impl<T: Send + 'static> PendingLoad<T> {
    pub fn spawn<F>(label: impl Into<String>, job: F) -> Self
    where
        F: FnOnce() -> Result<T, ResourceLoadError> + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = mpsc::channel();
        let job_sender = sender.clone();
        let spawned = thread::Builder::new()
            .name(format!("load-{label}"))
            .spawn(move || {
                // The receiver may be gone if the game stopped; nothing to report then.
                let _ = job_sender.send(job());
            });
        if let Err(err) = spawned {
            warn!("could not spawn loader thread for {label}: {err}");
            let _ = sender.send(Err(ResourceLoadError::LoaderVanished));
        }
        info!("loading {label}");
        Self { label, receiver }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `Ready` exactly once; polling again after that reports a vanished loader.
    pub fn poll(&mut self) -> Poll<Result<T, ResourceLoadError>> {
        match self.receiver.try_recv() {
            Ok(result) => Poll::Ready(result),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(Err(ResourceLoadError::LoaderVanished)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    use super::*;

    fn wait<T: Send + 'static>(load: &mut PendingLoad<T>) -> Result<T, ResourceLoadError> {
        for _ in 0..500 {
            if let Poll::Ready(result) = load.poll() {
                return result;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("load {} never finished", load.label());
    }

    #[test]
    fn pending_until_the_job_finishes() {
        let (release, gate) = std_mpsc::channel::<()>();
        let mut load = PendingLoad::spawn("gated", move || {
            gate.recv().map_err(|_| ResourceLoadError::LoaderVanished)?;
            Ok(7)
        });
        assert!(load.poll().is_pending());
        release.send(()).expect("release");
        assert_eq!(wait(&mut load).expect("value"), 7);
    }

    #[test]
    fn errors_are_delivered() {
        let mut load: PendingLoad<()> = PendingLoad::spawn("broken", || {
            Err(ResourceLoadError::InvalidData {
                reason: "nope".to_string(),
            })
        });
        let err = wait(&mut load).unwrap_err();
        assert!(matches!(err, ResourceLoadError::InvalidData { .. }));
    }

    #[test]
    fn panicking_job_reports_vanished_loader() {
        let mut load: PendingLoad<u8> = PendingLoad::spawn("panics", || panic!("boom"));
        let err = wait(&mut load).unwrap_err();
        assert!(matches!(err, ResourceLoadError::LoaderVanished));
    }
}
