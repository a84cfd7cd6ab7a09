//! Progress reporting and cooperative cancellation for engine calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives progress while an engine call runs.
///
/// Called synchronously on the thread running the engine.
pub trait Progress {
    /// Percentage complete, 0 to 100
    fn on_progress(&mut self, _percent: u32) {}

    fn on_status(&mut self, _status: &str) {}
}

/// Ignores all progress
impl Progress for () {}

/// Forwards progress to the `log` facade
#[derive(Debug, Default)]
pub struct LogProgress {
    last_percent: Option<u32>,
}

impl Progress for LogProgress {
    fn on_progress(&mut self, percent: u32) {
        // Bands report far more often than the percentage moves
        if self.last_percent != Some(percent) {
            log::info!("{}%", percent);
            self.last_percent = Some(percent);
        }
    }

    fn on_status(&mut self, status: &str) {
        log::debug!("{}", status);
    }
}

/// Cancellation request for a single engine call.
///
/// Clones share the flag, so one clone can be handed to another thread
/// while the engine polls the other. The engine checks once per band; the
/// request is consumed when observed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    requested: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// True once after `cancel`, then false until the next request.
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

/// Percentage for item `index` of roughly `total`, mapped into `from..=to`.
pub(crate) fn band_percent(index: usize, total: usize, from: u32, to: u32) -> u32 {
    let total = total.max(1) as u64;
    let span = (to - from) as u64;
    let percent = from as u64 + span * index as u64 / total;
    percent.min(to as u64) as u32
}

/// Report progress for one band
pub(crate) fn report_band(
    progress: &mut dyn Progress,
    index: usize,
    total: usize,
    from: u32,
    to: u32,
) {
    progress.on_status(&format!("Processing band {} of {}", index, total));
    progress.on_progress(band_percent(index, total, from, to));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_consumed_once() {
        let token = CancelToken::new();
        assert!(!token.take());
        token.clone().cancel();
        assert!(token.take());
        assert!(!token.take());
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.take());
    }

    #[test]
    fn test_band_percent() {
        assert_eq!(band_percent(0, 100, 5, 93), 5);
        assert_eq!(band_percent(50, 100, 5, 93), 49);
        assert_eq!(band_percent(100, 100, 5, 93), 93);
        // Estimates can run short, never overshoot the phase
        assert_eq!(band_percent(150, 100, 5, 93), 93);
        assert_eq!(band_percent(3, 0, 0, 100), 100);
    }
}
