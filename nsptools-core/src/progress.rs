//! Fractional progress reporting shared by split and combine.
//!
//! Sinks are called synchronously once per buffer transfer. The core never
//! throttles; a sink that renders to a terminal or UI should debounce itself.

use std::sync::mpsc::Sender;

pub trait ProgressSink: Send {
    /// `fraction` is in `[0.0, 1.0]` and never decreases within one run.
    fn on_progress(&mut self, fraction: f64);
}

impl<F: FnMut(f64) + Send> ProgressSink for F {
    fn on_progress(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Forwards fractions to another thread. A hung-up receiver is ignored so the
/// transfer keeps going.
pub struct ChannelSink(pub Sender<f64>);

impl ProgressSink for ChannelSink {
    fn on_progress(&mut self, fraction: f64) {
        let _ = self.0.send(fraction);
    }
}

/// Largest fraction reported before a run has finished.
pub(crate) const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Byte accounting for one run.
pub(crate) struct Tracker {
    sink: Option<Box<dyn ProgressSink>>,
    total: u64,
    done: u64,
    last: Option<f64>,
}

impl Tracker {
    pub(crate) fn new(sink: Option<Box<dyn ProgressSink>>, total: u64) -> Self {
        Self {
            sink,
            total,
            done: 0,
            last: None,
        }
    }

    pub(crate) fn done(&self) -> u64 {
        self.done
    }

    pub(crate) fn advance(&mut self, n: u64) {
        self.done += n;
        if self.total > 0 {
            // 1.0 is reserved for finish().
            let f = (self.done as f64 / self.total as f64).min(BELOW_ONE);
            self.emit(f);
        }
    }

    /// Called once the run has succeeded.
    pub(crate) fn finish(&mut self) {
        self.emit(1.0);
    }

    fn emit(&mut self, f: f64) {
        let f = match self.last {
            Some(prev) => f.max(prev),
            None => f,
        };
        self.last = Some(f);
        if let Some(sink) = self.sink.as_mut() {
            sink.on_progress(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (Box<dyn ProgressSink>, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        (Box::new(move |f: f64| s.lock().unwrap().push(f)), seen)
    }

    #[test]
    fn reports_each_advance_and_ends_at_one() {
        let (sink, seen) = recording();
        let mut t = Tracker::new(Some(sink), 4);
        t.advance(1);
        t.advance(3);
        t.finish();
        assert_eq!(*seen.lock().unwrap(), vec![0.25, BELOW_ONE, 1.0]);
        assert_eq!(t.done(), 4);
    }

    #[test]
    fn source_growing_mid_run_is_clamped() {
        let (sink, seen) = recording();
        let mut t = Tracker::new(Some(sink), 2);
        t.advance(1);
        t.advance(5);
        assert_eq!(*seen.lock().unwrap(), vec![0.5, BELOW_ONE]);
        t.finish();
        assert_eq!(*seen.lock().unwrap(), vec![0.5, BELOW_ONE, 1.0]);
    }

    #[test]
    fn short_run_still_finishes_at_one() {
        let (sink, seen) = recording();
        let mut t = Tracker::new(Some(sink), 10);
        t.advance(5);
        t.finish();
        assert_eq!(*seen.lock().unwrap(), vec![0.5, 1.0]);
    }

    #[test]
    fn empty_run_reports_single_completion() {
        let (sink, seen) = recording();
        let mut t = Tracker::new(Some(sink), 0);
        t.finish();
        assert_eq!(*seen.lock().unwrap(), vec![1.0]);
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut sink = ChannelSink(tx);
        sink.on_progress(0.5);
        assert_eq!(rx.recv().unwrap(), 0.5);
        drop(rx);
        sink.on_progress(1.0);
    }
}
