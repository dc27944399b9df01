//! Terminal renderers for progress fractions received from a worker thread.

use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressStyle};
use nsptools_core::ProgressSink;

const BAR_STEPS: u64 = 1000;

/// Prints `\rProgress: NN%`, only when the integer percentage changes.
pub struct ConsolePrinter<W: Write + Send> {
    out: W,
    label: &'static str,
    last: Option<u32>,
}

impl<W: Write + Send> ConsolePrinter<W> {
    pub fn new(out: W, label: &'static str) -> Self {
        Self {
            out,
            label,
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ProgressSink for ConsolePrinter<W> {
    fn on_progress(&mut self, fraction: f64) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0) as u32;
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        // Rendering failures must not reach the transfer.
        let _ = write!(self.out, "\rProgress: {percent}%");
        if percent == 100 {
            let _ = writeln!(self.out, "\n{} completed.", self.label);
        }
        let _ = self.out.flush();
    }
}

pub enum ProgressView {
    Plain(ConsolePrinter<io::Stdout>),
    Bar(ProgressBar),
}

impl ProgressView {
    pub fn new(plain: bool, label: &'static str) -> Self {
        if plain {
            return ProgressView::Plain(ConsolePrinter::new(io::stdout(), label));
        }
        let bar = ProgressBar::new(BAR_STEPS);
        let style = ProgressStyle::with_template(
            "{msg} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(label);
        ProgressView::Bar(bar)
    }

    pub fn finish(self, ok: bool) {
        match self {
            ProgressView::Plain(mut p) => {
                if !ok {
                    let _ = writeln!(p.out);
                }
            }
            ProgressView::Bar(bar) if ok => bar.finish_with_message("done"),
            ProgressView::Bar(bar) => bar.abandon_with_message("failed"),
        }
    }
}

impl ProgressSink for ProgressView {
    fn on_progress(&mut self, fraction: f64) {
        match self {
            ProgressView::Plain(p) => p.on_progress(fraction),
            ProgressView::Bar(bar) => {
                bar.set_position((fraction.clamp(0.0, 1.0) * BAR_STEPS as f64) as u64)
            }
        }
    }
}
