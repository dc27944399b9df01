use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::info;
use nsptools_core::progress::ChannelSink;
use nsptools_core::{Combiner, ExistingParts, ProgressSink, Splitter};

use crate::config::{Config, mib_to_bytes};
use crate::progress::ProgressView;

/// Runs `job` on a worker thread and renders its progress here until it returns.
fn run_with_progress<T, F>(mut view: ProgressView, job: F) -> Result<T>
where
    T: Send,
    F: FnOnce(ChannelSink) -> nsptools_core::error::Result<T> + Send,
{
    let (tx, rx) = mpsc::channel();
    thread::scope(|s| {
        let worker = s.spawn(move || job(ChannelSink(tx)));
        // Ends once the worker drops its sender.
        for fraction in rx {
            view.on_progress(fraction);
        }
        let res = worker
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))?;
        view.finish(res.is_ok());
        Ok(res?)
    })
}

pub fn handle_split(
    file: PathBuf,
    part_size_mib: Option<u64>,
    overwrite: bool,
    config: &Config,
    plain: bool,
) -> Result<()> {
    let mut opts = config.split_options()?;
    if let Some(mib) = part_size_mib {
        opts.part_size = mib_to_bytes(mib)?;
    }
    if overwrite {
        opts.on_existing = ExistingParts::Overwrite;
    }

    let splitter = Splitter::new(&file, opts)
        .with_context(|| format!("cannot split {}", file.display()))?;
    let view = ProgressView::new(plain, "File splitting");
    let report = run_with_progress(view, move |sink| splitter.with_progress(sink).split())
        .with_context(|| format!("splitting {} failed", file.display()))?;

    for p in &report.parts {
        println!("{}  {} bytes", p.path.display(), p.len);
    }
    info!(
        parts = report.parts.len(),
        bytes = report.total_bytes,
        dir = %report.output_dir.display(),
        "split finished"
    );
    Ok(())
}

pub fn handle_combine(dir: PathBuf, config: &Config, plain: bool) -> Result<()> {
    let combiner = Combiner::new(&dir, config.combine_options()?)
        .with_context(|| format!("cannot combine {}", dir.display()))?;
    let view = ProgressView::new(plain, "File combining");
    let report = run_with_progress(view, move |sink| combiner.with_progress(sink).combine())
        .with_context(|| format!("combining {} failed", dir.display()))?;

    println!("{}", report.output.display());
    info!(
        parts = report.parts.len(),
        bytes = report.total_bytes,
        output = %report.output.display(),
        "combine finished"
    );
    Ok(())
}

pub fn handle_parts(dir: PathBuf, config: &Config) -> Result<()> {
    let combiner = Combiner::new(&dir, config.combine_options()?)
        .with_context(|| format!("cannot scan {}", dir.display()))?;
    let mut total = 0u64;
    for p in combiner.parts() {
        total += p.len;
        println!("#{:<4} {:>14} bytes  {}", p.index, p.len, p.path.display());
    }
    println!(
        "{} part(s), {} bytes -> {}",
        combiner.parts().len(),
        total,
        combiner.output_path().display()
    );
    Ok(())
}
