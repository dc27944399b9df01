use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{NspError, Result};
use crate::naming::{classify, has_xci_extension, parse_index};
use crate::options::CombineOptions;
use crate::progress::{ProgressSink, Tracker};
use crate::source::PartFile;

#[derive(Clone, Debug)]
pub struct CombineReport {
    pub output: PathBuf,
    /// Parts in the order they were appended, with the bytes actually copied from each.
    pub parts: Vec<PartFile>,
    pub total_bytes: u64,
}

/// Reassembles the part files found in one directory into `<dir>/output.<nsp|xci>`.
pub struct Combiner {
    dir: PathBuf,
    parts: Vec<PartFile>,
    output: PathBuf,
    opts: CombineOptions,
    sink: Option<Box<dyn ProgressSink>>,
}

impl Combiner {
    pub fn new(dir: &Path, opts: CombineOptions) -> Result<Self> {
        opts.validate()?;
        if !dir.is_dir() {
            return Err(NspError::InvalidDirectory(dir.to_path_buf()));
        }

        let parts = discover_parts(dir)?;
        let Some(first) = parts.first() else {
            return Err(NspError::NoPartsFound(dir.to_path_buf()));
        };

        let first_name = first
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = if has_xci_extension(&first_name) { "xci" } else { "nsp" };
        let output_name = format!("{}.{ext}", opts.output_stem);
        if classify(&output_name).is_some() {
            return Err(NspError::InvalidOptions(format!(
                "output name {output_name} would be picked up as a part"
            )));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            output: dir.join(output_name),
            parts,
            opts,
            sink: None,
        })
    }

    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Candidates in the order they will be concatenated.
    pub fn parts(&self) -> &[PartFile] {
        &self.parts
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn combine(self) -> Result<CombineReport> {
        let Combiner {
            dir,
            parts,
            output,
            opts,
            sink,
        } = self;

        // Sizes as seen at discovery; a part that vanished since fails when opened.
        let total: u64 = parts.iter().map(|p| p.len).sum();
        info!(
            dir = %dir.display(),
            parts = parts.len(),
            bytes = total,
            "combining"
        );

        let mut tracker = Tracker::new(sink, total);
        let mut buf = vec![0u8; opts.buffer_size];
        let mut out = File::create(&output)?;
        let mut copied = Vec::with_capacity(parts.len());

        for p in parts {
            let mut input = File::open(&p.path)?;
            let mut len = 0u64;
            loop {
                let n = match input.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                };
                out.write_all(&buf[..n])?;
                len += n as u64;
                tracker.advance(n as u64);
            }
            drop(input);
            debug!(index = p.index, bytes = len, path = %p.path.display(), "appended part");
            copied.push(PartFile { len, ..p });
        }
        out.flush()?;
        drop(out);

        let total_bytes = tracker.done();
        tracker.finish();
        info!(output = %output.display(), bytes = total_bytes, "combine complete");
        Ok(CombineReport {
            output,
            parts: copied,
            total_bytes,
        })
    }
}

/// List `dir` (non-recursively) for part files and order them by index.
///
/// Names matching neither accepted form are ignored. A name that matches a form
/// but whose index cannot be extracted, or two names sharing an index, fail the
/// whole discovery.
pub fn discover_parts(dir: &Path) -> Result<Vec<PartFile>> {
    let mut parts = Vec::new();
    let walk = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for e in walk {
        let e = e?;
        if !e.file_type().is_file() {
            continue;
        }
        // The grammar only pins the ASCII suffix, so a lossy name classifies the same.
        let name = e.file_name().to_string_lossy().into_owned();
        if classify(&name).is_none() {
            continue;
        }
        let index = parse_index(&name)?;
        let len = e.metadata()?.len();
        debug!(index, name = %name, "found part");
        parts.push(PartFile {
            path: e.into_path(),
            index,
            len,
        });
    }

    parts.sort_by_key(|p| p.index);

    for w in parts.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        if a.index == b.index {
            return Err(NspError::DuplicatePartIndex {
                index: a.index,
                first: a.path.display().to_string(),
                second: b.path.display().to_string(),
            });
        }
        if b.index != a.index + 1 {
            warn!(after = a.index, next = b.index, "gap in part numbering");
        }
    }
    Ok(parts)
}
