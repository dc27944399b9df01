use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{NspError, Result};
use crate::naming::PartNamer;
use crate::options::{ExistingParts, SplitOptions};
use crate::progress::{ProgressSink, Tracker};
use crate::source::{PartFile, SourceFile};

#[derive(Clone, Debug)]
pub struct SplitReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    /// In ascending index order, starting at 1.
    pub parts: Vec<PartFile>,
    pub total_bytes: u64,
}

/// Writes one source file out as `<base>_part_<N><ext>` files of at most `part_size` bytes.
///
/// All preconditions are checked by [`Splitter::new`]; [`Splitter::split`] consumes the
/// splitter, so each instance performs exactly one run.
pub struct Splitter {
    source: SourceFile,
    output_dir: PathBuf,
    namer: PartNamer,
    opts: SplitOptions,
    stale: Vec<PathBuf>,
    sink: Option<Box<dyn ProgressSink>>,
}

impl Splitter {
    pub fn new(path: &Path, opts: SplitOptions) -> Result<Self> {
        opts.validate()?;
        let source = SourceFile::open(path)?;
        if source.len() <= opts.min_source_size {
            return Err(NspError::FileTooSmall {
                path: source.path().to_path_buf(),
                size: source.len(),
                min: opts.min_source_size,
            });
        }

        let output_dir = source.parent().join(&opts.output_dir_name);
        fs::create_dir_all(&output_dir)?;

        let namer = PartNamer::for_source(&source.file_name());
        let stale = stale_parts(&output_dir, &namer)?;
        if !stale.is_empty() && opts.on_existing == ExistingParts::Refuse {
            return Err(NspError::StaleParts {
                dir: output_dir,
                count: stale.len(),
            });
        }

        Ok(Self {
            source,
            output_dir,
            namer,
            opts,
            stale,
            sink: None,
        })
    }

    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn split(self) -> Result<SplitReport> {
        let Splitter {
            source,
            output_dir,
            namer,
            opts,
            stale,
            sink,
        } = self;

        for p in &stale {
            debug!(path = %p.display(), "removing stale part");
            fs::remove_file(p)?;
        }

        info!(
            source = %source.path().display(),
            bytes = source.len(),
            part_size = opts.part_size,
            "splitting"
        );

        let part_size = opts.part_size;
        let mut input = File::open(source.path())?;
        let mut tracker = Tracker::new(sink, source.len());
        let mut buf = vec![0u8; opts.buffer_size];
        let mut parts: Vec<PartFile> = Vec::new();
        let mut current: Option<(File, PartFile)> = None;

        loop {
            // Never read past the end of the open part, so every full part is exact.
            let room = match &current {
                Some((_, p)) if p.len < part_size => part_size - p.len,
                _ => part_size,
            };
            let want = buf.len().min(usize::try_from(room).unwrap_or(usize::MAX));
            let n = match input.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            // Parts are opened lazily, only once there are bytes for them.
            let (file, part) = match current.take() {
                Some((f, p)) if p.len < part_size => current.insert((f, p)),
                prev => {
                    if let Some((f, p)) = prev {
                        close_part(f, &p)?;
                        parts.push(p);
                    }
                    let index = parts.len() as u64 + 1;
                    let path = output_dir.join(namer.name(index));
                    let f = File::create(&path)?;
                    debug!(index, path = %path.display(), "opened part");
                    current.insert((f, PartFile { path, index, len: 0 }))
                }
            };

            file.write_all(&buf[..n])?;
            part.len += n as u64;
            tracker.advance(n as u64);
        }

        if let Some((f, p)) = current.take() {
            close_part(f, &p)?;
            parts.push(p);
        }

        let total_bytes = tracker.done();
        if total_bytes != source.len() {
            warn!(
                expected = source.len(),
                actual = total_bytes,
                "source changed size during split"
            );
        }
        tracker.finish();

        info!(parts = parts.len(), bytes = total_bytes, "split complete");
        Ok(SplitReport {
            source: source.path().to_path_buf(),
            output_dir,
            parts,
            total_bytes,
        })
    }
}

fn close_part(mut f: File, part: &PartFile) -> Result<()> {
    f.flush()?;
    debug!(index = part.index, bytes = part.len, "closed part");
    Ok(())
}

/// Files in `dir` that look like an earlier split of the same source.
fn stale_parts(dir: &Path, namer: &PartNamer) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for e in WalkDir::new(dir).follow_links(true).min_depth(1).max_depth(1) {
        let e = e?;
        if !e.file_type().is_file() {
            continue;
        }
        let is_ours = namer.index_of(&e.file_name().to_string_lossy()).is_some();
        if is_ours {
            out.push(e.into_path());
        }
    }
    Ok(out)
}
