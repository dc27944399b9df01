use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NspError, Result};

/// An existing regular file, checked once at construction. Nothing is opened until a run starts.
#[derive(Clone, Debug)]
pub struct SourceFile {
    path: PathBuf,
    len: u64,
}

impl SourceFile {
    pub fn open(path: &Path) -> Result<Self> {
        let md = match fs::metadata(path) {
            Ok(md) if !md.is_dir() => md,
            Ok(_) => return Err(NspError::FileNotFound(path.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NspError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let path = fs::canonicalize(path)?;
        Ok(Self {
            path,
            len: md.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// One physical fragment of a split file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartFile {
    pub path: PathBuf,
    pub index: u64,
    pub len: u64,
}
