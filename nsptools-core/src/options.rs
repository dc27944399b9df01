use serde::{Deserialize, Serialize};

use crate::MIB;
use crate::error::{NspError, Result};

pub const DEFAULT_PART_SIZE: u64 = 4000 * MIB;
pub const DEFAULT_MIN_SOURCE_SIZE: u64 = 4000 * MIB;
pub const DEFAULT_BUFFER_SIZE: usize = 4 * MIB as usize;
pub const DEFAULT_OUTPUT_DIR: &str = "split_output";
pub const DEFAULT_OUTPUT_STEM: &str = "output";

/// What a split does when the output directory already holds parts of the same source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingParts {
    /// Fail at construction; nothing is touched.
    #[default]
    Refuse,
    /// Delete the stale parts before the first byte is written.
    Overwrite,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Maximum bytes per part; every part but the last is exactly this long.
    pub part_size: u64,
    /// Sources must be strictly larger than this to be split.
    pub min_source_size: u64,
    pub buffer_size: usize,
    /// Created next to the source file.
    pub output_dir_name: String,
    pub on_existing: ExistingParts,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            min_source_size: DEFAULT_MIN_SOURCE_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            on_existing: ExistingParts::Refuse,
        }
    }
}

impl SplitOptions {
    pub fn validate(&self) -> Result<()> {
        if self.part_size == 0 {
            return Err(NspError::InvalidOptions("part_size must be non-zero".into()));
        }
        if self.buffer_size == 0 {
            return Err(NspError::InvalidOptions("buffer_size must be non-zero".into()));
        }
        let name = self.output_dir_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(NspError::InvalidOptions(format!(
                "output_dir_name must be a plain directory name, got {name:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineOptions {
    pub buffer_size: usize,
    /// Output is written as `<output_stem>.<nsp|xci>` inside the scanned directory.
    pub output_stem: String,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            output_stem: DEFAULT_OUTPUT_STEM.to_string(),
        }
    }
}

impl CombineOptions {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(NspError::InvalidOptions("buffer_size must be non-zero".into()));
        }
        let stem = self.output_stem.as_str();
        if stem.is_empty() || stem.contains(['/', '\\']) {
            return Err(NspError::InvalidOptions(format!(
                "output_stem must be a plain file name, got {stem:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_thresholds() {
        let o = SplitOptions::default();
        assert_eq!(o.part_size, 4000 * 1024 * 1024);
        assert_eq!(o.min_source_size, 4000 * 1024 * 1024);
        assert_eq!(o.buffer_size, 4 * 1024 * 1024);
        assert_eq!(o.output_dir_name, "split_output");
        assert_eq!(o.on_existing, ExistingParts::Refuse);
        assert!(o.validate().is_ok());
        assert!(CombineOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let o = SplitOptions {
            part_size: 0,
            ..Default::default()
        };
        assert!(matches!(o.validate(), Err(NspError::InvalidOptions(_))));

        let o = CombineOptions {
            buffer_size: 0,
            ..Default::default()
        };
        assert!(matches!(o.validate(), Err(NspError::InvalidOptions(_))));
    }

    #[test]
    fn output_dir_must_not_escape_parent() {
        for bad in ["", "..", "a/b"] {
            let o = SplitOptions {
                output_dir_name: bad.to_string(),
                ..Default::default()
            };
            assert!(o.validate().is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let o: SplitOptions = toml::from_str("part_size = 1024\non_existing = \"overwrite\"").unwrap();
        assert_eq!(o.part_size, 1024);
        assert_eq!(o.on_existing, ExistingParts::Overwrite);
        assert_eq!(o.buffer_size, DEFAULT_BUFFER_SIZE);
    }
}
