//! Optional TOML configuration. Sizes are in MiB; anything left out keeps the
//! library defaults.
//!
//! ```toml
//! [split]
//! part_size_mib = 4000
//! on_existing = "overwrite"
//!
//! [combine]
//! output_stem = "joined"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use nsptools_core::{CombineOptions, ExistingParts, MIB, SplitOptions};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub split: SplitSection,
    pub combine: CombineSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitSection {
    pub part_size_mib: Option<u64>,
    pub min_source_size_mib: Option<u64>,
    pub buffer_size_mib: Option<u64>,
    pub output_dir: Option<String>,
    pub on_existing: Option<ExistingParts>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombineSection {
    pub buffer_size_mib: Option<u64>,
    pub output_stem: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn split_options(&self) -> Result<SplitOptions> {
        let s = &self.split;
        let mut opts = SplitOptions::default();
        if let Some(mib) = s.part_size_mib {
            opts.part_size = mib_to_bytes(mib)?;
        }
        if let Some(mib) = s.min_source_size_mib {
            opts.min_source_size = mib_to_bytes(mib)?;
        }
        if let Some(mib) = s.buffer_size_mib {
            opts.buffer_size = usize::try_from(mib_to_bytes(mib)?)?;
        }
        if let Some(dir) = &s.output_dir {
            opts.output_dir_name = dir.clone();
        }
        if let Some(policy) = s.on_existing {
            opts.on_existing = policy;
        }
        Ok(opts)
    }

    pub fn combine_options(&self) -> Result<CombineOptions> {
        let c = &self.combine;
        let mut opts = CombineOptions::default();
        if let Some(mib) = c.buffer_size_mib {
            opts.buffer_size = usize::try_from(mib_to_bytes(mib)?)?;
        }
        if let Some(stem) = &c.output_stem {
            opts.output_stem = stem.clone();
        }
        Ok(opts)
    }
}

pub fn mib_to_bytes(mib: u64) -> Result<u64> {
    match mib.checked_mul(MIB) {
        Some(b) => Ok(b),
        None => bail!("{mib} MiB does not fit in 64 bits"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_library_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        let s = cfg.split_options().unwrap();
        assert_eq!(s.part_size, SplitOptions::default().part_size);
        assert_eq!(s.on_existing, ExistingParts::Refuse);
        assert_eq!(cfg.combine_options().unwrap().output_stem, "output");
    }

    #[test]
    fn sections_override_in_mib() {
        let cfg: Config = toml::from_str(
            r#"
            [split]
            part_size_mib = 2000
            buffer_size_mib = 8
            on_existing = "overwrite"

            [combine]
            output_stem = "joined"
            "#,
        )
        .unwrap();
        let s = cfg.split_options().unwrap();
        assert_eq!(s.part_size, 2000 * MIB);
        assert_eq!(s.buffer_size, 8 * MIB as usize);
        assert_eq!(s.on_existing, ExistingParts::Overwrite);
        assert_eq!(s.min_source_size, 4000 * MIB);
        assert_eq!(cfg.combine_options().unwrap().output_stem, "joined");
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(toml::from_str::<Config>("[split]\npart_size = 1").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Config::load(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn oversized_mib_is_rejected() {
        assert!(mib_to_bytes(u64::MAX).is_err());
    }
}
