//! Part file naming: `(base, ext, index) <-> file name`.
//!
//! Two surface forms are accepted when discovering parts, both case-insensitive:
//! `<base>_part_<N>.nsp|xci` as written by the splitter, and a bare two-digit
//! name (`00`, `01`, ...) as produced by other tools or by hand.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{NspError, Result};

static SUFFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*_part_([0-9]+)\.(?:nsp|xci)$").expect("suffixed part pattern")
});

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}$").expect("bare part pattern"));

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartForm {
    /// `<base>_part_<N>.<nsp|xci>`
    Suffixed,
    /// `NN`
    Bare,
}

/// Which accepted form `name` has, if any.
pub fn classify(name: &str) -> Option<PartForm> {
    if SUFFIXED.is_match(name) {
        Some(PartForm::Suffixed)
    } else if BARE.is_match(name) {
        Some(PartForm::Bare)
    } else {
        None
    }
}

pub fn format_part_name(base: &str, ext: &str, index: u64) -> String {
    format!("{base}_part_{index}{ext}")
}

/// Extract the ordinal index from a part file name.
pub fn parse_index(name: &str) -> Result<u64> {
    let digits = if let Some(caps) = SUFFIXED.captures(name) {
        caps.get(1).map(|m| m.as_str())
    } else if BARE.is_match(name) {
        Some(name)
    } else {
        None
    };
    digits
        .and_then(|d| d.parse::<u64>().ok())
        .ok_or_else(|| NspError::NamingFormat(name.to_string()))
}

/// Split at the last dot; the extension keeps its leading dot and is empty when absent.
pub fn split_file_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) => name.split_at(i),
        None => (name, ""),
    }
}

pub fn has_xci_extension(name: &str) -> bool {
    let b = name.as_bytes();
    b.len() >= 4 && b[b.len() - 4..].eq_ignore_ascii_case(b".xci")
}

/// Names parts after one source file.
#[derive(Clone, Debug)]
pub struct PartNamer {
    base: String,
    ext: String,
}

impl PartNamer {
    pub fn new(base: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ext: ext.into(),
        }
    }

    pub fn for_source(file_name: &str) -> Self {
        let (base, ext) = split_file_name(file_name);
        Self::new(base, ext)
    }

    pub fn name(&self, index: u64) -> String {
        format_part_name(&self.base, &self.ext, index)
    }

    /// Index of `name` if it is exactly one of this namer's outputs.
    pub fn index_of(&self, name: &str) -> Option<u64> {
        let digits = name
            .strip_prefix(self.base.as_str())?
            .strip_prefix("_part_")?
            .strip_suffix(self.ext.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}
