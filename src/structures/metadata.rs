// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Encoding and decoding of the packed metadata string.
//!
//! The metadata are stored in a single attribute as space-separated `Key:value` tokens,
//! e.g. `E:-1204.5 F:0.04 M:0.0 P:/home/user/calc`.
//! `E` is energy, `F` is force, `M` is magnetism, `P` is the path to the calculation.

use std::path::{Path, PathBuf};

use crate::auxiliary::XSD_LOG_TARGET;
use crate::errors::MetadataWarning;

/// Scalar data stored in the metadata string.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    pub energy: f64,
    pub force: f64,
    pub magnetism: f64,
    /// Working path of the calculation. Never read from the document,
    /// always set from the context in which the document is loaded or written.
    pub path: PathBuf,
}

/// Result of decoding the metadata string.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataParse {
    /// All numeric fields were decoded.
    Parsed(Metadata),
    /// The string was absent or malformed. Numeric fields are set to zero.
    Fallback(Metadata, MetadataWarning),
}

impl MetadataParse {
    /// Get the decoded (or default) metadata.
    pub fn metadata(&self) -> &Metadata {
        match self {
            MetadataParse::Parsed(m) | MetadataParse::Fallback(m, _) => m,
        }
    }

    /// Consume the result returning the decoded (or default) metadata.
    pub fn into_metadata(self) -> Metadata {
        match self {
            MetadataParse::Parsed(m) | MetadataParse::Fallback(m, _) => m,
        }
    }

    /// Get the warning, if the defaults were used.
    pub fn warning(&self) -> Option<&MetadataWarning> {
        match self {
            MetadataParse::Parsed(_) => None,
            MetadataParse::Fallback(_, w) => Some(w),
        }
    }

    /// Were all numeric fields decoded?
    #[inline(always)]
    pub fn is_parsed(&self) -> bool {
        matches!(self, MetadataParse::Parsed(_))
    }
}

impl Metadata {
    /// Decode the metadata string.
    ///
    /// ## Parameters
    /// - `string`: the metadata string; `None` if the document contains no metadata
    /// - `working_dir`: path assigned to the `path` field (the `P` token is never trusted)
    ///
    /// ## Notes
    /// - Tokens are split on the first `:`. Tokens with unknown keys are ignored.
    /// - If any of `E`, `F`, `M` is missing or is not a number, energy, force,
    ///   and magnetism are all set to 0.0 and a warning is logged. This function never fails.
    pub fn decode(string: Option<&str>, working_dir: &Path) -> MetadataParse {
        let string = match string {
            Some(x) => x,
            None => {
                let warning = MetadataWarning::Absent;
                log::warn!(
                    target: XSD_LOG_TARGET,
                    "Document contains no metadata element, using default values."
                );
                return MetadataParse::Fallback(Metadata::with_path(working_dir), warning);
            }
        };

        match Metadata::parse_numeric(string) {
            Some((energy, force, magnetism)) => MetadataParse::Parsed(Metadata {
                energy,
                force,
                magnetism,
                path: working_dir.to_path_buf(),
            }),
            None => {
                log::warn!(
                    target: XSD_LOG_TARGET,
                    "No data info in Name property '{}', using default values.",
                    string
                );
                MetadataParse::Fallback(
                    Metadata::with_path(working_dir),
                    MetadataWarning::Malformed(string.to_owned()),
                )
            }
        }
    }

    /// Encode the metadata into a string. The path is always taken from `working_dir`.
    pub fn encode(&self, working_dir: &Path) -> String {
        format!(
            "E:{} F:{} M:{} P:{}",
            self.energy,
            self.force,
            self.magnetism,
            working_dir.display()
        )
    }

    /// Metadata with zero energy, force, and magnetism.
    fn with_path(working_dir: &Path) -> Metadata {
        Metadata {
            path: working_dir.to_path_buf(),
            ..Default::default()
        }
    }

    fn parse_numeric(string: &str) -> Option<(f64, f64, f64)> {
        let (mut energy, mut force, mut magnetism) = (None, None, None);

        for token in string.split_whitespace() {
            let (key, value) = match token.split_once(':') {
                Some(x) => x,
                None => continue,
            };

            let target = match key {
                "E" => &mut energy,
                "F" => &mut force,
                "M" => &mut magnetism,
                _ => continue,
            };

            *target = Some(value.trim().parse::<f64>().ok()?);
        }

        Some((energy?, force?, magnetism?))
    }
}
