//! Resolving which record kind a command operates on
//!
//! Either a kind configuration file (`--config`) or a bare kind name
//! (`--kind`, optionally with `--file`) selects the kind. The kind name must
//! be one of the built-in formats.

use std::path::Path;

use flatsync_core::{FlatFileSync, KindConfig};
use flatsync_formats::{DelimitedFormat, KINDS};
use flatsync_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// A record kind with its configuration and format.
#[derive(Debug, Clone)]
pub struct KindContext {
    pub config: KindConfig,
    pub format: DelimitedFormat,
}

impl KindContext {
    pub fn resolve(config: Option<&Path>, kind: Option<&str>, file: Option<&str>) -> Result<Self> {
        let config = match (config, kind) {
            (Some(path), _) => KindConfig::load(&NormalizedPath::new(path))?,
            (None, Some(kind)) => {
                let file = file
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("/etc/{kind}"));
                KindConfig::new(kind, file)
            }
            (None, None) => {
                return Err(CliError::user(
                    "no record kind selected; pass --config <file> or --kind <kind>",
                ));
            }
        };

        let format = flatsync_formats::by_kind(&config.kind).ok_or_else(|| {
            CliError::user(format!(
                "unknown record kind '{}'. Valid: {}",
                config.kind,
                KINDS.join(", ")
            ))
        })?;

        tracing::debug!(kind = %config.kind, default_target = ?config.default_target, "Resolved kind");
        Ok(Self { config, format })
    }

    /// Build the engine for this kind.
    pub fn engine(self) -> Result<FlatFileSync<DelimitedFormat>> {
        Ok(FlatFileSync::new(self.config, self.format)?)
    }
}
