//! Selection configuration
//!
//! Loaded from TOML. Every field has a default so partial files are fine:
//!
//! ```toml
//! clod = 1.5
//! points_per_frame = 18000000
//! backend = "gpu"
//! ```

use crate::constants::{distribution, selection, tuning};
use crate::error::{invalid_config, LodError, LodResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the selection kernel runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Cpu,
    Gpu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub clod: f32,
    pub scale: f32,
    pub spacing: f32,
    pub frustum_extent: f32,

    /// Batch size per frame. `None` processes the whole cloud in one pass.
    pub points_per_frame: Option<u32>,

    /// Worker threads for the CPU backend. `None` uses every core.
    pub worker_threads: Option<usize>,

    pub backend: Backend,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            clod: tuning::DEFAULT_CLOD,
            scale: tuning::DEFAULT_SCALE,
            spacing: tuning::DEFAULT_SPACING,
            frustum_extent: selection::FRUSTUM_EXTENT,
            points_per_frame: None,
            worker_threads: None,
            backend: Backend::Cpu,
        }
    }
}

impl SelectionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> LodResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> LodResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LodError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        log::info!("[SelectionConfig::load] Loaded selection config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> LodResult<String> {
        toml::to_string_pretty(self).map_err(|e| invalid_config("<document>", e.to_string()))
    }

    pub fn validate(&self) -> LodResult<()> {
        check_non_negative("clod", self.clod)?;
        check_non_negative("scale", self.scale)?;
        check_non_negative("spacing", self.spacing)?;

        if !self.frustum_extent.is_finite() || self.frustum_extent < 1.0 {
            return Err(invalid_config(
                "frustum_extent",
                format!("{} must be finite and at least 1.0", self.frustum_extent),
            ));
        }

        if self.points_per_frame == Some(0) {
            return Err(invalid_config("points_per_frame", "must be greater than zero"));
        }

        if self.worker_threads == Some(0) {
            return Err(invalid_config("worker_threads", "must be greater than zero"));
        }

        Ok(())
    }

    /// Worker thread count with the default resolved
    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Batch size for a cloud of `total` points
    pub fn resolved_points_per_frame(&self, total: u32) -> u32 {
        self.points_per_frame.unwrap_or(total).max(1)
    }

    /// Configuration tuned for spreading selection over several frames
    pub fn distributed() -> Self {
        Self {
            points_per_frame: Some(distribution::DEFAULT_POINTS_PER_FRAME),
            ..Self::default()
        }
    }
}

fn check_non_negative(field: &'static str, value: f32) -> LodResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid_config(field, format!("{} must be finite and non-negative", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = SelectionConfig::from_toml_str("clod = 2.5\nbackend = \"gpu\"\n")
            .expect("valid config");
        assert_eq!(config.clod, 2.5);
        assert_eq!(config.backend, Backend::Gpu);
        assert_eq!(config.frustum_extent, selection::FRUSTUM_EXTENT);
        assert_eq!(config.points_per_frame, None);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            SelectionConfig::from_toml_str("clod = -1.0"),
            Err(LodError::InvalidConfig { field: "clod", .. })
        ));
        assert!(matches!(
            SelectionConfig::from_toml_str("frustum_extent = 0.5"),
            Err(LodError::InvalidConfig { field: "frustum_extent", .. })
        ));
        assert!(matches!(
            SelectionConfig::from_toml_str("points_per_frame = 0"),
            Err(LodError::InvalidConfig { field: "points_per_frame", .. })
        ));
        assert!(matches!(
            SelectionConfig::from_toml_str("clod = \"lots\""),
            Err(LodError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let config = SelectionConfig {
            clod: 3.0,
            points_per_frame: Some(1_000),
            worker_threads: Some(2),
            ..SelectionConfig::default()
        };
        let raw = config.to_toml_string().expect("serializable");
        assert_eq!(SelectionConfig::from_toml_str(&raw).expect("parses"), config);
    }

    #[test]
    fn test_resolved_batch_size() {
        let config = SelectionConfig::default();
        assert_eq!(config.resolved_points_per_frame(500), 500);

        let config = SelectionConfig::distributed();
        assert_eq!(config.resolved_points_per_frame(86_000_000), 18_000_000);
        assert!(config.resolved_worker_threads() >= 1);
    }
}
