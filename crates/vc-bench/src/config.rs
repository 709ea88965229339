//! Harness configuration, TOML-backed

use serde::{Deserialize, Serialize};
use std::path::Path;
use vc_bridge::BridgeConfig;
use vc_core::{VcError, VcResult};
use vc_dsp::SimdLevel;

/// Complete harness configuration
///
/// ```toml
/// log_capacity = 100
/// force_simd_level = "sse2"
///
/// [bridge]
/// direct_enabled = true
/// generated_enabled = true
/// inner = "scalar"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Keep only this many most recent entries; unbounded when unset
    pub log_capacity: Option<usize>,

    /// Foreign adapter settings
    pub bridge: BridgeConfig,

    /// Pin the vector backend to one SIMD level instead of detecting it
    pub force_simd_level: Option<SimdLevel>,
}

impl HarnessConfig {
    /// Load and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> VcResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded harness config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML string
    pub fn from_toml_str(toml_str: &str) -> VcResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| VcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> VcResult<String> {
        toml::to_string_pretty(self).map_err(|e| VcError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> VcResult<()> {
        if self.log_capacity == Some(0) {
            return Err(VcError::Config(
                "log_capacity must be at least 1".to_string(),
            ));
        }
        if let Some(level) = self.force_simd_level {
            if !level.is_supported() {
                log::warn!(
                    "Configured SIMD level {} is not supported here, scalar fallback will be used",
                    level.name()
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vc_bridge::InnerKernel;

    #[test]
    fn test_empty_toml_is_default() {
        let config = HarnessConfig::from_toml_str("").unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert!(config.bridge.direct_enabled);
    }

    #[test]
    fn test_parse_full() {
        let config = HarnessConfig::from_toml_str(
            r#"
            log_capacity = 8
            force_simd_level = "scalar"

            [bridge]
            generated_enabled = false
            inner = "scalar"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_capacity, Some(8));
        assert_eq!(config.force_simd_level, Some(SimdLevel::Scalar));
        assert!(config.bridge.direct_enabled);
        assert!(!config.bridge.generated_enabled);
        assert_eq!(config.bridge.inner, InnerKernel::Scalar);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = HarnessConfig::from_toml_str("log_capacity = 0").unwrap_err();
        assert!(matches!(err, VcError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = HarnessConfig::from_toml_str("log_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, VcError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = HarnessConfig {
            log_capacity: Some(4),
            force_simd_level: Some(SimdLevel::Scalar),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(HarnessConfig::from_toml_str(&text).unwrap(), config);
    }
}
