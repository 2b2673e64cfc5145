//! Configuration for the streaming layer and the monitor shell
//!
//! Two levels of configuration live here:
//!
//! - [`StreamConfig`] — per-pipeline settings handed to
//!   [`StreamPipeline`](crate::coalesce::StreamPipeline) at construction.
//!   A plain struct: the pipeline needs a name for its thread and logs,
//!   nothing more.
//! - [`MonitorConfig`] — the monitor shell's description of the device
//!   server: which device classes exist, which attribute groups each class
//!   exposes, and which attributes feed the streaming plots. The GUI shell
//!   consumes this; the coalescing layer itself never reads it.
//!
//! `MonitorConfig` round-trips through TOML so deployments can override
//! the attribute tables without a rebuild.

use crate::error::{Result, StreamError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-pipeline configuration, passed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Curve name; used for the consumer thread name and log fields.
    pub name: String,
}

impl StreamConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new("StreamingCurve")
    }
}

/// Device classes served by the filling pattern device server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Fast current transformer.
    Fct,
    /// Photon counter.
    PhCt,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Fct => "MeasuredFillingPatternFCT",
            DeviceClass::PhCt => "MeasuredFillingPatternPhCt",
        }
    }

    pub fn all() -> [DeviceClass; 2] {
        [DeviceClass::Fct, DeviceClass::PhCt]
    }
}

/// Attribute names a device class exposes, grouped per panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeGroups {
    pub measures: Vec<String>,
    pub configuration: Vec<String>,
    pub expert: Vec<String>,
    pub state: Vec<String>,
}

/// One streaming plot and the curve models it displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    pub name: String,
    pub models: Vec<String>,
}

/// Monitor shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Device server to search for at startup.
    pub device_server: String,
    /// Streaming plots (each curve model gets its own coalescing pipeline).
    pub plots: Vec<PlotConfig>,
    /// Attribute groups for the fast current transformer class.
    pub fct: AttributeGroups,
    /// Attribute groups for the photon counter class.
    pub phct: AttributeGroups,
}

impl MonitorConfig {
    /// Attribute groups for the given device class.
    pub fn attribute_groups(&self, class: DeviceClass) -> &AttributeGroups {
        match class {
            DeviceClass::Fct => &self.fct,
            DeviceClass::PhCt => &self.phct,
        }
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StreamError::Config(e.to_string()))
    }

    /// Save to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StreamError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            device_server: "MeasuredFillingPattern".to_string(),
            plots: vec![
                PlotConfig {
                    name: "BunchIntensity".to_string(),
                    models: vec!["BunchIntensity".to_string()],
                },
                PlotConfig {
                    name: "InputSignal".to_string(),
                    models: vec!["InputSignal".to_string()],
                },
            ],
            fct: AttributeGroups {
                measures: names(&[
                    "FilledBunches",
                    "SpuriousBunches",
                    "nBunches",
                    "resultingFrequency",
                    "CurrentSampleRate",
                ]),
                configuration: names(&[
                    "nAcquisitions",
                    "StartingPoint",
                    "Threshold",
                    "ScaleH",
                    "OffsetH",
                    "TimingTrigger",
                ]),
                expert: names(&[
                    "nAcquisitions",
                    "StartingPoint_expert",
                    "Threshold_expert",
                    "ScaleH_expert",
                    "OffsetH_expert",
                    "TimingTrigger_expert",
                ]),
                state: names(&["State", "Status"]),
            },
            phct: AttributeGroups {
                measures: names(&[
                    "FilledBunches",
                    "SpuriousBunches",
                    "nBunches",
                    "resultingFrequency",
                ]),
                configuration: names(&["nAcquisitions", "Threshold"]),
                expert: names(&["nAcquisitions", "Threshold_expert"]),
                state: names(&["State", "Status"]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plots() {
        let config = MonitorConfig::default();
        assert_eq!(config.device_server, "MeasuredFillingPattern");
        assert_eq!(config.plots.len(), 2);
        assert_eq!(config.plots[0].name, "BunchIntensity");
    }

    #[test]
    fn test_attribute_groups_per_class() {
        let config = MonitorConfig::default();
        let fct = config.attribute_groups(DeviceClass::Fct);
        let phct = config.attribute_groups(DeviceClass::PhCt);

        // The photon counter has no sample-rate attribute.
        assert!(fct.measures.contains(&"CurrentSampleRate".to_string()));
        assert!(!phct.measures.contains(&"CurrentSampleRate".to_string()));
        assert_eq!(phct.configuration.len(), 2);
    }

    #[test]
    fn test_device_class_names() {
        assert_eq!(DeviceClass::Fct.as_str(), "MeasuredFillingPatternFCT");
        assert_eq!(DeviceClass::PhCt.as_str(), "MeasuredFillingPatternPhCt");
        assert_eq!(DeviceClass::all().len(), 2);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");

        let mut config = MonitorConfig::default();
        config.device_server = "TestPattern".to_string();
        config.save(&path).unwrap();

        let loaded = MonitorConfig::load(&path).unwrap();
        assert_eq!(loaded.device_server, "TestPattern");
        assert_eq!(loaded.plots.len(), config.plots.len());
        assert_eq!(loaded.fct.measures, config.fct.measures);
    }

    #[test]
    fn test_load_missing_file() {
        let result = MonitorConfig::load("/nonexistent/monitor.toml");
        assert!(matches!(result, Err(StreamError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "device_server = [not toml").unwrap();

        let result = MonitorConfig::load(&path);
        assert!(matches!(result, Err(StreamError::Config(_))));
    }
}
