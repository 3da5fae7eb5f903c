use crate::detector::EditDetectionOptions;
use crate::perceptual::PerceptualDetectionOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Which pipeline the demo runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Block,
    Pixel,
    Perceptual,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Serialized `DetectionReport` (result plus trace).
    pub json_out: Option<PathBuf>,
    /// Change field rendered as an 8-bit grayscale PNG.
    pub heatmap_out: Option<PathBuf>,
    /// Skip printing the prompt listing to stdout.
    pub quiet: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub original: PathBuf,
    pub edited: PathBuf,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub deterministic: EditDetectionOptions,
    #[serde(default)]
    pub perceptual: PerceptualDetectionOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    /// Deterministic options with the strategy implied by `method`.
    pub fn edit_options(&self) -> EditDetectionOptions {
        use crate::detector::DetectionStrategy;
        let strategy = match self.method {
            Method::Pixel => DetectionStrategy::Pixel,
            _ => DetectionStrategy::Block,
        };
        self.deterministic.clone().with_strategy(strategy)
    }
}

pub fn parse_config(contents: &str) -> Result<RuntimeConfig, String> {
    serde_json::from_str(contents).map_err(|e| format!("Failed to parse config: {e}"))
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
