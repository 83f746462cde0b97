//! Removal configuration management.
//!
//! A [`RemovalConfig`] collects every tunable of a gradient removal pass
//! and can be loaded from YAML. Unknown keys are ignored and missing keys
//! take their defaults.
//!
//! ```yaml
//! anchors:
//!   - { x: 120, y: 80 }
//!   - { x: -120, y: -80 }   # measured from the bottom-right corner
//! sample_radius: 5
//! interpolation_power: 3.0
//! strategy: { type: nearest, count: 4 }
//! correction: { type: spline, shaping_factor: 0.01 }
//! removal_factor: 1.0
//! ```


use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};

use serde::{Deserialize, Serialize};

use crate::anchors::Point;
use crate::color::ColorSpace;
use crate::correction::CurveCorrection;
use crate::error::{GradientError, Result};
use crate::filters::LowPassFilter;
use crate::gradient::DEFAULT_INTERPOLATION_POWER;
use crate::image::ImageView;
use crate::pipeline::{GradientEstimator, GradientRemover, RemovalSettings, DEFAULT_SAMPLE_RADIUS};
use crate::points::PointStrategy;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SKYGLOW_CONFIG";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["skyglow.yml", "skyglow.yaml"];

const MAX_INTERPOLATION_POWER: f64 = 32.0;
const MAX_REMOVAL_FACTOR: f64 = 4.0;

/// Loaded configuration, its source path, and warnings.
#[derive(Debug)]
pub struct RemovalConfigHandle {
    pub config: RemovalConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl RemovalConfigHandle {
    fn with_config(config: RemovalConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Tunables of a gradient removal pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// Anchor positions; negative coordinates count from the far edge
    pub anchors: Vec<Point>,
    /// Place three anchors automatically when `anchors` is empty
    pub auto_anchors: bool,
    pub sample_radius: i64,
    pub interpolation_power: f64,
    pub strategy: PointStrategy,
    /// Estimate the gradient with this filter instead of anchors
    pub filter: Option<LowPassFilter>,
    pub filter_color_space: ColorSpace,
    pub correction: CurveCorrection,
    pub removal_factor: f64,
    pub parallel: bool,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
            auto_anchors: true,
            sample_radius: DEFAULT_SAMPLE_RADIUS,
            interpolation_power: DEFAULT_INTERPOLATION_POWER,
            strategy: PointStrategy::All,
            filter: None,
            filter_color_space: ColorSpace::Rgb,
            correction: CurveCorrection::Simple,
            removal_factor: 1.0,
            parallel: true,
        }
    }
}

impl RemovalConfig {
    /// Clamp out-of-range numeric values, returning a note for each change.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut notes = Vec::new();

        if !self.interpolation_power.is_finite() {
            notes.push(format!(
                "interpolation_power {} is not finite; using {}",
                self.interpolation_power, DEFAULT_INTERPOLATION_POWER
            ));
            self.interpolation_power = DEFAULT_INTERPOLATION_POWER;
        }
        let power = self.interpolation_power.clamp(0.0, MAX_INTERPOLATION_POWER);
        if power != self.interpolation_power {
            notes.push(format!(
                "interpolation_power {} clamped to {}",
                self.interpolation_power, power
            ));
            self.interpolation_power = power;
        }

        if !self.removal_factor.is_finite() {
            notes.push(format!(
                "removal_factor {} is not finite; using 1.0",
                self.removal_factor
            ));
            self.removal_factor = 1.0;
        }
        let factor = self.removal_factor.clamp(0.0, MAX_REMOVAL_FACTOR);
        if factor != self.removal_factor {
            notes.push(format!("removal_factor {} clamped to {}", self.removal_factor, factor));
            self.removal_factor = factor;
        }

        notes
    }

    /// Reject configuration the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.filter.is_none() && self.anchors.is_empty() && !self.auto_anchors {
            return Err(GradientError::NoAnchors);
        }
        self.to_settings().validate()
    }

    /// Pipeline settings described by this configuration.
    pub fn to_settings(&self) -> RemovalSettings {
        let estimator = match self.filter {
            Some(filter) => GradientEstimator::LowPass {
                filter,
                color_space: self.filter_color_space,
            },
            None => GradientEstimator::Interpolation {
                power: self.interpolation_power,
                strategy: self.strategy,
            },
        };

        RemovalSettings {
            estimator,
            correction: self.correction.clone(),
            removal_factor: self.removal_factor,
            sample_radius: self.sample_radius,
            parallel: self.parallel,
        }
    }

    /// Build a remover with anchors sampled from `image`.
    pub fn build_remover<V: ImageView + ?Sized>(&self, image: &V) -> Result<GradientRemover> {
        self.validate()?;
        let mut remover = GradientRemover::new(self.to_settings())?;

        if self.filter.is_none() {
            if !self.anchors.is_empty() {
                remover.set_anchors(&self.anchors, image)?;
            } else if self.auto_anchors {
                remover.set_auto_anchors(image);
            }
        }
        Ok(remover)
    }
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Candidates are tried in order: `custom_path`, `$SKYGLOW_CONFIG`,
/// `./config/<name>`, `./<name>`, `~/skyglow/<name>`. Unreadable or
/// unparsable files add a warning and the search continues.
pub fn load_removal_config(custom_path: Option<&Path>) -> RemovalConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<RemovalConfig>(&contents) {
                Ok(mut config) => {
                    for note in config.sanitize() {
                        warnings.push(format!("{}: {}", candidate.display(), note));
                    }
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return RemovalConfigHandle::with_config(config, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse removal config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read removal config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No removal config found; using built-in defaults.".to_string());
    RemovalConfigHandle::with_config(RemovalConfig::default(), None, warnings)
}

/// Parse configuration from a YAML string.
pub fn parse_removal_config(yaml: &str) -> Result<RemovalConfig> {
    let mut config: RemovalConfig =
        serde_yaml::from_str(yaml).map_err(|err| GradientError::Config(err.to_string()))?;
    for note in config.sanitize() {
        log::warn!("Config: {}", note);
    }
    Ok(config)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("skyglow").join(name));
        }
    }

    candidates
}

static REMOVAL_CONFIG_HANDLE: OnceLock<RemovalConfigHandle> = OnceLock::new();
static LOG_CONFIG_ONCE: Once = Once::new();

/// Access the process-wide configuration (loaded once per process).
pub fn removal_config_handle() -> &'static RemovalConfigHandle {
    REMOVAL_CONFIG_HANDLE.get_or_init(|| load_removal_config(None))
}

/// Log config source and warnings the first time it is requested.
pub fn log_config_usage() {
    LOG_CONFIG_ONCE.call_once(|| {
        let handle = removal_config_handle();
        if let Some(source) = &handle.source {
            log::info!("Loaded removal config from {}", source.display());
        } else {
            log::info!("Using built-in removal defaults");
        }

        for warning in &handle.warnings {
            log::warn!("Config warning: {}", warning);
        }
    });
}
