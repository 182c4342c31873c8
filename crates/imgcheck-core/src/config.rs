//! Configuration for comparison runs and the verification harness.
//!
//! The reference-data root is an explicit value threaded through every call
//! that needs it, never ambient state. The harness config file describes the
//! simulation command and the sequence of images to verify.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::compare::DEFAULT_TOLERANCE;

/// Environment variable naming the reference-data directory tree
pub const REFERENCE_ROOT_ENV: &str = "IMGCHECK_REFERENCE_DATA";

/// Environment variable naming an explicit harness config file
pub const CONFIG_ENV: &str = "IMGCHECK_CONFIG";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["imgcheck.yml", "imgcheck.yaml"];

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Run configuration: where the reference data tree lives
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the reference-data directory tree
    pub reference_root: PathBuf,
}

impl Config {
    pub fn new(reference_root: impl Into<PathBuf>) -> Self {
        Self {
            reference_root: reference_root.into(),
        }
    }

    /// Build the configuration from the environment. The reference root is
    /// required; its absence is a fatal configuration error.
    pub fn from_env() -> Result<Self, String> {
        match std::env::var(REFERENCE_ROOT_ENV) {
            Ok(root) if !root.is_empty() => Ok(Self::new(root)),
            _ => Err(format!(
                "Required environment variable {} is not set (root of the reference data tree)",
                REFERENCE_ROOT_ENV
            )),
        }
    }

    /// Path of a reference image inside the data tree
    pub fn reference_path(&self, file: &str) -> PathBuf {
        self.reference_root.join("reference").join(file)
    }
}

/// The external simulation command the harness runs before comparing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationCommand {
    /// Program to invoke
    pub program: String,

    /// Arguments always passed
    pub args: Vec<String>,

    /// Extra arguments selecting the fast/reduced-fidelity mode
    pub quick_args: Vec<String>,
}

impl Default for SimulationCommand {
    fn default() -> Self {
        Self {
            program: "simulate-image".to_string(),
            args: Vec::new(),
            quick_args: vec!["--quick".to_string()],
        }
    }
}

/// One image the harness checks: the file name (shared between the
/// simulation output directory and the reference tree), an optional
/// description printed before the comparison, and the tolerance.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyStage {
    pub file: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_tolerance")]
    pub tolerance: usize,
}

fn default_tolerance() -> usize {
    DEFAULT_TOLERANCE
}

impl VerifyStage {
    fn new(file: &str, description: &str) -> Self {
        Self {
            file: file.to_string(),
            description: Some(description.to_string()),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Complete harness configuration file structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub simulation: SimulationCommand,

    /// The primary simulated image
    pub primary: VerifyStage,

    /// Intermediate images representing cumulative physical effects,
    /// checked in order after the primary image
    pub stages: Vec<VerifyStage>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationCommand::default(),
            primary: VerifyStage::new("step5_000000.img.gz", "full simulated image"),
            stages: vec![
                VerifyStage::new("step5_000000_intimage_001.img", "Bragg scatter only"),
                VerifyStage::new("step5_000000_intimage_002.img", "Bragg plus water scatter"),
                VerifyStage::new(
                    "step5_000000_intimage_003.img",
                    "Bragg plus water and air scatter",
                ),
            ],
        }
    }
}

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct HarnessConfigHandle {
    pub config: HarnessConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load the harness configuration from disk, optionally forcing a specific
/// path. Falls back to the built-in stage list when no file is found.
pub fn load_harness_config(custom_path: Option<&Path>) -> HarnessConfigHandle {
    let mut warnings = Vec::new();

    for candidate in get_config_candidates(custom_path) {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match std::fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<HarnessConfig>(&contents) {
                Ok(config) => {
                    let source = std::fs::canonicalize(&candidate).unwrap_or(candidate);
                    return HarnessConfigHandle {
                        config,
                        source: Some(source),
                        warnings,
                    };
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse harness config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read harness config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No harness config found; using built-in defaults.".to_string());
    HarnessConfigHandle {
        config: HarnessConfig::default(),
        source: None,
        warnings,
    }
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
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
            candidates.push(home_dir.join("imgcheck").join(name));
        }
    }

    candidates
}
