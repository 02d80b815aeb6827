//! Command line interface.
//!
//! Every flag is optional and only overrides the loaded settings when it is given,
//! so a settings file can carry the usual grid and the command line tweaks one run.

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::config::Settings;
use crate::sequence::{AxisSpec, NoiseType, TraversalMode, ZSpec};

/// Generate a Micro-Manager stage position list (.pos)
#[derive(Debug, Parser)]
#[command(name = "pos-list")]
#[command(about = "Generate a Micro-Manager stage position list (.pos)", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML). Defaults to ./pos_list.toml when present
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the document to stdout instead of writing the output file
    #[arg(long)]
    pub stdout: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub print_settings: bool,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Values that take precedence over the settings file and environment.
#[derive(Debug, Clone, Default, Args)]
pub struct CliOverrides {
    /// Output file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// X axis: comma separated values or START:STOP:NUM
    #[arg(long, value_name = "AXIS", allow_hyphen_values = true)]
    pub x: Option<AxisSpec>,

    /// Y axis: comma separated values or START:STOP:NUM
    #[arg(long, value_name = "AXIS", allow_hyphen_values = true)]
    pub y: Option<AxisSpec>,

    /// Single Z value applied to every position
    #[arg(long, allow_negative_numbers = true, conflicts_with = "z_values")]
    pub z: Option<f64>,

    /// Comma separated Z values (one per position, or the planes of a Z-stack)
    #[arg(
        long,
        value_name = "LIST",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub z_values: Option<Vec<f64>>,

    /// Repeat every XY position once per Z value
    #[arg(long)]
    pub z_stack: bool,

    /// Traversal order of the XY grid
    #[arg(long, value_enum)]
    pub mode: Option<TraversalMode>,

    /// Noise amplitude added to Z
    #[arg(long)]
    pub noise_width: Option<f64>,

    /// Noise type applied to Z
    #[arg(long, value_enum)]
    pub noise_type: Option<NoiseType>,

    /// Disable the Micro-Manager compatibility noise
    #[arg(long)]
    pub no_compat: bool,

    /// Seed for random traversal and white noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliOverrides {
    /// Apply the flags that were given on top of `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(x) = &self.x {
            settings.axes.x = x.clone();
        }
        if let Some(y) = &self.y {
            settings.axes.y = y.clone();
        }
        if let Some(z) = self.z {
            settings.z = Some(ZSpec::Scalar(z));
        }
        if let Some(values) = &self.z_values {
            settings.z = Some(ZSpec::Values(values.clone()));
        }
        if self.z_stack {
            settings.sequence.z_stack = true;
        }
        if let Some(mode) = self.mode {
            settings.sequence.mode = mode;
        }
        if let Some(width) = self.noise_width {
            settings.sequence.noise_width = width;
        }
        if let Some(kind) = self.noise_type {
            settings.sequence.noise_type = Some(kind);
        }
        if self.no_compat {
            settings.sequence.compatibility_mda = false;
        }
        if let Some(seed) = self.seed {
            settings.sequence.seed = Some(seed);
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
    }
}
