//! Position sequencing.
//!
//! Turns two coordinate axes and an optional Z specification into the ordered,
//! indexed list of stage positions that ends up in the `.pos` file.
//!
//! # Pipeline
//!
//! ```text
//! x axis ─┐
//!         ├─ generate_pairs(mode) ─► [(x, y)] ─ attach_z(z, stack, noise) ─► [Position]
//! y axis ─┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use pos_list::sequence::{PositionSequencer, SequenceOptions, TraversalMode, ZSpec};
//!
//! let options = SequenceOptions {
//!     mode: TraversalMode::Snake,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//! let generation = PositionSequencer::new(options)
//!     .generate(&[0.0, 100.0], &[0.0, 50.0], Some(&ZSpec::Scalar(40.0)))
//!     .unwrap();
//! assert_eq!(generation.positions.len(), 4);
//! ```

pub mod axis;
pub mod traversal;
pub mod zaxis;

pub use axis::{linspace, AxisSpec};
pub use traversal::{generate_pairs, TraversalMode};
pub use zaxis::{attach_z, round_z, NoiseSettings, NoiseType, ZAttachment, ZSpec, MIN_Z_SEPARATION};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Advisory, AppResult, PosListError};

/// One stop of the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// XY stage X coordinate
    pub x: f64,
    /// XY stage Y coordinate
    pub y: f64,
    /// 0-based order in the output, rendered as the `Pos{index}` label.
    pub index: usize,
    /// Focus position, absent for XY-only lists
    pub z: Option<f64>,
}

impl Position {
    /// Position at `(x, y)` with an optional Z.
    pub fn new(x: f64, y: f64, index: usize, z: Option<f64>) -> Self {
        Self { x, y, index, z }
    }

    /// Label written to the file, `Pos{index}`.
    pub fn label(&self) -> String {
        format!("Pos{}", self.index)
    }
}

/// Options controlling order and Z handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Traversal order of the XY grid
    pub mode: TraversalMode,
    /// Repeat every XY position once per Z value
    pub z_stack: bool,
    /// Noise amplitude added to Z
    pub noise_width: f64,
    /// Explicit noise type; unset lets `compatibility_mda` decide
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_type: Option<NoiseType>,
    /// Force a small oscillation on Z so Micro-Manager always moves the XY stage
    pub compatibility_mda: bool,
    /// Seed for random traversal and white noise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            mode: TraversalMode::default(),
            z_stack: false,
            noise_width: 0.0,
            noise_type: None,
            compatibility_mda: true,
            seed: None,
        }
    }
}

impl SequenceOptions {
    /// Noise that actually applies once the compatibility rule is resolved.
    ///
    /// With `compatibility_mda` on and no explicit noise type, a non-stack run gets
    /// oscillating noise of at least [`MIN_Z_SEPARATION`].
    pub fn effective_noise(&self) -> NoiseSettings {
        match self.noise_type {
            Some(kind) => NoiseSettings::new(kind, self.noise_width),
            None if self.compatibility_mda && !self.z_stack => NoiseSettings::new(
                NoiseType::Oscil,
                self.noise_width.max(MIN_Z_SEPARATION),
            ),
            None => NoiseSettings::new(NoiseType::None, self.noise_width),
        }
    }

    /// Reject negative or non-finite noise widths.
    pub fn validate(&self) -> AppResult<()> {
        if !self.noise_width.is_finite() || self.noise_width < 0.0 {
            return Err(PosListError::Configuration(format!(
                "Invalid noise_width {}. Must be a finite value >= 0",
                self.noise_width
            )));
        }
        Ok(())
    }
}

/// Ordered positions plus advisories raised while generating them.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Positions in output order
    pub positions: Vec<Position>,
    /// Non-fatal conditions, already logged
    pub advisories: Vec<Advisory>,
}

/// Runs the pairing and Z attachment stages with a single random source.
pub struct PositionSequencer {
    options: SequenceOptions,
    rng: Box<dyn RngCore>,
}

impl PositionSequencer {
    /// Seeded from `options.seed` when set, otherwise from the thread RNG.
    pub fn new(options: SequenceOptions) -> Self {
        let rng: Box<dyn RngCore> = match options.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::thread_rng()),
        };
        Self { options, rng }
    }

    /// Options this sequencer runs with.
    pub fn options(&self) -> &SequenceOptions {
        &self.options
    }

    /// Generate the full, materialized position list.
    ///
    /// # Errors
    ///
    /// Fails as a whole on [`PosListError::DimensionMismatch`] or
    /// [`PosListError::MissingZForStack`]; no partial list is returned.
    pub fn generate(
        &mut self,
        x_axis: &[f64],
        y_axis: &[f64],
        z: Option<&ZSpec>,
    ) -> AppResult<Generation> {
        self.options.validate()?;

        let pairs = generate_pairs(x_axis, y_axis, self.options.mode, &mut *self.rng);
        if pairs.is_empty() {
            warn!(
                x = x_axis.len(),
                y = y_axis.len(),
                "Empty axis, the position list will contain no positions"
            );
        }

        let noise = self.options.effective_noise();
        let ZAttachment {
            positions,
            advisories,
        } = attach_z(&pairs, z, self.options.z_stack, noise, &mut *self.rng)?;

        info!(
            positions = positions.len(),
            mode = %self.options.mode,
            z_stack = self.options.z_stack,
            "Generated position sequence"
        );

        Ok(Generation {
            positions,
            advisories,
        })
    }
}
