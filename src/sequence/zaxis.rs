//! Z attachment for XY sequences.
//!
//! A Z specification can be absent, a single focus value, or a list of values. In
//! non-stack mode every XY position receives one Z (optionally perturbed by noise);
//! in stack mode every XY position is repeated once per Z value.
//!
//! Micro-Manager skips the XY move when two consecutive positions carry the same Z,
//! which is why the noise options exist at all.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::Position;
use crate::error::{Advisory, AppResult, PosListError};

/// Smallest allowed difference between adjacent Z values under white noise.
pub const MIN_Z_SEPARATION: f64 = 0.0002;

/// Z values keep four decimal places.
const Z_SCALE: f64 = 10_000.0;
const MIN_SEPARATION_TICKS: f64 = 2.0;

/// Z values as given in settings: one focus value or an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZSpec {
    /// Same focus value for every position
    Scalar(f64),
    /// One value per position, or the planes of a Z-stack
    Values(Vec<f64>),
}

impl ZSpec {
    /// Reject non-finite Z values.
    pub fn validate(&self) -> AppResult<()> {
        let finite = match self {
            ZSpec::Scalar(z) => z.is_finite(),
            ZSpec::Values(v) => v.iter().all(|z| z.is_finite()),
        };
        if finite {
            Ok(())
        } else {
            Err(PosListError::Configuration(
                "Z specification contains non-finite values".to_string(),
            ))
        }
    }
}

/// Kind of perturbation applied to broadcast Z values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoiseType {
    /// Leave Z untouched.
    #[default]
    None,
    /// Independent uniform noise in `[-width/2, width/2]`, adjacent values kept apart.
    White,
    /// Alternate between the base value and base + width.
    Oscil,
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoiseType::None => "none",
            NoiseType::White => "white",
            NoiseType::Oscil => "oscil",
        })
    }
}

impl FromStr for NoiseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(NoiseType::None),
            "white" => Ok(NoiseType::White),
            "oscil" => Ok(NoiseType::Oscil),
            other => Err(format!(
                "Invalid noise type '{}'. Must be one of: none, white, oscil",
                other
            )),
        }
    }
}

/// Noise applied in non-stack mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseSettings {
    /// Noise type
    pub kind: NoiseType,
    /// Amplitude, in stage units
    pub width: f64,
}

impl NoiseSettings {
    /// Noise of the given kind and width.
    pub fn new(kind: NoiseType, width: f64) -> Self {
        Self { kind, width }
    }

    /// No noise at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether this perturbs Z.
    pub fn is_active(&self) -> bool {
        self.kind != NoiseType::None
    }
}

/// Result of [`attach_z`]: indexed positions plus any advisories raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ZAttachment {
    /// Indexed positions in output order
    pub positions: Vec<Position>,
    /// Non-fatal conditions raised while attaching Z
    pub advisories: Vec<Advisory>,
}

/// Round to the fixed Z precision, ties to even.
pub fn round_z(z: f64) -> f64 {
    to_ticks(z) / Z_SCALE
}

/// Z in units of the last kept decimal, as a whole-valued `f64`.
fn to_ticks(z: f64) -> f64 {
    (z * Z_SCALE).round_ties_even()
}

/// Attach Z values to an ordered list of XY pairs and assign indices.
///
/// # Errors
///
/// - [`PosListError::DimensionMismatch`] if a Z list in non-stack mode cannot be
///   broadcast to `pairs.len()` entries.
/// - [`PosListError::MissingZForStack`] if `z_stack` is set without a Z list.
pub fn attach_z<R>(
    pairs: &[(f64, f64)],
    z: Option<&ZSpec>,
    z_stack: bool,
    noise: NoiseSettings,
    rng: &mut R,
) -> AppResult<ZAttachment>
where
    R: Rng + ?Sized,
{
    let mut advisories = Vec::new();

    if z_stack {
        let z_values = match z {
            Some(ZSpec::Values(v)) => v,
            _ => return Err(PosListError::MissingZForStack),
        };
        if noise.is_active() {
            let advisory = Advisory::IncompatibleOptions(format!(
                "noise type '{}' cannot be combined with a Z-stack; continuing without noise",
                noise.kind
            ));
            warn!("{}", advisory);
            advisories.push(advisory);
        }
        let positions = stack(pairs, z_values);
        debug!(
            xy = pairs.len(),
            planes = z_values.len(),
            total = positions.len(),
            "Expanded Z-stack"
        );
        return Ok(ZAttachment {
            positions,
            advisories,
        });
    }

    let z = match z {
        Some(z) => z,
        None => {
            let positions = pairs
                .iter()
                .enumerate()
                .map(|(index, &(x, y))| Position::new(x, y, index, None))
                .collect();
            return Ok(ZAttachment {
                positions,
                advisories,
            });
        }
    };

    let base = broadcast(z, pairs.len())?;
    let z_values = apply_noise(&base, noise, rng);
    debug!(count = z_values.len(), noise = %noise.kind, width = noise.width, "Attached Z");

    let positions = pairs
        .iter()
        .zip(z_values)
        .enumerate()
        .map(|(index, (&(x, y), z))| Position::new(x, y, index, Some(z)))
        .collect();

    Ok(ZAttachment {
        positions,
        advisories,
    })
}

/// (x, y) outer, z inner; indices run across both.
fn stack(pairs: &[(f64, f64)], z_values: &[f64]) -> Vec<Position> {
    pairs
        .iter()
        .flat_map(|&(x, y)| z_values.iter().map(move |&z| (x, y, round_z(z))))
        .enumerate()
        .map(|(index, (x, y, z))| Position::new(x, y, index, Some(z)))
        .collect()
}

fn broadcast(z: &ZSpec, count: usize) -> AppResult<Vec<f64>> {
    match z {
        ZSpec::Scalar(z) => Ok(vec![*z; count]),
        ZSpec::Values(v) if v.len() == count => Ok(v.clone()),
        ZSpec::Values(v) if v.len() == 1 => Ok(vec![v[0]; count]),
        ZSpec::Values(v) => Err(PosListError::DimensionMismatch {
            expected: count,
            found: v.len(),
        }),
    }
}

fn apply_noise<R>(base: &[f64], noise: NoiseSettings, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    match noise.kind {
        NoiseType::None => base.iter().map(|&z| round_z(z)).collect(),
        NoiseType::Oscil => base
            .iter()
            .enumerate()
            .map(|(i, &z)| round_z(z + (i % 2) as f64 * noise.width))
            .collect(),
        NoiseType::White => {
            let noisy: Vec<f64> = base
                .iter()
                .map(|&z| to_ticks(z + (rng.gen::<f64>() - 0.5) * noise.width))
                .collect();
            let base_ticks: Vec<f64> = base.iter().map(|&z| to_ticks(z)).collect();
            separate_adjacent(noisy, &base_ticks)
                .into_iter()
                .map(|t| t / Z_SCALE)
                .collect()
        }
    }
}

/// Walk the sequence once and push any value that sits too close to its predecessor
/// to exactly the minimum separation, on the side nearest its base value.
fn separate_adjacent(mut ticks: Vec<f64>, base: &[f64]) -> Vec<f64> {
    for i in 1..ticks.len() {
        let prev = ticks[i - 1];
        if (ticks[i] - prev).abs() >= MIN_SEPARATION_TICKS {
            continue;
        }
        let up = prev + MIN_SEPARATION_TICKS;
        let down = prev - MIN_SEPARATION_TICKS;
        ticks[i] = if (up - base[i]).abs() <= (down - base[i]).abs() {
            up
        } else {
            down
        };
    }
    ticks
}
