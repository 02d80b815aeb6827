//! Traversal order of the XY grid.
//!
//! Every mode visits the full Cartesian product of the two axes exactly once; only
//! the order (and therefore the stage travel path) differs.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration order of the (x, y) grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// x outer, y inner: `x1,y1 / x1,y2 / x2,y1 / x2,y2`
    Standard,
    /// y outer, x inner: `x1,y1 / x2,y1 / x1,y2 / x2,y2`
    Reversed,
    /// Boustrophedon: y sweeps forward on even x steps and backward on odd ones.
    #[default]
    Snake,
    /// Standard pairs, uniformly shuffled.
    Random,
}

impl TraversalMode {
    /// Name used in settings and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalMode::Standard => "standard",
            TraversalMode::Reversed => "reversed",
            TraversalMode::Snake => "snake",
            TraversalMode::Random => "random",
        }
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(TraversalMode::Standard),
            "reversed" => Ok(TraversalMode::Reversed),
            "snake" => Ok(TraversalMode::Snake),
            "random" => Ok(TraversalMode::Random),
            other => Err(format!(
                "Invalid traversal mode '{}'. Must be one of: standard, reversed, snake, random",
                other
            )),
        }
    }
}

/// Combine two axes into an ordered list of (x, y) pairs.
///
/// The result has `x_axis.len() * y_axis.len()` entries. An empty axis yields an
/// empty list. `rng` is only consumed by [`TraversalMode::Random`].
pub fn generate_pairs<R>(
    x_axis: &[f64],
    y_axis: &[f64],
    mode: TraversalMode,
    rng: &mut R,
) -> Vec<(f64, f64)>
where
    R: Rng + ?Sized,
{
    let mut pairs = Vec::with_capacity(x_axis.len() * y_axis.len());

    match mode {
        TraversalMode::Standard | TraversalMode::Random => {
            for &x in x_axis {
                for &y in y_axis {
                    pairs.push((x, y));
                }
            }
        }
        TraversalMode::Reversed => {
            for &y in y_axis {
                for &x in x_axis {
                    pairs.push((x, y));
                }
            }
        }
        TraversalMode::Snake => {
            for (step, &x) in x_axis.iter().enumerate() {
                if step % 2 == 0 {
                    pairs.extend(y_axis.iter().map(|&y| (x, y)));
                } else {
                    pairs.extend(y_axis.iter().rev().map(|&y| (x, y)));
                }
            }
        }
    }

    if mode == TraversalMode::Random {
        pairs.shuffle(rng);
    }

    pairs
}
