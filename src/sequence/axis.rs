//! Coordinate axes.
//!
//! An axis is an ordered list of stage coordinates along one dimension. Settings may
//! list the values explicitly or describe them as an evenly spaced range.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppResult, PosListError};

/// How an axis is described in settings or on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    /// Explicit coordinates, used in the given order.
    Values(Vec<f64>),
    /// `num` evenly spaced coordinates from `start` to `stop`, both ends included.
    Linspace {
        /// First coordinate
        start: f64,
        /// Last coordinate
        stop: f64,
        /// Number of coordinates
        num: usize,
    },
}

impl Default for AxisSpec {
    fn default() -> Self {
        AxisSpec::Linspace {
            start: -100.0,
            stop: 100.0,
            num: 3,
        }
    }
}

impl AxisSpec {
    /// Expand into the concrete list of coordinates.
    pub fn values(&self) -> Vec<f64> {
        match self {
            AxisSpec::Values(v) => v.clone(),
            AxisSpec::Linspace { start, stop, num } => linspace(*start, *stop, *num),
        }
    }

    /// Reject non-finite coordinates and empty linspaces.
    pub fn validate(&self, name: &str) -> AppResult<()> {
        let finite = match self {
            AxisSpec::Values(v) => v.iter().all(|x| x.is_finite()),
            AxisSpec::Linspace { start, stop, num } => {
                if *num == 0 {
                    return Err(PosListError::Configuration(format!(
                        "Axis '{}': linspace needs at least one point",
                        name
                    )));
                }
                start.is_finite() && stop.is_finite()
            }
        };
        if !finite {
            return Err(PosListError::Configuration(format!(
                "Axis '{}' contains non-finite coordinates",
                name
            )));
        }
        Ok(())
    }
}

/// Evenly spaced values over `[start, stop]`. The last value is exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Parses `start:stop:num` as a linspace, anything else as a comma separated list.
impl FromStr for AxisSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(':') {
            let parts: Vec<&str> = s.split(':').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(format!("expected START:STOP:NUM, got '{}'", s));
            }
            let start = parse_real(parts[0])?;
            let stop = parse_real(parts[1])?;
            let num = parts[2]
                .parse::<usize>()
                .map_err(|e| format!("invalid point count '{}': {}", parts[2], e))?;
            return Ok(AxisSpec::Linspace { start, stop, num });
        }
        if s.is_empty() {
            return Ok(AxisSpec::Values(Vec::new()));
        }
        s.split(',')
            .map(|v| parse_real(v.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(AxisSpec::Values)
    }
}

pub(crate) fn parse_real(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|e| format!("invalid coordinate '{}': {}", s, e))
}
