//! Micro-Manager `.pos` writer.
//!
//! The file is a Micro-Manager "Property Map" (format version 2.0): a nested map of
//! `{ "type": ..., "scalar" | "array": ... }` entries. Micro-Manager parses it with a
//! hand-maintained grammar, so the layout below is reproduced token for token,
//! including indentation and the textual form of real numbers.
//!
//! ```text
//! header ─ "StagePositions": { "array": [
//!     block(Pos0),
//!     block(Pos1),
//!     ...
//! ] } ─ footer
//! ```

use serde::{Deserialize, Serialize};

use crate::sequence::Position;

/// File extension expected by Micro-Manager.
pub const POS_EXTENSION: &str = "pos";

const HEADER: &str = r#"{
  "encoding": "UTF-8",
  "format": "Micro-Manager Property Map",
  "major_version": 2,
  "minor_version": 0,
  "map": {
    "StagePositions": {
      "type": "PROPERTY_MAP",
      "array": [
"#;

const FOOTER: &str = r#"
      ]
    }
  }
}"#;

const BLOCK_SEPARATOR: &str = ",\n";

/// Device labels written into every position block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageDevices {
    /// Label of the XY stage device
    pub xy_stage: String,
    /// Label of the Z (focus) stage device
    pub z_stage: String,
}

impl Default for StageDevices {
    fn default() -> Self {
        Self {
            xy_stage: "XY Stage".to_string(),
            z_stage: "PIZStage".to_string(),
        }
    }
}

/// Render positions with the default device labels.
pub fn render(positions: &[Position]) -> String {
    render_with_devices(positions, &StageDevices::default())
}

/// Render the whole document. An empty slice yields an empty `StagePositions` array.
pub fn render_with_devices(positions: &[Position], devices: &StageDevices) -> String {
    let xy_stage = escape(&devices.xy_stage);
    let z_stage = escape(&devices.z_stage);

    let mut out = String::from(HEADER);
    for (i, position) in positions.iter().enumerate() {
        if i > 0 {
            out.push_str(BLOCK_SEPARATOR);
        }
        let text = match position.z {
            Some(z) => block_with_z(position, z, &xy_stage, &z_stage),
            None => block(position, &xy_stage, &z_stage),
        };
        out.push_str(&text);
    }
    out.push_str(FOOTER);
    out
}

fn block(p: &Position, xy_stage: &str, z_stage: &str) -> String {
    format!(
        r#"        {{
          "DefaultXYStage": {{
            "type": "STRING",
            "scalar": "{xy_stage}"
          }},
          "DefaultZStage": {{
            "type": "STRING",
            "scalar": "{z_stage}"
          }},
          "DevicePositions": {{
            "type": "PROPERTY_MAP",
            "array": [
              {{
                "Device": {{
                  "type": "STRING",
                  "scalar": "{xy_stage}"
                }},
                "Position_um": {{
                  "type": "DOUBLE",
                  "array": [
                    {x},
                    {y}
                  ]
                }}
              }}
            ]
          }},
{tail}"#,
        xy_stage = xy_stage,
        z_stage = z_stage,
        x = format_real(p.x),
        y = format_real(p.y),
        tail = block_tail(p),
    )
}

fn block_with_z(p: &Position, z: f64, xy_stage: &str, z_stage: &str) -> String {
    format!(
        r#"        {{
          "DefaultXYStage": {{
            "type": "STRING",
            "scalar": "{xy_stage}"
          }},
          "DefaultZStage": {{
            "type": "STRING",
            "scalar": "{z_stage}"
          }},
          "DevicePositions": {{
            "type": "PROPERTY_MAP",
            "array": [
              {{
                "Device": {{
                  "type": "STRING",
                  "scalar": "{z_stage}"
                }},
                "Position_um": {{
                  "type": "DOUBLE",
                  "array": [
                    {z}
                  ]
                }}
              }},
              {{
                "Device": {{
                  "type": "STRING",
                  "scalar": "{xy_stage}"
                }},
                "Position_um": {{
                  "type": "DOUBLE",
                  "array": [
                    {x},
                    {y}
                  ]
                }}
              }}
            ]
          }},
{tail}"#,
        xy_stage = xy_stage,
        z_stage = z_stage,
        z = format_real(z),
        x = format_real(p.x),
        y = format_real(p.y),
        tail = block_tail(p),
    )
}

/// Grid, label and properties; shared by both block layouts.
fn block_tail(p: &Position) -> String {
    format!(
        r#"          "GridCol": {{
            "type": "INTEGER",
            "scalar": 0
          }},
          "GridRow": {{
            "type": "INTEGER",
            "scalar": 0
          }},
          "Label": {{
            "type": "STRING",
            "scalar": "{label}"
          }},
          "Properties": {{
            "type": "PROPERTY_MAP",
            "scalar": {{}}
          }}
        }}"#,
        label = p.label()
    )
}

/// Shortest round-trip text of a real, always with a fractional part or exponent.
///
/// `40.0`, `-2.25`, `0.0001`, `1e-05`, `1.5e+16`.
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    // Debug keeps the ".0" and switches to exponent form below 1e-4 and from 1e16 up.
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => text,
        },
        None => text,
    }
}

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
