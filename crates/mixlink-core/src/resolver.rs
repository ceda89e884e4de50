//! Conversion between surface values and raw wire values.
//!
//! Numeric controls are fixed-point on the wire: a surface value `v`
//! travels as `round(v * scale)`, clamped to the descriptor range. Faders
//! whose minimum is the `-Inf` sentinel get special handling when nudged
//! relatively: there is a gap between `-Inf` and the lowest finite
//! position, and relative moves jump across it instead of crawling through.

use crate::catalog::{CommandDescriptor, ValueKind};
use crate::store::DataStore;
use crate::value::{RawValue, UiValue};
use crate::{Error, Result};

/// Lowest finite fader position (-138 dB) on `-Inf` capable faders.
pub const SECONDARY_FLOOR: i64 = -13800;

/// High-pass filter frequencies in 1/12-octave steps, Hz.
pub const HPF_FREQUENCIES: [f64; 60] = [
    20.0, 21.2, 22.4, 23.8, 25.2, 26.7, 28.3, 30.0, 31.7, 33.6, 35.6, 37.8, 40.0, 42.4, 44.9,
    47.6, 50.4, 53.4, 56.6, 59.9, 63.5, 67.3, 71.3, 75.5, 80.0, 84.8, 89.8, 95.1, 100.8, 106.8,
    113.1, 119.9, 127.0, 134.5, 142.5, 151.0, 160.0, 169.5, 179.6, 190.3, 201.6, 213.6, 226.3,
    239.7, 254.0, 269.1, 285.1, 302.0, 320.0, 339.0, 359.2, 380.5, 403.2, 427.1, 452.5, 479.5,
    508.0, 538.2, 570.2, 600.0,
];

/// How a surface value is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Treat a number as a delta from the cached value.
    pub relative: bool,
}

impl ResolveOptions {
    pub fn relative() -> Self {
        Self { relative: true }
    }
}

/// Whether resolving `ui` needs the cached value at the target coordinate.
pub fn needs_current(ui: &UiValue, options: ResolveOptions) -> bool {
    matches!(ui, UiValue::Toggle) || (options.relative && matches!(ui, UiValue::Number(_)))
}

/// Convert a surface value into the raw value to send.
///
/// Toggle and relative values read the store at `(address, x, y)` and fail
/// with [`Error::ValueUnavailable`] when nothing is cached yet.
pub fn to_wire(
    descriptor: &CommandDescriptor,
    ui: &UiValue,
    options: ResolveOptions,
    store: &DataStore,
    x: u32,
    y: u32,
) -> Result<RawValue> {
    let current = || {
        store
            .get(&descriptor.address, x, y)
            .and_then(RawValue::as_int)
            .ok_or_else(|| Error::ValueUnavailable {
                address: descriptor.address.clone(),
                x,
                y,
            })
    };

    match ui {
        UiValue::Toggle => {
            if !descriptor.is_toggleable() {
                return Err(invalid(descriptor, "toggle on a non-switch control"));
            }
            Ok(RawValue::Int(1 - current()?.clamp(0, 1)))
        }
        UiValue::Number(delta) if options.relative => {
            relative(descriptor, *delta, current()?).map(RawValue::Int)
        }
        _ => absolute(descriptor, ui),
    }
}

/// Convert a raw value into its surface representation.
pub fn from_wire(descriptor: &CommandDescriptor, raw: &RawValue) -> UiValue {
    match raw {
        RawValue::Text(s) => UiValue::Text(s.clone()),
        RawValue::Int(n) => match descriptor.kind {
            kind if kind.is_numeric() => {
                if descriptor.has_neg_inf() && *n == descriptor.min {
                    UiValue::NegInf
                } else {
                    UiValue::Number(*n as f64 / descriptor.scale as f64)
                }
            }
            ValueKind::String => UiValue::Text(n.to_string()),
            _ => UiValue::Number(*n as f64),
        },
    }
}

fn absolute(descriptor: &CommandDescriptor, ui: &UiValue) -> Result<RawValue> {
    match descriptor.kind {
        ValueKind::Integer | ValueKind::Frequency | ValueKind::Meter => match ui {
            UiValue::Number(v) => Ok(RawValue::Int(scale_and_clamp(descriptor, *v))),
            UiValue::NegInf => Ok(RawValue::Int(descriptor.min)),
            UiValue::Text(t) => Err(invalid(descriptor, &format!("'{t}' is not a number"))),
            UiValue::Toggle => Err(invalid(descriptor, "toggle on a non-switch control")),
        },
        ValueKind::Bool | ValueKind::Binary => match ui {
            UiValue::Number(v) => Ok(RawValue::Int(i64::from(*v != 0.0))),
            other => Err(invalid(descriptor, &format!("'{other}' is not 0 or 1"))),
        },
        ValueKind::String => Ok(RawValue::Text(ui.to_string())),
        ValueKind::Scene => match ui {
            UiValue::Number(v) if v.fract() == 0.0 => Ok(RawValue::Int(*v as i64)),
            UiValue::Number(v) => Ok(RawValue::Text(format!("{v:.2}"))),
            UiValue::Text(t) => Ok(RawValue::Text(t.clone())),
            other => Err(invalid(descriptor, &format!("'{other}' is not a scene number"))),
        },
    }
}

fn relative(descriptor: &CommandDescriptor, delta: f64, current: i64) -> Result<i64> {
    if !descriptor.kind.is_numeric() && !descriptor.kind.is_switch() {
        return Err(invalid(descriptor, "relative change on a non-numeric control"));
    }

    if descriptor.kind == ValueKind::Frequency {
        let hz = current as f64 / descriptor.scale as f64;
        let last = HPF_FREQUENCIES.len() as i64 - 1;
        let i = (nearest_hpf_index(hz) as i64 + delta.round() as i64).clamp(0, last);
        let raw = (HPF_FREQUENCIES[i as usize] * descriptor.scale as f64).round() as i64;
        return Ok(raw.clamp(descriptor.min, descriptor.max));
    }

    let step = (delta * descriptor.scale as f64).round() as i64;
    let next = if descriptor.has_neg_inf() {
        if current < SECONDARY_FLOOR {
            if delta > 0.0 {
                SECONDARY_FLOOR
            } else {
                descriptor.min
            }
        } else {
            let next = current.saturating_add(step);
            if next < SECONDARY_FLOOR {
                descriptor.min
            } else {
                next
            }
        }
    } else {
        current.saturating_add(step)
    };
    Ok(next.clamp(descriptor.min, descriptor.max))
}

fn nearest_hpf_index(hz: f64) -> usize {
    HPF_FREQUENCIES
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - hz).abs().total_cmp(&(*b - hz).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn scale_and_clamp(descriptor: &CommandDescriptor, v: f64) -> i64 {
    let raw = (v * descriptor.scale as f64).round();
    // float to int casts saturate
    (raw as i64).clamp(descriptor.min, descriptor.max)
}

fn invalid(descriptor: &CommandDescriptor, reason: &str) -> Error {
    Error::InvalidValue {
        address: descriptor.address.clone(),
        reason: reason.to_string(),
    }
}
