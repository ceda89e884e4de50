//! Command descriptors: one per addressable console control.

use crate::value::RawValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw minimum that doubles as the `-Inf` fader position.
pub const NEG_INF_SENTINEL: i64 = -32768;

/// Wire encoding of a control's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Integer,
    Frequency,
    Bool,
    Binary,
    String,
    Meter,
    Scene,
}

impl ValueKind {
    /// Parse a dump `Type` token (`integer`, `freq`, `bool`, `binary`, `string`, `mtr`, `scene`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "integer" => Some(ValueKind::Integer),
            "freq" => Some(ValueKind::Frequency),
            "bool" => Some(ValueKind::Bool),
            "binary" => Some(ValueKind::Binary),
            "string" => Some(ValueKind::String),
            "mtr" => Some(ValueKind::Meter),
            "scene" => Some(ValueKind::Scene),
            _ => None,
        }
    }

    /// Scaled integer kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Frequency | ValueKind::Meter
        )
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::Binary)
    }
}

/// Category of a descriptor, derived from its index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandClass {
    /// `index < 1000`
    Parameter,
    /// `1000..=1009`
    Scene,
    /// `1010..=1999`
    SceneStep,
    /// `index >= 2000`
    Meter,
}

impl CommandClass {
    pub fn from_index(index: u32) -> Self {
        match index {
            0..=999 => CommandClass::Parameter,
            1000..=1009 => CommandClass::Scene,
            1010..=1999 => CommandClass::SceneStep,
            _ => CommandClass::Meter,
        }
    }
}

/// Read/write permission of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Access {
    pub read: bool,
    pub write: bool,
}

impl Access {
    pub const READ_WRITE: Access = Access {
        read: true,
        write: true,
    };

    /// Parse a dump `RW` token (`r`, `w`, `rw`).
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.to_ascii_lowercase();
        if token.is_empty() || !token.chars().all(|c| c == 'r' || c == 'w') {
            return None;
        }
        Some(Access {
            read: token.contains('r'),
            write: token.contains('w'),
        })
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.read, self.write) {
            (true, true) => f.write_str("rw"),
            (true, false) => f.write_str("r"),
            (false, true) => f.write_str("w"),
            (false, false) => f.write_str("-"),
        }
    }
}

/// Everything needed to address and encode one console control.
///
/// `x_count`/`y_count` give the cardinality of the two coordinate
/// dimensions. A count of `1` means the dimension is absent, though
/// ordinary parameters still carry coordinate `0` on the wire.
///
/// Raw values are fixed-point: a display value `v` travels as
/// `round(v * scale)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub index: u32,
    pub address: String,
    pub x_count: u32,
    pub y_count: u32,
    pub min: i64,
    pub max: i64,
    pub default: RawValue,
    pub unit: String,
    pub kind: ValueKind,
    pub ui: String,
    pub access: Access,
    pub scale: i64,
    pub pickoffs: Vec<String>,
}

impl CommandDescriptor {
    pub fn class(&self) -> CommandClass {
        CommandClass::from_index(self.index)
    }

    /// Identifier used by the control surface: the address with `:` replaced by `_`.
    pub fn action_id(&self) -> String {
        self.address.replace(':', "_")
    }

    pub fn is_readable(&self) -> bool {
        self.access.read
    }

    pub fn is_writable(&self) -> bool {
        self.access.write
    }

    pub fn is_color(&self) -> bool {
        self.address.ends_with("Color")
    }

    pub fn is_name(&self) -> bool {
        self.address.ends_with("Name")
    }

    /// Whether `min` is the `-Inf` sentinel.
    pub fn has_neg_inf(&self) -> bool {
        self.min == NEG_INF_SENTINEL
    }

    /// Toggle applies to switches and to `0..=1` integers.
    pub fn is_toggleable(&self) -> bool {
        self.kind.is_switch()
            || (self.kind == ValueKind::Integer && self.min == 0 && self.max == 1)
    }

    /// Type an inbound value by this control's kind rather than by its shape.
    pub fn coerce(&self, raw: RawValue) -> RawValue {
        match (self.kind, raw) {
            (ValueKind::String, RawValue::Int(n)) => RawValue::Text(n.to_string()),
            (_, raw) => raw,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.x_count.max(1) && y < self.y_count.max(1)
    }

    /// Address segment after the first `/`, the catalog sort key.
    pub(crate) fn sort_key(&self) -> String {
        let tail = match self.address.find('/') {
            Some(pos) => &self.address[pos + 1..],
            None => self.address.as_str(),
        };
        tail.to_lowercase()
    }
}
