//! Outbound line formatting.

use super::message::{Direction, Verb};
use crate::catalog::{CommandClass, CommandDescriptor, ValueKind};
use crate::model::{ConsoleModel, SceneStyle};
use crate::value::RawValue;
use std::fmt;

const SCENE_LIBRARY: &str = "MIXER:Lib/Scene";
const SCENE_STORE_INDEX: u32 = 1001;

/// Model-dependent settings the formatter needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatContext {
    pub model: ConsoleModel,
    /// Sent as the `mtrstart` interval.
    pub meter_interval_ms: u32,
}

impl FormatContext {
    pub fn new(model: ConsoleModel, meter_interval_ms: u32) -> Self {
        Self {
            model,
            meter_interval_ms,
        }
    }

    fn scene_target(&self, bank: u32) -> &'static str {
        match self.model.scene_style() {
            SceneStyle::Banked if bank == 0 => "scene_a",
            SceneStyle::Banked => "scene_b",
            SceneStyle::Library | SceneStyle::LibraryText => SCENE_LIBRARY,
        }
    }

    fn text_scenes(&self) -> bool {
        self.model.scene_style() == SceneStyle::LibraryText
    }
}

/// `devinfo` fields polled from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceField {
    ProductName,
    InputCh,
    MixBus,
    MatrixBus,
    AuxBus,
}

impl DeviceField {
    pub const POLL: [DeviceField; 5] = [
        DeviceField::ProductName,
        DeviceField::InputCh,
        DeviceField::MixBus,
        DeviceField::MatrixBus,
        DeviceField::AuxBus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceField::ProductName => "productname",
            DeviceField::InputCh => "inputch",
            DeviceField::MixBus => "mixbus",
            DeviceField::MatrixBus => "matrixbus",
            DeviceField::AuxBus => "auxbus",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::POLL.into_iter().find(|f| f.as_str() == token)
    }
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog-independent requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    DeviceInfo(DeviceField),
    /// Name and comment of a stored scene.
    SceneInfo { bank: u32, number: String },
}

/// Format a get or set for a descriptor.
///
/// `value` is ignored for `get`. Scene and event lines never carry
/// coordinates; meter lines carry the polling interval instead.
pub fn format_command(
    ctx: &FormatContext,
    descriptor: &CommandDescriptor,
    direction: Direction,
    x: u32,
    y: u32,
    value: Option<&RawValue>,
) -> String {
    let value = match direction {
        Direction::Get => None,
        Direction::Set => value,
    };

    let parts: Vec<String> = match descriptor.class() {
        CommandClass::Scene => {
            let store = descriptor.index == SCENE_STORE_INDEX;
            let verb = match (direction, store, ctx.text_scenes()) {
                (Direction::Get, _, false) => Verb::SsCurrent,
                (Direction::Get, _, true) => Verb::SsCurrentT,
                (Direction::Set, false, false) => Verb::SsRecall,
                (Direction::Set, false, true) => Verb::SsRecallT,
                (Direction::Set, true, false) => Verb::SsUpdate,
                (Direction::Set, true, true) => Verb::SsUpdateT,
            };
            let mut parts = vec![verb.to_string(), ctx.scene_target(y).to_string()];
            parts.extend(value.map(|v| sanitize(&v.to_string())));
            parts
        }
        CommandClass::SceneStep => {
            let mut parts = vec![Verb::Event.to_string(), descriptor.address.clone()];
            parts.extend(value.map(|v| sanitize(&v.to_string())));
            parts
        }
        CommandClass::Meter => vec![
            Verb::MtrStart.to_string(),
            descriptor.address.clone(),
            ctx.meter_interval_ms.to_string(),
        ],
        CommandClass::Parameter => {
            let mut parts = vec![
                direction.to_string(),
                descriptor.address.clone(),
                x.to_string(),
                y.to_string(),
            ];
            if let Some(v) = value {
                let text = sanitize(&v.to_string());
                if descriptor.kind == ValueKind::String {
                    parts.push(format!("\"{text}\""));
                } else {
                    parts.push(text);
                }
            }
            parts
        }
    };

    join(parts)
}

/// Format a device or scene-info query.
pub fn format_query(ctx: &FormatContext, query: &Query) -> String {
    match query {
        Query::DeviceInfo(field) => format!("{} {}", Verb::DevInfo, field),
        Query::SceneInfo { bank, number } => {
            let verb = if ctx.text_scenes() {
                Verb::SsInfoT
            } else {
                Verb::SsInfo
            };
            join(vec![
                verb.to_string(),
                ctx.scene_target(*bank).to_string(),
                sanitize(number),
            ])
        }
    }
}

/// Strip characters that would break quoting or framing.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect()
}

fn join(parts: Vec<String>) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
