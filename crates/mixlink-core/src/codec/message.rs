//! Inbound message model and line parser.

use super::tokenize;
use crate::value::RawValue;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Meter samples of one `mtr` line, one byte per pickoff point.
pub type MeterSamples = SmallVec<[u8; 64]>;

/// Leading status keyword of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Reply to one of our commands.
    Ok,
    /// Reply to one of our commands, more to follow.
    OkMulti,
    /// Unsolicited change on the console.
    Notify,
    Error,
}

impl Status {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "OK" => Some(Status::Ok),
            "OKM" => Some(Status::OkMulti),
            "NOTIFY" => Some(Status::Notify),
            "ERROR" => Some(Status::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Get,
    Set,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Get => f.write_str("get"),
            Direction::Set => f.write_str("set"),
        }
    }
}

/// Every verb the codec reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Set,
    SsRecall,
    SsRecallT,
    SsCurrent,
    SsCurrentT,
    SsUpdate,
    SsUpdateT,
    SsInfo,
    SsInfoT,
    Event,
    MtrStart,
    MtrStop,
    Mtr,
    DevInfo,
}

impl Verb {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "get" => Verb::Get,
            "set" => Verb::Set,
            "ssrecall_ex" => Verb::SsRecall,
            "ssrecallt_ex" => Verb::SsRecallT,
            "sscurrent_ex" => Verb::SsCurrent,
            "sscurrentt_ex" => Verb::SsCurrentT,
            "ssupdate_ex" => Verb::SsUpdate,
            "ssupdatet_ex" => Verb::SsUpdateT,
            "ssinfo_ex" => Verb::SsInfo,
            "ssinfot_ex" => Verb::SsInfoT,
            "event" => Verb::Event,
            "mtrstart" => Verb::MtrStart,
            "mtrstop" => Verb::MtrStop,
            "mtr" => Verb::Mtr,
            "devinfo" => Verb::DevInfo,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Set => "set",
            Verb::SsRecall => "ssrecall_ex",
            Verb::SsRecallT => "ssrecallt_ex",
            Verb::SsCurrent => "sscurrent_ex",
            Verb::SsCurrentT => "sscurrentt_ex",
            Verb::SsUpdate => "ssupdate_ex",
            Verb::SsUpdateT => "ssupdatet_ex",
            Verb::SsInfo => "ssinfo_ex",
            Verb::SsInfoT => "ssinfot_ex",
            Verb::Event => "event",
            Verb::MtrStart => "mtrstart",
            Verb::MtrStop => "mtrstop",
            Verb::Mtr => "mtr",
            Verb::DevInfo => "devinfo",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Recall,
    Current,
    Store,
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Param {
        status: Status,
        direction: Direction,
        address: String,
        x: u32,
        y: u32,
        value: RawValue,
        display: Option<String>,
    },
    Scene {
        status: Status,
        kind: SceneKind,
        /// `MIXER:Lib/Scene` or a bank name (`scene_a`, `scene_b`).
        target: String,
        number: String,
        scene_status: Option<String>,
    },
    SceneInfo {
        target: String,
        number: String,
        name: String,
        comment: String,
    },
    DeviceInfo {
        field: String,
        value: String,
    },
    Meter {
        address: String,
        samples: MeterSamples,
    },
    /// Confirmation of a fire-and-forget verb (`event`, `mtrstart`, `mtrstop`).
    Ack {
        verb: Verb,
        address: String,
    },
    Error {
        verb: String,
        reason: String,
    },
    Unknown {
        line: String,
        reason: String,
    },
}

/// Parse one line. Lines that cannot be understood become [`Message::Unknown`].
pub fn parse_line(line: &str) -> Message {
    match try_parse(line) {
        Ok(message) => message,
        Err(e) => Message::Unknown {
            line: line.to_string(),
            reason: e.to_string(),
        },
    }
}

fn try_parse(line: &str) -> Result<Message> {
    let tokens = tokenize(line);
    let first = tokens
        .first()
        .ok_or_else(|| Error::MalformedLine("empty line".to_string()))?;
    let status = Status::from_token(first)
        .ok_or_else(|| Error::MalformedLine(format!("unexpected status '{first}'")))?;

    if status == Status::Error {
        return Ok(Message::Error {
            verb: tokens.get(1).cloned().unwrap_or_default(),
            reason: tokens.get(2..).map(|r| r.join(" ")).unwrap_or_default(),
        });
    }

    let verb_token = tokens
        .get(1)
        .ok_or_else(|| Error::MalformedLine("missing verb".to_string()))?;
    let verb = Verb::from_token(verb_token)
        .ok_or_else(|| Error::UnrecognizedVerb(verb_token.clone()))?;

    match verb {
        Verb::Get | Verb::Set => parse_param(status, verb, &tokens),
        Verb::SsRecall | Verb::SsRecallT => parse_scene(status, SceneKind::Recall, &tokens),
        Verb::SsCurrent | Verb::SsCurrentT => parse_scene(status, SceneKind::Current, &tokens),
        Verb::SsUpdate | Verb::SsUpdateT => parse_scene(status, SceneKind::Store, &tokens),
        Verb::SsInfo | Verb::SsInfoT => Ok(Message::SceneInfo {
            target: field(&tokens, 2, "scene target")?.to_string(),
            number: field(&tokens, 3, "scene number")?.to_string(),
            name: tokens.get(4).cloned().unwrap_or_default(),
            comment: tokens.get(5).cloned().unwrap_or_default(),
        }),
        Verb::DevInfo => Ok(Message::DeviceInfo {
            field: field(&tokens, 2, "devinfo field")?.to_string(),
            value: tokens[3..].join(" "),
        }),
        Verb::Mtr => parse_meter(&tokens),
        Verb::Event | Verb::MtrStart | Verb::MtrStop => Ok(Message::Ack {
            verb,
            address: tokens.get(2).cloned().unwrap_or_default(),
        }),
    }
}

fn field<'a>(tokens: &'a [String], i: usize, what: &str) -> Result<&'a str> {
    tokens
        .get(i)
        .map(String::as_str)
        .ok_or_else(|| Error::MalformedLine(format!("missing {what}")))
}

fn coordinate(tokens: &[String], i: usize, what: &str) -> Result<u32> {
    let token = field(tokens, i, what)?;
    token
        .parse()
        .map_err(|_| Error::MalformedLine(format!("bad {what} '{token}'")))
}

fn parse_param(status: Status, verb: Verb, tokens: &[String]) -> Result<Message> {
    let direction = if verb == Verb::Get {
        Direction::Get
    } else {
        Direction::Set
    };
    Ok(Message::Param {
        status,
        direction,
        address: field(tokens, 2, "address")?.to_string(),
        x: coordinate(tokens, 3, "x")?,
        y: coordinate(tokens, 4, "y")?,
        value: RawValue::from_token(field(tokens, 5, "value")?),
        display: tokens.get(6).cloned(),
    })
}

fn parse_scene(status: Status, kind: SceneKind, tokens: &[String]) -> Result<Message> {
    Ok(Message::Scene {
        status,
        kind,
        target: field(tokens, 2, "scene target")?.to_string(),
        number: field(tokens, 3, "scene number")?.to_string(),
        scene_status: tokens.get(4).cloned(),
    })
}

fn parse_meter(tokens: &[String]) -> Result<Message> {
    let address = field(tokens, 2, "meter address")?.to_string();
    let samples = tokens[3..]
        .iter()
        .map(|t| {
            u8::from_str_radix(t, 16)
                .map_err(|_| Error::MalformedLine(format!("bad meter sample '{t}'")))
        })
        .collect::<Result<MeterSamples>>()?;
    Ok(Message::Meter { address, samples })
}
