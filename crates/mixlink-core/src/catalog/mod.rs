//! Parameter catalog: the per-model table of command descriptors.
//!
//! Catalogs are read from the console's own parameter dump format, one
//! descriptor per line:
//!
//! ```text
//! OK prminfo <Index> "<Address>" <X> <Y> <Min> <Max> <Default> "<Unit>" <Type> <UI> <RW> <Scale> ["a|b"]
//! ```
//!
//! Lines not starting with `OK`/`NOTIFY` are ignored. Lines that fail to
//! decode are skipped with a warning.

mod descriptor;

pub use descriptor::{
    Access, CommandClass, CommandDescriptor, ValueKind, NEG_INF_SENTINEL,
};

use crate::codec::tokenize;
use crate::model::ConsoleModel;
use crate::value::RawValue;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

const CLQL_DUMP: &str = include_str!("data/clql.txt");
const TF_DUMP: &str = include_str!("data/tf.txt");
const PM_DUMP: &str = include_str!("data/pm.txt");
const DM3_DUMP: &str = include_str!("data/dm3.txt");
const DM7_DUMP: &str = include_str!("data/dm7.txt");

/// Immutable descriptor table for one console model.
#[derive(Debug, Clone)]
pub struct Catalog {
    model: ConsoleModel,
    descriptors: Vec<CommandDescriptor>,
    by_address: HashMap<String, usize>,
    by_action_id: HashMap<String, usize>,
}

impl Catalog {
    /// Load the built-in catalog for a model identifier (`CL/QL`, `TF`, `PM`, `DM3`, `DM7`).
    pub fn load(model_identifier: &str) -> Result<Self> {
        let model = ConsoleModel::from_identifier(model_identifier)
            .ok_or_else(|| Error::CatalogUnavailable(model_identifier.to_string()))?;
        Self::for_model(model)
    }

    pub fn for_model(model: ConsoleModel) -> Result<Self> {
        let dump = match model {
            ConsoleModel::ClQl => CLQL_DUMP,
            ConsoleModel::Tf => TF_DUMP,
            ConsoleModel::Pm => PM_DUMP,
            ConsoleModel::Dm3 => DM3_DUMP,
            ConsoleModel::Dm7 => DM7_DUMP,
        };
        Self::from_dump(model, dump)
    }

    /// Load a catalog from a parameter dump file.
    pub fn load_file(model: ConsoleModel, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading parameter dump {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_dump(model, &text)
    }

    /// Build a catalog from parameter dump text.
    pub fn from_dump(model: ConsoleModel, text: &str) -> Result<Self> {
        let mut descriptors = Vec::new();

        for (line_no, line) in text.split('\n').enumerate() {
            let tokens = tokenize(line.trim_end_matches('\r'));
            let Some(status) = tokens.first() else {
                continue;
            };
            if !status.eq_ignore_ascii_case("OK") && !status.eq_ignore_ascii_case("NOTIFY") {
                continue;
            }
            match parse_descriptor(&tokens) {
                Some(descriptor) => descriptors.push(descriptor),
                None => warn!(line = line_no + 1, "Skipping undecodable catalog line: {line}"),
            }
        }

        if descriptors.is_empty() {
            return Err(Error::InvalidCatalog(format!(
                "no descriptors decoded for {model}"
            )));
        }

        descriptors.sort_by_cached_key(|d| d.sort_key());

        let mut by_address = HashMap::with_capacity(descriptors.len());
        let mut by_action_id = HashMap::with_capacity(descriptors.len());
        for (i, d) in descriptors.iter().enumerate() {
            if by_address.insert(d.address.clone(), i).is_some() {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate address {}",
                    d.address
                )));
            }
            by_action_id.insert(d.action_id(), i);
        }

        debug!("Loaded {} descriptors for {model}", descriptors.len());

        Ok(Self {
            model,
            descriptors,
            by_address,
            by_action_id,
        })
    }

    pub fn model(&self) -> ConsoleModel {
        self.model
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, address: &str) -> Option<&CommandDescriptor> {
        self.by_address.get(address).map(|&i| &self.descriptors[i])
    }

    pub fn find_by_action_id(&self, id: &str) -> Option<&CommandDescriptor> {
        self.by_action_id.get(id).map(|&i| &self.descriptors[i])
    }

    /// Look up by address or action id.
    pub fn lookup(&self, id: &str) -> Option<&CommandDescriptor> {
        self.get(id).or_else(|| self.find_by_action_id(id))
    }

    pub fn readable(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.iter().filter(|d| d.is_readable())
    }

    pub fn writable(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.iter().filter(|d| d.is_writable())
    }

    pub fn color_addresses(&self) -> impl Iterator<Item = &str> {
        self.descriptors
            .iter()
            .filter(|d| d.is_color())
            .map(|d| d.address.as_str())
    }

    pub fn name_addresses(&self) -> impl Iterator<Item = &str> {
        self.descriptors
            .iter()
            .filter(|d| d.is_name())
            .map(|d| d.address.as_str())
    }

    /// The scene recall descriptor (index 1000), if the model has one.
    pub fn scene_recall(&self) -> Option<&CommandDescriptor> {
        self.descriptors.iter().find(|d| d.index == 1000)
    }
}

fn parse_descriptor(tokens: &[String]) -> Option<CommandDescriptor> {
    if tokens.len() < 14 {
        return None;
    }
    let scale = match tokens[13].parse::<i64>().ok()? {
        0 => 1,
        s => s,
    };
    let mut descriptor = CommandDescriptor {
        index: tokens[2].parse().ok()?,
        address: non_empty(&tokens[3])?,
        x_count: tokens[4].parse().ok()?,
        y_count: tokens[5].parse().ok()?,
        min: tokens[6].parse().ok()?,
        max: tokens[7].parse().ok()?,
        default: RawValue::from_token(&tokens[8]),
        unit: tokens[9].clone(),
        kind: ValueKind::from_token(&tokens[10])?,
        ui: tokens[11].clone(),
        access: Access::from_token(&tokens[12])?,
        scale,
        pickoffs: tokens
            .get(14)
            .map(|p| {
                p.split('|')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };
    descriptor.default = descriptor.coerce(descriptor.default.clone());
    Some(descriptor)
}

fn non_empty(token: &str) -> Option<String> {
    (!token.is_empty()).then(|| token.to_string())
}
