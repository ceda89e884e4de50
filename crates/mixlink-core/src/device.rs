//! Device identity and scene state reported by the console.

use crate::codec::DeviceField;
use crate::model::ConsoleModel;

/// Answers to the `devinfo` poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub product_name: Option<String>,
    pub detected_model: Option<ConsoleModel>,
    pub input_channels: Option<u32>,
    pub mix_buses: Option<u32>,
    pub matrix_buses: Option<u32>,
    pub aux_buses: Option<u32>,
}

impl DeviceInfo {
    /// Record one `devinfo` answer. Returns the field if it was recognized.
    pub fn apply(&mut self, field: &str, value: &str) -> Option<DeviceField> {
        let field = DeviceField::from_token(field)?;
        let count = value.trim().parse::<u32>().ok();
        match field {
            DeviceField::ProductName => {
                self.product_name = Some(value.to_string());
                self.detected_model = ConsoleModel::detect(value);
            }
            DeviceField::InputCh => self.input_channels = count,
            DeviceField::MixBus => self.mix_buses = count,
            DeviceField::MatrixBus => self.matrix_buses = count,
            DeviceField::AuxBus => self.aux_buses = count,
        }
        Some(field)
    }
}

/// The console's current scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneState {
    /// Scene number as the console reports it (`12` or `12.00`).
    pub number: Option<String>,
    /// Bank index on banked models, `0` otherwise.
    pub bank: u32,
    /// Companion status, e.g. `modified`.
    pub status: Option<String>,
    pub name: Option<String>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_devinfo() {
        let mut info = DeviceInfo::default();
        assert_eq!(
            info.apply("productname", "QL5"),
            Some(DeviceField::ProductName)
        );
        assert_eq!(info.detected_model, Some(ConsoleModel::ClQl));
        info.apply("inputch", "64");
        info.apply("mixbus", "16");
        assert_eq!(info.input_channels, Some(64));
        assert_eq!(info.mix_buses, Some(16));
        assert_eq!(info.apply("serialno", "123"), None);
    }
}
