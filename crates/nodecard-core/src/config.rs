use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed outer geometry of a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardGeometry {
    pub card_width: f64,
    pub card_height: f64,
    pub icon_section_width: f64,
    pub text_section_width: f64,
    pub padding: f64,
    pub icon_size: f64,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            card_width: 350.0,
            card_height: 92.0,
            icon_section_width: 70.0,
            text_section_width: 286.0,
            padding: 8.0,
            icon_size: 16.0,
        }
    }
}

impl CardGeometry {
    /// Baseline of the bottom row (links, deployments).
    pub fn links_y(&self) -> f64 {
        self.card_height - self.padding - self.icon_size
    }

    /// Left edge of the text column.
    pub fn text_x(&self) -> f64 {
        self.icon_section_width + self.padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BadgeMetrics {
    pub icon_size: f64,
    pub icon_padding: f64,
}

impl Default for BadgeMetrics {
    fn default() -> Self {
        Self {
            icon_size: 12.0,
            icon_padding: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkBarMetrics {
    pub slot_width: f64,
    pub nudge: f64,
    pub divider_width: f64,
}

impl Default for LinkBarMetrics {
    fn default() -> Self {
        Self {
            slot_width: 20.0,
            nudge: 3.0,
            divider_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeploymentMetrics {
    /// Entity category that shows the deployment cluster.
    pub category: String,
    pub gap: f64,
    /// Leading characters stripped from a data plane name before display.
    pub label_prefix_len: usize,
    pub label_offset_y: f64,
    pub tooltip_offset_y: f64,
}

impl Default for DeploymentMetrics {
    fn default() -> Self {
        Self {
            category: "Component".to_string(),
            gap: 4.0,
            label_prefix_len: 3,
            label_offset_y: 5.0,
            tooltip_offset_y: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardLabels {
    pub external_links: String,
    pub deployments: String,
    pub open_link: String,
    /// Prefix for internal link tooltips, followed by the link key.
    pub open_prefix: String,
    pub open_details: String,
    pub lock_details: String,
    pub unlock_details: String,
}

impl Default for CardLabels {
    fn default() -> Self {
        Self {
            external_links: "External Links".to_string(),
            deployments: "Deployments".to_string(),
            open_link: "Open Link".to_string(),
            open_prefix: "Open".to_string(),
            open_details: "Open Details".to_string(),
            lock_details: "Lock Details".to_string(),
            unlock_details: "Unlock Details".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogSettings {
    /// Internal link keys that open in a new navigation context.
    pub new_context_link_keys: Vec<String>,
    /// Base URL of the control plane used to build deployment links.
    pub control_plane_url: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            new_context_link_keys: vec!["source".to_string()],
            control_plane_url: None,
        }
    }
}

/// Every tunable of the card engine. `CardConfig::default()` is the reference card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardConfig {
    pub geometry: CardGeometry,
    pub badges: BadgeMetrics,
    pub link_bar: LinkBarMetrics,
    pub deployments: DeploymentMetrics,
    pub labels: CardLabels,
    pub catalog: CatalogSettings,
}

impl CardConfig {
    /// Overlays a (possibly partial) JSON document on top of the defaults.
    pub fn from_value(overrides: &Value) -> Result<Self> {
        if !overrides.is_object() && !overrides.is_null() {
            return Err(Error::InvalidConfig {
                message: format!("expected a JSON object, got {overrides}"),
            });
        }
        let mut base = serde_json::to_value(Self::default())?;
        deep_merge_value(&mut base, overrides);
        Self::deserialize(&base).map_err(|err| Error::InvalidConfig {
            message: err.to_string(),
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn as_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
