use serde::{Deserialize, Serialize};

/// Status badges beyond this count are dropped before layout.
pub const MAX_BADGES: usize = 3;
/// Deployment links beyond this count are dropped before layout.
pub const MAX_DEPLOYMENTS: usize = 3;
/// External links beyond this count are dropped when adapting a catalog entity.
pub const MAX_EXTERNAL_LINKS: usize = 3;

/// Returns the first `cap` items, preserving order.
///
/// Overflowing collections are never an error; the extra entries are logged and ignored.
pub fn capped<'a, T>(items: &'a [T], cap: usize, section: &str) -> &'a [T] {
    if items.len() > cap {
        tracing::debug!(
            section,
            count = items.len(),
            cap,
            "truncating overflowing card collection"
        );
        &items[..cap]
    } else {
        items
    }
}

/// A link to an in-application view (docs, apis, ci-cd, source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub key: String,
    pub target: String,
    #[serde(default)]
    pub open_in_new_context: bool,
}

impl LinkItem {
    pub fn new(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target: target.into(),
            open_in_new_context: false,
        }
    }

    pub fn in_new_context(mut self, open_in_new_context: bool) -> Self {
        self.open_in_new_context = open_in_new_context;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLinkItem {
    /// May be empty; the renderer substitutes a default label.
    #[serde(default)]
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeIcon {
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentLink {
    pub link: String,
    /// Data plane name, e.g. `dp-dev`.
    pub label: String,
    pub app_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryIcon {
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Default,
    Primary,
    Secondary,
}

/// State of the details-panel affordance in the top-right corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DetailsAffordance {
    /// No affordance is drawn.
    #[default]
    Hidden,
    /// The panel is closed; clicking opens it.
    Closed,
    /// The panel is open; clicking toggles the lock.
    Open { locked: bool },
}

/// Already-resolved color tokens. The engine never derives colors itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
}

/// Everything the card engine needs for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub primary_icon: Option<PrimaryIcon>,
    #[serde(default)]
    pub badges: Vec<BadgeIcon>,
    #[serde(default)]
    pub internal_links: Vec<LinkItem>,
    #[serde(default)]
    pub external_links: Vec<ExternalLinkItem>,
    #[serde(default)]
    pub deployment_links: Vec<DeploymentLink>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub accent: Accent,
    /// Whether the host attached an activation handler to the card root.
    #[serde(default)]
    pub activatable: bool,
    #[serde(default)]
    pub details: DetailsAffordance,
    #[serde(default)]
    pub colors: ThemeTokens,
}

impl CardInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The title to display, falling back to the stable id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn subtitle_text(&self) -> &str {
        self.subtitle.as_deref().unwrap_or("")
    }

    pub fn capped_badges(&self) -> &[BadgeIcon] {
        capped(&self.badges, MAX_BADGES, "badges")
    }

    pub fn capped_deployments(&self) -> &[DeploymentLink] {
        capped(&self.deployment_links, MAX_DEPLOYMENTS, "deployments")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_keeps_order_and_drops_the_tail() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(capped(&items, 3, "test"), &[1, 2, 3]);
        assert_eq!(capped(&items[..2], 3, "test"), &[1, 2]);
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let mut input = CardInput::new("component:default/orders");
        assert_eq!(input.display_title(), "component:default/orders");
        input.title = Some("Orders".to_string());
        assert_eq!(input.display_title(), "Orders");
    }

    #[test]
    fn card_input_deserializes_with_defaults() {
        let input: CardInput = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "title": "Test Service",
            "details": { "state": "open", "locked": true },
            "accent": "secondary"
        }))
        .expect("card input");
        assert_eq!(input.details, DetailsAffordance::Open { locked: true });
        assert_eq!(input.accent, Accent::Secondary);
        assert!(input.badges.is_empty());
        assert!(!input.activatable);
    }
}
