//! Adapter from a catalog entity document to a [`CardInput`].
//!
//! This is a pure JSON transform: link targets are derived from the entity itself plus the
//! configured control-plane base URL, nothing is fetched.

use crate::config::CardConfig;
use crate::model::{
    Accent, BadgeIcon, CardInput, DeploymentLink, DetailsAffordance, ExternalLinkItem, LinkItem,
    MAX_EXTERNAL_LINKS, PrimaryIcon, capped,
};
use crate::theme::{ThemeCustomization, resolve_theme};
use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

pub const TOPOLOGY_METADATA_KEY: &str = "tibco.developer.hub/topology";
pub const VIEW_URL_ANNOTATION: &str = "backstage.io/view-url";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Node-level state owned by the graph host rather than the entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityContext {
    pub focused: bool,
    pub accent: Accent,
    pub activatable: bool,
    pub details: DetailsAffordance,
}

/// `{ icon, iconColor, iconTooltip }` as used by the custom entity icon and status badges.
#[derive(Debug, Clone, Default)]
struct CustomIconSpec {
    icon: Option<String>,
    icon_color: Option<String>,
    icon_tooltip: Option<String>,
}

impl CustomIconSpec {
    /// Non-string or empty fields read as absent without affecting their siblings.
    fn from_value(value: &Value) -> Option<Self> {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        value.is_object().then(|| Self {
            icon: field("icon"),
            icon_color: field("iconColor"),
            icon_tooltip: field("iconTooltip"),
        })
    }
}

/// The parts of an entity the adapter reads.
#[derive(Debug, Clone)]
pub struct EntityView<'a> {
    pub kind: &'a str,
    pub namespace: &'a str,
    pub name: &'a str,
    metadata: &'a Map<String, Value>,
}

impl<'a> EntityView<'a> {
    pub fn new(entity: &'a Value) -> Result<Self> {
        let Some(root) = entity.as_object() else {
            return Err(Error::InvalidEntity {
                message: "entity must be a JSON object".to_string(),
            });
        };
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        let metadata = match root.get("metadata") {
            Some(Value::Object(m)) => m,
            None | Some(Value::Null) => EMPTY.get_or_init(Map::new),
            Some(_) => {
                return Err(Error::InvalidEntity {
                    message: "entity metadata must be a JSON object".to_string(),
                });
            }
        };
        let str_field = |map: &'a Map<String, Value>, key: &str| {
            map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
        };
        Ok(Self {
            kind: str_field(root, "kind").unwrap_or("Unknown"),
            namespace: str_field(metadata, "namespace").unwrap_or(DEFAULT_NAMESPACE),
            name: str_field(metadata, "name").unwrap_or("unknown"),
            metadata,
        })
    }

    /// `kind:namespace/name`, with the kind lowercased.
    pub fn entity_ref(&self) -> String {
        format!(
            "{}:{}/{}",
            self.kind.to_ascii_lowercase(),
            self.namespace,
            self.name
        )
    }

    pub fn primary_title(&self) -> String {
        if let Some(title) = self.metadata_str("title") {
            return title.to_string();
        }
        if self.namespace == DEFAULT_NAMESPACE {
            self.name.to_string()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }

    fn metadata_str(&self, key: &str) -> Option<&'a str> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn details_url(&self) -> String {
        format!("/catalog/{}/{}/{}", self.namespace, self.kind, self.name)
    }

    /// One field of the topology customization block. Each field degrades on its own.
    fn topology_field(&self, key: &str) -> Option<&'a Value> {
        self.metadata
            .get(TOPOLOGY_METADATA_KEY)
            .and_then(|t| t.get(key))
            .filter(|v| !v.is_null())
    }

    fn theme(&self) -> Option<ThemeCustomization> {
        let raw = self.topology_field("theme")?;
        let theme = ThemeCustomization::from_value(raw);
        if theme.is_none() {
            tracing::debug!(entity = %self.entity_ref(), "ignoring malformed topology theme");
        }
        theme
    }

    fn custom_icon(&self) -> Option<CustomIconSpec> {
        let raw = self.topology_field("entityIcon")?;
        let spec = CustomIconSpec::from_value(raw);
        if spec.is_none() {
            tracing::debug!(entity = %self.entity_ref(), "ignoring malformed entity icon");
        }
        spec
    }

    fn status_icons(&self) -> &'a [Value] {
        match self.topology_field("statusIcons") {
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                tracing::debug!(entity = %self.entity_ref(), "ignoring malformed status icons");
                &[]
            }
            None => &[],
        }
    }
}

/// Internal links in display order: docs, apis, cicd, source.
pub fn info_links(view: &EntityView<'_>, config: &CardConfig) -> Vec<LinkItem> {
    let new_context: FxHashSet<&str> = config
        .catalog
        .new_context_link_keys
        .iter()
        .map(String::as_str)
        .collect();
    let details = view.details_url();
    let kind = view.kind.to_ascii_lowercase();

    let mut links: Vec<(&str, String)> = Vec::new();
    if matches!(kind.as_str(), "component" | "api" | "resource") {
        links.push(("docs", format!("{details}/docs")));
    }
    match kind.as_str() {
        "component" => {
            links.push(("apis", format!("{details}/api")));
            links.push(("cicd", format!("{details}/ci-cd")));
        }
        "api" => links.push(("apis", format!("{details}/definition"))),
        _ => {}
    }
    let view_url = view
        .metadata
        .get("annotations")
        .and_then(|a| a.get(VIEW_URL_ANNOTATION))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    if let Some(url) = view_url {
        links.push(("source", url.to_string()));
    }

    links
        .into_iter()
        .map(|(key, target)| LinkItem::new(key, target).in_new_context(new_context.contains(key)))
        .collect()
}

pub fn external_links(view: &EntityView<'_>) -> Vec<ExternalLinkItem> {
    let Some(Value::Array(raw)) = view.metadata.get("links") else {
        return Vec::new();
    };
    capped(raw.as_slice(), MAX_EXTERNAL_LINKS, "external links")
        .iter()
        .filter_map(|link| {
            let url = link.get("url").and_then(Value::as_str)?;
            let title = link
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Some(ExternalLinkItem {
                title: title.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

fn scalar_string(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

fn platform_app_link(base: &url::Url, app: &Value) -> Option<DeploymentLink> {
    let app_type = scalar_string(app.get("appType"))?;
    let dp_id = scalar_string(app.get("dpId"))?;
    let capability_instance_id = scalar_string(app.get("capabilityInstanceId"))?;
    let app_id = scalar_string(app.get("appId"))?;
    let data_plane_name = scalar_string(app.get("dataPlaneName"))?;

    let app_segment = app_type.to_lowercase();
    let mut link = base.clone();
    link.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["cp", app_segment.as_str(), "appdetails", "processes"]);
    link.query_pairs_mut()
        .append_pair("dp_id", &dp_id)
        .append_pair("capability_instance_id", &capability_instance_id)
        .append_pair("app_id", &app_id);

    Some(DeploymentLink {
        link: link.to_string(),
        label: data_plane_name,
        app_type,
    })
}

/// Deployment links require a control-plane base URL; without one the section stays empty.
pub fn deployment_links(view: &EntityView<'_>, config: &CardConfig) -> Vec<DeploymentLink> {
    let Some(cp) = config
        .catalog
        .control_plane_url
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        return Vec::new();
    };
    let Some(Value::Array(apps)) = view.metadata.get("tibcoPlatformApps") else {
        return Vec::new();
    };
    let base = match url::Url::parse(cp) {
        Ok(base) => base,
        Err(err) => {
            tracing::debug!(cp, %err, "control plane URL is not absolute; skipping deployments");
            return Vec::new();
        }
    };
    apps.iter()
        .filter(|app| app.is_object())
        .filter_map(|app| platform_app_link(&base, app))
        .collect()
}

fn status_badges(raw: &[Value]) -> Vec<BadgeIcon> {
    raw.iter()
        .filter_map(CustomIconSpec::from_value)
        .map(|spec| BadgeIcon {
            icon: spec.icon,
            color: Some(spec.icon_color.unwrap_or_else(|| "inherit".to_string())),
            tooltip: spec.icon_tooltip,
        })
        .collect()
}

/// Builds the card input for one catalog entity.
pub fn card_input_from_entity(
    entity: &Value,
    ctx: &EntityContext,
    config: &CardConfig,
) -> Result<CardInput> {
    let view = EntityView::new(entity)?;
    let mut colors = resolve_theme(view.theme().as_ref());
    let custom_icon = view.custom_icon().and_then(|spec| {
        Some(PrimaryIcon {
            icon: spec.icon?,
            color: spec.icon_color,
            tooltip: spec.icon_tooltip,
        })
    });
    if let Some(color) = custom_icon.as_ref().and_then(|i| i.color.clone()) {
        colors.icon_color = Some(color);
    }
    let primary_icon = custom_icon.or_else(|| {
        Some(PrimaryIcon {
            icon: format!("kind:{}", view.kind.to_ascii_lowercase()),
            color: None,
            tooltip: None,
        })
    });

    Ok(CardInput {
        id: view.entity_ref(),
        title: Some(view.primary_title()),
        subtitle: view.metadata_str("description").map(str::to_string),
        primary_icon,
        badges: status_badges(view.status_icons()),
        internal_links: info_links(&view, config),
        external_links: external_links(&view),
        deployment_links: deployment_links(&view, config),
        category: view.kind.to_string(),
        focused: ctx.focused,
        accent: ctx.accent,
        activatable: ctx.activatable,
        details: ctx.details,
        colors,
    })
}

impl CardInput {
    /// See [`card_input_from_entity`].
    pub fn from_entity(entity: &Value, ctx: &EntityContext, config: &CardConfig) -> Result<Self> {
        card_input_from_entity(entity, ctx, config)
    }
}
