//! Deployment cluster: up to three runtime-instance icons under a "Deployments" label.

use crate::model::{IconShape, Interaction, Primitive, Role, Shape, TextShape};
use crate::text::LINK_LABEL_FONT_SIZE;
use crate::tooltip::{TooltipAnchor, tooltip_primitive};
use nodecard_core::{CardConfig, DeploymentLink, MAX_DEPLOYMENTS, capped};

pub const FALLBACK_APP_GLYPH: &str = "image";

/// Drops the first `prefix_len` characters (the data plane prefix, e.g. `dp-`).
pub fn deployment_display_label(label: &str, prefix_len: usize) -> &str {
    match label.char_indices().nth(prefix_len) {
        Some((at, _)) => &label[at..],
        None => "",
    }
}

pub fn deployment_icon_name(link: &DeploymentLink, prefix_len: usize) -> String {
    format!(
        "{}-{}",
        link.app_type.to_lowercase(),
        deployment_display_label(&link.label, prefix_len)
    )
}

pub fn app_glyph(icon_name: &str) -> &'static str {
    let app = icon_name.split('-').next().unwrap_or("").to_lowercase();
    match app.as_str() {
        "bwce" => "bwce",
        "flogo" => "flogo",
        _ => FALLBACK_APP_GLYPH,
    }
}

pub fn env_glyph(icon_name: &str) -> Option<&'static str> {
    let env = icon_name.split('-').nth(1).unwrap_or("").to_lowercase();
    match env.as_str() {
        "dev" => Some("dev"),
        "testing" => Some("testing"),
        "qa" => Some("qa"),
        "prod" => Some("prod"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentSlot {
    pub icon_x: f64,
    pub icon_y: f64,
    pub tooltip_x: f64,
    pub tooltip_y: f64,
    pub icon_name: String,
    pub tooltip: String,
}

/// Whether the card shows a deployment cluster at all.
pub fn shows_deployments(category: &str, links: &[DeploymentLink], config: &CardConfig) -> bool {
    category == config.deployments.category && !links.is_empty()
}

pub fn layout_deployments(links: &[DeploymentLink], config: &CardConfig) -> Vec<DeploymentSlot> {
    let geometry = &config.geometry;
    let metrics = &config.deployments;
    let size = geometry.icon_size;
    let step = size + metrics.gap;
    let x = geometry.text_x();
    let y = geometry.links_y();
    capped(links, MAX_DEPLOYMENTS, "deployments")
        .iter()
        .enumerate()
        .map(|(index, link)| DeploymentSlot {
            icon_x: x + step * index as f64,
            icon_y: y,
            // Tooltip x ignores the cluster's own x offset.
            tooltip_x: 3.0 * size + step * index as f64,
            tooltip_y: y + metrics.tooltip_offset_y,
            icon_name: deployment_icon_name(link, metrics.label_prefix_len),
            tooltip: deployment_display_label(&link.label, metrics.label_prefix_len).to_string(),
        })
        .collect()
}

pub fn deployment_primitives(
    category: &str,
    links: &[DeploymentLink],
    config: &CardConfig,
) -> Vec<Primitive> {
    if !shows_deployments(category, links, config) {
        return Vec::new();
    }
    let geometry = &config.geometry;
    let size = geometry.icon_size;
    let mut out = vec![
        Primitive::new(
            Role::DeploymentLabel,
            geometry.text_x(),
            geometry.links_y() - config.deployments.label_offset_y,
            0.0,
            0.0,
            Shape::Text(TextShape {
                font_weight: Some("600".to_string()),
                ..TextShape::single(config.labels.deployments.clone(), LINK_LABEL_FONT_SIZE)
            }),
        )
        .with_class("link-text"),
    ];

    for (link, slot) in links.iter().zip(layout_deployments(links, config)) {
        out.push(
            Primitive::new(
                Role::Deployment,
                slot.icon_x,
                slot.icon_y,
                size,
                size,
                Shape::Icon(IconShape {
                    app_glyph: Some(app_glyph(&slot.icon_name).to_string()),
                    env_glyph: env_glyph(&slot.icon_name).map(str::to_string),
                    ..IconShape::named(slot.icon_name.clone())
                }),
            )
            .with_id(format!("node-deployment-icon-{}", link.label))
            .with_class("link-icon")
            .with_interaction(Interaction::Navigate {
                target: link.link.clone(),
                new_context: true,
            }),
        );
        out.push(tooltip_primitive(
            Role::Deployment,
            &slot.tooltip,
            slot.tooltip_x,
            slot.tooltip_y,
            TooltipAnchor::Standard,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(label: &str, app_type: &str) -> DeploymentLink {
        DeploymentLink {
            link: format!("https://cp.example.com/{label}"),
            label: label.to_string(),
            app_type: app_type.to_string(),
        }
    }

    #[test]
    fn icon_name_joins_app_type_and_trimmed_label() {
        assert_eq!(deployment_icon_name(&link("dp-prod", "BWCE"), 3), "bwce-prod");
        assert_eq!(deployment_icon_name(&link("dp", "Flogo"), 3), "flogo-");
    }

    #[test]
    fn glyphs_resolve_from_icon_name() {
        assert_eq!(app_glyph("bwce-dev"), "bwce");
        assert_eq!(app_glyph("flogo-qa"), "flogo");
        assert_eq!(app_glyph("tibco-qa"), "image");
        assert_eq!(env_glyph("bwce-testing"), Some("testing"));
        assert_eq!(env_glyph("bwce-staging"), None);
        assert_eq!(env_glyph("bwce"), None);
    }

    #[test]
    fn slots_step_by_icon_size_plus_gap() {
        let links = vec![
            link("dp-dev", "bwce"),
            link("dp-qa", "flogo"),
            link("dp-prod", "bwce"),
            link("dp-extra", "bwce"),
        ];
        let slots = layout_deployments(&links, &CardConfig::default());
        assert_eq!(slots.len(), 3);
        let xs: Vec<f64> = slots.iter().map(|s| s.icon_x).collect();
        assert_eq!(xs, vec![78.0, 98.0, 118.0]);
        let tips: Vec<f64> = slots.iter().map(|s| s.tooltip_x).collect();
        assert_eq!(tips, vec![48.0, 68.0, 88.0]);
        assert_eq!(slots[0].tooltip_y, 92.0);
        assert_eq!(slots[1].tooltip, "qa");
    }

    #[test]
    fn other_categories_get_no_cluster() {
        let links = vec![link("dp-dev", "bwce")];
        let config = CardConfig::default();
        assert!(deployment_primitives("API", &links, &config).is_empty());
        assert!(deployment_primitives("Component", &[], &config).is_empty());
    }

    #[test]
    fn component_cluster_has_label_then_icon_and_tooltip_pairs() {
        let links = vec![link("dp-dev", "bwce"), link("dp-prod", "flogo")];
        let prims = deployment_primitives("Component", &links, &CardConfig::default());
        assert_eq!(prims.len(), 5);
        assert_eq!(prims[0].role, Role::DeploymentLabel);
        assert_eq!((prims[0].x, prims[0].y), (78.0, 63.0));
        assert_eq!(
            prims[0].as_text().map(|t| t.text()),
            Some("Deployments".to_string())
        );
        let icon = prims[3].as_icon().expect("icon");
        assert_eq!(icon.name, "flogo-prod");
        assert_eq!(icon.app_glyph.as_deref(), Some("flogo"));
        assert_eq!(icon.env_glyph.as_deref(), Some("prod"));
        assert_eq!(
            prims[1].interaction,
            Interaction::Navigate {
                target: "https://cp.example.com/dp-dev".to_string(),
                new_context: true,
            }
        );
    }
}
