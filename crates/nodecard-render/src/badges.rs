//! Status badge cluster: up to three small icons in the icon section's bottom row.

use crate::model::{IconShape, Interaction, Primitive, RectShape, Role, Shape};
use crate::tooltip::{TooltipAnchor, tooltip_primitive};
use nodecard_core::{BadgeIcon, BadgeMetrics, MAX_BADGES, capped};

pub const FALLBACK_BADGE_ICON: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgePlacement {
    /// Count-specific slot position before the per-index spread.
    pub offset_x: f64,
    /// Drawn position of the icon and its hit rectangle.
    pub x: f64,
    pub y: f64,
    /// Tooltip anchor, when the badge has a tooltip.
    pub tooltip: Option<(f64, f64)>,
}

/// Slot position for badge `index` in a cluster of `count`.
///
/// Three badges pack contiguously; two and one sit inside the same three-slot footprint.
pub fn badge_offset_x(count: usize, index: usize, size: f64, padding: f64, x: f64) -> f64 {
    match count {
        3 => x + index as f64 * size,
        2 if index == 1 => x + 2.0 * size - padding,
        2 => x + index as f64 * size + padding,
        _ => x + size + padding,
    }
}

pub fn layout_badges(
    badges: &[BadgeIcon],
    metrics: BadgeMetrics,
    x: f64,
    y: f64,
) -> Vec<BadgePlacement> {
    let badges = capped(badges, MAX_BADGES, "badges");
    let size = metrics.icon_size;
    let padding = metrics.icon_padding;
    badges
        .iter()
        .enumerate()
        .map(|(index, badge)| {
            let offset_x = badge_offset_x(badges.len(), index, size, padding, x);
            // The spread compounds with the slot formula for every index past the first.
            let drawn_x = if index > 0 {
                offset_x + index as f64 * padding
            } else {
                offset_x
            };
            BadgePlacement {
                offset_x,
                x: drawn_x,
                y,
                tooltip: badge
                    .tooltip
                    .as_ref()
                    .filter(|t| !t.is_empty())
                    .map(|_| (offset_x - 2.0 * size, y + size + 2.0 * padding)),
            }
        })
        .collect()
}

/// Hit rectangle, icon and optional tooltip per badge.
pub fn badge_primitives(
    badges: &[BadgeIcon],
    metrics: BadgeMetrics,
    x: f64,
    y: f64,
) -> Vec<Primitive> {
    let size = metrics.icon_size;
    let mut out = Vec::new();
    for (badge, place) in badges.iter().zip(layout_badges(badges, metrics, x, y)) {
        out.push(
            Primitive::new(
                Role::StatusBadge,
                place.x,
                place.y,
                size,
                size,
                Shape::Rect(RectShape {
                    rx: 0.0,
                    fill: Some("transparent".to_string()),
                    stroke: None,
                }),
            )
            .with_class("badge-hit")
            .with_interaction(Interaction::Capture),
        );
        out.push(
            Primitive::new(
                Role::StatusBadge,
                place.x,
                place.y,
                size,
                size,
                Shape::Icon(IconShape {
                    color: badge.color.clone(),
                    ..IconShape::named(badge.icon.as_deref().unwrap_or(FALLBACK_BADGE_ICON))
                }),
            )
            .with_class("badge-icon"),
        );
        if let (Some((tx, ty)), Some(label)) = (place.tooltip, badge.tooltip.as_deref()) {
            out.push(tooltip_primitive(
                Role::StatusBadge,
                label,
                tx,
                ty,
                TooltipAnchor::Standard,
            ));
        }
    }
    out
}
