//! The bottom-right link bar: internal links packed right-to-left from the card edge, external
//! links packed further left, then the "External Links" label.

use crate::model::{IconShape, Interaction, Primitive, RectShape, Role, Shape, TextShape};
use crate::text::LINK_LABEL_FONT_SIZE;
use crate::tooltip::{TooltipAnchor, tooltip_primitive};
use nodecard_core::{CardConfig, CardGeometry, ExternalLinkItem, LinkBarMetrics, LinkItem};

pub const EXTERNAL_LINK_ICON: &str = "externalLink";
/// Gap between the external label baseline and the icon row.
pub const EXTERNAL_LABEL_RISE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalSlot {
    pub icon_x: f64,
    /// Divider to the left of this icon; absent for the last item.
    pub divider_x: Option<f64>,
    pub tooltip_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalSlot {
    pub icon_x: f64,
    pub tooltip_x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkBarLayout {
    pub y: f64,
    pub tooltip_y: f64,
    pub internal: Vec<InternalSlot>,
    pub external: Vec<ExternalSlot>,
    /// Present only when there are external links.
    pub external_label: Option<(f64, f64)>,
    /// Single divider left of the whole external cluster.
    pub external_divider_x: Option<f64>,
}

/// Pure geometry for `internal` internal links and `external` external links.
pub fn compute_link_bar(
    internal: usize,
    external: usize,
    geometry: &CardGeometry,
    metrics: &LinkBarMetrics,
) -> LinkBarLayout {
    let right = geometry.card_width - geometry.padding;
    let nudge = metrics.nudge;
    let tooltip_dx = 4.0 * geometry.padding;

    let internal_slots = (0..internal)
        .map(|index| {
            let base = right - (index + 1) as f64 * metrics.slot_width;
            let icon_x = if index == 0 {
                base + nudge
            } else if index == internal - 1 {
                base - nudge
            } else {
                base
            };
            InternalSlot {
                icon_x,
                divider_x: (internal > 1 && index < internal - 1).then_some(icon_x - nudge),
                tooltip_x: icon_x - tooltip_dx,
            }
        })
        .collect();

    // With no internal links the external cluster still reserves one internal slot.
    let internal_offset = internal.max(1) as f64 * (2.0 * geometry.icon_size);
    let external_slot = 2.0 * geometry.padding;
    let external_span = external as f64 * external_slot;

    let external_slots = (0..external)
        .map(|index| {
            let icon_x = right
                - internal_offset
                - (index + 1) as f64 * external_slot
                - index as f64 * nudge;
            ExternalSlot {
                icon_x,
                tooltip_x: icon_x - tooltip_dx,
            }
        })
        .collect();

    let has_external = external > 0;
    LinkBarLayout {
        y: geometry.links_y(),
        tooltip_y: geometry.card_height,
        internal: internal_slots,
        external: external_slots,
        external_label: has_external.then(|| {
            (
                right - internal_offset - external_span - 2.0 * nudge,
                geometry.links_y() - EXTERNAL_LABEL_RISE,
            )
        }),
        external_divider_x: has_external
            .then(|| right - internal_offset - external_span - 3.0 * nudge),
    }
}

fn divider(x: f64, y: f64, geometry: &CardGeometry, metrics: &LinkBarMetrics) -> Primitive {
    Primitive::new(
        Role::LinkDivider,
        x,
        y,
        metrics.divider_width,
        geometry.icon_size,
        Shape::Rect(RectShape {
            rx: 0.0,
            fill: None,
            stroke: None,
        }),
    )
    .with_class("divider")
    .with_interaction(Interaction::Capture)
}

/// Primitives for the whole link bar, in paint order.
pub fn link_bar_primitives(
    card_id: &str,
    internal: &[LinkItem],
    external: &[ExternalLinkItem],
    config: &CardConfig,
) -> Vec<Primitive> {
    let geometry = &config.geometry;
    let metrics = &config.link_bar;
    let labels = &config.labels;
    let bar = compute_link_bar(internal.len(), external.len(), geometry, metrics);
    let size = geometry.icon_size;
    let mut out = Vec::new();

    for (index, (link, slot)) in internal.iter().zip(&bar.internal).enumerate() {
        if let Some(dx) = slot.divider_x {
            out.push(divider(dx, bar.y, geometry, metrics));
        }
        out.push(
            Primitive::new(
                Role::InternalLink,
                slot.icon_x,
                bar.y,
                size,
                size,
                Shape::Icon(IconShape::named(link.key.clone())),
            )
            .with_id(format!("info-link-{index}-{card_id}"))
            .with_class("link-icon")
            .with_interaction(Interaction::Navigate {
                target: link.target.clone(),
                new_context: link.open_in_new_context,
            }),
        );
        out.push(tooltip_primitive(
            Role::InternalLink,
            &format!("{} {}", labels.open_prefix, link.key),
            slot.tooltip_x,
            bar.tooltip_y,
            TooltipAnchor::Standard,
        ));
    }

    if let Some((lx, ly)) = bar.external_label {
        out.push(
            Primitive::new(
                Role::ExternalLinksLabel,
                lx,
                ly,
                0.0,
                0.0,
                Shape::Text(TextShape {
                    font_weight: Some("600".to_string()),
                    ..TextShape::single(labels.external_links.clone(), LINK_LABEL_FONT_SIZE)
                }),
            )
            .with_class("link-text"),
        );
    }

    for (index, (link, slot)) in external.iter().zip(&bar.external).enumerate() {
        let title = if link.title.is_empty() {
            labels.open_link.as_str()
        } else {
            link.title.as_str()
        };
        out.push(
            Primitive::new(
                Role::ExternalLink,
                slot.icon_x,
                bar.y,
                size,
                size,
                Shape::Icon(IconShape::named(EXTERNAL_LINK_ICON)),
            )
            .with_id(format!("external-link-{index}-{card_id}"))
            .with_class("link-icon")
            .with_interaction(Interaction::Navigate {
                target: link.url.clone(),
                new_context: true,
            }),
        );
        out.push(tooltip_primitive(
            Role::ExternalLink,
            title,
            slot.tooltip_x,
            bar.tooltip_y,
            TooltipAnchor::Standard,
        ));
        if index == 0 {
            if let Some(dx) = bar.external_divider_x {
                out.push(divider(dx, bar.y, geometry, metrics));
            }
        }
    }

    out
}
