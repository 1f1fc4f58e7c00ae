//! Card assembly and the self-measuring title loop.
//!
//! [`compose_card`] is a pure function of the input, the geometry config and the last title box
//! read back from the host. [`CardComposer`] owns that title box across renders and runs the
//! two-pass measurement protocol: render, measure the painted title once, re-render if the box
//! changed, then stop.

use crate::badges::badge_primitives;
use crate::deployments::deployment_primitives;
use crate::label::{SUBTITLE_LINE_DY, SubtitleLines, truncate_title, wrap_subtitle};
use crate::link_bar::link_bar_primitives;
use crate::model::{
    Baseline, CardLayout, IconShape, Interaction, Primitive, RectShape, Role, Shape, TextLine,
    TextShape, TitleBox,
};
use crate::text::{SUBTITLE_FONT_SIZE, TextMeasurer, TextMetrics, TextStyle};
use crate::tooltip::{TooltipAnchor, tooltip_primitive};
use nodecard_core::{Accent, CardConfig, CardInput, DetailsAffordance};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const CARD_RX: f64 = 4.0;
/// Icon-section panel overlap into the text section.
pub const TEXT_SECTION_OVERLAP: f64 = 6.0;
/// Offset of the spacer strip that hides the overlapping rounded corners.
pub const SPACER_OFFSET: f64 = 7.0;
pub const SPACER_WIDTH: f64 = 5.0;
/// Extra size of the primary icon over the base icon size.
pub const PRIMARY_ICON_GROWTH: f64 = 16.0;

const NEUTRAL_STROKE: &str = "hsla(0, 0%, 45%, 1.00)";
const OUTLINE_STROKE: &str = "hsla(213, 82%, 49%, 1.00)";
const PANEL_FILL: &str = "hsla(0, 0%, 88%, 1.00)";
const ACCENT_FILL: &str = "hsla(213, 80%, 59%, 1)";
const TEXT_PANEL_FILL: &str = "hsla(260, 10%, 94%, 1.00)";
const TEXT_PANEL_THEMED_FILL: &str = "hsla(0, 0%, 98%, 1.00)";
const FOCUSED_ICON_COLOR: &str = "hsla(0, 0%, 100%, 1.00)";

fn classes(parts: &[(&str, bool)]) -> String {
    parts
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(" ")
}

fn rect(role: Role, x: f64, y: f64, width: f64, height: f64, shape: RectShape) -> Primitive {
    Primitive::new(role, x, y, width, height, Shape::Rect(shape))
}

fn panel_primitives(input: &CardInput, config: &CardConfig) -> Vec<Primitive> {
    let g = &config.geometry;
    let colors = &input.colors;
    let primary = input.accent == Accent::Primary;
    let secondary = input.accent == Accent::Secondary;
    let icon_color = colors.icon_color.clone();
    let background = colors.background.clone();

    let container_stroke = if secondary {
        icon_color.clone().unwrap_or_else(|| OUTLINE_STROKE.to_string())
    } else {
        icon_color.clone().unwrap_or_else(|| NEUTRAL_STROKE.to_string())
    };
    let accent_or_panel = if secondary {
        icon_color.clone().unwrap_or_else(|| ACCENT_FILL.to_string())
    } else {
        background.clone().unwrap_or_else(|| PANEL_FILL.to_string())
    };
    let text_fill = if background.is_some() {
        TEXT_PANEL_THEMED_FILL
    } else {
        TEXT_PANEL_FILL
    };

    vec![
        rect(
            Role::CardContainer,
            0.0,
            0.0,
            g.card_width,
            g.card_height,
            RectShape {
                rx: CARD_RX,
                fill: Some("none".to_string()),
                stroke: Some(container_stroke),
            },
        )
        .with_id(format!("{}-cardContainer", input.id))
        .with_class(classes(&[("card-container", true), ("outlined", secondary)]))
        .with_interaction(if input.activatable {
            Interaction::Activate
        } else {
            Interaction::None
        }),
        rect(
            Role::IconSection,
            0.0,
            0.0,
            g.icon_section_width,
            g.card_height,
            RectShape {
                rx: CARD_RX,
                fill: Some(accent_or_panel.clone()),
                stroke: None,
            },
        )
        .with_class(classes(&[
            ("icon-section", true),
            ("primary", primary),
            ("secondary accent", secondary),
        ])),
        rect(
            Role::TextSection,
            g.icon_section_width - TEXT_SECTION_OVERLAP,
            0.0,
            g.text_section_width,
            g.card_height,
            RectShape {
                rx: CARD_RX,
                fill: Some(text_fill.to_string()),
                stroke: None,
            },
        )
        .with_class(classes(&[
            ("text-section", true),
            ("secondary", primary),
            ("primary", secondary),
        ])),
        rect(
            Role::Spacer,
            g.icon_section_width - SPACER_OFFSET,
            0.0,
            SPACER_WIDTH,
            g.card_height,
            RectShape {
                rx: 0.0,
                fill: Some(accent_or_panel),
                stroke: None,
            },
        )
        .with_class("spacer"),
    ]
}

fn title_primitive(input: &CardInput, config: &CardConfig, title_box: TitleBox) -> Primitive {
    let g = &config.geometry;
    let style = TextStyle::title(input.focused);
    Primitive::new(
        Role::Title,
        g.text_x(),
        2.0 * g.padding,
        title_box.width as f64,
        title_box.height as f64,
        Shape::Text(TextShape {
            font_weight: style.font_weight,
            baseline: Baseline::Middle,
            ..TextShape::single(truncate_title(input.display_title()), style.font_size)
        }),
    )
    .with_id(format!("{}-title", input.id))
    .with_class(classes(&[
        ("title", true),
        ("focused", input.focused),
        ("primary", input.accent == Accent::Primary),
    ]))
}

fn subtitle_primitive(
    input: &CardInput,
    config: &CardConfig,
    title_box: TitleBox,
) -> Option<Primitive> {
    let subtitle = input.subtitle_text();
    if subtitle.is_empty() {
        return None;
    }
    let g = &config.geometry;
    let lines = match wrap_subtitle(subtitle) {
        SubtitleLines::Single(line) => vec![TextLine { text: line, dy: 0.0 }],
        SubtitleLines::Wrapped(first, second) => vec![
            TextLine {
                text: first,
                dy: 0.0,
            },
            TextLine {
                text: second,
                dy: SUBTITLE_LINE_DY,
            },
        ],
    };
    let padded_height = title_box.height as f64 + 2.0 * g.padding;
    Some(
        Primitive::new(
            Role::Subtitle,
            g.text_x(),
            padded_height / 2.0 + 2.0 * g.padding,
            0.0,
            0.0,
            Shape::Text(TextShape {
                lines,
                font_size: SUBTITLE_FONT_SIZE,
                font_weight: None,
                baseline: Baseline::Alphabetic,
            }),
        )
        .with_class(classes(&[
            ("subtitle", true),
            ("focused", input.focused),
            ("primary", input.accent == Accent::Primary),
            ("secondary", input.accent == Accent::Secondary),
        ])),
    )
}

fn details_primitives(input: &CardInput, config: &CardConfig) -> Vec<Primitive> {
    let (icon, id, interaction, label) = match input.details {
        DetailsAffordance::Hidden => return Vec::new(),
        DetailsAffordance::Closed => (
            "details",
            "pl-icon-details",
            Interaction::OpenDetails,
            &config.labels.open_details,
        ),
        DetailsAffordance::Open { locked: true } => (
            "lock",
            "details-view-icon-collapse",
            Interaction::ToggleDetailsLock,
            &config.labels.unlock_details,
        ),
        DetailsAffordance::Open { locked: false } => (
            "unlock",
            "details-view-icon-expand",
            Interaction::ToggleDetailsLock,
            &config.labels.lock_details,
        ),
    };
    let g = &config.geometry;
    let x = g.card_width - g.padding - g.icon_size;
    vec![
        Primitive::new(
            Role::DetailsAffordance,
            x,
            g.padding,
            g.icon_size,
            g.icon_size,
            Shape::Icon(IconShape::named(icon)),
        )
        .with_id(id)
        .with_class("link-icon")
        .with_interaction(interaction),
        tooltip_primitive(
            Role::DetailsAffordance,
            label,
            x,
            3.0 * g.padding,
            TooltipAnchor::Affordance,
        ),
    ]
}

fn primary_icon_primitives(input: &CardInput, config: &CardConfig) -> Vec<Primitive> {
    let Some(icon) = input.primary_icon.as_ref() else {
        return Vec::new();
    };
    let g = &config.geometry;
    let size = g.icon_size + PRIMARY_ICON_GROWTH;
    let y = if input.badges.is_empty() {
        g.card_height / 2.0 - size / 2.0
    } else {
        g.padding
    };
    let secondary = input.accent == Accent::Secondary;
    let color = if secondary {
        Some(FOCUSED_ICON_COLOR.to_string())
    } else {
        input.colors.icon_color.clone().or_else(|| icon.color.clone())
    };
    let mut out = vec![
        Primitive::new(
            Role::PrimaryIcon,
            2.0 * g.padding,
            y,
            size,
            size,
            Shape::Icon(IconShape {
                color,
                ..IconShape::named(icon.icon.clone())
            }),
        )
        .with_class(classes(&[
            ("entity-icon", true),
            ("focused", input.focused),
            ("icon-focus", secondary),
        ])),
    ];
    if let Some(tooltip) = icon.tooltip.as_deref().filter(|t| !t.is_empty()) {
        out.push(tooltip_primitive(
            Role::PrimaryIcon,
            tooltip,
            0.0,
            2.0 * g.icon_size + g.padding,
            TooltipAnchor::Standard,
        ));
    }
    out
}

/// Lays out one card in paint order (back-to-front).
pub fn compose_card(input: &CardInput, config: &CardConfig, title_box: TitleBox) -> CardLayout {
    let g = &config.geometry;
    let mut primitives = panel_primitives(input, config);

    let badges = input.capped_badges();
    if !badges.is_empty() {
        primitives.extend(badge_primitives(
            badges,
            config.badges,
            g.padding,
            g.card_height - g.padding - config.badges.icon_size,
        ));
    }

    primitives.push(title_primitive(input, config, title_box));
    primitives.extend(subtitle_primitive(input, config, title_box));
    primitives.extend(details_primitives(input, config));
    primitives.extend(deployment_primitives(
        &input.category,
        input.capped_deployments(),
        config,
    ));
    primitives.extend(primary_icon_primitives(input, config));
    primitives.extend(link_bar_primitives(
        &input.id,
        &input.internal_links,
        &input.external_links,
        config,
    ));

    CardLayout {
        card_id: input.id.clone(),
        width: g.card_width,
        height: g.card_height,
        title_box,
        primitives,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureState {
    /// No readback for the current title yet.
    Unmeasured,
    /// One readback applied; a confirming readback is expected.
    Measured,
    /// Settled; further readbacks are no-ops.
    Stable,
}

/// Identifies the render a measurement request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRequest {
    pub ticket: MeasureTicket,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub layout: CardLayout,
    /// Present until the title box has settled.
    pub measure: Option<MeasureRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureOutcome {
    /// The stored box changed; render again.
    Relayout,
    Unchanged,
    /// A second readback disagreed with the first; the first is kept.
    Diverged,
    /// The ticket belongs to an unmounted card or an older title.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
struct TitleRun {
    text: String,
    style: TextStyle,
}

/// Host readbacks use half-up rounding.
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Per-card owner of the measured title box.
#[derive(Debug, Clone)]
pub struct CardComposer {
    config: CardConfig,
    title_box: TitleBox,
    state: MeasureState,
    generation: u64,
    title_run: Option<TitleRun>,
    mounted: bool,
    card_id: String,
}

impl CardComposer {
    pub fn new(config: CardConfig) -> Self {
        Self {
            config,
            title_box: TitleBox::default(),
            state: MeasureState::Unmeasured,
            generation: 0,
            title_run: None,
            mounted: true,
            card_id: String::new(),
        }
    }

    pub fn state(&self) -> MeasureState {
        self.state
    }

    pub fn title_box(&self) -> TitleBox {
        self.title_box
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn render(&mut self, input: &CardInput) -> RenderPass {
        let run = TitleRun {
            text: truncate_title(input.display_title()),
            style: TextStyle::title(input.focused),
        };
        if self.title_run.as_ref() != Some(&run) {
            if self.title_run.is_some() {
                self.generation += 1;
                self.state = MeasureState::Unmeasured;
                debug!(
                    card = %input.id,
                    generation = self.generation,
                    "title changed; remeasuring"
                );
            }
            self.title_run = Some(run.clone());
        }
        self.card_id.clone_from(&input.id);

        let layout = compose_card(input, &self.config, self.title_box);
        let measure = (self.state != MeasureState::Stable).then(|| MeasureRequest {
            ticket: MeasureTicket {
                generation: self.generation,
            },
            text: run.text,
            style: run.style,
        });
        RenderPass { layout, measure }
    }

    pub fn apply_measurement(&mut self, ticket: MeasureTicket, metrics: TextMetrics) -> MeasureOutcome {
        if !self.mounted || ticket.generation != self.generation {
            debug!(
                card = %self.card_id,
                ticket = ticket.generation,
                generation = self.generation,
                mounted = self.mounted,
                "ignoring stale title measurement"
            );
            return MeasureOutcome::Stale;
        }
        let measured = TitleBox {
            width: round_half_up(metrics.width),
            height: round_half_up(metrics.height),
        };
        let (next, outcome) = match self.state {
            MeasureState::Unmeasured if measured != self.title_box => {
                self.title_box = measured;
                (MeasureState::Measured, MeasureOutcome::Relayout)
            }
            MeasureState::Unmeasured | MeasureState::Measured if measured == self.title_box => {
                (MeasureState::Stable, MeasureOutcome::Unchanged)
            }
            MeasureState::Measured => {
                warn!(
                    card = %self.card_id,
                    kept_width = self.title_box.width,
                    kept_height = self.title_box.height,
                    width = measured.width,
                    height = measured.height,
                    "title measurement diverged; keeping the first readback"
                );
                (MeasureState::Stable, MeasureOutcome::Diverged)
            }
            _ => (MeasureState::Stable, MeasureOutcome::Unchanged),
        };
        if next != self.state {
            debug!(card = %self.card_id, from = ?self.state, to = ?next, "title measure state");
        }
        self.state = next;
        outcome
    }

    /// Marks the card gone; outstanding and future readbacks are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

/// Runs the render/measure loop to completion against a synchronous measurer.
pub fn layout_card_sync(
    input: &CardInput,
    config: &CardConfig,
    measurer: &dyn TextMeasurer,
) -> CardLayout {
    let mut composer = CardComposer::new(config.clone());
    let mut pass = composer.render(input);
    while let Some(request) = pass.measure.take() {
        let metrics = measurer.measure(&request.text, &request.style);
        match composer.apply_measurement(request.ticket, metrics) {
            MeasureOutcome::Relayout => pass = composer.render(input),
            MeasureOutcome::Unchanged | MeasureOutcome::Diverged | MeasureOutcome::Stale => break,
        }
    }
    pass.layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use nodecard_core::{BadgeIcon, PrimaryIcon};

    fn metrics(width: f64, height: f64) -> TextMetrics {
        TextMetrics {
            width,
            height,
            line_count: 1,
        }
    }

    fn titled(title: &str) -> CardInput {
        CardInput {
            title: Some(title.to_string()),
            ..CardInput::new("svc")
        }
    }

    #[test]
    fn bare_card_has_panels_and_title_only() {
        let layout = compose_card(&titled("Test Service"), &CardConfig::default(), TitleBox::default());
        let roles: Vec<Role> = layout.primitives.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::CardContainer,
                Role::IconSection,
                Role::TextSection,
                Role::Spacer,
                Role::Title,
            ]
        );
        let text = &layout.primitives[2];
        assert_eq!((text.x, text.width), (64.0, 286.0));
        let spacer = &layout.primitives[3];
        assert_eq!((spacer.x, spacer.width), (63.0, 5.0));
    }

    #[test]
    fn subtitle_sits_below_the_measured_title() {
        let input = CardInput {
            subtitle: Some("Handles orders".to_string()),
            ..titled("Orders")
        };
        let layout = compose_card(
            &input,
            &CardConfig::default(),
            TitleBox {
                width: 50,
                height: 20,
            },
        );
        let subtitle = layout.by_role(Role::Subtitle).next().expect("subtitle");
        assert_eq!((subtitle.x, subtitle.y), (78.0, 34.0));
    }

    #[test]
    fn primary_icon_moves_up_when_badges_exist() {
        let mut input = titled("Orders");
        input.primary_icon = Some(PrimaryIcon {
            icon: "kind:component".to_string(),
            color: None,
            tooltip: Some("Component".to_string()),
        });
        let config = CardConfig::default();
        let layout = compose_card(&input, &config, TitleBox::default());
        let icon = layout.by_role(Role::PrimaryIcon).next().expect("icon");
        assert_eq!((icon.x, icon.y, icon.width), (16.0, 30.0, 32.0));

        input.badges = vec![BadgeIcon::default()];
        let layout = compose_card(&input, &config, TitleBox::default());
        let icon = layout.by_role(Role::PrimaryIcon).next().expect("icon");
        assert_eq!(icon.y, 8.0);
        let tooltip = layout
            .by_role(Role::PrimaryIcon)
            .find(|p| p.is_tooltip())
            .expect("tooltip");
        assert_eq!((tooltip.x, tooltip.y), (0.0, 40.0));
    }

    #[test]
    fn details_affordance_labels_follow_state() {
        let config = CardConfig::default();
        let label = |details| {
            let input = CardInput {
                details,
                ..titled("Orders")
            };
            let layout = compose_card(&input, &config, TitleBox::default());
            layout
                .by_role(Role::DetailsAffordance)
                .find_map(|p| p.as_tooltip().map(|t| (t.label.clone(), t.pointer_dx)))
        };
        assert_eq!(label(DetailsAffordance::Hidden), None);
        assert_eq!(
            label(DetailsAffordance::Closed),
            Some(("Open Details".to_string(), -24.0))
        );
        assert_eq!(
            label(DetailsAffordance::Open { locked: true }),
            Some(("Unlock Details".to_string(), -24.0))
        );
        assert_eq!(
            label(DetailsAffordance::Open { locked: false }),
            Some(("Lock Details".to_string(), -24.0))
        );
    }

    #[test]
    fn measurement_settles_in_two_passes() {
        let input = titled("Test Service");
        let mut composer = CardComposer::new(CardConfig::default());
        let first = composer.render(&input);
        assert_eq!(first.layout.title_box, TitleBox::default());
        let request = first.measure.expect("first pass asks for a measurement");
        assert_eq!(
            composer.apply_measurement(request.ticket, metrics(95.6, 19.5)),
            MeasureOutcome::Relayout
        );
        assert_eq!(composer.state(), MeasureState::Measured);

        let second = composer.render(&input);
        assert_eq!(
            second.layout.title_box,
            TitleBox {
                width: 96,
                height: 20
            }
        );
        let request = second.measure.expect("second pass confirms");
        assert_eq!(
            composer.apply_measurement(request.ticket, metrics(96.0, 20.0)),
            MeasureOutcome::Unchanged
        );
        assert_eq!(composer.state(), MeasureState::Stable);
        assert!(composer.render(&input).measure.is_none());
    }

    #[test]
    fn divergent_second_readback_keeps_the_first() {
        let input = titled("Test Service");
        let mut composer = CardComposer::new(CardConfig::default());
        let ticket = composer.render(&input).measure.expect("request").ticket;
        composer.apply_measurement(ticket, metrics(96.0, 20.0));
        let ticket = composer.render(&input).measure.expect("request").ticket;
        assert_eq!(
            composer.apply_measurement(ticket, metrics(101.0, 20.0)),
            MeasureOutcome::Diverged
        );
        assert_eq!(composer.state(), MeasureState::Stable);
        assert_eq!(composer.title_box().width, 96);
        assert_eq!(
            composer.apply_measurement(ticket, metrics(120.0, 20.0)),
            MeasureOutcome::Unchanged
        );
        assert_eq!(composer.title_box().width, 96);
    }

    #[test]
    fn readbacks_after_unmount_are_stale() {
        let input = titled("Test Service");
        let mut composer = CardComposer::new(CardConfig::default());
        let ticket = composer.render(&input).measure.expect("request").ticket;
        composer.unmount();
        assert_eq!(
            composer.apply_measurement(ticket, metrics(96.0, 20.0)),
            MeasureOutcome::Stale
        );
        assert_eq!(composer.title_box(), TitleBox::default());
        assert_eq!(composer.state(), MeasureState::Unmeasured);
    }

    #[test]
    fn title_change_invalidates_older_tickets() {
        let mut composer = CardComposer::new(CardConfig::default());
        let old = composer.render(&titled("Orders")).measure.expect("request").ticket;
        let new = composer
            .render(&titled("Payments"))
            .measure
            .expect("request")
            .ticket;
        assert_eq!(
            composer.apply_measurement(old, metrics(48.0, 20.0)),
            MeasureOutcome::Stale
        );
        assert_eq!(
            composer.apply_measurement(new, metrics(64.0, 20.0)),
            MeasureOutcome::Relayout
        );
    }

    #[test]
    fn sync_loop_uses_the_measurer() {
        let layout = layout_card_sync(
            &titled("Test Service"),
            &CardConfig::default(),
            &DeterministicTextMeasurer::default(),
        );
        assert_eq!(
            layout.title_box,
            TitleBox {
                width: 96,
                height: 20
            }
        );
        let title = layout.by_role(Role::Title).next().expect("title");
        assert_eq!((title.x, title.y, title.width), (78.0, 16.0, 96.0));
    }
}
