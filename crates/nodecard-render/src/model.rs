use serde::{Deserialize, Serialize};

/// Which part of the card a primitive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    CardContainer,
    IconSection,
    TextSection,
    Spacer,
    StatusBadge,
    Title,
    Subtitle,
    DetailsAffordance,
    DeploymentLabel,
    Deployment,
    PrimaryIcon,
    InternalLink,
    LinkDivider,
    ExternalLinksLabel,
    ExternalLink,
}

/// What a pointer press on a primitive does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Interaction {
    /// Transparent to the pointer; the press falls through to whatever is underneath.
    #[default]
    None,
    /// Card root: forwards to the host's activation handler.
    Activate,
    /// Absorbs the press without an action.
    Capture,
    Navigate { target: String, new_context: bool },
    OpenDetails,
    ToggleDetailsLock,
}

impl Interaction {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectShape {
    pub rx: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconShape {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Application glyph layered inside deployment icons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_glyph: Option<String>,
    /// Environment glyph layered inside deployment icons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_glyph: Option<String>,
}

impl IconShape {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            app_glyph: None,
            env_glyph: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Baseline {
    #[default]
    Alphabetic,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub lines: Vec<TextLine>,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub baseline: Baseline,
}

impl TextShape {
    pub fn single(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            lines: vec![TextLine {
                text: text.into(),
                dy: 0.0,
            }],
            font_size,
            font_weight: None,
            baseline: Baseline::Alphabetic,
        }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A hover tooltip: rounded background pill, pointer triangle and label, in tooltip-local
/// coordinates relative to the primitive's `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipShape {
    pub label: String,
    /// Width from the length tier (the background pill width).
    pub tier_width: f64,
    pub background: LocalRect,
    pub background_rx: f64,
    /// Horizontal shift of the pointer triangle.
    pub pointer_dx: f64,
    pub text_x: f64,
    pub text_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    Rect(RectShape),
    Icon(IconShape),
    Text(TextShape),
    Tooltip(TooltipShape),
}

/// One positioned drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Space-separated style classes for the host surface.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Interaction::is_none")]
    pub interaction: Interaction,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Primitive {
    pub fn new(role: Role, x: f64, y: f64, width: f64, height: f64, shape: Shape) -> Self {
        Self {
            role,
            id: None,
            class: String::new(),
            x,
            y,
            width,
            height,
            interaction: Interaction::None,
            shape,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn is_tooltip(&self) -> bool {
        matches!(self.shape, Shape::Tooltip(_))
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn as_text(&self) -> Option<&TextShape> {
        match &self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tooltip(&self) -> Option<&TooltipShape> {
        match &self.shape {
            Shape::Tooltip(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_icon(&self) -> Option<&IconShape> {
        match &self.shape {
            Shape::Icon(i) => Some(i),
            _ => None,
        }
    }
}

/// Rounded title bounding box as last read back from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleBox {
    pub width: i64,
    pub height: i64,
}

/// Outcome of a pointer press resolved against a card's primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Activate,
    Navigate { target: String, new_context: bool },
    OpenDetails,
    ToggleDetailsLock,
    /// A sub-region took the press; the card handler must not run.
    Swallowed,
    /// Nothing handles the press.
    Ignored,
}

/// The engine's output for one card: primitives in paint order (back-to-front).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLayout {
    pub card_id: String,
    pub width: f64,
    pub height: f64,
    pub title_box: TitleBox,
    pub primitives: Vec<Primitive>,
}

impl CardLayout {
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.role == role)
    }

    /// Resolves a press at card-local `(x, y)`.
    ///
    /// Walks front-to-back; tooltips are hidden until hover and never take presses.
    pub fn click_at(&self, x: f64, y: f64) -> ClickOutcome {
        let hit = self
            .primitives
            .iter()
            .rev()
            .filter(|p| !p.is_tooltip() && !p.interaction.is_none())
            .find(|p| p.contains(x, y));
        match hit.map(|p| &p.interaction) {
            Some(Interaction::Activate) => ClickOutcome::Activate,
            Some(Interaction::Navigate {
                target,
                new_context,
            }) => ClickOutcome::Navigate {
                target: target.clone(),
                new_context: *new_context,
            },
            Some(Interaction::OpenDetails) => ClickOutcome::OpenDetails,
            Some(Interaction::ToggleDetailsLock) => ClickOutcome::ToggleDetailsLock,
            Some(Interaction::Capture) => ClickOutcome::Swallowed,
            Some(Interaction::None) | None => ClickOutcome::Ignored,
        }
    }
}
