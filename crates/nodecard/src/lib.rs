#![forbid(unsafe_code)]

//! `nodecard` lays out the fixed-footprint entity cards drawn as nodes of a topology graph.
//!
//! The core crate carries the input model, configuration and catalog adapter; the layout engine
//! and SVG writer live behind the `render` feature.
//!
//! # Features
//!
//! - `render`: enable card layout + SVG rendering (`nodecard::render`)

pub use nodecard_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use nodecard_render::card::{
        CardComposer, MeasureOutcome, MeasureRequest, MeasureState, MeasureTicket, RenderPass,
        compose_card, layout_card_sync,
    };
    pub use nodecard_render::model::{CardLayout, ClickOutcome, Primitive, Role, TitleBox};
    pub use nodecard_render::svg::{SvgRenderOptions, render_card_svg};
    pub use nodecard_render::text::{
        DeterministicTextMeasurer, FixedTextMeasurer, TextMeasurer, TextMetrics, TextStyle,
    };
    pub use nodecard_render::{LayoutOptions, layout_card};

    use nodecard_core::{CardInput, EntityContext};
    use serde_json::Value;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Input(#[from] nodecard_core::Error),
        #[error(transparent)]
        Render(#[from] nodecard_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts a card id (usually an entity ref such as `component:default/orders`) into an SVG
    /// `id` token that is also a plain CSS identifier, so several cards can share one document.
    ///
    /// The ref separators `:` and `/` and any other character outside `[A-Za-z0-9_.]` become a
    /// single `-`. Ids that do not start with an ASCII letter get an `n-` prefix.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.trim().chars() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                out.push(ch);
            } else if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        if out.is_empty() {
            return "n-untitled".to_string();
        }
        if !out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.insert_str(0, "n-");
        }
        out
    }

    /// Synchronous entity layout helper (executor-free).
    pub fn layout_entity_sync(
        entity: &Value,
        ctx: &EntityContext,
        layout_options: &LayoutOptions,
    ) -> Result<CardLayout> {
        let input = CardInput::from_entity(entity, ctx, &layout_options.config)?;
        Ok(layout_card(&input, layout_options))
    }

    pub async fn layout_entity(
        entity: &Value,
        ctx: &EntityContext,
        layout_options: &LayoutOptions,
    ) -> Result<CardLayout> {
        layout_entity_sync(entity, ctx, layout_options)
    }

    /// Synchronous SVG render helper (executor-free).
    pub fn render_entity_svg_sync(
        entity: &Value,
        ctx: &EntityContext,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let layout = layout_entity_sync(entity, ctx, layout_options)?;
        Ok(render_card_svg(&layout, svg_options))
    }

    pub async fn render_entity_svg(
        entity: &Value,
        ctx: &EntityContext,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        render_entity_svg_sync(entity, ctx, layout_options, svg_options)
    }

    /// Bundles layout and SVG options for hosts that render many cards.
    ///
    /// Stays runtime-agnostic: all work is CPU-bound and does not perform I/O.
    #[derive(Clone, Default)]
    pub struct HeadlessRenderer {
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: nodecard_core::CardConfig) -> Self {
            self.layout.config = config;
            self
        }

        pub fn layout_card(&self, input: &CardInput) -> CardLayout {
            layout_card(input, &self.layout)
        }

        pub fn layout_entity_sync(&self, entity: &Value, ctx: &EntityContext) -> Result<CardLayout> {
            layout_entity_sync(entity, ctx, &self.layout)
        }

        pub fn render_card_svg(&self, input: &CardInput) -> String {
            let layout = self.layout_card(input);
            let mut svg = self.svg.clone();
            svg.card_id = Some(sanitize_svg_id(&input.id));
            render_card_svg(&layout, &svg)
        }

        pub fn render_entity_svg_sync(&self, entity: &Value, ctx: &EntityContext) -> Result<String> {
            let layout = self.layout_entity_sync(entity, ctx)?;
            let mut svg = self.svg.clone();
            svg.card_id = Some(sanitize_svg_id(&layout.card_id));
            Ok(render_card_svg(&layout, &svg))
        }
    }
}
