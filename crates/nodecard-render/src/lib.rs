#![forbid(unsafe_code)]

//! Entity-card layout engine.
//!
//! Turns a [`nodecard_core::CardInput`] into positioned drawing primitives ([`model::CardLayout`])
//! inside a fixed 350×92 card, and optionally serializes them to SVG.

pub mod badges;
pub mod card;
pub mod deployments;
pub mod label;
pub mod link_bar;
pub mod model;
pub mod svg;
pub mod text;
pub mod tooltip;

use crate::model::CardLayout;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use nodecard_core::{CardConfig, CardInput, EntityContext};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] nodecard_core::Error),
    #[error("card input JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    pub config: CardConfig,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            config: CardConfig::default(),
        }
    }
}

impl LayoutOptions {
    pub fn with_config(mut self, config: CardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.text_measurer = measurer;
        self
    }
}

/// Lays out a card, settling the title measurement with the configured measurer.
pub fn layout_card(input: &CardInput, options: &LayoutOptions) -> CardLayout {
    card::layout_card_sync(input, &options.config, options.text_measurer.as_ref())
}

pub fn layout_card_json(json: &str, options: &LayoutOptions) -> Result<CardLayout> {
    let input: CardInput = serde_json::from_str(json)?;
    Ok(layout_card(&input, options))
}

/// Lays out a raw catalog entity.
pub fn layout_entity_value(
    entity: &Value,
    ctx: &EntityContext,
    options: &LayoutOptions,
) -> Result<CardLayout> {
    let input = CardInput::from_entity(entity, ctx, &options.config)?;
    Ok(layout_card(&input, options))
}
