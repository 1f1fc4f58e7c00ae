#![forbid(unsafe_code)]

//! Card input model for nodecard (headless).
//!
//! - [`model`]: the per-card input contract consumed by the layout engine
//! - [`config`]: geometry, metrics and labels, overridable from JSON
//! - [`entity`]: catalog entity → [`CardInput`] adapter (pure, no I/O)

pub mod config;
pub mod entity;
pub mod error;
pub mod model;
pub mod theme;

pub use config::{
    BadgeMetrics, CardConfig, CardGeometry, CardLabels, CatalogSettings, DeploymentMetrics,
    LinkBarMetrics,
};
pub use entity::{EntityContext, card_input_from_entity};
pub use error::{Error, Result};
pub use model::{
    Accent, BadgeIcon, CardInput, DeploymentLink, DetailsAffordance, ExternalLinkItem, LinkItem,
    MAX_BADGES, MAX_DEPLOYMENTS, MAX_EXTERNAL_LINKS, PrimaryIcon, ThemeTokens, capped,
};
