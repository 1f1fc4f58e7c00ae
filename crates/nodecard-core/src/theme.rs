//! Named card themes and how entity-level customization resolves into color tokens.

use crate::model::ThemeTokens;
use serde_json::Value;

const NAMED_THEMES: &[(&str, &str, &str)] = &[
    ("blue", "hsla(191, 100%, 83%, 1)", "hsla(193, 100%, 48%, 1)"),
    ("green", "hsla(139, 100%, 87%, 1)", "hsla(139, 46%, 44%, 1)"),
    ("navy", "hsla(240, 100%, 95%, 1)", "hsla(240, 100%, 25%, 1)"),
    ("orange", "hsla(31, 100%, 87%, 1)", "hsla(29, 72%, 50%, 1)"),
    ("pastelGreen", "hsla(87, 100%, 77%, 1)", "hsla(100, 58%, 52%, 1)"),
    ("pink", "hsla(354, 100%, 87%, 1)", "hsla(346, 82%, 59%, 1)"),
    ("purple", "hsla(315, 100%, 92%, 1)", "hsla(316, 72%, 36%, 1)"),
    ("yellow", "hsla(47, 100%, 82%, 1)", "hsla(42, 100%, 50%, 1)"),
];

pub fn named_theme(name: &str) -> Option<ThemeTokens> {
    NAMED_THEMES
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, background, icon_color)| ThemeTokens {
            background: Some((*background).to_string()),
            icon_color: Some((*icon_color).to_string()),
        })
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ThemeCustomization {
    pub name: Option<String>,
    pub colors: Option<CustomColors>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CustomColors {
    pub background: Option<String>,
    pub icon_color: Option<String>,
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

impl ThemeCustomization {
    /// Reads `{ name, colors: { background, iconColor } }`; mistyped fields are dropped one by one.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let colors = value.get("colors").filter(|c| c.is_object()).map(|c| CustomColors {
            background: string_field(c, "background"),
            icon_color: string_field(c, "iconColor"),
        });
        Some(Self {
            name: string_field(value, "name"),
            colors,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Priority: a full custom pair, then a named theme patched by partial custom colors, then the
/// named theme alone, then nothing.
pub(crate) fn resolve_theme(custom: Option<&ThemeCustomization>) -> ThemeTokens {
    let Some(custom) = custom else {
        return ThemeTokens::default();
    };
    let named = custom.name.as_deref().and_then(named_theme);
    let background = custom.colors.as_ref().and_then(|c| non_empty(&c.background));
    let icon_color = custom.colors.as_ref().and_then(|c| non_empty(&c.icon_color));

    if background.is_some() && icon_color.is_some() {
        return ThemeTokens {
            background,
            icon_color,
        };
    }

    match (named, custom.colors.is_some()) {
        (Some(mut tokens), true) => {
            if background.is_some() {
                tokens.background = background;
            }
            if icon_color.is_some() {
                tokens.icon_color = icon_color;
            }
            tokens
        }
        (Some(tokens), false) => tokens,
        (None, _) => ThemeTokens::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(name: Option<&str>, bg: Option<&str>, icon: Option<&str>) -> ThemeCustomization {
        ThemeCustomization {
            name: name.map(str::to_string),
            colors: if bg.is_none() && icon.is_none() {
                None
            } else {
                Some(CustomColors {
                    background: bg.map(str::to_string),
                    icon_color: icon.map(str::to_string),
                })
            },
        }
    }

    #[test]
    fn unknown_or_missing_theme_resolves_to_nothing() {
        assert_eq!(resolve_theme(None), ThemeTokens::default());
        assert_eq!(
            resolve_theme(Some(&custom(Some("plaid"), None, None))),
            ThemeTokens::default()
        );
    }

    #[test]
    fn named_theme_is_used_as_is() {
        let tokens = resolve_theme(Some(&custom(Some("navy"), None, None)));
        assert_eq!(tokens.background.as_deref(), Some("hsla(240, 100%, 95%, 1)"));
        assert_eq!(tokens.icon_color.as_deref(), Some("hsla(240, 100%, 25%, 1)"));
    }

    #[test]
    fn full_custom_pair_wins_over_named_theme() {
        let tokens = resolve_theme(Some(&custom(Some("navy"), Some("#fff"), Some("#000"))));
        assert_eq!(tokens.background.as_deref(), Some("#fff"));
        assert_eq!(tokens.icon_color.as_deref(), Some("#000"));
    }

    #[test]
    fn partial_custom_patches_named_theme() {
        let tokens = resolve_theme(Some(&custom(Some("pink"), None, Some("#123456"))));
        assert_eq!(tokens.background.as_deref(), Some("hsla(354, 100%, 87%, 1)"));
        assert_eq!(tokens.icon_color.as_deref(), Some("#123456"));
    }

    #[test]
    fn theme_fields_are_read_independently() {
        let theme = ThemeCustomization::from_value(&serde_json::json!({
            "name": 7,
            "colors": { "background": "#fff", "iconColor": "#000" }
        }))
        .expect("object theme");
        assert!(theme.name.is_none());
        assert_eq!(
            resolve_theme(Some(&theme)),
            ThemeTokens {
                background: Some("#fff".to_string()),
                icon_color: Some("#000".to_string()),
            }
        );
        assert!(ThemeCustomization::from_value(&serde_json::json!("green")).is_none());
    }

    #[test]
    fn partial_custom_without_named_theme_is_ignored() {
        let tokens = resolve_theme(Some(&custom(None, Some("#fff"), None)));
        assert_eq!(tokens, ThemeTokens::default());
    }
}
