use crate::model::{
    Baseline, CardLayout, IconShape, Interaction, Primitive, RectShape, Shape, TextShape,
    TooltipShape,
};
use crate::tooltip::POINTER_PATH;
use std::fmt::Write as _;

const TOOLTIP_FILL: &str = "hsla(219, 76%, 23%, 1.00)";
const TOOLTIP_TEXT_FILL: &str = "hsla(0, 0%, 100%, 1.00)";
const TOOLTIP_FONT_SIZE: f64 = 10.0;
const GLYPH_INSET: f64 = 2.0;
const APP_GLYPH_SIZE: f64 = 12.0;
const ENV_GLYPH_OFFSET: f64 = 10.0;
const ENV_GLYPH_SIZE: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; defaults to the card id.
    pub card_id: Option<String>,
    /// When false, hover tooltips are left out entirely.
    pub include_tooltips: bool,
    /// Prefix for icon symbol references (`<use href="#{prefix}{name}">`).
    pub icon_href_prefix: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            card_id: None,
            include_tooltips: true,
            icon_href_prefix: "icon-".to_string(),
        }
    }
}

pub fn render_card_svg(layout: &CardLayout, options: &SvgRenderOptions) -> String {
    let card_id = options.card_id.as_deref().unwrap_or(&layout.card_id);
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="entity-card">"#,
        id = escape_attr(card_id),
        w = fmt(layout.width),
        h = fmt(layout.height),
    );
    for p in &layout.primitives {
        if p.is_tooltip() && !options.include_tooltips {
            continue;
        }
        render_primitive(&mut out, p, options);
    }
    out.push_str("</svg>");
    out
}

fn render_primitive(out: &mut String, p: &Primitive, options: &SvgRenderOptions) {
    let link = match &p.interaction {
        Interaction::Navigate {
            target,
            new_context,
        } => Some((target, *new_context)),
        _ => None,
    };
    if let Some((target, new_context)) = link {
        let _ = write!(
            out,
            r#"<a href="{}" target="{}">"#,
            escape_attr(target),
            if new_context { "_blank" } else { "_self" }
        );
    }
    match &p.shape {
        Shape::Rect(rect) => render_rect(out, p, rect),
        Shape::Icon(icon) => render_icon(out, p, icon, options),
        Shape::Text(text) => render_text(out, p, text),
        Shape::Tooltip(tooltip) => render_tooltip(out, p, tooltip),
    }
    if link.is_some() {
        out.push_str("</a>");
    }
}

fn common_attrs(out: &mut String, p: &Primitive) {
    if let Some(id) = p.id.as_deref() {
        let _ = write!(out, r#" id="{}""#, escape_attr(id));
    }
    if !p.class.is_empty() {
        let _ = write!(out, r#" class="{}""#, escape_attr(&p.class));
    }
}

fn render_rect(out: &mut String, p: &Primitive, rect: &RectShape) {
    out.push_str("<rect");
    common_attrs(out, p);
    let _ = write!(
        out,
        r#" x="{}" y="{}" width="{}" height="{}""#,
        fmt(p.x),
        fmt(p.y),
        fmt(p.width),
        fmt(p.height)
    );
    if rect.rx > 0.0 {
        let _ = write!(out, r#" rx="{r}" ry="{r}""#, r = fmt(rect.rx));
    }
    if let Some(fill) = rect.fill.as_deref() {
        let _ = write!(out, r#" fill="{}""#, escape_attr(fill));
    }
    if let Some(stroke) = rect.stroke.as_deref() {
        let _ = write!(out, r#" stroke="{}""#, escape_attr(stroke));
    }
    out.push_str("/>");
}

fn render_icon(out: &mut String, p: &Primitive, icon: &IconShape, options: &SvgRenderOptions) {
    let prefix = &options.icon_href_prefix;
    if icon.app_glyph.is_none() && icon.env_glyph.is_none() {
        out.push_str("<use");
        common_attrs(out, p);
        let _ = write!(
            out,
            r##" href="#{}{}" x="{}" y="{}" width="{}" height="{}""##,
            escape_attr(prefix),
            escape_attr(&icon.name),
            fmt(p.x),
            fmt(p.y),
            fmt(p.width),
            fmt(p.height)
        );
        if let Some(color) = icon.color.as_deref() {
            let _ = write!(out, r#" color="{}""#, escape_attr(color));
        }
        out.push_str("/>");
        return;
    }

    // Layered deployment icon: circle, app glyph, environment glyph.
    out.push_str("<svg");
    common_attrs(out, p);
    let _ = write!(
        out,
        r#" x="{x}" y="{y}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-icon="{name}">"#,
        x = fmt(p.x),
        y = fmt(p.y),
        w = fmt(p.width),
        h = fmt(p.height),
        name = escape_attr(&icon.name),
    );
    let _ = write!(
        out,
        r##"<rect width="{w}" height="{h}" fill="transparent"/><use href="#{prefix}circle" width="{w}" height="{h}"/>"##,
        w = fmt(p.width),
        h = fmt(p.height),
        prefix = escape_attr(prefix),
    );
    if let Some(app) = icon.app_glyph.as_deref() {
        let _ = write!(
            out,
            r##"<use href="#{}app-{}" x="{i}" y="{i}" width="{s}" height="{s}"/>"##,
            escape_attr(prefix),
            escape_attr(app),
            i = fmt(GLYPH_INSET),
            s = fmt(APP_GLYPH_SIZE),
        );
    }
    if let Some(env) = icon.env_glyph.as_deref() {
        let _ = write!(
            out,
            r##"<use href="#{}env-{}" x="{o}" y="{o}" width="{s}" height="{s}"/>"##,
            escape_attr(prefix),
            escape_attr(env),
            o = fmt(ENV_GLYPH_OFFSET),
            s = fmt(ENV_GLYPH_SIZE),
        );
    }
    out.push_str("</svg>");
}

fn render_text(out: &mut String, p: &Primitive, text: &TextShape) {
    out.push_str("<text");
    common_attrs(out, p);
    let _ = write!(
        out,
        r#" x="{}" y="{}" font-size="{}""#,
        fmt(p.x),
        fmt(p.y),
        fmt(text.font_size)
    );
    if let Some(weight) = text.font_weight.as_deref() {
        let _ = write!(out, r#" font-weight="{}""#, escape_attr(weight));
    }
    if text.baseline == Baseline::Middle {
        out.push_str(r#" alignment-baseline="middle""#);
    }
    out.push('>');
    match text.lines.as_slice() {
        [single] => out.push_str(&escape_xml(&single.text)),
        lines => {
            for line in lines {
                let _ = write!(out, r#"<tspan x="{}""#, fmt(p.x));
                if line.dy != 0.0 {
                    let _ = write!(out, r#" dy="{}""#, fmt(line.dy));
                }
                let _ = write!(out, ">{}</tspan>", escape_xml(&line.text));
            }
        }
    }
    out.push_str("</text>");
}

fn render_tooltip(out: &mut String, p: &Primitive, tooltip: &TooltipShape) {
    let bg = &tooltip.background;
    let _ = write!(
        out,
        r#"<svg class="{class}" role="tooltip" x="{x}" y="{y}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" fill="none">"#,
        class = escape_attr(&p.class),
        x = fmt(p.x),
        y = fmt(p.y),
        w = fmt(p.width),
        h = fmt(p.height),
    );
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{TOOLTIP_FILL}"/>"#,
        fmt(bg.x),
        fmt(bg.y),
        fmt(bg.width),
        fmt(bg.height),
        fmt(tooltip.background_rx),
    );
    if tooltip.pointer_dx != 0.0 {
        let _ = write!(
            out,
            r#"<path transform="translate({} 0)" d="{POINTER_PATH}" fill="{TOOLTIP_FILL}"/>"#,
            fmt(tooltip.pointer_dx)
        );
    } else {
        let _ = write!(out, r#"<path d="{POINTER_PATH}" fill="{TOOLTIP_FILL}"/>"#);
    }
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" fill="{TOOLTIP_TEXT_FILL}" font-size="{}" font-weight="bold">{}</text>"#,
        fmt(tooltip.text_x),
        fmt(tooltip.text_y),
        fmt(TOOLTIP_FONT_SIZE),
        escape_xml(&tooltip.label),
    );
    out.push_str("</svg>");
}

fn fmt(v: f64) -> String {
    // At most three decimals, no `-0`.
    if !v.is_finite() {
        return "0".to_string();
    }

    let v = (v * 1000.0).round() / 1000.0;
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
