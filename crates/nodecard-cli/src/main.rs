use nodecard::render::{
    DeterministicTextMeasurer, FixedTextMeasurer, LayoutOptions, SvgRenderOptions, TextMeasurer,
    TextMetrics, layout_card, render_card_svg, sanitize_svg_id,
};
use nodecard::{Accent, CardConfig, CardInput, DetailsAffordance, EntityContext};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NODECARD_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Input(nodecard::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Input(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<nodecard::Error> for CliError {
    fn from(value: nodecard::Error) -> Self {
        Self::Input(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Parse,
    Config,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum TextMeasurerKind {
    #[default]
    Deterministic,
    /// Every title measures as this box, like a host that already read it back.
    Fixed { width: f64, height: f64 },
}

impl FromStr for TextMeasurerKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("deterministic") {
            return Ok(Self::Deterministic);
        }
        let (w, h) = s.split_once('x').ok_or(())?;
        let width = w.trim().parse::<f64>().map_err(|_| ())?;
        let height = h.trim().parse::<f64>().map_err(|_| ())?;
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(());
        }
        Ok(Self::Fixed { width, height })
    }
}

fn parse_accent(s: &str) -> Option<Accent> {
    match s.trim().to_ascii_lowercase().as_str() {
        "default" => Some(Accent::Default),
        "primary" => Some(Accent::Primary),
        "secondary" => Some(Accent::Secondary),
        _ => None,
    }
}

fn parse_details(s: &str) -> Option<DetailsAffordance> {
    match s.trim().to_ascii_lowercase().as_str() {
        "hidden" => Some(DetailsAffordance::Hidden),
        "closed" => Some(DetailsAffordance::Closed),
        "open" | "unlocked" => Some(DetailsAffordance::Open { locked: false }),
        "locked" => Some(DetailsAffordance::Open { locked: true }),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    entity: bool,
    config: Option<String>,
    control_plane_url: Option<String>,
    context: EntityContext,
    text_measurer: TextMeasurerKind,
    include_tooltips: bool,
    card_id: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "nodecard-cli\n\
\n\
USAGE:\n\
  nodecard-cli [parse] [--entity] [--pretty] [--config <path>] [--control-plane-url <url>] [<context flags>] [<path>|-]\n\
  nodecard-cli config [--pretty] [--config <path>] [--control-plane-url <url>]\n\
  nodecard-cli layout [--entity] [--pretty] [--config <path>] [--control-plane-url <url>] [--text-measurer deterministic|<w>x<h>] [<context flags>] [<path>|-]\n\
  nodecard-cli render [--entity] [--config <path>] [--control-plane-url <url>] [--text-measurer deterministic|<w>x<h>] [--no-tooltips] [--id <svg-id>] [--out <path>] [<context flags>] [<path>|-]\n\
\n\
CONTEXT FLAGS (only with --entity):\n\
  --focused  --activatable  --accent default|primary|secondary  --details hidden|closed|open|locked\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a card input JSON document; with --entity it is a catalog entity instead.\n\
  - parse prints the normalized card input; layout prints the positioned primitives.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - Set NODECARD_LOG (e.g. NODECARD_LOG=debug) to see layout diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Parse,
        include_tooltips: true,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "config" => args.command = Command::Config,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--entity" => args.entity = true,
            "--focused" => args.context.focused = true,
            "--activatable" => args.context.activatable = true,
            "--no-tooltips" => args.include_tooltips = false,
            "--accent" => {
                let Some(accent) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.context.accent = parse_accent(accent).ok_or(CliError::Usage(usage()))?;
            }
            "--details" => {
                let Some(details) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.context.details = parse_details(details).ok_or(CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--control-plane-url" => {
                let Some(url) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !url.trim().is_empty() {
                    args.control_plane_url = Some(url.trim().to_string());
                }
            }
            "--text-measurer" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.text_measurer = kind
                    .parse::<TextMeasurerKind>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.card_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn build_text_measurer(kind: TextMeasurerKind) -> Arc<dyn TextMeasurer + Send + Sync> {
    match kind {
        TextMeasurerKind::Deterministic => Arc::new(DeterministicTextMeasurer::default()),
        TextMeasurerKind::Fixed { width, height } => Arc::new(FixedTextMeasurer(TextMetrics {
            width,
            height,
            line_count: 1,
        })),
    }
}

fn load_config(args: &Args) -> Result<CardConfig, CliError> {
    let overrides = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<Value>(&std::fs::read_to_string(path)?)?,
        None => Value::Null,
    };
    let mut config = CardConfig::from_value(&overrides)?;
    if let Some(url) = args.control_plane_url.as_deref() {
        config.catalog.control_plane_url = Some(url.to_string());
    }
    Ok(config)
}

fn load_card_input(args: &Args, config: &CardConfig) -> Result<CardInput, CliError> {
    let text = read_input(args.input.as_deref())?;
    if args.entity {
        let entity: Value = serde_json::from_str(&text)?;
        Ok(CardInput::from_entity(&entity, &args.context, config)?)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    tracing::debug!(command = ?args.command, entity = args.entity, "nodecard-cli");

    match args.command {
        Command::Config => write_json(&config.as_value(), args.pretty),
        Command::Parse => {
            let input = load_card_input(&args, &config)?;
            write_json(&input, args.pretty)
        }
        Command::Layout => {
            let input = load_card_input(&args, &config)?;
            let options = LayoutOptions {
                text_measurer: build_text_measurer(args.text_measurer),
                config,
            };
            let layout = layout_card(&input, &options);
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let input = load_card_input(&args, &config)?;
            let options = LayoutOptions {
                text_measurer: build_text_measurer(args.text_measurer),
                config,
            };
            let layout = layout_card(&input, &options);
            let svg_options = SvgRenderOptions {
                card_id: args.card_id.as_deref().map(sanitize_svg_id),
                include_tooltips: args.include_tooltips,
                ..Default::default()
            };
            let svg = render_card_svg(&layout, &svg_options);
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("nodecard-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_render_flags() {
        let args = parse_args(&argv(&[
            "render",
            "--entity",
            "--accent",
            "secondary",
            "--details",
            "locked",
            "--focused",
            "--no-tooltips",
            "--text-measurer",
            "120x18",
            "entity.json",
        ]))
        .expect("args");
        assert_eq!(args.command, Command::Render);
        assert!(args.entity && args.context.focused && !args.include_tooltips);
        assert_eq!(args.context.accent, Accent::Secondary);
        assert_eq!(args.context.details, DetailsAffordance::Open { locked: true });
        let TextMeasurerKind::Fixed { width, height } = args.text_measurer else {
            panic!("expected a fixed measurer");
        };
        assert_eq!((width, height), (120.0, 18.0));
        assert_eq!(args.input.as_deref(), Some("entity.json"));
    }

    #[test]
    fn stdin_dash_is_an_input_not_a_flag() {
        let args = parse_args(&argv(&["layout", "-"])).expect("args");
        assert_eq!(args.input.as_deref(), Some("-"));
    }

    #[test]
    fn rejects_unknown_flags_and_bad_values() {
        assert!(matches!(
            parse_args(&argv(&["--bogus"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--accent", "loud"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--text-measurer", "wide"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["a.json", "b.json"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn config_errors_are_input_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad-config.json");
        std::fs::write(&path, "[1, 2]").expect("write config");
        let args = parse_args(&argv(&["config", "--config", path.to_string_lossy().as_ref()]))
            .expect("args");
        assert!(matches!(load_config(&args), Err(CliError::Input(_))));
    }

    #[test]
    fn control_plane_flag_lands_in_config() {
        let args = parse_args(&argv(&["config", "--control-plane-url", "https://cp.example.com"]))
            .expect("args");
        let config = load_config(&args).expect("config");
        assert_eq!(
            config.catalog.control_plane_url.as_deref(),
            Some("https://cp.example.com")
        );
    }
}
