//! The `larkdown` binary.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use larkdown::{Extensions, Options, RenderFlags, Renderer, DEFAULT_MAX_NESTING};

const EXIT_PARSE_CONFIG: u8 = 2;
const EXIT_READ_INPUT: u8 = 3;

#[derive(Debug, Parser)]
#[command(about, author, version)]
#[command(after_help = "\
By default, larkdown will attempt to read command-line options from a config file specified by \
--config-file. This behaviour can be disabled by passing --config-file none.

Set LARKDOWN_LOG to a tracing filter (e.g. `debug`) to see what the parser is doing.")]
struct Cli {
    /// Markdown files to render; standard input if none are given
    #[arg(value_name = "FILE")]
    files: Option<Vec<PathBuf>>,

    /// Path to config file containing command-line arguments, or 'none'
    #[arg(short, long, value_name = "PATH", default_value = get_default_config_path())]
    config_file: String,

    /// Enable a grammar extension
    #[arg(short, long = "extension", value_name = "EXTENSION", value_enum)]
    extensions: Vec<Extension>,

    /// Set a default-renderer flag
    #[arg(short, long = "render", value_name = "FLAG", value_enum)]
    render_flags: Vec<RenderFlag>,

    /// Nesting depth past which content is emitted as plain text
    #[arg(long, value_name = "DEPTH", default_value_t = DEFAULT_MAX_NESTING)]
    max_nesting: usize,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Extension {
    Tables,
    FencedCode,
    Footnotes,
    Autolink,
    Strikethrough,
    Underline,
    Highlight,
    Quote,
    Superscript,
    LaxSpacing,
    NoIntraEmphasis,
    SpaceHeaders,
    DisableIndentedCode,
}

impl From<Extension> for Extensions {
    fn from(ext: Extension) -> Self {
        match ext {
            Extension::Tables => Extensions::TABLES,
            Extension::FencedCode => Extensions::FENCED_CODE,
            Extension::Footnotes => Extensions::FOOTNOTES,
            Extension::Autolink => Extensions::AUTOLINK,
            Extension::Strikethrough => Extensions::STRIKETHROUGH,
            Extension::Underline => Extensions::UNDERLINE,
            Extension::Highlight => Extensions::HIGHLIGHT,
            Extension::Quote => Extensions::QUOTE,
            Extension::Superscript => Extensions::SUPERSCRIPT,
            Extension::LaxSpacing => Extensions::LAX_SPACING,
            Extension::NoIntraEmphasis => Extensions::NO_INTRA_EMPHASIS,
            Extension::SpaceHeaders => Extensions::SPACE_HEADERS,
            Extension::DisableIndentedCode => Extensions::DISABLE_INDENTED_CODE,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RenderFlag {
    SkipHtml,
    SkipStyle,
    SkipImages,
    SkipLinks,
    ExpandTabs,
    Safelink,
    Toc,
    HardWrap,
    UseXhtml,
    Escape,
    Smartypants,
}

impl From<RenderFlag> for RenderFlags {
    fn from(flag: RenderFlag) -> Self {
        match flag {
            RenderFlag::SkipHtml => RenderFlags::SKIP_HTML,
            RenderFlag::SkipStyle => RenderFlags::SKIP_STYLE,
            RenderFlag::SkipImages => RenderFlags::SKIP_IMAGES,
            RenderFlag::SkipLinks => RenderFlags::SKIP_LINKS,
            RenderFlag::ExpandTabs => RenderFlags::EXPAND_TABS,
            RenderFlag::Safelink => RenderFlags::SAFELINK,
            RenderFlag::Toc => RenderFlags::TOC,
            RenderFlag::HardWrap => RenderFlags::HARD_WRAP,
            RenderFlag::UseXhtml => RenderFlags::USE_XHTML,
            RenderFlag::Escape => RenderFlags::ESCAPE,
            RenderFlag::Smartypants => RenderFlags::SMARTYPANTS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("input is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("could not parse config file: {0}")]
    Config(#[from] shell_words::ParseError),
    #[error("could not write output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => EXIT_PARSE_CONFIG,
            CliError::Io { .. } | CliError::Utf8(_) => EXIT_READ_INPUT,
            CliError::Output(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LARKDOWN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("larkdown: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = parse_cli_with_config()?;

    let extension = cli
        .extensions
        .iter()
        .fold(Extensions::empty(), |acc, &e| acc | e.into());
    let render = cli
        .render_flags
        .iter()
        .fold(RenderFlags::empty(), |acc, &f| acc | f.into());

    let options = Options {
        extension,
        render,
        max_nesting: cli.max_nesting,
    };
    debug!(?options, "options");

    let input = read_input(cli.files.as_deref())?;
    let html = Renderer::new(options).render(&input);

    match cli.output {
        Some(path) => fs::write(&path, html).map_err(CliError::Output)?,
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(html.as_bytes())
                .and_then(|()| lock.flush())
                .map_err(CliError::Output)?;
        }
    }

    Ok(())
}

/// Parses the command line, with the arguments in the config file (if any)
/// placed before those given directly so the latter take precedence.
fn parse_cli_with_config() -> Result<Cli, CliError> {
    let cli = Cli::parse();
    if cli.config_file == "none" {
        return Ok(cli);
    }

    let path = Path::new(&cli.config_file);
    let config = match fs::read_to_string(path) {
        Ok(config) => config,
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "config file unreadable; ignoring");
            }
            return Ok(cli);
        }
    };

    let mut args = std::env::args_os();
    let mut merged = Vec::new();
    if let Some(bin) = args.next() {
        merged.push(bin);
    }
    merged.extend(shell_words::split(&config)?.into_iter().map(Into::into));
    merged.extend(args);

    debug!(path = %path.display(), "config file applied");
    Ok(Cli::parse_from(merged))
}

fn read_input(files: Option<&[PathBuf]>) -> Result<String, CliError> {
    let mut bytes = Vec::with_capacity(2048);

    match files {
        None | Some([]) => {
            io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
        }
        Some(files) => {
            for file in files {
                let mut f = fs::File::open(file).map_err(|source| CliError::Io {
                    path: file.display().to_string(),
                    source,
                })?;
                f.read_to_end(&mut bytes).map_err(|source| CliError::Io {
                    path: file.display().to_string(),
                    source,
                })?;
            }
        }
    }

    Ok(String::from_utf8(bytes)?)
}

#[cfg(all(not(windows), not(target_arch = "wasm32")))]
fn get_default_config_path() -> String {
    if let Ok(xdg_dirs) = xdg::BaseDirectories::with_prefix("larkdown") {
        if let Ok(path) = xdg_dirs.place_config_file("config") {
            if let Some(path_str) = path.to_str() {
                return path_str.into();
            }
        }
    }

    "larkdown.config".into()
}

#[cfg(any(windows, target_arch = "wasm32"))]
fn get_default_config_path() -> String {
    "larkdown.config".into()
}
