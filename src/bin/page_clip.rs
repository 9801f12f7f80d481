//! Command-line clipper for saved pages.
//!
//! Reads a saved page from a file or stdin, captures it like the browser
//! clipper would, and opens the resulting hand-off URL (or prints it).
//!
//! ```text
//! page-clip saved.html --url https://example.com/post
//! page-clip --url https://example.com/post --mode 2 --print < saved.html
//! page-clip saved.html --url https://example.com/post --select "article p" --json
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use page_clipper::launch::{RecordingNavigator, SystemNavigator, WriterNavigator};
use page_clipper::prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
use page_clipper::selection::selection_from_css;
use page_clipper::{config, encoding, logging, url_utils};
use page_clipper::{ClipOutcome, Clipper, ClipperConfig, Collaborators, Navigator, PageSnapshot};
use serde::Serialize;

/// Capture a saved web page as a Markdown note.
#[derive(Debug, Parser)]
#[command(name = "page-clip", version)]
#[command(about = "Capture a saved web page as a Markdown note and hand it off to Obsidian", long_about = None)]
struct Cli {
    /// Saved page to capture; `-` or nothing reads stdin.
    input: Option<PathBuf>,

    /// URL the page was loaded from.
    #[arg(long, value_name = "URL")]
    url: String,

    /// Capture the elements matching this CSS selector instead of the article.
    #[arg(long = "select", value_name = "CSS")]
    select: Vec<String>,

    /// Capture this HTML fragment instead of the article.
    #[arg(long = "selection-file", value_name = "PATH")]
    selection_files: Vec<PathBuf>,

    /// Configuration file (TOML). Defaults to page-clipper/config.toml in the XDG config dirs.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in configuration: capture, clippings or link.
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Vault to open; an empty value lets the application choose.
    #[arg(long)]
    vault: Option<String>,

    /// Folder inside the vault.
    #[arg(long)]
    folder: Option<String>,

    /// Answer to the capture-mode prompt: 1 (link only) or 2 (full).
    #[arg(long, value_name = "1|2")]
    mode: Option<String>,

    /// Print the hand-off URL instead of opening it.
    #[arg(long, conflicts_with = "json")]
    print: bool,

    /// Print the note and its target as JSON instead of opening it.
    #[arg(long)]
    json: bool,

    /// More log output (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    mode: page_clipper::CaptureMode,
    file: String,
    vault: &'a str,
    title: &'a str,
    author: &'a str,
    source: &'a str,
    source_date: String,
    url: &'a str,
    content: &'a str,
}

impl<'a> JsonOutput<'a> {
    fn new(outcome: &'a ClipOutcome) -> Self {
        Self {
            mode: outcome.mode,
            file: outcome.hand_off.target.path(),
            vault: &outcome.hand_off.target.vault,
            title: &outcome.metadata.title,
            author: &outcome.metadata.author,
            source: &outcome.metadata.source_url,
            source_date: outcome.metadata.publication_date.format("%Y-%m-%d").to_string(),
            url: &outcome.hand_off.url,
            content: &outcome.content,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.verbose) {
        eprintln!("page-clip: logging disabled: {err}");
    }

    if let Err(err) = run(cli) {
        eprintln!("page-clip error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;
    if let Some(vault) = &cli.vault {
        config.destination.vault.clone_from(vault);
    }
    if let Some(folder) = &cli.folder {
        config.destination.folder.clone_from(folder);
    }

    let reads_stdin = cli.input.as_deref().is_none_or(|p| p == Path::new("-"));
    if reads_stdin && cli.mode.is_none() && config.note.capture_mode.is_none() {
        bail!("reading the page from stdin leaves no terminal for the prompt; pass --mode 1 or --mode 2");
    }

    let snapshot = read_snapshot(&cli)?;
    let collaborators = Collaborators::load(&config).context("setting up the capture")?;
    let clipper = Clipper::new(config, collaborators);

    // Scripted answers have nobody watching; echo their alerts
    let echo_alerts = cli.mode.is_some();
    let mut prompter: Box<dyn Prompter> = match &cli.mode {
        Some(answer) => Box::new(ScriptedPrompter::answering(answer)),
        None => Box::new(TerminalPrompter::new(io::stdin().lock(), io::stderr())),
    };

    let outcome = if cli.json {
        let mut navigator = RecordingNavigator::default();
        let outcome = capture(&clipper, &snapshot, prompter.as_mut(), &mut navigator, echo_alerts)?;
        println!("{}", serde_json::to_string_pretty(&JsonOutput::new(&outcome))?);
        outcome
    } else if cli.print {
        let mut navigator = WriterNavigator::new(io::stdout().lock());
        capture(&clipper, &snapshot, prompter.as_mut(), &mut navigator, echo_alerts)?
    } else {
        capture(&clipper, &snapshot, prompter.as_mut(), &mut SystemNavigator, echo_alerts)?
    };

    tracing::debug!("captured {} as {:?}", outcome.metadata.source_url, outcome.mode);
    Ok(())
}

/// Run the capture, optionally echoing alerts on stderr.
fn capture(
    clipper: &Clipper,
    snapshot: &PageSnapshot,
    prompter: &mut dyn Prompter,
    navigator: &mut dyn Navigator,
    echo_alerts: bool,
) -> Result<ClipOutcome> {
    let mut alerts = AlertEcho {
        inner: prompter,
        echo: echo_alerts,
    };
    clipper
        .run(snapshot, &mut alerts, navigator)
        .with_context(|| format!("capturing {}", snapshot.url))
}

/// Forwards to a prompter, mirroring its alerts on stderr when `echo` is set.
struct AlertEcho<'a> {
    inner: &'a mut dyn Prompter,
    echo: bool,
}

impl Prompter for AlertEcho<'_> {
    fn ask(&mut self, message: &str, default: &str) -> Option<String> {
        self.inner.ask(message, default)
    }

    fn alert(&mut self, message: &str) {
        if self.echo {
            eprintln!("{message}");
        }
        self.inner.alert(message);
    }
}

fn load_config(cli: &Cli) -> Result<ClipperConfig> {
    if let Some(path) = &cli.config {
        return config::load_from_path(path).with_context(|| format!("loading {}", path.display()));
    }
    if let Some(name) = &cli.preset {
        return Ok(ClipperConfig::preset(name)?);
    }
    match config::default_config_path() {
        Some(path) => config::load_from_path(&path).with_context(|| format!("loading {}", path.display())),
        None => Ok(ClipperConfig::default()),
    }
}

fn read_snapshot(cli: &Cli) -> Result<PageSnapshot> {
    let url = url_utils::parse_page_url(&cli.url)?;

    let bytes = match cli.input.as_deref() {
        Some(path) if path != Path::new("-") => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        _ => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes).context("reading the page from stdin")?;
            bytes
        }
    };
    let html = encoding::decode_page(&bytes);

    let mut selection = Vec::new();
    for selector in &cli.select {
        let matched = selection_from_css(&html, selector);
        if matched.is_empty() {
            tracing::warn!("selector {selector:?} matched nothing");
        }
        selection.extend(matched);
    }
    for path in &cli.selection_files {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        selection.push(encoding::decode_page(&bytes));
    }

    Ok(PageSnapshot::new(html, url).with_selection(selection))
}
