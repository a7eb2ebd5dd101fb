//! Manless - dump manual pages and listings as navigable documents.
//!
//! # Usage
//!
//! ```bash
//! man ls | manless --title ls
//! man ls | manless --links --roff /usr/share/man/man1/ls.1 --toc
//! apropos dir | manless --listing --title dir --json
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use manless::app::{Message, Outcome, Session, update};
use manless::config::{Config, ConfigFlags, load_default_flags};
use manless::document::TocKind;
use manless::error::{Error, ExitStatus};
use manless::history::RequestKind;
use manless::source::StaticSource;

const DEFAULT_WIDTH: u16 = 80;
const DEFAULT_HEIGHT: u16 = 24;

/// Decode formatted manual pages and apropos/whatis listings
#[derive(Parser, Debug)]
#[command(name = "manless", version, about, long_about = None)]
struct Cli {
    /// Formatted page or listing; standard input when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Treat the input as apropos/whatis output
    #[arg(long)]
    listing: bool,

    /// Page name or listing query the input belongs to
    #[arg(long, default_value = "stdin")]
    title: String,

    /// Roff source of the page, for its table of contents
    #[arg(long, value_name = "PATH")]
    roff: Option<PathBuf>,

    /// Print the hits of a search instead of the page
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Print the table of contents
    #[arg(long)]
    toc: bool,

    /// Print the links of the page
    #[arg(long)]
    links: bool,

    /// Dump the document as JSON
    #[arg(long)]
    json: bool,

    /// Search without case folding
    #[arg(long)]
    case_sensitive: bool,

    /// Link every manual page reference, known or not
    #[arg(long)]
    no_verify_links: bool,

    /// Do not link option tokens to their definitions
    #[arg(long)]
    no_local_search: bool,

    /// Leave tagged paragraphs out of the table of contents
    #[arg(long)]
    no_tagged_toc: bool,

    /// Layout width for listings
    #[arg(long, value_name = "COLUMNS")]
    width: Option<u16>,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            case_sensitive: self.case_sensitive,
            no_verify_links: self.no_verify_links,
            no_local_search: self.no_local_search,
            no_tagged_toc: self.no_tagged_toc,
            width: self.width,
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            Ok(text)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitStatus> {
    let effective = load_default_flags()?.union(&cli.flags());
    let config = Config::from(&effective);
    tracing::debug!(?config, "effective configuration");

    let text = read_input(cli.file.as_ref())?;
    let mut source = StaticSource::new();
    let kind = if cli.listing {
        source = source.with_listing(text);
        RequestKind::Apropos
    } else {
        source = source.with_page(text);
        RequestKind::Man
    };
    if let Some(path) = &cli.roff {
        let roff = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        source = source.with_roff(roff);
    }

    let width = config.width.unwrap_or(DEFAULT_WIDTH);
    let mut session = Session::new(source, config, kind, &cli.title, (width, DEFAULT_HEIGHT))?;
    if let Some(message) = session.document().error() {
        eprintln!("manless: {message}");
        return Ok(ExitStatus::NotFound);
    }

    if let Some(needle) = &cli.search {
        if let Outcome::NotFound(message) = update(&mut session, Message::Search(needle.clone()))? {
            eprintln!("manless: {message}");
            return Ok(ExitStatus::NotFound);
        }
        for hit in session.results() {
            let text = session
                .document()
                .line_at(hit.line)
                .map_or("", |line| line.text());
            println!("{}:{}: {}", hit.line + 1, hit.start + 1, text.trim_end());
        }
        return Ok(ExitStatus::Success);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(session.document())
            .context("failed to serialize document")?;
        println!("{json}");
    } else if !cli.toc && !cli.links {
        for line in session.document().lines() {
            println!("{}", line.text().trim_end());
        }
    }

    if cli.toc {
        for entry in session.toc()? {
            let indent = match entry.kind {
                TocKind::Heading => "",
                TocKind::Subheading => "  ",
                TocKind::TaggedParagraph => "    ",
            };
            println!("{indent}{}", entry.text);
        }
    }

    if cli.links {
        for (i, line) in session.document().lines().iter().enumerate() {
            for link in line.links() {
                println!(
                    "{}:{}-{}: {:?} {}",
                    i + 1,
                    link.start + 1,
                    link.end,
                    link.link_type,
                    link.target
                );
            }
        }
    }

    Ok(ExitStatus::Success)
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let status = match run(&cli) {
        Ok(status) => status,
        Err(err) => {
            eprintln!("manless: {err:#}");
            err.downcast_ref::<Error>()
                .map_or(ExitStatus::OperError, Error::exit_status)
        }
    };
    ExitCode::from(u8::try_from(status.code()).unwrap_or(u8::MAX))
}
