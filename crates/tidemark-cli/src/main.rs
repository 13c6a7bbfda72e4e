//! tidemark CLI: Mount timelines on page fixtures and inspect the result

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tidemark_engine::{
    load_options, load_script, DomAdapter, FixtureError, HeadlessDom, PageFixture,
    TimelineOptions, TimelineWidget,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Headless runner for tidemark timelines
#[derive(Parser)]
#[command(name = "tidemark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount every timeline on a page and print the settled document
    Render {
        /// Page fixture (JSON)
        page: PathBuf,

        /// Caller options (JSON object)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Virtual time to let pass after mounting, in milliseconds
        #[arg(long, default_value = "1000")]
        settle_ms: u64,
    },

    /// Print the resolved settings and state of each container
    Settings {
        /// Page fixture (JSON)
        page: PathBuf,

        /// Caller options (JSON object)
        #[arg(long)]
        options: Option<PathBuf>,
    },

    /// Mount, then play an interaction script and print the document
    Replay {
        /// Page fixture (JSON)
        page: PathBuf,

        /// Interaction script (JSON array of steps)
        #[arg(long)]
        script: PathBuf,

        /// Caller options (JSON object)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log filter used when `TIDEMARK_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    let filter = EnvFilter::try_from_env("TIDEMARK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render {
            page,
            options,
            json,
            settle_ms,
        } => cmd_render(&page, options.as_deref(), json, settle_ms),
        Commands::Settings { page, options } => cmd_settings(&page, options.as_deref()),
        Commands::Replay {
            page,
            script,
            options,
            json,
        } => cmd_replay(&page, &script, options.as_deref(), json),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

type Widget = TimelineWidget<HeadlessDom>;

fn mount(page: &PageFixture, options: Option<&Path>) -> Result<Widget, FixtureError> {
    let options = match options {
        Some(path) => load_options(path)?,
        None => TimelineOptions::new(),
    };
    Ok(TimelineWidget::mount_page(page, &options))
}

fn print_document(widget: &Widget, json: bool) -> Result<String, FixtureError> {
    let dom = widget.dom();
    if json {
        serde_json::to_string_pretty(&dom.snapshot(dom.root())).map_err(FixtureError::Serialize)
    } else {
        Ok(dom.render(dom.root()))
    }
}

fn cmd_render(
    page: &Path,
    options: Option<&Path>,
    json: bool,
    settle_ms: u64,
) -> Result<String, FixtureError> {
    let mut widget = mount(&PageFixture::load(page)?, options)?;
    widget.advance(Duration::from_millis(settle_ms));
    print_document(&widget, json)
}

fn cmd_settings(page: &Path, options: Option<&Path>) -> Result<String, FixtureError> {
    let fixture = PageFixture::load(page)?;
    let widget = mount(&fixture, options)?;
    let dom = widget.dom();

    let report = dom
        .query_selector_all(dom.root(), &fixture.containers)
        .into_iter()
        .map(|container| -> Result<serde_json::Value, serde_json::Error> {
            let mut entry = serde_json::json!({
                "container": dom.describe(container),
                "state": widget.state_of(container),
            });
            if let Some(instance) = widget.instance_for(container) {
                entry["items"] = instance.items().len().into();
                entry["settings"] = serde_json::to_value(instance.settings())?;
            }
            Ok(entry)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(FixtureError::Serialize)?;

    serde_json::to_string_pretty(&report).map_err(FixtureError::Serialize)
}

fn cmd_replay(
    page: &Path,
    script: &Path,
    options: Option<&Path>,
    json: bool,
) -> Result<String, FixtureError> {
    let steps = load_script(script)?;
    let mut widget = mount(&PageFixture::load(page)?, options)?;
    for step in &steps {
        widget.run_step(step)?;
    }
    print_document(&widget, json)
}
