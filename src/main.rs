use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokensnap::{
    Config,
    export::{
        Artifact, ArtifactDestination, ExportAction, ExportConfig, ExportManager, FileSaveConfig,
        LayoutMode,
    },
    records::{self, TokenizeResponse},
    scene::{self, RenderTree},
    views::{ExportableView, TokenSequenceView, VariantCardView},
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TOKENSNAP_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "tokensnap")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Export token and variant visualizations as PNG or PDF artifacts"
)]
struct Cli {
    /// Read settings from this file instead of ~/.config/tokensnap/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a tokenized text (tokenize response JSON) as a chip sequence
    Chips {
        /// Tokenize response JSON file
        input: PathBuf,

        /// Show token ids next to each chip
        #[arg(long)]
        show_ids: bool,

        #[command(flatten)]
        export: ExportArgs,
    },
    /// Export one variant card (multiplicity group or page JSON)
    Card {
        /// Multiplicity group or multiplicity page JSON file
        input: PathBuf,

        /// Which group of a page to export
        #[arg(long, default_value_t = 0, value_name = "N")]
        index: usize,

        #[command(flatten)]
        export: ExportArgs,
    },
}

impl Command {
    fn export_args(&self) -> &ExportArgs {
        match self {
            Command::Chips { export, .. } | Command::Card { export, .. } => export,
        }
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ActionArgs {
    /// Copy a PNG to the clipboard
    #[arg(long)]
    copy: bool,

    /// Save a single-page PDF named tokens.pdf
    #[arg(long)]
    pdf: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    action: ActionArgs,

    /// Stack this label above the exported content
    #[arg(long, value_name = "TEXT")]
    label: Option<String>,

    /// Target text size in pixels (8-48)
    #[arg(long, value_name = "PX")]
    font_size: Option<u32>,

    /// Size chip sequences to their content instead of the 720px reference width
    #[arg(long)]
    tight: bool,

    /// Directory to save tokens.pdf into
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

impl ExportArgs {
    fn action(&self) -> ExportAction {
        if self.action.copy {
            ExportAction::Clipboard
        } else {
            ExportAction::Document
        }
    }

    /// Applies command-line overrides on top of the configured defaults.
    fn export_config(&self, base: ExportConfig) -> ExportConfig {
        let layout = if self.tight {
            LayoutMode::Tight
        } else {
            base.layout_mode()
        };
        let config = ExportConfig::new(self.font_size.unwrap_or(base.font_size_px())).with_layout(layout);

        let label = match self.label.as_deref() {
            Some(label) => Some(label),
            None if base.include_label() => Some(base.label()),
            None => None,
        };
        match label.filter(|label| !label.is_empty()) {
            Some(label) => config.with_label(label),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let artifact = runtime.block_on(run(cli.command, config))?;
    match &artifact.destination {
        ArtifactDestination::Clipboard => {
            println!("Copied {} byte PNG to the clipboard", artifact.payload.len());
        }
        ArtifactDestination::File(path) => {
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

async fn run(command: Command, config: Config) -> Result<Artifact> {
    let args = command.export_args();
    let mut settings = config.export_settings();
    if let Some(directory) = &args.out_dir {
        settings.save_config = FileSaveConfig::in_directory(directory.clone());
    }
    let export_config = args.export_config(config.export_config());
    let action = args.action();
    log::debug!("Export config: {:?}, action: {:?}", export_config, action);

    let manager = ExportManager::new(&tokio::runtime::Handle::current(), settings);
    let tree = scene::shared(RenderTree::new());

    match &command {
        Command::Chips {
            input, show_ids, ..
        } => {
            let response: TokenizeResponse = serde_json::from_str(&read_input(input)?)
                .with_context(|| format!("Failed to parse tokenize response {}", input.display()))?;
            let view = TokenSequenceView::build(&tree, &response, *show_ids, manager);
            export_view(&view, export_config, action).await
        }
        Command::Card { input, index, .. } => {
            let groups = records::parse_groups(&read_input(input)?)
                .with_context(|| format!("Failed to parse multiplicity groups {}", input.display()))?;
            let group = groups.get(*index).with_context(|| {
                format!("No group at index {} ({} available)", index, groups.len())
            })?;
            let view = VariantCardView::build(&tree, group, manager);
            export_view(&view, export_config, action).await
        }
    }
}

async fn export_view<V: ExportableView>(view: &V, config: ExportConfig, action: ExportAction) -> Result<Artifact> {
    let ticket = view
        .export(config, action)
        .context("An export is already in progress")?;
    ticket.await.context("Export failed")
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
