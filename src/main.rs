// tentcard-pdf: Lay out folding name plates for printing

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tentcard_pdf::error::{AppError, Result};
use tentcard_pdf::metrics::BuiltinMetrics;
use tentcard_pdf::model::{AppConfig, NameEntry, Orientation, PaperSize};
use tentcard_pdf::names::{parse_bulk_text, to_bulk_text, NameList, SCALE_STEP};
use tentcard_pdf::plan::plan_layout;
use tentcard_pdf::render::{write_pdf, RenderOptions};
use tentcard_pdf::store::{JsonFileStore, Workspace};

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out tent-card name plates for printing")]
struct Args {
    /// Log layout decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the cards to a printable PDF
    Print {
        /// Names file: one "Name, Designation" per line, or a JSON array
        #[arg(short, long)]
        names: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Output filename (defaults to tentcards-{date}.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out the calibration bar on the first page
        #[arg(long)]
        no_guides: bool,
    },

    /// Print the page plan and font sizes as JSON
    Layout {
        /// Names file: one "Name, Designation" per line, or a JSON array
        #[arg(short, long)]
        names: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Include ruler ticks for every page
        #[arg(long)]
        rulers: bool,
    },

    /// Edit the stored current name list
    Names {
        /// Directory holding per-user data
        #[arg(long)]
        store: PathBuf,

        /// User id
        #[arg(short, long)]
        user: String,

        #[command(subcommand)]
        action: NamesAction,
    },

    /// Manage saved nameplates
    History {
        /// Directory holding per-user data
        #[arg(long)]
        store: PathBuf,

        /// User id
        #[arg(short, long)]
        user: String,

        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum NamesAction {
    /// Print the list with ids and scales
    Show,

    /// Replace the list with a names file
    Import { file: PathBuf },

    /// Append one card
    Add {
        line1: String,

        /// Designation or company
        line2: Option<String>,
    },

    /// Remove one card by id
    Remove { id: String },

    /// Grow or shrink one card by whole 0.1 steps (manual mode)
    Scale {
        id: String,

        #[arg(allow_negative_numbers = true)]
        steps: i32,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List saved nameplates, newest first
    List,

    /// Save names and style under a name
    Save {
        /// Label for this snapshot
        name: String,

        #[arg(short, long)]
        names: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Make a saved nameplate current, optionally printing it
    Restore {
        id: String,

        /// Write the restored cards to this PDF
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove a saved nameplate
    Delete { id: String },
}

/// Style configuration: a JSON file plus individual overrides
#[derive(clap::Args, Debug)]
struct StyleArgs {
    /// Style configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    paper: Option<PaperSize>,

    #[arg(long, value_enum)]
    orientation: Option<Orientation>,

    /// Card width in cm
    #[arg(long)]
    width: Option<f64>,

    /// Height of one half of the folded card in cm
    #[arg(long)]
    height: Option<f64>,

    /// Size text to fill each card
    #[arg(long, conflicts_with = "manual")]
    auto_fit: bool,

    /// Use the base font size and per-name scales
    #[arg(long)]
    manual: bool,

    /// Base font size in points (manual mode)
    #[arg(long)]
    font_size: Option<f64>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Print {
            names,
            style,
            output,
            no_guides,
        } => {
            let config = load_config(&style)?;
            let names = load_names(&names)?;
            let output = output.unwrap_or_else(default_output);
            print_cards(&config, &names, &output, !no_guides)
        }
        Command::Layout { names, style, rulers } => {
            let config = load_config(&style)?;
            let names = load_names(&names)?;
            let plan = plan_layout(&config, &names, &BuiltinMetrics, rulers);
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Command::Names { store, user, action } => {
            let store = JsonFileStore::new(store);
            let workspace = Workspace::new(&store, user);
            run_names(&workspace, action)
        }
        Command::History { store, user, action } => {
            let store = JsonFileStore::new(store);
            let workspace = Workspace::new(&store, user);
            run_history(&workspace, action)
        }
    }
}

fn run_names(workspace: &Workspace<'_, JsonFileStore>, action: NamesAction) -> Result<()> {
    let data = workspace.load()?;
    let config = data.current_config;
    let mut list = NameList::new(data.current_names);

    match action {
        NamesAction::Show => {
            if list.is_empty() {
                println!("No names");
            }
            for entry in list.entries() {
                println!(
                    "{}  x{:.1}  {}",
                    entry.id,
                    entry.effective_scale(),
                    to_bulk_text(std::slice::from_ref(entry))
                );
            }
            return Ok(());
        }
        NamesAction::Import { file } => {
            let names = load_names(&file)?;
            list = NameList::new(names);
            println!("✓ Imported: {} names", list.len());
        }
        NamesAction::Add { line1, line2 } => {
            let entry = list
                .add_manual(&line1, line2.as_deref().unwrap_or(""))
                .ok_or_else(|| AppError::NamesError("name cannot be blank".to_string()))?;
            println!("✓ Added: {}", entry.id);
        }
        NamesAction::Remove { id } => {
            list.remove(&id).ok_or_else(|| missing_entry(&id))?;
            println!("✓ Removed: {}", id);
        }
        NamesAction::Scale { id, steps } => {
            let scale = list
                .adjust_scale(&id, f64::from(steps) * SCALE_STEP)
                .ok_or_else(|| missing_entry(&id))?;
            println!("✓ Scale: {} x{:.1}", id, scale);
        }
    }

    workspace.save_current(&config, &list.into_entries())
}

fn missing_entry(id: &str) -> AppError {
    AppError::NamesError(format!("no entry with id {}", id))
}

fn run_history(workspace: &Workspace<'_, JsonFileStore>, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List => {
            let history = workspace.history()?;
            if history.is_empty() {
                println!("No saved nameplates");
            }
            for saved in history {
                println!(
                    "{}  {}  {}  ({} names)",
                    saved.id,
                    saved.saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    saved.name,
                    saved.names.len()
                );
            }
            Ok(())
        }
        HistoryAction::Save { name, names, style } => {
            let config = load_config(&style)?;
            let names = load_names(&names)?;
            let saved = workspace.save_to_history(&name, &config, &names)?;
            println!("✓ Saved: {}", saved.name);
            println!("  ID: {}", saved.id);
            println!("  Names: {}", saved.names.len());
            Ok(())
        }
        HistoryAction::Restore { id, output } => {
            let (config, names) = workspace.restore(&id)?;
            workspace.save_current(&config, &names)?;
            println!("✓ Restored: {}", id);
            println!("{}", to_bulk_text(&names));
            match output {
                Some(path) => print_cards(&config, &names, &path, true),
                None => Ok(()),
            }
        }
        HistoryAction::Delete { id } => {
            workspace.delete(&id)?;
            println!("✓ Deleted: {}", id);
            Ok(())
        }
    }
}

fn print_cards(config: &AppConfig, names: &[NameEntry], output: &Path, guides: bool) -> Result<()> {
    let summary = write_pdf(config, names, RenderOptions { calibration_bar: guides }, output)?;

    println!("✓ Generated: {}", output.display());
    println!("  Paper: {:?} {:?}", config.paper_size, config.orientation);
    println!("  Pages: {}", summary.pages);
    println!("  Cards: {}", summary.cards);
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn default_output() -> PathBuf {
    PathBuf::from(format!("tentcards-{}.pdf", Local::now().format("%Y-%m-%d")))
}

fn load_config(style: &StyleArgs) -> Result<AppConfig> {
    let mut config = match &style.config {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|e| AppError::ConfigError(format!("{}: {}", p.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| AppError::ConfigError(format!("{}: {}", p.display(), e)))?
        }
        None => AppConfig::default(),
    };

    if let Some(paper) = style.paper {
        config.paper_size = paper;
    }
    if let Some(orientation) = style.orientation {
        config.orientation = orientation;
    }
    if let Some(width) = style.width {
        config.plate_width_cm = width;
    }
    if let Some(height) = style.height {
        config.plate_height_cm = height;
    }
    if let Some(size) = style.font_size {
        config.font_size = size;
    }
    if style.auto_fit {
        config.auto_fit = true;
    }
    if style.manual {
        config.auto_fit = false;
    }

    let config = config.sanitized();
    debug!(?config, "configuration resolved");
    Ok(config)
}

/// Plain text goes through the bulk parser; `.json` files hold saved entries.
fn load_names(path: &Path) -> Result<Vec<NameEntry>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::NamesError(format!("{}: {}", path.display(), e)))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        serde_json::from_str(&content)
            .map_err(|e| AppError::NamesError(format!("Invalid JSON: {}", e)))
    } else {
        Ok(parse_bulk_text(&content))
    }
}
