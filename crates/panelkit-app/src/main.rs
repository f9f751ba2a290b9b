//! PanelKit command-line host.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use kurbo::Size;
use panelkit_app::{ShortcutRegistry, catalog_report, class_report, tree_report};
use panelkit_core::registry::CONTAINER_CLASS;
use panelkit_core::storage::{FileStorage, Storage};
use panelkit_core::{Document, EditController, EditorConfig, ViewRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inspect and create PanelKit documents
#[derive(Parser)]
#[command(name = "panelkit")]
#[command(about = "Command-line host for PanelKit control panels")]
struct Cli {
    /// Editor settings as JSON (default: built-in settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a document's view tree with every attribute read back
    Inspect {
        /// Document JSON file
        path: PathBuf,
    },

    /// Write an empty document with a single root view
    New {
        /// Output file
        path: PathBuf,
        #[arg(short, long, default_value = "Untitled")]
        name: String,
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        #[arg(long, default_value_t = 300.0)]
        height: f64,
        /// Root view class
        #[arg(long, default_value = CONTAINER_CLASS)]
        class: String,
    },

    /// List registered view classes
    Classes {
        /// Also list each class's attributes
        #[arg(short, long)]
        attributes: bool,
    },

    /// List documents in a storage directory
    Documents {
        /// Storage directory (default: the platform data directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// List editor keyboard shortcuts
    Shortcuts,

    /// Print the effective editor settings as JSON
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let registry = Arc::new(ViewRegistry::with_builtins());

    match cli.command {
        Commands::Inspect { path } => inspect(registry, &path, config),
        Commands::New {
            path,
            name,
            width,
            height,
            class,
        } => new_document(registry, &path, &name, Size::new(width, height), &class, config),
        Commands::Classes { attributes } => {
            print!("{}", class_report(&registry, attributes));
            Ok(())
        }
        Commands::Documents { dir } => list_documents(dir),
        Commands::Shortcuts => {
            ShortcutRegistry::print_all();
            Ok(())
        }
        Commands::Config => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = EditorConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::info!("Loaded editor settings from {}", path.display());
    Ok(config)
}

fn inspect(registry: Arc<ViewRegistry>, path: &Path, config: EditorConfig) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = Document::from_json(&json).context("Not a PanelKit document")?;
    let editor = EditController::from_document(registry, &document, config)?;

    println!("{} ({} views)", document.name, editor.tree().len());
    print!("{}", catalog_report(editor.catalog()));
    print!("{}", tree_report(&editor));
    Ok(())
}

fn new_document(
    registry: Arc<ViewRegistry>,
    path: &Path,
    name: &str,
    size: Size,
    class: &str,
    config: EditorConfig,
) -> Result<()> {
    if !registry.is_container(class) {
        bail!("'{}' is not a container class", class);
    }
    let Some(editor) = EditController::with_root(registry, class, size, config) else {
        bail!("Unknown view class '{}'", class);
    };
    let document = editor.to_document(name);
    std::fs::write(path, document.to_json()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {} ({})", path.display(), document.id);
    Ok(())
}

fn list_documents(dir: Option<PathBuf>) -> Result<()> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    let ids = pollster::block_on(storage.list())?;
    if ids.is_empty() {
        println!("No documents in {}", storage.base_path().display());
        return Ok(());
    }
    println!("Documents in {}:", storage.base_path().display());
    for id in ids {
        match pollster::block_on(storage.load(&id)) {
            Ok(document) => println!("  {}  {}", id, document.name),
            Err(e) => println!("  {}  (unreadable: {})", id, e),
        }
    }
    Ok(())
}
