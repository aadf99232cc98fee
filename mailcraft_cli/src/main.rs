mod workfile;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mailcraft_core::render::PaletteItem;
use mailcraft_core::schema::{self, Control};
use mailcraft_core::{
    Builder, BuilderConfig, ElementId, ElementKind, FileTemplateStore, OutboxSender, PropertyValue, TemplateId,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use workfile::WorkingFile;

const DEFAULT_CONFIG: &str = "mailcraft.toml";

#[derive(Debug, Parser)]
#[command(name = "mailcraft", version, about = "Build table-based email templates from the terminal")]
struct Cli {
    /// Working template file
    #[arg(long, global = true, default_value = "template.json")]
    file: PathBuf,

    /// Configuration file (defaults to ./mailcraft.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the element kinds that can be inserted
    Palette,
    /// Insert a new element
    Insert {
        /// text, button, image or group
        kind: ElementKind,
        /// Group to append to; anything else places the element at the top level
        #[arg(long)]
        parent: Option<ElementId>,
    },
    /// Select an element, or clear the selection when no id is given
    Select { id: Option<ElementId> },
    /// Delete an element and everything inside it (defaults to the selection)
    Delete { id: Option<ElementId> },
    /// Set one property of an element
    Set {
        id: ElementId,
        property: String,
        value: String,
    },
    /// Remove every element
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the editing canvas
    Preview {
        /// Print the canvas markup instead of an outline
        #[arg(long)]
        html: bool,
    },
    /// Show the property panel for the selection
    Panel {
        #[arg(long)]
        html: bool,
    },
    /// Write the email-ready HTML
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Save the working file as a named template
    Save { name: String },
    /// List saved templates
    Templates,
    /// Replace the working file with a saved template
    Load { id: TemplateId },
    /// Delete a saved template
    RemoveTemplate {
        id: TemplateId,
        #[arg(long)]
        yes: bool,
    },
    /// Send the exported template
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
    },
    /// List sent emails
    History,
}

impl Commands {
    /// Whether the command can change the working file
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Insert { .. }
                | Commands::Select { .. }
                | Commands::Delete { .. }
                | Commands::Set { .. }
                | Commands::Clear { .. }
                | Commands::Save { .. }
                | Commands::Load { .. }
                | Commands::RemoveTemplate { .. }
        )
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<BuilderConfig> {
    match path {
        Some(path) => BuilderConfig::from_file(path).with_context(|| format!("loading {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            BuilderConfig::from_file(DEFAULT_CONFIG).with_context(|| format!("loading {}", DEFAULT_CONFIG))
        }
        None => Ok(BuilderConfig::default()),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut builder = WorkingFile::read(&cli.file)?.into_builder(config.clone());
    let store = FileTemplateStore::new(&config.storage.templates_dir);
    let outbox = OutboxSender::new(&config.storage.outbox_dir);
    let mutates = cli.command.mutates();

    match cli.command {
        Commands::Palette => {
            for item in PaletteItem::all() {
                println!("{} {:<8} {}", item.icon, item.kind, item.label);
            }
        }
        Commands::Insert { kind, parent } => {
            let id = builder.insert(kind, parent.as_ref());
            println!("{}", id);
        }
        Commands::Select { id } => {
            builder.select(id);
            print!("{}", builder.panel().describe());
        }
        Commands::Delete { id } => {
            let removed = match id {
                Some(id) => builder.delete(&id),
                None => builder.delete_selected(),
            };
            if removed.is_empty() {
                bail!("nothing to delete");
            }
            println!("Deleted {} element(s)", removed.len());
        }
        Commands::Set { id, property, value } => {
            let kind = builder
                .document()
                .get(&id)
                .map(|e| e.kind)
                .with_context(|| format!("no element {}", id))?;
            builder.update_property(&id, &property, parse_value(kind, &property, value))?;
        }
        Commands::Clear { yes } => {
            let cleared = builder.clear(|count| yes || confirm(&format!("Clear {} element(s) from the canvas?", count)));
            if !cleared {
                println!("Nothing cleared");
            }
        }
        Commands::Preview { html } => {
            let view = builder.render_interactive()?;
            if html {
                println!("{}", view.to_html());
            } else {
                print!("{}", view.outline());
            }
        }
        Commands::Panel { html } => {
            if html {
                println!("{}", builder.panel().to_html());
            } else {
                print!("{}", builder.panel().describe());
            }
        }
        Commands::Export { out } => {
            let html = builder.render_export()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &html).with_context(|| format!("writing {}", path.display()))?;
                    info!("Exported {} bytes to {:?}", html.len(), path);
                }
                None => print!("{}", html),
            }
        }
        Commands::Save { name } => {
            let id = builder.save_template(&store, &name).await?;
            println!("Saved template {}", id);
        }
        Commands::Templates => {
            let templates = builder.list_templates(&store).await?;
            if templates.is_empty() {
                println!("No templates saved yet.");
            }
            for summary in templates {
                let marker = if builder.current_template() == Some(&summary.id) { "*" } else { " " };
                println!("{} {}", marker, summary);
            }
        }
        Commands::Load { id } => {
            builder.load_template(&store, &id).await?;
            println!("Loaded template {} ({} elements)", id, builder.document().len());
        }
        Commands::RemoveTemplate { id, yes } => {
            let deleted = builder
                .delete_template(&store, &id, |id| yes || confirm(&format!("Delete template {}?", id)))
                .await?;
            if deleted {
                println!("Deleted template {}", id);
            }
        }
        Commands::Send { to, subject } => {
            let receipt = builder.send_email(&outbox, &to, &subject).await?;
            println!("Queued message {} at {}", receipt.message_id, receipt.sent_at.to_rfc3339());
        }
        Commands::History => {
            let sent = outbox.history().await?;
            if sent.is_empty() {
                println!("No emails sent yet.");
            }
            for email in sent {
                println!(
                    "{}  {}  {:<30} {}",
                    email.created_at.format("%Y-%m-%d %H:%M"),
                    email.status,
                    email.to,
                    email.subject
                );
            }
        }
    }

    if mutates {
        WorkingFile::from_builder(&builder).write(&cli.file)?;
    }
    debug!(revision = builder.journal().revision(), "done");
    Ok(())
}

/// Checkbox properties take `true`/`false` style words; everything else is
/// stored as typed
fn parse_value(kind: ElementKind, property: &str, raw: String) -> PropertyValue {
    let is_flag = schema::lookup(kind, property)
        .map(|spec| spec.control == Control::Checkbox)
        .unwrap_or(false);
    if is_flag {
        if let Some(flag) = PropertyValue::from(raw.as_str()).as_flag() {
            return PropertyValue::Flag(flag);
        }
    }
    PropertyValue::Text(raw)
}

fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
