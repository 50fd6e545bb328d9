//! Page Assist REPL
//!
//! Interactive console front end: type requests against a demo component
//! and see how they are classified, routed and applied.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use page_assist::dispatch::{ChangesetPreview, UndoHandle};
use page_assist::schema::{JsonSchemaSource, SchemaSource};
use page_assist::services::{ChatSurface, InMemoryHost, MemorySnapshotStore, MessageKind};
use page_assist::{Assistant, ConfigManager, DispatchOutcome, IntentClassifier, SchemaIndex};

const DEMO_SCHEMAS: &str = include_str!("../demos/schemas.json");
const DEMO_COMPONENT: &str = "demo-text-1";

/// Chat surface printing to the terminal
#[derive(Default)]
struct ConsoleChat {
    undo: Mutex<Option<UndoHandle>>,
}

impl ConsoleChat {
    fn last_undo(&self) -> Option<UndoHandle> {
        self.undo.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl ChatSurface for ConsoleChat {
    fn add_message(&self, text: &str, kind: MessageKind) {
        let prefix = match kind {
            MessageKind::User => "🧑",
            MessageKind::Assistant => "🤖",
            MessageKind::Info => "💡",
            MessageKind::Success => "✅",
            MessageKind::Error => "❌",
        };
        println!("{} {}\n", prefix, text);
    }

    fn show_typing(&self) {
        println!("⚙️  Thinking...");
    }

    fn remove_typing(&self) {}

    fn append_undo_button(&self, undo: UndoHandle) {
        println!("↩️  Type 'undo' to revert.\n");
        *self.undo.lock().unwrap_or_else(|p| p.into_inner()) = Some(undo);
    }

    async fn confirm_changeset(&self, preview: &ChangesetPreview) -> bool {
        println!("📝 Proposed changes:\n{}", preview.render());
        print!("Apply? [y/N]: ");
        let _ = io::stdout().flush();

        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;
        matches!(answer, Ok(Ok(line)) if line.trim().eq_ignore_ascii_case("y"))
    }
}

async fn load_index(schemas_path: Option<std::path::PathBuf>) -> Result<SchemaIndex> {
    let schemas = match schemas_path {
        Some(path) => JsonSchemaSource::new(path).all_schemas().await?,
        None => JsonSchemaSource::parse(DEMO_SCHEMAS).context("built-in demo schemas")?,
    };
    Ok(SchemaIndex::from_raw(schemas))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .init();

    println!("\n{}", "═".repeat(60));
    println!("🧭 Page Assist v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "═".repeat(60));

    let config = ConfigManager::from_env().load().await?;
    let index = Arc::new(load_index(config.resolve_schemas_path()).await?);
    info!("Loaded {} component schemas", index.len());

    let host = Arc::new(InMemoryHost::new());
    host.insert_component(
        DEMO_COMPONENT,
        "et_pb_text",
        json!({
            "content": "<p>Welcome to our site</p>",
            "text_orientation": "left",
            "text_font_size": "14px"
        })
        .as_object()
        .cloned()
        .unwrap_or_default(),
    );
    host.select(Some(DEMO_COMPONENT));

    let chat = Arc::new(ConsoleChat::default());
    let assistant = Assistant::new(IntentClassifier::new(index), host.clone(), chat.clone())
        .with_snapshots(Arc::new(MemorySnapshotStore::new(config.snapshot_history)));
    assistant.track_selection();

    println!("Selected: {} (et_pb_text)", DEMO_COMPONENT);
    println!("\n💡 Commands: 'quit' | 'undo' | 'show' | ':intent <text>'\n");

    loop {
        print!("🧑 You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let query = input.trim();
        if query.is_empty() {
            continue;
        }

        match query.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("\n👋 Goodbye!\n");
                break;
            }
            "undo" => {
                match chat.last_undo() {
                    Some(undo) if undo.is_enabled() => match undo.undo().await {
                        Ok(()) => println!("↩️  {}\n", undo.button_label()),
                        Err(e) => println!("❌ {}\n", e.user_message()),
                    },
                    Some(undo) => println!("↩️  {}\n", undo.button_label()),
                    None => println!("Nothing to undo.\n"),
                }
                continue;
            }
            "show" => {
                if let Some(component) = host.component(DEMO_COMPONENT) {
                    println!("{}\n", serde_json::to_string_pretty(&component.data)?);
                }
                continue;
            }
            _ => {}
        }

        if let Some(text) = query.strip_prefix(":intent ") {
            let intent = assistant.classify(text);
            println!("{}\n", serde_json::to_string_pretty(&intent)?);
            continue;
        }

        match assistant.handle(query).await {
            DispatchOutcome::Guided { plan, .. } => {
                println!("📊 Guidance:");
                for (i, step) in plan.steps.iter().enumerate() {
                    println!("   {}. {}", i + 1, serde_json::to_string(step)?);
                }
                println!();
            }
            DispatchOutcome::AppliedLocally { undo_offered, .. } => {
                info!("Applied locally (undo offered: {})", undo_offered);
            }
            other => info!("Outcome: {:?}", other),
        }
    }

    Ok(())
}
