//! jotdb CLI
//!
//! Command-line interface for inspecting and editing a journal of JSON
//! documents. Every document must be a JSON object; its `id` field is the
//! record identifier.

use std::path::Path;

use clap::{Parser, Subcommand};
use jotdb::journal::JournalRecovery;
use jotdb::{Config, JournalSyncStrategy, JsonCodec, Record, RecordId, Store};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// jotdb CLI
#[derive(Parser, Debug)]
#[command(name = "jotdb")]
#[command(about = "Inspect and edit a jotdb journal of JSON documents")]
#[command(version)]
struct Args {
    /// Journal file
    #[arg(short, long, default_value = "./records.jnl")]
    journal: String,

    /// Leave the journal uncompacted when the command finishes
    #[arg(long)]
    no_compact: bool,

    /// fsync after this many appends
    #[arg(long, default_value = "1")]
    sync_every: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every live document
    List,

    /// Print one document
    Get {
        /// Document id
        id: RecordId,
    },

    /// Add a document and print its new id
    Add {
        /// JSON object, e.g. '{"value":"a"}'
        json: String,
    },

    /// Replace the document stored under an id
    Update {
        /// Document id
        id: RecordId,

        /// JSON object replacing the current document
        json: String,
    },

    /// Delete a document
    Delete {
        /// Document id
        id: RecordId,
    },

    /// Rewrite the journal down to the live documents
    Compact,

    /// Replay the journal without modifying it and print statistics
    Verify,
}

/// A schemaless JSON object with an `id` field
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    id: RecordId,

    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record for Document {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,jotdb=debug";

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn verify(journal: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = JournalRecovery::verify::<Document, _>(journal, &JsonCodec)?;
    println!("entries applied: {}", result.entries_applied);
    println!("entries skipped: {}", result.entries_skipped);
    println!("live records:    {}", result.live_records);
    println!("next id:         {}", result.next_id);
    match result.stopped_at {
        Some(stop) => {
            println!("stopped at line {}: {}", stop.line, stop.reason);
            println!("lines dropped:   {}", result.lines_dropped);
        }
        None => println!("journal is clean"),
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Verify = args.command {
        return verify(Path::new(&args.journal));
    }

    let config = Config::builder()
        .journal_path(&args.journal)
        .sync_strategy(JournalSyncStrategy::EveryNEntries {
            count: args.sync_every,
        })
        .compact_on_close(!args.no_compact)
        .build();
    let mut store: Store<Document> = Store::open(config, JsonCodec)?;

    match args.command {
        Commands::List => {
            let mut out = Vec::new();
            store.for_each(|doc| out.push(serde_json::to_string(doc)));
            for line in out {
                println!("{}", line?);
            }
        }
        Commands::Get { id } => match store.get(id) {
            Some(doc) => println!("{}", serde_json::to_string(doc)?),
            None => return Err(format!("no document with id {}", id).into()),
        },
        Commands::Add { json } => {
            let doc: Document = serde_json::from_str(&json)?;
            if let Some(id) = store.add(doc)? {
                println!("{}", id);
            }
        }
        Commands::Update { id, json } => {
            if !store.contains(id) {
                return Err(format!("no document with id {}", id).into());
            }
            let mut doc: Document = serde_json::from_str(&json)?;
            doc.set_id(id);
            store.update(doc)?;
        }
        Commands::Delete { id } => {
            if !store.contains(id) {
                return Err(format!("no document with id {}", id).into());
            }
            store.delete_by_id(id)?;
        }
        Commands::Compact => {
            if let Some(count) = store.compact()? {
                println!("compacted to {} entries", count);
            }
        }
        Commands::Verify => {}
    }

    store.close()?;
    Ok(())
}
