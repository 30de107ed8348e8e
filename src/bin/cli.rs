//! walstore CLI
//!
//! Inspect and maintain a store of JSON documents from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use walstore::wal::WalRecovery;
use walstore::{Document, RecordId, Store, StoreConfig, StoreError};

/// walstore CLI
#[derive(Parser, Debug)]
#[command(name = "walstore-cli")]
#[command(about = "Inspect and maintain a walstore snapshot/journal pair")]
#[command(version)]
struct Args {
    /// Base path of the store (the journal is `<path>.wal`)
    #[arg(short, long)]
    path: PathBuf,

    /// Writes between automatic compactions
    #[arg(short, long, default_value = "100")]
    threshold: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show record count and journal statistics
    Stats,

    /// Scan the journal and report malformed lines
    Verify,

    /// Fold the journal into the snapshot
    Compact,

    /// Print one document
    Get {
        /// The id to look up
        id: RecordId,
    },

    /// Print documents in ascending id order
    List {
        /// Documents to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Maximum documents to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Insert or replace a document given as JSON (must contain "id")
    Put {
        /// The document, e.g. '{"id":1,"name":"Alice"}'
        json: String,
    },

    /// Delete a document
    Delete {
        /// The id to delete
        id: RecordId,
    },

    /// Remove every document
    Clear,
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,walstore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), StoreError> {
    let config = StoreConfig::builder()
        .base_path(&args.path)
        .compact_threshold(args.threshold)
        .build();
    let mut store = Store::<Document>::open(config)?;

    match args.command {
        Commands::Stats => {
            let count = store.count()?;
            println!("snapshot:            {}", store.snapshot_path().display());
            println!("journal:             {}", store.wal_path().display());
            println!("records:             {}", count);
            println!("pending operations:  {}", store.operations_since_compact());
            if let Some(recovery) = store.last_recovery() {
                println!("skipped entries:     {}", recovery.entries_corrupted);
                println!("torn tail repaired:  {}", recovery.was_truncated);
            }
        }
        Commands::Verify => {
            let result = WalRecovery::verify::<Document>(store.wal_path())?;
            println!("valid entries:       {}", result.entries_recovered);
            println!("malformed entries:   {}", result.entries_corrupted);
            match result.last_timestamp {
                Some(ts) => println!("last timestamp:      {}", ts),
                None => println!("last timestamp:      -"),
            }
            if !result.is_clean() {
                return Err(StoreError::Format(format!(
                    "{} malformed journal entries",
                    result.entries_corrupted
                )));
            }
        }
        Commands::Compact => {
            let stats = store.force_compact()?;
            println!(
                "compacted {} operations into {} records",
                stats.operations_folded, stats.records_written
            );
        }
        Commands::Get { id } => {
            let doc = store.load_by_id(id)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Commands::List { offset, limit } => {
            for doc in store.load_range(offset, limit)? {
                println!("{}", serde_json::to_string(&doc)?);
            }
        }
        Commands::Put { json } => {
            let doc: Document = serde_json::from_str(&json)?;
            let id = doc.id;
            store.insert(doc)?;
            println!("stored {}", id);
        }
        Commands::Delete { id } => {
            store.delete(id)?;
            println!("deleted {}", id);
        }
        Commands::Clear => {
            store.clear()?;
            println!("cleared");
        }
    }

    store.close()
}
