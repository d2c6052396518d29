//! kvdoc CLI Client
//!
//! Command-line interface for managing documents in a store.

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kvdoc::config::{parse_port, ENV_HOST, ENV_PASSWORD, ENV_PORT};
use kvdoc::{Deadline, Document, DocumentStore, KvDocError, StoreConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// kvdoc CLI
#[derive(Parser, Debug)]
#[command(name = "kvdoc-cli")]
#[command(about = "CLI for documents stored in a Redis-compatible server")]
#[command(version)]
struct Args {
    /// Store host
    #[arg(long, env = ENV_HOST, default_value = "127.0.0.1")]
    host: String,

    /// Store port
    #[arg(short, long, env = ENV_PORT, default_value = "6379", value_parser = parse_port)]
    port: u16,

    /// Store password (omit for none)
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    password: Option<String>,

    /// Deadline for the operation in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a new document
    Create {
        id: String,
        name: String,
        value: String,
    },

    /// Print a document by id
    Read {
        id: String,
    },

    /// Overwrite a document
    Update {
        id: String,
        name: String,
        value: String,
    },

    /// Delete a document by id
    Delete {
        id: String,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = StoreConfig::builder(&args.host, args.port);
    if let Some(password) = &args.password {
        builder = builder.credential(password);
    }
    let store = DocumentStore::connect(builder.build());

    let deadline = if args.timeout_ms == 0 {
        Deadline::none()
    } else {
        Deadline::after(Duration::from_millis(args.timeout_ms))
    };

    if let Err(e) = run(&store, args.command, deadline) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(store: &DocumentStore, command: Commands, deadline: Deadline) -> Result<(), KvDocError> {
    match command {
        Commands::Create { id, name, value } => {
            store.create(&Document::new(id, name, value), deadline)?;
            println!("OK");
        }
        Commands::Read { id } => {
            let doc = store.read(&id, deadline)?;
            println!("{}", doc);
        }
        Commands::Update { id, name, value } => {
            store.update(&Document::new(id, name, value), deadline)?;
            println!("OK");
        }
        Commands::Delete { id } => {
            store.delete(&id, deadline)?;
            println!("OK");
        }
        Commands::Ping => {
            store.ping(deadline)?;
            println!("PONG");
        }
    }
    Ok(())
}
