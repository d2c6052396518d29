//! kvdoc Demo
//!
//! Runs the fixed create → read → update → delete sequence against a store.

use std::process;
use std::time::Duration;

use clap::Parser;
use kvdoc::config::{parse_port, ENV_HOST, ENV_PASSWORD, ENV_PORT};
use kvdoc::{Deadline, Document, DocumentStore, StoreConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// kvdoc Demo
#[derive(Parser, Debug)]
#[command(name = "kvdoc-demo")]
#[command(about = "Create, read, update and delete one document")]
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

    /// Per-operation deadline in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,
}

fn main() {
    // Logs go to stderr; stdout carries the status lines
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvdoc=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("kvdoc demo v{}", kvdoc::VERSION);
    tracing::info!("Store address: {}:{}", args.host, args.port);

    let mut builder = StoreConfig::builder(&args.host, args.port);
    if let Some(password) = &args.password {
        builder = builder.credential(password);
    }
    let store = DocumentStore::connect(builder.build());

    let deadline = || {
        if args.timeout_ms == 0 {
            Deadline::none()
        } else {
            Deadline::after(Duration::from_millis(args.timeout_ms))
        }
    };

    let mut doc = Document::new("123", "example", "value");

    if let Err(e) = store.create(&doc, deadline()) {
        fail("create", e);
    }
    println!("Document created");

    match store.read(&doc.id, deadline()) {
        Ok(read_doc) => println!("Read document: {}", read_doc),
        Err(e) => fail("read", e),
    }

    doc.set_value("new value");
    if let Err(e) = store.update(&doc, deadline()) {
        fail("update", e);
    }
    println!("Document updated");

    if let Err(e) = store.delete(&doc.id, deadline()) {
        fail("delete", e);
    }
    println!("Document deleted");
}

fn fail(op: &str, err: kvdoc::KvDocError) -> ! {
    tracing::error!("Failed to {} document: {}", op, err);
    eprintln!("Failed to {} document: {}", op, err);
    process::exit(1);
}
