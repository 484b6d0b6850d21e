// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! The browse run: connect, walk, disconnect.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use uaconsole_opcua::client::RealUaTransport;
use uaconsole_opcua::types::ClientConfig;
use uaconsole_opcua::walk::{TreeWalker, WalkOptions};
use uaconsole_opcua::UaTransport;

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes a full browse run against the configured server.
///
/// Per-node failures never surface here; the only errors this returns are
/// configuration, connection, and output-sink failures.
pub async fn run(cli: &Cli) -> BinResult<()> {
    println!("=============================================");
    println!("   UAConsole - OPC UA Server Browser");
    println!("=============================================");
    println!();

    if cli.verbose {
        println!("Verbose mode enabled");
        println!("Connection timeout: {} ms", cli.timeout);
    }
    println!("Connecting to {}...", cli.url);

    let config = ClientConfig::builder()
        .endpoint(&cli.url)
        .connect_timeout(Duration::from_millis(cli.timeout))
        .build()?;

    let mut transport = RealUaTransport::new(config);
    transport.connect().await?;

    println!("Connected successfully!");
    println!();

    if cli.verbose {
        println!("=== CONNECTION DETAILS ===");
        println!(
            "Connection time: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
        );
        println!("Timeout configured: {} ms", cli.timeout);
        println!();
    }

    println!("=== RECURSIVE BROWSE FROM {} ===", cli.root);
    if cli.verbose {
        println!("Depth-first traversal, max depth {}", cli.max_depth);
        println!();
    }

    // Ctrl-C flips the flag; the walk checks it at every recursive entry
    // and unwinds, so the session below still gets a clean disconnect.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, stopping browse");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let options = WalkOptions::new()
        .with_max_depth(cli.max_depth)
        .with_verbose(cli.verbose)
        .with_cancel(cancel.clone());

    let mut out = io::stdout();
    let stats = TreeWalker::walk(&transport, &cli.root, &options, &mut out).await?;

    if let Err(err) = transport.disconnect().await {
        warn!(error = %err, "disconnect failed");
    }

    println!();
    println!("=== BROWSING COMPLETED ===");
    println!("Server URL: {}", cli.url);
    println!("Disconnected from server");
    if cancel.load(Ordering::Relaxed) {
        println!("(browse interrupted)");
    }

    info!(
        nodes = stats.nodes_rendered,
        values = stats.values_read,
        value_errors = stats.value_read_errors,
        skipped = stats.subtrees_skipped,
        "browse finished"
    );

    Ok(())
}
