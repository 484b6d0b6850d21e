// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! CLI argument parsing.

use clap::{Parser, ValueEnum};

use uaconsole_opcua::types::NodeId;

// =============================================================================
// Cli
// =============================================================================

/// UAConsole - OPC UA server console browser
///
/// Connects to an OPC UA server, walks its address space depth-first from
/// a root node, and prints every reachable node as an indented tree with
/// current values for Variable nodes. Diagnostic use only.
#[derive(Parser, Debug)]
#[command(
    name = "uaconsole",
    version = uaconsole_opcua::VERSION,
    about = "OPC UA server console browser",
    long_about = None
)]
pub struct Cli {
    /// Server endpoint URL, e.g. opc.tcp://10.0.0.128:4840
    pub url: String,

    /// Connection timeout in milliseconds
    #[arg(
        short = 't',
        long,
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "UACONSOLE_TIMEOUT_MS"
    )]
    pub timeout: u64,

    /// Root node to browse from (ns=<n>;<tag>=<id> form)
    #[arg(long, default_value = "i=85")]
    pub root: NodeId,

    /// Maximum browse depth below the root
    #[arg(short = 'd', long, default_value_t = 16)]
    pub max_depth: u32,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "UACONSOLE_LOG_LEVEL")]
    pub log_level: String,

    /// Log format
    #[arg(long, default_value = "text", env = "UACONSOLE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    Text,
    /// JSON lines, for log aggregation.
    Json,
    /// Compact single-line text.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["uaconsole", "opc.tcp://localhost:4840"]).unwrap();
        assert_eq!(cli.url, "opc.tcp://localhost:4840");
        assert_eq!(cli.timeout, 5000);
        assert_eq!(cli.root, NodeId::OBJECTS_FOLDER);
        assert_eq!(cli.max_depth, 16);
        assert!(!cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "uaconsole",
            "-v",
            "-t",
            "10000",
            "--root",
            "ns=2;s=Plant",
            "opc.tcp://opcua-esp32:4840",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.timeout, 10000);
        assert_eq!(cli.root, NodeId::string(2, "Plant"));
        assert_eq!(cli.url, "opc.tcp://opcua-esp32:4840");
    }

    #[test]
    fn test_rejects_zero_timeout_and_missing_url() {
        assert!(Cli::try_parse_from(["uaconsole", "-t", "0", "opc.tcp://x:4840"]).is_err());
        assert!(Cli::try_parse_from(["uaconsole"]).is_err());
    }
}
