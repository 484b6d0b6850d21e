// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Depth-first address-space traversal.
//!
//! [`TreeWalker`] descends the reference graph from a root node, one
//! blocking round trip at a time, and writes one rendered line per
//! successfully read node to an output sink in strict pre-order.
//!
//! Fault handling is local by design: a node whose class or browse name
//! cannot be read disappears together with its subtree, a Variable whose
//! value cannot be read renders the raw status inline, and a browse
//! failure drops only the children. The walk itself always completes and
//! reports everything reachable.
//!
//! Cycles: there is no visited-set. Forward-only descent plus the depth
//! bound keeps the walk finite; a node reachable under two parents prints
//! under both, which is what a configuration diagnostic should show.
//!
//! # Examples
//!
//! ```rust,ignore
//! use uaconsole_opcua::types::NodeId;
//! use uaconsole_opcua::walk::{TreeWalker, WalkOptions};
//!
//! let options = WalkOptions::default().with_max_depth(8);
//! let mut out = std::io::stdout();
//! let stats = TreeWalker::walk(&transport, &NodeId::OBJECTS_FOLDER, &options, &mut out).await?;
//! println!("{} nodes", stats.nodes_rendered);
//! ```

use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::client::transport::{ReadOutcome, UaTransport, STATUS_BAD};
use crate::error::UaResult;
use crate::render;
use crate::types::NodeId;

// =============================================================================
// WalkOptions
// =============================================================================

/// Options for one traversal run.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum descent depth; the root is depth 0.
    pub max_depth: u32,

    /// Emit the first-level reference-count diagnostic. Never affects
    /// traversal order or per-node output.
    pub verbose: bool,

    /// Optional cancellation flag, checked at each recursive entry. Once
    /// set, the walk unwinds without emitting further lines.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkOptions {
    /// Default descent bound.
    pub const DEFAULT_MAX_DEPTH: u32 = 16;

    /// Creates options with the default depth bound.
    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            verbose: false,
            cancel: None,
        }
    }

    /// Sets the maximum descent depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Installs a cancellation flag.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

// =============================================================================
// WalkContext
// =============================================================================

/// Per-level traversal context, passed down each recursive step.
///
/// Depth strictly increases on descent and never exceeds `max_depth`.
#[derive(Debug, Clone, Copy)]
pub struct WalkContext {
    /// Current depth; the root is 0.
    pub depth: u32,

    /// Depth at which descent stops.
    pub max_depth: u32,

    /// Verbose diagnostics enabled.
    pub verbose: bool,
}

impl WalkContext {
    /// Context for the root of a walk.
    pub fn root(options: &WalkOptions) -> Self {
        Self {
            depth: 0,
            max_depth: options.max_depth,
            verbose: options.verbose,
        }
    }

    /// Context for a child node, one level deeper.
    pub fn child(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// Returns `true` when descent must stop at this level.
    pub fn at_depth_limit(&self) -> bool {
        self.depth >= self.max_depth
    }
}

// =============================================================================
// WalkStats
// =============================================================================

/// Counters accumulated over one traversal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes whose line was emitted.
    pub nodes_rendered: u64,

    /// Variable values successfully read and decoded.
    pub values_read: u64,

    /// Variable values that rendered as an inline read error.
    pub value_read_errors: u64,

    /// Nodes dropped (with their subtrees) after an attribute read failure.
    pub subtrees_skipped: u64,
}

// =============================================================================
// TreeWalker
// =============================================================================

/// Depth-first, pre-order address-space walker.
///
/// Borrows the transport read-only for the whole walk; access is strictly
/// serial, so no locking is involved. Each walk is a pure function of
/// `(transport, root, options)` apart from the lines written to the sink.
pub struct TreeWalker<'a, T, W> {
    transport: &'a T,
    out: &'a mut W,
    cancel: Option<Arc<AtomicBool>>,
    stats: WalkStats,
}

impl<'a, T, W> TreeWalker<'a, T, W>
where
    T: UaTransport,
    W: Write,
{
    /// Walks the address space from `root`, writing one line per visited
    /// node to `out`, and returns the run's counters.
    ///
    /// # Errors
    ///
    /// Only sink write failures surface here; every per-node server
    /// failure is handled locally as described in the module docs.
    pub async fn walk(
        transport: &'a T,
        root: &NodeId,
        options: &WalkOptions,
        out: &'a mut W,
    ) -> UaResult<WalkStats> {
        let mut walker = Self {
            transport,
            out,
            cancel: options.cancel.clone(),
            stats: WalkStats::default(),
        };
        walker.visit(root.clone(), WalkContext::root(options)).await?;
        Ok(walker.stats)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Visits one node: read attributes, emit its line, then recurse into
    /// forward references. Recursion is a boxed future so the descent uses
    /// the call stack without an unsized `async fn` cycle.
    fn visit(
        &mut self,
        node_id: NodeId,
        ctx: WalkContext,
    ) -> Pin<Box<dyn Future<Output = UaResult<()>> + '_>> {
        Box::pin(async move {
            if self.cancelled() {
                trace!(node_id = %node_id, "walk cancelled, unwinding");
                return Ok(());
            }

            // Attribute fetch: failure of either read drops this node and
            // its subtree, leaving the parent's already-emitted line intact.
            let node_class = match self.transport.read_node_class(&node_id).await {
                Ok(class) => class,
                Err(err) => {
                    warn!(node_id = %node_id, error = %err, "skipping subtree: node class unreadable");
                    self.stats.subtrees_skipped += 1;
                    return Ok(());
                }
            };
            let browse_name = match self.transport.read_browse_name(&node_id).await {
                Ok(name) => name,
                Err(err) => {
                    warn!(node_id = %node_id, error = %err, "skipping subtree: browse name unreadable");
                    self.stats.subtrees_skipped += 1;
                    return Ok(());
                }
            };

            let mut line = render::node_line(ctx.depth, &browse_name, &node_id, node_class);

            if node_class.has_value() {
                let outcome = match self.transport.read_value(&node_id).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        trace!(node_id = %node_id, error = %err, "value read failed at transport level");
                        ReadOutcome::failure(STATUS_BAD)
                    }
                };
                if outcome.is_good() && outcome.value.as_ref().is_some_and(|v| !v.is_null()) {
                    self.stats.values_read += 1;
                } else {
                    self.stats.value_read_errors += 1;
                }
                line.push_str(&render::value_suffix(&outcome));
            }

            writeln!(self.out, "{}", line)?;
            self.stats.nodes_rendered += 1;

            if !node_class.is_browsable() {
                return Ok(());
            }

            // Children: one browse round trip; a failure here costs only
            // the children, the node's own line already stands.
            let references = match self.transport.browse(&node_id).await {
                Ok(references) => references,
                Err(err) => {
                    warn!(node_id = %node_id, error = %err, "browse failed, dropping children");
                    Vec::new()
                }
            };

            if ctx.verbose && ctx.depth == 0 && !references.is_empty() {
                writeln!(self.out, "  Found {} references to browse", references.len())?;
            }

            if ctx.at_depth_limit() {
                trace!(node_id = %node_id, depth = ctx.depth, "depth limit reached");
                return Ok(());
            }

            for reference in references {
                if reference.is_forward {
                    self.visit(reference.node_id, ctx.child()).await?;
                }
            }

            Ok(())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_child_increments_depth() {
        let options = WalkOptions::new().with_max_depth(3).with_verbose(true);
        let root = WalkContext::root(&options);
        assert_eq!(root.depth, 0);
        assert!(root.verbose);

        let child = root.child();
        assert_eq!(child.depth, 1);
        assert_eq!(child.max_depth, 3);
        assert!(child.verbose);

        assert!(!root.at_depth_limit());
        assert!(root.child().child().child().at_depth_limit());
    }

    #[test]
    fn test_options_builders() {
        let options = WalkOptions::default();
        assert_eq!(options.max_depth, WalkOptions::DEFAULT_MAX_DEPTH);
        assert!(!options.verbose);

        let flag = Arc::new(AtomicBool::new(false));
        let options = WalkOptions::new()
            .with_max_depth(2)
            .with_verbose(true)
            .with_cancel(flag.clone());
        assert_eq!(options.max_depth, 2);
        assert!(options.verbose);
        assert!(options.cancel.is_some());
    }
}
