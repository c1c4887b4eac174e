//! Reference collaborators built on the traversal callbacks.
//!
//! Each walker owns its per-node state; the tree engine only tells it which
//! nodes a range touches and in what order.

mod coverage;
mod liquidity;
mod trace;

pub use coverage::CoverageLedger;
pub use liquidity::{LiquidityTree, NodeLiquidity};
pub use trace::{Event, TraceWalker};
