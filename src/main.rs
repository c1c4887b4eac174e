use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ticktree::{
    tick_to_tree_index, tree_index_to_tick, CoverageLedger, Domain, Key, Route, TraceWalker,
};

#[derive(Parser, Debug)]
#[command(name = "ticktree", about = "Range-decomposition tree for tick-ranged liquidity")]
struct Cli {
    /// Log route construction and walks (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decompose an inclusive leaf range into canonical nodes.
    Route {
        /// Number of leaves in the tree (power of two).
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// First leaf (inclusive).
        left: u32,
        /// Last leaf (inclusive).
        right: u32,
        /// Print every down/up/phase callback of the walk.
        #[arg(long)]
        trace: bool,
        /// Verify that the canonical nodes tile the range exactly.
        #[arg(long)]
        check: bool,
    },
    /// Decompose a half-open tick range `[lower, upper)`.
    Ticks {
        /// Number of leaves in the tree (power of two).
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// Ticks per leaf.
        #[arg(long, default_value_t = 1)]
        spacing: i32,
        /// Lower tick (inclusive).
        #[arg(allow_hyphen_values = true)]
        lower: i32,
        /// Upper tick (exclusive).
        #[arg(allow_hyphen_values = true)]
        upper: i32,
    },
    /// Describe a node key.
    Key {
        /// First leaf covered.
        offset: u32,
        /// Number of leaves covered (power of two).
        span: u32,
        /// Number of leaves in the tree, for tick ranges.
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// Ticks per leaf.
        #[arg(long, default_value_t = 1)]
        spacing: i32,
    },
    /// Map a tick to its tree index.
    TickToIndex {
        /// Tick (must be a multiple of the spacing).
        #[arg(allow_hyphen_values = true)]
        tick: i32,
        /// Number of leaves in the tree.
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// Ticks per leaf.
        #[arg(long, default_value_t = 1)]
        spacing: i32,
    },
    /// Map a tree index to its tick.
    IndexToTick {
        /// Tree index (leaf 0 holds the lowest tick).
        index: u32,
        /// Number of leaves in the tree.
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// Ticks per leaf.
        #[arg(long, default_value_t = 1)]
        spacing: i32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Route {
            width,
            left,
            right,
            trace,
            check,
        } => run_route(width, left, right, trace, check)?,
        Commands::Ticks {
            width,
            spacing,
            lower,
            upper,
        } => run_ticks(width, spacing, lower, upper)?,
        Commands::Key {
            offset,
            span,
            width,
            spacing,
        } => run_key(offset, span, width, spacing)?,
        Commands::TickToIndex {
            tick,
            width,
            spacing,
        } => {
            let index = tick_to_tree_index(tick, width, spacing)
                .with_context(|| format!("cannot map tick {tick}"))?;
            println!("{index}");
        }
        Commands::IndexToTick {
            index,
            width,
            spacing,
        } => {
            let tick = tree_index_to_tick(index, width, spacing)
                .with_context(|| format!("cannot map index {index}"))?;
            println!("{tick}");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ticktree=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_route(width: u32, left: u32, right: u32, trace: bool, check: bool) -> Result<()> {
    let route = Route::make(width, left, right)
        .with_context(|| format!("cannot decompose [{left}, {right}] in width {width}"))?;
    print_route(&route);

    if trace {
        let mut walker = TraceWalker::default();
        route.walk(&mut walker);
        println!("{}", walker.render());
    }

    if check {
        let mut ledger = CoverageLedger::new(width);
        route.walk(&mut ledger);
        if let Some(key) = ledger.overlap() {
            anyhow::bail!("canonical node {key} overlaps earlier coverage");
        }
        if !ledger.covers_exactly(left, right) {
            anyhow::bail!("canonical nodes do not tile [{left}, {right}]");
        }
        println!("tiling ok: {} leaves", ledger.covered_count());
    }

    Ok(())
}

fn run_ticks(width: u32, spacing: i32, lower: i32, upper: i32) -> Result<()> {
    let domain = Domain::new(width)
        .and_then(|domain| domain.with_tick_spacing(spacing))
        .context("invalid domain")?;
    let route = domain
        .route_ticks(lower, upper)
        .with_context(|| format!("cannot decompose ticks [{lower}, {upper})"))?;

    print_route(&route);
    for key in route.canonical() {
        let (low, high) = domain.key_ticks(key)?;
        println!("  {key}\tticks=[{low}, {high})");
    }

    Ok(())
}

fn run_key(offset: u32, span: u32, width: u32, spacing: i32) -> Result<()> {
    let key = Key::try_new(offset, span).context("invalid key")?;
    let domain = Domain::new(width)
        .and_then(|domain| domain.with_tick_spacing(spacing))
        .context("invalid domain")?;
    if key.high() >= width {
        anyhow::bail!("key {key} does not fit in width {width}");
    }

    println!("key\t{key}");
    println!("packed\t{:#x}", key.packed());
    println!("leaves\t[{}, {}]", key.low(), key.high());
    println!("height\t{}", key.height());
    println!("side\t{}", if key.is_left() { "left" } else { "right" });
    println!("parent\t{}", key.parent_within(width));
    if key.span() < width {
        println!("sibling\t{}", key.sibling());
    }
    if !key.is_leaf() {
        let (left, right) = key.children();
        println!("children\t{left} {right}");
    }
    let (low, high) = domain.key_ticks(key)?;
    println!("ticks\t[{low}, {high})");

    Ok(())
}

fn print_route(route: &Route) {
    let fmt_boundary = |boundary: Option<Key>| match boundary {
        Some(key) => key.to_string(),
        None => "collapsed".to_string(),
    };
    println!(
        "range=[{}, {}]\tlca={}\tleft={}\tright={}",
        route.range().start(),
        route.range().end(),
        route.lca(),
        fmt_boundary(route.left_boundary()),
        fmt_boundary(route.right_boundary()),
    );
    let canonical = route.canonical();
    println!(
        "canonical ({}): {}",
        canonical.len(),
        canonical
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
}
