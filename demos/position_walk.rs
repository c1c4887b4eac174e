//! Open a few liquidity positions over a tick domain and query them.

use ticktree::{Domain, LiquidityTree, TraceWalker};

fn main() -> anyhow::Result<()> {
    // 4096 leaves, 60 ticks each: ticks in [-122880, 122880).
    let domain = Domain::new(4096)?.with_tick_spacing(60)?;
    let mut pool = LiquidityTree::new(domain);

    let positions = [(-6000, 6000, 1_000), (-600, 1200, 25_000), (3000, 60_000, 400)];
    for (lower, upper, liquidity) in positions {
        pool.add_ticks(lower, upper, liquidity)?;

        let route = domain.route_ticks(lower, upper)?;
        let mut trace = TraceWalker::default();
        route.walk(&mut trace);
        println!(
            "position [{lower}, {upper}) liquidity={liquidity}: lca={} canonical={}",
            route.lca(),
            trace.canonical().len()
        );
    }

    for tick in [-6000, -600, 0, 1200, 3000, 59_940, 60_000] {
        println!("tick {tick}: active liquidity={}", pool.at_tick(tick)?);
    }

    println!(
        "liquidity-ticks over [-6000, 6000): {}",
        pool.total_ticks(-6000, 6000)?
    );
    println!("nodes holding state: {}", pool.node_count());

    Ok(())
}
