mod metrics;

use std::error::Error;

use rand::{rngs::StdRng, Rng, SeedableRng};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_tree::time::UtcDateTime;
use treeplot::{Canvas, LayoutConfig, Order, SearchTree};

/// Builds an unbalanced binary search tree and prints its diagram layout.
///
/// Key lists are separated by spaces, commas, or semicolons. Random keys are
/// inserted first, then the explicit inserts, removes, and searches run in
/// that order, and a single relayout follows the whole batch.
#[derive(StructOpt, Debug)]
#[structopt(name = "treeplot")]
struct Opt {
    /// Keys to insert.
    #[structopt(long)]
    insert: Option<String>,
    /// Keys to remove.
    #[structopt(long)]
    remove: Option<String>,
    /// Keys to look up.
    #[structopt(long)]
    search: Option<String>,
    /// Number of random keys in 0..1000 to insert.
    #[structopt(long, default_value = "0")]
    random: usize,
    /// Seed for the random keys.
    #[structopt(long)]
    seed: Option<u64>,
    /// Traversal order to print: pre, in, or post.
    #[structopt(long, default_value = "in")]
    order: Order,
    #[structopt(long)]
    node_width: Option<f64>,
    #[structopt(long)]
    node_height: Option<f64>,
    #[structopt(long)]
    inter_tree_space: Option<f64>,
    /// Center parents with two children over them.
    #[structopt(long)]
    center_parent: bool,
    /// Trace the width pass (shown at RUST_LOG=debug).
    #[structopt(long)]
    trace_widths: bool,
    /// Trace the position pass (shown at RUST_LOG=debug).
    #[structopt(long)]
    trace_positions: bool,
    /// Print timing histograms for the relayout.
    #[structopt(long)]
    timing: bool,
}

impl Opt {
    fn layout_config(&self) -> LayoutConfig {
        let default = LayoutConfig::default();
        LayoutConfig {
            node_width: self.node_width.unwrap_or(default.node_width),
            node_height: self.node_height.unwrap_or(default.node_height),
            inter_tree_space: self.inter_tree_space.unwrap_or(default.inter_tree_space),
            center_parent: self.center_parent,
            trace_widths: self.trace_widths,
            trace_positions: self.trace_positions,
        }
    }
}

fn parse_keys(list: Option<&str>) -> impl Iterator<Item = i64> + '_ {
    list.unwrap_or_default()
        .split([' ', ',', ';'])
        .filter_map(|token| token.trim().parse().ok())
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(metrics::timing_layer())
        .with(
            tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true)
                .with_timer(UtcDateTime::default()),
        )
        .init();

    let config = opt.layout_config();
    config.validate()?;
    let mut tree = SearchTree::with_renderer(config, Canvas::new());

    let mut rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let random_keys: Vec<i64> = (0..opt.random).map(|_| rng.gen_range(0..1000)).collect();
    for key in random_keys.into_iter().chain(parse_keys(opt.insert.as_deref())) {
        let result = tree.insert(key);
        println!("insert({key}): {}", result.is_ok());
    }
    for key in parse_keys(opt.remove.as_deref()) {
        if let Err(err) = tree.remove(&key) {
            info!(key, %err, "remove skipped");
        }
    }
    for key in parse_keys(opt.search.as_deref()) {
        let search = tree.search(&key);
        let last = search.node.map(|node| *node.key(tree.map()));
        match last {
            Some(last) => println!("search({key}): {} at {last}", search.found),
            None => println!("search({key}): {} (empty tree)", search.found),
        }
    }

    tree.relayout();

    print!("{}", tree.diagram());
    let keys: Vec<String> = tree.keys(opt.order).iter().map(|k| k.to_string()).collect();
    println!("{}: {}", opt.order, keys.join(","));

    let mut sprites: Vec<_> = tree.renderer().sprites().map(|(_, s)| s).collect();
    sprites.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    for sprite in sprites {
        println!("{:>6} x={:<8} y={}", sprite.label, sprite.x, sprite.y);
    }

    if opt.timing {
        metrics::show_timing();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keys_skips_junk() {
        let keys: Vec<_> = parse_keys(Some("10, 5;15  x 12,,-3")).collect();
        assert_eq!(keys, [10, 5, 15, 12, -3]);
        assert_eq!(parse_keys(None).count(), 0);
    }

    #[test]
    fn layout_flags_override_defaults() {
        let opt = Opt::from_iter(["treeplot", "--node-width", "10", "--center-parent"]);
        let config = opt.layout_config();
        assert_eq!(config.node_width, 10.0);
        assert_eq!(config.node_height, LayoutConfig::default().node_height);
        assert!(config.center_parent);
        assert_eq!(opt.order, Order::InOrder);
    }
}
