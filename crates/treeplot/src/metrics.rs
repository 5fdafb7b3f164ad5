use std::time::Duration;

use tracing_timing::{group, Histogram};

pub type TimingLayer = tracing_timing::TimingLayer<group::ByName, group::ByMessage>;

/// Records the time between consecutive events inside each span, e.g. the
/// width and position passes inside `relayout`.
pub fn timing_layer() -> TimingLayer {
    tracing_timing::Builder::default().layer(|| {
        Histogram::new_with_max(100_000_000, 2).expect("histogram bounds are valid")
    })
}

pub fn show_timing() {
    tracing::dispatcher::get_default(|d| match d.downcast_ref::<TimingLayer>() {
        Some(timing_layer) => print_histograms(timing_layer),
        None => eprintln!("timing layer is not installed"),
    })
}

fn print_histograms(timing_layer: &TimingLayer) {
    timing_layer.force_synchronize();
    timing_layer.with_histograms(|hs| {
        println!("\nTiming:");
        for (span, hs) in hs {
            for (event, h) in hs {
                let ns = Duration::from_nanos;
                println!(
                    "  {span} -> {event}: n={} mean={:?} p50={:?} max={:?}",
                    h.len(),
                    ns(h.mean() as u64),
                    ns(h.value_at_quantile(0.50)),
                    ns(h.max()),
                );
            }
        }
    });
}
