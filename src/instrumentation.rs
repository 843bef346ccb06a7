//! Span timing for profiling the search.
//!
//! Compiled only with `--features instrumentation`. The search functions and
//! the evaluator are annotated with `tracing` spans; the layer below sums the
//! time spent in each of them.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use once_cell::sync::Lazy;
use tracing::span;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Call count and total nanoseconds per span name.
static TIMING_DATA: Lazy<Mutex<HashMap<&'static str, (u64, u64)>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

struct TimingLayer;

impl<S> Layer<S> for TimingLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_enter(&self, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(Instant::now());
        }
    }

    fn on_exit(&self, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(start) = span.extensions_mut().remove::<Instant>() {
                let elapsed = start.elapsed().as_nanos() as u64;
                // The search is single threaded; a poisoned lock only loses timings.
                if let Ok(mut data) = TIMING_DATA.lock() {
                    let entry = data.entry(span.name()).or_insert((0, 0));
                    entry.0 += 1;
                    entry.1 += elapsed;
                }
            }
        }
    }
}

/// Installs the timing layer as the global subscriber.
///
/// With `RUST_LOG` unset or `off` only timings are collected. Any other value
/// also prints span events filtered by `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "off".to_string());

    let result = if env_filter == "off" || env_filter.is_empty() {
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("trace"))
            .with(TimingLayer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        use tracing_subscriber::fmt;

        let fmt_layer = fmt::layer().with_target(false).with_level(false).compact();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(TimingLayer)
            .with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    };

    if let Err(error) = result {
        eprintln!("Failed to set tracing subscriber: {}", error);
    }
}

/// Prints per-span call counts and times to stderr, slowest first.
pub fn print_timing_statistics() {
    let entries: Vec<(&'static str, (u64, u64))> = match TIMING_DATA.lock() {
        Ok(data) => data.iter().map(|(&name, &timing)| (name, timing)).collect(),
        Err(_) => Vec::new(),
    };

    if entries.is_empty() {
        eprintln!("\nNo timing data collected.");
        return;
    }

    let mut entries = entries;
    entries.sort_by_key(|&(_, (_, total))| std::cmp::Reverse(total));

    eprintln!("\n{:=<80}", "");
    eprintln!("Latency Statistics (sorted by total time)");
    eprintln!("{:=<80}", "");
    eprintln!(
        "{:<40} {:>12} {:>12} {:>12}",
        "Function", "Calls", "Total (ms)", "Avg (µs)"
    );
    eprintln!("{:-<80}", "");

    for (name, (count, total_nanos)) in entries.iter().filter(|(_, (count, _))| *count > 0) {
        eprintln!(
            "{:<40} {:>12} {:>12.2} {:>12.2}",
            name,
            count,
            *total_nanos as f64 / 1_000_000.0,
            *total_nanos as f64 / *count as f64 / 1_000.0
        );
    }
    eprintln!("{:-<80}", "");
}
