// Demonstration: run a population of phototaxis agents headless and print
// telemetry for the best learner.
//
// Build/run from this repo root:
//   RUST_LOG=phototaxis=debug cargo run --example phototaxis_demo -- --agents 6 --ticks 20000

use std::env;

use phototaxis::{ControlEvent, ControllerKind, SimConfig, Simulation};
use qtty::{Quantity, Second};
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();
    let agents: usize = arg_value(&args, "--agents")
        .and_then(|s| s.parse().ok())
        .unwrap_or(6);
    let ticks: usize = arg_value(&args, "--ticks")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20_000);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let regenerate_every: usize = arg_value(&args, "--regenerate-every")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let config = SimConfig {
        agent_count: agents,
        controller: if args.iter().any(|a| a == "--reactive") {
            ControllerKind::Reactive
        } else {
            ControllerKind::Learned
        },
        ..SimConfig::default()
    };

    let mut sim = match Simulation::new(config, seed) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Cannot start simulation: {}", e);
            std::process::exit(2);
        }
    };

    let frame = Quantity::<Second>::new(1.0 / 60.0);
    let mut goals = 0usize;
    let mut collisions = 0usize;
    for tick in 1..=ticks {
        if regenerate_every > 0 && tick % regenerate_every == 0 {
            if let Err(e) = sim.apply(ControlEvent::RegenerateEnvironment) {
                eprintln!("Regeneration failed: {}", e);
            }
        }
        if let Some(report) = sim.advance(frame) {
            goals += report.summary.goals;
            collisions += report.summary.collisions;
        }
    }

    println!("Controller: {}", sim.config().controller);
    println!(
        "Ran {} ticks ({:.1} s on the current map): {} goal ticks, {} bumps",
        sim.ticks(),
        sim.time().value(),
        goals,
        collisions
    );

    let best = sim
        .snapshots()
        .into_iter()
        .max_by(|a, b| a.metrics.reward_avg.total_cmp(&b.metrics.reward_avg));
    if let Some(snapshot) = best {
        if let Err(e) = sim.apply(ControlEvent::SelectAgent {
            agent: snapshot.index,
        }) {
            eprintln!("{}", e);
        }
    }
    match sim.selected_snapshot() {
        Ok(snapshot) => println!("{}", snapshot),
        Err(e) => eprintln!("{}", e),
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
