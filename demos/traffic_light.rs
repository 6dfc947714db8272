//! Traffic Light State Machine
//!
//! This demo drives a cyclic three-state machine from a fixed tick loop.
//!
//! Key concepts:
//! - Named states through `fsm_states!`
//! - Actions that count ticks spent in a state
//! - Evaluators that release the light once its phase has elapsed
//! - Revoking a permission at runtime to hold a phase
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_light

use bitfsm::{fsm_states, FsmBuilder, TickOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fsm_states! {
    enum TrafficLight {
        Red,
        Green,
        Yellow,
    }
}

impl TrafficLight {
    /// Ticks spent in this phase before moving on.
    fn phase_length(self) -> usize {
        match self {
            Self::Red => 3,
            Self::Green => 3,
            Self::Yellow => 1,
        }
    }
}

fn main() -> Result<(), bitfsm::FsmError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    println!("=== Traffic Light State Machine ===\n");

    let elapsed = Arc::new(AtomicUsize::new(0));
    let mut builder = FsmBuilder::new(TrafficLight::COUNT);

    for light in TrafficLight::ALL {
        let counter = Arc::clone(&elapsed);
        builder = builder.action(light.index(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    let cycle = [
        (TrafficLight::Red, TrafficLight::Green),
        (TrafficLight::Green, TrafficLight::Yellow),
        (TrafficLight::Yellow, TrafficLight::Red),
    ];
    for (from, to) in cycle {
        let counter = Arc::clone(&elapsed);
        builder = builder.transition(from.index(), to.index(), move || {
            if counter.load(Ordering::SeqCst) >= from.phase_length() {
                counter.store(0, Ordering::SeqCst);
                true
            } else {
                false
            }
        });
    }

    let mut fsm = builder.fill_unconfigured().build()?;
    println!("Mode after build: {}\n", fsm.mode());

    for tick in 0..14 {
        // Pedestrian button: hold red for a while mid-run.
        if tick == 8 {
            fsm.set_permission(TrafficLight::Red.index(), TrafficLight::Green.index(), false)?;
            println!("  (red held)");
        }
        if tick == 12 {
            fsm.set_permission(TrafficLight::Red.index(), TrafficLight::Green.index(), true)?;
            println!("  (red released)");
        }

        match fsm.tick()? {
            TickOutcome::Transitioned { from, to, .. } => {
                let from = TrafficLight::try_from(from)?;
                let to = TrafficLight::try_from(to)?;
                println!("tick {tick:>2}: {} -> {}", from.name(), to.name());
            }
            TickOutcome::Stayed { state, .. } => {
                println!("tick {tick:>2}: {}", TrafficLight::try_from(state)?.name());
            }
        }
    }

    println!("\nPath: {:?}", fsm.log().path().collect::<Vec<_>>());
    println!("Ticks: {}", fsm.ticks());
    Ok(())
}
