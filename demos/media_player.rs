//! Media Player
//!
//! This example demonstrates the `state_graph!` macro and event tracing.
//!
//! Key concepts:
//! - Declarative graph definition with named handles
//! - A three-level hierarchy (player -> playing -> paused)
//! - Observing every dispatched event, synthetic ones included
//!
//! Run with: cargo run --example media_player

use overstory::{state_graph, Event, Machine, Outcome, SharedTraceLog, Signal};

const SIG_PLAY: Signal = Signal(Signal::USER_START.0);
const SIG_PAUSE: Signal = Signal(Signal::USER_START.0 + 1);
const SIG_STOP: Signal = Signal(Signal::USER_START.0 + 2);

state_graph! {
    pub struct Player {
        state root(0);
        substate stopped(1): root = move |ctx, event| {
            if event.signal == SIG_PLAY {
                ctx.request_transition(playing);
            }
            Outcome::Continue
        };
        substate playing(2): root = move |ctx, event| {
            match event.signal {
                SIG_PAUSE => ctx.request_transition(paused),
                SIG_STOP => ctx.request_transition(stopped),
                _ => {}
            }
            Outcome::Continue
        };
        // Pausing nests inside playing: SIG_STOP bubbles up and is handled
        // by the playing superstate.
        substate paused(3): playing = move |ctx, event| {
            if event.signal == SIG_PAUSE {
                ctx.request_transition(playing);
            }
            Outcome::Continue
        };
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Media Player ===\n");

    let (graph, player) = Player::build()?;
    let trace = SharedTraceLog::new();
    let mut machine = Machine::new(graph, player.stopped)?.with_observer(trace.clone());
    machine.init()?;

    machine.dispatch(Event::new(SIG_PLAY, 0))?;
    println!("play  -> playing active: {}", machine.is_active(player.playing));

    machine.dispatch(Event::new(SIG_PAUSE, 0))?;
    println!("pause -> paused active:  {}", machine.is_active(player.paused));
    println!("         still playing:  {}", machine.is_active(player.playing));

    // Stop while paused: the event bubbles from paused up to playing.
    machine.dispatch(Event::new(SIG_STOP, 0))?;
    println!("stop  -> stopped active: {}", machine.is_active(player.stopped));

    println!("\nObserved event spans:");
    for record in trace.snapshot() {
        println!("  state {} <- signal {:?}", record.debug_id, record.signal);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
