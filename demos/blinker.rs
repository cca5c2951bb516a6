//! Blinker
//!
//! This example demonstrates the basic dispatch cycle.
//!
//! Key concepts:
//! - A container superstate with two substates
//! - Deferred transitions requested from handlers
//! - Events bubbling to the superstate when substates pass them on
//!
//! Run with: cargo run --example blinker

use overstory::builder::GraphBuilder;
use overstory::{Event, Machine, Outcome, Signal};

const SIG_TOGGLE: Signal = Signal(Signal::USER_START.0);
const SIG_STATUS: Signal = Signal(Signal::USER_START.0 + 1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Blinker ===\n");

    let mut builder = GraphBuilder::new();
    let lamp = builder.state(0);
    let off = builder.substate(1, lamp)?;
    let on = builder.substate(2, lamp)?;

    // The superstate answers status queries for both substates.
    builder.on(lamp, |ctx, event| {
        if event.signal == SIG_STATUS {
            println!("  lamp: currently in state {}", ctx.debug_id(ctx.active()));
        }
        Outcome::Continue
    })?;

    builder.on(off, move |ctx, event| {
        match event.signal {
            Signal::ENTRY => println!("  off: entered"),
            SIG_TOGGLE => {
                println!("  off: toggling on");
                ctx.request_transition(on);
            }
            _ => {}
        }
        Outcome::Continue
    })?;

    builder.on(on, move |ctx, event| {
        match event.signal {
            Signal::ENTRY => println!("  on: entered"),
            SIG_TOGGLE => {
                println!("  on: toggling off");
                ctx.request_transition(off);
            }
            _ => {}
        }
        Outcome::Continue
    })?;

    let mut machine = Machine::new(builder.build(), off)?;

    println!("Initializing (enters lamp, then off):");
    machine.init()?;

    println!("\nToggling twice:");
    machine.dispatch(Event::new(SIG_TOGGLE, 0))?;
    machine.dispatch(Event::new(SIG_TOGGLE, 0))?;

    println!("\nStatus query bubbles to the superstate:");
    machine.dispatch(Event::new(SIG_STATUS, 0))?;

    println!("\nBack in 'off': {}", machine.is_active(off));
    println!("Inside 'lamp': {}", machine.is_active(lamp));

    println!("\n=== Example Complete ===");
    Ok(())
}
