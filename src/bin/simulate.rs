//! Desktop simulation of an encoder wired to a pin-change interrupt.
//!
//! A background thread plays the interrupt handler and pushes Gray-code
//! states into a shared decoder, occasionally dropping an edge. The main
//! thread polls the decoder the way firmware would from its main loop.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin simulate -- [divisor] [counts_per_revolution]
//! ```

use std::thread;
use std::time::Duration;

use anyhow::Context;
use rs_rotary::hal::MockPins;
use rs_rotary::{EncoderConfig, EncoderInput, SharedDecoder};

/// Main loop interval in milliseconds (50Hz = 20ms)
const LOOP_INTERVAL_MS: u64 = 20;

/// Number of main-loop ticks to simulate
const TICKS: u32 = 50;

/// Edges emitted by the "interrupt" between two main-loop ticks
const EDGES_PER_TICK: i32 = 3;

/// Every Nth burst the simulated wiring misses an edge
const SKIP_EVERY: u32 = 7;

fn parse_arg(args: &[String], index: usize, default: i32) -> anyhow::Result<i32> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("argument {} is not an integer: {:?}", index, raw)),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = EncoderConfig::default()
        .with_name("simulated")
        .with_divisor(parse_arg(&args, 1, 4)?)
        .with_counts_per_revolution(parse_arg(&args, 2, 24)?);

    let decoder = SharedDecoder::with_config(&config)
        .map_err(|e| anyhow::anyhow!("Decoder init failed: {}", e))?;

    println!();
    println!("================================");
    println!("  rs-rotary encoder simulation");
    println!("================================");
    println!(
        "[OK] Decoder '{}' (divisor {}, {} counts/rev)",
        decoder.with_decoder(|d| String::from(d.name())),
        decoder.divisor(),
        decoder.counts_per_revolution()
    );

    thread::scope(|scope| {
        let isr = scope.spawn(|| {
            let mut sink = &decoder;
            let mut pins = MockPins::new();
            pins.baseline(&mut sink);
            for burst in 1..=TICKS {
                // Turn clockwise for the first half, then back
                let steps = if burst <= TICKS / 2 {
                    EDGES_PER_TICK
                } else {
                    -EDGES_PER_TICK
                };
                pins.clear_history();
                pins.rotate(&mut sink, steps);
                if burst % SKIP_EVERY == 0 {
                    pins.skip_edge(&mut sink);
                }
                thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
            }
        });

        let mut input = &decoder;
        for tick in 0..TICKS {
            thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
            let delta = EncoderInput::read_delta(&mut input);
            if delta != 0 {
                let state = decoder.state();
                println!(
                    "[{:>3}] delta {:+} -> position {:>4}, direction {:>2}, revolutions {}",
                    tick,
                    delta,
                    state.position,
                    state.direction.as_i8(),
                    state.revolutions
                );
            }
        }

        isr.join()
            .map_err(|_| anyhow::anyhow!("interrupt thread panicked"))
    })?;

    let state = decoder.state();
    let dropped = decoder.with_decoder(|d| d.invalid_transitions());
    decoder.deinit();
    println!(
        "[OK] Final position {} ({} raw edges), {} dropped edges",
        state.position, state.raw_position, dropped
    );
    Ok(())
}
