//! Standalone capture replay tool
//!
//! Replays a serial capture (binary records or hex dump) through the
//! decoders and prints every field update as it happens, followed by the
//! final status snapshot.
//!
//! Usage:
//!   replay_capture <capture.bin|capture.hex> [--limit <count>]
//!
//! Set RUST_LOG=debug to see skipped and unknown frames as well.

use car_status_decoder::{
    open_capture, Dispatcher, FieldSnapshot, MonotonicClock, Replay, UpdateObserver,
};
use std::env;
use std::path::PathBuf;

/// Prints each update on stdout
struct PrintObserver {
    updates: usize,
}

impl UpdateObserver for PrintObserver {
    fn on_update(&mut self, can_id: u16, field: &FieldSnapshot) {
        self.updates += 1;
        println!(
            "[{:>8} ms] 0x{:03X} {:<20} = {}",
            field.last_update.unwrap_or_default(),
            can_id,
            field.name,
            field.value
        );
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <capture> [--limit <count>]", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let mut limit: Option<u64> = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--limit" && i + 1 < args.len() {
            limit = args[i + 1].parse().ok();
            i += 2;
        } else {
            eprintln!("Unknown argument: {}", args[i]);
            std::process::exit(1);
        }
    }

    let frames = match open_capture(&path, None) {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("Failed to open {:?}: {}", path, e);
            std::process::exit(1);
        }
    };

    let mut replay = Replay::new(Dispatcher::new(), MonotonicClock::new());
    let mut observer = PrintObserver { updates: 0 };
    let mut read_errors = 0u64;

    for item in frames {
        if limit.is_some_and(|max| replay.stats().total_frames >= max) {
            break;
        }
        match item {
            Ok(frame) => {
                replay.process_observed(&frame, &mut observer);
            }
            Err(e) => {
                read_errors += 1;
                log::warn!("Skipping unreadable record: {}", e);
            }
        }
    }

    let stats = replay.stats();
    println!("\n=== REPLAY SUMMARY ===");
    println!("Total frames:  {}", stats.total_frames);
    println!("Decoded:       {}", stats.decoded);
    println!("Unknown ID:    {}", stats.unknown);
    println!("Too short:     {}", stats.skipped_short);
    println!("Read errors:   {}", read_errors);
    println!("Field updates: {}", observer.updates);

    println!("\n=== FINAL STATUS ===");
    for field in replay.status().fields().iter().filter(|f| f.last_update.is_some()) {
        println!("  {:<20} {}", field.name, field.value);
    }
}
