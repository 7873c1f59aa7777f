//! Drive a board from a sensor stream on stdin.
//!
//! Demonstrates:
//!   1. Creating a Board and handing its CommandHandle to a SensorFeed
//!   2. Reading the sensor stream on a background thread
//!   3. Running a fixed-rate frame loop that drains sensor hits
//!   4. Printing motion events as the agent walks
//!
//! Each line on stdin is a cell index (`4`) or a labelled hit (`SENSOR,4`).
//! The program exits once stdin closes and the agent is idle.
//!
//! Run with:
//!   printf '4\n0\nSENSOR,1\n' | RUST_LOG=debug cargo run --example sensor_console

use std::io;
use std::thread;
use std::time::Duration;

use gridbot_core::CellIndex;
use gridbot_engine::{Board, BoardConfig, MotionEvent, SensorFeed};

// ─── Board parameters ───────────────────────────────────────────

const SIZE: u32 = 3;
const START: CellIndex = CellIndex(4);
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let mut config = BoardConfig::with_size(SIZE);
    config.start_cell = START;
    let mut board = match Board::new(config) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("invalid board config: {e}");
            std::process::exit(1);
        }
    };

    let mut feed = SensorFeed::new(board.command_handle());
    if let Err(e) = feed.spawn_reader(io::stdin()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    println!("{SIZE}x{SIZE} board, agent on cell {START}; reading hits from stdin");

    loop {
        feed.poll();
        let report = board.frame(FRAME_DT);

        for receipt in &report.receipts {
            if let Some(reason) = receipt.reason {
                println!("  rejected cell {}: {reason}", receipt.command.target);
            }
        }
        for event in &report.events {
            match event {
                MotionEvent::Started { from, to, .. } => println!("  walking {from} -> {to}"),
                MotionEvent::Preempted { target, .. } => println!("  gave up on {target}"),
                MotionEvent::Completed { cell, .. } => {
                    let lit: Vec<String> = board
                        .grid()
                        .cells()
                        .filter(|&c| board.is_highlighted(c))
                        .map(|c| c.to_string())
                        .collect();
                    println!("  arrived at {cell}; next: [{}]", lit.join(", "));
                }
            }
        }

        if !feed.status().connected && board.transition().is_none() {
            break;
        }
        thread::sleep(Duration::from_secs_f32(FRAME_DT));
    }

    let status = feed.status();
    let metrics = board.metrics();
    println!(
        "done: {} lines, {} submitted, {} accepted, {} rejected, {} malformed, {} out of range",
        status.lines,
        status.submitted,
        metrics.commands_accepted,
        metrics.commands_rejected,
        status.parse_failures,
        status.out_of_range,
    );
}
