//! `lumen` — drive the RGB LED firmware from a console.
//!
//! Wires the real serial opener and the console front-end into the session
//! driver. All protocol behavior lives in the library crates; this binary
//! only parses flags, sets up logging, and runs the loop.

mod console;

use clap::Parser;
use console::{ConsoleStatus, SharedPanel};
use lumen_serial::SerialOpener;
use lumen_session::SessionDriver;
use simple_logger::SimpleLogger;

#[derive(Debug, Parser)]
#[command(name = "lumen", about = "RGB LED controller over a serial link")]
struct Args {
    /// List available serial ports and exit.
    #[arg(long)]
    list: bool,

    /// Open this port immediately instead of waiting for an `open` line.
    #[arg(long, value_name = "PORT")]
    port: Option<String>,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger setup failed: {e}");
    }

    if args.list {
        console::print_ports();
        return;
    }

    console::print_help();

    let panel = SharedPanel::new();
    let input = console::spawn_stdin_reader(panel.clone(), args.port);
    let mut driver = SessionDriver::new(SerialOpener, input, panel, ConsoleStatus);
    driver.run();
}
