//! CLI tool for tablegrid - describes an HTML table and outputs JSON
//!
//! Usage:
//!   tablegrid_cli <input.html>                     # Output JSON to stdout
//!   tablegrid_cli <input.html> -o out.json         # Output JSON to file
//!   tablegrid_cli <input.html> --corner-width 450  # Resize from the se corner first
//!
//! Set `RUST_LOG=tablegrid=debug` to trace the resize engine.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use tablegrid::report::describe;
use tablegrid::TableResizer;
use tracing_subscriber::EnvFilter;

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: tablegrid_cli <input.html> [-o output.json] [--corner-width PX]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = flag_value(&args, "-o");
    let corner_width = match flag_value(&args, "--corner-width").map(|w| w.parse::<f64>()) {
        Some(Ok(w)) => Some(w),
        Some(Err(e)) => {
            eprintln!("Invalid --corner-width: {}", e);
            std::process::exit(1);
        }
        None => None,
    };

    // Read input file
    let markup = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let mut resizer = match TableResizer::create(&markup, "") {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading table: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(width) = corner_width {
        resizer.resize_start("corner-se");
        resizer.resize_end("corner-se", width);
        eprintln!("{}", resizer.html());
    }

    let report = describe(
        resizer.document(),
        &tablegrid::DeclaredLayout::default(),
        resizer.table(),
    );

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
