#![cfg(not(tarpaulin_include))]

use pubdash::app::{self, RunConfig};
use std::env;

/// Main entry point for the dashboard server
///
/// Reads the workbook path, optional banner image path and bind address from
/// the command line, falling back to defaults, then starts the web
/// application.
///
/// # Arguments
/// * `argv[1]` - Workbook path (default `publications.xlsx`)
/// * `argv[2]` - Banner image path (default `banner.png`)
/// * `argv[3]` - Bind address (default `127.0.0.1:3000`)
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let workbook = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "publications.xlsx".to_string());
    let banner = args.get(2).cloned().unwrap_or_else(|| "banner.png".to_string());
    let bind = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| "127.0.0.1:3000".to_string());

    println!("Starting dashboard server for workbook {}", workbook);
    app::run(RunConfig {
        workbook: workbook.into(),
        banner: Some(banner.into()),
        bind,
    })
    .await
}
