//! # opcattr CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/opcattr-cli/src/cli/)                    │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Node set loading, dispatch, saving (commands.rs)         │
//! │  - Text / JSON rendering with console styles (render.rs)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/opcattr/src/api.rs)                      │
//! │  - Parses attribute selectors, dispatches to the services   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward knows nothing about terminals or files on the
//! command line; the CLI owns argument parsing, node set files, logging setup and
//! rendering.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
