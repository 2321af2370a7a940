//! # CLI Behavior
//!
//! One possible client of the attribute services. The CLI is the only place that
//! knows about terminal I/O, exit codes and output formatting.
//!
//! ## Node Sets
//!
//! Every command that touches nodes loads the JSON node set named by `--nodeset`
//! (default `nodeset.json`) into a memory store. `write` saves the set back only
//! when the write came back `Good`.
//!
//! ## Commands
//!
//! - `opcattr attrs`: the attribute legality table
//! - `opcattr init [--force]`: write the sample boiler address space
//! - `opcattr read <node-id> <attribute>...`: one result per attribute, in order
//! - `opcattr write <node-id> <attribute> <variant-json>`: e.g. `'{"Double": 42.0}'`
//!
//! Attributes are names (`Value`, `writemask`) or wire ids (`13`).
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing-subscriber`. The filter comes from
//! `OPCATTR_LOG` when set, otherwise `warn` (`debug` with `-v`).
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Text and JSON output
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
