//! # CLI Behavior
//!
//! One possible client for nbpipe, and the only place that knows about terminal I/O, exit
//! codes and logging setup. For the overall architecture see the library crate docs.
//!
//! ## Working Directory
//!
//! Every relative path (arguments, `nbpipe.json`, `exclude_notebooks`, the templates, the
//! index and the report) is resolved against the directory nbpipe is started from. CI jobs
//! are expected to `cd` into the checkout first.
//!
//! ## Output
//!
//! Command messages go to stdout, colored by level. Diagnostics from `tracing` go to
//! stderr. A failed conversion also dumps the resolved settings as JSON to stderr so the
//! CI log shows exactly what was attempted.
//!
//! ## Module Structure
//!
//! - `commands`: `run()`, context setup and per-command handlers
//! - `render`: Message and failure printing
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
