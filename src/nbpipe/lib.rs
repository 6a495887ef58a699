//! # nbpipe Architecture
//!
//! nbpipe drives the nightly validation-notebook pipeline: it executes every notebook in a
//! tree, renders each to HTML, records the outcome as a JUnit report, builds an index page,
//! publishes the HTML to a local archive and a dated central store, and cleans up after
//! itself. The binary is one client; the library makes no terminal assumptions.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints messages, sets the exit code    │
//! │  - Initializes logging and process limits                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves settings from overrides, config and defaults    │
//! │  - Supplies the clock, dispatches to commands               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - clean, convert, archive, stamp                           │
//! │  - Returns CmdResult with messages, never prints            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Runner Layer (runner/)                                     │
//! │  - NotebookRunner trait                                     │
//! │  - JupyterRunner (production), ScriptedRunner (testing)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pipeline Order
//!
//! A nightly run is `clean`, `convert`, `archive`, then `prepend-date` on the report once
//! the CI system has consumed it. Every stage is idempotent against its own output: `clean`
//! only removes what `convert` produces, and `archive` rebuilds the local archive from
//! scratch each time.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per pipeline stage
//! - [`runner`]: External notebook execution and rendering
//! - [`settings`]: Per-command settings resolution
//! - [`config`]: `nbpipe.json` and built-in defaults
//! - [`patterns`]: Include/exclude glob lists
//! - [`report`]: JUnit XML output
//! - [`index`]: HTML index page
//! - [`notebook`]: Reading notebook metadata
//! - [`bundle`]: Zip and tar.gz snapshots of the archive
//! - [`limits`]: Process resource limits
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod bundle;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod limits;
pub mod notebook;
pub mod patterns;
pub mod report;
pub mod runner;
pub mod settings;
