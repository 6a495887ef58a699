//! # nbpipe CLI
//!
//! The binary is intentionally thin: argument parsing, dispatch and printing live in
//! `src/nbpipe/cli/`, and this file only invokes `cli::run()` and turns an error into a
//! non-zero exit status.
//!
//! ```text
//! nbpipe clean                   remove exec_*.ipynb, *.html, index.html, junit_report.xml
//! nbpipe convert                 execute + render notebooks, write report and index
//! nbpipe archive                 copy HTML to html_archive/ and the dated central store
//! nbpipe prepend-date --reportfile junit_report.xml
//! ```
//!
//! Logging goes to stderr and is controlled by `NBPIPE_LOG` (an `EnvFilter` directive);
//! `-v` turns on debug output when the variable is unset.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
