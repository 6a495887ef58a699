use clap::{Parser, Subcommand, ValueEnum};
use nbpipe::bundle::BundleFormat;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.4.2" for releases, "0.4.2@abc1234 2024-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("NBPIPE_GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("NBPIPE_COMMIT_DATE");
    const IS_RELEASE: &str = env!("NBPIPE_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "nbpipe", bin_name = "nbpipe", version = get_version())]
#[command(about = "Execute, index, archive and clean validation notebooks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug output on stderr (overridden by NBPIPE_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Zip,
    TarGz,
}

impl From<FormatArg> for BundleFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Zip => BundleFormat::Zip,
            FormatArg::TarGz => BundleFormat::TarGz,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove executed notebooks, HTML output, the index and the report
    #[command(display_order = 1)]
    Clean {
        /// Notebook directory to clean
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,
    },

    /// Execute and render notebooks, then write the JUnit report and index.html
    #[command(display_order = 2)]
    Convert {
        /// Root of the notebook tree to convert
        #[arg(long, value_name = "DIR")]
        notebook_path: Option<PathBuf>,

        /// nbconvert HTML template (defaults to ./nb_html.tpl when present)
        #[arg(long, value_name = "FILE")]
        template_file: Option<PathBuf>,

        /// Index page template (defaults to ./index.tpl when present)
        #[arg(long, value_name = "FILE")]
        index_template: Option<PathBuf>,

        /// Comma-separated notebooks to skip; replaces ./exclude_notebooks
        #[arg(long, value_name = "LIST")]
        exclude: Option<String>,

        /// Comma-separated notebooks to convert, everything else is skipped
        #[arg(long, value_name = "LIST")]
        include: Option<String>,

        /// Where to write the JUnit report
        #[arg(long, value_name = "FILE")]
        report_file: Option<PathBuf>,

        /// Per-notebook execution timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Program used to run nbconvert
        #[arg(long, value_name = "PROGRAM")]
        jupyter: Option<String>,
    },

    /// Copy HTML output to the local archive and the dated central store
    #[command(display_order = 3)]
    Archive {
        /// Notebook directory to collect HTML from
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,

        /// Central store directory (defaults to <central base>/<today>)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Local archive directory, emptied on every run
        #[arg(
            short = 'a',
            long = "archive_dir",
            alias = "archive-dir",
            value_name = "DIR"
        )]
        archive_dir: Option<PathBuf>,

        /// Do not write the dated bundle of the archive
        #[arg(short = 'z', long)]
        no_zip: bool,

        /// Bundle format
        #[arg(long, value_enum, default_value = "zip")]
        format: FormatArg,
    },

    /// Rename a report to report-YYYY-MM-DD-HH-MM-SS.xml
    #[command(alias = "stamp", display_order = 4)]
    PrependDate {
        /// Report file to rename
        #[arg(long, value_name = "FILE")]
        reportfile: Option<PathBuf>,
    },
}
