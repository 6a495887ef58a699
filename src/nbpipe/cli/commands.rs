use super::render::{print_failures, print_messages};
use super::setup::{Cli, Commands};
use clap::Parser;
use nbpipe::api::NbApi;
use nbpipe::config::PipelineConfig;
use nbpipe::error::Result;
use nbpipe::limits::{raise_open_file_limit, OPEN_FILE_TARGET};
use nbpipe::runner::jupyter::JupyterRunner;
use nbpipe::settings::{ArchiveOverrides, ConvertOverrides};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `nbpipe=trace`.
const LOG_ENV: &str = "NBPIPE_LOG";

struct AppContext {
    api: NbApi<JupyterRunner>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context()?;

    match cli.command {
        Commands::Clean { input } => handle_clean(&ctx, input),
        Commands::Convert {
            notebook_path,
            template_file,
            index_template,
            exclude,
            include,
            report_file,
            timeout,
            jupyter,
        } => handle_convert(
            ctx,
            ConvertOverrides {
                notebook_path,
                template_file,
                index_template,
                exclude,
                include,
                report_file,
                timeout_secs: timeout,
                jupyter,
            },
        ),
        Commands::Archive {
            input,
            output,
            archive_dir,
            no_zip,
            format,
        } => handle_archive(
            &ctx,
            ArchiveOverrides {
                input,
                output,
                archive_dir,
                bundle: (!no_zip).then(|| format.into()),
            },
        ),
        Commands::PrependDate { reportfile } => handle_prepend_date(&ctx, reportfile),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "nbpipe=debug" } else { "nbpipe=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| fallback.into());

    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .try_init();
}

fn init_context() -> Result<AppContext> {
    let work_dir = std::env::current_dir()?;
    let config = PipelineConfig::load(&work_dir)?;
    let runner = JupyterRunner::new(config.jupyter.clone());

    Ok(AppContext {
        api: NbApi::new(runner, work_dir, config),
    })
}

fn handle_clean(ctx: &AppContext, input: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.clean(input)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_convert(ctx: AppContext, overrides: ConvertOverrides) -> Result<()> {
    let settings = ctx.api.convert_settings(overrides)?;
    let api = ctx
        .api
        .with_runner(JupyterRunner::new(settings.jupyter.clone()));

    if let Err(e) = raise_open_file_limit(OPEN_FILE_TARGET) {
        warn!("could not raise the open file limit: {}", e);
    }

    match api.convert(&settings) {
        Ok(result) => {
            print_messages(&result.messages);
            print_failures(result.failures());
            Ok(())
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            match serde_json::to_string_pretty(&settings) {
                Ok(json) => eprintln!("settings = {}", json),
                Err(_) => eprintln!("settings = {:?}", settings),
            }
            Err(e)
        }
    }
}

fn handle_archive(ctx: &AppContext, overrides: ArchiveOverrides) -> Result<()> {
    let result = ctx.api.archive(overrides)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_prepend_date(ctx: &AppContext, reportfile: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.prepend_date(reportfile.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}
