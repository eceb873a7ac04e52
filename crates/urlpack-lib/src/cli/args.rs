use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber;

#[derive(Debug, Clone)]
pub enum Command {
    Fetch {
        input_path: String,
        output_path: String,
        config_path: Option<String>,
        report_path: Option<String>,
        overrides: ConfigOverrides,
    },
    Check {
        input_path: String,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub concurrency: Option<usize>,
    pub no_fallback: bool,
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "urlpack",
    version,
    about = "Fetch a list of URLs into a single ZIP archive, renaming every file and converting images to PNG"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Download every listed URL and pack the results into one archive
    Fetch {
        #[arg(
            short = 'i',
            long = "input",
            value_name = "FILE",
            help = "List of `url, name` lines; use - for stdin",
            default_value = "-"
        )]
        input: String,

        #[arg(
            short = 'o',
            long = "output",
            value_name = "FILE",
            help = "Sets the output archive path",
            default_value = "files.zip"
        )]
        output: String,

        #[arg(
            short = 'c',
            long = "config",
            value_name = "FILE",
            help = "Optional config file with fetch, retry, batch and access path settings"
        )]
        config: Option<String>,

        #[arg(
            short = 'r',
            long = "report",
            value_name = "FILE",
            help = "Writes a JSON report of processed and failed items"
        )]
        report: Option<String>,

        #[arg(
            long = "timeout-secs",
            value_name = "SECS",
            help = "Timeout for each individual request"
        )]
        timeout_secs: Option<u64>,

        #[arg(
            long = "max-retries",
            value_name = "N",
            help = "Retries per item after the first attempt"
        )]
        max_retries: Option<u32>,

        #[arg(
            long = "retry-delay-ms",
            value_name = "MS",
            help = "Base delay before the first retry; doubles on every further retry"
        )]
        retry_delay_ms: Option<u64>,

        #[arg(
            long = "concurrency",
            value_name = "N",
            help = "Maximum number of items downloaded at once"
        )]
        concurrency: Option<usize>,

        #[arg(
            long = "no-fallback",
            help = "Only request URLs directly, never through access paths"
        )]
        no_fallback: bool,
    },

    /// Validate a URL list without downloading anything
    Check {
        #[arg(
            short = 'i',
            long = "input",
            value_name = "FILE",
            help = "List of `url, name` lines; use - for stdin",
            default_value = "-"
        )]
        input: String,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .init();

    let command = match cli.command {
        CliCommand::Fetch {
            input,
            output,
            config,
            report,
            timeout_secs,
            max_retries,
            retry_delay_ms,
            concurrency,
            no_fallback,
        } => Command::Fetch {
            input_path: input,
            output_path: output,
            config_path: config,
            report_path: report,
            overrides: ConfigOverrides {
                timeout_secs,
                max_retries,
                retry_delay_ms,
                concurrency,
                no_fallback,
            },
        },
        CliCommand::Check { input } => Command::Check { input_path: input },
    };

    Args { command, log_level }
}
