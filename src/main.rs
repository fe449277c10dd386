use clap::{ArgGroup, Parser};
use sicl::{
    runtime::platform::StdPlatform,
    tools::diagnostics::{report_io_error, report_script_error},
    Config,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sicl")]
#[command(about = "Run a SICL program from a file or inline text", long_about = None)]
#[command(group(ArgGroup::new("program").required(true).args(["file", "inline"])))]
struct Cli {
    /// Program file to run
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Program text to run
    #[arg(short = 'i', long = "inline")]
    inline: Option<String>,

    /// Deepest allowed nesting of calls inside call arguments
    #[arg(long)]
    max_call_depth: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SICL_LOG").unwrap_or_else(|_| EnvFilter::new("sicl=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (name, source) = match (&cli.file, cli.inline) {
        (Some(path), _) => match fs::read_to_string(path) {
            Ok(source) => (path.display().to_string(), source),
            Err(err) => {
                report_io_error(path, &err);
                return ExitCode::FAILURE;
            }
        },
        (None, Some(inline)) => ("<inline>".to_string(), inline),
        (None, None) => return ExitCode::FAILURE,
    };

    let mut config = Config::from_env();
    if let Some(depth) = cli.max_call_depth {
        config = config.with_max_call_depth(depth);
    }

    match sicl::run_source(&source, config, Rc::new(StdPlatform)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_script_error(&name, &source, &err);
            ExitCode::FAILURE
        }
    }
}
