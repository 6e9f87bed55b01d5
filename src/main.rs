use std::io::{self, Write};
use std::process::ExitCode;

use darknet_smoke::config::init_dotenv;
use darknet_smoke::{report, wiring, BootstrapError, CliArgs, ConsoleEventLog, HarnessConfig, USAGE};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
                                                          .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")))
                                     .with_writer(io::stderr)
                                     .try_init();
}

fn run() -> Result<u8, BootstrapError> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(0);
    }
    init_dotenv();
    let cfg = HarnessConfig::from_env()?.apply_cli(&args)?;
    let engine = wiring::probe_engine(&cfg)?;

    // Con --json stdout queda reservado al registro de resultado.
    let console: Box<dyn Write> = if args.json { Box::new(io::stderr()) } else { Box::new(io::stdout()) };
    let run = wiring::build_driver(&cfg, &engine, ConsoleEventLog::new(console)).run();
    Ok(report::publish_outcome(&run.outcome, args.json, args.result_file.as_deref()))
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("[darknet-smoke] {e}");
            if matches!(e, BootstrapError::Cli(_)) {
                eprintln!("{USAGE}");
            }
            ExitCode::from(2)
        }
    }
}
