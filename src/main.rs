use anyhow::{Context, Result};
use clap::Parser;
use bootlag::cli::{Cli, OutputFormat};
use bootlag::{analyzer, json_output, ssh::SshExecutor, text_output};
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run(args: &Cli) -> Result<()> {
    let config = args.ssh_config()?;

    let executor = SshExecutor::connect(&config)?;
    let result = analyzer::analyze_and_close(executor, &config.hostname, &config.username)?;

    let rendered = match args.format {
        OutputFormat::Json => json_output::to_json(&result)?,
        OutputFormat::Text => text_output::render_text(&result),
    };

    match &args.output_file {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => println!("{}", rendered.trim_end()),
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
