use anyhow::{Context, Result};
use clap::CommandFactory;
use std::io::Write;
use std::process::ExitCode;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::info;

mod cli;
mod error;
mod logging;
mod source;
mod summary;
mod ui;
mod util;

use crate::cli::{Cli, Config};
use crate::error::CertError;
use crate::summary::CertSummary;

/// Entry point: resolve the source, load the certificate, show it.

fn main() -> ExitCode {
    let cli = Cli::parse_normalized();

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            print_usage(&e);
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    logging::init(config.verbosity)?;

    let der = source::obtain_der(&config.source)
        .with_context(|| format!("could not obtain certificate from {}", config.source))?;
    let summary = CertSummary::from_der(&der)?;
    info!(
        subject = %summary.subject_cn,
        issuer = %summary.issuer_cn,
        dns_names = summary.dns_names.len(),
        "loaded certificate"
    );

    ui::show(config.source.header(), ui::fields_from(&summary))?;
    Ok(())
}

fn print_usage(err: &CertError) {
    eprintln!("{}", err);
    eprintln!();
    eprintln!("{}", Cli::command().render_help());
}

// Red "error:" prefix followed by the whole context chain.
fn report_error(err: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(&mut stderr, "error:");
    let _ = stderr.reset();
    let _ = writeln!(&mut stderr, " {:#}", err);
}
