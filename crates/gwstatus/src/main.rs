mod cli;
mod config;
mod error;

use std::io::{self, Write};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gwstatus_api::StatusClient;
use gwstatus_core::{
    AddressResolver, GatewayIdentity, GatewayStatusSession, ReportConfig, StatusContext,
    SystemLookup,
};

use crate::cli::Cli;
use crate::error::{CliError, exit_code};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Usage errors exit 1; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { exit_code::USAGE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // The report owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::load_config(cli.config.as_deref())?;
    let (base_url, transport) = config::resolve_transport(&settings, &cli)?;
    let report = config::report_config(&cli);

    // Reject bad names before any gateway is contacted.
    let gateways = cli
        .gateways
        .iter()
        .map(GatewayIdentity::new)
        .collect::<Result<Vec<_>, _>>()?;

    let client = StatusClient::new(base_url, &transport)?;
    debug!(url = %client.base_url(), ?report, "status bridge ready");
    let context = StatusContext::new(client, AddressResolver::system());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report_all(&context, &report, gateways, &mut out).await?;
    out.flush()?;
    Ok(())
}

/// One session per gateway, strictly in order. Unreachable gateways are
/// part of the report, not a failure of the run.
async fn report_all<W: Write>(
    context: &StatusContext<StatusClient, SystemLookup>,
    report: &ReportConfig,
    gateways: Vec<GatewayIdentity>,
    out: &mut W,
) -> Result<(), CliError> {
    for identity in gateways {
        let name = identity.to_string();
        let mut session = GatewayStatusSession::new(context, report);
        let outcome = session.run(identity, out).await?;
        debug!(gateway = %name, ?outcome, "gateway finished");
    }
    Ok(())
}
