//! Clap derive structures for the `pgwstatus` CLI.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;

/// pgwstatus -- status report for process-control gateways
#[derive(Debug, Parser)]
#[command(
    name = "pgwstatus",
    version,
    about = "Report connections, cached PVs, and transfer rates of gateways",
    long_about = "Queries each named gateway's status points through the status bridge\n\
        and prints the devices it talks to, the PVs it caches with their access\n\
        details, and its byte-rate tables. Gateways are reported in argument order."
)]
pub struct Cli {
    /// Also show reverse-direction request rates
    #[arg(short = 'r', long = "request-rates")]
    pub request_rates: bool,

    /// Maximum rows for host and PV rate tables
    #[arg(short = 'm', long = "max", value_name = "N")]
    pub max: Option<usize>,

    /// Maximum rows for host rate tables
    #[arg(short = 'c', long = "max-hosts", value_name = "N")]
    pub max_hosts: Option<usize>,

    /// Maximum rows for PV rate tables
    #[arg(short = 'p', long = "max-pvs", value_name = "N")]
    pub max_pvs: Option<usize>,

    /// Status bridge base URL (overrides the config file)
    #[arg(long, env = "GWSTATUS_URL", value_name = "URL")]
    pub url: Option<String>,

    /// Accept self-signed TLS certificates from the bridge
    #[arg(long, short = 'k', env = "GWSTATUS_INSECURE")]
    pub insecure: bool,

    /// Config file to read instead of the platform default
    #[arg(long, env = "GWSTATUS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Gateway name prefixes, reported left to right
    #[arg(
        required = true,
        value_name = "GATEWAY",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub gateways: Vec<String>,
}
