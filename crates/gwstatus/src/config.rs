//! CLI-owned configuration: TOML file, environment, and flag overrides,
//! translated into a transport setup and a `ReportConfig`.
//!
//! Core never sees these types -- it receives a built client and a
//! `ReportConfig`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use gwstatus_api::{TlsMode, TransportConfig};
use gwstatus_core::{FETCH_TIMEOUT, ReportConfig, ReportLimits};

use crate::cli::Cli;
use crate::error::CliError;

// ── TOML config ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Status bridge base URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Accept self-signed bridge certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:8080".into()
}

// ── Loading ──────────────────────────────────────────────────────────

/// Platform config file, e.g. `~/.config/pgwstatus/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "gwstatus", "pgwstatus")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Defaults, then the config file (if any), then `GWSTATUS_*` variables.
///
/// A missing file is not an error; a malformed one is.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, CliError> {
    let path = explicit.map(Path::to_path_buf).or_else(config_path);

    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
    if let Some(ref path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed("GWSTATUS_").only(&["url", "insecure", "ca_cert"]));

    figment.extract().map_err(|err| CliError::Config {
        path: path.map_or_else(|| "(none)".into(), |p| p.display().to_string()),
        source: Box::new(err),
    })
}

// ── Translation ──────────────────────────────────────────────────────

/// Bridge URL and transport settings (flag > env > file > default).
pub fn resolve_transport(config: &Config, cli: &Cli) -> Result<(Url, TransportConfig), CliError> {
    let url_str = cli.url.as_deref().unwrap_or(&config.url);
    let url: Url = url_str.parse().map_err(|err| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL '{url_str}': {err}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::Validation {
            field: "url".into(),
            reason: format!("expected an http or https URL, got '{url_str}'"),
        });
    }

    let tls = if cli.insecure || config.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = config.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok((
        url,
        TransportConfig {
            tls,
            timeout: FETCH_TIMEOUT,
        },
    ))
}

/// Row caps and the reverse-rate switch, shared by every gateway.
pub fn report_config(cli: &Cli) -> ReportConfig {
    ReportConfig {
        show_request_rates: cli.request_rates,
        limits: ReportLimits {
            global: cli.max,
            hosts: cli.max_hosts,
            items: cli.max_pvs,
        },
    }
}
