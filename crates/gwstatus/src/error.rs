//! CLI error types with miette diagnostics.
//!
//! Anything that stops the run before the first gateway is contacted ends
//! up here. Per-gateway failures are part of the report and never reach it.

use miette::Diagnostic;
use thiserror::Error;

use gwstatus_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pgwstatus::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Could not load configuration: {source}")]
    #[diagnostic(
        code(pgwstatus::config),
        help("Check the config file at {path}; keys are url, insecure, and ca_cert.")
    )]
    Config {
        path: String,
        #[source]
        source: Box<figment::Error>,
    },

    // ── Transport ────────────────────────────────────────────────────
    #[error("Could not set up the status bridge client")]
    #[diagnostic(
        code(pgwstatus::transport),
        help("Check --url and the ca_cert setting, or use --insecure (-k) for self-signed bridges.")
    )]
    Transport(#[from] gwstatus_api::Error),

    // ── Session / IO ─────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(pgwstatus::session))]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::Transport(_) | Self::Core(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}
