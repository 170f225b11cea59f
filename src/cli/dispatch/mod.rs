//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{identity, otp};
use anyhow::Result;
use std::time::Duration;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let identity_opts = identity::Options::parse(matches)?;
    let otp_opts = otp::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        frontend_base_url: otp_opts.frontend_base_url,
        session_ttl_seconds: otp_opts.session_ttl_seconds,
        identity_url: identity_opts.url,
        identity_token: identity_opts.token,
        identity_timeout: Duration::from_secs(identity_opts.timeout_seconds),
    }))
}
