use anyhow::Result;
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_IDENTITY_URL: &str = "identity-url";
pub const ARG_IDENTITY_TOKEN: &str = "identity-token";
pub const ARG_IDENTITY_TIMEOUT_SECONDS: &str = "identity-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDENTITY_URL)
                .long(ARG_IDENTITY_URL)
                .help("Identity provider base URL (unset runs the in-memory provider)")
                .env("SEZAMO_IDENTITY_URL"),
        )
        .arg(
            Arg::new(ARG_IDENTITY_TOKEN)
                .long(ARG_IDENTITY_TOKEN)
                .help("Bearer token for the identity provider API")
                .env("SEZAMO_IDENTITY_TOKEN"),
        )
        .arg(
            Arg::new(ARG_IDENTITY_TIMEOUT_SECONDS)
                .long(ARG_IDENTITY_TIMEOUT_SECONDS)
                .help("Timeout for identity provider requests in seconds")
                .env("SEZAMO_IDENTITY_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}

/// Parsed identity provider options.
pub struct Options {
    pub url: Option<String>,
    pub token: Option<SecretString>,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if the timeout argument is missing its default.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        Ok(Self {
            url: matches.get_one::<String>(ARG_IDENTITY_URL).cloned(),
            token: matches
                .get_one::<String>(ARG_IDENTITY_TOKEN)
                .map(|token| SecretString::from(token.clone())),
            timeout_seconds: matches
                .get_one::<u64>(ARG_IDENTITY_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(10),
        })
    }
}
