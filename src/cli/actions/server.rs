use crate::{
    api,
    api::handlers::otp::{OtpApiConfig, OtpState},
    otp::{
        OtpPolicy, OtpService,
        clock::SystemClock,
        rate_limit::{FixedWindowLimiter, MemoryRateLimitStore},
    },
    provider::{HttpIdentityClient, IdentityProvider, LogEmailSender, MemoryIdentityProvider},
};
use anyhow::Result;
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_base_url: String,
    pub session_ttl_seconds: u64,
    pub identity_url: Option<String>,
    pub identity_token: Option<SecretString>,
    pub identity_timeout: Duration,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the identity client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        frontend_base_url = %args.frontend_base_url,
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let clock = Arc::new(SystemClock);

    let provider = match &args.identity_url {
        Some(url) => IdentityProvider::Remote(HttpIdentityClient::new(
            url,
            args.identity_token.clone(),
            args.identity_timeout,
        )?),
        None => {
            // No upstream configured. Codes are minted locally and written to
            // the log, which is only useful for development.
            warn!("No identity provider URL configured, using the in-memory provider");
            IdentityProvider::Memory(MemoryIdentityProvider::new(
                clock.clone(),
                Arc::new(LogEmailSender),
            ))
        }
    };

    let limiter = FixedWindowLimiter::new(Arc::new(MemoryRateLimitStore::new()), clock);
    let service = OtpService::new(OtpPolicy::new(), limiter, provider);

    let config = OtpApiConfig::new(args.frontend_base_url)
        .with_session_ttl_seconds(args.session_ttl_seconds);
    let state = Arc::new(OtpState::new(service, config));

    api::new(args.port, state).await
}
