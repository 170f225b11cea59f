pub mod identity;
pub mod logging;
pub mod otp;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("sezamo")
        .about("Passwordless email sign-in with one-time codes")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SEZAMO_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = identity::with_args(command);
    let command = otp::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "sezamo");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Passwordless email sign-in with one-time codes".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_port_and_frontend() {
        temp_env::with_vars(
            [
                ("SEZAMO_PORT", None::<&str>),
                ("SEZAMO_FRONTEND_BASE_URL", None),
                ("SEZAMO_IDENTITY_URL", None),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec![
                    "sezamo",
                    "--port",
                    "9090",
                    "--frontend-base-url",
                    "https://app.sezamo.dev",
                    "--identity-url",
                    "https://identity.sezamo.dev",
                ]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
                assert_eq!(
                    matches
                        .get_one::<String>(otp::ARG_FRONTEND_BASE_URL)
                        .cloned(),
                    Some("https://app.sezamo.dev".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(identity::ARG_IDENTITY_URL)
                        .cloned(),
                    Some("https://identity.sezamo.dev".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_defaults() {
        temp_env::with_vars(
            [
                ("SEZAMO_PORT", None::<&str>),
                ("SEZAMO_FRONTEND_BASE_URL", None),
                ("SEZAMO_SESSION_TTL_SECONDS", None),
                ("SEZAMO_IDENTITY_URL", None),
                ("SEZAMO_IDENTITY_TIMEOUT_SECONDS", None),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["sezamo"]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
                assert_eq!(
                    matches
                        .get_one::<String>(otp::ARG_FRONTEND_BASE_URL)
                        .cloned(),
                    Some("http://localhost:3000".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(otp::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(86_400)
                );
                assert_eq!(matches.get_one::<String>(identity::ARG_IDENTITY_URL), None);
                assert_eq!(
                    matches
                        .get_one::<u64>(identity::ARG_IDENTITY_TIMEOUT_SECONDS)
                        .copied(),
                    Some(10)
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SEZAMO_PORT", Some("443")),
                ("SEZAMO_FRONTEND_BASE_URL", Some("https://app.sezamo.dev")),
                ("SEZAMO_SESSION_TTL_SECONDS", Some("3600")),
                ("SEZAMO_IDENTITY_URL", Some("https://identity.sezamo.dev")),
                ("SEZAMO_IDENTITY_TOKEN", Some("token-123")),
                ("SEZAMO_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["sezamo"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>(otp::ARG_FRONTEND_BASE_URL)
                        .cloned(),
                    Some("https://app.sezamo.dev".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(otp::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(3600)
                );
                assert_eq!(
                    matches
                        .get_one::<String>(identity::ARG_IDENTITY_TOKEN)
                        .cloned(),
                    Some("token-123".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("SEZAMO_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["sezamo"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("SEZAMO_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["sezamo".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();
                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        temp_env::with_vars([("SEZAMO_LOG_LEVEL", Some("loud"))], || {
            let command = new();
            let result = command.try_get_matches_from(vec!["sezamo"]);
            assert_eq!(
                result.map_err(|e| e.kind()),
                Err(clap::error::ErrorKind::ValueValidation)
            );
        });
    }
}
