//! Logging setup for the CLI

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter directive to use when none is taken from the environment.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Build the log filter.
///
/// `--verbose` always wins; otherwise `RUST_LOG` is honoured when it parses,
/// falling back to `info`.
pub fn filter(verbose: bool, env_directive: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directive(verbose));
    match env_directive {
        Some(directive) if !verbose => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
        _ => fallback(),
    }
}

/// Install a stderr fmt subscriber.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init(verbose: bool) {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, env_directive.as_deref()))
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case(false, None, "info" ; "default is info")]
    #[test_case(true, None, "debug" ; "verbose is debug")]
    #[test_case(false, Some("warn"), "warn" ; "env directive used")]
    #[test_case(true, Some("warn"), "debug" ; "verbose overrides env")]
    fn filter___selects_directive(verbose: bool, env: Option<&str>, expected: &str) {
        assert_eq!(
            filter(verbose, env).to_string(),
            EnvFilter::new(expected).to_string()
        );
    }

    #[test]
    fn init___twice___does_not_panic() {
        init(false);
        init(true);
    }
}
