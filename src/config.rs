use clap::Parser;
use url::Url;

#[derive(Debug, Parser, Clone)]
#[command(name = "followup-relay")]
#[command(about = "Drives the notification-response relay over a simulated host surface")]
pub struct Config {
    /// Origin the agent is scoped to; clients and launch URLs derive from it.
    #[arg(long, default_value = "https://app.local")]
    pub origin: Url,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Suppress the JSON side-effect events on stdout.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::Config;
    use clap::Parser;

    #[test]
    fn defaults_hold() {
        let cfg = Config::parse_from(["followup-relay"]);
        assert_eq!(cfg.origin.as_str(), "https://app.local/");
        assert_eq!(cfg.log_level, "info");
        assert!(!cfg.quiet);
    }

    #[test]
    fn origin_must_be_a_url() {
        assert!(Config::try_parse_from(["followup-relay", "--origin", "not a url"]).is_err());
    }
}
