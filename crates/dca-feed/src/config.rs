use crate::error::FeedError;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const YAHOO_URL: &str = "https://query1.finance.yahoo.com";
pub const TWELVE_DATA_URL: &str = "https://api.twelvedata.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Yahoo,
    TwelveData,
}

impl FromStr for ProviderKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" | "yahoo-finance" | "yahoo_finance" => Ok(Self::Yahoo),
            "twelvedata" | "twelve-data" | "twelve_data" => Ok(Self::TwelveData),
            other => Err(FeedError::Config(format!("unknown provider {other:?}"))),
        }
    }
}

/// Everything a provider needs, resolved once at start-up and handed to the
/// provider's constructor.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub provider: ProviderKind,
    pub twelve_data_key: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub search_limit: usize,
    pub yahoo_url: Url,
    pub twelve_data_url: Url,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            twelve_data_key: None,
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search_limit: DEFAULT_SEARCH_LIMIT,
            yahoo_url: Url::parse(YAHOO_URL).expect("valid constant url"),
            twelve_data_url: Url::parse(TWELVE_DATA_URL).expect("valid constant url"),
        }
    }
}

fn default_user_agent() -> String {
    format!("dca/{}", env!("CARGO_PKG_VERSION"))
}

impl FeedConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, FeedError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset or blank keys fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(provider) = var("DCA_PROVIDER") {
            config.provider = provider.parse()?;
        }
        config.twelve_data_key = var("TWELVEDATA_KEY");
        if let Some(user_agent) = var("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = var("DCA_HTTP_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|e| FeedError::Config(format!("DCA_HTTP_TIMEOUT_SECS: {e}")))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = var("DCA_SEARCH_LIMIT") {
            config.search_limit = limit
                .trim()
                .parse::<usize>()
                .map_err(|e| FeedError::Config(format!("DCA_SEARCH_LIMIT: {e}")))?;
        }
        if let Some(url) = var("DCA_YAHOO_URL") {
            config.yahoo_url = Url::parse(&url)?;
        }
        if let Some(url) = var("DCA_TWELVEDATA_URL") {
            config.twelve_data_url = Url::parse(&url)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = FeedConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.provider, ProviderKind::Yahoo);
        assert_eq!(config.twelve_data_key, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.search_limit, 10);
        assert!(config.user_agent.starts_with("dca/"));
        assert_eq!(config.yahoo_url.as_str(), "https://query1.finance.yahoo.com/");
    }

    #[test]
    fn values_override_defaults() {
        let config = FeedConfig::from_lookup(lookup(&[
            ("DCA_PROVIDER", "TwelveData"),
            ("TWELVEDATA_KEY", "abc123"),
            ("USER_AGENT", "me@example.com"),
            ("DCA_HTTP_TIMEOUT_SECS", "3"),
            ("DCA_TWELVEDATA_URL", "http://localhost:9000"),
        ]))
        .unwrap();

        assert_eq!(config.provider, ProviderKind::TwelveData);
        assert_eq!(config.twelve_data_key.as_deref(), Some("abc123"));
        assert_eq!(config.user_agent, "me@example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.twelve_data_url.as_str(), "http://localhost:9000/");
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = FeedConfig::from_lookup(lookup(&[("TWELVEDATA_KEY", "  ")])).unwrap();
        assert_eq!(config.twelve_data_key, None);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(matches!(
            FeedConfig::from_lookup(lookup(&[("DCA_PROVIDER", "bloomberg")])),
            Err(FeedError::Config(_))
        ));
        assert!(matches!(
            FeedConfig::from_lookup(lookup(&[("DCA_HTTP_TIMEOUT_SECS", "soon")])),
            Err(FeedError::Config(_))
        ));
        assert!(matches!(
            FeedConfig::from_lookup(lookup(&[("DCA_YAHOO_URL", "not a url")])),
            Err(FeedError::Url(_))
        ));
    }
}
