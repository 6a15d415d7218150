use std::path::PathBuf;

/// Where to listen and what to serve.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let default = Self::default();

        Self {
            bind_addr: var("DCA_BIND_ADDR").unwrap_or(default.bind_addr),
            static_dir: var("DCA_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.static_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert!(config.static_dir.ends_with("static"));
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "DCA_BIND_ADDR" => Some("0.0.0.0:3000".to_string()),
            "DCA_STATIC_DIR" => Some("/srv/dca".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, PathBuf::from("/srv/dca"));
    }
}
