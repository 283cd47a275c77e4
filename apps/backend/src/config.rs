//! Environment configuration

use std::path::PathBuf;

/// Server configuration read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding bundled word lists.
    pub word_list_dir: PathBuf,
    /// Sessions kept in memory before the least recently used is dropped.
    pub max_sessions: usize,
    /// Default for sessions that don't say whether to auto-speak.
    pub auto_speak: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            word_list_dir: PathBuf::from("word-lists"),
            max_sessions: 1000,
            auto_speak: false,
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT`, `WORD_LIST_DIR`, `MAX_SESSIONS` and `AUTO_SPEAK`,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a port number, got {value:?}"))?,
            None => defaults.port,
        };

        let max_sessions = match lookup("MAX_SESSIONS") {
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => anyhow::bail!("MAX_SESSIONS must be a positive integer, got {value:?}"),
            },
            None => defaults.max_sessions,
        };

        let auto_speak = match lookup("AUTO_SPEAK").as_deref() {
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") | None => false,
            Some(other) => anyhow::bail!("AUTO_SPEAK must be true or false, got {other:?}"),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            word_list_dir: lookup("WORD_LIST_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.word_list_dir),
            max_sessions,
            auto_speak,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.max_sessions, 1000);
        assert!(!config.auto_speak);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("WORD_LIST_DIR", "/srv/lists"),
            ("MAX_SESSIONS", "5"),
            ("AUTO_SPEAK", "true"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.word_list_dir, PathBuf::from("/srv/lists"));
        assert_eq!(config.max_sessions, 5);
        assert!(config.auto_speak);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MAX_SESSIONS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("AUTO_SPEAK", "maybe")])).is_err());
    }
}
