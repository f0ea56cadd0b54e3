//! Page navigation targets

use serde::Serialize;
use std::fmt;
use url::Url;

use crate::error::ApiError;

/// Screen shown while the manager reconnects to the server
pub const LOADING_PATH: &str = "/loading";
/// Landing screen after a successful connect-check
pub const HOME_PATH: &str = "/";
/// Per-client statistics screen
pub const STATS_PATH: &str = "/stats_screen";
/// Shuts the manager down from the loading screen
pub const EXIT_PATH: &str = "/exit";

/// A path on the manager frontend plus query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Navigation {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn loading() -> Self {
        Self::to(LOADING_PATH)
    }

    pub fn home() -> Self {
        Self::to(HOME_PATH)
    }

    pub fn exit() -> Self {
        Self::to(EXIT_PATH)
    }

    /// Stats screen of one client, used for the manual refresh
    pub fn stats(client_name: &str) -> Self {
        Self::to(STATS_PATH).with_query("client_name", client_name)
    }

    /// Absolute URL against the frontend base
    pub fn resolve(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.join(self.path.trim_start_matches('/'))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// A redirect target sent by the backend, which may carry its own query
impl From<&str> for Navigation {
    fn from(target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let query = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self {
            path: path.to_string(),
            query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_refresh_target() {
        let nav = Navigation::stats("alice");
        assert_eq!(nav.to_string(), "/stats_screen?client_name=alice");
    }

    #[test]
    fn test_resolve_encodes_query() {
        let base = Url::parse("http://127.0.0.1:5000/").unwrap();
        let url = Navigation::stats("a b").resolve(&base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/stats_screen?client_name=a+b");
    }

    #[test]
    fn test_display_encodes_query_values() {
        let nav = Navigation::stats("a&b c");
        assert_eq!(nav.to_string(), "/stats_screen?client_name=a%26b+c");
        assert_eq!(Navigation::from(nav.to_string().as_str()), nav);
    }

    #[test]
    fn test_exit_target() {
        assert_eq!(Navigation::exit().to_string(), "/exit");
        let base = Url::parse("http://127.0.0.1:5000/").unwrap();
        assert_eq!(Navigation::exit().resolve(&base).unwrap().as_str(), "http://127.0.0.1:5000/exit");
    }

    #[test]
    fn test_from_backend_redirect() {
        let nav = Navigation::from("/loading");
        assert_eq!(nav, Navigation::loading());

        let nav = Navigation::from("/stats_screen?client_name=bob");
        assert_eq!(nav, Navigation::stats("bob"));
    }
}
