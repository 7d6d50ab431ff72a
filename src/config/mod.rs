//! Configuration module for the client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

const DEFAULT_AUTH_URL: &str = "https://functions.poehali.dev/62fd37d2-dd57-4aff-917e-f6e0383e053a";
const DEFAULT_ADMIN_URL: &str = "https://functions.poehali.dev/c4d39ba1-426b-4d95-a69e-665aab9bb8a5";
const DEFAULT_FORUM_URL: &str = "https://functions.poehali.dev/02f07658-38aa-47be-a11b-1292bb92d87e";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the authentication service
    pub auth_url: String,
    /// Base URL of the administration service
    pub admin_url: String,
    /// Base URL of the forum service
    pub forum_url: String,
    /// Path to the SQLite file holding the persisted session
    pub storage_path: PathBuf,
    /// Identity sent in `X-Admin-Id` when listing factions
    pub directory_admin_id: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let auth_url = env::var("TOWN_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string());
        let admin_url =
            env::var("TOWN_ADMIN_URL").unwrap_or_else(|_| DEFAULT_ADMIN_URL.to_string());
        let forum_url =
            env::var("TOWN_FORUM_URL").unwrap_or_else(|_| DEFAULT_FORUM_URL.to_string());

        let storage_path = env::var("TOWN_STORAGE_PATH")
            .unwrap_or_else(|_| "./data/client.sqlite".to_string())
            .into();

        let directory_admin_id =
            env::var("TOWN_DIRECTORY_ADMIN_ID").unwrap_or_else(|_| "1".to_string());

        let log_level = env::var("TOWN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            auth_url,
            admin_url,
            forum_url,
            storage_path,
            directory_admin_id,
            log_level,
        }
    }

    /// Configuration pointing all three services at one host, as the test
    /// stubs and local deployments lay them out (`/auth`, `/admin`, `/forum`).
    pub fn for_host(base_url: &str, storage_path: PathBuf) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            auth_url: format!("{}/auth", base),
            admin_url: format!("{}/admin", base),
            forum_url: format!("{}/forum", base),
            storage_path,
            directory_admin_id: "1".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("TOWN_AUTH_URL");
        env::remove_var("TOWN_ADMIN_URL");
        env::remove_var("TOWN_FORUM_URL");
        env::remove_var("TOWN_STORAGE_PATH");
        env::remove_var("TOWN_DIRECTORY_ADMIN_ID");
        env::remove_var("TOWN_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.admin_url, DEFAULT_ADMIN_URL);
        assert_eq!(config.forum_url, DEFAULT_FORUM_URL);
        assert_eq!(config.storage_path, PathBuf::from("./data/client.sqlite"));
        assert_eq!(config.directory_admin_id, "1");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_for_host_layout() {
        let config = Config::for_host("http://127.0.0.1:9000/", PathBuf::from("/tmp/x.sqlite"));

        assert_eq!(config.auth_url, "http://127.0.0.1:9000/auth");
        assert_eq!(config.admin_url, "http://127.0.0.1:9000/admin");
        assert_eq!(config.forum_url, "http://127.0.0.1:9000/forum");
    }
}
