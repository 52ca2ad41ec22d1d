use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub path_prefix: String,
    pub app_name: String,
    pub max_body_size: usize,
    pub db_max_connections: u32,
    pub log_level: String,
    /// Account numbers allowed to change apps, event types and levels.
    pub catalog_admins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("NOTIFICATIONS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid NOTIFICATIONS_HOST: {e}"))?;

        let port: u16 = env_or("NOTIFICATIONS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid NOTIFICATIONS_PORT: {e}"))?;

        let path_prefix = normalize_prefix(&env_or("PATH_PREFIX", "/api"));

        let app_name = env_or("APP_NAME", "notifications")
            .trim_matches('/')
            .to_string();
        if app_name.is_empty() {
            return Err("APP_NAME must not be empty".to_string());
        }

        let max_body_size: usize = env_or("NOTIFICATIONS_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid NOTIFICATIONS_MAX_BODY_SIZE: {e}"))?;

        let db_max_connections: u32 = env_or("NOTIFICATIONS_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid NOTIFICATIONS_DB_MAX_CONNECTIONS: {e}"))?;

        let log_level = env_or("NOTIFICATIONS_LOG_LEVEL", "info");

        let catalog_admins = parse_list(&env_or("NOTIFICATIONS_CATALOG_ADMINS", ""));

        Ok(Config {
            database_url,
            host,
            port,
            path_prefix,
            app_name,
            max_body_size,
            db_max_connections,
            log_level,
            catalog_admins,
        })
    }

    /// Mount point of every resource route, e.g. `/api/notifications`.
    pub fn base_path(&self) -> String {
        format!("{}/{}", self.path_prefix, self.app_name)
    }

    pub fn is_catalog_admin(&self, account_number: &str) -> bool {
        self.catalog_admins.iter().any(|a| a == account_number)
    }
}

/// Comma separated, blanks dropped.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading slash, no trailing slash. An empty prefix stays empty.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/r/insights/platform/"), "/r/insights/platform");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn base_path_joins_prefix_and_app() {
        let config = Config {
            database_url: String::new(),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            path_prefix: "/r/insights/platform".to_string(),
            app_name: "notifications".to_string(),
            max_body_size: 1024,
            db_max_connections: 1,
            log_level: "info".to_string(),
            catalog_admins: parse_list(" 0001, ,0002 "),
        };
        assert_eq!(config.base_path(), "/r/insights/platform/notifications");
        assert_eq!(config.catalog_admins, ["0001", "0002"]);
        assert!(config.is_catalog_admin("0002"));
        assert!(!config.is_catalog_admin("1234"));
    }

    #[test]
    fn empty_admin_list() {
        assert!(parse_list("").is_empty());
    }
}
