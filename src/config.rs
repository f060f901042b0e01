use std::env;

use chrono::FixedOffset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // Shared-secret authentication; `None` leaves /api open
    pub api_key: Option<String>,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting (one token replenished every `*_period_seconds`)
    pub disable_rate_limiting: bool,
    pub rate_limit_api_period_seconds: u64,
    pub rate_limit_api_burst: u32,
    pub rate_limit_report_period_seconds: u64,
    pub rate_limit_report_burst: u32,

    // Reports
    pub report_utc_offset_minutes: i32,

    // Application metadata
    pub deployment: Deployment,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// or `ConfigError::Invalid` if the report offset is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            api_key: env::var("API_KEY").ok().filter(|k| !k.trim().is_empty()),

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            // Rate limiting: 100 requests / 15 min, 10 reports / hour
            disable_rate_limiting: env::var("DISABLE_RATE_LIMITING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit_api_period_seconds: env::var("RATE_LIMIT_API_PERIOD_SECONDS")
                .unwrap_or_else(|_| "9".to_string())
                .parse()
                .unwrap_or(9),
            rate_limit_api_burst: env::var("RATE_LIMIT_API_BURST")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            rate_limit_report_period_seconds: env::var("RATE_LIMIT_REPORT_PERIOD_SECONDS")
                .unwrap_or_else(|_| "360".to_string())
                .parse()
                .unwrap_or(360),
            rate_limit_report_burst: env::var("RATE_LIMIT_REPORT_BURST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Brazil has had no DST since 2019, so a fixed offset is exact for São Paulo
            report_utc_offset_minutes: env::var("REPORT_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "-180".to_string())
                .parse()
                .unwrap_or(-180),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        };

        config.report_offset()?;
        Ok(config)
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Fixed offset used to render timestamps in spreadsheet reports.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when the offset exceeds ±24h.
    pub fn report_offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.report_utc_offset_minutes * 60)
            .ok_or(ConfigError::Invalid("REPORT_UTC_OFFSET_MINUTES"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit tests; never touches the environment.
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/coldchain_test".to_string(),
            api_key: Some("test-key".to_string()),
            api_host: "127.0.0.1".to_string(),
            api_port: 0,
            disable_rate_limiting: true,
            rate_limit_api_period_seconds: 9,
            rate_limit_api_burst: 100,
            rate_limit_report_period_seconds: 360,
            rate_limit_report_burst: 10,
            report_utc_offset_minutes: -180,
            deployment: Deployment::Local,
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_parses_aliases() {
        assert_eq!(Deployment::from_str("Production"), Deployment::Prod);
        assert_eq!(Deployment::from_str("staging"), Deployment::Stage);
        assert_eq!(Deployment::from_str("whatever"), Deployment::Local);
    }

    #[test]
    fn report_offset_rejects_out_of_range() {
        let mut config = Config::for_tests();
        assert_eq!(
            config.report_offset().unwrap(),
            FixedOffset::west_opt(3 * 3600).unwrap()
        );

        config.report_utc_offset_minutes = 24 * 60;
        assert!(matches!(
            config.report_offset(),
            Err(ConfigError::Invalid("REPORT_UTC_OFFSET_MINUTES"))
        ));
    }
}
