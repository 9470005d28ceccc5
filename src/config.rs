use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;

/// Default timezone for all scheduling (UTC+8, no daylight saving)
pub const DEFAULT_TIMEZONE: &str = "Asia/Singapore";

/// Default path for the persisted OAuth token blob
pub const DEFAULT_TOKEN_PATH: &str = "config/calendar_token.json";

/// Default cap on the number of upcoming events fetched per listing
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Main configuration structure for the scheduler
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Google Calendar ID events are created on
    pub google_calendar_id: String,
    /// Timezone all audits are scheduled in
    pub timezone: String,
    /// Path to the persisted OAuth token blob
    pub token_path: String,
    /// Maximum number of events returned by a listing request
    pub max_results: u32,
    /// Port the web form listens on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").map_err(|_| env_error("GOOGLE_CALENDAR_ID"))?;

        // The zone is fixed for the whole system, validated against the tz database
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));
        timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", timezone)))?;

        let token_path =
            env::var("TOKEN_PATH").unwrap_or_else(|_| String::from(DEFAULT_TOKEN_PATH));

        let max_results = match env::var("MAX_RESULTS") {
            Ok(value) => value
                .parse::<u32>()
                .map_err(|_| config_error("Invalid MAX_RESULTS format"))?,
            Err(_) => DEFAULT_MAX_RESULTS,
        };

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            Err(_) => 3000,
        };

        Ok(Config {
            google_client_id,
            google_client_secret,
            google_calendar_id,
            timezone,
            token_path,
            max_results,
            port,
        })
    }

    /// The configured timezone as a tz-database zone
    pub fn zone(&self) -> Tz {
        // Validated in load(); the default is always parseable
        self.timezone
            .parse::<Tz>()
            .unwrap_or(chrono_tz::Asia::Singapore)
    }
}
