use std::collections::HashMap;
use std::env;

use config::{Environment, File, FileFormat};
use once_cell::sync::Lazy;
use serde::Deserialize;

use domain_model::PriceField;

#[derive(Deserialize)]
pub struct Config {
    pub logging: Logging,
    pub application: Application,
    pub quote: Quote,
    pub cache: Cache,
    pub chart: Chart,
}

#[derive(Deserialize)]
pub struct Application {
    pub name: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Quote {
    pub url: String,
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub source: String,
    pub price_field: PriceField,
    pub default_range_days: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Deserialize)]
pub struct Cache {
    pub capacity: u64,
    pub time_to_idle_secs: u64,
}

#[derive(Deserialize)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
pub struct Logging {
    level: String,
    crates: HashMap<String, String>,
}

impl Logging {
    pub fn levels(&self) -> String {
        let crate_levels = self.crates.iter().map(|(lib, loglevel)| format!("{lib}={loglevel}"))
            .collect::<Vec<_>>()
            .join(",");
        format!("{},{crate_levels}", self.level)
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

impl Config {
    fn load() -> Self {
        config::Config::builder()
            .add_source(File::from_str(include_str!("../config.yml"), FileFormat::Yaml))
            .add_source(Environment::with_prefix("VIEWER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true))
            .set_override_option("application.port", env::var("PORT").ok())
            .expect("Error during PORT override")
            .build()
            .expect("Error during config creation")
            .try_deserialize()
            .expect("Error during config deserialization")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config() {
        assert_eq!(CONFIG.quote.symbol, "2330.TW");
        assert_eq!(CONFIG.quote.price_field, PriceField::AdjClose);
        assert_eq!(CONFIG.quote.default_range_days, 30);
        assert!(CONFIG.cache.capacity > 0);
        assert_eq!((CONFIG.chart.width, CONFIG.chart.height), (1200, 600));
    }

    #[test]
    fn test_logging_levels() {
        let logging = Logging {
            level: "INFO".to_string(),
            crates: HashMap::from([("viewer_core".to_string(), "DEBUG".to_string())]),
        };
        assert_eq!(logging.levels(), "INFO,viewer_core=DEBUG");
    }
}
