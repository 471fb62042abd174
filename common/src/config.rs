use config::{Config, ConfigError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub search: SearchConfig,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// `scheme://host[:port]/.../index-name`
    pub url: String,
}

fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    3000
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        // Build the configuration
        let config = builder.build()?;

        let settings: Settings = config.try_deserialize()?;

        debug!(
            search_url = %settings.search.url,
            api_host = %settings.api_host,
            api_port = settings.api_port,
            "Loaded settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Settings read the process environment; tests touching it run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults_applied() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(
            "metrics-defaults",
            "[search]\nurl = \"http://localhost:9200/woudc_data_registry.data_record\"\n",
        );

        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        assert_eq!(
            settings.search.url,
            "http://localhost:9200/woudc_data_registry.data_record"
        );
        assert_eq!(settings.api_host, "127.0.0.1");
        assert_eq!(settings.api_port, 3000);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_search_section_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config("metrics-missing", "api_port = 8080\n");

        assert!(Settings::new(path.to_str().unwrap()).is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(
            "metrics-env",
            "[search]\nurl = \"http://localhost:9200/idx\"\n",
        );

        unsafe {
            std::env::set_var("APP_API_PORT", "8181");
            std::env::set_var("APP_SEARCH__URL", "http://other:9200/idx2");
        }
        let result = Settings::new(path.to_str().unwrap());
        unsafe {
            std::env::remove_var("APP_API_PORT");
            std::env::remove_var("APP_SEARCH__URL");
        }

        let settings = result.unwrap();
        assert_eq!(settings.api_port, 8181);
        assert_eq!(settings.search.url, "http://other:9200/idx2");

        std::fs::remove_file(path).ok();
    }
}
