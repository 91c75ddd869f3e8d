use std::{env, str::FromStr, time::Duration};

use url::Url;

use super::env::{AppConfig, ConfigError, DirectoryConfig, LoggingConfig, OcrConfig};

const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
            data_dir: var("DATA_DIR").unwrap_or_else(|| "data".to_string()),
            db_filename: var("DB_FILENAME").unwrap_or_else(|| "mail.db".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        let endpoint = var("OCR_ENDPOINT")
            .map(|raw| parse_endpoint("OCR_ENDPOINT", &raw))
            .transpose()?;

        let ocr = OcrConfig {
            endpoint,
            api_key: var("OCR_API_KEY"),
            language: var("OCR_LANGUAGE").unwrap_or_else(|| "eng".to_string()),
            timeout: Duration::from_millis(parse_or(var("OCR_TIMEOUT_MS"), 30_000)),
            max_image_bytes: parse_or(var("OCR_MAX_IMAGE_BYTES"), DEFAULT_MAX_IMAGE_BYTES),
            concurrency: parse_or(var("OCR_CONCURRENCY"), 2usize).max(1),
        };

        let timezone = match var("APP_TIMEZONE") {
            Some(value) => value
                .parse::<chrono_tz::Tz>()
                .map_err(|_| ConfigError::InvalidTimezone {
                    var: "APP_TIMEZONE",
                    value,
                })?,
            None => chrono_tz::UTC,
        };

        let seed_samples = var("SEED_SAMPLE_EMAILS")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);

        Ok(Self {
            directories,
            logging,
            ocr,
            timezone,
            seed_samples,
        })
    }
}

fn parse_endpoint(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            var,
            value: raw.to_string(),
        });
    }
    Ok(url)
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse::<T>().ok()).unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]).expect("defaults load");
        assert_eq!(config.directories.db_filename, "mail.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.ocr.endpoint.is_none());
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.timeout, Duration::from_secs(30));
        assert_eq!(config.ocr.concurrency, 2);
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert!(config.seed_samples);
    }

    #[test]
    fn reads_overrides_and_falls_back_on_garbage() {
        let config = load(&[
            ("OCR_ENDPOINT", "https://ocr.internal.example/v1/extract"),
            ("OCR_TIMEOUT_MS", "1500"),
            ("OCR_CONCURRENCY", "0"),
            ("OCR_MAX_IMAGE_BYTES", "lots"),
            ("APP_TIMEZONE", "Europe/Berlin"),
            ("SEED_SAMPLE_EMAILS", "off"),
        ])
        .expect("config loads");
        assert_eq!(
            config.ocr.endpoint.as_ref().map(Url::as_str),
            Some("https://ocr.internal.example/v1/extract")
        );
        assert_eq!(config.ocr.timeout, Duration::from_millis(1500));
        assert_eq!(config.ocr.concurrency, 1);
        assert_eq!(config.ocr.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert!(!config.seed_samples);
    }

    #[test]
    fn rejects_bad_endpoint_and_timezone() {
        assert!(matches!(
            load(&[("OCR_ENDPOINT", "not a url")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            load(&[("OCR_ENDPOINT", "ftp://ocr.example")]),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            load(&[("APP_TIMEZONE", "Mars/Olympus")]),
            Err(ConfigError::InvalidTimezone { .. })
        ));
    }
}
