//! Configuration-related functionality for clickthru.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::fs::{load_from_file, maybe_canonicalize};
use crate::{CurrencyStyle, Error, StartOfWeek};

/// Instance-wide formatting configuration.
///
/// Individual columns can override the currency settings through their
/// [`crate::ColumnSettings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First day of a week bucket.
    pub start_of_week: StartOfWeek,
    /// ISO 4217 currency code used for currency-styled numbers.
    pub currency: String,
    pub currency_style: CurrencyStyle,
    pub decimal_separator: String,
    /// Separator between groups of thousands. May be empty.
    pub grouping_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_of_week: StartOfWeek::default(),
            currency: "USD".to_string(),
            currency_style: CurrencyStyle::default(),
            decimal_separator: ".".to_string(),
            grouping_separator: ",".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON, YAML or TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load_from_file(path)
    }

    /// Load configuration from the given file if it exists, otherwise fall
    /// back to the default configuration.
    pub fn load_or_default<P: AsRef<Path>>(maybe_config_file: P) -> Result<Self, Error> {
        let maybe_config_file = maybe_config_file.as_ref();
        match maybe_canonicalize(maybe_config_file)? {
            Some(config_path) => {
                let config = Self::load_from_file(&config_path)?;
                debug!("Loaded configuration from {}", config_path.display());
                Ok(config)
            }
            None => {
                debug!(
                    "No such configuration file, using defaults: {}",
                    maybe_config_file.display()
                );
                Ok(Self::default())
            }
        }
    }

    pub fn with_start_of_week(mut self, start_of_week: StartOfWeek) -> Self {
        self.start_of_week = start_of_week;
        self
    }

    pub fn with_currency<S: AsRef<str>>(mut self, currency: S, style: CurrencyStyle) -> Self {
        self.currency = currency.as_ref().to_string();
        self.currency_style = style;
        self
    }

    pub fn with_separators<D, G>(mut self, decimal: D, grouping: G) -> Self
    where
        D: AsRef<str>,
        G: AsRef<str>,
    {
        self.decimal_separator = decimal.as_ref().to_string();
        self.grouping_separator = grouping.as_ref().to_string();
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::SupportedFormat;

    #[test]
    fn partial_yaml_config() {
        let config: Config = SupportedFormat::Yaml
            .load(
                r#"
start_of_week: monday
currency: EUR
"#,
            )
            .unwrap();
        assert_eq!(config.start_of_week, StartOfWeek::Monday);
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.decimal_separator, ".");
    }

    #[test]
    fn toml_config() {
        let config: Config = SupportedFormat::Toml
            .load(
                r#"
currency_style = "code"
decimal_separator = ","
grouping_separator = "."
"#,
            )
            .unwrap();
        assert_eq!(config.currency_style, CurrencyStyle::Code);
        assert_eq!(
            config,
            Config::default()
                .with_currency("USD", CurrencyStyle::Code)
                .with_separators(",", ".")
        );
    }

    #[test]
    fn json_config_file() {
        let path =
            std::env::temp_dir().join(format!("clickthru-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "start_of_week": "monday", "currency": "EUR", "currency_style": "code" }"#,
        )
        .unwrap();
        let loaded = Config::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.start_of_week, StartOfWeek::Monday);
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.currency_style, CurrencyStyle::Code);
        assert_eq!(config.decimal_separator, ".");
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let config = Config::load_or_default("/definitely/not/a/real/clickthru.yml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unsupported_config_format() {
        let err = Config::load_from_file("clickthru.ini").unwrap_err();
        match err {
            Error::LoadFromFile(_, inner) => match *inner {
                Error::UnsupportedFileType(ext) => assert_eq!(ext, "ini"),
                _ => panic!("unexpected inner error: {:?}", inner),
            },
            _ => panic!("unexpected error: {:?}", err),
        }
    }
}
