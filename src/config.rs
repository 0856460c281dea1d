use crate::barn::ImageSize;
use std::{env, path::PathBuf};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_IMAGE_SIZE: ImageSize = ImageSize {
    width: 1032,
    height: 945,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be a positive pixel count, got {value:?}")]
    InvalidDimension { name: &'static str, value: String },
}

/// Background image the stall overlay is drawn on.
#[derive(Debug, Clone, PartialEq)]
pub struct BarnImage {
    pub url: Option<String>,
    pub size: ImageSize,
}

impl Default for BarnImage {
    fn default() -> Self {
        Self {
            url: None,
            size: DEFAULT_IMAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub log_level: String,
    pub barn_image: BarnImage,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let data_path = lookup("APP_DATA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let log_level = lookup("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let barn_image = BarnImage {
            url: lookup("BARN_IMAGE_URL").filter(|url| !url.trim().is_empty()),
            size: ImageSize {
                width: dimension(&lookup, "BARN_IMAGE_WIDTH", DEFAULT_IMAGE_SIZE.width)?,
                height: dimension(&lookup, "BARN_IMAGE_HEIGHT", DEFAULT_IMAGE_SIZE.height)?,
            },
        };

        Ok(Self {
            port,
            data_path,
            log_level,
            barn_image,
        })
    }
}

fn dimension<F>(lookup: &F, name: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().parse::<u32>() {
        Ok(pixels) if pixels > 0 => Ok(pixels),
        _ => Err(ConfigError::InvalidDimension { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.barn_image, BarnImage::default());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("APP_DATA_PATH", "/tmp/barn.json"),
            ("BARN_IMAGE_URL", "/static/barn.png"),
            ("BARN_IMAGE_WIDTH", "2064"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_path, PathBuf::from("/tmp/barn.json"));
        assert_eq!(config.barn_image.url.as_deref(), Some("/static/barn.png"));
        assert_eq!(config.barn_image.size.width, 2064);
        assert_eq!(config.barn_image.size.height, 945);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));

        let err = Config::from_lookup(lookup(&[("BARN_IMAGE_HEIGHT", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDimension {
                name: "BARN_IMAGE_HEIGHT",
                value: "0".into()
            }
        );
    }
}
