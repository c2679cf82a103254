use crate::{
    error::Error,
    screen::{color_scheme::ColorScheme, keymap::KeyBinding},
    utils::any::Any,
};
use serde::Deserialize;
use std::{path::Path, time::Duration};

#[derive(Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_endpoint")]
    pub endpoint: String,

    #[serde(default = "Config::default_query_param")]
    pub query_param: String,

    #[serde(default)]
    pub sort: Option<String>,

    #[serde(default = "Config::default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    pub color_scheme: ColorScheme,

    #[serde(default)]
    pub keymap: Vec<KeyBinding>,
}

impl Config {
    const DEFAULT_CONFIG_STR: &'static str = std::include_str!("config.yaml");
    const DEFAULT_ENDPOINT: &'static str = "https://api.github.com/search/repositories";
    const DEFAULT_QUERY_PARAM: &'static str = "q";

    pub fn load(config_filepath: Option<&Path>) -> Result<Self, Error> {
        if let Some(config_filepath) = config_filepath {
            config_filepath
                .read_to_string()?
                .deserialize_from_yaml::<Config>()?
                .ok()
        } else {
            Self::DEFAULT_CONFIG_STR.deserialize_from_yaml::<Config>()?.ok()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn default_endpoint() -> String {
        Self::DEFAULT_ENDPOINT.into()
    }

    fn default_query_param() -> String {
        Self::DEFAULT_QUERY_PARAM.into()
    }

    fn default_user_agent() -> String {
        std::format!("{}/{}", std::env!("CARGO_PKG_NAME"), std::env!("CARGO_PKG_VERSION"))
    }
}
