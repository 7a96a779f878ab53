use crate::units::DisplayAmount;
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub endpoint: String,
    pub page_size: u32,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://graphql.mainnet.sui.io/graphql"),
            page_size: 50,
            output_path: PathBuf::from("holders.csv"),
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let file = File::open(config_path).with_context(|| {
            format!(
                "Cannot read config file {path}",
                path = config_path.display()
            )
        })?;
        let config: Config = serde_yaml::from_reader(file).with_context(|| {
            format!(
                "Cannot read config file {path}",
                path = config_path.display()
            )
        })?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Parser, Debug)]
#[clap(version, about = "Snapshot coin holders and split an airdrop between them")]
pub struct Cli {
    /// coin type to snapshot, e.g. 0x2::sui::SUI
    #[clap(value_parser)]
    pub coin_type: String,

    /// total amount to airdrop, in display units
    #[clap(long, value_parser = DisplayAmount::from_str)]
    pub airdrop: Option<DisplayAmount>,

    /// comma separated addresses left out of the airdrop
    #[clap(long, value_parser, requires = "airdrop")]
    pub exclude: Option<String>,

    /// path to config file
    #[clap(long, value_parser)]
    pub config_path: Option<PathBuf>,

    /// where to write the csv, overrides `output_path` from the config
    #[clap(long, value_parser)]
    pub output: Option<PathBuf>,
}
