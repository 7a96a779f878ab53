pub mod coin_page;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod graphql;
pub mod snapshot;
pub mod snapshot_utils;
pub mod units;
