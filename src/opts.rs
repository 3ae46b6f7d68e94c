//! CLI options.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser};

use crate::prelude::*;
use crate::wargaming::{Nation, Realm, TankType};

pub mod parsers;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Opts {
    /// Sentry DSN
    #[arg(long, env = "TANK_ROULETTE_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Performance monitoring sample rate. The default is 10%
    #[arg(long, default_value = "0.1", env = "TANK_ROULETTE_TRACES_SAMPLE_RATE")]
    pub traces_sample_rate: f32,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand)]
pub enum Subcommand {
    Web(WebOpts),
    Pick(PickOpts),
    List(ListOpts),
    Blacklist(BlacklistOpts),
    Clear(ClearOpts),
}

/// Runs the HTTP API
#[derive(Args)]
pub struct WebOpts {
    #[command(flatten)]
    pub upstream: UpstreamOpts,

    /// Web application bind host
    #[arg(long, default_value = "::")]
    pub host: String,

    /// Web application bind port
    #[arg(short, long, default_value = "8080")]
    pub port: u16,
}

#[derive(Args)]
pub struct UpstreamOpts {
    /// Wargaming.net API application ID
    #[arg(long, env = "WOT_APPLICATION_ID")]
    pub application_id: Option<String>,

    #[command(flatten)]
    pub fetch: FetchOpts,
}

#[derive(Args)]
pub struct FetchOpts {
    /// Number of owned vehicles per page
    #[arg(long, default_value = "50", value_parser = parsers::non_zero_usize)]
    pub page_size: usize,

    /// Number of the first page
    #[arg(long, default_value = "0")]
    pub first_page: u32,

    /// Stop paginating after this number of pages
    #[arg(long, default_value = "100", value_parser = parsers::non_zero_u32)]
    pub max_pages: u32,

    /// Number of vehicles per encyclopedia request
    #[arg(long, default_value = "50", value_parser = parsers::non_zero_usize)]
    pub detail_batch_size: usize,

    /// Timeout of a single upstream request
    #[arg(long, default_value = "8s", value_parser = parsers::non_zero_duration)]
    pub request_timeout: StdDuration,

    /// Pause between consecutive encyclopedia requests
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub batch_delay: StdDuration,

    /// Number of retries of a failed encyclopedia request
    #[arg(long, default_value = "0")]
    pub detail_retries: u32,

    /// Maximum upstream request rate
    #[arg(long, default_value = "10")]
    pub requests_per_second: NonZeroU32,

    /// Total time budget of fetching a single garage
    #[arg(long, value_parser = humantime::parse_duration)]
    pub budget: Option<StdDuration>,
}

/// Identifies the player and where their data is stored.
#[derive(Args)]
pub struct ProfileOpts {
    /// Player nickname
    #[arg(short, long)]
    pub username: String,

    /// Player realm: na, eu, ru, or asia
    #[arg(short, long, default_value = "na")]
    pub server: Realm,

    /// Local store file
    #[arg(long, default_value = "tank-roulette.json", env = "TANK_ROULETTE_STORE")]
    pub store: PathBuf,
}

#[derive(Args)]
pub struct FilterOpts {
    /// Allowed tiers, all by default
    #[arg(long = "tier", value_parser = parsers::tier, value_delimiter = ',')]
    pub tiers: Vec<i32>,

    /// Allowed nations, all by default
    #[arg(long = "nation", value_delimiter = ',')]
    pub nations: Vec<Nation>,

    /// Allowed vehicle types, all by default
    #[arg(long = "type", value_delimiter = ',')]
    pub types: Vec<TankType>,

    /// Only premium vehicles
    #[arg(long)]
    pub premium: bool,
}

/// Picks a random vehicle from the garage
#[derive(Args)]
pub struct PickOpts {
    #[command(flatten)]
    pub profile: ProfileOpts,

    #[command(flatten)]
    pub upstream: UpstreamOpts,

    #[command(flatten)]
    pub filter: FilterOpts,

    /// Fetch the garage even if it is cached
    #[arg(long)]
    pub refresh: bool,

    /// Keep picking with this period until interrupted
    #[arg(long, value_parser = parsers::non_zero_duration)]
    pub every: Option<StdDuration>,
}

/// Lists the garage vehicles which pass the filter
#[derive(Args)]
pub struct ListOpts {
    #[command(flatten)]
    pub profile: ProfileOpts,

    #[command(flatten)]
    pub upstream: UpstreamOpts,

    #[command(flatten)]
    pub filter: FilterOpts,

    /// Fetch the garage even if it is cached
    #[arg(long)]
    pub refresh: bool,
}

/// Manages the vehicles excluded from picking
#[derive(Args)]
pub struct BlacklistOpts {
    #[command(flatten)]
    pub profile: ProfileOpts,

    #[command(subcommand)]
    pub action: BlacklistAction,
}

#[derive(clap::Subcommand)]
pub enum BlacklistAction {
    /// Excludes the vehicle from picking
    Add {
        #[arg(value_parser = parsers::tank_id)]
        tank_id: wargaming::TankId,
    },

    /// Returns the vehicle to picking
    Remove {
        #[arg(value_parser = parsers::tank_id)]
        tank_id: wargaming::TankId,
    },

    /// Prints the blacklisted vehicle IDs
    List,
}

/// Forgets the cached garage and the blacklist
#[derive(Args)]
pub struct ClearOpts {
    #[command(flatten)]
    pub profile: ProfileOpts,
}

pub fn parse() -> Opts {
    Opts::parse()
}
