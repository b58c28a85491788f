use clap::Parser;
use std::path::PathBuf;

/// Movie catalog and review service
#[derive(Parser, Debug, Clone)]
#[command(name = "cineclub")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Directory of the database
    #[arg(long, env = "CINECLUB_DB", default_value = "cineclub.db")]
    pub db: PathBuf,

    /// Address to listen on
    #[arg(long, env = "CINECLUB_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// Keep the database in a temporary location that is removed on exit
    #[arg(long, env = "CINECLUB_TEMPORARY")]
    pub temporary: bool,

    /// bcrypt work factor for stored passwords
    #[arg(long, env = "CINECLUB_BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST,
          value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,
}
