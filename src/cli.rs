use clap::Parser;
use std::path::PathBuf;

use crate::config::{SeedConfig, DEFAULT_END_INDEX, DEFAULT_MAX_INSERT, DEFAULT_START_INDEX};
use crate::credentials::CredentialHasher;

#[derive(Parser, Debug)]
#[command(name = "ode-seed-gen")]
#[command(version, about = "Generate the annotation platform seed script from a folder of CSVs and audio files")]
pub struct Cli {
    /// Folder containing the audio files and the required CSVs
    pub seed_folder: PathBuf,

    /// Seeded ids start right after this value
    #[arg(long, default_value_t = DEFAULT_START_INDEX)]
    pub start_index: i64,

    /// Minimum value id sequences are restarted at
    #[arg(long, default_value_t = DEFAULT_END_INDEX)]
    pub end_index: i64,

    /// Maximum rows per insert statement
    #[arg(long, default_value_t = DEFAULT_MAX_INSERT)]
    pub max_insert: usize,

    /// bcrypt cost for passwords read from users.csv
    #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Output path (default: <seed_folder>/init.js)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn config(&self) -> SeedConfig {
        SeedConfig {
            start_index: self.start_index,
            end_index: self.end_index,
            max_insert: self.max_insert,
            hasher: CredentialHasher::new(self.bcrypt_cost),
        }
    }
}
