//! Runtime configuration
//!
//! Every flag falls back to an environment variable, and `.env` is loaded
//! before parsing.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the NyaySetu API server
#[derive(Parser, Debug, Clone)]
#[command(name = "nyaysetu-api")]
#[command(about = "Citizen complaints and lawyer directory API")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// SQLite connection string; defaults to a file in the user data dir
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "5")]
    pub max_connections: u32,

    /// Who may add/remove service cities and record case outcomes on a profile
    #[arg(long, env = "PROFILE_ACTIONS", value_enum, default_value_t = ProfileActionPolicy::OwnerOnly)]
    pub profile_actions: ProfileActionPolicy,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Authorization rule for add-city, remove-city and increment-cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProfileActionPolicy {
    /// Only the account owning the profile
    #[default]
    OwnerOnly,
    /// Any authenticated account
    AnyAuthenticated,
}
