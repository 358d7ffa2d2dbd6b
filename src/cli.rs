use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "usta-tournament-map backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Fetch tournaments from the search API and merge them into the store
    Update {
        /// Maximum number of result pages to fetch
        #[arg(long, default_value_t = 5)]
        max_pages: usize,
        /// Minimum delay between requests, in seconds
        #[arg(long, default_value_t = 2.0)]
        min_delay: f64,
        /// Maximum delay between requests, in seconds
        #[arg(long, default_value_t = 5.0)]
        max_delay: f64,
    },
    /// Start the map API server
    Serve {
        /// Port number (optional, defaults to 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Browse stored tournaments in the terminal
    Dashboard,
}
