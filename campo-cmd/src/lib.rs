//! Command implementations for the campaign CLI.
//!
//! Provides subcommands for dumping the catalog, the merged campaign
//! series of two locations, and their classified loss tables as CSV.

use campo_core::config::{API_URL_ENV, DEFAULT_API_BASE_URL, IDENTITY_KEY_ENV};
use campo_core::filters::CampaignFilters;
use campo_core::level::Level;
use clap::{Args, Subcommand};
use std::fs::File;
use std::io::{self, Write};

pub mod catalog;
pub mod connect;
pub mod losses;
pub mod series;

/// Backend location and credentials.
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Backend base URL
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_BASE_URL)]
    pub api_url: String,

    /// Firebase web API key, needed to sign in with email and password
    #[arg(long, env = IDENTITY_KEY_ENV)]
    pub identity_key: Option<String>,

    /// Account email
    #[arg(long, env = "CAMPO_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "CAMPO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Use this user id directly instead of signing in
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub uid: Option<String>,
}

/// Same filters as the dashboard's filter panel.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// First campaign year
    #[arg(long)]
    pub from: Option<String>,

    /// Last campaign year
    #[arg(long)]
    pub to: Option<String>,

    /// Crop id
    #[arg(long)]
    pub crop: Option<String>,

    /// Geographic level: pais, region or provincia
    #[arg(short, long)]
    pub level: Level,

    /// First location id
    #[arg(long)]
    pub location1: Option<String>,

    /// Second location id
    #[arg(long)]
    pub location2: Option<String>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> CampaignFilters {
        CampaignFilters {
            year_from: self.from.clone().unwrap_or_default(),
            year_to: self.to.clone().unwrap_or_default(),
            crop: self.crop.clone().unwrap_or_default(),
            level: Some(self.level),
            location1: self.location1.clone().unwrap_or_default(),
            location2: self.location2.clone().unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List crops and places for every level
    Catalog {
        #[command(flatten)]
        connection: Connection,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Sown and harvested hectares per year for one or two locations
    Series {
        #[command(flatten)]
        connection: Connection,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Lost-hectare percentages classified against each location's average
    Losses {
        #[command(flatten)]
        connection: Connection,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// CSV writer over a file, or stdout when no path is given.
pub fn csv_writer(output: Option<&str>) -> anyhow::Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    Ok(csv::Writer::from_writer(sink))
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Catalog { connection, output } => {
            catalog::run_catalog(&connection, output.as_deref()).await
        }
        Command::Series {
            connection,
            filters,
            output,
        } => series::run_series(&connection, &filters.to_filters(), output.as_deref()).await,
        Command::Losses {
            connection,
            filters,
            output,
        } => losses::run_losses(&connection, &filters.to_filters(), output.as_deref()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn test_parse_series_flags() {
        let cli = TestCli::try_parse_from([
            "campo", "series", "--uid", "u1", "--level", "provincia", "--location1", "6", "--from", "2019",
        ])
        .unwrap();
        let Command::Series { connection, filters, output } = cli.command else {
            panic!("expected series");
        };
        assert_eq!(connection.uid.as_deref(), Some("u1"));
        assert!(output.is_none());
        let filters = filters.to_filters();
        assert_eq!(filters.level, Some(Level::Province));
        assert_eq!(filters.location(0), Some("6"));
        assert_eq!(filters.location(1), None);
        assert_eq!(filters.year_from, "2019");
    }

    #[test]
    fn test_uid_conflicts_with_email() {
        let result = TestCli::try_parse_from([
            "campo", "catalog", "--uid", "u1", "--email", "ana@campo.ar",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let result = TestCli::try_parse_from(["campo", "losses", "--level", "continente"]);
        assert!(result.is_err());
    }
}
