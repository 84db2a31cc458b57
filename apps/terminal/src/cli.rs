//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use drill_core::StatsPeriod;

#[derive(Parser, Debug)]
#[command(name = "word-drill")]
#[command(version, about = "Four-stage vocabulary drill", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Drill one word list
    Drill {
        /// List id; the file read is `<DRILL_LIST_DIR>/<id>.md`
        list_id: String,
    },

    /// Show words studied per day or per month
    Stats {
        /// `month` for the last 30 days, `year` for the last 12 months
        #[arg(long, value_enum, default_value = "month")]
        period: Period,

        /// Only count completions of this user id
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Year,
}

impl From<Period> for StatsPeriod {
    fn from(period: Period) -> Self {
        match period {
            Period::Month => StatsPeriod::Month,
            Period::Year => StatsPeriod::Year,
        }
    }
}
