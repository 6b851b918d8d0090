//! Command-line interface.
//!
//! ```text
//! stockroom-console                                               # print the dashboard
//! stockroom-console record <username> <entry|exit> <product-id> <quantity> [reason...]
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

use stockroom_core::ProductId;
use stockroom_inventory::{parse_requested_quantity, MovementKind};

#[derive(Debug, Parser)]
#[command(name = "stockroom-console", about = "Stock ledger console", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the dashboard snapshot (the default).
    Dashboard,
    /// Record one stock movement, then print the dashboard.
    Record(RecordArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RecordArgs {
    /// Demo user the movement is attributed to.
    pub username: String,

    #[arg(value_enum, ignore_case = true)]
    pub kind: KindArg,

    pub product_id: ProductId,

    /// Whole units; zero and negative amounts reach the ledger and are rejected there.
    #[arg(value_parser = parse_requested_quantity, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Optional free-text reason.
    pub reason: Vec<String>,
}

impl RecordArgs {
    pub fn reason(&self) -> Option<String> {
        (!self.reason.is_empty()).then(|| self.reason.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "in")]
    Entry,
    #[value(alias = "out")]
    Exit,
}

impl From<KindArg> for MovementKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Entry => MovementKind::Entry,
            KindArg::Exit => MovementKind::Exit,
        }
    }
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Dashboard)
    }
}
