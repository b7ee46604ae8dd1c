// src/cli.rs
use clap::{Args, Parser, Subcommand};

use crate::config::is_valid_rate;

#[derive(Parser, Debug)]
#[command(name = "scribe", version, about = "Fill in dynamic forms from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

impl Cli {
    /// The command to run; a bare `scribe` opens the interactive UI.
    pub fn command(self) -> Cmd {
        self.cmd.unwrap_or(Cmd::Run(RunArgs::default()))
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Cmd {
    /// Run interactive TUI
    Run(RunArgs),
    /// Log in, fetch the form for a roll number and print it as JSON
    Fetch {
        #[arg(long)]
        roll_number: String,
        #[arg(long)]
        name: String,
        /// Form service to talk to
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
}

#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct RunArgs {
    /// Form service to talk to
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", value_parser = parse_rate)]
    pub tick_rate: Option<f64>,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", value_parser = parse_rate)]
    pub frame_rate: Option<f64>,
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if is_valid_rate(rate) {
        Ok(rate)
    } else {
        Err(format!("{s} is not a positive number"))
    }
}
