use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "slotmenu",
    version,
    about = "Slot menu engine toolbox",
    long_about = "Resolve menu layouts, run the scripted shop demo against the in-memory host \
                  and inspect the engine configuration."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(flatten)]
    pub color: Color,

    /// Override the log level (takes precedence over -v/-q and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Engine configuration file (TOML). Defaults apply when omitted.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve layout rows and print the slot grid.
    Layout(LayoutArgs),

    /// Run a scripted shop session against the in-memory host.
    Demo(DemoArgs),

    /// Print the effective engine configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct LayoutArgs {
    /// Layout rows, one argument per row. Quote rows containing spaces.
    #[arg(value_name = "ROW", required = true)]
    pub rows: Vec<String>,
}

#[derive(Parser)]
pub struct DemoArgs {
    /// Number of viewers watching the shop.
    #[arg(long = "viewers", default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub viewers: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
