use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxrate::cli::conversion::ConversionOverrides;
use fxrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConversionArgs {
    /// Country to convert from, e.g. AU
    #[arg(short, long)]
    from: Option<String>,

    /// Country to convert to, e.g. US
    #[arg(short, long)]
    to: Option<String>,

    /// Amount in the source currency
    #[arg(short, long, allow_negative_numbers = true)]
    amount: Option<f64>,

    /// Show all decimals instead of rounding to cents
    #[arg(long)]
    no_round: bool,
}

impl From<ConversionArgs> for ConversionOverrides {
    fn from(args: ConversionArgs) -> ConversionOverrides {
        ConversionOverrides {
            from: args.from,
            to: args.to,
            amount: args.amount,
            no_round: args.no_round,
        }
    }
}

impl From<Commands> for fxrate::AppCommand {
    fn from(cmd: Commands) -> fxrate::AppCommand {
        match cmd {
            Commands::Convert(args) => fxrate::AppCommand::Convert(args.into()),
            Commands::Watch { args, ticks } => fxrate::AppCommand::Watch {
                overrides: args.into(),
                max_refreshes: ticks.map(|t| t as usize),
            },
            Commands::Countries => fxrate::AppCommand::Countries,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount at the current rate
    Convert(ConversionArgs),
    /// Keep refreshing the rate and conversion
    Watch {
        #[command(flatten)]
        args: ConversionArgs,

        /// Stop after this many refreshes
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        ticks: Option<u64>,
    },
    /// List supported countries and currencies
    Countries,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxrate::cli::setup::setup(),
        Some(cmd) => fxrate::run_command(cmd.into(), cli.config_path.as_deref())
            .await
            .map(|_| ()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
