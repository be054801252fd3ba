use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "daymark", version, about = "Daymark check-in calendar CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check in today or a past date
    Check {
        /// Date to check in (YYYY-MM-DD); today when omitted
        date: Option<String>,
        /// Confirm a makeup check-in for a past date
        #[arg(long)]
        yes: bool,
    },
    /// Month calendar with check-in markers
    Calendar {
        /// Month to display (YYYY-MM); the current month when omitted
        #[arg(long)]
        month: Option<String>,
    },
    /// Check-in statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Backup export/import and data clearing
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so command output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check { date, yes } => commands::check::run(date, yes),
        Commands::Calendar { month } => commands::calendar::run(month),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
