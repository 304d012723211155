use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stellarview", version, about = "Stellar View Cleaning site server")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the site server (default)
    Start,

    /// Reload configuration of a running server (sends SIGHUP)
    Reload {
        /// PID of the running server
        #[arg(short, long)]
        pid: u32,
    },

    /// Test configuration file validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Price a job from the command line
    Quote(QuoteArgs),

    /// Reveal the phone number from a running server and print the link
    Contact(ContactArgs),

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (phone number masked)
    Show,

    /// Validate configuration file
    Validate,
}

#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    /// residential or commercial
    #[arg(long, default_value = "residential")]
    pub customer: String,

    /// exterior or in-out
    #[arg(long, default_value = "exterior")]
    pub level: String,

    /// Standard windows
    #[arg(long, default_value = "0")]
    pub standard: String,

    /// Large windows
    #[arg(long, default_value = "0")]
    pub large: String,

    /// Sliding doors / sliders
    #[arg(long, default_value = "0")]
    pub slider: String,

    /// Add-on count as id=count (repeatable), e.g. --add-on screens=4
    #[arg(long = "add-on", value_name = "ID=COUNT")]
    pub add_ons: Vec<String>,

    /// Leave the access constraint unconfirmed
    #[arg(long)]
    pub unconfirmed: bool,

    /// Print the estimate as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ContactArgs {
    #[command(subcommand)]
    pub action: ContactAction,

    /// Site root URL
    #[arg(long, default_value = "http://127.0.0.1:3000", global = true)]
    pub url: String,

    /// Browser user agent to present (selects the SMS link style)
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Touch points reported by the device
    #[arg(long, default_value = "0", global = true)]
    pub touch_points: u32,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ContactAction {
    /// Build a tel: link
    Call,

    /// Build an sms: link, optionally pre-filled
    Text(TextArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct TextArgs {
    /// Message body; overrides the quote fields
    #[arg(long)]
    pub body: Option<String>,

    /// Compose the quote request message from the fields below
    #[arg(long)]
    pub quote: bool,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// Residential or Storefront
    #[arg(long)]
    pub property_type: Option<String>,

    /// Approximate number of windows
    #[arg(long, default_value = "")]
    pub windows: String,

    /// Preferred day/time
    #[arg(long, default_value = "")]
    pub timing: String,

    #[arg(long, default_value = "")]
    pub notes: String,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
