//! Command-line front end for the DailyZen tracker.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Run one API call and print its JSON envelope.
//! - Exit non-zero when the envelope reports failure.

use clap::{Parser, Subcommand};
use dailyzen_api::{
    AddItemRequest, AddScheduleRequest, Api, ApiResponse, ChatMessageRequest,
    UpdateProfileRequest,
};
use dailyzen_core::{init_logging, AppConfig, RepoError, StorageTarget};
use std::path::PathBuf;
use std::process::ExitCode;

/// DailyZen - habits, carried items, schedule and a tiny chat helper.
#[derive(Parser, Debug)]
#[command(name = "dailyzen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON document to use instead of DAILYZEN_DATA_FILE / DAILYZEN_DATABASE_PATH
    #[arg(short = 'f', long = "data-file", global = true)]
    data_file: Option<PathBuf>,

    /// Pretty-print the JSON envelope
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the core library is linked
    Ping,

    /// Show habits, items and schedule entries
    Dashboard,

    /// Add an item to carry
    AddItem {
        /// Item name
        name: String,
    },

    /// Add a schedule entry
    AddSchedule {
        /// Entry title
        title: String,

        /// Free-form date
        #[arg(long, default_value = "")]
        date: String,

        /// Free-form time
        #[arg(long, default_value = "")]
        time: String,
    },

    /// Show the profile, or replace it with --set
    Profile {
        /// New username
        #[arg(long)]
        set: Option<String>,

        /// Username shown when no profile is stored
        #[arg(long, env = "USER", default_value = "demo")]
        fallback: String,
    },

    /// Send a message to the chat helper
    Chat {
        /// Message text
        message: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = cli.data_file {
        config.storage = StorageTarget::JsonFile(path);
    }
    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let response = match run(cli.command, &config) {
        Ok(response) => response,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    print_response(&response, cli.pretty);
    if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs one command. Storage is opened only for commands that need it.
fn run(command: Commands, config: &AppConfig) -> Result<ApiResponse, RepoError> {
    if let Commands::Ping = command {
        return Ok(dailyzen_api::ping());
    }
    let api = Api::open(config)?;

    Ok(match command {
        Commands::Ping => dailyzen_api::ping(),
        Commands::Dashboard => api.dashboard(),
        Commands::AddItem { name } => api.add_item(&AddItemRequest { name: Some(name) }),
        Commands::AddSchedule { title, date, time } => api.add_schedule(&AddScheduleRequest {
            title: Some(title),
            date: Some(date),
            time: Some(time),
        }),
        Commands::Profile {
            set: Some(username),
            ..
        } => api.update_profile(&UpdateProfileRequest {
            username: Some(username),
        }),
        Commands::Profile {
            set: None,
            fallback,
        } => api.profile(&fallback),
        Commands::Chat { message } => api.chat_message(&ChatMessageRequest {
            message: Some(message),
        }),
    })
}

fn print_response(response: &ApiResponse, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_json())
    } else {
        response.to_json()
    };
    println!("{rendered}");
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Commands};
    use clap::{CommandFactory, Parser};
    use dailyzen_core::{AppConfig, StorageTarget};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_schedule_defaults_date_and_time() {
        let cli = Cli::parse_from(["dailyzen", "add-schedule", "Dentist"]);
        match cli.command {
            Commands::AddSchedule { title, date, time } => {
                assert_eq!(title, "Dentist");
                assert!(date.is_empty());
                assert!(time.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ping_runs_without_opening_storage() {
        let dir = tempfile::tempdir().unwrap();
        let unreachable = dir.path().join("missing").join("dailyzen.db");
        let config = AppConfig {
            storage: StorageTarget::Sqlite(unreachable.clone()),
            ..AppConfig::default()
        };

        let cli = Cli::parse_from(["dailyzen", "ping"]);
        let response = run(cli.command, &config).unwrap();
        assert!(response.ok);
        assert!(!unreachable.exists());

        assert!(run(Commands::Dashboard, &config).is_err());
    }
}
