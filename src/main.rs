use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use matchpoint::api::{ApiClient, AuthError, MatchUpdate, NewMatch, NewPlayer, PlayerType};
use matchpoint::confirm::{AlwaysConfirm, Confirm, StdinConfirm};
use matchpoint::credentials::{self, Credentials};
use matchpoint::output;
use matchpoint::rules;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive club view (default if no subcommand)
    Tui,
    /// List registered players
    Players,
    /// List recorded matches, newest first
    Matches,
    /// Show the win-rate leaderboard
    Leaderboard,
    /// Show one player's statistics, optionally within a date range
    Stats {
        /// Player name
        name: String,
        /// Only count matches on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Only count matches on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Register a new player
    AddPlayer {
        /// Player name (letters and single spaces only)
        name: String,
        /// Player age in years
        #[arg(long)]
        age: u32,
        /// Player category: amateur or professional
        #[arg(long, default_value = "amateur")]
        kind: PlayerType,
    },
    /// Record a match result
    AddMatch {
        /// First player's name
        player_a: String,
        /// Second player's name
        player_b: String,
        /// Set scores like "6:4, 7:6"
        score: String,
        /// Match date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Correct a recorded match's score and/or date
    EditMatch {
        /// Match ID as shown in the match list
        id: u64,
        /// Replacement set scores like "6:4, 7:6"
        #[arg(long)]
        score: Option<String>,
        /// Replacement date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a player (only possible while they have no matches)
    RemovePlayer {
        /// Player name
        name: String,
    },
    /// Delete a match by its ID
    RemoveMatch {
        /// Match ID as shown in the match list
        id: u64,
    },
    /// Export the leaderboard as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check whether the server is reachable
    Health,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "matchpoint")]
#[command(about = "Tennis club match tracking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/matchpoint/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Server base URL (overrides the config file)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Username for write operations (overrides the config file)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Whether a command performs a write and therefore needs credentials
/// before it talks to the server.
fn needs_credentials(command: &Commands) -> bool {
    matches!(
        command,
        Commands::AddPlayer { .. }
            | Commands::AddMatch { .. }
            | Commands::EditMatch { .. }
            | Commands::RemovePlayer { .. }
            | Commands::RemoveMatch { .. }
    )
}

/// Map a failed API call to an exit code. Bad credentials and network
/// problems are told apart so scripts can react differently.
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<AuthError>().is_some() {
        EXIT_AUTH
    } else {
        EXIT_NETWORK
    }
}

fn fail(error: anyhow::Error) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(exit_code_for(&error));
}

fn print_validation_errors(errors: &[String]) -> ! {
    eprintln!("Invalid input:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_CONFIG);
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // Init runs before config loading; it writes the config file.
    if matches!(command, Commands::Init) {
        let path = cli.config.map(PathBuf::from);
        if let Err(e) = matchpoint::config::run_init_wizard(path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match matchpoint::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let base_url = cli.server.unwrap_or_else(|| config.server.base_url.clone());
    let known_username = cli.user.clone().or_else(|| config.username.clone());

    if cli.verbose {
        eprintln!("Server: {}", base_url);
    }

    // Writes need a session up front; reads and the TUI start without one
    // (the TUI collects credentials lazily, on the first write).
    let session: Option<Credentials> = if needs_credentials(&command) {
        match credentials::resolve_credentials(known_username.as_deref()) {
            Ok(creds) => Some(creds),
            Err(e) => {
                eprintln!("Credential error: {}", e);
                std::process::exit(EXIT_AUTH);
            }
        }
    } else if matches!(command, Commands::Tui) {
        match (
            credentials::username_from_env(),
            credentials::password_from_env(),
        ) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    } else {
        None
    };

    let session_username = session.as_ref().map(|c| c.username.clone());

    let client = match ApiClient::new(&base_url, session) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(StdinConfirm)
    };

    // Tables with colors on a terminal, tab-separated values in a pipe.
    let on_terminal = std::io::stdout().is_terminal();
    let use_colors = output::should_use_colors();

    match command {
        Commands::Init => unreachable!(),

        Commands::Tui => {
            let app = matchpoint::tui::App::new_loading(config, session_username);
            if let Err(e) = matchpoint::tui::run_tui(app, client).await {
                fail(e);
            }
        }

        Commands::Players => match client.players().await {
            Ok(players) => {
                if on_terminal {
                    println!("{}", output::format_players_table(&players, use_colors));
                } else {
                    print!("{}", output::format_players_tsv(&players));
                }
            }
            Err(e) => fail(e),
        },

        Commands::Matches => match matchpoint::fetch::sorted_matches(&client).await {
            Ok(matches) => {
                if on_terminal {
                    println!("{}", output::format_matches_table(&matches, use_colors));
                } else {
                    print!("{}", output::format_matches_tsv(&matches));
                }
            }
            Err(e) => fail(e),
        },

        Commands::Leaderboard => match client.leaderboard().await {
            Ok(rows) => {
                if on_terminal {
                    println!("{}", output::format_leaderboard_table(&rows, use_colors));
                } else {
                    print!("{}", output::format_leaderboard_tsv(&rows));
                }
            }
            Err(e) => fail(e),
        },

        Commands::Stats { name, from, to } => {
            match client
                .player_stats(&name, from.as_deref(), to.as_deref())
                .await
            {
                Ok(stats) => println!("{}", output::format_player_stats(&stats, use_colors)),
                Err(e) => fail(e),
            }
        }

        Commands::AddPlayer { name, age, kind } => {
            if let Err(errors) = rules::validate_new_player(&name, age) {
                print_validation_errors(&errors);
            }
            let new_player = NewPlayer {
                name: name.trim().to_string(),
                age,
                player_type: kind,
            };
            match client.add_player(&new_player).await {
                Ok(player) => println!("Added player: {} ({})", player.name, player.player_type),
                Err(e) => fail(e),
            }
        }

        Commands::AddMatch {
            player_a,
            player_b,
            score,
            date,
        } => {
            let date = date.unwrap_or_else(|| {
                chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
            });
            if let Err(errors) = rules::validate_new_match(&player_a, &player_b, &score, &date) {
                print_validation_errors(&errors);
            }
            let new_match = NewMatch {
                player_a: player_a.trim().to_string(),
                player_b: player_b.trim().to_string(),
                score: score.trim().to_string(),
                date,
            };
            match client.add_match(&new_match).await {
                Ok(recorded) => println!(
                    "Recorded match #{}: {} vs {} ({})",
                    recorded.id, recorded.player_a_name, recorded.player_b_name, recorded.score
                ),
                Err(e) => fail(e),
            }
        }

        Commands::EditMatch { id, score, date } => {
            let mut errors = Vec::new();
            if score.is_none() && date.is_none() {
                errors.push("Give --score and/or --date to change something.".to_string());
            }
            if let Some(score) = &score {
                if let Err(e) = rules::validate_score(score) {
                    errors.push(e.to_string());
                }
            }
            if let Some(date) = &date {
                if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                    errors.push(format!("Invalid date '{}'. Use YYYY-MM-DD.", date));
                }
            }
            if !errors.is_empty() {
                print_validation_errors(&errors);
            }

            let update = MatchUpdate {
                new_score: score.map(|s| s.trim().to_string()),
                new_date: date,
            };
            match client.update_match(id, &update).await {
                Ok(updated) => println!(
                    "Updated match #{}: {} vs {} ({}, {})",
                    id, updated.player_a.name, updated.player_b.name, updated.score, updated.date
                ),
                Err(e) => fail(e),
            }
        }

        Commands::RemovePlayer { name } => {
            let proceed = confirm
                .confirm(&format!("Delete player '{}'?", name))
                .unwrap_or(false);
            if !proceed {
                println!("Cancelled.");
                std::process::exit(EXIT_SUCCESS);
            }
            match client.delete_player(&name).await {
                Ok(()) => println!("Deleted player: {}", name),
                Err(e) => fail(e),
            }
        }

        Commands::RemoveMatch { id } => {
            let proceed = confirm
                .confirm(&format!("Delete match #{}?", id))
                .unwrap_or(false);
            if !proceed {
                println!("Cancelled.");
                std::process::exit(EXIT_SUCCESS);
            }
            match client.delete_match(id).await {
                Ok(()) => println!("Deleted match #{}", id),
                Err(e) => fail(e),
            }
        }

        Commands::Export { output: target } => match client.export_leaderboard_csv().await {
            Ok(csv) => match target {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, &csv) {
                        eprintln!("Failed to write {}: {}", path.display(), e);
                        std::process::exit(EXIT_CONFIG);
                    }
                    println!("Exported leaderboard to {}", path.display());
                }
                None => print!("{}", csv),
            },
            Err(e) => fail(e),
        },

        Commands::Health => match client.health().await {
            Ok(body) => println!("Server is up: {}", body.trim()),
            Err(e) => fail(e),
        },
    }

    std::process::exit(EXIT_SUCCESS);
}
