//! Sheetlift CLI Entry Point
//!
//! Provides the command-line interface for sync and export runs.
//!
//! # Usage
//!
//! ```bash
//! # Add ready library rows (VIDEO STATUS = 1)
//! sheetlift exercises ExerciseData.xlsx
//!
//! # Update existing library rows (VIDEO STATUS = 3)
//! sheetlift exercises ExerciseData.xlsx --update
//!
//! # Create workouts from a program sheet
//! sheetlift workouts WorkoutPlan.xlsx
//!
//! # Export the remote library into a template copy
//! sheetlift export BlankExerciseData.xlsx Library.xlsx
//!
//! # Preview what a run would process, no network contact
//! sheetlift workouts WorkoutPlan.xlsx --dry-run
//! ```

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use log::{error, info, warn};

use sheetlift::sheet::{extract_exercise_rows, extract_workouts};
use sheetlift::sync::export_library;
use sheetlift::{ApiClient, AppConfig, Grid, SyncEngine, SyncMode, APP_NAME, VERSION};

/// Environment variable read before prompting for the account email.
const EMAIL_ENV: &str = "SHEETLIFT_EMAIL";

/// Environment variable read before prompting for the account password.
const PASSWORD_ENV: &str = "SHEETLIFT_PASSWORD";

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Exercises,
    Workouts,
    Export,
}

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct CliConfig {
    command: Command,
    input: String,
    output: Option<String>,
    update: bool,
    config_path: Option<String>,
    email: Option<String>,
    dry_run: bool,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME, VERSION);
    println!("Spreadsheet-to-Coaching-Platform Sync");
    println!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: sheetlift [OPTIONS] <COMMAND> <FILE> [OUTPUT]");
    println!();
    println!("Commands:");
    println!("  exercises <FILE>          Sync library rows from a sheet");
    println!("  workouts <FILE>           Create workouts from a program sheet");
    println!("  export <TEMPLATE> <OUT>   Write the remote library into a template copy");
    println!();
    println!("Options:");
    println!("  --update            Update existing records instead of adding");
    println!("  --dry-run           Extract and report without network contact");
    println!("  --config PATH       Config file (default: ./sheetlift.toml)");
    println!("  --email EMAIL       Account email (or {})", EMAIL_ENV);
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
    println!();
    println!("The account password is read from {} or prompted.", PASSWORD_ENV);
    println!();
    println!("Examples:");
    println!("  sheetlift exercises ExerciseData.xlsx");
    println!("  sheetlift exercises ExerciseData.xlsx --update");
    println!("  sheetlift workouts WorkoutPlan.xlsx --dry-run");
}

/// Parses command-line arguments into a CliConfig struct.
fn parse_arguments(args: &[String]) -> Result<CliConfig, String> {
    let mut command = None;
    let mut positionals: Vec<String> = Vec::new();
    let mut update = false;
    let mut config_path = None;
    let mut email = None;
    let mut dry_run = false;
    let mut verbose = false;

    let mut i = 1; // Skip program name
    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--update" => {
                update = true;
            }
            "--dry-run" => {
                dry_run = true;
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("--config requires a path argument".to_string());
                }
                config_path = Some(args[i].clone());
            }
            "--email" => {
                i += 1;
                if i >= args.len() {
                    return Err("--email requires an address argument".to_string());
                }
                email = Some(args[i].clone());
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if command.is_none() {
                    command = Some(match arg.as_str() {
                        "exercises" => Command::Exercises,
                        "workouts" => Command::Workouts,
                        "export" => Command::Export,
                        other => return Err(format!("Unknown command: {}", other)),
                    });
                } else {
                    positionals.push(arg.clone());
                }
            }
        }
        i += 1;
    }

    let command = command.ok_or_else(|| "No command given".to_string())?;

    let mut positionals = positionals.into_iter();
    let input = positionals
        .next()
        .ok_or_else(|| "No input file given".to_string())?;
    let output = positionals.next();

    if positionals.next().is_some() {
        return Err("Too many arguments".to_string());
    }

    if command == Command::Export && output.is_none() {
        return Err("export requires an output file".to_string());
    }

    Ok(CliConfig {
        command,
        input,
        output,
        update,
        config_path,
        email,
        dry_run,
        verbose,
    })
}

/// Reads one line from stdin after printing a label.
fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Resolves account credentials: flags, environment, then prompts.
fn credentials(cli: &CliConfig) -> Result<(String, String), Box<dyn std::error::Error>> {
    let email = match &cli.email {
        Some(email) => email.clone(),
        None => match env::var(EMAIL_ENV) {
            Ok(email) => email,
            Err(_) => prompt("Email")?,
        },
    };
    if email.is_empty() {
        return Err("Email cannot be empty".into());
    }

    let password = match env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => prompt("Password (input is echoed)")?,
    };
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    Ok((email, password))
}

/// Builds a logged-in client.
fn connect(cli: &CliConfig, config: &AppConfig) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let (email, password) = credentials(cli)?;
    let mut client = ApiClient::new(&config.base_url)?;
    client.login(&email, &password)?;
    Ok(client)
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let cli = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    // Setup logging
    setup_logging(cli.verbose);

    // Print banner
    print_banner();

    if cli.dry_run {
        info!("Mode: DRY RUN (no network contact)");
        println!();
    }

    let config = AppConfig::load(cli.config_path.as_deref())?;
    if config.author_id.is_empty() {
        warn!("author_id is not configured; payloads will carry an empty author");
    }

    info!("Loading sheet: {}", cli.input);
    let grid = Grid::load(Path::new(&cli.input))?;

    match cli.command {
        Command::Exercises => {
            let gate = if cli.update {
                config.update_status
            } else {
                config.ready_status
            };
            let rows = extract_exercise_rows(&grid, gate)?;

            if rows.is_empty() {
                info!("No library rows with status {} found", gate);
                return Ok(());
            }

            if cli.dry_run {
                println!("Would process {} library rows:", rows.len());
                for row in &rows {
                    println!("  {}", row.name);
                }
                return Ok(());
            }

            let client = connect(&cli, &config)?;
            let engine = SyncEngine::new(&client, &config);
            let mode = if cli.update {
                SyncMode::Update
            } else {
                SyncMode::Add
            };
            let report = engine.sync_exercises(&rows, mode);
            print!("{}", report.summary());
        }
        Command::Workouts => {
            let workouts = extract_workouts(&grid)?;

            if cli.dry_run {
                println!("Would process {} workouts:", workouts.len());
                for workout in &workouts {
                    let state = if workout.is_ready(config.ready_status) {
                        "ready"
                    } else {
                        "skipped"
                    };
                    println!(
                        "  {} ({} sections, {})",
                        workout.title, workout.num_sections, state
                    );
                }
                return Ok(());
            }

            let client = connect(&cli, &config)?;
            let engine = SyncEngine::new(&client, &config);
            let report = engine.sync_workouts(&workouts);
            print!("{}", report.summary());
        }
        Command::Export => {
            if cli.dry_run {
                warn!("--dry-run does nothing for export");
                return Ok(());
            }

            // Presence checked at parse time
            let output = cli.output.clone().unwrap_or_default();
            let client = connect(&cli, &config)?;
            export_library(&client, &grid, Path::new(&output))?;
            println!("Library written to {}", output);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("sheetlift")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_exercises_command() {
        let cli = parse_arguments(&args(&["exercises", "data.xlsx"])).unwrap();
        assert_eq!(cli.command, Command::Exercises);
        assert_eq!(cli.input, "data.xlsx");
        assert!(!cli.update);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse_arguments(&args(&[
            "exercises",
            "data.xlsx",
            "--update",
            "--dry-run",
            "--verbose",
            "--email",
            "coach@example.com",
        ]))
        .unwrap();
        assert!(cli.update);
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.email.as_deref(), Some("coach@example.com"));
    }

    #[test]
    fn test_parse_export_requires_output() {
        assert!(parse_arguments(&args(&["export", "template.xlsx"])).is_err());

        let cli =
            parse_arguments(&args(&["export", "template.xlsx", "out.xlsx"])).unwrap();
        assert_eq!(cli.command, Command::Export);
        assert_eq!(cli.output.as_deref(), Some("out.xlsx"));
    }

    #[test]
    fn test_parse_rejects_unknown_command_and_option() {
        assert!(parse_arguments(&args(&["sync", "data.xlsx"])).is_err());
        assert!(parse_arguments(&args(&["exercises", "data.xlsx", "--fast"])).is_err());
    }

    #[test]
    fn test_parse_requires_command_and_input() {
        assert!(parse_arguments(&args(&[])).is_err());
        assert!(parse_arguments(&args(&["workouts"])).is_err());
    }

    #[test]
    fn test_parse_too_many_arguments() {
        assert!(parse_arguments(&args(&["workouts", "a.xlsx", "b.xlsx", "c.xlsx"])).is_err());
    }
}
