#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use dialoguer::Password;
use owo_colors::OwoColorize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::repl::format_sessions;
use crate::application::repl::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::usable_token;
use crate::domain::models::ChatApi;
use crate::domain::models::CredentialProvider;
use crate::infrastructure::api::solace::SolaceApi;
use crate::infrastructure::credentials::CredentialsManager;
use crate::infrastructure::credentials::FileCredentials;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn print_sessions_list() -> Result<()> {
    let token = match usable_token(&CredentialsManager::get()) {
        Some(token) => token,
        None => bail!("You're not signed in. Run `solace login` first."),
    };

    let sessions = SolaceApi::default().history(&token).await?;
    println!("{}", format_sessions(&sessions, None));

    return Ok(());
}

#[derive(Debug, PartialEq, Eq)]
enum LoginName {
    /// Passed with `--username` or `SOLACE_USERNAME`, used without asking.
    Given(String),
    /// Asked for interactively, pre-filled with the configured name if any.
    Prompt(Option<String>),
}

fn resolve_login_name(matches: &ArgMatches, configured: &str) -> LoginName {
    if let Some(username) = matches.get_one::<String>(&ConfigKey::Username.to_string()) {
        if !username.is_empty() {
            return LoginName::Given(username.to_string());
        }
    }

    if configured.is_empty() {
        return LoginName::Prompt(None);
    }

    return LoginName::Prompt(Some(configured.to_string()));
}

async fn login(matches: &ArgMatches) -> Result<()> {
    let theme = ColorfulTheme::default();
    let username = match resolve_login_name(matches, &Config::get(ConfigKey::Username)) {
        LoginName::Given(username) => username,
        LoginName::Prompt(default) => {
            let mut input = Input::<String>::with_theme(&theme).with_prompt("Username");
            if let Some(default) = default {
                input = input.default(default);
            }
            input.interact_text()?
        }
    };

    let password = match matches.get_one::<String>("password") {
        Some(password) => password.to_string(),
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?,
    };

    let token = SolaceApi::default().login(&username, &password).await?;
    let credentials = FileCredentials::default();
    credentials.set(&token)?;

    tracing::info!(username = %username, "Signed in");
    println!(
        "Signed in as {username}. Token saved to {}",
        credentials.file_path.to_string_lossy()
    );

    return Ok(());
}

fn logout() -> Result<()> {
    FileCredentials::default().clear()?;
    println!("Signed out.");

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    let parent = config_file_path
        .parent()
        .ok_or_else(|| return anyhow!("Config file path {config_file_path_str} has no parent"))?;
    if !parent.exists() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Solace")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Solace with environment variable RUST_LOG=solace")
        );
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Sign in and save the session token. Uses --username when set and prompts for anything missing.")
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .env("SOLACE_PASSWORD")
                .hide_env_values(true)
                .help("Account password.")
                .num_args(1),
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("solace")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start chatting. This is the default when no subcommand is given."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_login())
        .subcommand(Command::new("logout").about("Remove the saved session token."))
        .subcommand(Command::new("sessions").about("List your past conversations."))
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("SOLACE_API_URL")
                .num_args(1)
                .help(format!("Base URL of the Solace API. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("SOLACE_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionID.to_string())
                .short('i')
                .long(ConfigKey::SessionID.to_string())
                .env("SOLACE_SESSION_ID")
                .num_args(1)
                .help("Open a past conversation on start, by session ID or by its number in `solace sessions`.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Token.to_string())
                .long(ConfigKey::Token.to_string())
                .env("SOLACE_TOKEN")
                .hide_env_values(true)
                .num_args(1)
                .help("Session token to use instead of the saved one. Never written to disk.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::TokenFile.to_string())
                .long(ConfigKey::TokenFile.to_string())
                .env("SOLACE_TOKEN_FILE")
                .num_args(1)
                .help(format!("Where `solace login` saves the session token. [default: {}]", Config::default(ConfigKey::TokenFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .short('n')
                .long(ConfigKey::Username.to_string())
                .env("SOLACE_USERNAME")
                .num_args(1)
                .help("Your name, shown next to your messages. [default: $USER]")
                .global(true),
        );
}

/// Returns `true` when the interactive chat should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = Config::log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("login", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            login(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("logout", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            logout()?;
            return Ok(false);
        }
        Some(("sessions", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            print_sessions_list().await?;
            return Ok(false);
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
