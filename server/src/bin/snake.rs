use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;

use arcade::{
    cli::{
        config::CliConfig,
        output::{OutputFormat, print_field, print_json_error, print_leaderboard, print_success},
        terminal::{PlayOptions, play},
    },
    engine::RuleSet,
    high_score::{FileHighScoreStore, HighScoreStore},
    score_client::ScoreClient,
    setup::setup_client_tracing,
};

#[derive(Parser)]
#[command(name = "snake")]
#[command(about = "Terminal snake with an online leaderboard", long_about = None)]
struct Cli {
    /// Score service base URL (overrides the config file)
    #[arg(long, global = true, env = "SNAKE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in this terminal
    Play {
        /// Name recorded with submitted scores
        #[arg(short, long)]
        name: Option<String>,
        /// Rule preset (arcade, classic, minimal)
        #[arg(long, default_value = "arcade")]
        rules: String,
        /// Don't talk to the score service
        #[arg(long)]
        offline: bool,
    },
    /// Show the leaderboard
    Scores {
        /// Output format (json, human); auto-detected when omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// Submit a score by hand
    Submit {
        score: i64,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the best score recorded on this machine
    Best,
    /// Client settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Update settings
    Set {
        /// Score service base URL
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    setup_client_tracing(CliConfig::log_path().ok().as_deref())?;
    let config = CliConfig::load()?;
    let api_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.api_url().to_string());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Play {
            name,
            rules,
            offline,
        } => {
            let rule_set = RuleSet::from_name(&rules)
                .ok_or_else(|| eyre!("Unknown rules '{}'. Use arcade, classic or minimal.", rules))?;
            let options = PlayOptions {
                rules: rule_set.rules(),
                player_name: name.unwrap_or_else(|| config.player_name().to_string()),
                client: (!offline).then(|| ScoreClient::new(&api_url)),
            };
            let mut high_scores = FileHighScoreStore::default_location()?;
            play(runtime.handle(), options, &mut high_scores)?;
        }
        Commands::Scores { format } => {
            let format = OutputFormat::from_flag(format.as_deref()).map_err(|e| eyre!(e))?;
            let client = ScoreClient::new(&api_url);
            match runtime.block_on(client.try_top_scores()) {
                Ok(scores) => print_leaderboard(&scores, format)?,
                Err(e) if format == OutputFormat::Json => {
                    print_json_error(&e.to_string());
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
        Commands::Submit { score, name } => {
            let client = ScoreClient::new(&api_url);
            let name = name.unwrap_or_else(|| config.player_name().to_string());
            let created = runtime.block_on(client.try_submit_score(score, &name))?;
            print_success("Score submitted!");
            print_field("ID", &created.score_id.to_string());
            print_field("Player", &created.player_name);
            print_field("Score", &created.score.to_string());
        }
        Commands::Best => {
            let store = FileHighScoreStore::default_location()?;
            println!("{}", store.get()?);
        }
        Commands::Config { command } => handle_config_command(command, config)?,
    }

    Ok(())
}

fn handle_config_command(command: ConfigCommands, mut config: CliConfig) -> color_eyre::Result<()> {
    match command {
        ConfigCommands::Show => {
            print_field("Config file", &CliConfig::config_path()?.display().to_string());
            print_field(
                "High score file",
                &FileHighScoreStore::default_location()?.path().display().to_string(),
            );
            print_field("API URL", config.api_url());
            print_field("Player", config.player_name());
        }
        ConfigCommands::Set { url, name } => {
            if url.is_none() && name.is_none() {
                return Err(eyre!("Nothing to set. Pass --url and/or --name."));
            }
            if let Some(url) = url {
                config.api_url = Some(url);
            }
            if let Some(name) = name {
                config.player_name = Some(name);
            }
            config.save()?;
            print_success("Config saved.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, error::ErrorKind};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_needs_no_local_state() {
        let err = Cli::try_parse_from(["snake", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["snake", "play", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_api_url_is_global() {
        let cli = Cli::try_parse_from(["snake", "scores", "--api-url", "http://localhost:9"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9"));
        assert!(matches!(cli.command, Commands::Scores { format: None }));
    }
}
