use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use touchline::api::data::AiTask;
use touchline::config::{ConfigError, TokenStoreKind};
use touchline::{ApiClient, AuthError, ClientConfig, LoginRequest, SessionController, SessionStore, SignupRequest};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `touchline login` first")]
    NotLoggedIn,
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "touchline", about = "Touchline coaching assistant API client")]
struct Cli {
    #[arg(long, env = "TOUCHLINE_API_URL")]
    api_url: Option<String>,

    /// Keep the access token in this file. Overrides `TOUCHLINE_TOKEN_STORE`.
    #[arg(long)]
    token_file: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Session(SessionCommand),
    /// Call the data endpoints with the stored token.
    Api(ApiCommand),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Log in and store the access token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "TOUCHLINE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new account.
    Signup(SignupArgs),
    /// Invalidate the session and forget the stored token.
    Logout,
    /// Print the user behind the stored token.
    Whoami,
    /// Exchange the stored token for a fresh one.
    Refresh,
    /// Print the session phase and current user.
    Status,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long, env = "TOUCHLINE_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    role: Option<String>,
    #[arg(long)]
    team_id: Option<i64>,
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    #[command(subcommand)]
    Match(MatchSubcommand),
    #[command(subcommand)]
    Team(CollectionSubcommand),
    #[command(subcommand)]
    Player(CollectionSubcommand),
    #[command(subcommand)]
    Analysis(AnalysisSubcommand),
    Ai {
        #[arg(value_enum)]
        task: AiTaskArg,
        #[arg(long, help = "JSON context sent as the request body")]
        data: String,
    },
}

#[derive(Subcommand, Debug)]
enum MatchSubcommand {
    List,
    Read { match_id: i64 },
    Create {
        #[arg(long)]
        data: String,
    },
}

#[derive(Subcommand, Debug)]
enum CollectionSubcommand {
    List,
    Create {
        #[arg(long)]
        data: String,
    },
}

#[derive(Subcommand, Debug)]
enum AnalysisSubcommand {
    Match { match_id: i64 },
    Team { team_id: i64 },
    Player { player_id: i64 },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AiTaskArg {
    Recommendations,
    Prediction,
    Opponent,
    Training,
}

impl From<AiTaskArg> for AiTask {
    fn from(arg: AiTaskArg) -> Self {
        match arg {
            AiTaskArg::Recommendations => Self::Recommendations,
            AiTaskArg::Prediction => Self::MatchPrediction,
            AiTaskArg::Opponent => Self::OpponentAnalysis,
            AiTaskArg::Training => Self::TrainingSuggestions,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let config = resolve_config(ClientConfig::from_env()?, cli.api_url, cli.token_file)?;
    let store = SessionStore::from_config(&config);
    let api = ApiClient::from_config(&config, store.clone())?;

    match cli.command {
        Command::Api(api_cmd) => {
            if !store.has_token() {
                return Err(CliError::NotLoggedIn);
            }
            run_api(&api, api_cmd).await
        }
        Command::Session(command) => {
            let session = SessionController::connect(store, Arc::new(api)).await;
            run_session(&session, command).await
        }
    }
}

/// Apply command-line overrides on top of the environment config.
fn resolve_config(
    mut config: ClientConfig,
    api_url: Option<String>,
    token_file: Option<PathBuf>,
) -> Result<ClientConfig, CliError> {
    if let Some(url) = api_url {
        config.api_url = touchline::config::normalize_api_url(&url)?;
    }
    if let Some(path) = token_file {
        config.token_store = TokenStoreKind::File;
        config.token_file = Some(path);
    }
    Ok(config)
}

async fn run_session(session: &SessionController, command: SessionCommand) -> Result<(), CliError> {
    match command {
        SessionCommand::Login { username, password } => {
            let user = session
                .login(&LoginRequest::new(username, password))
                .await?;
            eprintln!("logged in as {}", user.display_name());
            Ok(())
        }
        SessionCommand::Signup(args) => {
            let request = SignupRequest {
                email: args.email,
                username: args.username,
                password: args.password,
                full_name: args.full_name,
                role: args.role,
                team_id: args.team_id,
            };
            let user = session.signup(&request).await?;
            eprintln!("registered {}; run `touchline login` to start a session", user.username);
            Ok(())
        }
        SessionCommand::Logout => {
            session.logout().await;
            eprintln!("logged out");
            Ok(())
        }
        SessionCommand::Whoami => {
            let user = session
                .snapshot()
                .user
                .ok_or(CliError::NotLoggedIn)?;
            print_json(&serde_json::to_value(user)?)
        }
        SessionCommand::Refresh => {
            if !session.store().has_token() {
                return Err(CliError::NotLoggedIn);
            }
            let user = session.refresh().await?;
            eprintln!("token refreshed for {}", user.display_name());
            Ok(())
        }
        SessionCommand::Status => {
            let snapshot = session.snapshot();
            print_json(&serde_json::json!({
                "phase": format!("{:?}", snapshot.phase()),
                "authenticated": snapshot.is_authenticated(),
                "user": snapshot.user,
                "error": snapshot.error,
            }))
        }
    }
}

async fn run_api(api: &ApiClient, api_cmd: ApiCommand) -> Result<(), CliError> {
    let json = match api_cmd.command {
        ApiSubcommand::Match(MatchSubcommand::List) => api.matches().await?,
        ApiSubcommand::Match(MatchSubcommand::Read { match_id }) => api.match_by_id(match_id).await?,
        ApiSubcommand::Match(MatchSubcommand::Create { data }) => api.create_match(&parse_data(&data)?).await?,
        ApiSubcommand::Team(CollectionSubcommand::List) => api.teams().await?,
        ApiSubcommand::Team(CollectionSubcommand::Create { data }) => api.create_team(&parse_data(&data)?).await?,
        ApiSubcommand::Player(CollectionSubcommand::List) => api.players().await?,
        ApiSubcommand::Player(CollectionSubcommand::Create { data }) => {
            api.create_player(&parse_data(&data)?).await?
        }
        ApiSubcommand::Analysis(AnalysisSubcommand::Match { match_id }) => api.match_analysis(match_id).await?,
        ApiSubcommand::Analysis(AnalysisSubcommand::Team { team_id }) => api.team_performance(team_id).await?,
        ApiSubcommand::Analysis(AnalysisSubcommand::Player { player_id }) => api.player_stats(player_id).await?,
        ApiSubcommand::Ai { task, data } => api.ai(task.into(), &parse_data(&data)?).await?,
    };
    print_json(&json)
}

fn parse_data(raw: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str::<Value>(raw)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
