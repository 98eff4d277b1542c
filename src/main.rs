use clap::{Parser, Subcommand};
use lmis_session::config::normalize_base_url;
use lmis_session::{AuthManager, ClientConfig, SessionError, SessionStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    AuthFailed(String),
}

/// Flags override the `LMIS_*` environment read by `ClientConfig::from_env`.
#[derive(Parser, Debug)]
#[command(name = "lmis-session", about = "LMIS auth session client")]
struct Cli {
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long)]
    connect_timeout_ms: Option<u64>,

    /// Put the user returned by a successful sign-in into the session.
    #[arg(long, default_value_t = false)]
    apply_login_user: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the resulting message.
    Login {
        #[arg(long, env = "LMIS_USERNAME")]
        username: String,

        #[arg(long, env = "LMIS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Path to GET after a successful sign-in, sent with the session token.
        #[arg(long)]
        get: Option<String>,
    },
    /// Run the registration placeholder.
    Register,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let store = SessionStore::new(&config)?;
    let auth = AuthManager::from_config(store, &config);
    tracing::info!(base_url = %config.base_url, "session client ready");

    match cli.command {
        Command::Login { username, password, get } => run_login(&auth, &username, &password, get.as_deref()).await,
        Command::Register => {
            let status = auth.register();
            println!("{} {}", status.code, status.message);
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = normalize_base_url(base_url);
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeouts.request_ms = ms;
    }
    if let Some(ms) = cli.connect_timeout_ms {
        config.timeouts.connect_ms = ms;
    }
    if cli.apply_login_user {
        config.apply_login_user = true;
    }
    Ok(config)
}

async fn run_login(auth: &AuthManager, username: &str, password: &str, get: Option<&str>) -> Result<(), CliError> {
    let result = auth.login(username, password).await;
    println!("{}", auth.message());
    if !result.is_success() {
        return Err(CliError::AuthFailed(auth.message()));
    }

    let Some(path) = get else {
        return Ok(());
    };
    if !auth.store().is_logged_in() {
        tracing::warn!("session has no user; request will be sent without Authorization");
    }
    let response = auth.store().http_client().get(path).await.map_err(SessionError::from)?;
    println!("HTTP {}", response.status);
    println!("{}", response.body);
    Ok(())
}
