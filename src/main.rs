//! Profile Form
//!
//! `profile-form serve` runs the mocked answers API; `profile-form` (or `console`) runs the
//! terminal session against it.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use profile_form::client::HttpAnswersApi;
use profile_form::config::Config;
use profile_form::console::Console;
use profile_form::errors::AppError;
use profile_form::repo::AnswersRepository;
use profile_form::store::AnswersStore;
use profile_form::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "console".to_string());
    match mode.as_str() {
        "serve" => serve(config).await?,
        "console" => console(config).await?,
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown mode {:?}; expected `serve` or `console`",
                other
            ))
            .into())
        }
    }

    Ok(())
}

/// Run the mocked answers API until the process is stopped.
async fn serve(config: Config) -> Result<(), AppError> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Mocked answers API listening on {}", config.bind_addr);

    let app = create_router(app_state(config)?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Drive the form and table from stdin, spawning the mocked API unless one is configured.
async fn console(config: Config) -> Result<(), AppError> {
    let base_url = match config.api_url.clone() {
        Some(url) => url,
        None => {
            let listener = TcpListener::bind(&config.bind_addr).await?;
            let addr: SocketAddr = listener.local_addr()?;
            let app = create_router(app_state(config.clone())?);
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app).await {
                    tracing::error!("Mocked answers API stopped: {}", e);
                }
            });
            tracing::info!("Mocked answers API listening on {}", addr);
            format!("http://{}", addr)
        }
    };

    let api = Arc::new(HttpAnswersApi::new(base_url));
    let mut session = Console::new(api, AnswersStore::global(), config.redirect_delay);

    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

fn app_state(config: Config) -> Result<AppState, AppError> {
    Ok(AppState {
        repo: Arc::new(AnswersRepository::new()?),
        config: Arc::new(config),
    })
}
