use std::{
    process::ExitCode,
    sync::Arc,
};

use dotenv;
use tokio::sync::{
    mpsc,
    watch,
};

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod poller;
pub mod price_fetcher;
pub mod price_info;
pub mod shared_state;
pub mod web;

use chart::Snapshot;
use config::Config;
use dashboard::{
    Dashboard,
    Event,
};
use error::{
    Result,
    ServiceError,
};
use history::History;
use poller::Poller;
use price_fetcher::PriceFetcher;
use shared_state::SharedState;
use web::AppState;



#[tokio::main]
async fn main() -> ExitCode {
    // Environment alone is enough to run, .env is optional.
    let env_loaded = dotenv::from_path(".env");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", ServiceError::from(e));
            return ExitCode::FAILURE
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    if let Err(e) = env_loaded {
        tracing::debug!("no .env loaded: {}", e);
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}



async fn run(config: Config) -> Result<()> {
    let state = Arc::new(SharedState::default());

    let (tx_events, rx_events) = mpsc::channel::<Event>(16);
    let (tx_snapshot, rx_snapshot) = watch::channel(Snapshot::waiting(config.default_symbol));

    let fetcher = PriceFetcher::new(&config.price_url, config.request_timeout)?;
    tracing::info!("fetching prices from {}", fetcher.url());

    let dashboard = Dashboard::new(config.default_symbol, History::new(config.history_len));
    let mut poller = Poller::new(fetcher, dashboard, rx_events, tx_snapshot);
    poller.poll_period_set(config.poll_period);

    let app = web::router(AppState {
        shared: state.clone(),
        tx_events,
        rx_snapshot,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("dashboard listening on http://{}", listener.local_addr()?);

    let poller_h = tokio::spawn(poller::main(poller, state.clone()));

    let state_signal = state.clone();
    let sig_h = tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                let Err(e) = res else {
                    tracing::info!("shut down requested");
                    state_signal.shut_down_request();
                    return
                };

                // Without a signal handler the service keeps running until
                // something else shuts it down.
                tracing::error!("could not listen for Ctrl+C: {}", e);
                state_signal.shut_down_wait().await;
            }
            _ = state_signal.shut_down_wait() => {}
        }
    });

    let state_server = state.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { state_server.shut_down_wait().await })
        .await;

    // Server may also stop on its own (I/O error), take the rest down with it.
    state.shut_down_request();

    let _ = poller_h.await;
    let _ = sig_h.await;

    served?;
    Ok(())
}
