use std::sync::Arc;

// Domain layer
pub mod domain;

// Application layer
pub mod application;
use application::commands::AppState;

// Infrastructure layer
pub mod infrastructure;
use infrastructure::file_storage::FileStore;
use infrastructure::http_transport::ReqwestTransport;
use infrastructure::notification_surface::TerminalSurface;

// Services layer
pub mod services;

pub mod cli;

pub use crate::domain::errors::{
    user_message, ClientError, RunError, StorageError, TransportFailure,
};
pub use crate::domain::models::{ActionResponse, ConnectionConfig, HttpMethod, Payload, Severity};
pub use crate::services::notifier::TransientNotifier;
pub use crate::services::remote_data_client::RemoteDataClient;

pub async fn run() -> Result<(), RunError> {
    env_logger::init();

    let cli = cli::parse();
    let store = match &cli.store {
        Some(path) => FileStore::new(path.clone()),
        None => FileStore::default_location().map_err(|e| RunError::Setup(e.to_string()))?,
    };

    let state = AppState::new(
        Arc::new(store),
        Arc::new(ReqwestTransport::new()),
        Arc::new(TerminalSurface::new()),
    );

    let result = cli::dispatch(&state, cli.command).await;

    // Nothing outlives the process; clear the slot and its timer.
    state.notifier.dismiss();

    if let Some(output) = result.map_err(RunError::Reported)? {
        println!("{}", output);
    }
    Ok(())
}
