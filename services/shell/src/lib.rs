mod cli;
mod infra;
mod replay;
mod routes;
mod server;

use route_gate::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
