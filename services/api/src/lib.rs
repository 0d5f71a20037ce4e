mod cli;
mod infra;
mod interview;
mod routes;
mod server;

use reciprocity::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
