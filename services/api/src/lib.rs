mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use finpro_contact::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
