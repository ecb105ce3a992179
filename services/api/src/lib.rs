mod cli;
mod eligibility;
mod infra;
mod routes;
mod server;

use volunteer_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
