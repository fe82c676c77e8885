mod cli;
mod evaluate;
mod infra;
mod table;

use nvi_points::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
