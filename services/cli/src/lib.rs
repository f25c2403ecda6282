mod cli;
mod render;

use zip_opportunity::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
