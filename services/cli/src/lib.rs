mod cli;
mod commands;
mod demo;
mod infra;
mod render;

use coach_tracker::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
