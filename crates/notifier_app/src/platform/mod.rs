mod app;
mod cli;
mod input;

pub use app::run_app;
