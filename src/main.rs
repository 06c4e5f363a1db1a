mod app;
mod catalog;
mod cli;
mod config;
mod fetch;
mod opener;
mod theme;
mod ui;
mod view;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
