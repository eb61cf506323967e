mod color;
mod config;
mod data;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::loader;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();
    config.register_font()?;

    let spec = config.table_spec();
    let dataset = loader::load_file(&config.input, &spec)
        .with_context(|| format!("loading {}", config.input.display()))?;

    if dataset.is_empty() {
        warn!("{}: no data rows, nothing to render", config.input.display());
        return Ok(());
    }
    info!(
        "loaded {} measurements across {} temperature groups",
        dataset.point_count(),
        dataset.groups.len()
    );

    let colors = ColorMap::new(dataset.groups.iter().map(|g| g.temperature));
    render::render_all(&config, &dataset, &colors)
}
