//! Rendering pass: one binary diagram per temperature, one combined overlay,
//! one ternary simplex.  Each image is a pure function of the dataset and is
//! fully written before the next begins.

pub mod binary;
pub mod ternary;

use std::fs;

use anyhow::{Context, Result};
use log::info;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::model::{SolubilityDataset, Temperature};

/// File name of the per-temperature binary diagram.
fn group_file_name(temperature: Temperature) -> String {
    format!("phase_{temperature}C.png")
}

/// Render every image into `config.out_dir`, creating the directory first.
pub fn render_all(config: &Config, dataset: &SolubilityDataset, colors: &ColorMap) -> Result<()> {
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating output directory {}", config.out_dir.display()))?;

    for group in &dataset.groups {
        let path = config.out_dir.join(group_file_name(group.temperature));
        binary::render_group(group, &path)?;
        info!("wrote {}", path.display());
    }

    let combined = config.out_dir.join("phase_combined.png");
    binary::render_combined(dataset, colors, &combined, (config.width, config.height))?;
    info!("wrote {}", combined.display());

    let ternary_path = config.out_dir.join("ternary.png");
    ternary::render(dataset, colors, &ternary_path, (config.width, config.height))?;
    info!("wrote {}", ternary_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_embed_the_temperature() {
        assert_eq!(group_file_name(Temperature(25.0)), "phase_25C.png");
        assert_eq!(group_file_name(Temperature(22.5)), "phase_22.5C.png");
    }
}
