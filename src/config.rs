//! Command-line configuration

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use plotters::style::{register_font, FontStyle};

use crate::data::loader::{Columns, TableSpec};

/// Salt-solubility phase-diagram renderer
#[derive(Parser, Clone, Debug)]
#[command(name = "solplot")]
#[command(about = "Render NaCl-KCl-H2O phase diagrams from a solubility table")]
pub struct Config {
    /// Input table (.xlsx, .xls, .csv or .json)
    pub input: PathBuf,

    /// Directory the PNG files are written to (created if absent)
    #[arg(long, default_value = "output")]
    pub out_dir: PathBuf,

    /// 0-based row index of the header row inside spreadsheet inputs
    #[arg(long, default_value = "1")]
    pub header_row: usize,

    /// Header of the temperature column
    #[arg(long, default_value = "温度/℃")]
    pub temperature_column: String,

    /// Header of the liquid-phase NaCl percentage column
    #[arg(long, default_value = "液相NaCl/%")]
    pub nacl_column: String,

    /// Header of the liquid-phase KCl percentage column
    #[arg(long, default_value = "液相KCl/%")]
    pub kcl_column: String,

    /// Header of the solid-phase label column
    #[arg(long, default_value = "固相")]
    pub solid_phase_column: String,

    /// Solid-phase label marking co-saturation of both salts
    #[arg(long, default_value = "NaCl+KCl")]
    pub eutectic_label: String,

    /// TTF/OTF font file to use for chart text, e.g. for non-Latin labels;
    /// the built-in sans-serif family is used when omitted
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Width of the combined and ternary images, in pixels
    #[arg(long, default_value = "1000")]
    pub width: u32,

    /// Height of the combined and ternary images, in pixels
    #[arg(long, default_value = "800")]
    pub height: u32,
}

impl Config {
    /// The table layout the loader should expect.
    pub fn table_spec(&self) -> TableSpec {
        TableSpec {
            columns: Columns {
                temperature: self.temperature_column.clone(),
                nacl: self.nacl_column.clone(),
                kcl: self.kcl_column.clone(),
                solid_phase: self.solid_phase_column.clone(),
            },
            header_row: self.header_row,
            eutectic_label: self.eutectic_label.clone(),
        }
    }

    /// Register the user-supplied font under the `sans-serif` family every
    /// chart style refers to.  A missing or unreadable font file fails here,
    /// before any image is rendered.
    pub fn register_font(&self) -> Result<()> {
        let Some(path) = &self.font else {
            return Ok(());
        };
        let data = std::fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        // plotters keeps the face for the life of the process.
        let data: &'static [u8] = Box::leak(data.into_boxed_slice());
        register_font("sans-serif", FontStyle::Normal, data)
            .map_err(|_| anyhow!("font file {} is not a usable TTF/OTF face", path.display()))
    }
}
