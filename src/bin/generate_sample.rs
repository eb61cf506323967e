//! Writes a small demo solubility table so the renderer can be tried without
//! the source workbook:
//!
//! ```sh
//! cargo run --bin generate_sample
//! cargo run -- demo.csv \
//!     --temperature-column temperature --nacl-column nacl \
//!     --kcl-column kcl --solid-phase-column solid_phase
//! ```

use anyhow::{Context, Result};

/// Saturation curves at 25/50/75 °C, NaCl-rich end to KCl-rich end.  The
/// middle row of each block is the co-saturation point; continuation rows
/// leave the temperature blank the way merged spreadsheet cells export.
const ROWS: &[(&str, f64, f64, &str)] = &[
    ("25", 26.4, 0.0, "NaCl"),
    ("", 24.0, 5.5, "NaCl"),
    ("", 20.4, 11.1, "NaCl+KCl"),
    ("", 13.9, 17.5, "KCl"),
    ("", 0.0, 26.2, "KCl"),
    ("50", 26.8, 0.0, "NaCl"),
    ("", 24.3, 6.7, "NaCl"),
    ("", 20.0, 13.2, "NaCl+KCl"),
    ("", 12.8, 21.4, "KCl"),
    ("", 0.0, 30.0, "KCl"),
    ("75", 27.3, 0.0, "NaCl"),
    ("", 24.6, 7.9, "NaCl"),
    ("", 19.6, 15.4, "NaCl+KCl"),
    ("", 11.7, 25.1, "KCl"),
    ("", 0.0, 33.6, "KCl"),
];

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "demo.csv".to_string());

    let mut writer = csv::Writer::from_path(&path).context("creating output file")?;
    writer.write_record(["temperature", "nacl", "kcl", "solid_phase"])?;

    for (temperature, nacl, kcl, solid_phase) in ROWS {
        writer.write_record([
            temperature.to_string(),
            nacl.to_string(),
            kcl.to_string(),
            solid_phase.to_string(),
        ])?;
    }
    writer.flush()?;

    let blocks = ROWS.iter().filter(|(t, ..)| !t.is_empty()).count();
    println!("Wrote {} rows ({blocks} temperature blocks) to {path}", ROWS.len());
    Ok(())
}
