use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde::Deserialize;
use thiserror::Error;

use super::model::{Measurement, SolubilityDataset};

// ---------------------------------------------------------------------------
// Table description
// ---------------------------------------------------------------------------

/// Header names of the four required columns.
#[derive(Debug, Clone)]
pub struct Columns {
    pub temperature: String,
    pub nacl: String,
    pub kcl: String,
    pub solid_phase: String,
}

/// Everything the loader needs to know about the input table layout.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub columns: Columns,
    /// 0-based index of the header row inside spreadsheet inputs. The
    /// observed workbook carries one banner row above the header.
    pub header_row: usize,
    /// Solid-phase label marking co-saturation of both salts.
    pub eutectic_label: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required column '{0}' in header row")]
    MissingColumn(String),

    #[error("data row {row}: column '{column}' value '{value}' is not a number")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("data row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: String },

    #[error("data row {row}: blank temperature with no preceding value to inherit")]
    LeadingBlankTemperature { row: usize },

    #[error("workbook contains no sheets")]
    NoSheet,

    #[error("header row {0} is past the end of the sheet")]
    HeaderPastEnd(usize),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a solubility table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – spreadsheet; header located via [`TableSpec::header_row`]
/// * `.csv`           – header row first, column names per [`Columns`]
/// * `.json`          – records-oriented array with fixed keys
///   `temperature` / `nacl` / `kcl` / `solid_phase`
pub fn load_file(path: &Path, spec: &TableSpec) -> Result<SolubilityDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let measurements = match ext.as_str() {
        "xlsx" | "xls" => load_spreadsheet(path, spec)?,
        "csv" => load_csv(path, spec)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    SolubilityDataset::from_measurements(&measurements, &spec.eutectic_label)
        .context("building temperature groups")
}

// ---------------------------------------------------------------------------
// Raw rows and temperature forward-fill
// ---------------------------------------------------------------------------

/// One parsed row before the temperature column is forward-filled.
#[derive(Debug)]
struct RawRow {
    /// 1-based data-row number, for error messages.
    row: usize,
    temperature: Option<f64>,
    nacl: f64,
    kcl: f64,
    solid_phase: String,
}

/// Propagate the last seen non-blank temperature down blank cells.  The
/// observed workbook writes the temperature only on the first row of each
/// block (merged cells), so this is the rule that reunites the blocks.
fn forward_fill(rows: Vec<RawRow>) -> Result<Vec<Measurement>, LoadError> {
    let mut last_temperature = None;
    let mut out = Vec::with_capacity(rows.len());

    for raw in rows {
        if let Some(t) = raw.temperature {
            last_temperature = Some(t);
        }
        let temperature = last_temperature
            .ok_or(LoadError::LeadingBlankTemperature { row: raw.row })?;

        out.push(Measurement {
            temperature,
            nacl: raw.nacl,
            kcl: raw.kcl,
            solid_phase: raw.solid_phase,
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, spec: &TableSpec) -> Result<Vec<Measurement>> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file, spec)
}

fn read_csv<R: Read>(reader: R, spec: &TableSpec) -> Result<Vec<Measurement>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let cols = &spec.columns;
    let temp_idx = column_index(&headers, &cols.temperature)?;
    let nacl_idx = column_index(&headers, &cols.nacl)?;
    let kcl_idx = column_index(&headers, &cols.kcl)?;
    let solid_idx = column_index(&headers, &cols.solid_phase)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("CSV data row {row}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        if field(temp_idx).is_empty()
            && field(nacl_idx).is_empty()
            && field(kcl_idx).is_empty()
            && field(solid_idx).is_empty()
        {
            continue; // fully blank row
        }

        rows.push(RawRow {
            row,
            temperature: parse_optional_f64(field(temp_idx), row, &cols.temperature)?,
            nacl: parse_required_f64(field(nacl_idx), row, &cols.nacl)?,
            kcl: parse_required_f64(field(kcl_idx), row, &cols.kcl)?,
            solid_phase: field(solid_idx).to_string(),
        });
    }

    Ok(forward_fill(rows)?)
}

fn column_index(headers: &[String], name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

fn parse_optional_f64(s: &str, row: usize, column: &str) -> Result<Option<f64>, LoadError> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::BadNumber {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

fn parse_required_f64(s: &str, row: usize, column: &str) -> Result<f64, LoadError> {
    parse_optional_f64(s, row, column)?.ok_or_else(|| LoadError::MissingValue {
        row,
        column: column.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Spreadsheet loader (xlsx / xls)
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path, spec: &TableSpec) -> Result<Vec<Measurement>> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet_names = workbook.sheet_names().to_owned();
    let first_sheet = sheet_names.first().cloned().ok_or(LoadError::NoSheet)?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .with_context(|| format!("reading sheet '{first_sheet}'"))?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows
        .nth(spec.header_row)
        .ok_or(LoadError::HeaderPastEnd(spec.header_row))?;
    let headers: Vec<String> = header
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let cols = &spec.columns;
    let temp_idx = column_index(&headers, &cols.temperature)?;
    let nacl_idx = column_index(&headers, &cols.nacl)?;
    let kcl_idx = column_index(&headers, &cols.kcl)?;
    let solid_idx = column_index(&headers, &cols.solid_phase)?;

    let empty = Data::Empty;
    let mut rows = Vec::new();
    for (i, cells) in sheet_rows.enumerate() {
        let row = i + 1;
        let cell = |idx: usize| cells.get(idx).unwrap_or(&empty);

        if cells.iter().all(is_blank_cell) {
            continue; // spreadsheets often carry trailing empty rows
        }

        rows.push(RawRow {
            row,
            temperature: cell_to_f64(cell(temp_idx), row, &cols.temperature)?,
            nacl: cell_to_f64(cell(nacl_idx), row, &cols.nacl)?.ok_or_else(|| {
                LoadError::MissingValue {
                    row,
                    column: cols.nacl.clone(),
                }
            })?,
            kcl: cell_to_f64(cell(kcl_idx), row, &cols.kcl)?.ok_or_else(|| {
                LoadError::MissingValue {
                    row,
                    column: cols.kcl.clone(),
                }
            })?,
            solid_phase: cell_to_string(cell(solid_idx)),
        });
    }

    Ok(forward_fill(rows)?)
}

fn is_blank_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Coerce a spreadsheet cell to a number.  Numeric-looking text counts:
/// exported workbooks occasionally store numbers as strings.
fn cell_to_f64(cell: &Data, row: usize, column: &str) -> Result<Option<f64>, LoadError> {
    match cell {
        Data::Empty => Ok(None),
        Data::Float(v) => Ok(Some(*v)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            LoadError::BadNumber {
                row,
                column: column.to_string(),
                value: s.clone(),
            }
        }),
        other => Err(LoadError::BadNumber {
            row,
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

fn cell_to_string(cell: &Data) -> String {
    cell.to_string().trim().to_string()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "temperature": 25.0, "nacl": 10.0, "kcl": 5.0, "solid_phase": "NaCl" },
///   { "temperature": null, "nacl": 8.0,  "kcl": 12.0, "solid_phase": "NaCl+KCl" }
/// ]
/// ```
///
/// A `null` or absent temperature inherits the previous row's value, the same
/// forward-fill rule the spreadsheet path applies.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(default)]
    temperature: Option<f64>,
    nacl: f64,
    kcl: f64,
    #[serde(default)]
    solid_phase: String,
}

fn load_json(path: &Path) -> Result<Vec<Measurement>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<Vec<Measurement>> {
    let records: Vec<JsonRecord> = serde_json::from_str(text).context("parsing JSON")?;

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| RawRow {
            row: i + 1,
            temperature: r.temperature,
            nacl: r.nacl,
            kcl: r.kcl,
            solid_phase: r.solid_phase,
        })
        .collect();

    Ok(forward_fill(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TableSpec {
        TableSpec {
            columns: Columns {
                temperature: "temperature".to_string(),
                nacl: "nacl".to_string(),
                kcl: "kcl".to_string(),
                solid_phase: "solid_phase".to_string(),
            },
            header_row: 1,
            eutectic_label: "NaCl+KCl".to_string(),
        }
    }

    #[test]
    fn csv_roundtrip_with_forward_fill() {
        let csv = "\
temperature,nacl,kcl,solid_phase
25,10,5,NaCl
,8,12,NaCl+KCl
,2,20,KCl
50,11,6,NaCl
";
        let rows = read_csv(csv.as_bytes(), &spec()).unwrap();

        assert_eq!(rows.len(), 4);
        let temps: Vec<f64> = rows.iter().map(|m| m.temperature).collect();
        assert_eq!(temps, vec![25.0, 25.0, 25.0, 50.0]);
        assert_eq!(rows[1].nacl, 8.0);
        assert_eq!(rows[1].solid_phase, "NaCl+KCl");
    }

    #[test]
    fn csv_missing_column_names_the_column() {
        let csv = "temperature,nacl,solid_phase\n25,10,NaCl\n";
        let err = read_csv(csv.as_bytes(), &spec()).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().expect("typed error");
        assert!(matches!(load_err, LoadError::MissingColumn(c) if c == "kcl"));
    }

    #[test]
    fn csv_bad_number_reports_row_and_value() {
        let csv = "temperature,nacl,kcl,solid_phase\n25,ten,5,NaCl\n";
        let err = read_csv(csv.as_bytes(), &spec()).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::BadNumber { row, column, value }) => {
                assert_eq!(*row, 1);
                assert_eq!(column, "nacl");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_leading_blank_temperature_is_an_error() {
        let csv = "temperature,nacl,kcl,solid_phase\n,10,5,NaCl\n";
        let err = read_csv(csv.as_bytes(), &spec()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::LeadingBlankTemperature { row: 1 })
        ));
    }

    #[test]
    fn csv_blank_rows_are_skipped() {
        let csv = "temperature,nacl,kcl,solid_phase\n25,10,5,NaCl\n,,,\n";
        let rows = read_csv(csv.as_bytes(), &spec()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn csv_header_only_yields_no_rows() {
        let csv = "temperature,nacl,kcl,solid_phase\n";
        let rows = read_csv(csv.as_bytes(), &spec()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn json_records_parse_and_forward_fill() {
        let json = r#"[
            { "temperature": 25.0, "nacl": 10.0, "kcl": 5.0, "solid_phase": "NaCl" },
            { "temperature": null, "nacl": 8.0, "kcl": 12.0, "solid_phase": "NaCl+KCl" },
            { "nacl": 2.0, "kcl": 20.0 }
        ]"#;
        let rows = read_json(json).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|m| m.temperature == 25.0));
        assert_eq!(rows[2].solid_phase, "");
    }

    #[test]
    fn spreadsheet_cells_coerce_to_numbers() {
        assert_eq!(cell_to_f64(&Data::Float(26.4), 1, "nacl").unwrap(), Some(26.4));
        assert_eq!(cell_to_f64(&Data::Int(25), 1, "nacl").unwrap(), Some(25.0));
        assert_eq!(
            cell_to_f64(&Data::String(" 12.5 ".to_string()), 1, "nacl").unwrap(),
            Some(12.5)
        );
        assert_eq!(cell_to_f64(&Data::Empty, 1, "nacl").unwrap(), None);
        assert_eq!(
            cell_to_f64(&Data::String("  ".to_string()), 1, "nacl").unwrap(),
            None
        );
        assert!(cell_to_f64(&Data::String("n/a".to_string()), 1, "nacl").is_err());
        assert!(cell_to_f64(&Data::Bool(true), 1, "nacl").is_err());
    }

    #[test]
    fn blank_cell_detection() {
        assert!(is_blank_cell(&Data::Empty));
        assert!(is_blank_cell(&Data::String(" ".to_string())));
        assert!(!is_blank_cell(&Data::Float(0.0)));
        assert!(!is_blank_cell(&Data::String("NaCl".to_string())));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("table.parquet"), &spec()).unwrap_err();
        assert!(err.to_string().contains(".parquet"));
    }
}
