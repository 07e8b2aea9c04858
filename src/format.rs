//! Formatting utilities for the cloud CLI.
//!
//! Command results are printed as an aligned table (the default), as JSON or
//! as CSV. Everything printable builds a [`Table`]; JSON goes through serde.

use std::str::FromStr;

use csv::Writer;
use strum::EnumIter;

use crate::{model::Health, ui::styles};

pub const TABLE: &str = "table";
pub const JSON: &str = "json";
pub const CSV: &str = "csv";

/// Spaces between two table columns
const COLUMN_GAP: usize = 2;

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, Eq, EnumIter)]
pub enum OutputFormat {
    /// Aligned columns for people
    Table(OutputFormatOptions),
    Json(OutputFormatOptions),
    Csv(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        vec![TABLE, JSON, CSV]
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        match format_str.to_lowercase().as_str() {
            TABLE => Ok(OutputFormat::Table(options)),
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            other => Err(FormattingError::UnsupportedOutputFormat(other.to_string())),
        }
    }

    pub fn options(&self) -> &OutputFormatOptions {
        match self {
            OutputFormat::Table(options) | OutputFormat::Json(options) | OutputFormat::Csv(options) => options,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputFormat::Table(_) => write!(f, "{}", TABLE),
            OutputFormat::Json(_) => write!(f, "{}", JSON),
            OutputFormat::Csv(_) => write!(f, "{}", CSV),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

pub trait Formattable {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError>;
}

/// Serializes a value as JSON, pretty-printed on request.
pub fn to_json<T: serde::Serialize + ?Sized>(
    value: &T,
    options: &OutputFormatOptions,
) -> Result<String, FormattingError> {
    if options.pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub health: Health,
}

impl Cell {
    /// A cell colored by the health of what it describes.
    pub fn colored(text: impl Into<String>, health: Health) -> Self {
        Self {
            text: text.into(),
            health,
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::colored(text, Health::Neutral)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::colored(text, Health::Neutral)
    }
}

/// Rows of cells under a fixed set of column titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.rows.push(cells.into_iter().collect());
        self
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .map(|cell| cell.text.chars().count())
                    .chain([header.chars().count()])
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Aligned columns with a bold header line. Cells are padded before they
    /// are colored so escape codes never skew the alignment.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let pad = |text: &str, column: usize| {
            let width = widths.get(column).copied().unwrap_or_default();
            format!("{:<width$}", text, width = width)
        };
        let join = |cells: Vec<String>| cells.join(&" ".repeat(COLUMN_GAP)).trim_end().to_string();

        let mut lines = vec![join(
            self.headers
                .iter()
                .enumerate()
                .map(|(column, header)| styles::title(&pad(header, column)))
                .collect(),
        )];
        for row in &self.rows {
            lines.push(join(
                row.iter()
                    .enumerate()
                    .map(|(column, cell)| styles::health(&pad(&cell.text, column), cell.health))
                    .collect(),
            ));
        }
        lines.join("\n")
    }

    pub fn to_csv(&self, with_headers: bool) -> Result<String, FormattingError> {
        let mut wtr = Writer::from_writer(Vec::new());
        if with_headers {
            wtr.write_record(&self.headers)?;
        }
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.text.as_str()))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(String::from_utf8(wtr.into_inner()?)?)
    }
}
