/** ------------------------------------------------------------
 * Scheduler log loading (CSV -> dataframe)
 * ------------------------------------------------------------- */
use crate::errors::{FlowtraceError, Result};
use crate::packed::PackedSchema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/**
 * Column layout of a scheduler log
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogFormat {
    /// Enqueue/dequeue times are plain numeric columns
    Plain { id_column: String },
    /// Enqueue/dequeue times are packed into one hex column
    Packed {
        data_column: String,
        id_column: String,
        #[serde(default)]
        schema: PackedSchema,
    },
}

impl LogFormat {
    /// Simulator output, flows identified by source address
    pub fn simulator() -> Self {
        LogFormat::Plain {
            id_column: "src".to_string(),
        }
    }

    /// Hardware export, flows identified by UDP destination port
    pub fn hardware() -> Self {
        LogFormat::Packed {
            data_column: "data".to_string(),
            id_column: "udp.dstport".to_string(),
            schema: PackedSchema::hardware(),
        }
    }

    pub fn id_column(&self) -> &str {
        match self {
            LogFormat::Plain { id_column } | LogFormat::Packed { id_column, .. } => id_column,
        }
    }
}

/**
 * Parse CSV text already in memory
 */
pub fn read_log_bytes(bytes: Vec<u8>, format: &LogFormat) -> Result<DataFrame> {
    let reader = std::io::Cursor::new(bytes);
    let mut df = csv_options(format)
        .into_reader_with_file_handle(reader)
        .finish()?;
    expand(&mut df, format)?;
    Ok(df)
}

/**
 * Load a log file, unpacking packed columns if the format has any
 */
pub fn read_log(path: &Path, format: &LogFormat) -> Result<DataFrame> {
    let mut df = csv_options(format)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    expand(&mut df, format)?;

    debug!(path = %path.display(), rows = df.height(), "log loaded");
    Ok(df)
}

fn csv_options(format: &LogFormat) -> CsvReadOptions {
    // Packed hex strings may consist of digits only; keep them as text
    let overwrite = match format {
        LogFormat::Plain { .. } => None,
        LogFormat::Packed { data_column, .. } => Some(Arc::new(Schema::from_iter([Field::new(
            data_column,
            DataType::String,
        )]))),
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(overwrite)
}

fn expand(df: &mut DataFrame, format: &LogFormat) -> Result<()> {
    if let LogFormat::Packed {
        data_column,
        schema,
        ..
    } = format
    {
        schema.unpack_column(df, data_column)?;
    }
    Ok(())
}

/**
 * Sort rows by `column` ascending, keeping the order of ties
 */
pub fn sort_by(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let options = SortMultipleOptions::default().with_maintain_order(true);
    Ok(df.sort([column], options)?)
}

/**
 * Numeric column as `f64`, one value per row
 */
pub fn numeric_column(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = df.column(column)?.cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| FlowtraceError::MissingValue {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

/**
 * Column rendered as text, one value per row (missing values are empty)
 */
pub fn text_column(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let series = df.column(column)?.cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_log() {
        let csv = "pushed,popped,src\n5,9,35322350018592\n1,3,17661175009296\n";
        let df = read_log_bytes(csv.as_bytes().to_vec(), &LogFormat::simulator()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(numeric_column(&df, "pushed").unwrap(), [5.0, 1.0]);
        assert_eq!(
            text_column(&df, "src").unwrap(),
            ["35322350018592", "17661175009296"]
        );
    }

    #[test]
    fn packed_log_keeps_digit_only_strings() {
        let csv = "data,udp.dstport\n\
                   000000010000000200000000000500000000000900000000,5001\n";
        let df = read_log_bytes(csv.as_bytes().to_vec(), &LogFormat::hardware()).unwrap();

        assert_eq!(numeric_column(&df, "pushed").unwrap(), [5.0]);
        assert_eq!(numeric_column(&df, "popped").unwrap(), [9.0]);
        assert_eq!(text_column(&df, "udp.dstport").unwrap(), ["5001"]);
    }

    #[test]
    fn sort_keeps_ties_in_order() {
        let csv = "pushed,popped,src\n2,3,x\n1,2,y\n2,4,z\n";
        let df = read_log_bytes(csv.as_bytes().to_vec(), &LogFormat::simulator()).unwrap();
        let sorted = sort_by(&df, "pushed").unwrap();
        assert_eq!(text_column(&sorted, "src").unwrap(), ["y", "x", "z"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "pushed,popped\n1,2\n";
        let df = read_log_bytes(csv.as_bytes().to_vec(), &LogFormat::simulator()).unwrap();
        assert!(matches!(
            text_column(&df, "src"),
            Err(FlowtraceError::Polars(_))
        ));
    }

    #[test]
    fn missing_number_is_an_error() {
        let csv = "pushed,popped,src\n1,,a\n";
        let df = read_log_bytes(csv.as_bytes().to_vec(), &LogFormat::simulator()).unwrap();
        assert!(matches!(
            numeric_column(&df, "popped"),
            Err(FlowtraceError::MissingValue { row: 0, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = read_log(Path::new("/nonexistent/output.csv"), &LogFormat::simulator());
        assert!(result.is_err());
    }
}
