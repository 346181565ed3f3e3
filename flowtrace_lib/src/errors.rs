/** ------------------------------------------------------------
 * Error types raised by this lib.
 * ------------------------------------------------------------- */
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowtraceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dataframe error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Capture file error: {0}")]
    Pcap(#[from] pcap_file::PcapError),
    #[error("Plotting failed: {0}")]
    Plot(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Packed value of length {available} is shorter than the schema width {required}")]
    PackedLength { required: usize, available: usize },
    #[error("Packed field '{field}' has invalid base-{radix} value '{value}'")]
    PackedDecode {
        field: String,
        value: String,
        radix: u32,
    },
    #[error("Packed schema field '{field}' overlaps or leaves a gap at offset {offset}")]
    PackedSchema { field: String, offset: usize },
    #[error("Column '{column}' has no value in row {row}")]
    MissingValue { column: String, row: usize },
    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("Invalid color '{0}' (expected #rrggbb or a known color name)")]
    InvalidColor(String),
    #[error("Invalid MAC address '{0}'")]
    InvalidMac(String),
    #[error("Frame of {0} bytes is too short to carry an Ethernet header")]
    TruncatedFrame(usize),
}

pub type Result<T> = std::result::Result<T, FlowtraceError>;
