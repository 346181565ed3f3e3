/** ------------------------------------------------------------
 * Packed hardware log -> synthetic capture
 * ------------------------------------------------------------- */
use crate::capture::write_capture_file;
use crate::config::{fill_template, ReplayConfig};
use crate::errors::Result;
use crate::frame::SyntheticFrame;
use crate::log_table::{read_log, read_log_bytes, sort_by, text_column, LogFormat};
use polars::frame::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl ReplayConfig {
    fn log_format(&self) -> LogFormat {
        LogFormat::Packed {
            data_column: self.data_column.clone(),
            id_column: self.port_column.clone(),
            schema: self.schema.clone(),
        }
    }
}

/**
 * One frame per logged packet, in enqueue order
 *
 * The source tag comes from the packet's UDP destination port; unknown
 * ports fall back to the placeholder address.
 */
pub fn frames_from_log(df: &DataFrame, config: &ReplayConfig) -> Result<Vec<SyntheticFrame>> {
    let sorted = sort_by(df, "pushed")?;
    let ports = text_column(&sorted, &config.port_column)?;

    Ok(ports
        .iter()
        .enumerate()
        .map(|(i, port)| {
            SyntheticFrame::new(
                Duration::from_micros(i as u64 * config.interval_us),
                *config.port_flows.lookup(port),
            )
        })
        .collect())
}

pub fn replay_log(path: &Path, config: &ReplayConfig) -> Result<Vec<SyntheticFrame>> {
    let df = read_log(path, &config.log_format())?;
    frames_from_log(&df, config)
}

pub fn replay_log_bytes(bytes: Vec<u8>, config: &ReplayConfig) -> Result<Vec<SyntheticFrame>> {
    let df = read_log_bytes(bytes, &config.log_format())?;
    frames_from_log(&df, config)
}

/**
 * Replay every configured log into `<name>_generated.pcap`
 *
 * Returns the written capture paths.
 */
pub fn replay_captures(config: &ReplayConfig) -> Result<Vec<PathBuf>> {
    config
        .logs
        .iter()
        .map(|name| {
            let frames = replay_log(&fill_template(&config.input_template, name), config)?;
            let output = fill_template(&config.output_template, name);
            write_capture_file(&output, &frames)?;
            Ok(output)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowMac;

    fn packed(pushed: u64, popped: u64) -> String {
        format!("{:08x}{:08x}{pushed:012x}{popped:012x}77000000", 0, popped - pushed)
    }

    #[test]
    fn frames_follow_enqueue_order() {
        let csv = format!(
            "data,udp.dstport\n{},5003\n{},5001\n{},5004\n{},9999\n",
            packed(300, 310),
            packed(100, 150),
            packed(200, 220),
            packed(400, 401),
        );

        let frames = replay_log_bytes(csv.into_bytes(), &ReplayConfig::default()).unwrap();
        let sources: Vec<FlowMac> = frames.iter().map(|f| f.src).collect();
        assert_eq!(
            sources,
            [FlowMac::A, FlowMac::B, FlowMac::C, FlowMac::PLACEHOLDER]
        );

        let times: Vec<u128> = frames.iter().map(|f| f.timestamp.as_millis()).collect();
        assert_eq!(times, [0, 100, 200, 300]);
    }

    #[test]
    fn short_packed_value_fails() {
        let csv = "data,udp.dstport\nabc,5001\n";
        assert!(replay_log_bytes(csv.as_bytes().to_vec(), &ReplayConfig::default()).is_err());
    }
}
