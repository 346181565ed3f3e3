pub mod capture;
pub mod color;
pub mod config;
mod errors;
pub mod flow;
pub mod frame;
pub mod log_table;
pub mod lookup;
pub mod packed;
pub mod render;
pub mod replay;
pub mod scenario;
pub mod timeline;

pub use errors::{FlowtraceError, Result};

use config::{GenerateConfig, PlotConfig};
use render::render_timeline;
use scenario::Scenario;
use std::path::{Path, PathBuf};
use timeline::build_timeline;
use tracing::info;

/**
 * Write one capture per configured scenario
 *
 * \param config Scenario names and output directory
 *
 * Returns the written capture paths, in configuration order.
 */
pub fn generate_captures(config: &GenerateConfig) -> Result<Vec<PathBuf>> {
    config
        .scenarios
        .iter()
        .map(|name| {
            let scenario = Scenario::find(name, &config.extra)?;
            let path = config.output_dir.join(format!("{}.pcap", scenario.name));
            capture::write_capture_file(&path, &scenario.frames())?;
            Ok(path)
        })
        .collect()
}

/**
 * Render the timeline of a single log file
 *
 * \param input  Scheduler log (CSV)
 * \param output Image path; the extension picks the format
 */
pub fn plot_log(input: &Path, output: &Path, config: &PlotConfig) -> Result<PathBuf> {
    let df = log_table::read_log(input, &config.format)?;
    info!("Experiment {} had length {}", input.display(), df.height());

    let bars = build_timeline(&df, &config.columns, config.format.id_column(), &config.colors)?;
    render_timeline(output, &bars, &config.render)
}

/**
 * Render every configured experiment
 *
 * Stops at the first experiment that fails.
 */
pub fn plot_experiments(config: &PlotConfig) -> Result<Vec<PathBuf>> {
    config
        .experiments
        .iter()
        .map(|name| plot_log(&config.input_path(name), &config.output_path(name), config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flowtrace-lib-{prefix}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn generates_every_builtin_scenario() {
        let dir = temp_dir("generate");
        let config = GenerateConfig {
            output_dir: dir.clone(),
            ..Default::default()
        };

        let paths = generate_captures(&config).unwrap();
        assert_eq!(paths.len(), 5);

        let frames = capture::read_capture_file(&dir.join("three_flows.pcap")).unwrap();
        assert_eq!(frames.len(), 10);
    }

    #[test]
    fn unknown_scenario_aborts() {
        let config = GenerateConfig {
            output_dir: temp_dir("generate-unknown"),
            scenarios: vec!["three_flows".to_string(), "eleven_flows".to_string()],
            extra: Vec::new(),
        };
        assert!(matches!(
            generate_captures(&config),
            Err(FlowtraceError::UnknownScenario(_))
        ));
    }

    #[test]
    fn plots_configured_experiments() {
        let dir = temp_dir("plot");
        fs::write(
            dir.join("outputfcfs.csv"),
            "pushed,popped,src\n5,9,35322350018592\n1,3,17661175009296\n",
        )
        .unwrap();
        fs::write(dir.join("outputempty.csv"), "pushed,popped,src\n").unwrap();

        let config = PlotConfig {
            experiments: vec!["fcfs".to_string(), "empty".to_string()],
            input_template: dir.join("output{name}.csv").display().to_string(),
            output_dir: dir.clone(),
            extension: "svg".to_string(),
            ..PlotConfig::simulator()
        };

        let paths = plot_experiments(&config).unwrap();
        assert_eq!(paths, [dir.join("fcfs.svg"), dir.join("empty.svg")]);
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[test]
    fn plots_packed_hardware_log() {
        let dir = temp_dir("plot-hardware");
        let input = dir.join("tofino_rr.csv");
        fs::write(
            &input,
            "data,udp.dstport\n\
             000000010000000200000000100500000000100900000000,5002\n\
             000000000000000400000000100000000000100400000000,7777\n",
        )
        .unwrap();

        let output = plot_log(&input, &dir.join("tofino_rr.svg"), &PlotConfig::hardware()).unwrap();
        let svg = fs::read_to_string(output).unwrap();
        assert!(svg.contains("#87CEEB") || svg.contains("#87ceeb"));
    }

    #[test]
    fn missing_log_aborts() {
        let dir = temp_dir("plot-missing");
        let config = PlotConfig {
            experiments: vec!["absent".to_string()],
            input_template: dir.join("{name}.csv").display().to_string(),
            output_dir: dir,
            ..PlotConfig::simulator()
        };
        assert!(plot_experiments(&config).is_err());
    }
}
