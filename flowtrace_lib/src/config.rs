/** ------------------------------------------------------------
 * Run configuration
 *
 * Every section defaults to the experiment lists and palettes the
 * artifact ships with; a JSON file only needs to name what differs.
 * ------------------------------------------------------------- */
use crate::color::Rgb;
use crate::errors::Result;
use crate::flow::FlowMac;
use crate::log_table::LogFormat;
use crate::lookup::{KeyRule, KeyedTable};
use crate::packed::PackedSchema;
use crate::render::{LegendEntry, RenderOptions};
use crate::scenario::Scenario;
use crate::timeline::TimelineColumns;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generate: GenerateConfig,
    pub replay: ReplayConfig,
    pub plot: PlotConfig,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/**
 * Replace `{name}` in a path template
 */
pub fn fill_template(template: &str, name: &str) -> PathBuf {
    PathBuf::from(template.replace("{name}", name))
}

/**
 * Synthetic capture generation
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub output_dir: PathBuf,
    /// Scenarios to write, by name
    pub scenarios: Vec<String>,
    /// Scenarios defined in configuration, in addition to the built-ins
    pub extra: Vec<Scenario>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("pcaps"),
            scenarios: Scenario::builtin().into_iter().map(|s| s.name).collect(),
            extra: Vec::new(),
        }
    }
}

/**
 * Packed hardware log -> capture replay
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub logs: Vec<String>,
    pub input_template: String,
    pub output_template: String,
    pub interval_us: u64,
    pub data_column: String,
    pub port_column: String,
    pub schema: PackedSchema,
    pub port_flows: KeyedTable<FlowMac>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            logs: ["fcfs", "rr", "strict", "wfq"].map(String::from).to_vec(),
            input_template: "{name}.csv".to_string(),
            output_template: "{name}_generated.pcap".to_string(),
            interval_us: 100_000,
            data_column: "data".to_string(),
            port_column: "udp.dstport".to_string(),
            schema: PackedSchema::hardware(),
            port_flows: KeyedTable::new(KeyRule::Exact, FlowMac::PLACEHOLDER)
                .with("5001", FlowMac::A)
                .with("5002", FlowMac::B)
                .with("5004", FlowMac::B)
                .with("5003", FlowMac::C)
                .with("5005", FlowMac::C),
        }
    }
}

/**
 * Timeline rendering for a list of experiments
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub experiments: Vec<String>,
    pub input_template: String,
    pub output_dir: PathBuf,
    /// Image extension, `png` or `svg`
    pub extension: String,
    pub format: LogFormat,
    pub columns: TimelineColumns,
    pub colors: KeyedTable<Rgb>,
    pub render: RenderOptions,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::simulator()
    }
}

impl PlotConfig {
    /**
     * Simulator output: `_build/output<name>.csv`, colored by the
     * leading digits of the logged source address
     */
    pub fn simulator() -> Self {
        let experiments = [
            "fcfs",
            "fcfs_bin",
            "strict",
            "strict_bin",
            "rr",
            "rr_bin",
            "wfq",
            "wfq_bin",
            "hpfq",
            "twopol",
            "twopol_bin",
            "threepol",
            "threepol_bin",
        ];

        Self {
            experiments: experiments.map(String::from).to_vec(),
            input_template: "_build/output{name}.csv".to_string(),
            output_dir: PathBuf::from("."),
            extension: "png".to_string(),
            format: LogFormat::simulator(),
            columns: TimelineColumns::default(),
            colors: simulator_palette(),
            render: RenderOptions::default(),
        }
    }

    /**
     * Extension experiments (`extension`, `extension_ternary`)
     */
    pub fn extension_experiments() -> Self {
        Self {
            experiments: ["extension", "extension_ternary"].map(String::from).to_vec(),
            ..Self::simulator()
        }
    }

    /**
     * Hardware exports: `tofino_<name>.csv` with a packed `data` column,
     * colored by UDP destination port, times relative to the first enqueue
     */
    pub fn hardware() -> Self {
        Self {
            experiments: ["tofino_fcfs", "tofino_rr", "tofino_strict", "tofino_wfq"]
                .map(String::from)
                .to_vec(),
            input_template: "{name}.csv".to_string(),
            output_dir: PathBuf::from("."),
            extension: "png".to_string(),
            format: LogFormat::hardware(),
            columns: TimelineColumns {
                rebase: true,
                ..TimelineColumns::default()
            },
            colors: KeyedTable::new(KeyRule::Exact, Rgb::WHITE)
                .with("5001", Rgb::RED)
                .with("5002", Rgb::SKYBLUE)
                .with("5004", Rgb::SKYBLUE)
                .with("5003", Rgb::FORESTGREEN)
                .with("5005", Rgb::FORESTGREEN),
            render: RenderOptions::default(),
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "simulator" => Some(Self::simulator()),
            "extension" => Some(Self::extension_experiments()),
            "hardware" => Some(Self::hardware()),
            _ => None,
        }
    }

    pub fn input_path(&self, experiment: &str) -> PathBuf {
        fill_template(&self.input_template, experiment)
    }

    pub fn output_path(&self, experiment: &str) -> PathBuf {
        self.output_dir
            .join(format!("{experiment}.{}", self.extension))
    }
}

/**
 * Flows A-G keyed by the first two digits of their logged address
 */
pub fn simulator_palette() -> KeyedTable<Rgb> {
    KeyedTable::new(KeyRule::Prefix { len: 2 }, Rgb::WHITE)
        .with("17", Rgb::RED)
        .with("35", Rgb::SKYBLUE)
        .with("52", Rgb::FORESTGREEN)
        .with("70", Rgb::LIGHTSALMON)
        .with("88", Rgb::DODGERBLUE)
        .with("10", Rgb::DARKSEAGREEN)
        .with("12", Rgb::ORCHID)
}

/**
 * Legend matching `simulator_palette`
 */
pub fn simulator_legend(flows: usize) -> Vec<LegendEntry> {
    let palette = simulator_palette();
    ["A", "B", "C", "D", "E", "F", "G"]
        .iter()
        .zip(palette.entries)
        .take(flows)
        .map(|(label, entry)| LegendEntry {
            label: label.to_string(),
            color: entry.value,
        })
        .collect()
}
