use flowtrace_lib::config::{GenerateConfig, PlotConfig, ReplayConfig};
use flowtrace_lib::scenario::{Scenario, Timing};
use flowtrace_lib::{generate_captures, plot_experiments, replay::replay_captures, Result};

pub fn preset(name: &str) -> PlotConfig {
    PlotConfig::preset(name).unwrap_or_default()
}

/**
 * Write all configured scenario captures
 */
pub fn generate(config: &GenerateConfig) -> Result<()> {
    let paths = generate_captures(config)?;
    println!("Wrote {} captures to {}", paths.len(), config.output_dir.display());
    Ok(())
}

/**
 * Replay all configured packed logs into captures
 */
pub fn replay(config: &ReplayConfig) -> Result<()> {
    let paths = replay_captures(config)?;
    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

/**
 * Render all configured experiments
 */
pub fn plot(config: &PlotConfig) -> Result<()> {
    let paths = plot_experiments(config)?;
    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn list_scenarios() {
    for scenario in Scenario::builtin() {
        let timing = match scenario.timing {
            Timing::Uniform { .. } => "uniform",
            Timing::Bursty { .. } => "bursty",
        };
        println!("{:<20} {:>3} frames  {}", scenario.name, scenario.flows().len(), timing);
    }
}
