mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use flowtrace_lib::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// JSON configuration overriding the built-in experiment lists
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, ValueEnum)]
enum Preset {
    /// Simulator output under `_build/`
    Simulator,
    /// Simulator runs of the extension experiments
    Extension,
    /// Packed hardware exports
    Hardware,
}

impl Preset {
    fn name(self) -> &'static str {
        match self {
            Preset::Simulator => "simulator",
            Preset::Extension => "extension",
            Preset::Hardware => "hardware",
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ImageKind {
    Png,
    Svg,
}

/**
 * Available CLI commands
 */
#[derive(Subcommand)]
enum Commands {
    /// Write synthetic pcap captures for traffic scenarios
    Generate {
        /// Output directory for the captures
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Scenario to generate (repeatable, default: all configured)
        #[arg(short, long = "scenario", value_name = "NAME")]
        scenarios: Vec<String>,
    },
    /// Turn packed hardware logs back into pcap captures
    Replay {
        /// Log to replay (repeatable, default: all configured)
        #[arg(short, long = "log", value_name = "NAME")]
        logs: Vec<String>,
    },
    /// Render enqueue/dequeue timelines of scheduler logs
    Plot {
        /// Built-in experiment set, ignored when a config file is given
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,

        /// Experiment to plot (repeatable, default: all configured)
        #[arg(short, long = "experiment", value_name = "NAME")]
        experiments: Vec<String>,

        /// Output directory for the images
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Image format
        #[arg(short, long, value_enum)]
        format: Option<ImageKind>,

        /// Draw a flow legend (simulator palette only)
        #[arg(long)]
        legend: bool,
    },
    /// List the built-in scenarios
    Scenarios,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_json_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::error!("Reading {} failed: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let result = match cli.command {
        Some(Commands::Generate { out_dir, scenarios }) => {
            let mut generate = config.map(|c| c.generate).unwrap_or_default();
            if let Some(dir) = out_dir {
                generate.output_dir = dir;
            }
            if !scenarios.is_empty() {
                generate.scenarios = scenarios;
            }
            commands::generate(&generate)
        }

        Some(Commands::Replay { logs }) => {
            let mut replay = config.map(|c| c.replay).unwrap_or_default();
            if !logs.is_empty() {
                replay.logs = logs;
            }
            commands::replay(&replay)
        }

        Some(Commands::Plot {
            preset,
            experiments,
            out_dir,
            format,
            legend,
        }) => {
            let mut plot = match (config, preset) {
                (Some(config), _) => config.plot,
                (None, Some(preset)) => commands::preset(preset.name()),
                (None, None) => Default::default(),
            };
            if !experiments.is_empty() {
                plot.experiments = experiments;
            }
            if let Some(dir) = out_dir {
                plot.output_dir = dir;
            }
            match format {
                Some(ImageKind::Png) => plot.extension = "png".to_string(),
                Some(ImageKind::Svg) => plot.extension = "svg".to_string(),
                None => {}
            }
            if legend && plot.render.legend.is_empty() {
                plot.render.legend = flowtrace_lib::config::simulator_legend(7);
            }
            commands::plot(&plot)
        }

        Some(Commands::Scenarios) => {
            commands::list_scenarios();
            Ok(())
        }

        None => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
