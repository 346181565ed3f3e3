/** ------------------------------------------------------------
 * Timeline rendering ("broken bar" charts)
 * ------------------------------------------------------------- */
use crate::color::Rgb;
use crate::errors::{FlowtraceError, Result};
use crate::timeline::{time_extent, TimelineBar};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/**
 * Figure settings, 10x5 inches at 100 dpi by default
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub legend: Vec<LegendEntry>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            legend: Vec::new(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /**
     * Format implied by a path; anything but `.svg` is a bitmap
     */
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }
}

/**
 * Output path with `.png` appended when `path` has no extension
 */
pub fn image_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(_) => path.to_path_buf(),
        None => path.with_extension("png"),
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> FlowtraceError {
    FlowtraceError::Plot(e.to_string())
}

/**
 * Draw bars onto an already created drawing area
 *
 * Row 0 is drawn at the top; the vertical axis carries no labels.
 */
pub fn draw_timeline<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bars: &[TimelineBar],
    options: &RenderOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;

    let (x_low, x_high) = time_extent(bars);
    let rows = bars.len().max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .build_cartesian_2d(x_low..x_high, 0f64..rows)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .draw()
        .map_err(plot_err)?;

    // Flip rows so that row 0 lands at the top of the plot
    chart
        .draw_series(bars.iter().map(|bar| {
            let top = rows - bar.row as f64;
            let color: RGBColor = bar.color.into();
            Rectangle::new([(bar.start, top - 1.0), (bar.end(), top)], color.filled())
        }))
        .map_err(plot_err)?;

    if !options.legend.is_empty() {
        for entry in &options.legend {
            let color: RGBColor = entry.color.into();
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
                .map_err(plot_err)?
                .label(entry.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/**
 * Render bars to an image file, format chosen by extension
 *
 * Returns the path actually written.
 */
pub fn render_timeline(path: &Path, bars: &[TimelineBar], options: &RenderOptions) -> Result<PathBuf> {
    let path = image_path(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let size = (options.width, options.height);
    match ImageFormat::from_path(&path) {
        ImageFormat::Svg => {
            let root = SVGBackend::new(&path, size).into_drawing_area();
            draw_timeline(&root, bars, options)?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(&path, size).into_drawing_area();
            draw_timeline(&root, bars, options)?;
        }
    }

    info!(path = %path.display(), bars = bars.len(), "timeline written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flowtrace-{prefix}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a/fcfs.svg")), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(Path::new("a/fcfs.SVG")), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(Path::new("a/fcfs.png")), ImageFormat::Png);
        assert_eq!(image_path(Path::new("out/hpfq")), PathBuf::from("out/hpfq.png"));
        assert_eq!(image_path(Path::new("out/hpfq.svg")), PathBuf::from("out/hpfq.svg"));
    }

    #[test]
    fn renders_one_rect_per_bar() {
        let dir = temp_dir("render-bars");
        let bars = vec![
            TimelineBar { row: 0, start: 1.0, width: 2.0, color: Rgb::SKYBLUE },
            TimelineBar { row: 1, start: 5.0, width: 4.0, color: Rgb::RED },
        ];

        let path = render_timeline(&dir.join("two.svg"), &bars, &RenderOptions::default()).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();

        assert!(svg.contains("#87CEEB") || svg.contains("#87ceeb"));
        assert!(svg.contains("#FF0000") || svg.contains("#ff0000"));
    }

    #[test]
    fn renders_empty_timeline() {
        let dir = temp_dir("render-empty");
        let path = render_timeline(&dir.join("empty"), &[], &RenderOptions::default()).unwrap();

        assert_eq!(path.extension().unwrap(), "png");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn renders_legend() {
        let dir = temp_dir("render-legend");
        let options = RenderOptions {
            legend: vec![LegendEntry {
                label: "A".to_string(),
                color: Rgb::ORCHID,
            }],
            ..Default::default()
        };
        let bars = vec![TimelineBar { row: 0, start: 0.0, width: 1.0, color: Rgb::RED }];

        let path = render_timeline(&dir.join("legend.svg"), &bars, &options).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("#DA70D6") || svg.contains("#da70d6"));
    }
}
