/** ------------------------------------------------------------
 * Timeline construction: one bar per logged packet
 * ------------------------------------------------------------- */
use crate::color::Rgb;
use crate::errors::Result;
use crate::log_table::{numeric_column, sort_by, text_column};
use crate::lookup::KeyedTable;
use polars::frame::DataFrame;
use serde::{Deserialize, Serialize};

/**
 * A packet's stay in the scheduler queue
 *
 * `row` is the vertical slot (0 = earliest enqueue), `width` the dwell
 * time. Negative widths are kept as logged.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar {
    pub row: usize,
    pub start: f64,
    pub width: f64,
    pub color: Rgb,
}

impl TimelineBar {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }
}

/**
 * Which columns hold what, and how times are presented
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineColumns {
    pub enqueue: String,
    pub dequeue: String,
    /// Shift times so the earliest enqueue is at zero
    #[serde(default)]
    pub rebase: bool,
}

impl Default for TimelineColumns {
    fn default() -> Self {
        Self {
            enqueue: "pushed".to_string(),
            dequeue: "popped".to_string(),
            rebase: false,
        }
    }
}

/**
 * Sort a log by enqueue time and turn every row into a bar
 */
pub fn build_timeline(
    df: &DataFrame,
    columns: &TimelineColumns,
    id_column: &str,
    colors: &KeyedTable<Rgb>,
) -> Result<Vec<TimelineBar>> {
    let sorted = sort_by(df, &columns.enqueue)?;

    let pushed = numeric_column(&sorted, &columns.enqueue)?;
    let popped = numeric_column(&sorted, &columns.dequeue)?;
    let identifiers = text_column(&sorted, id_column)?;

    let origin = match (columns.rebase, pushed.first()) {
        (true, Some(&first)) => first,
        _ => 0.0,
    };

    Ok(pushed
        .iter()
        .zip(&popped)
        .zip(&identifiers)
        .enumerate()
        .map(|(row, ((&enqueue, &dequeue), identifier))| TimelineBar {
            row,
            start: enqueue - origin,
            width: dequeue - enqueue,
            color: *colors.lookup(identifier),
        })
        .collect())
}

/**
 * Horizontal range covering every bar, `0..1` when there are none
 */
pub fn time_extent(bars: &[TimelineBar]) -> (f64, f64) {
    let (low, high) = bars.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), bar| {
        let (a, b) = (bar.start, bar.end());
        (low.min(a).min(b), high.max(a).max(b))
    });

    if low.is_finite() && high.is_finite() && high > low {
        (low, high)
    } else if low.is_finite() {
        (low, low + 1.0)
    } else {
        (0.0, 1.0)
    }
}
