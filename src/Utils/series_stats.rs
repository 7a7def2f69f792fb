/*
Pretty printing of the plotted curves: extremes and end values of every series.
*/
use crate::numerical::series::SeriesSet;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct CurveStats {
    curve: String,
    min: String,
    max: String,
    #[tabled(rename = "at x_min")]
    at_start: String,
    #[tabled(rename = "at x_max")]
    at_end: String,
}

fn short(value: f64) -> String {
    format!("{:.6}", value)
}

/// One row per curve of `series`. Empty series give no rows.
pub fn series_stats(series: &SeriesSet) -> Vec<CurveStats> {
    series
        .curves()
        .filter(|(_, values)| !values.is_empty())
        .map(|(kind, values)| {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            CurveStats {
                curve: kind.to_string(),
                min: short(min),
                max: short(max),
                at_start: short(values[0]),
                at_end: short(values[values.len() - 1]),
            }
        })
        .collect()
}

/// The statistics as a rounded table ready to print.
pub fn stats_table(series: &SeriesSet) -> String {
    let mut table = Table::new(series_stats(series));
    table.with(Style::modern_rounded());
    table.to_string()
}
