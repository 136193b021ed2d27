//! Seven-day sales bar chart shared by the seller and admin dashboards.

use blife_core::Price;
use blife_core::analytics::RevenueSummary;

/// One bar: a weekday and its height relative to the busiest day.
pub struct ChartBar {
    pub label: String,
    pub total: Price,
    /// 0 to 100.
    pub height_percent: u32,
}

/// Bars for the summary's daily sales, oldest day first.
#[must_use]
pub fn bars(summary: &RevenueSummary) -> Vec<ChartBar> {
    let peak = summary.peak_day().to_f64();
    summary
        .daily_sales
        .iter()
        .map(|day| ChartBar {
            label: day.label.clone(),
            total: day.total,
            height_percent: scaled(day.total.to_f64(), peak),
        })
        .collect()
}

fn scaled(value: f64, peak: f64) -> u32 {
    if peak <= 0.0 || value <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (value / peak * 100.0).round().clamp(0.0, 100.0) as u32;
    percent
}
