//! Chart generation and rendering for the dashboard.
//!
//! The price-range bar chart is generated as JSON configuration for the
//! ECharts library and rendered with an HTML container plus JavaScript
//! initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, month::SaleMonth, transaction::query::PriceBucket};

/// The HTML element ID of the price-range chart container.
pub(super) const PRICE_RANGE_CHART_ID: &str = "price-range-chart";

/// The display labels of the ten fixed price ranges, in ascending order.
pub(super) const PRICE_RANGE_LABELS: [&str; 10] = [
    "0-100",
    "101-200",
    "201-300",
    "301-400",
    "401-500",
    "501-600",
    "601-700",
    "701-800",
    "801-900",
    "901-above",
];

/// Spread sparse histogram buckets over the ten fixed price ranges.
///
/// Ranges without a matching bucket get a zero count.
pub(super) fn fill_price_ranges(buckets: &[PriceBucket]) -> [i64; 10] {
    let mut counts = [0; 10];

    for bucket in buckets {
        counts[bucket.id.range_index()] = bucket.count;
    }

    counts
}

/// Build the ECharts bar chart of sale counts per price range.
pub(super) fn price_range_chart(month: SaleMonth, range_counts: &[i64; 10]) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Sales by price range")
                .subtext(format!("{} {}", month.month_name(), month.year)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(PRICE_RANGE_LABELS.to_vec()),
        )
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Items").data(range_counts.to_vec()))
}

/// Renders the HTML container for the price-range chart.
pub(super) fn chart_view() -> Markup {
    html!(
        section id="chart-section"
        {
            div id=(PRICE_RANGE_CHART_ID) class="chart-container" {}
        }
    )
}

/// Generates the JavaScript that initializes the price-range chart.
pub(super) fn chart_script(chart: &Chart) -> HeadElement {
    let script_content = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{PRICE_RANGE_CHART_ID}");
            const chart = echarts.init(chartDom);
            chart.setOption({});

            window.addEventListener('resize', chart.resize);
        }});"#,
        chart
    );

    HeadElement::ScriptSource(PreEscaped(script_content))
}
