//! Two-series line chart drawn with plotters from long-form chart rows.

use campo_data::chart::{plot_ranges, segments, series_names};
use campo_data::merge::ChartRow;
use dioxus::prelude::*;
use plotters::prelude::*;

const SIZE: (u32, u32) = (640, 320);

/// Line colours, one per location.
pub const SERIES_COLORS: [RGBColor; 2] = [RGBColor(25, 118, 210), RGBColor(245, 124, 0)];

#[derive(Props, Clone, PartialEq)]
pub struct LineChartProps {
    pub rows: Vec<ChartRow>,
    /// Y-axis caption, e.g. "Hectáreas sembradas"
    pub y_label: String,
}

fn format_value(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

// Only whole years get a label
fn format_year(year: f64) -> String {
    if year.fract() == 0.0 {
        format!("{:.0}", year)
    } else {
        String::new()
    }
}

fn draw_chart<'a>(
    rows: &[ChartRow],
    y_label: &str,
    svg_inner_string: &'a mut String,
) -> Result<(), DrawingAreaErrorKind<std::io::Error>> {
    let Some((years, values)) = plot_ranges(rows) else {
        return Ok(());
    };
    let backend = SVGBackend::with_string(svg_inner_string, SIZE);
    let backend_drawing_area = backend.into_drawing_area();
    backend_drawing_area.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&backend_drawing_area)
        .margin(16i32)
        .x_label_area_size(30u32)
        .y_label_area_size(60u32)
        .build_cartesian_2d(years, values)?;
    chart
        .configure_mesh()
        .x_labels(10_usize)
        .x_label_formatter(&|year| format_year(*year))
        .y_label_formatter(&|value| format_value(*value))
        .y_desc(y_label)
        .draw()?;

    for (i, name) in series_names(rows).iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let mut runs = segments(rows, name);
        // Keep a legend entry for a series with no values
        if runs.is_empty() {
            runs.push(Vec::new());
        }
        for (j, run) in runs.into_iter().enumerate() {
            chart.draw_series(run.iter().map(|point| Circle::new(*point, 3, color.filled())))?;
            let line = chart.draw_series(LineSeries::new(run, color.stroke_width(2)))?;
            if j == 0 {
                line.label(name.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    backend_drawing_area.present()?;
    Ok(())
}

/// Year on the x axis, value on the y axis, a gap wherever a value is missing.
#[component]
pub fn LineChart(props: LineChartProps) -> Element {
    let mut svg_inner = String::new();
    if let Err(e) = draw_chart(&props.rows, &props.y_label, &mut svg_inner) {
        log::error!("failed to draw {} chart: {:?}", props.y_label, e);
        svg_inner.clear();
    }
    if svg_inner.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            style: "max-width: 640px; width: 100%;",
            dangerous_inner_html: "{svg_inner}",
        }
    }
}
