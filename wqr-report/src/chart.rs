//! Time-series chart snapshots rendered with plotters into SVG strings.

use chrono::NaiveDate;
use plotters::prelude::*;
use std::ops::Range;
use wqr_core::date_range::DateRange;

/// Chart canvas size shared by both surfaces so snapshots embed at a
/// fixed page size.
pub const CHART_SIZE: (u32, u32) = (640, 360);

const SERIES_COLORS: [RGBColor; 3] = [BLUE, RED, GREEN];

/// Render one or more named daily series over the period into an SVG
/// string. Series values are aligned to the range start, one per day.
pub fn line_chart_svg(
    title: &str,
    range: DateRange,
    series: &[(String, Vec<f64>)],
) -> Result<String, String> {
    let mut svg = String::new();
    draw_into(&mut svg, title, range, series)
        .map_err(|e| format!("chart render failed: {e}"))?;
    Ok(svg)
}

fn draw_into(
    svg: &mut String,
    title: &str,
    range: DateRange,
    series: &[(String, Vec<f64>)],
) -> Result<(), Box<dyn std::error::Error>> {
    let y_max = series
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold(f64::MIN, f64::max)
        .max(1.0)
        * 1.2;

    let date_range = Range {
        start: range.start(),
        end: range.end(),
    };
    let ranged_date: RangedDate<NaiveDate> = date_range.into();

    let backend = SVGBackend::with_string(svg, CHART_SIZE);
    let drawing_area = backend.into_drawing_area();
    drawing_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 18))
        .margin(16i32)
        .x_label_area_size(24u32)
        .y_label_area_size(48u32)
        .build_cartesian_2d(ranged_date, 0f64..y_max)?;

    chart.configure_mesh().x_labels(8_usize).draw()?;

    for (index, (name, values)) in series.iter().enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(offset, value)| (range.date_at(offset), *value)),
                color,
            ))?
            .label(name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }

    drawing_area.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        )
    }

    #[test]
    fn test_single_series_renders_svg() {
        let series = vec![(
            "consumption".to_string(),
            vec![0.0, 20.0, 20.0, 25.0, 25.0, 25.0, 0.0],
        )];
        let svg = line_chart_svg("Daily consumption", range(), &series).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_multi_series_renders_svg() {
        let series = vec![
            ("pH".to_string(), vec![7.0; 7]),
            ("Chlorine".to_string(), vec![1.2; 7]),
        ];
        let svg = line_chart_svg("Water quality", range(), &series).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_all_zero_series_still_renders() {
        let series = vec![("empty".to_string(), vec![0.0; 7])];
        let svg = line_chart_svg("No data", range(), &series).unwrap();
        assert!(svg.contains("<svg"));
    }
}
