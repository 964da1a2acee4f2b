//! Простая столбчатая SVG-диаграмма без внешних библиотек.

use leptos::prelude::*;

const CHART_WIDTH: f64 = 600.0;
const LABEL_AREA: f64 = 24.0;
const BAR_GAP: f64 = 8.0;

#[derive(Clone, Debug, PartialEq)]
pub struct BarGeom {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Раскладка столбцов в области `width x height`. Масштаб по максимуму;
/// отрицательные и нулевые значения дают столбец нулевой высоты.
pub fn layout_bars(values: &[f64], width: f64, height: f64, gap: f64) -> Vec<BarGeom> {
    if values.is_empty() || width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let slot = width / n;
    let bar_width = (slot - gap).max(1.0);
    let max = values.iter().cloned().fold(0.0_f64, f64::max);

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let h = if max > 0.0 && v > 0.0 {
                v / max * height
            } else {
                0.0
            };
            BarGeom {
                x: i as f64 * slot + (slot - bar_width) / 2.0,
                y: height - h,
                width: bar_width,
                height: h,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
    /// Текст подсказки при наведении
    pub tooltip: String,
}

#[component]
pub fn BarChart(
    #[prop(into)] points: Signal<Vec<BarPoint>>,
    #[prop(optional)] height: Option<f64>,
) -> impl IntoView {
    let plot_height = height.unwrap_or(220.0);
    let total_height = plot_height + LABEL_AREA;

    view! {
        <svg
            class="bar-chart"
            viewBox=format!("0 0 {} {}", CHART_WIDTH, total_height)
            preserveAspectRatio="none"
            width="100%"
            height=total_height
        >
            {move || {
                let points = points.get();
                let values: Vec<f64> = points.iter().map(|p| p.value).collect();
                let bars = layout_bars(&values, CHART_WIDTH, plot_height, BAR_GAP);
                points
                    .into_iter()
                    .zip(bars)
                    .map(|(point, bar)| {
                        let label_x = bar.x + bar.width / 2.0;
                        view! {
                            <g class="bar-chart__item">
                                <rect
                                    class="bar-chart__bar"
                                    x=bar.x
                                    y=bar.y
                                    width=bar.width
                                    height=bar.height
                                    rx="2"
                                >
                                    <title>{point.tooltip}</title>
                                </rect>
                                <text
                                    class="bar-chart__label"
                                    x=label_x
                                    y=plot_height + 16.0
                                    text-anchor="middle"
                                >
                                    {point.label}
                                </text>
                            </g>
                        }
                    })
                    .collect_view()
            }}
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(layout_bars(&[], 100.0, 100.0, 4.0).is_empty());
        assert!(layout_bars(&[1.0], 0.0, 100.0, 4.0).is_empty());
    }

    #[test]
    fn test_scale_by_max() {
        let bars = layout_bars(&[50.0, 100.0, 0.0], 300.0, 200.0, 10.0);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[1].height, 200.0);
        assert_eq!(bars[1].y, 0.0);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[0].y, 100.0);
        assert_eq!(bars[2].height, 0.0);
        assert_eq!(bars[0].width, 90.0);
        assert_eq!(bars[0].x, 5.0);
        assert_eq!(bars[1].x, 105.0);
    }

    #[test]
    fn test_all_zero_or_negative() {
        let bars = layout_bars(&[0.0, -5.0], 100.0, 50.0, 0.0);
        assert!(bars.iter().all(|b| b.height == 0.0 && b.y == 50.0));
    }
}
