use serde::Serialize;

use crate::aggregation::utility::ratio;

/// Band boundaries as percentages of the configured high threshold.
pub const VERY_LOW_THRESHOLD: f64 = 25.0;
pub const LOW_THRESHOLD: f64 = 50.0;
pub const MEDIUM_THRESHOLD: f64 = 75.0;

/// Discrete heatmap color bands, ordered from empty to fully loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilizationColor {
    Empty,
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl UtilizationColor {
    /// Style classes used by the web front end for this band.
    pub fn css_class(self) -> &'static str {
        match self {
            UtilizationColor::Empty => "bg-gray-100 dark:bg-gray-700",
            UtilizationColor::VeryLow => "bg-blue-100 dark:bg-blue-600",
            UtilizationColor::Low => "bg-blue-300 dark:bg-blue-800",
            UtilizationColor::Medium => "bg-teal-300 dark:bg-teal-600",
            UtilizationColor::High => "bg-orange-300 dark:bg-orange-600",
            UtilizationColor::VeryHigh => "bg-red-400 dark:bg-red-600",
        }
    }

    /// Single-character shade for terminal output.
    pub fn glyph(self) -> char {
        match self {
            UtilizationColor::Empty => ' ',
            UtilizationColor::VeryLow => '░',
            UtilizationColor::Low => '▒',
            UtilizationColor::Medium => '▓',
            UtilizationColor::High => '█',
            UtilizationColor::VeryHigh => '■',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub color: String,
    pub label: String,
}

/// Maps utilization rates to color bands and fill ratios.
///
/// `high_threshold` is the rate drawn as fully loaded; the lower band
/// boundaries scale with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapColorMapper {
    high_threshold: f64,
}

impl HeatmapColorMapper {
    pub fn new(high_threshold: f64) -> Self {
        Self {
            high_threshold: high_threshold.clamp(0.0, 100.0),
        }
    }

    fn scaled(&self, threshold: f64) -> f64 {
        (self.high_threshold * (threshold / 100.0)).round()
    }

    pub fn color_for(&self, rate: f64) -> UtilizationColor {
        if rate == 0.0 {
            UtilizationColor::Empty
        } else if rate < self.scaled(VERY_LOW_THRESHOLD) {
            UtilizationColor::VeryLow
        } else if rate < self.scaled(LOW_THRESHOLD) {
            UtilizationColor::Low
        } else if rate < self.scaled(MEDIUM_THRESHOLD) {
            UtilizationColor::Medium
        } else if rate < self.high_threshold {
            UtilizationColor::High
        } else {
            UtilizationColor::VeryHigh
        }
    }

    /// Share of `context_max` reached by `rate`; 0 when there is no context.
    pub fn fill_ratio(&self, rate: f64, context_max: f64) -> f64 {
        ratio(rate, context_max)
    }

    pub fn legend_items(&self) -> Vec<LegendItem> {
        let label = |threshold: f64| format!("<{}%", self.scaled(threshold));

        vec![
            LegendItem {
                color: format!("{} border border-gray-300", UtilizationColor::Empty.css_class()),
                label: "0%".to_string(),
            },
            LegendItem {
                color: UtilizationColor::VeryLow.css_class().to_string(),
                label: label(VERY_LOW_THRESHOLD),
            },
            LegendItem {
                color: UtilizationColor::Low.css_class().to_string(),
                label: label(LOW_THRESHOLD),
            },
            LegendItem {
                color: UtilizationColor::Medium.css_class().to_string(),
                label: label(MEDIUM_THRESHOLD),
            },
            LegendItem {
                color: UtilizationColor::High.css_class().to_string(),
                label: format!("<{}%", self.high_threshold),
            },
            LegendItem {
                color: UtilizationColor::VeryHigh.css_class().to_string(),
                label: "<100%".to_string(),
            },
        ]
    }

    /// Bar height for a cell as a CSS percentage.
    pub fn bar_height(fill_ratio: f64, uniform: bool) -> String {
        if fill_ratio <= 0.0 {
            "0%".to_string()
        } else if uniform {
            "100%".to_string()
        } else {
            format!("{}%", fill_ratio * 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_bands_for_threshold_60() {
        let mapper = HeatmapColorMapper::new(60.0);

        assert_eq!(mapper.color_for(0.0), UtilizationColor::Empty);
        assert_eq!(mapper.color_for(0.1), UtilizationColor::VeryLow);
        assert_eq!(mapper.color_for(10.0), UtilizationColor::VeryLow);
        assert_eq!(mapper.color_for(15.0), UtilizationColor::Low);
        assert_eq!(mapper.color_for(25.0), UtilizationColor::Low);
        assert_eq!(mapper.color_for(30.0), UtilizationColor::Medium);
        assert_eq!(mapper.color_for(32.0), UtilizationColor::Medium);
        assert_eq!(mapper.color_for(45.0), UtilizationColor::High);
        assert_eq!(mapper.color_for(50.0), UtilizationColor::High);
        assert_eq!(mapper.color_for(60.0), UtilizationColor::VeryHigh);
        assert_eq!(mapper.color_for(100.0), UtilizationColor::VeryHigh);
    }

    #[test]
    fn test_bands_are_ordered_and_exhaustive() {
        let mapper = HeatmapColorMapper::new(80.0);
        let mut previous = UtilizationColor::Empty;
        for tenth in 0..=1000 {
            let rate = f64::from(tenth) / 10.0;
            let color = mapper.color_for(rate);
            assert!(color >= previous, "band went down at {rate}");
            if rate > 0.0 {
                assert_ne!(color, UtilizationColor::Empty);
            }
            previous = color;
        }
        assert_eq!(previous, UtilizationColor::VeryHigh);
    }

    #[test]
    fn test_fill_ratio() {
        let mapper = HeatmapColorMapper::new(60.0);
        assert_eq!(mapper.fill_ratio(25.0, 50.0), 0.5);
        assert_eq!(mapper.fill_ratio(40.0, 40.0), 1.0);
        assert_eq!(mapper.fill_ratio(40.0, 0.0), 0.0);
    }

    #[test]
    fn test_legend_items() {
        let items = HeatmapColorMapper::new(60.0).legend_items();

        assert_eq!(items.len(), 6);
        assert_eq!(
            items[0],
            LegendItem {
                color: "bg-gray-100 dark:bg-gray-700 border border-gray-300".to_string(),
                label: "0%".to_string(),
            }
        );
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["0%", "<15%", "<30%", "<45%", "<60%", "<100%"]);
        assert_eq!(items[5].color, "bg-red-400 dark:bg-red-600");
    }

    #[test]
    fn test_bar_height() {
        assert_eq!(HeatmapColorMapper::bar_height(0.0, true), "0%");
        assert_eq!(HeatmapColorMapper::bar_height(0.25, true), "100%");
        assert_eq!(HeatmapColorMapper::bar_height(0.25, false), "25%");
    }
}
