use serde::{Deserialize, Serialize};

use crate::core::{Color, Margin, Palette, Scale, ScaleKind};
use crate::error::ChartResult;

use super::LineGraph;
use super::linegraph::{DEFAULT_BACKGROUND, DEFAULT_TICKS};

/// Serializable form of a [`LineGraph`] setup.
///
/// Every field is optional in JSON; missing fields take the same defaults as
/// `LineGraph::new()`. `"background": null` disables the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineGraphConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margin: Margin,
    pub ticks: usize,
    pub tick_subdivide: bool,
    pub background: Option<Color>,
    pub hide_x_axis: bool,
    pub hide_y_axis: bool,
    pub x_scale: ScaleKind,
    pub y_scale: ScaleKind,
    pub x_domain: Option<[f64; 2]>,
    pub y_domain: Option<[f64; 2]>,
    pub palette: Palette,
}

impl Default for LineGraphConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: Margin::default(),
            ticks: DEFAULT_TICKS,
            tick_subdivide: true,
            background: Some(DEFAULT_BACKGROUND),
            hide_x_axis: false,
            hide_y_axis: false,
            x_scale: ScaleKind::Time,
            y_scale: ScaleKind::Linear,
            x_domain: None,
            y_domain: None,
            palette: Palette::default(),
        }
    }
}

impl LineGraphConfig {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl LineGraph {
    /// Builds a chart from a serializable setup.
    #[must_use]
    pub fn from_config(config: &LineGraphConfig) -> Self {
        let mut graph = Self::new();
        graph
            .set_width(config.width)
            .set_height(config.height)
            .set_margin(config.margin)
            .set_ticks(config.ticks)
            .set_tick_subdivide(config.tick_subdivide)
            .set_background(config.background)
            .set_hide_x_axis(config.hide_x_axis)
            .set_hide_y_axis(config.hide_y_axis)
            .set_x_scale(Scale::with_kind(config.x_scale))
            .set_y_scale(Scale::with_kind(config.y_scale))
            .set_x_domain(config.x_domain.map(|[start, end]| (start, end)))
            .set_y_domain(config.y_domain.map(|[start, end]| (start, end)))
            .set_palette(config.palette.clone());
        graph
    }

    /// Current setup in serializable form, cached domains included.
    #[must_use]
    pub fn config(&self) -> LineGraphConfig {
        LineGraphConfig {
            width: self.width(),
            height: self.height(),
            margin: self.margin(),
            ticks: self.ticks(),
            tick_subdivide: self.tick_subdivide(),
            background: self.background(),
            hide_x_axis: self.hide_x_axis(),
            hide_y_axis: self.hide_y_axis(),
            x_scale: self.x_scale().kind(),
            y_scale: self.y_scale().kind(),
            x_domain: self.x_domain().map(|(start, end)| [start, end]),
            y_domain: self.y_domain().map(|(start, end)| [start, end]),
            palette: self.palette().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_matches_new_chart() {
        let config = LineGraphConfig::from_json_str("{}").expect("empty object is valid");
        assert_eq!(config, LineGraph::new().config());
    }

    #[test]
    fn null_background_disables_it() {
        let config =
            LineGraphConfig::from_json_str(r#"{"background": null, "margin": {"top": 4}}"#)
                .expect("valid json");
        assert_eq!(config.background, None);
        assert_eq!(config.margin, Margin::new(4.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn bad_color_is_a_config_error() {
        let result = LineGraphConfig::from_json_str(r##"{"background": "#12"}"##);
        assert!(matches!(
            result,
            Err(crate::error::ChartError::InvalidConfig(_))
        ));
    }
}
