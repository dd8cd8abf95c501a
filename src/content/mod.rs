//! Content descriptor: what a bar chart shows.

mod validation;

pub use validation::{validate_content, validate_json};

use serde::{Deserialize, Serialize};

use crate::core::{Sample, SampleStats};
use crate::render::Color;

/// Category label under one bar, single or multi-line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Lines(Vec<String>),
}

impl Label {
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Lines(lines) => lines.len(),
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Text attached to a bar, either once for the whole bar or per stack segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BarText {
    Bar(String),
    Segments(Vec<Option<String>>),
}

impl BarText {
    /// Text for one stack segment; whole-bar text applies to every segment.
    #[must_use]
    pub fn for_segment(&self, segment: usize) -> Option<&str> {
        match self {
            Self::Bar(text) => Some(text.as_str()),
            Self::Segments(texts) => texts.get(segment).and_then(Option::as_deref),
        }
    }

    /// Text for the bar as a whole; per-segment entries are joined line by line.
    #[must_use]
    pub fn for_bar(&self) -> Option<String> {
        match self {
            Self::Bar(text) => Some(text.clone()),
            Self::Segments(texts) => {
                let lines: Vec<&str> = texts.iter().filter_map(Option::as_deref).collect();
                (!lines.is_empty()).then(|| lines.join("\n"))
            }
        }
    }
}

/// Color override for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BarColor {
    Single(Color),
    Segments(Vec<Color>),
}

/// Fill or stroke override: one color for every bar, or per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(Color),
    PerBar(Vec<Option<BarColor>>),
}

impl ColorSpec {
    /// Resolves the override for `index`, and for `segment` when the bar is stacked.
    ///
    /// Per-segment colors on a plain bar fall back to the first segment color.
    #[must_use]
    pub fn resolve(&self, index: usize, segment: Option<usize>) -> Option<Color> {
        match self {
            Self::Single(color) => Some(*color),
            Self::PerBar(bars) => match bars.get(index)?.as_ref()? {
                BarColor::Single(color) => Some(*color),
                BarColor::Segments(colors) => segment
                    .and_then(|segment| colors.get(segment))
                    .or_else(|| colors.first())
                    .copied(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

impl LegendEntry {
    #[must_use]
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Complete chart content. Replaced wholesale on every engine update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub labels: Vec<Label>,
    pub data: Vec<Sample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_labels: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_tags: Vec<Option<BarText>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legend: Vec<LegendEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Option<BarText>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bar_tooltips: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<ColorSpec>,
}

impl Content {
    #[must_use]
    pub fn new(labels: Vec<Label>, data: Vec<Sample>) -> Self {
        Self {
            labels,
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_axis_titles(mut self, x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        self.x_axis = Some(x_axis.into());
        self.y_axis = Some(y_axis.into());
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Vec<LegendEntry>) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: Vec<Option<BarText>>) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn with_data_tags(mut self, data_tags: Vec<Option<BarText>>) -> Self {
        self.data_tags = data_tags;
        self
    }

    #[must_use]
    pub fn with_bar_tooltips(mut self, bar_tooltips: Vec<Option<String>>) -> Self {
        self.bar_tooltips = bar_tooltips;
        self
    }

    #[must_use]
    pub fn with_fill_color(mut self, fill_color: ColorSpec) -> Self {
        self.fill_color = Some(fill_color);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn hint(&self, index: usize) -> Option<&BarText> {
        self.hints.get(index)?.as_ref()
    }

    #[must_use]
    pub fn data_tag(&self, index: usize) -> Option<&BarText> {
        self.data_tags.get(index)?.as_ref()
    }

    #[must_use]
    pub fn bar_tooltip(&self, index: usize) -> Option<&str> {
        self.bar_tooltips.get(index)?.as_deref()
    }

    #[must_use]
    pub fn top_label_at(&self, index: usize) -> Option<&str> {
        self.top_labels.get(index)?.as_deref()
    }

    /// Derived statistics, one entry per data index.
    #[must_use]
    pub fn derive_stats(&self) -> Vec<SampleStats> {
        self.data.iter().map(SampleStats::from_sample).collect()
    }
}
