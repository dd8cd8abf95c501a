use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::content::{Content, Label};
use crate::core::Sample;
use crate::error::ValidationError;

/// Validates a raw JSON content descriptor and resolves it into typed content.
///
/// Structural checks run in a fixed order so the first reported problem is
/// stable: object shape, presence of `labels`/`data`, array shape, length
/// agreement, per-entry shape, then optional fields.
pub fn validate_json(value: &Value) -> Result<Content, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let (Some(labels), Some(data)) = (object.get("labels"), object.get("data")) else {
        return Err(ValidationError::MissingLabelsOrData);
    };
    let (Some(labels), Some(data)) = (labels.as_array(), data.as_array()) else {
        return Err(ValidationError::NotArrays);
    };
    if labels.len() != data.len() {
        return Err(ValidationError::LengthMismatch {
            labels: labels.len(),
            data: data.len(),
        });
    }

    let labels = labels
        .iter()
        .enumerate()
        .map(|(index, label)| resolve_label(label, index))
        .collect::<Result<Vec<_>, _>>()?;
    let data = data
        .iter()
        .enumerate()
        .map(|(index, sample)| resolve_sample(sample, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Content {
        labels,
        data,
        title: optional_field(object, "title")?,
        x_axis: optional_field(object, "xAxis")?,
        y_axis: optional_field(object, "yAxis")?,
        top_label: optional_field(object, "topLabel")?,
        top_labels: optional_field(object, "topLabels")?.unwrap_or_default(),
        data_tags: optional_field(object, "dataTags")?.unwrap_or_default(),
        legend: optional_field(object, "legend")?.unwrap_or_default(),
        hints: optional_field(object, "hints")?.unwrap_or_default(),
        bar_tooltips: optional_field(object, "barTooltips")?.unwrap_or_default(),
        fill_color: optional_field(object, "fillColor")?,
        stroke_color: optional_field(object, "strokeColor")?,
    })
}

/// Validates typed content built directly through the Rust API.
pub fn validate_content(content: &Content) -> Result<(), ValidationError> {
    if content.labels.len() != content.data.len() {
        return Err(ValidationError::LengthMismatch {
            labels: content.labels.len(),
            data: content.data.len(),
        });
    }
    if let Some(index) = content.data.iter().position(|sample| !sample.is_finite()) {
        return Err(ValidationError::NonFiniteSample { index });
    }
    Ok(())
}

fn resolve_label(value: &Value, index: usize) -> Result<Label, ValidationError> {
    match value {
        Value::String(text) => Ok(Label::Text(text.clone())),
        Value::Array(lines) => lines
            .iter()
            .map(|line| line.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(Label::Lines)
            .ok_or(ValidationError::InvalidEntry {
                field: "labels",
                index,
            }),
        _ => Err(ValidationError::InvalidEntry {
            field: "labels",
            index,
        }),
    }
}

fn resolve_sample(value: &Value, index: usize) -> Result<Sample, ValidationError> {
    let invalid = ValidationError::InvalidEntry {
        field: "data",
        index,
    };
    match value {
        Value::Number(number) => number.as_f64().map(Sample::Scalar).ok_or(invalid),
        Value::Array(values) => values
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<_>>>()
            .map(Sample::from)
            .ok_or(invalid),
        _ => Err(invalid),
    }
}

fn optional_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<T>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|err| ValidationError::MalformedField {
                field: field.to_owned(),
                message: err.to_string(),
            }),
    }
}
