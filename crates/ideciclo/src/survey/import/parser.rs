use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::SurveyImportError;
use crate::survey::domain::{
    City, CityId, Form, FormId, NetworkTier, Responses, Segment, SegmentId,
};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub(crate) fn parse_cities<R: Read>(reader: R) -> Result<Vec<City>, SurveyImportError> {
    let mut cities = Vec::new();
    for record in csv_reader(reader).deserialize::<CityRow>() {
        let row = record?;
        cities.push(City {
            id: CityId(row.id),
            name: row.name,
            state: row.state,
        });
    }
    Ok(cities)
}

pub(crate) fn parse_segments<R: Read>(reader: R) -> Result<Vec<Segment>, SurveyImportError> {
    let mut segments = Vec::new();
    for record in csv_reader(reader).deserialize::<SegmentRow>() {
        let row = record?;
        if !row.length.is_finite() || row.length < 0.0 {
            return Err(SurveyImportError::InvalidLength {
                segment_id: row.id,
                value: row.length,
            });
        }

        let classification = match row.classification.as_deref() {
            Some(raw) => {
                let tier = NetworkTier::from_classification(raw);
                if tier.is_none() {
                    warn!(segment = %row.id, classification = raw, "unknown classification, falling back to type");
                }
                tier
            }
            None => None,
        };

        segments.push(Segment {
            id: SegmentId(row.id),
            city_id: CityId(row.city_id),
            name: row.name,
            length: row.length,
            segment_type: row.segment_type,
            classification,
        });
    }
    Ok(segments)
}

pub(crate) fn parse_forms<R: Read>(reader: R) -> Result<Vec<Form>, SurveyImportError> {
    let mut forms = Vec::new();
    for record in csv_reader(reader).deserialize::<HashMap<String, String>>() {
        let mut row = record?;
        let id = take_required(&mut row, "id")?;
        let segment_id = take_required(&mut row, "segment_id")?;
        let city_id = row.remove("city_id").unwrap_or_default();

        let mut responses = Responses::new();
        for (key, value) in row {
            if !value.is_empty() {
                responses.insert(key, value);
            }
        }

        forms.push(Form {
            id: FormId(id),
            segment_id: SegmentId(segment_id),
            city_id: CityId(city_id),
            responses: (!responses.is_empty()).then_some(responses),
        });
    }
    Ok(forms)
}

fn take_required(
    row: &mut HashMap<String, String>,
    column: &'static str,
) -> Result<String, SurveyImportError> {
    match row.remove(column) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SurveyImportError::MissingColumn(column)),
    }
}

#[derive(Debug, Deserialize)]
struct CityRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SegmentRow {
    id: String,
    #[serde(default)]
    city_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    length: f64,
    #[serde(rename = "type", default)]
    segment_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    classification: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
