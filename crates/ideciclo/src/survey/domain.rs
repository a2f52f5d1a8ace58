use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for surveyed cities.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub String);

/// Identifier wrapper for mapped infrastructure segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub String);

/// Identifier wrapper for submitted evaluation forms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub String);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

display_id!(CityId, SegmentId, FormId);

/// City whose cycling network is being surveyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Road hierarchy tier a segment belongs to.
///
/// Serialized in lowercase (`estrutural`, `alimentadora`, `local`), which is
/// also the form the segment `classification` field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkTier {
    Estrutural,
    Alimentadora,
    Local,
}

impl NetworkTier {
    pub const ALL: [NetworkTier; 3] = [
        NetworkTier::Estrutural,
        NetworkTier::Alimentadora,
        NetworkTier::Local,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            NetworkTier::Estrutural => "Estrutural",
            NetworkTier::Alimentadora => "Alimentadora",
            NetworkTier::Local => "Local",
        }
    }

    /// Parses a segment classification tag. Only the exact lowercase tags are recognised.
    pub fn from_classification(raw: &str) -> Option<Self> {
        match raw {
            "estrutural" => Some(NetworkTier::Estrutural),
            "alimentadora" => Some(NetworkTier::Alimentadora),
            "local" => Some(NetworkTier::Local),
            _ => None,
        }
    }
}

impl fmt::Display for NetworkTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical stretch of cycling infrastructure, length in kilometers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    #[serde(default)]
    pub city_id: CityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub length: f64,
    #[serde(rename = "type", default)]
    pub segment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<NetworkTier>,
}

/// Field evaluation of a single segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub segment_id: SegmentId,
    #[serde(default)]
    pub city_id: CityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Responses>,
}

/// Open answer set captured by the survey UI.
///
/// Keys outside the scored [`Criterion`] set are kept but never read by scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses(BTreeMap<String, Value>);

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn set(&mut self, criterion: Criterion, answer: AnswerCode) {
        self.insert(criterion.key(), answer.code());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scored answer for a criterion; `None` when missing or outside `A`-`D`.
    pub fn answer(&self, criterion: Criterion) -> Option<AnswerCode> {
        self.0.get(criterion.key()).and_then(AnswerCode::from_value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Criterion, AnswerCode)> for Responses {
    fn from_iter<I: IntoIterator<Item = (Criterion, AnswerCode)>>(iter: I) -> Self {
        let mut responses = Responses::new();
        for (criterion, answer) in iter {
            responses.set(criterion, answer);
        }
        responses
    }
}

/// Criteria of the evaluation form that feed the segment rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    PavementType,
    ConservationState,
    SeparationDevicesCiclofaixa,
    SeparationDevicesCiclovia,
    SeparationDevicesCalcada,
    DevicesConservation,
    SpacingConservation,
    SpaceIdentification,
    IdentificationConservation,
    PictogramsConservation,
    VerticalSignsConservation,
    IntersectionSignaling,
    ShadingCoverage,
}

impl Criterion {
    pub const ALL: [Criterion; 13] = [
        Criterion::PavementType,
        Criterion::ConservationState,
        Criterion::SeparationDevicesCiclofaixa,
        Criterion::SeparationDevicesCiclovia,
        Criterion::SeparationDevicesCalcada,
        Criterion::DevicesConservation,
        Criterion::SpacingConservation,
        Criterion::SpaceIdentification,
        Criterion::IdentificationConservation,
        Criterion::PictogramsConservation,
        Criterion::VerticalSignsConservation,
        Criterion::IntersectionSignaling,
        Criterion::ShadingCoverage,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Criterion::PavementType => "pavement_type",
            Criterion::ConservationState => "conservation_state",
            Criterion::SeparationDevicesCiclofaixa => "separation_devices_ciclofaixa",
            Criterion::SeparationDevicesCiclovia => "separation_devices_ciclovia",
            Criterion::SeparationDevicesCalcada => "separation_devices_calcada",
            Criterion::DevicesConservation => "devices_conservation",
            Criterion::SpacingConservation => "spacing_conservation",
            Criterion::SpaceIdentification => "space_identification",
            Criterion::IdentificationConservation => "identification_conservation",
            Criterion::PictogramsConservation => "pictograms_conservation",
            Criterion::VerticalSignsConservation => "vertical_signs_conservation",
            Criterion::IntersectionSignaling => "intersection_signaling",
            Criterion::ShadingCoverage => "shading_coverage",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Criterion::ALL
            .into_iter()
            .find(|criterion| criterion.key() == key)
    }
}

/// Ordinal answer code used by every scored criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnswerCode {
    A,
    B,
    C,
    D,
}

impl AnswerCode {
    pub const fn code(self) -> &'static str {
        match self {
            AnswerCode::A => "A",
            AnswerCode::B => "B",
            AnswerCode::C => "C",
            AnswerCode::D => "D",
        }
    }

    pub const fn rating(self) -> f64 {
        match self {
            AnswerCode::A => 1.0,
            AnswerCode::B => 0.7,
            AnswerCode::C => 0.4,
            AnswerCode::D => 0.0,
        }
    }

    /// Exact match on `"A"`..`"D"`; lowercase, numeric or legacy option values are rejected.
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw {
            "A" => Some(AnswerCode::A),
            "B" => Some(AnswerCode::B),
            "C" => Some(AnswerCode::C),
            "D" => Some(AnswerCode::D),
            _ => None,
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(raw) => Self::from_code(raw),
            _ => None,
        }
    }
}
