use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::NetworkTier;
use super::network::{network_weight, NetworkBucket, NetworkGroups};
use super::rating::rate_form;
use super::{IdecicloBreakdown, NetworkBreakdown, SegmentScore};

pub(crate) const UNRATED_DESCRIPTION: &str = "Não avaliado";

/// Letter grade derived from the city index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IdecicloClassification {
    A,
    B,
    C,
    D,
}

impl IdecicloClassification {
    /// Thresholds are inclusive lower bounds, checked from the top.
    pub fn from_index(index: f64) -> Self {
        if index >= 1.0 {
            IdecicloClassification::A
        } else if index >= 0.7 {
            IdecicloClassification::B
        } else if index >= 0.4 {
            IdecicloClassification::C
        } else {
            IdecicloClassification::D
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IdecicloClassification::A => "A",
            IdecicloClassification::B => "B",
            IdecicloClassification::C => "C",
            IdecicloClassification::D => "D",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            IdecicloClassification::A => "Excelente",
            IdecicloClassification::B => "Bom",
            IdecicloClassification::C => "Regular",
            IdecicloClassification::D => "Ruim",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw {
            "A" => Some(IdecicloClassification::A),
            "B" => Some(IdecicloClassification::B),
            "C" => Some(IdecicloClassification::C),
            "D" => Some(IdecicloClassification::D),
            _ => None,
        }
    }
}

impl fmt::Display for IdecicloClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn network_breakdown(
    tier: NetworkTier,
    bucket: &NetworkBucket<'_>,
    segments: &mut Vec<SegmentScore>,
) -> NetworkBreakdown {
    let mut total_length = 0.0;
    let mut evaluated_length = 0.0;

    for (segment, form) in bucket.pairs() {
        let rating = rate_form(form);
        let contribution = segment.length * rating.value;
        total_length += segment.length;
        evaluated_length += contribution;

        segments.push(SegmentScore {
            segment_id: segment.id.clone(),
            form_id: form.id.clone(),
            tier,
            length: segment.length,
            rating: rating.value,
            criteria_considered: rating.criteria_considered,
            contribution,
        });
    }

    let attendance_rate = if total_length > 0.0 {
        evaluated_length / total_length
    } else {
        0.0
    };
    let weight = network_weight(tier);

    NetworkBreakdown {
        tier,
        weight,
        segment_count: bucket.len(),
        total_length,
        evaluated_length,
        attendance_rate,
        weighted_score: attendance_rate * weight,
    }
}

pub(crate) fn aggregate(groups: &NetworkGroups<'_>) -> IdecicloBreakdown {
    let mut segments = Vec::new();
    let networks: Vec<NetworkBreakdown> = NetworkTier::ALL
        .into_iter()
        .map(|tier| network_breakdown(tier, groups.bucket(tier), &mut segments))
        .collect();

    let index: f64 = networks.iter().map(|network| network.weighted_score).sum();

    IdecicloBreakdown {
        index,
        classification: IdecicloClassification::from_index(index),
        networks,
        segments,
        unevaluated_segments: groups.unevaluated.iter().map(|id| (*id).clone()).collect(),
    }
}
