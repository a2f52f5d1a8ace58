use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{City, CityId, Form, NetworkTier, SegmentId};
use super::repository::{RepositoryError, SurveyRepository};
use super::scoring::{
    calculate_ideciclo_detailed, IdecicloBreakdown, IdecicloClassification, NetworkBreakdown,
};

/// Service computing city scores and the national ranking from stored surveys.
pub struct IdecicloService<R> {
    repository: Arc<R>,
}

impl<R> IdecicloService<R>
where
    R: SurveyRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Score a single city from its current segments and forms.
    pub fn city_score(&self, city_id: &CityId) -> Result<CityScore, ScoringServiceError> {
        let city = self
            .repository
            .city(city_id)?
            .ok_or_else(|| ScoringServiceError::CityNotFound(city_id.clone()))?;
        self.score_city(city)
    }

    /// Score every known city, best index first. Ties are ordered by city name.
    pub fn ranking(&self) -> Result<Vec<RankingEntry>, ScoringServiceError> {
        let mut scores = self
            .repository
            .cities()?
            .into_iter()
            .map(|city| self.score_city(city))
            .collect::<Result<Vec<_>, _>>()?;

        scores.sort_by(|left, right| {
            right
                .breakdown
                .index
                .partial_cmp(&left.breakdown.index)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.city.name.cmp(&right.city.name))
        });

        Ok(scores
            .iter()
            .enumerate()
            .map(|(position, score)| RankingEntry::from_score(position + 1, score))
            .collect())
    }

    fn score_city(&self, city: City) -> Result<CityScore, ScoringServiceError> {
        let segments = self.repository.segments_for_city(&city.id)?;
        let forms = self.repository.forms_for_city(&city.id)?;

        for (segment_id, count) in duplicate_forms(&forms) {
            warn!(city = %city.id, segment = %segment_id, forms = count, "segment has more than one form; scoring the first");
        }

        let breakdown = calculate_ideciclo_detailed(&segments, &forms);
        info!(
            city = %city.id,
            index = breakdown.index,
            classification = %breakdown.classification,
            evaluated = breakdown.segments.len(),
            unevaluated = breakdown.unevaluated_segments.len(),
            "ideciclo computed"
        );

        Ok(CityScore {
            city,
            computed_at: Utc::now(),
            breakdown,
        })
    }
}

fn duplicate_forms(forms: &[Form]) -> Vec<(&SegmentId, usize)> {
    let mut counts: HashMap<&SegmentId, usize> = HashMap::new();
    for form in forms {
        *counts.entry(&form.segment_id).or_default() += 1;
    }
    let mut duplicates: Vec<_> = counts.into_iter().filter(|(_, count)| *count > 1).collect();
    duplicates.sort();
    duplicates
}

/// Score of one city at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct CityScore {
    pub city: City,
    pub computed_at: DateTime<Utc>,
    pub breakdown: IdecicloBreakdown,
}

impl CityScore {
    pub fn view(&self) -> CityScoreView {
        CityScoreView {
            city_id: self.city.id.clone(),
            city_name: self.city.name.clone(),
            state: self.city.state.clone(),
            index: self.breakdown.index,
            classification: self.breakdown.classification,
            description: self.breakdown.description(),
            evaluated_segments: self.breakdown.segments.len(),
            unevaluated_segments: self.breakdown.unevaluated_segments.len(),
            networks: self.breakdown.networks.clone(),
            computed_at: self.computed_at,
        }
    }

    pub fn network(&self, tier: NetworkTier) -> Option<&NetworkBreakdown> {
        self.breakdown.network(tier)
    }
}

/// Public representation of a city score.
#[derive(Debug, Clone, Serialize)]
pub struct CityScoreView {
    pub city_id: CityId,
    pub city_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub index: f64,
    pub classification: IdecicloClassification,
    pub description: &'static str,
    pub evaluated_segments: usize,
    pub unevaluated_segments: usize,
    pub networks: Vec<NetworkBreakdown>,
    pub computed_at: DateTime<Utc>,
}

/// One line of the city ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub position: usize,
    pub city_id: CityId,
    pub city_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub index: f64,
    pub classification: IdecicloClassification,
    pub description: &'static str,
}

impl RankingEntry {
    fn from_score(position: usize, score: &CityScore) -> Self {
        Self {
            position,
            city_id: score.city.id.clone(),
            city_name: score.city.name.clone(),
            state: score.city.state.clone(),
            index: score.breakdown.index,
            classification: score.breakdown.classification,
            description: score.breakdown.description(),
        }
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("city {0} not found")]
    CityNotFound(CityId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
