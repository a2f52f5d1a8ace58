use std::collections::HashMap;

use super::super::domain::{Form, NetworkTier, Segment, SegmentId};

/// Share of the national road hierarchy each tier represents. The weights sum to `1.0`.
pub const ESTRUTURAL_WEIGHT: f64 = 0.590;
pub const ALIMENTADORA_WEIGHT: f64 = 0.262;
pub const LOCAL_WEIGHT: f64 = 0.148;

pub const fn network_weight(tier: NetworkTier) -> f64 {
    match tier {
        NetworkTier::Estrutural => ESTRUTURAL_WEIGHT,
        NetworkTier::Alimentadora => ALIMENTADORA_WEIGHT,
        NetworkTier::Local => LOCAL_WEIGHT,
    }
}

/// Tier of a segment: its classification when present, otherwise the legacy `type` tag.
pub fn tier_for(segment: &Segment) -> NetworkTier {
    if let Some(tier) = segment.classification {
        return tier;
    }

    match segment.segment_type.as_str() {
        "ESTRUTURAL" => NetworkTier::Estrutural,
        "ALIMENTADORA" => NetworkTier::Alimentadora,
        _ => NetworkTier::Local,
    }
}

/// Evaluated segments of one tier with their forms, index-aligned.
#[derive(Debug, Default)]
pub struct NetworkBucket<'a> {
    pub segments: Vec<&'a Segment>,
    pub forms: Vec<&'a Form>,
}

impl<'a> NetworkBucket<'a> {
    fn push(&mut self, segment: &'a Segment, form: &'a Form) {
        self.segments.push(segment);
        self.forms.push(form);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&'a Segment, &'a Form)> + '_ {
        self.segments
            .iter()
            .copied()
            .zip(self.forms.iter().copied())
    }
}

/// Segments partitioned by network tier. Segments without a form are kept aside.
#[derive(Debug)]
pub struct NetworkGroups<'a> {
    estrutural: NetworkBucket<'a>,
    alimentadora: NetworkBucket<'a>,
    local: NetworkBucket<'a>,
    pub unevaluated: Vec<&'a SegmentId>,
}

impl<'a> NetworkGroups<'a> {
    pub fn bucket(&self, tier: NetworkTier) -> &NetworkBucket<'a> {
        match tier {
            NetworkTier::Estrutural => &self.estrutural,
            NetworkTier::Alimentadora => &self.alimentadora,
            NetworkTier::Local => &self.local,
        }
    }

    fn bucket_mut(&mut self, tier: NetworkTier) -> &mut NetworkBucket<'a> {
        match tier {
            NetworkTier::Estrutural => &mut self.estrutural,
            NetworkTier::Alimentadora => &mut self.alimentadora,
            NetworkTier::Local => &mut self.local,
        }
    }
}

/// Matches every segment to the first form that references it and buckets the pair by tier.
pub fn group_by_network<'a>(segments: &'a [Segment], forms: &'a [Form]) -> NetworkGroups<'a> {
    let mut first_form: HashMap<&SegmentId, &Form> = HashMap::with_capacity(forms.len());
    for form in forms {
        first_form.entry(&form.segment_id).or_insert(form);
    }

    let mut groups = NetworkGroups {
        estrutural: NetworkBucket::default(),
        alimentadora: NetworkBucket::default(),
        local: NetworkBucket::default(),
        unevaluated: Vec::new(),
    };

    for segment in segments {
        match first_form.get(&segment.id) {
            Some(&form) => groups.bucket_mut(tier_for(segment)).push(segment, form),
            None => groups.unevaluated.push(&segment.id),
        }
    }

    groups
}
