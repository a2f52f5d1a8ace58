use super::super::domain::{Criterion, Form, Segment};

/// Averaged answer rating of one form and how many criteria fed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormRating {
    pub value: f64,
    pub criteria_considered: usize,
}

impl FormRating {
    const UNRATED: FormRating = FormRating {
        value: 0.0,
        criteria_considered: 0,
    };
}

/// Average of the `A`-`D` answers over the scored criteria.
///
/// Criteria without a valid answer are left out of the average instead of
/// counting as zero; a form with no valid answer at all rates `0`.
pub fn rate_form(form: &Form) -> FormRating {
    let Some(responses) = &form.responses else {
        return FormRating::UNRATED;
    };

    let (sum, count) = Criterion::ALL
        .into_iter()
        .filter_map(|criterion| responses.answer(criterion))
        .fold((0.0_f64, 0_usize), |(sum, count), answer| {
            (sum + answer.rating(), count + 1)
        });

    if count == 0 {
        return FormRating::UNRATED;
    }

    FormRating {
        value: sum / count as f64,
        criteria_considered: count,
    }
}

pub fn rate(form: &Form) -> f64 {
    rate_form(form).value
}

/// Length-weighted contribution of a segment, bounded by `[0, segment.length]`.
pub fn contribute(segment: &Segment, form: &Form) -> f64 {
    segment.length * rate(form)
}
