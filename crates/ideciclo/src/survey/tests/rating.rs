use super::common::*;
use crate::survey::domain::{AnswerCode, Criterion, Form, NetworkTier, Responses};
use crate::survey::scoring::{contribute, rate, rate_form};
use serde_json::json;

#[test]
fn uniform_answers_rate_at_their_value() {
    assert_close(rate(&uniform_form("s", AnswerCode::A)), 1.0);
    assert_close(rate(&uniform_form("s", AnswerCode::B)), 0.7);
    assert_close(rate(&uniform_form("s", AnswerCode::C)), 0.4);
    assert_close(rate(&uniform_form("s", AnswerCode::D)), 0.0);
}

#[test]
fn missing_criteria_are_excluded_from_the_average() {
    let form = form_with(
        "s",
        &[
            (Criterion::PavementType, AnswerCode::A),
            (Criterion::ShadingCoverage, AnswerCode::C),
        ],
    );

    let rating = rate_form(&form);

    assert_eq!(rating.criteria_considered, 2);
    assert_close(rating.value, 0.7);
}

#[test]
fn absent_responses_rate_zero() {
    let mut form = uniform_form("s", AnswerCode::A);
    form.responses = None;

    let rating = rate_form(&form);

    assert_eq!(rating.value, 0.0);
    assert_eq!(rating.criteria_considered, 0);
}

#[test]
fn form_without_scored_criteria_rates_zero() {
    let mut responses = Responses::new();
    responses.insert("observations", "ciclofaixa recém pintada");
    responses.insert("lighting", "A");

    let rating = rate_form(&raw_form("s", responses));

    assert_eq!(rating.value, 0.0);
    assert_eq!(rating.criteria_considered, 0);
}

#[test]
fn answers_outside_the_closed_set_are_skipped() {
    let mut responses = Responses::new();
    responses.insert(Criterion::PavementType.key(), "B");
    responses.insert(Criterion::ConservationState.key(), "a");
    responses.insert(Criterion::DevicesConservation.key(), json!(1));
    responses.insert(Criterion::SpaceIdentification.key(), "asfalto");
    responses.insert(Criterion::IntersectionSignaling.key(), json!(null));

    let rating = rate_form(&raw_form("s", responses));

    assert_eq!(rating.criteria_considered, 1);
    assert_close(rating.value, 0.7);
}

#[test]
fn rating_never_decreases_when_an_answer_improves() {
    let ladder = [AnswerCode::D, AnswerCode::C, AnswerCode::B, AnswerCode::A];
    let base = [
        (Criterion::PavementType, AnswerCode::C),
        (Criterion::ConservationState, AnswerCode::B),
        (Criterion::VerticalSignsConservation, AnswerCode::D),
    ];

    for criterion in [Criterion::PavementType, Criterion::SpacingConservation] {
        let mut previous = f64::NEG_INFINITY;
        for answer in ladder {
            let mut answers = base.to_vec();
            answers.retain(|(existing, _)| *existing != criterion);
            answers.push((criterion, answer));

            let value = rate(&form_with("s", &answers));
            assert!(value >= previous, "{criterion:?} {answer:?}: {value} < {previous}");
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }
}

#[test]
fn contribution_scales_length_by_rating() {
    let segment = segment("s", 2.5, Some(NetworkTier::Local));

    assert_close(contribute(&segment, &uniform_form("s", AnswerCode::C)), 1.0);
    assert_close(contribute(&segment, &uniform_form("s", AnswerCode::A)), 2.5);
    assert_eq!(
        contribute(
            &segment,
            &Form {
                responses: None,
                ..uniform_form("s", AnswerCode::A)
            }
        ),
        0.0
    );
}
