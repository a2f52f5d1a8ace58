use crate::infra::InMemorySurveyRepository;
use chrono::Local;
use clap::Args;
use ideciclo::error::AppError;
use ideciclo::survey::{
    calculate_ideciclo_detailed, AnswerCode, City, CityId, Criterion, Form, FormId,
    IdecicloBreakdown, IdecicloService, NetworkTier, Responses, Segment, SegmentId,
    SurveyDataset, SurveyImporter,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Segment CSV export (id, city_id, length, type, classification)
    #[arg(long)]
    pub(crate) segments: PathBuf,
    /// Form CSV export (id, segment_id, city_id and one column per criterion)
    #[arg(long)]
    pub(crate) forms: PathBuf,
    /// Only score rows belonging to this city id
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Print per-network and per-segment detail
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankingArgs {
    /// Optional city CSV export (id, name, state)
    #[arg(long)]
    pub(crate) cities: Option<PathBuf>,
    /// Segment CSV export
    #[arg(long)]
    pub(crate) segments: PathBuf,
    /// Form CSV export
    #[arg(long)]
    pub(crate) forms: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the per-segment listing.
    #[arg(long)]
    pub(crate) summary_only: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        segments,
        forms,
        city,
        breakdown,
    } = args;

    let mut segments = SurveyImporter::segments_from_path(segments)?;
    let mut forms = SurveyImporter::forms_from_path(forms)?;
    if let Some(city) = city.as_deref() {
        let city_id = CityId(city.to_string());
        segments.retain(|segment| segment.city_id == city_id);
        forms.retain(|form| form.city_id == city_id);
        println!("IDECICLO for {}", city_id);
    } else {
        println!("IDECICLO for all imported segments");
    }

    let result = calculate_ideciclo_detailed(&segments, &forms);
    println!("Computed at {}", Local::now().format("%Y-%m-%d %H:%M"));
    render_breakdown(&result, breakdown);
    Ok(())
}

pub(crate) fn run_ranking(args: RankingArgs) -> Result<(), AppError> {
    let RankingArgs {
        cities,
        segments,
        forms,
    } = args;

    let dataset = SurveyDataset::from_paths(cities, segments, forms)?;
    let repository = Arc::new(InMemorySurveyRepository::default());
    dataset.seed(&*repository)?;
    let service = IdecicloService::new(repository);

    let ranking = service.ranking()?;
    if ranking.is_empty() {
        println!("No cities found in the export.");
        return Ok(());
    }

    println!(
        "IDECICLO ranking ({} cities) as of {}",
        ranking.len(),
        Local::now().format("%Y-%m-%d")
    );
    for entry in &ranking {
        let state = entry
            .state
            .as_deref()
            .map(|state| format!("/{}", state))
            .unwrap_or_default();
        println!(
            "{:>3}. {}{} | {:.4} | {} ({})",
            entry.position,
            entry.city_name,
            state,
            entry.index,
            entry.classification,
            entry.description
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemorySurveyRepository::default());
    sample_dataset().seed(&*repository)?;
    let service = IdecicloService::new(repository);

    let city_id = CityId(SAMPLE_CITY.to_string());
    let score = service.city_score(&city_id)?;

    println!("IDECICLO demo");
    println!(
        "- City: {} ({}) | computed {}",
        score.city.name,
        score.city.id,
        score
            .computed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    render_breakdown(&score.breakdown, !args.summary_only);

    match serde_json::to_string_pretty(&score.view()) {
        Ok(json) => println!("\nPublic score payload:\n{}", json),
        Err(err) => println!("\nPublic score payload unavailable: {}", err),
    }
    Ok(())
}

fn render_breakdown(breakdown: &IdecicloBreakdown, include_segments: bool) {
    println!(
        "- Index {:.4} -> {} ({})",
        breakdown.index,
        breakdown.classification,
        breakdown.description()
    );
    println!("Networks:");
    for network in &breakdown.networks {
        println!(
            "  - {}: weight {:.3} | {} segments | {:.2} km evaluated of {:.2} km | rate {:.4} | weighted {:.4}",
            network.tier,
            network.weight,
            network.segment_count,
            network.evaluated_length,
            network.total_length,
            network.attendance_rate,
            network.weighted_score
        );
    }

    if include_segments && !breakdown.segments.is_empty() {
        println!("Segments:");
        for segment in &breakdown.segments {
            println!(
                "  - {} [{}] form {} | {:.2} km | rating {:.3} over {} criteria",
                segment.segment_id,
                segment.tier,
                segment.form_id,
                segment.length,
                segment.rating,
                segment.criteria_considered
            );
        }
    }

    if !breakdown.unevaluated_segments.is_empty() {
        let ids: Vec<String> = breakdown
            .unevaluated_segments
            .iter()
            .map(|id| id.to_string())
            .collect();
        println!("Segments without a form: {}", ids.join(", "));
    }
}

const SAMPLE_CITY: &str = "jaboatao";

fn sample_dataset() -> SurveyDataset {
    let city_id = CityId(SAMPLE_CITY.to_string());
    let segment = |id: &str, length: f64, tier: NetworkTier| Segment {
        id: SegmentId(id.to_string()),
        city_id: city_id.clone(),
        name: None,
        length,
        segment_type: String::new(),
        classification: Some(tier),
    };
    let form = |id: &str, segment_id: &str, answers: &[(Criterion, AnswerCode)]| Form {
        id: FormId(id.to_string()),
        segment_id: SegmentId(segment_id.to_string()),
        city_id: city_id.clone(),
        responses: Some(answers.iter().copied().collect::<Responses>()),
    };

    let segments = vec![
        segment("jab-01", 3.2, NetworkTier::Estrutural),
        segment("jab-02", 1.8, NetworkTier::Estrutural),
        segment("jab-03", 2.4, NetworkTier::Alimentadora),
        segment("jab-04", 0.9, NetworkTier::Local),
        segment("jab-05", 1.1, NetworkTier::Local),
    ];
    let forms = vec![
        form(
            "f-01",
            "jab-01",
            &[
                (Criterion::PavementType, AnswerCode::A),
                (Criterion::ConservationState, AnswerCode::B),
                (Criterion::SeparationDevicesCiclofaixa, AnswerCode::A),
                (Criterion::IntersectionSignaling, AnswerCode::C),
            ],
        ),
        form(
            "f-02",
            "jab-02",
            &[
                (Criterion::PavementType, AnswerCode::B),
                (Criterion::SpaceIdentification, AnswerCode::B),
                (Criterion::ShadingCoverage, AnswerCode::D),
            ],
        ),
        form(
            "f-03",
            "jab-03",
            &[
                (Criterion::PavementType, AnswerCode::C),
                (Criterion::PictogramsConservation, AnswerCode::C),
            ],
        ),
        form(
            "f-04",
            "jab-04",
            &[(Criterion::VerticalSignsConservation, AnswerCode::A)],
        ),
    ];

    SurveyDataset::new(
        vec![City {
            id: city_id.clone(),
            name: "Jaboatão dos Guararapes".to_string(),
            state: Some("PE".to_string()),
        }],
        segments,
        forms,
    )
}
