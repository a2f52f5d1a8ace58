mod parser;

use std::io::Read;
use std::path::Path;

use crate::survey::domain::{City, Form, Segment};
use crate::survey::repository::{RepositoryError, SurveyRepository};

#[derive(Debug)]
pub enum SurveyImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidLength { segment_id: String, value: f64 },
}

impl std::fmt::Display for SurveyImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyImportError::Io(err) => write!(f, "failed to read survey export: {}", err),
            SurveyImportError::Csv(err) => write!(f, "invalid survey CSV data: {}", err),
            SurveyImportError::MissingColumn(column) => {
                write!(f, "survey CSV row is missing a value for '{}'", column)
            }
            SurveyImportError::InvalidLength { segment_id, value } => write!(
                f,
                "segment {} has invalid length {} (expected a non-negative number of km)",
                segment_id, value
            ),
        }
    }
}

impl std::error::Error for SurveyImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurveyImportError::Io(err) => Some(err),
            SurveyImportError::Csv(err) => Some(err),
            SurveyImportError::MissingColumn(_) | SurveyImportError::InvalidLength { .. } => None,
        }
    }
}

impl From<std::io::Error> for SurveyImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SurveyImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads survey exports (cities, segments, forms) from CSV.
pub struct SurveyImporter;

impl SurveyImporter {
    pub fn cities_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<City>, SurveyImportError> {
        let file = std::fs::File::open(path)?;
        Self::cities_from_reader(file)
    }

    pub fn cities_from_reader<R: Read>(reader: R) -> Result<Vec<City>, SurveyImportError> {
        parser::parse_cities(reader)
    }

    pub fn segments_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>, SurveyImportError> {
        let file = std::fs::File::open(path)?;
        Self::segments_from_reader(file)
    }

    pub fn segments_from_reader<R: Read>(reader: R) -> Result<Vec<Segment>, SurveyImportError> {
        parser::parse_segments(reader)
    }

    pub fn forms_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Form>, SurveyImportError> {
        let file = std::fs::File::open(path)?;
        Self::forms_from_reader(file)
    }

    pub fn forms_from_reader<R: Read>(reader: R) -> Result<Vec<Form>, SurveyImportError> {
        parser::parse_forms(reader)
    }
}

/// Cities, segments and forms loaded together, ready to seed a repository.
#[derive(Debug, Clone, Default)]
pub struct SurveyDataset {
    pub cities: Vec<City>,
    pub segments: Vec<Segment>,
    pub forms: Vec<Form>,
}

impl SurveyDataset {
    pub fn from_paths<P: AsRef<Path>>(
        cities: Option<P>,
        segments: P,
        forms: P,
    ) -> Result<Self, SurveyImportError> {
        let segments = SurveyImporter::segments_from_path(segments)?;
        let forms = SurveyImporter::forms_from_path(forms)?;
        let cities = match cities {
            Some(path) => SurveyImporter::cities_from_path(path)?,
            None => Vec::new(),
        };

        Ok(Self::new(cities, segments, forms))
    }

    /// Builds a dataset, registering any city referenced by a segment but not listed.
    /// Such cities are named after their id.
    pub fn new(mut cities: Vec<City>, segments: Vec<Segment>, forms: Vec<Form>) -> Self {
        for segment in &segments {
            if !cities.iter().any(|city| city.id == segment.city_id) {
                cities.push(City {
                    id: segment.city_id.clone(),
                    name: segment.city_id.0.clone(),
                    state: None,
                });
            }
        }

        Self {
            cities,
            segments,
            forms,
        }
    }

    pub fn seed<R: SurveyRepository + ?Sized>(self, repository: &R) -> Result<(), RepositoryError> {
        for city in self.cities {
            repository.save_city(city)?;
        }
        repository.save_segments(self.segments)?;
        for form in self.forms {
            repository.save_form(form)?;
        }
        Ok(())
    }
}
