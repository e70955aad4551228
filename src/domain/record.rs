//! Validated prediction input.
//!
//! Every categorical attribute is an enum with a fixed value list. Raw strings
//! coming from the form, CLI flags or CSV files are matched exactly (case
//! sensitive) against that list; anything else is an `InvalidValueError`.

use serde::{Deserialize, Serialize};

use crate::error::InvalidValueError;

/// The seven input fields, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Gender,
    RaceEthnicity,
    ParentalLevelOfEducation,
    Lunch,
    TestPreparationCourse,
    ReadingScore,
    WritingScore,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Gender,
        Field::RaceEthnicity,
        Field::ParentalLevelOfEducation,
        Field::Lunch,
        Field::TestPreparationCourse,
        Field::ReadingScore,
        Field::WritingScore,
    ];

    /// Column name used in frames, CSV headers and artifacts.
    pub fn name(self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::RaceEthnicity => "race_ethnicity",
            Field::ParentalLevelOfEducation => "parental_level_of_education",
            Field::Lunch => "lunch",
            Field::TestPreparationCourse => "test_preparation_course",
            Field::ReadingScore => "reading_score",
            Field::WritingScore => "writing_score",
        }
    }

    /// Human-facing label for the form.
    pub fn label(self) -> &'static str {
        match self {
            Field::Gender => "Gender",
            Field::RaceEthnicity => "Race/Ethnicity",
            Field::ParentalLevelOfEducation => "Parental Level of Education",
            Field::Lunch => "Lunch Type",
            Field::TestPreparationCourse => "Test Preparation Course",
            Field::ReadingScore => "Reading Score",
            Field::WritingScore => "Writing Score",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::ReadingScore | Field::WritingScore)
    }
}

/// A closed set of string values for one categorical field.
pub trait Categorical: Sized + Copy + PartialEq + 'static {
    const FIELD: Field;
    const ALL: &'static [Self];
    /// Canonical strings, index-aligned with `ALL`.
    const VALUES: &'static [&'static str];

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    fn as_str(self) -> &'static str {
        Self::VALUES[self.index()]
    }

    fn parse(value: &str) -> Result<Self, InvalidValueError> {
        Self::VALUES
            .iter()
            .position(|v| *v == value)
            .map(|idx| Self::ALL[idx])
            .ok_or_else(|| InvalidValueError {
                field: Self::FIELD,
                value: value.to_string(),
                allowed: Self::VALUES,
            })
    }

    /// Next value, wrapping around (used by the form's left/right keys).
    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let n = Self::ALL.len();
        Self::ALL[(self.index() + n - 1) % n]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Categorical for Gender {
    const FIELD: Field = Field::Gender;
    const ALL: &'static [Self] = &[Gender::Female, Gender::Male];
    const VALUES: &'static [&'static str] = &["female", "male"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceEthnicity {
    #[serde(rename = "group A")]
    GroupA,
    #[serde(rename = "group B")]
    GroupB,
    #[serde(rename = "group C")]
    GroupC,
    #[serde(rename = "group D")]
    GroupD,
    #[serde(rename = "group E")]
    GroupE,
}

impl Categorical for RaceEthnicity {
    const FIELD: Field = Field::RaceEthnicity;
    const ALL: &'static [Self] = &[
        RaceEthnicity::GroupA,
        RaceEthnicity::GroupB,
        RaceEthnicity::GroupC,
        RaceEthnicity::GroupD,
        RaceEthnicity::GroupE,
    ];
    const VALUES: &'static [&'static str] =
        &["group A", "group B", "group C", "group D", "group E"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentalEducation {
    #[serde(rename = "bachelor's degree")]
    Bachelors,
    #[serde(rename = "some college")]
    SomeCollege,
    #[serde(rename = "master's degree")]
    Masters,
    #[serde(rename = "associate's degree")]
    Associates,
    #[serde(rename = "high school")]
    HighSchool,
    #[serde(rename = "some high school")]
    SomeHighSchool,
}

impl Categorical for ParentalEducation {
    const FIELD: Field = Field::ParentalLevelOfEducation;
    const ALL: &'static [Self] = &[
        ParentalEducation::Bachelors,
        ParentalEducation::SomeCollege,
        ParentalEducation::Masters,
        ParentalEducation::Associates,
        ParentalEducation::HighSchool,
        ParentalEducation::SomeHighSchool,
    ];
    const VALUES: &'static [&'static str] = &[
        "bachelor's degree",
        "some college",
        "master's degree",
        "associate's degree",
        "high school",
        "some high school",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lunch {
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "free/reduced")]
    FreeReduced,
}

impl Categorical for Lunch {
    const FIELD: Field = Field::Lunch;
    const ALL: &'static [Self] = &[Lunch::Standard, Lunch::FreeReduced];
    const VALUES: &'static [&'static str] = &["standard", "free/reduced"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPreparation {
    None,
    Completed,
}

impl Categorical for TestPreparation {
    const FIELD: Field = Field::TestPreparationCourse;
    const ALL: &'static [Self] = &[TestPreparation::None, TestPreparation::Completed];
    const VALUES: &'static [&'static str] = &["none", "completed"];
}

/// One validated set of user-supplied feature values.
///
/// Immutable once built; a new record is constructed for every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    gender: Gender,
    race_ethnicity: RaceEthnicity,
    parental_level_of_education: ParentalEducation,
    lunch: Lunch,
    test_preparation_course: TestPreparation,
    reading_score: f64,
    writing_score: f64,
}

impl InputRecord {
    /// Validate raw string inputs.
    ///
    /// Categorical fields are checked in column order and the first value
    /// outside its domain is reported. Scores are taken as-is; range checks
    /// belong to the input surface.
    pub fn new(
        gender: &str,
        race_ethnicity: &str,
        parental_level_of_education: &str,
        lunch: &str,
        test_preparation_course: &str,
        reading_score: f64,
        writing_score: f64,
    ) -> Result<Self, InvalidValueError> {
        let record = Self::from_parts(
            Gender::parse(gender)?,
            RaceEthnicity::parse(race_ethnicity)?,
            ParentalEducation::parse(parental_level_of_education)?,
            Lunch::parse(lunch)?,
            TestPreparation::parse(test_preparation_course)?,
            reading_score,
            writing_score,
        );
        tracing::debug!(?record, "input record created");
        Ok(record)
    }

    /// Build from already-typed values; cannot fail.
    pub fn from_parts(
        gender: Gender,
        race_ethnicity: RaceEthnicity,
        parental_level_of_education: ParentalEducation,
        lunch: Lunch,
        test_preparation_course: TestPreparation,
        reading_score: f64,
        writing_score: f64,
    ) -> Self {
        Self {
            gender,
            race_ethnicity,
            parental_level_of_education,
            lunch,
            test_preparation_course,
            reading_score,
            writing_score,
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn race_ethnicity(&self) -> RaceEthnicity {
        self.race_ethnicity
    }

    pub fn parental_level_of_education(&self) -> ParentalEducation {
        self.parental_level_of_education
    }

    pub fn lunch(&self) -> Lunch {
        self.lunch
    }

    pub fn test_preparation_course(&self) -> TestPreparation {
        self.test_preparation_course
    }

    pub fn reading_score(&self) -> f64 {
        self.reading_score
    }

    pub fn writing_score(&self) -> f64 {
        self.writing_score
    }

    /// Value of one field as a frame cell.
    pub fn cell(&self, field: Field) -> super::Cell {
        use super::Cell;
        match field {
            Field::Gender => Cell::Text(self.gender.as_str().to_string()),
            Field::RaceEthnicity => Cell::Text(self.race_ethnicity.as_str().to_string()),
            Field::ParentalLevelOfEducation => {
                Cell::Text(self.parental_level_of_education.as_str().to_string())
            }
            Field::Lunch => Cell::Text(self.lunch.as_str().to_string()),
            Field::TestPreparationCourse => {
                Cell::Text(self.test_preparation_course.as_str().to_string())
            }
            Field::ReadingScore => Cell::Number(self.reading_score),
            Field::WritingScore => Cell::Number(self.writing_score),
        }
    }

    /// Single-row frame with the seven columns in fixed order.
    pub fn to_row(&self) -> super::FeatureFrame {
        super::FeatureFrame::from_records(std::slice::from_ref(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> [&'static str; 5] {
        ["female", "group B", "bachelor's degree", "standard", "none"]
    }

    fn build(values: [&str; 5]) -> Result<InputRecord, InvalidValueError> {
        InputRecord::new(values[0], values[1], values[2], values[3], values[4], 70.0, 65.0)
    }

    #[test]
    fn accepts_every_valid_combination() {
        let mut n = 0;
        for g in Gender::VALUES {
            for r in RaceEthnicity::VALUES {
                for p in ParentalEducation::VALUES {
                    for l in Lunch::VALUES {
                        for t in TestPreparation::VALUES {
                            let rec = build([*g, *r, *p, *l, *t]).unwrap();
                            assert_eq!(rec.gender().as_str(), *g);
                            assert_eq!(rec.parental_level_of_education().as_str(), *p);
                            n += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(n, 2 * 5 * 6 * 2 * 2);
    }

    #[test]
    fn rejects_out_of_domain_value_for_each_field() {
        let fields = [
            Field::Gender,
            Field::RaceEthnicity,
            Field::ParentalLevelOfEducation,
            Field::Lunch,
            Field::TestPreparationCourse,
        ];
        for (idx, field) in fields.iter().enumerate() {
            let mut values = valid();
            values[idx] = "bogus";
            let err = build(values).unwrap_err();
            assert_eq!(err.field, *field);
            assert_eq!(err.value, "bogus");
            assert!(err.to_string().contains(field.name()), "{err}");
        }
    }

    #[test]
    fn unknown_gender_mentions_gender() {
        let err =
            InputRecord::new("other", "group B", "high school", "standard", "none", 50.0, 50.0)
                .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("gender"), "{msg}");
        assert!(msg.contains("'female'") && msg.contains("'male'"), "{msg}");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let err = InputRecord::new("female", "Group B", "high school", "standard", "none", 1.0, 1.0)
            .unwrap_err();
        assert_eq!(err.field, Field::RaceEthnicity);
    }

    #[test]
    fn first_invalid_field_wins() {
        let err =
            InputRecord::new("x", "y", "high school", "standard", "none", 1.0, 1.0).unwrap_err();
        assert_eq!(err.field, Field::Gender);
    }

    #[test]
    fn scores_are_not_range_checked() {
        let rec = InputRecord::new(
            "male",
            "group E",
            "some college",
            "free/reduced",
            "completed",
            150.0,
            -3.0,
        )
        .unwrap();
        assert_eq!(rec.reading_score(), 150.0);
        assert_eq!(rec.writing_score(), -3.0);
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(Gender::Male.next(), Gender::Female);
        assert_eq!(RaceEthnicity::GroupA.prev(), RaceEthnicity::GroupE);
        assert_eq!(ParentalEducation::SomeHighSchool.next(), ParentalEducation::Bachelors);
    }
}
