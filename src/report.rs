//! Analytics Report Module
//! Runs the selected questions and renders the answers as text or JSON.

use crate::analytics::{CrashAnalytics, QueryError, StyleEthnicity};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// The ten crash questions, numbered as they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Question {
    MaleFatalities = 1,
    TwoWheelersCharged = 2,
    FatalNoAirbagMakes = 3,
    HitAndRunLicensed = 4,
    StateWithoutFemales = 5,
    InjuryMakes3To5 = 6,
    EthnicityPerBodyStyle = 7,
    AlcoholZipCodes = 8,
    InsuredHighDamage = 9,
    SpeedingMakes = 10,
}

impl Question {
    pub const ALL: [Question; 10] = [
        Question::MaleFatalities,
        Question::TwoWheelersCharged,
        Question::FatalNoAirbagMakes,
        Question::HitAndRunLicensed,
        Question::StateWithoutFemales,
        Question::InjuryMakes3To5,
        Question::EthnicityPerBodyStyle,
        Question::AlcoholZipCodes,
        Question::InsuredHighDamage,
        Question::SpeedingMakes,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.number() == number)
    }

    pub fn title(self) -> &'static str {
        match self {
            Question::MaleFatalities => "Crashes with more than 2 males killed",
            Question::TwoWheelersCharged => "Two wheelers booked for crashes",
            Question::FatalNoAirbagMakes => "Top 5 car makes, driver died and airbags did not deploy",
            Question::HitAndRunLicensed => "Vehicles with licensed drivers in hit and run",
            Question::StateWithoutFemales => "State with most crashes without females",
            Question::InjuryMakes3To5 => "3rd to 5th makes by injuries including death",
            Question::EthnicityPerBodyStyle => "Top ethnic group per body style",
            Question::AlcoholZipCodes => "Top 5 zip codes of alcohol related car crashes",
            Question::InsuredHighDamage => "Insured crashes, damage above 4, no damaged property",
            Question::SpeedingMakes => "Top 5 makes in speeding offences",
        }
    }

    /// Run this question against the loaded tables.
    pub fn answer(self, analytics: &CrashAnalytics) -> Result<Answer, QueryError> {
        log::debug!("Running Q{}: {}", self.number(), self.title());
        let answer = match self {
            Question::MaleFatalities => Answer::Count(analytics.crashes_with_male_deaths_over_two()?),
            Question::TwoWheelersCharged => Answer::Count(analytics.two_wheelers_charged()?),
            Question::FatalNoAirbagMakes => Answer::Labels(analytics.top_car_makes_fatal_no_airbag()?),
            Question::HitAndRunLicensed => {
                Answer::Count(analytics.hit_and_run_valid_license_vehicles()?)
            }
            Question::StateWithoutFemales => Answer::Label(analytics.top_state_without_females()?),
            Question::InjuryMakes3To5 => {
                Answer::Labels(analytics.third_to_fifth_makes_by_injuries()?)
            }
            Question::EthnicityPerBodyStyle => {
                Answer::Table(analytics.top_ethnicity_per_body_style()?)
            }
            Question::AlcoholZipCodes => Answer::Labels(analytics.top_zips_alcohol_car_crashes()?),
            Question::InsuredHighDamage => Answer::Count(analytics.insured_high_damage_crashes()?),
            Question::SpeedingMakes => Answer::Labels(analytics.top_makes_speeding()?),
        };
        Ok(answer)
    }
}

/// Result of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Count(usize),
    Label(Option<String>),
    Labels(Vec<String>),
    Table(Vec<StyleEthnicity>),
}

/// Build a DataFrame from the body style / ethnicity rows for display.
pub fn style_ethnicity_frame(rows: &[StyleEthnicity]) -> PolarsResult<DataFrame> {
    let styles: Vec<&str> = rows.iter().map(|r| r.body_style.as_str()).collect();
    let ethnicities: Vec<&str> = rows.iter().map(|r| r.top_ethnicity.as_str()).collect();

    DataFrame::new(vec![
        Column::new("VEH_BODY_STYL_ID".into(), styles),
        Column::new("TOP_ETHNICITY".into(), ethnicities),
    ])
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Count(n) => write!(f, "{n}"),
            Answer::Label(Some(label)) => write!(f, "{label}"),
            Answer::Label(None) => write!(f, "None"),
            Answer::Labels(labels) => write!(f, "[{}]", labels.join(", ")),
            Answer::Table(rows) => {
                let df = style_ethnicity_frame(rows).map_err(|_| fmt::Error)?;
                write!(f, "\n{df}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnswer {
    pub question: u8,
    pub title: &'static str,
    pub answer: Answer,
}

/// Answers for a run, in question order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub answers: Vec<QuestionAnswer>,
}

impl AnalyticsReport {
    /// Run the questions in order. The first failing question aborts the run.
    pub fn run(analytics: &CrashAnalytics, questions: &[Question]) -> Result<Self, QueryError> {
        let answers = questions
            .iter()
            .map(|&q| {
                Ok(QuestionAnswer {
                    question: q.number(),
                    title: q.title(),
                    answer: q.answer(analytics)?,
                })
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        Ok(Self { answers })
    }

    /// One `Analytics N:  value` line per question.
    pub fn render_text(&self) -> String {
        self.answers
            .iter()
            .map(|a| format!("Analytics {}:  {}", a.question, a.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
