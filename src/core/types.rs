use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Negative,
    PreRetirement,
    PostRetirement,
}

#[derive(Debug, Clone, Default)]
pub struct UserData {
    pub current_age: u32,
    pub retirement_age: u32,
    pub initial_accumulation: f64,
    pub annual_contribution: f64,
    pub real_return_rate: f64,
    pub monthly_benefit: f64,
    pub extra_monthly_income: f64,
    pub initial_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionEntry {
    pub year: u32,
    pub annual_amount: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uncertainty {
    pub return_rate: f64,
    pub annual_contribution: f64,
    pub extra_income: f64,
    pub monthly_benefit: f64,
}

impl Uncertainty {
    pub fn is_zero(&self) -> bool {
        self.return_rate == 0.0
            && self.annual_contribution == 0.0
            && self.extra_income == 0.0
            && self.monthly_benefit == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub age: u32,
    pub wealth: f64,
}

#[derive(Debug, Clone)]
pub struct ProjectionBands {
    pub base: Vec<SeriesPoint>,
    pub pessimistic: Vec<SeriesPoint>,
    pub optimistic: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub phase: Phase,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandCheck {
    pub checked: bool,
    pub ordered: bool,
    pub violations: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_wealth: Option<f64>,
    pub monthly_income: Option<f64>,
    pub years_to_retirement: i64,
}
