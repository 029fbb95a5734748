use super::types::{
    BandCheck, ContributionEntry, Phase, ProjectionBands, Segment, SeriesPoint, Summary,
    Uncertainty, UserData,
};

pub const HORIZON_AGE: u32 = 90;

const MONTHLY_WITHDRAWAL_RATE: f64 = 0.005;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioWeights {
    pub contribution: f64,
    pub return_rate: f64,
    pub extra_income: f64,
    pub benefit: f64,
}

impl ScenarioWeights {
    pub const BASE: ScenarioWeights = ScenarioWeights {
        contribution: 1.0,
        return_rate: 1.0,
        extra_income: 1.0,
        benefit: 1.0,
    };

    fn pessimistic(uncertainty: &Uncertainty) -> Self {
        Self {
            contribution: 1.0 - uncertainty.annual_contribution / 100.0,
            return_rate: 1.0 - uncertainty.return_rate / 100.0,
            extra_income: 1.0 - uncertainty.extra_income / 100.0,
            // More benefit uncertainty means a larger drawdown, not a smaller one.
            benefit: 1.0 + uncertainty.monthly_benefit / 100.0,
        }
    }

    fn optimistic(uncertainty: &Uncertainty) -> Self {
        Self {
            contribution: 1.0 + uncertainty.annual_contribution / 100.0,
            return_rate: 1.0 + uncertainty.return_rate / 100.0,
            extra_income: 1.0 + uncertainty.extra_income / 100.0,
            benefit: 1.0 - uncertainty.monthly_benefit / 100.0,
        }
    }
}

pub fn step_year(
    value: f64,
    age: u32,
    user: &UserData,
    base_annual_cash_flow: f64,
    weights: ScenarioWeights,
) -> f64 {
    let mut cash_flow = base_annual_cash_flow * weights.contribution;
    if age >= user.retirement_age {
        cash_flow += user.extra_monthly_income * 12.0 * weights.extra_income
            - user.monthly_benefit * 12.0 * weights.benefit;
    }
    value + cash_flow + value * (user.real_return_rate / 100.0 * weights.return_rate)
}

pub fn run_projection(
    user: &UserData,
    schedule: &[ContributionEntry],
    uncertainty: &Uncertainty,
) -> ProjectionBands {
    let span = (HORIZON_AGE as usize + 1).saturating_sub(user.current_age as usize);
    let mut base = Vec::with_capacity(span);
    let mut pessimistic = Vec::with_capacity(span);
    let mut optimistic = Vec::with_capacity(span);

    let mut base_value = user.initial_accumulation;
    let mut pessimistic_value = user.initial_accumulation;
    let mut optimistic_value = user.initial_accumulation;

    let pessimistic_weights = ScenarioWeights::pessimistic(uncertainty);
    let optimistic_weights = ScenarioWeights::optimistic(uncertainty);
    let collapse_bands = uncertainty.is_zero();

    for (step, age) in (user.current_age..=HORIZON_AGE).enumerate() {
        // Each recorded value is the wealth at the start of that year, before
        // the year's cash flow and growth are applied.
        base.push(SeriesPoint {
            age,
            wealth: base_value,
        });
        pessimistic.push(SeriesPoint {
            age,
            wealth: pessimistic_value,
        });
        optimistic.push(SeriesPoint {
            age,
            wealth: optimistic_value,
        });

        let cash_flow = annual_cash_flow_for_step(user, schedule, step as u32);
        base_value = step_year(base_value, age, user, cash_flow, ScenarioWeights::BASE);
        pessimistic_value = step_year(pessimistic_value, age, user, cash_flow, pessimistic_weights);
        optimistic_value = step_year(optimistic_value, age, user, cash_flow, optimistic_weights);

        if collapse_bands {
            pessimistic_value = base_value;
            optimistic_value = base_value;
        }
    }

    ProjectionBands {
        base,
        pessimistic,
        optimistic,
    }
}

fn annual_cash_flow_for_step(user: &UserData, schedule: &[ContributionEntry], step: u32) -> f64 {
    schedule
        .iter()
        .find(|entry| entry.year == step + 1)
        .map(|entry| entry.annual_amount)
        .unwrap_or(user.annual_contribution)
}

pub fn check_band_order(bands: &ProjectionBands, uncertainty: &Uncertainty) -> BandCheck {
    if uncertainty.is_zero() {
        return BandCheck {
            checked: false,
            ordered: true,
            violations: Vec::new(),
        };
    }

    let mut violations = Vec::new();
    for (index, point) in bands.base.iter().enumerate() {
        let pessimistic = bands.pessimistic[index].wealth;
        let optimistic = bands.optimistic[index].wealth;
        if !(pessimistic <= point.wealth && point.wealth <= optimistic) {
            violations.push(index);
        }
    }

    BandCheck {
        checked: true,
        ordered: violations.is_empty(),
        violations,
    }
}

pub fn classify_point(age: u32, wealth: f64, retirement_age: u32) -> Phase {
    if wealth < 0.0 {
        Phase::Negative
    } else if age < retirement_age {
        Phase::PreRetirement
    } else {
        Phase::PostRetirement
    }
}

pub fn segment_series(series: &[SeriesPoint], retirement_age: u32) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for point in series {
        let phase = classify_point(point.age, point.wealth, retirement_age);
        match segments.last_mut() {
            Some(segment) if segment.phase == phase => segment.points.push(*point),
            _ => segments.push(Segment {
                phase,
                points: vec![*point],
            }),
        }
    }
    segments
}

pub fn aligned_segment_row(segment: &Segment, series: &[SeriesPoint]) -> Vec<Option<f64>> {
    let Some(first) = series.first() else {
        return Vec::new();
    };

    let mut row = vec![None; series.len()];
    for point in &segment.points {
        let index = (point.age - first.age) as usize;
        if index < row.len() {
            row[index] = Some(point.wealth);
        }
    }
    row
}

pub fn summarize(base: &[SeriesPoint], user: &UserData) -> Summary {
    let final_wealth = base.last().map(|point| point.wealth);
    Summary {
        final_wealth,
        monthly_income: final_wealth.map(|wealth| wealth * MONTHLY_WITHDRAWAL_RATE),
        years_to_retirement: user.retirement_age as i64 - user.current_age as i64,
    }
}
