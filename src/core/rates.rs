use serde::Serialize;

const INFLATION_TARGET: f64 = 3.0;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdiEstimate {
    pub year: i32,
    pub cdi_rate: f64,
    pub inflation_target: f64,
    pub real_return: f64,
}

pub fn cdi_rate(year: i32) -> f64 {
    match year {
        2025 => 11.5,
        2024 => 12.25,
        2023 => 13.75,
        2022 => 12.5,
        2021 => 4.4,
        2020 => 2.75,
        // The overnight rate tracks the policy rate, which hovers a few
        // points above the inflation target.
        year if year > 2025 => INFLATION_TARGET + 8.5,
        _ => 10.0,
    }
}

pub fn real_return(nominal_rate: f64, inflation_rate: f64) -> f64 {
    ((1.0 + nominal_rate / 100.0) / (1.0 + inflation_rate / 100.0)) - 1.0
}

pub fn estimated_real_return(year: i32) -> f64 {
    let real = real_return(cdi_rate(year), INFLATION_TARGET);
    (real * 100.0 * 10.0).round() / 10.0
}

pub fn cdi_estimate(year: i32) -> CdiEstimate {
    CdiEstimate {
        year,
        cdi_rate: cdi_rate(year),
        inflation_target: INFLATION_TARGET,
        real_return: estimated_real_return(year),
    }
}

pub fn year_from_date(date: &str) -> Option<i32> {
    date.get(..4)?.parse().ok()
}
