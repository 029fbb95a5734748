use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BandCheck, CdiEstimate, ContributionEntry, Phase, Summary, Uncertainty, UserData,
    aligned_segment_row, cdi_estimate, check_band_order, run_projection, segment_series, summarize,
    year_from_date,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UncertaintyPayload {
    return_rate: Option<f64>,
    annual_contribution: Option<f64>,
    extra_income: Option<f64>,
    monthly_benefit: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePayloadEntry {
    year: u32,
    #[serde(alias = "monthlyAmount")]
    annual_amount: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    initial_accumulation: Option<f64>,
    annual_contribution: Option<f64>,
    real_return_rate: Option<f64>,
    monthly_benefit: Option<f64>,
    extra_monthly_income: Option<f64>,
    initial_date: Option<String>,
    uncertainty: Option<UncertaintyPayload>,
    contribution_schedule: Option<Vec<SchedulePayloadEntry>>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Deterministic retirement projection (base, pessimistic and optimistic bands)"
)]
struct Cli {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(
        long,
        default_value_t = 10_000.0,
        help = "Wealth already accumulated at the start of the projection"
    )]
    initial_accumulation: f64,
    #[arg(
        long,
        default_value_t = 12_000.0,
        help = "Default yearly net contribution before retirement"
    )]
    annual_contribution: f64,
    #[arg(long, default_value_t = 6.0, help = "Real annual return in percent, e.g. 6")]
    real_return_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Benefit withdrawn every month after retirement"
    )]
    monthly_benefit: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Extra income earned every month after retirement"
    )]
    extra_monthly_income: f64,
    #[arg(
        long,
        help = "Projection start date (YYYY-MM-DD), used only for the CDI rate suggestion"
    )]
    initial_date: Option<String>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Return-rate uncertainty in percent"
    )]
    return_rate_uncertainty: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual-contribution uncertainty in percent"
    )]
    contribution_uncertainty: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Extra-income uncertainty in percent"
    )]
    extra_income_uncertainty: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly-benefit uncertainty in percent"
    )]
    benefit_uncertainty: f64,
}

#[derive(Debug)]
struct ApiRequest {
    user: UserData,
    uncertainty: Uncertainty,
    schedule: Vec<ContributionEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentResponse {
    phase: Phase,
    start_age: u32,
    end_age: u32,
    values: Vec<Option<f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    ages: Vec<u32>,
    base: Vec<f64>,
    pessimistic: Vec<f64>,
    optimistic: Vec<f64>,
    has_uncertainty: bool,
    band_check: BandCheck,
    segments: Vec<SegmentResponse>,
    summary: Summary,
    cdi_estimate: Option<CdiEstimate>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<(UserData, Uncertainty), String> {
    for (name, value) in [
        ("--initial-accumulation", cli.initial_accumulation),
        ("--annual-contribution", cli.annual_contribution),
        ("--real-return-rate", cli.real_return_rate),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }

    if !cli.monthly_benefit.is_finite() || cli.monthly_benefit < 0.0 {
        return Err("--monthly-benefit must be >= 0".to_string());
    }

    if !cli.extra_monthly_income.is_finite() || cli.extra_monthly_income < 0.0 {
        return Err("--extra-monthly-income must be >= 0".to_string());
    }

    for (name, value) in [
        ("--return-rate-uncertainty", cli.return_rate_uncertainty),
        ("--contribution-uncertainty", cli.contribution_uncertainty),
        ("--extra-income-uncertainty", cli.extra_income_uncertainty),
        ("--benefit-uncertainty", cli.benefit_uncertainty),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    let user = UserData {
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        initial_accumulation: cli.initial_accumulation,
        annual_contribution: cli.annual_contribution,
        real_return_rate: cli.real_return_rate,
        monthly_benefit: cli.monthly_benefit,
        extra_monthly_income: cli.extra_monthly_income,
        initial_date: cli.initial_date,
    };
    let uncertainty = Uncertainty {
        return_rate: cli.return_rate_uncertainty,
        annual_contribution: cli.contribution_uncertainty,
        extra_income: cli.extra_income_uncertainty,
        monthly_benefit: cli.benefit_uncertainty,
    };

    Ok((user, uncertainty))
}

fn schedule_from_payload(
    entries: Vec<SchedulePayloadEntry>,
) -> Result<Vec<ContributionEntry>, String> {
    let mut schedule = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.year == 0 {
            return Err("contributionSchedule years are 1-based and must be >= 1".to_string());
        }
        if !entry.annual_amount.is_finite() {
            return Err("contributionSchedule amounts must be finite".to_string());
        }
        schedule.push(ContributionEntry {
            year: entry.year,
            annual_amount: entry.annual_amount,
        });
    }
    Ok(schedule)
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.initial_accumulation {
        cli.initial_accumulation = v;
    }
    if let Some(v) = payload.annual_contribution {
        cli.annual_contribution = v;
    }
    if let Some(v) = payload.real_return_rate {
        cli.real_return_rate = v;
    }
    if let Some(v) = payload.monthly_benefit {
        cli.monthly_benefit = v;
    }
    if let Some(v) = payload.extra_monthly_income {
        cli.extra_monthly_income = v;
    }
    if let Some(v) = payload.initial_date {
        cli.initial_date = Some(v);
    }

    if let Some(uncertainty) = payload.uncertainty {
        if let Some(v) = uncertainty.return_rate {
            cli.return_rate_uncertainty = v;
        }
        if let Some(v) = uncertainty.annual_contribution {
            cli.contribution_uncertainty = v;
        }
        if let Some(v) = uncertainty.extra_income {
            cli.extra_income_uncertainty = v;
        }
        if let Some(v) = uncertainty.monthly_benefit {
            cli.benefit_uncertainty = v;
        }
    }

    let schedule = match payload.contribution_schedule {
        Some(entries) => schedule_from_payload(entries)?,
        None => Vec::new(),
    };

    let (user, uncertainty) = build_inputs(cli)?;
    Ok(ApiRequest {
        user,
        uncertainty,
        schedule,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_age: 30,
        retirement_age: 65,
        initial_accumulation: 10_000.0,
        annual_contribution: 12_000.0,
        real_return_rate: 6.0,
        monthly_benefit: 0.0,
        extra_monthly_income: 0.0,
        initial_date: None,
        return_rate_uncertainty: 0.0,
        contribution_uncertainty: 0.0,
        extra_income_uncertainty: 0.0,
        benefit_uncertainty: 0.0,
    }
}

fn build_project_response(request: &ApiRequest) -> ProjectResponse {
    let bands = run_projection(&request.user, &request.schedule, &request.uncertainty);

    let band_check = check_band_order(&bands, &request.uncertainty);
    if band_check.checked && !band_check.ordered {
        eprintln!(
            "scenario bands out of order at {} of {} points",
            band_check.violations.len(),
            bands.base.len()
        );
    }

    let segments = segment_series(&bands.base, request.user.retirement_age);
    let segment_rows: Vec<SegmentResponse> = segments
        .iter()
        .map(|segment| SegmentResponse {
            phase: segment.phase,
            start_age: segment.points.first().expect("segments are never empty").age,
            end_age: segment.points.last().expect("segments are never empty").age,
            values: aligned_segment_row(segment, &bands.base),
        })
        .collect();

    let summary = summarize(&bands.base, &request.user);
    let cdi = request
        .user
        .initial_date
        .as_deref()
        .and_then(year_from_date)
        .map(cdi_estimate);

    ProjectResponse {
        ages: bands.base.iter().map(|point| point.age).collect(),
        base: bands.base.iter().map(|point| point.wealth).collect(),
        pessimistic: bands.pessimistic.iter().map(|point| point.wealth).collect(),
        optimistic: bands.optimistic.iter().map(|point| point.wealth).collect(),
        has_uncertainty: !request.uncertainty.is_zero(),
        band_check,
        segments: segment_rows,
        summary,
        cdi_estimate: cdi,
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("nestegg HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_project_response(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}
