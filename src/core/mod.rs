mod engine;
mod rates;
mod types;

pub use engine::{
    HORIZON_AGE, ScenarioWeights, aligned_segment_row, check_band_order, classify_point,
    run_projection, segment_series, step_year, summarize,
};
pub use rates::{CdiEstimate, cdi_estimate, estimated_real_return, real_return, year_from_date};
pub use types::{
    BandCheck, ContributionEntry, Phase, ProjectionBands, Segment, SeriesPoint, Summary,
    Uncertainty, UserData,
};
