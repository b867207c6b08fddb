mod chart;
mod engine;
mod parse;
mod types;

pub use chart::{PieChart, PieSplit, Point, describe_arc, group_thousands, polar_to_cartesian};
pub use engine::{Projection, project, run_projection, sip_future_value};
pub use parse::{parse_float_prefix, parse_int_prefix};
pub use types::{
    ANNUITY_PERCENT_CHOICES, DEFAULT_ANNUITY_PERCENT, DEFAULT_ANNUITY_RATE_PERCENT, MAX_AGE,
    DEFAULT_RETIREMENT_AGE, FormValue, ProjectionForm, ProjectionInput, ProjectionResult,
};
