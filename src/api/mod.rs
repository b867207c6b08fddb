use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::core::{
    ANNUITY_PERCENT_CHOICES, FormValue, PieChart, PieSplit, ProjectionForm, ProjectionInput,
    ProjectionResult, group_thousands, project,
};
use crate::error::{NpsError, Result};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "nps",
    about = "NPS retirement calculator (SIP maturity, lump sum, annuity and monthly pension)"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the calculator page and JSON API
    Serve {
        #[arg(default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Compute a projection and print it
    Project(ProjectArgs),
}

// Form fields stay text so they go through the same coercion as the web form.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(long, help = "Monthly investment in rupees, e.g. 5000")]
    monthly_investment: Option<String>,
    #[arg(long, help = "Expected annual return in percent, e.g. 10")]
    expected_return: Option<String>,
    #[arg(long, help = "Age when contributions start, e.g. 25")]
    start_age: Option<String>,
    #[arg(long, default_value = "60")]
    retirement_age: String,
    #[arg(long, default_value = "40", help = "Share of the corpus annuitised, 40-100")]
    annuity_percent: String,
    #[arg(long, default_value = "6", help = "Expected annuity rate in percent p.a., 1-15")]
    annuity_rate: String,
    #[arg(long, help = "Print the response as JSON")]
    json: bool,
    #[arg(long, help = "Write the lump sum / annuity chart as SVG to this path")]
    svg: Option<PathBuf>,
}

impl ProjectArgs {
    fn to_form(&self) -> ProjectionForm {
        ProjectionForm {
            monthly_investment: self.monthly_investment.clone().map(FormValue::from),
            expected_return: self.expected_return.clone().map(FormValue::from),
            start_age: self.start_age.clone().map(FormValue::from),
            retirement_age: Some(FormValue::from(self.retirement_age.clone())),
            annuity_percent: Some(FormValue::from(self.annuity_percent.clone())),
            annuity_rate: Some(FormValue::from(self.annuity_rate.clone())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    input: ProjectionInput,
    result: ProjectionResult,
    split: PieSplit,
    chart_svg: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultsResponse {
    form: ProjectionForm,
    annuity_percent_choices: Vec<u32>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { port } => run_http_server(port).await,
        Command::Project(args) => run_project_command(&args),
    }
}

fn run_project_command(args: &ProjectArgs) -> Result<()> {
    let response = build_projection_response(&args.to_form());

    if let Some(path) = &args.svg {
        std::fs::write(path, &response.chart_svg)?;
        info!(path = %path.display(), "wrote chart");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_text(&response.result));
    }
    Ok(())
}

fn build_projection_response(form: &ProjectionForm) -> ProjectionResponse {
    let input = form.to_input();
    let projection = project(&input);
    let result = projection.rounded();
    let split = PieSplit::from_projection(&projection);
    let chart_svg = PieChart::default().render_svg(split, result.maturity_amount);

    debug!(
        ?input,
        years = projection.years,
        maturity_amount = result.maturity_amount,
        "computed projection"
    );

    ProjectionResponse {
        input,
        result,
        split,
        chart_svg,
    }
}

fn render_text(result: &ProjectionResult) -> String {
    [
        ("Total Invested", result.total_invested),
        ("Interest Earned", result.interest_earned),
        ("Maturity Amount", result.maturity_amount),
        ("Lump Sum Value", result.lump_sum),
        ("Annuity Value", result.annuity_value),
        ("Estimated Monthly Pension", result.estimated_monthly_pension),
    ]
    .iter()
    .map(|(label, value)| format!("{label}: ₹{}\n", group_thousands(*value)))
    .collect()
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/defaults", get(defaults_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/chart.svg", get(chart_svg_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| NpsError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(%addr, "NPS calculator listening");
    println!("NPS calculator listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await?;
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn defaults_handler() -> Response {
    json_response(
        StatusCode::OK,
        DefaultsResponse {
            form: ProjectionForm::defaults(),
            annuity_percent_choices: ANNUITY_PERCENT_CHOICES.to_vec(),
        },
    )
}

async fn project_get_handler(Query(form): Query<ProjectionForm>) -> Response {
    project_handler_impl(form)
}

async fn project_post_handler(Json(form): Json<ProjectionForm>) -> Response {
    project_handler_impl(form)
}

fn project_handler_impl(form: ProjectionForm) -> Response {
    json_response(StatusCode::OK, build_projection_response(&form))
}

async fn chart_svg_handler(Query(form): Query<ProjectionForm>) -> Response {
    let response = build_projection_response(&form);
    with_cache_control((
        [(header::CONTENT_TYPE, "image/svg+xml; charset=utf-8")],
        response.chart_svg,
    ))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
