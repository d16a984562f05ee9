use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{LoanParameters, LoanSummary, ScheduleWindow, YEARS_PER_WINDOW, YearlyAggregate};
use crate::error::LoanError;
use crate::report::{
    Session, SessionStore, export_file_name, format_summary, format_window, format_yearly_table,
    render_stacked_chart, write_schedule_csv_file,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MIN_PRINCIPAL: f64 = 1_000.0;
const MAX_PRINCIPAL: f64 = 10_000_000.0;
const MAX_ANNUAL_RATE: f64 = 50.0;
const MIN_TERM_YEARS: u32 = 1;
const MAX_TERM_YEARS: u32 = 30;
const MAX_MONTHLY_INSURANCE: f64 = 500.0;

const CHART_WIDTH: usize = 50;

type AppState = Arc<SessionStore>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    #[serde(alias = "amount")]
    principal: Option<f64>,
    #[serde(alias = "rate", alias = "annual_rate")]
    annual_rate: Option<f64>,
    #[serde(alias = "term", alias = "term_years")]
    term_years: Option<u32>,
    #[serde(alias = "insurance", alias = "monthly_insurance")]
    monthly_insurance: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "loancalc",
    about = "Fixed-payment loan amortization schedule with CSV and PDF export",
    after_help = "Run `loancalc serve [port]` to start the browser UI and JSON API."
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 100_000.0,
        help = "Loan amount, between 1,000 and 10,000,000"
    )]
    principal: f64,
    #[arg(
        long,
        default_value_t = 12.0,
        help = "Annual interest rate in percent, between 0 and 50"
    )]
    annual_rate: f64,
    #[arg(long, default_value_t = 5, help = "Loan term in years, between 1 and 30")]
    term_years: u32,
    #[arg(
        long,
        default_value_t = 30.0,
        help = "Monthly insurance added to every payment, between 0 and 500"
    )]
    monthly_insurance: f64,
    #[arg(long, help = "Print the full month-by-month schedule")]
    schedule: bool,
    #[arg(long, help = "Skip the yearly stacked bar chart")]
    no_chart: bool,
    #[arg(long, help = "Print the calculation as JSON instead of text")]
    json: bool,
    #[arg(long, value_name = "PATH", help = "Write the schedule as CSV")]
    csv: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Write the schedule as a PDF document")]
    pdf: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    parameters: LoanParameters,
    summary: LoanSummary,
    yearly: Vec<YearlyAggregate>,
    computed_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleResponse {
    parameters: LoanParameters,
    summary: LoanSummary,
    years_per_window: u32,
    windows: Vec<ScheduleWindow>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

struct ExportFile {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

fn build_inputs(cli: &Cli) -> Result<LoanParameters, LoanError> {
    if !(MIN_PRINCIPAL..=MAX_PRINCIPAL).contains(&cli.principal) {
        return Err(LoanError::InvalidInput(format!(
            "--principal must be between {MIN_PRINCIPAL} and {MAX_PRINCIPAL}"
        )));
    }

    if !(0.0..=MAX_ANNUAL_RATE).contains(&cli.annual_rate) {
        return Err(LoanError::InvalidInput(format!(
            "--annual-rate must be between 0 and {MAX_ANNUAL_RATE}"
        )));
    }

    if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&cli.term_years) {
        return Err(LoanError::InvalidInput(format!(
            "--term-years must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS}"
        )));
    }

    if !(0.0..=MAX_MONTHLY_INSURANCE).contains(&cli.monthly_insurance) {
        return Err(LoanError::InvalidInput(format!(
            "--monthly-insurance must be between 0 and {MAX_MONTHLY_INSURANCE}"
        )));
    }

    Ok(LoanParameters {
        principal: cli.principal,
        annual_rate_percent: cli.annual_rate,
        term_years: cli.term_years,
        monthly_insurance: cli.monthly_insurance,
    })
}

/// Run the command-line calculator: summary, yearly breakdown, optional schedule and exports.
pub fn run_cli<I, T>(args: I) -> Result<(), LoanError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let parameters = build_inputs(&cli).inspect_err(|e| log::warn!("rejected input: {e}"))?;
    let session = Session::compute(parameters);

    if cli.json {
        let response = build_calculate_response(&session);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        let yearly = session.yearly();
        print!("{}", format_summary(&session.parameters, &session.summary));
        println!();
        print!("{}", format_yearly_table(&yearly));
        if !cli.no_chart {
            println!();
            print!("{}", render_stacked_chart(&yearly, CHART_WIDTH));
        }
        if cli.schedule {
            for window in session.windows() {
                println!();
                print!("{}", format_window(&window));
            }
        }
    }

    if let Some(path) = &cli.csv {
        write_schedule_csv_file(path, &session.schedule)?;
        log::info!("wrote CSV schedule to {}", path.display());
    }

    if let Some(path) = &cli.pdf {
        let bytes = session
            .to_pdf()
            .inspect_err(|e| log::error!("PDF export failed: {e}"))?;
        std::fs::write(path, &bytes).map_err(|e| {
            LoanError::export("PDF", format!("cannot write '{}': {e}", path.display()))
        })?;
        log::info!("wrote {} byte PDF schedule to {}", bytes.len(), path.display());
    }

    Ok(())
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route("/api/schedule", get(schedule_handler))
        .route("/api/export/csv", get(export_csv_handler))
        .route("/api/export/pdf", get(export_pdf_handler))
        .fallback(not_found_handler)
        .with_state(store)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(Arc::new(SessionStore::new()));

    let listener = TcpListener::bind(addr).await?;
    log::info!("loan calculator HTTP API listening on {addr}");
    println!("Loan calculator listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
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

async fn calculate_get_handler(
    State(store): State<AppState>,
    query: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(payload)) => calculate_handler_impl(&store, payload),
        Err(rejection) => rejected_payload_response(&rejection.body_text()),
    }
}

async fn calculate_post_handler(
    State(store): State<AppState>,
    body: Result<Json<CalculatePayload>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(payload)) => calculate_handler_impl(&store, payload),
        Err(rejection) => rejected_payload_response(&rejection.body_text()),
    }
}

fn rejected_payload_response(detail: &str) -> Response {
    let err = LoanError::InvalidInput(format!("Invalid calculation request: {detail}"));
    log::warn!("rejected calculation request: {err}");
    loan_error_response(&err)
}

fn calculate_handler_impl(store: &SessionStore, payload: CalculatePayload) -> Response {
    match calculate(store, payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => loan_error_response(&e),
    }
}

async fn schedule_handler(State(store): State<AppState>) -> Response {
    match schedule_view(&store) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => loan_error_response(&e),
    }
}

async fn export_csv_handler(State(store): State<AppState>) -> Response {
    export_handler_impl(&store, ExportFormat::Csv)
}

async fn export_pdf_handler(State(store): State<AppState>) -> Response {
    export_handler_impl(&store, ExportFormat::Pdf)
}

fn export_handler_impl(store: &SessionStore, format: ExportFormat) -> Response {
    let file = match export(store, format) {
        Ok(file) => file,
        Err(e) => return loan_error_response(&e),
    };
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    with_cache_control((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}

fn calculate(store: &SessionStore, payload: CalculatePayload) -> Result<CalculateResponse, LoanError> {
    let parameters = parameters_from_payload(payload)
        .inspect_err(|e| log::warn!("rejected calculation request: {e}"))?;
    let session = store.replace(Session::compute(parameters));
    Ok(build_calculate_response(&session))
}

fn schedule_view(store: &SessionStore) -> Result<ScheduleResponse, LoanError> {
    let session = store.current()?;
    Ok(ScheduleResponse {
        parameters: session.parameters,
        summary: session.summary,
        years_per_window: YEARS_PER_WINDOW,
        windows: session.windows(),
    })
}

fn export(store: &SessionStore, format: ExportFormat) -> Result<ExportFile, LoanError> {
    let session = store.current()?;
    let bytes = match format {
        ExportFormat::Csv => session.to_csv(),
        ExportFormat::Pdf => session.to_pdf(),
    }
    .inspect_err(|e| log::error!("{} export failed: {e}", format.extension()))?;

    log::info!("exported {} byte {} schedule", bytes.len(), format.extension());
    Ok(ExportFile {
        file_name: export_file_name(format.extension(), Local::now().naive_local()),
        content_type: format.content_type(),
        bytes,
    })
}

fn build_calculate_response(session: &Session) -> CalculateResponse {
    CalculateResponse {
        parameters: session.parameters,
        summary: session.summary,
        yearly: session.yearly(),
        computed_at: session.computed_at.to_rfc3339(),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
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

fn loan_error_response(err: &LoanError) -> Response {
    error_response(status_for(err), &err.to_string())
}

fn status_for(err: &LoanError) -> StatusCode {
    match err {
        LoanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LoanError::NoSession => StatusCode::CONFLICT,
        LoanError::Export { .. } | LoanError::Io(_) | LoanError::Csv(_) | LoanError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
fn parameters_from_json(json: &str) -> Result<LoanParameters, LoanError> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| LoanError::InvalidInput(format!("Invalid API JSON payload: {e}")))?;
    parameters_from_payload(payload)
}

fn parameters_from_payload(payload: CalculatePayload) -> Result<LoanParameters, LoanError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.term_years {
        cli.term_years = v;
    }
    if let Some(v) = payload.monthly_insurance {
        cli.monthly_insurance = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        principal: 100_000.0,
        annual_rate: 12.0,
        term_years: 5,
        monthly_insurance: 30.0,
        schedule: false,
        no_chart: false,
        json: false,
        csv: None,
        pdf: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request};
    use tower::ServiceExt;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn cli_defaults_match_api_defaults() {
        let parsed = Cli::parse_from(["loancalc"]);
        let defaults = default_cli_for_api();
        assert_approx(parsed.principal, defaults.principal);
        assert_approx(parsed.annual_rate, defaults.annual_rate);
        assert_eq!(parsed.term_years, defaults.term_years);
        assert_approx(parsed.monthly_insurance, defaults.monthly_insurance);
    }

    #[test]
    fn cli_parses_loan_flags() {
        let cli = Cli::parse_from([
            "loancalc",
            "--principal",
            "250000",
            "--annual-rate",
            "0",
            "--term-years",
            "30",
            "--monthly-insurance",
            "0",
            "--schedule",
            "--csv",
            "out.csv",
        ]);
        let params = build_inputs(&cli).expect("valid inputs");
        assert_approx(params.principal, 250_000.0);
        assert_approx(params.annual_rate_percent, 0.0);
        assert_eq!(params.term_years, 30);
        assert!(cli.schedule);
        assert_eq!(cli.csv, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn build_inputs_accepts_range_boundaries() {
        let mut cli = sample_cli();
        cli.principal = MIN_PRINCIPAL;
        cli.annual_rate = MAX_ANNUAL_RATE;
        cli.term_years = MAX_TERM_YEARS;
        cli.monthly_insurance = MAX_MONTHLY_INSURANCE;
        assert!(build_inputs(&cli).is_ok());

        cli.principal = MAX_PRINCIPAL;
        cli.annual_rate = 0.0;
        cli.term_years = MIN_TERM_YEARS;
        cli.monthly_insurance = 0.0;
        assert!(build_inputs(&cli).is_ok());
    }

    #[test]
    fn build_inputs_rejects_out_of_range_principal() {
        let mut cli = sample_cli();
        cli.principal = 999.99;
        let err = build_inputs(&cli).expect_err("must reject small principal");
        assert!(err.to_string().contains("--principal"));

        cli.principal = f64::NAN;
        let err = build_inputs(&cli).expect_err("must reject NaN principal");
        assert!(err.to_string().contains("--principal"));
    }

    #[test]
    fn build_inputs_rejects_out_of_range_rate() {
        let mut cli = sample_cli();
        cli.annual_rate = -0.1;
        let err = build_inputs(&cli).expect_err("must reject negative rate");
        assert!(err.to_string().contains("--annual-rate"));

        cli.annual_rate = 50.5;
        assert!(build_inputs(&cli).is_err());
    }

    #[test]
    fn build_inputs_rejects_zero_term() {
        let mut cli = sample_cli();
        cli.term_years = 0;
        let err = build_inputs(&cli).expect_err("must reject zero term");
        assert!(err.to_string().contains("--term-years"));

        cli.term_years = 31;
        assert!(build_inputs(&cli).is_err());
    }

    #[test]
    fn build_inputs_rejects_out_of_range_insurance() {
        let mut cli = sample_cli();
        cli.monthly_insurance = 500.01;
        let err = build_inputs(&cli).expect_err("must reject large insurance");
        assert!(err.to_string().contains("--monthly-insurance"));
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "principal": 250000,
          "annualRate": 7.25,
          "termYears": 20,
          "monthlyInsurance": 45
        }"#;
        let params = parameters_from_json(json).expect("valid payload");
        assert_approx(params.principal, 250_000.0);
        assert_approx(params.annual_rate_percent, 7.25);
        assert_eq!(params.term_years, 20);
        assert_approx(params.monthly_insurance, 45.0);
    }

    #[test]
    fn api_request_accepts_aliases_and_fills_defaults() {
        let params = parameters_from_json(r#"{"amount": 5000, "rate": 3}"#).expect("valid payload");
        assert_approx(params.principal, 5_000.0);
        assert_approx(params.annual_rate_percent, 3.0);
        assert_eq!(params.term_years, 5);
        assert_approx(params.monthly_insurance, 30.0);
    }

    #[test]
    fn api_request_rejects_out_of_range_values() {
        let err = parameters_from_json(r#"{"termYears": 45}"#).expect_err("term too long");
        assert!(matches!(err, LoanError::InvalidInput(_)));
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn calculate_stores_session_for_schedule_view() {
        let store = SessionStore::new();
        let err = schedule_view(&store).expect_err("nothing calculated yet");
        assert_eq!(status_for(&err), StatusCode::CONFLICT);

        let payload = CalculatePayload {
            principal: Some(100_000.0),
            annual_rate: Some(12.0),
            term_years: Some(10),
            monthly_insurance: Some(30.0),
        };
        let response = calculate(&store, payload).expect("valid calculation");
        assert_eq!(response.yearly.len(), 10);
        assert_eq!(response.summary.number_of_payments, 120);

        let view = schedule_view(&store).expect("session available");
        assert_eq!(view.years_per_window, 4);
        let labels: Vec<&str> = view.windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["Years 1-4", "Years 5-8", "Years 9-10"]);
    }

    #[test]
    fn rejected_calculation_keeps_previous_session() {
        let store = SessionStore::new();
        calculate(&store, CalculatePayload::default()).expect("defaults are valid");
        let bad = CalculatePayload {
            principal: Some(1.0),
            ..CalculatePayload::default()
        };
        assert!(calculate(&store, bad).is_err());

        let session = store.current().expect("previous session kept");
        assert_approx(session.parameters.principal, 100_000.0);
    }

    #[test]
    fn exports_require_a_session() {
        let store = SessionStore::new();
        for format in [ExportFormat::Csv, ExportFormat::Pdf] {
            let err = export(&store, format).err().expect("no session yet");
            assert_eq!(status_for(&err), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn exports_use_stored_session() {
        let store = SessionStore::new();
        calculate(&store, CalculatePayload::default()).expect("defaults are valid");

        let csv = export(&store, ExportFormat::Csv).expect("csv export");
        assert_eq!(csv.content_type, "text/csv; charset=utf-8");
        assert!(csv.file_name.starts_with("amortization_schedule_"));
        assert!(csv.file_name.ends_with(".csv"));
        assert_eq!(String::from_utf8_lossy(&csv.bytes).lines().count(), 61);

        let pdf = export(&store, ExportFormat::Pdf).expect("pdf export");
        assert_eq!(pdf.content_type, "application/pdf");
        assert!(pdf.file_name.ends_with(".pdf"));
        assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn calculate_response_serialization_contains_expected_fields() {
        let session = Session::compute(build_inputs(&sample_cli()).expect("valid inputs"));
        let json = serde_json::to_string(&build_calculate_response(&session))
            .expect("response should serialize");
        assert!(json.contains("\"parameters\""));
        assert!(json.contains("\"annualRatePercent\":12.0"));
        assert!(json.contains("\"monthlyPayment\""));
        assert!(json.contains("\"totalInterest\""));
        assert!(json.contains("\"yearly\""));
        assert!(json.contains("\"computedAt\""));
    }

    #[test]
    fn export_errors_map_to_server_error() {
        let err = LoanError::export("PDF", "boom");
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to generate PDF: boom");
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        (status, headers, body.to_vec())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request")
    }

    fn assert_json_error(
        status: StatusCode,
        headers: &HeaderMap,
        body: &[u8],
        expected: StatusCode,
    ) {
        assert_eq!(status, expected);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        let value: serde_json::Value = serde_json::from_slice(body).expect("error body is JSON");
        assert!(
            value["error"].as_str().is_some_and(|msg| !msg.is_empty()),
            "missing error message in {value}"
        );
    }

    #[tokio::test]
    async fn router_calculates_from_query_string() {
        let app = router(Arc::new(SessionStore::new()));
        let (status, headers, body) = send(
            &app,
            get_request("/api/calculate?principal=250000&annualRate=7.25&termYears=20"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("JSON body");
        assert_eq!(value["parameters"]["termYears"], 20);
        assert_eq!(value["summary"]["numberOfPayments"], 240);
        assert_eq!(value["yearly"].as_array().map(Vec::len), Some(20));
    }

    #[tokio::test]
    async fn router_rejects_malformed_calculation_requests_as_json() {
        let app = router(Arc::new(SessionStore::new()));

        let (status, headers, body) = send(&app, get_request("/api/calculate?principal=abc")).await;
        assert_json_error(status, &headers, &body, StatusCode::BAD_REQUEST);

        let negative_term = post_json("/api/calculate", r#"{"termYears": -1}"#);
        let (status, headers, body) = send(&app, negative_term).await;
        assert_json_error(status, &headers, &body, StatusCode::BAD_REQUEST);

        let (status, headers, body) = send(&app, post_json("/api/calculate", "{not json")).await;
        assert_json_error(status, &headers, &body, StatusCode::BAD_REQUEST);

        let untyped = Request::builder()
            .method("POST")
            .uri("/api/calculate")
            .body(Body::from(r#"{"principal": 5000}"#))
            .expect("valid request");
        let (status, headers, body) = send(&app, untyped).await;
        assert_json_error(status, &headers, &body, StatusCode::BAD_REQUEST);

        let long_term = post_json("/api/calculate", r#"{"termYears": 45}"#);
        let (status, headers, body) = send(&app, long_term).await;
        assert_json_error(status, &headers, &body, StatusCode::BAD_REQUEST);

        let (status, headers, body) = send(&app, get_request("/api/schedule")).await;
        assert_json_error(status, &headers, &body, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn router_serves_schedule_and_exports_after_calculation() {
        let app = router(Arc::new(SessionStore::new()));

        let (status, headers, body) = send(&app, get_request("/api/export/csv")).await;
        assert_json_error(status, &headers, &body, StatusCode::CONFLICT);

        let payload = r#"{"principal": 12000, "annualRate": 0, "termYears": 1, "monthlyInsurance": 25}"#;
        let (status, _, _) = send(&app, post_json("/api/calculate", payload)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, headers, body) = send(&app, get_request("/api/schedule")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("JSON body");
        assert_eq!(value["windows"][0]["label"], "Years 1-1");

        let (status, headers, body) = send(&app, get_request("/api/export/csv")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        let disposition = headers[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header");
        assert!(disposition.starts_with("attachment; filename=\"amortization_schedule_"));
        assert!(disposition.ends_with(".csv\""));
        assert_eq!(String::from_utf8_lossy(&body).lines().count(), 13);

        let (status, headers, body) = send(&app, get_request("/api/export/pdf")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(body.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn router_serves_assets_and_json_not_found() {
        let app = router(Arc::new(SessionStore::new()));

        let (status, headers, body) = send(&app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(body, INDEX_HTML.as_bytes());

        let (status, headers, _) = send(&app, get_request("/app.js")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );

        let (status, headers, body) = send(&app, get_request("/no/such/page")).await;
        assert_json_error(status, &headers, &body, StatusCode::NOT_FOUND);
    }
}
