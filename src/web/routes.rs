use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::html;
use crate::context::{AppContext, CredentialsUpdate, UpdateState};
use crate::core::details::event_details;
use crate::core::staff::StaffQuery;
use crate::db::log::UpdateSource;
use crate::errors::{AppError, AppResult};
use crate::export::workbook_bytes;
use crate::models::category::color_map;
use crate::models::{Conflict, Event, TimelineEntry};
use crate::scheduler::spawn_scheduler;
use crate::utils::date::{display, parse_date};

type Ctx = web::Data<AppContext>;
type HandlerResult = AppResult<HttpResponse>;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const DEFAULT_LOG_LIMIT: usize = 20;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/config", web::get().to(config_form))
        .route("/config", web::post().to(save_config))
        .route("/update", web::get().to(manual_update))
        .route("/update", web::post().to(manual_update))
        .route("/api/data", web::get().to(api_data))
        .route("/api/status", web::get().to(api_status))
        .route("/api/timeline-data", web::get().to(api_timeline))
        .route("/api/event-details/{id}", web::get().to(api_event_details))
        .route("/api/available-staff", web::get().to(api_available_staff))
        .route("/api/alerts", web::get().to(api_alerts))
        .route("/api/update-log", web::get().to(api_update_log))
        .route("/export.xlsx", web::get().to(export_workbook));
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

async fn index(ctx: Ctx) -> HttpResponse {
    if !ctx.is_configured() {
        return html_response(html::not_configured_page());
    }

    if ctx.snapshot().is_none()
        && let Err(e) = ctx.refresh(UpdateSource::Web, false).await
    {
        warn!(error = %e, "initial dashboard load failed");
    }

    let snapshot = ctx.snapshot();
    html_response(html::dashboard_page(
        snapshot.as_deref(),
        &ctx.status(),
        ctx.scheduler_running(),
    ))
}

async fn config_form(ctx: Ctx) -> HttpResponse {
    html_response(html::config_page(&ctx.config(), ctx.is_configured()))
}

#[derive(Debug, Deserialize)]
pub struct ConfigForm {
    #[serde(default)]
    airtable_token: String,
    #[serde(default)]
    airtable_base_id: String,
    #[serde(default)]
    auto_update_interval: Option<String>,
}

impl ConfigForm {
    fn into_update(self) -> AppResult<CredentialsUpdate> {
        let auto_update_interval = match self.auto_update_interval.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("auto_update_interval: '{raw}' is not a number of minutes"))
            })?),
        };
        Ok(CredentialsUpdate {
            token: self.airtable_token,
            base_id: self.airtable_base_id,
            auto_update_interval,
        })
    }
}

/// Any failure here is reported as a 400 so the form can show it.
async fn save_config(ctx: Ctx, form: web::Form<ConfigForm>) -> HttpResponse {
    let result = match form.into_inner().into_update() {
        Ok(update) => ctx.apply_credentials(update).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!(error = %e, "configuration rejected");
        return HttpResponse::BadRequest().json(json!({ "error": e.to_string() }));
    }

    if !spawn_scheduler(ctx.clone().into_inner())
        && let Err(e) = ctx.refresh(UpdateSource::Web, true).await
    {
        warn!(error = %e, "refresh after configuration failed");
    }

    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Configuration saved, automatic updates enabled",
    }))
}

async fn manual_update(ctx: Ctx) -> HandlerResult {
    ctx.ensure_configured()?;
    let snapshot = ctx.refresh(UpdateSource::Web, true).await?;
    info!(events = snapshot.stats.total_events, "manual update done");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": ctx.status().message,
        "last_updated": snapshot.last_updated(),
        "events": snapshot.stats.total_events,
        "unassigned": snapshot.stats.unassigned_events,
        "conflicts": snapshot.stats.conflicts,
        "alerts": snapshot.stats.alerts,
    })))
}

async fn api_data(ctx: Ctx) -> HandlerResult {
    let snapshot = ctx.require_snapshot()?;
    Ok(HttpResponse::Ok().json(&*snapshot))
}

#[derive(Serialize)]
struct StatusResponse {
    #[serde(flatten)]
    status: UpdateState,
    configured: bool,
    scheduler_running: bool,
    auto_update_interval: u64,
    last_updated: Option<String>,
}

async fn api_status(ctx: Ctx) -> HttpResponse {
    let snapshot = ctx.snapshot();
    HttpResponse::Ok().json(StatusResponse {
        status: ctx.status(),
        configured: ctx.is_configured(),
        scheduler_running: ctx.scheduler_running(),
        auto_update_interval: ctx.config().server.auto_update_interval,
        last_updated: snapshot.map(|s| s.last_updated()),
    })
}

#[derive(Serialize)]
struct TimelineData<'a> {
    events: &'a [Event],
    conflicts: &'a [Conflict],
    timelines: &'a BTreeMap<String, Vec<TimelineEntry>>,
    color_map: BTreeMap<&'static str, &'static str>,
    last_updated: String,
}

async fn api_timeline(ctx: Ctx) -> HandlerResult {
    let snapshot = ctx.require_snapshot()?;
    Ok(HttpResponse::Ok().json(TimelineData {
        events: &snapshot.events,
        conflicts: &snapshot.conflicts,
        timelines: &snapshot.timelines,
        color_map: color_map(),
        last_updated: snapshot.last_updated(),
    }))
}

async fn api_event_details(ctx: Ctx, id: web::Path<String>) -> HandlerResult {
    let snapshot = ctx.require_snapshot()?;
    let details = event_details(&snapshot, &id)?;
    Ok(HttpResponse::Ok().json(details))
}

#[derive(Debug, Deserialize)]
pub struct StaffParams {
    start_date: Option<String>,
    end_date: Option<String>,
    role: Option<String>,
}

fn required_date(name: &str, value: Option<&str>) -> AppResult<chrono::NaiveDate> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidDate(format!("{name} is required (YYYY-MM-DD)")))?;
    parse_date(raw).ok_or_else(|| AppError::InvalidDate(format!("{name}: '{raw}' (expected YYYY-MM-DD)")))
}

async fn api_available_staff(ctx: Ctx, params: web::Query<StaffParams>) -> HandlerResult {
    let start = required_date("start_date", params.start_date.as_deref())?;
    let end = required_date("end_date", params.end_date.as_deref())?;
    let query = StaffQuery::new(start, end, params.role.clone())?;

    let staff = ctx.available_staff(&query).await?;
    Ok(HttpResponse::Ok().json(json!({
        "start_date": display(start),
        "end_date": display(end),
        "role": query.role,
        "count": staff.len(),
        "staff": staff,
    })))
}

async fn api_alerts(ctx: Ctx) -> HandlerResult {
    let snapshot = ctx.require_snapshot()?;
    Ok(HttpResponse::Ok().json(json!({
        "count": snapshot.alerts.len(),
        "alerts": snapshot.alerts,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LogParams {
    limit: Option<usize>,
}

async fn api_update_log(ctx: Ctx, params: web::Query<LogParams>) -> HandlerResult {
    let limit = params.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    let entries = ctx.recent_updates(limit)?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn export_workbook(ctx: Ctx) -> HandlerResult {
    let snapshot = ctx.require_snapshot()?;
    let bytes = workbook_bytes(&snapshot)?;
    let filename = format!("calendar_{}.xlsx", snapshot.today.format("%Y%m%d"));

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes))
}
