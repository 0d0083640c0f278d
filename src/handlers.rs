use crate::errors::{AppError, StoreError};
use crate::models::{LogRecord, SaveResponse, StatsResponse};
use crate::session::SaveOutcome;
use crate::state::AppState;
use crate::ui::{render_index, PageStatus};
use axum::{
    extract::{Multipart, Query, State},
    response::{Html, Redirect},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub saved: Option<String>,
    /// Kept as text so a mangled link still renders the page.
    pub count: Option<String>,
    pub warning: Option<String>,
}

/// Fields of the save form. Browsers send an empty part for an unused
/// file input, so empty bytes count as no image.
#[derive(Debug, Default)]
struct SaveForm {
    label: Option<String>,
    camera: Option<Vec<u8>>,
    upload: Option<Vec<u8>>,
}

impl SaveForm {
    fn image(&self) -> Option<&[u8]> {
        non_empty(&self.upload).or_else(|| non_empty(&self.camera))
    }
}

fn non_empty(bytes: &Option<Vec<u8>>) -> Option<&[u8]> {
    bytes.as_deref().filter(|b| !b.is_empty())
}

impl IndexQuery {
    fn status(self) -> PageStatus {
        let count = self.count.as_deref().and_then(|c| c.trim().parse::<u64>().ok());
        match (self.saved, count, self.warning) {
            (Some(label), Some(count), _) => PageStatus::Saved { label, count },
            (_, _, Some(message)) => PageStatus::Warning(message),
            _ => PageStatus::Idle,
        }
    }
}

pub async fn index(State(state): State<AppState>, query: Option<Query<IndexQuery>>) -> Html<String> {
    let status = query.map_or(PageStatus::Idle, |Query(query)| query.status());
    let session = state.session.lock().await;
    Html(render_index(&status, session.csv_file()))
}

pub async fn get_log(State(state): State<AppState>) -> Json<Vec<LogRecord>> {
    let session = state.session.lock().await;
    Json(session.records().to_vec())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let session = state.session.lock().await;
    Json(session.stats())
}

pub async fn save(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SaveResponse>, AppError> {
    let form = read_form(multipart).await?;
    let outcome = run_save(&state, form).await?;
    Ok(Json(to_response(outcome)))
}

pub async fn save_form(State(state): State<AppState>, multipart: Multipart) -> Redirect {
    let result = match read_form(multipart).await {
        Ok(form) => run_save(&state, form).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(outcome) => Redirect::to(&format!(
            "/?saved={}&count={}",
            urlencoding::encode(&outcome.record.label),
            outcome.count
        )),
        Err(err) => Redirect::to(&format!("/?warning={}", urlencoding::encode(&err.message))),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<SaveForm, AppError> {
    let mut form = SaveForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "label" => form.label = Some(field.text().await?),
            "camera" => form.camera = Some(field.bytes().await?.to_vec()),
            "upload" => form.upload = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }
    Ok(form)
}

async fn run_save(state: &AppState, form: SaveForm) -> Result<SaveOutcome, AppError> {
    let session = Arc::clone(&state.session);
    let result = tokio::task::spawn_blocking(move || {
        let mut session = session.blocking_lock();
        session.save(form.label.as_deref(), form.image())
    })
    .await?;

    result.map_err(|err| {
        match &err {
            StoreError::Validation(reason) => warn!("save skipped: {reason}"),
            other => error!("save failed: {other}"),
        }
        AppError::from(err)
    })
}

fn to_response(outcome: SaveOutcome) -> SaveResponse {
    let SaveOutcome {
        record,
        count,
        csv_persisted,
    } = outcome;
    SaveResponse {
        date: record.date.to_string(),
        weekday: record.weekday,
        label: record.label,
        filename: record.filename,
        count,
        csv_persisted,
    }
}
