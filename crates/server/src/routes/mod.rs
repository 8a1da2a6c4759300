use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::estimate::{self, UploadMeta};
use crate::AppState;
use estimator::MeshAnalysis;
use shared::{GeometricSummary, Material, PrintEstimate, PrintParameters, Quality};

type ErrorResponse = (StatusCode, Json<Value>);

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Mesh upload → geometric summary only, no pricing.
pub async fn inspect(mut multipart: Multipart) -> Result<Json<GeometricSummary>, ErrorResponse> {
    let upload = read_upload(&mut multipart).await?;
    let analysis = analyze_blocking(upload.bytes).await?;
    Ok(Json(analysis.summary))
}

/// Mesh upload + print parameters → complete print estimate.
pub async fn estimate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PrintEstimate>, ErrorResponse> {
    let upload = read_upload(&mut multipart).await?;

    // A new upload under the same session id supersedes the previous one.
    let generation = upload
        .session
        .clone()
        .map(|s| (s.clone(), state.sessions.begin(&s)));

    let meta = UploadMeta {
        file_name: upload.file_name.clone(),
        file_size: upload.bytes.len() as u64,
    };
    let analysis = analyze_blocking(upload.bytes).await?;
    let estimate = estimate::quote(&state, meta, upload.params, analysis).await;

    if let Some((session, generation)) = generation {
        if !state.sessions.is_current(&session, generation) {
            tracing::info!(session = %session, "dropping superseded estimate");
            return Err((
                StatusCode::CONFLICT,
                Json(json!({ "error": "superseded by a newer request" })),
            ));
        }
    }

    Ok(Json(estimate))
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    params: PrintParameters,
    session: Option<String>,
}

/// Pull the file and the optional parameter parts out of a multipart body.
/// Parameter parsing is lenient: unknown or absent values fall back to
/// defaults, only a missing file part is an error.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ErrorResponse> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut params = PrintParameters::default();
    let mut session = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("malformed multipart body: {}", e) })),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("model.stl").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": format!("upload interrupted: {}", e) })),
                    )
                })?;
                file = Some((file_name, bytes.to_vec()));
            }
            "material" => {
                params.material = Material::from(field.text().await.unwrap_or_default());
            }
            "quality" => {
                params.quality = Quality::from(field.text().await.unwrap_or_default());
            }
            "infill" => {
                let text = field.text().await.unwrap_or_default();
                params.infill_percent = text.trim().parse().unwrap_or(params.infill_percent);
            }
            "session" => {
                session = Some(field.text().await.unwrap_or_default());
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or((
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "missing file part" })),
    ))?;
    Ok(Upload {
        file_name,
        bytes,
        params,
        session,
    })
}

/// Run parse + analyze off the async runtime; the mesh buffer lives and dies
/// inside the blocking task.
async fn analyze_blocking(bytes: Vec<u8>) -> Result<MeshAnalysis, ErrorResponse> {
    tokio::task::spawn_blocking(move || estimator::analyze_payload(&bytes))
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "analysis task failed" })),
            )
        })?
        .map_err(|e| {
            tracing::error!("Parse error: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "could not read model", "detail": e.to_string() })),
            )
        })
}
