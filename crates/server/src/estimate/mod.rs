//! Estimation orchestrator.
//!
//! Per request: `Parsing → Analyzing → RemoteAttempt → {RemoteAccepted |
//! LocalFallback} → Complete`. Parsing (done by the route before calling in
//! here) is the only transition that can fail; once a geometric summary
//! exists, this module always produces a complete [`PrintEstimate`]. The
//! remote pricing service is preferred when configured, but any transport
//! error, timeout, non-success status, or unusable body falls back to the
//! local cost model — logged, never surfaced to the caller.

use serde_json::Value;
use shared::{CostBreakdown, Complexity, PrintEstimate, PrintParameters, QuoteRequest};

use crate::{AppState, PricingConfig};
use estimator::{GeometryStatus, MeshAnalysis};

pub mod session;

/// File metadata accompanying an upload.
#[derive(Debug, Clone)]
pub struct UploadMeta {
    pub file_name: String,
    pub file_size: u64,
}

/// Assemble the final estimate for an analyzed mesh. Never fails.
pub async fn quote(
    state: &AppState,
    meta: UploadMeta,
    params: PrintParameters,
    analysis: MeshAnalysis,
) -> PrintEstimate {
    if let GeometryStatus::Recovered {
        volume,
        surface_area,
    } = analysis.status
    {
        tracing::debug!(
            file = %meta.file_name,
            volume,
            surface_area,
            "geometry recovered by heuristic fallback"
        );
    }
    let summary = analysis.summary;

    // Computed unconditionally: it supplies the per-field defaults for a
    // partially usable remote response.
    let local = estimator::estimate_cost(&summary, &params);

    let costs = match &state.pricing {
        None => local,
        Some(cfg) => {
            let request = QuoteRequest {
                file_name: meta.file_name.clone(),
                file_size: meta.file_size,
                material: params.material,
                quality: params.quality,
                infill: params.infill_percent,
                volume: summary.volume_cm3,
                stl_metadata: summary.clone(),
            };
            match remote_quote(&state.client, cfg, &request).await {
                Ok(body) => {
                    tracing::info!(file = %meta.file_name, "adopting remote pricing response");
                    merge_remote(&body, &local)
                }
                Err(err) => {
                    tracing::warn!(
                        file = %meta.file_name,
                        error = %err,
                        "pricing service unavailable, using local estimate"
                    );
                    local
                }
            }
        }
    };

    PrintEstimate {
        id: Some(uuid::Uuid::new_v4().to_string()),
        file_name: meta.file_name,
        file_size: meta.file_size,
        parameters: params,
        geometry: summary,
        costs,
    }
}

/// One bounded attempt against the pricing service. Transport failures,
/// non-2xx statuses, and undecodable bodies all come back as errors.
async fn remote_quote(
    client: &reqwest::Client,
    cfg: &PricingConfig,
    request: &QuoteRequest,
) -> Result<Value, reqwest::Error> {
    client
        .post(&cfg.url)
        .timeout(cfg.timeout)
        .json(request)
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await
}

/// Adopt remote fields one by one, substituting the locally computed value
/// wherever a field is missing, non-numeric, negative, or fails to parse.
fn merge_remote(body: &Value, local: &CostBreakdown) -> CostBreakdown {
    let amount = |key: &str, fallback: f64| {
        body.get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(fallback)
    };
    CostBreakdown {
        material_cost: amount("materialCost", local.material_cost),
        print_time_cost: amount("printTimeCost", local.print_time_cost),
        setup_fee: amount("setupFee", local.setup_fee),
        total_cost: amount("totalCost", local.total_cost),
        print_time_minutes: body
            .get("printTimeMinutes")
            .and_then(Value::as_u64)
            .and_then(|m| u32::try_from(m).ok())
            .unwrap_or(local.print_time_minutes),
        weight_grams: amount("weightGrams", local.weight_grams),
        complexity: body
            .get("complexity")
            .and_then(Value::as_str)
            .and_then(Complexity::parse)
            .unwrap_or(local.complexity),
    }
}
