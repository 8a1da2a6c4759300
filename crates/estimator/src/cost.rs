//! Local print-cost calculation.
//!
//! Pure and deterministic: geometry plus parameters in, cost breakdown out.
//! All constants are fixed pricing policy, not runtime configuration. The
//! function is total: out-of-range infill is clamped and unknown materials
//! were already defaulted to PLA during deserialization.

use shared::{Complexity, CostBreakdown, GeometricSummary, Material, PrintParameters, Quality};

/// Filament density in g/cm³.
fn density(material: Material) -> f64 {
    match material {
        Material::Abs => 1.04,
        Material::Petg => 1.27,
        Material::Tpu => 1.21,
        Material::Pla => 1.24,
    }
}

fn quality_factor(quality: Quality) -> f64 {
    match quality {
        Quality::Draft => 0.6,
        Quality::Standard => 1.0,
        Quality::Fine => 1.5,
    }
}

/// Material price, €/gram.
const COST_PER_GRAM: f64 = 0.045;
/// Machine-time price, €/hour.
const COST_PER_HOUR: f64 = 5.40;
/// Flat handling fee per job, €.
const SETUP_FEE: f64 = 4.50;

const SIMPLE_MAX_TRIANGLES: usize = 5_000;
const MEDIUM_MAX_TRIANGLES: usize = 50_000;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn classify(triangle_count: usize) -> Complexity {
    if triangle_count < SIMPLE_MAX_TRIANGLES {
        Complexity::Simple
    } else if triangle_count > MEDIUM_MAX_TRIANGLES {
        Complexity::Complex
    } else {
        Complexity::Medium
    }
}

/// Map a geometric summary and print parameters to an itemized cost breakdown.
pub fn estimate_cost(summary: &GeometricSummary, params: &PrintParameters) -> CostBreakdown {
    let weight_grams = summary.volume_cm3 * density(params.material);

    let infill = params.infill_percent.clamp(0, 100) as f64;
    // The shell contributes a minimum 20% of print time even at 0% infill.
    let infill_factor = infill / 100.0 * 0.8 + 0.2;
    let print_time_minutes =
        (summary.volume_cm3 * 2.0 * quality_factor(params.quality) * infill_factor).round() as u32;

    let material_cost = round2(weight_grams * COST_PER_GRAM);
    let print_time_cost = round2(print_time_minutes as f64 / 60.0 * COST_PER_HOUR);
    let total_cost = round2(material_cost + print_time_cost + SETUP_FEE);

    CostBreakdown {
        material_cost,
        print_time_cost,
        setup_fee: SETUP_FEE,
        total_cost,
        print_time_minutes,
        weight_grams,
        complexity: classify(summary.triangle_count),
    }
}
