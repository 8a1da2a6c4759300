use serde::{Deserialize, Serialize};

/// Print material. Unknown values default to PLA on deserialization so a
/// request with an unrecognized material still yields an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Material {
    #[default]
    Pla,
    Abs,
    Petg,
    Tpu,
}

impl From<String> for Material {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "abs" => Material::Abs,
            "petg" => Material::Petg,
            "tpu" => Material::Tpu,
            _ => Material::Pla,
        }
    }
}

/// Layer quality preset. Unknown values default to Standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Quality {
    Draft,
    #[default]
    Standard,
    Fine,
}

impl From<String> for Quality {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Quality::Draft,
            "fine" => Quality::Fine,
            _ => Quality::Standard,
        }
    }
}

fn default_infill() -> i32 {
    20
}

/// User-selected print settings for one estimation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintParameters {
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub quality: Quality,
    /// Interior fill density in percent. Out-of-range values are clamped to
    /// 0..=100 at the point of use, never rejected.
    #[serde(default = "default_infill")]
    pub infill_percent: i32,
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            material: Material::Pla,
            quality: Quality::Standard,
            infill_percent: default_infill(),
        }
    }
}

/// Bounding-box extents in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Summary geometry derived from an uploaded mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometricSummary {
    pub triangle_count: usize,
    pub volume_cm3: f64,
    pub surface_area_cm2: f64,
    pub dimensions_mm: Dimensions,
}

/// Coarse triangle-count bucket, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Lenient parse for values coming back from the pricing service.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Some(Complexity::Simple),
            "medium" => Some(Complexity::Medium),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

/// Itemized cost estimate. Currency amounts are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub print_time_cost: f64,
    pub setup_fee: f64,
    pub total_cost: f64,
    pub print_time_minutes: u32,
    pub weight_grams: f64,
    pub complexity: Complexity,
}

/// The complete record returned for one estimation request. Immutable; a new
/// request produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub file_name: String,
    pub file_size: u64,
    pub parameters: PrintParameters,
    pub geometry: GeometricSummary,
    pub costs: CostBreakdown,
}

/// Request body sent to the remote pricing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub file_name: String,
    pub file_size: u64,
    pub material: Material,
    pub quality: Quality,
    pub infill: i32,
    /// Volume in cm³, duplicated out of the metadata for the service's benefit.
    pub volume: f64,
    pub stl_metadata: GeometricSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(val: &T) {
        let json = serde_json::to_string(val).expect("serialize");
        let back: T = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(*val, back);
    }

    fn sample_summary() -> GeometricSummary {
        GeometricSummary {
            triangle_count: 12,
            volume_cm3: 1.0,
            surface_area_cm2: 6.0,
            dimensions_mm: Dimensions {
                width: 10.0,
                height: 10.0,
                depth: 10.0,
            },
        }
    }

    fn sample_breakdown() -> CostBreakdown {
        CostBreakdown {
            material_cost: 0.06,
            print_time_cost: 0.18,
            setup_fee: 4.5,
            total_cost: 4.74,
            print_time_minutes: 2,
            weight_grams: 1.24,
            complexity: Complexity::Simple,
        }
    }

    // --- Material / Quality ---

    #[test]
    fn test_material_serde() {
        for m in [Material::Pla, Material::Abs, Material::Petg, Material::Tpu] {
            roundtrip(&m);
        }
        assert_eq!(serde_json::to_string(&Material::Petg).unwrap(), r#""petg""#);
    }

    #[test]
    fn test_unknown_material_defaults_to_pla() {
        let m: Material = serde_json::from_str(r#""carbon-fiber""#).unwrap();
        assert_eq!(m, Material::Pla);
    }

    #[test]
    fn test_material_case_insensitive() {
        let m: Material = serde_json::from_str(r#""ABS""#).unwrap();
        assert_eq!(m, Material::Abs);
    }

    #[test]
    fn test_unknown_quality_defaults_to_standard() {
        let q: Quality = serde_json::from_str(r#""ultra""#).unwrap();
        assert_eq!(q, Quality::Standard);
        roundtrip(&Quality::Fine);
    }

    // --- PrintParameters ---

    #[test]
    fn test_print_parameters_defaults() {
        let p: PrintParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(p, PrintParameters::default());
        assert_eq!(p.infill_percent, 20);
    }

    #[test]
    fn test_print_parameters_camel_case() {
        let p = PrintParameters {
            material: Material::Tpu,
            quality: Quality::Draft,
            infill_percent: 35,
        };
        roundtrip(&p);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains(r#""infillPercent":35"#));
    }

    #[test]
    fn test_print_parameters_out_of_range_infill_accepted() {
        // Clamping happens at use; deserialization never rejects.
        let p: PrintParameters = serde_json::from_str(r#"{"infillPercent":-30}"#).unwrap();
        assert_eq!(p.infill_percent, -30);
    }

    // --- GeometricSummary ---

    #[test]
    fn test_geometric_summary_serde() {
        let s = sample_summary();
        roundtrip(&s);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""triangleCount":12"#));
        assert!(json.contains(r#""volumeCm3":1.0"#));
        assert!(json.contains(r#""surfaceAreaCm2":6.0"#));
        assert!(json.contains(r#""dimensionsMm""#));
    }

    // --- Complexity ---

    #[test]
    fn test_complexity_serde() {
        for c in [Complexity::Simple, Complexity::Medium, Complexity::Complex] {
            roundtrip(&c);
        }
        assert_eq!(
            serde_json::to_string(&Complexity::Medium).unwrap(),
            r#""medium""#
        );
    }

    #[test]
    fn test_complexity_parse() {
        assert_eq!(Complexity::parse("complex"), Some(Complexity::Complex));
        assert_eq!(Complexity::parse("SIMPLE"), Some(Complexity::Simple));
        assert_eq!(Complexity::parse("weird"), None);
    }

    // --- CostBreakdown / PrintEstimate ---

    #[test]
    fn test_cost_breakdown_serde() {
        let b = sample_breakdown();
        roundtrip(&b);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains(r#""printTimeMinutes":2"#));
        assert!(json.contains(r#""weightGrams":1.24"#));
    }

    #[test]
    fn test_print_estimate_serde() {
        let e = PrintEstimate {
            id: Some("abc".to_string()),
            file_name: "part.stl".to_string(),
            file_size: 684,
            parameters: PrintParameters::default(),
            geometry: sample_summary(),
            costs: sample_breakdown(),
        };
        roundtrip(&e);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""fileName":"part.stl""#));
        assert!(json.contains(r#""fileSize":684"#));
    }

    #[test]
    fn test_print_estimate_id_omitted_when_none() {
        let e = PrintEstimate {
            id: None,
            file_name: "part.stl".to_string(),
            file_size: 684,
            parameters: PrintParameters::default(),
            geometry: sample_summary(),
            costs: sample_breakdown(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(!json.contains(r#""id""#));
    }

    // --- QuoteRequest ---

    #[test]
    fn test_quote_request_wire_shape() {
        let q = QuoteRequest {
            file_name: "part.stl".to_string(),
            file_size: 684,
            material: Material::Petg,
            quality: Quality::Fine,
            infill: 40,
            volume: 1.0,
            stl_metadata: sample_summary(),
        };
        roundtrip(&q);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""stlMetadata""#));
        assert!(json.contains(r#""infill":40"#));
        assert!(json.contains(r#""volume":1.0"#));
    }
}
