//! Geometric analysis: bounding box, volume, surface area, triangle count.
//!
//! Volume uses the divergence-theorem tetrahedron decomposition relative to
//! the origin; the absolute value of the accumulated signed volume makes the
//! result independent of winding consistency. Degenerate results (NaN or
//! non-positive) are replaced by documented heuristics, so analysis never
//! fails on a valid buffer.

use shared::{Dimensions, GeometricSummary};

use crate::error::ParseError;
use crate::mesh::{BoundingBox, MeshBuffer};
use crate::stl::parse_mesh;

/// Fraction of the bounding box a degenerate solid is assumed to fill.
/// A plausible-estimate heuristic, not physics.
const BBOX_FILL_RATIO: f64 = 0.3;

/// Sphere/cube-equivalent factor for the surface-area fallback,
/// `area ≈ 6 · volume^(2/3)`.
const AREA_EQUIV_FACTOR: f64 = 6.0;

/// How each quantity of the summary was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryStatus {
    /// Both volume and surface area were measured from the triangles.
    Measured,
    /// One or both quantities were replaced by the heuristic fallback.
    Recovered { volume: bool, surface_area: bool },
}

/// Analysis result: the summary plus the recovery tag for observability.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAnalysis {
    pub summary: GeometricSummary,
    pub status: GeometryStatus,
}

/// Parse an uploaded payload and analyze it in one step, dropping the
/// intermediate buffer. The only operation the service layer needs.
pub fn analyze_payload(bytes: &[u8]) -> Result<MeshAnalysis, ParseError> {
    let mesh = parse_mesh(bytes)?;
    Ok(analyze(&mesh))
}

/// Compute the geometric summary of a mesh. Total: every numeric edge case
/// is absorbed by the fallbacks.
pub fn analyze(mesh: &MeshBuffer) -> MeshAnalysis {
    let bbox = BoundingBox::of(mesh.vertices());
    let triangle_count = mesh.triangle_count();

    let mut surface_area_mm2 = 0.0;
    let mut signed_volume_mm3 = 0.0;
    for [v0, v1, v2] in mesh.triangles() {
        let e1 = sub(v1, v0);
        let e2 = sub(v2, v0);
        let n = cross(e1, e2);
        surface_area_mm2 += 0.5 * norm(n);
        signed_volume_mm3 += dot(v0, n) / 6.0;
    }
    let mut volume_mm3 = signed_volume_mm3.abs();

    let volume_recovered = volume_mm3.is_nan() || volume_mm3 <= 0.0;
    if volume_recovered {
        volume_mm3 = BBOX_FILL_RATIO * bbox.volume_mm3();
        tracing::debug!(
            triangle_count,
            volume_mm3,
            "degenerate volume, substituting bounding-box heuristic"
        );
    }

    let area_recovered = surface_area_mm2.is_nan() || surface_area_mm2 <= 0.0;
    if area_recovered {
        surface_area_mm2 = AREA_EQUIV_FACTOR * volume_mm3.powf(2.0 / 3.0);
        tracing::debug!(
            triangle_count,
            surface_area_mm2,
            "degenerate surface area, substituting volume-equivalent heuristic"
        );
    }

    let status = if volume_recovered || area_recovered {
        GeometryStatus::Recovered {
            volume: volume_recovered,
            surface_area: area_recovered,
        }
    } else {
        GeometryStatus::Measured
    };

    MeshAnalysis {
        summary: GeometricSummary {
            triangle_count,
            volume_cm3: volume_mm3 / 1000.0,
            surface_area_cm2: surface_area_mm2 / 100.0,
            dimensions_mm: Dimensions {
                width: bbox.width(),
                height: bbox.height(),
                depth: bbox.depth(),
            },
        },
        status,
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cube_indexed, cube_mesh, cube_soup, reverse_winding};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_unit_cube_volume_and_area() {
        // 10 mm cube: 1 cm³, 6 cm², within 5% (here: exact up to rounding).
        let analysis = analyze(&cube_mesh(10.0));
        assert_eq!(analysis.status, GeometryStatus::Measured);
        assert_eq!(analysis.summary.triangle_count, 12);
        assert_relative_eq!(analysis.summary.volume_cm3, 1.0, max_relative = 0.05);
        assert_relative_eq!(analysis.summary.surface_area_cm2, 6.0, max_relative = 0.05);
    }

    #[test]
    fn test_cube_dimensions_mm() {
        let analysis = analyze(&cube_mesh(10.0));
        let d = analysis.summary.dimensions_mm;
        assert_eq!((d.width, d.height, d.depth), (10.0, 10.0, 10.0));
    }

    #[test]
    fn test_indexed_cube_matches_soup() {
        let soup = analyze(&cube_mesh(10.0));
        let indexed = analyze(&cube_indexed(10.0));
        assert_eq!(indexed.summary.triangle_count, 12);
        assert_relative_eq!(
            indexed.summary.volume_cm3,
            soup.summary.volume_cm3,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            indexed.summary.surface_area_cm2,
            soup.summary.surface_area_cm2,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_volume_invariant_under_winding_reversal() {
        let forward = cube_soup(10.0);
        let reversed = reverse_winding(&forward);
        let a = analyze(&MeshBuffer::soup(forward).unwrap());
        let b = analyze(&MeshBuffer::soup(reversed).unwrap());
        assert_relative_eq!(
            a.summary.volume_cm3,
            b.summary.volume_cm3,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_triangle_count_soup_vs_indexed() {
        assert_eq!(analyze(&cube_mesh(5.0)).summary.triangle_count, 12);
        let single = MeshBuffer::soup(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        assert_eq!(analyze(&single).summary.triangle_count, 1);
    }

    #[test]
    fn test_degenerate_volume_uses_bbox_heuristic_exactly() {
        // Collinear diagonal: zero area, zero volume, 10×10×10 bounding box.
        let mesh = MeshBuffer::soup(vec![
            [0.0, 0.0, 0.0],
            [5.0, 5.0, 5.0],
            [10.0, 10.0, 10.0],
        ])
        .unwrap();
        let analysis = analyze(&mesh);
        assert_eq!(
            analysis.status,
            GeometryStatus::Recovered {
                volume: true,
                surface_area: true
            }
        );
        // Exactly 0.3 × bboxVolumeMm3 / 1000.
        assert_eq!(analysis.summary.volume_cm3, 0.3 * 1000.0 / 1000.0);
        // Area heuristic derives from the fallback volume: 6 · 300^(2/3) mm².
        let expected_area_cm2 = 6.0 * 300.0_f64.powf(2.0 / 3.0) / 100.0;
        assert_relative_eq!(
            analysis.summary.surface_area_cm2,
            expected_area_cm2,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_flat_mesh_recovers_volume_but_measures_area() {
        // Flat 10×10 square at z = 0: real area, no enclosed volume.
        let mesh = MeshBuffer::soup(vec![
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [10.0, 10.0, 0.0],
            [0.0, 0.0, 0.0],
            [10.0, 10.0, 0.0],
            [0.0, 10.0, 0.0],
        ])
        .unwrap();
        let analysis = analyze(&mesh);
        assert_eq!(
            analysis.status,
            GeometryStatus::Recovered {
                volume: true,
                surface_area: false
            }
        );
        // Flat bbox has zero volume, so the fallback volume is zero too.
        assert_eq!(analysis.summary.volume_cm3, 0.0);
        assert_relative_eq!(analysis.summary.surface_area_cm2, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_nan_vertex_recovered() {
        let mut soup = cube_soup(10.0);
        soup[0][0] = f64::NAN;
        let analysis = analyze(&MeshBuffer::soup(soup).unwrap());
        assert!(matches!(
            analysis.status,
            GeometryStatus::Recovered { volume: true, .. }
        ));
        assert!(analysis.summary.volume_cm3.is_finite());
        assert!(analysis.summary.surface_area_cm2.is_finite());
    }

    #[test]
    fn test_analyze_payload_end_to_end() {
        let analysis = analyze_payload(&crate::fixtures::cube_stl(10.0)).unwrap();
        assert_eq!(analysis.summary.triangle_count, 12);
        assert_relative_eq!(analysis.summary.volume_cm3, 1.0, max_relative = 0.05);
    }

    #[test]
    fn test_analyze_payload_zero_triangles() {
        assert!(matches!(
            analyze_payload(&crate::fixtures::empty_stl()),
            Err(ParseError::NoTriangles)
        ));
    }

    proptest! {
        #[test]
        fn prop_volume_invariant_under_winding_reversal(
            tris in proptest::collection::vec(
                [
                    [-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0],
                    [-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0],
                    [-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0],
                ],
                1..20,
            )
        ) {
            let soup: Vec<[f64; 3]> = tris.iter().flatten().copied().collect();
            let reversed = reverse_winding(&soup);
            let a = analyze(&MeshBuffer::soup(soup).unwrap());
            let b = analyze(&MeshBuffer::soup(reversed).unwrap());
            prop_assert!(approx::relative_eq!(
                a.summary.volume_cm3,
                b.summary.volume_cm3,
                max_relative = 1e-9
            ));
        }
    }
}
