//! Parsed dictionary data model.
//!
//! All entities are plain data, immutable once the parse that produced
//! them completes. Vertex indices are stored as `i64` so that negative or
//! out-of-range references survive parsing and reach the validator instead
//! of being silently clamped. JSON serialization uses the camelCase field
//! names of the dictionary vocabulary.

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// A point in mesh space, already multiplied by the scale in effect when
/// it was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Curve type of an [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "arc")]
    Arc,
    #[serde(rename = "spline")]
    Spline,
    #[serde(rename = "polyLine")]
    PolyLine,
}

impl EdgeKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "line" => Some(EdgeKind::Line),
            "arc" => Some(EdgeKind::Arc),
            "spline" => Some(EdgeKind::Spline),
            "polyLine" => Some(EdgeKind::PolyLine),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            EdgeKind::Line => "line",
            EdgeKind::Arc => "arc",
            EdgeKind::Spline => "spline",
            EdgeKind::PolyLine => "polyLine",
        }
    }
}

/// A curved (or straight) connection between two vertices.
///
/// `line` carries no control points, `arc` exactly one, `spline` and
/// `polyLine` one or more. Endpoints are vertex indices, range-checked by
/// the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub kind: EdgeKind,
    pub v1: i64,
    pub v2: i64,
    pub control_points: Vec<Vertex>,
}

/// Cell-size distribution law along a block's axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradingType {
    #[serde(rename = "simpleGrading")]
    Simple,
    #[serde(rename = "edgeGrading")]
    Edge,
}

/// A hexahedral block: 8 ordered vertex indices, per-axis cell counts,
/// and a grading specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub vertices: Vec<i64>,
    pub cells: [i64; 3],
    pub grading_type: GradingType,
    pub grading: Vec<f64>,
}

/// A named boundary patch: a typed group of quad faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub name: String,
    /// Absent when the dictionary omits `type`; flagged by the parser.
    #[serde(rename = "type")]
    pub patch_type: Option<String>,
    pub faces: Vec<Vec<i64>>,
}

/// Two patches intended to be topologically merged downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergePatchPair {
    pub master: String,
    pub slave: String,
}

/// The complete result of one parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDict {
    pub scale: f64,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub blocks: Vec<Block>,
    pub boundary: Vec<Patch>,
    pub merge_patch_pairs: Vec<MergePatchPair>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MeshDict {
    pub fn new() -> Self {
        MeshDict {
            scale: 1.0,
            vertices: Vec::new(),
            edges: Vec::new(),
            blocks: Vec::new(),
            boundary: Vec::new(),
            merge_patch_pairs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Total number of boundary faces across all patches.
    pub fn face_count(&self) -> usize {
        self.boundary.iter().map(|p| p.faces.len()).sum()
    }
}

impl Default for MeshDict {
    fn default() -> Self {
        MeshDict::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_one() {
        assert_eq!(MeshDict::new().scale, 1.0);
    }

    #[test]
    fn serializes_camel_case_vocabulary() {
        let dict = MeshDict {
            blocks: vec![Block {
                vertices: vec![0, 1, 2, 3, 4, 5, 6, 7],
                cells: [10, 10, 1],
                grading_type: GradingType::Simple,
                grading: vec![1.0, 1.0, 1.0],
            }],
            boundary: vec![Patch {
                name: "inlet".to_string(),
                patch_type: Some("patch".to_string()),
                faces: vec![vec![0, 4, 7, 3]],
            }],
            ..MeshDict::new()
        };
        let json = serde_json::to_value(&dict).unwrap();
        assert_eq!(json["blocks"][0]["gradingType"], "simpleGrading");
        assert_eq!(json["boundary"][0]["type"], "patch");
        assert!(json["mergePatchPairs"].is_array());
    }

    #[test]
    fn edge_kind_keywords_round_trip() {
        for keyword in ["line", "arc", "spline", "polyLine"] {
            let kind = EdgeKind::from_keyword(keyword).unwrap();
            assert_eq!(kind.keyword(), keyword);
        }
        assert!(EdgeKind::from_keyword("bezier").is_none());
    }

    #[test]
    fn face_count_sums_over_patches() {
        let mut dict = MeshDict::new();
        dict.boundary.push(Patch {
            name: "a".to_string(),
            patch_type: None,
            faces: vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]],
        });
        dict.boundary.push(Patch {
            name: "b".to_string(),
            patch_type: None,
            faces: vec![vec![0, 3, 2, 1]],
        });
        assert_eq!(dict.face_count(), 3);
    }
}
