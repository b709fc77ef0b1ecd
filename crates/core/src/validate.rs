//! Model validation: referential and structural checks.
//!
//! A pure second pass over the finished data model -- never over raw text.
//! Messages are ordered: blocks first (vertex count, index range,
//! right-handedness, cell counts), then boundary faces, then edge
//! endpoints.

use crate::error::Diagnostic;
use crate::model::{Block, MeshDict, Vertex};

/// Validate a parsed model. Does not mutate the model; safe to call
/// repeatedly.
pub fn validate(dict: &MeshDict) -> Vec<Diagnostic> {
    let mut messages = Vec::new();

    if dict.vertices.is_empty() || dict.blocks.is_empty() {
        messages.push(Diagnostic::validation("core data (vertices, blocks) missing"));
        return messages;
    }
    let vertex_count = dict.vertices.len() as i64;

    for (block_index, block) in dict.blocks.iter().enumerate() {
        if block.vertices.len() != 8 {
            messages.push(Diagnostic::validation(format!(
                "block {}: must have exactly 8 vertices, found {}",
                block_index,
                block.vertices.len()
            )));
            continue;
        }
        let mut in_range = true;
        for &index in &block.vertices {
            if index < 0 || index >= vertex_count {
                messages.push(Diagnostic::validation(format!(
                    "block {}: vertex index {} out of range (0-{})",
                    block_index,
                    index,
                    vertex_count - 1
                )));
                in_range = false;
            }
        }
        if in_range && !is_right_handed(block, &dict.vertices) {
            messages.push(Diagnostic::validation(format!(
                "block {}: vertex ordering may not follow the right-handed convention",
                block_index
            )));
        }
        for (axis, &count) in block.cells.iter().enumerate() {
            if count <= 0 {
                messages.push(Diagnostic::validation(format!(
                    "block {}: cell count along axis {} must be positive, found {}",
                    block_index, axis, count
                )));
            }
        }
    }

    for patch in &dict.boundary {
        for (face_index, face) in patch.faces.iter().enumerate() {
            if face.len() != 4 {
                messages.push(Diagnostic::validation(format!(
                    "patch '{}', face {}: must have exactly 4 vertices, found {}",
                    patch.name,
                    face_index,
                    face.len()
                )));
            }
            for &index in face {
                if index < 0 || index >= vertex_count {
                    messages.push(Diagnostic::validation(format!(
                        "patch '{}', face {}: vertex index {} out of range",
                        patch.name, face_index, index
                    )));
                }
            }
        }
    }

    for (edge_index, edge) in dict.edges.iter().enumerate() {
        for index in [edge.v1, edge.v2] {
            if index < 0 || index >= vertex_count {
                messages.push(Diagnostic::validation(format!(
                    "edge {}: vertex index {} out of range",
                    edge_index, index
                )));
            }
        }
    }

    messages
}

/// Right-handedness of the block's local triad: x1 = v0->v1, x2 = v1->v2,
/// x3 = v0->v4; the triad is right-handed when (x1 x x2) . x3 > 0.
/// Callers guarantee all 8 indices are in range.
fn is_right_handed(block: &Block, vertices: &[Vertex]) -> bool {
    let p = |slot: usize| vertices[block.vertices[slot] as usize];
    let x1 = sub(p(1), p(0));
    let x2 = sub(p(2), p(1));
    let x3 = sub(p(4), p(0));
    dot(cross(x1, x2), x3) > 0.0
}

fn sub(a: Vertex, b: Vertex) -> [f64; 3] {
    [a.x - b.x, a.y - b.y, a.z - b.z]
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
