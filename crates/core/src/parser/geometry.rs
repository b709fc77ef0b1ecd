//! Section parsers for `vertices` and `edges`.

use crate::model::{Edge, EdgeKind, Vertex};

use super::{paren_groups, Parser};

impl<'a> Parser<'a> {
    /// `vertices ( (x y z) ... );` -- each coordinate is a literal or a
    /// `$macro`, stored multiplied by the scale in effect right now.
    pub(super) fn parse_vertices(&mut self) {
        if !self.open_list("vertices") {
            return;
        }
        while !self.at_end() && !self.text().starts_with(')') {
            let text = self.text();
            let tokens: Vec<&str> = paren_groups(text)
                .first()
                .map(|g| g.split_whitespace().collect())
                .unwrap_or_default();
            if tokens.len() == 3 {
                let x = self.resolve_number(tokens[0]);
                let y = self.resolve_number(tokens[1]);
                let z = self.resolve_number(tokens[2]);
                match (x, y, z) {
                    (Some(x), Some(y), Some(z)) => {
                        let s = self.dict.scale;
                        self.dict.vertices.push(Vertex {
                            x: x * s,
                            y: y * s,
                            z: z * s,
                        });
                    }
                    _ => self.diag(format!(
                        "could not resolve vertex coordinates to numbers in '{}'",
                        text
                    )),
                }
            } else {
                self.diag(format!("invalid vertex entry '{}'", text));
            }
            self.advance();
        }
        self.close_list("vertices");
    }

    /// `edges ( <kind> v1 v2 <control points> ... );`
    ///
    /// The first token selects the curve kind; endpoints are always
    /// integer indices, never macros. Malformed entries are reported and
    /// skipped.
    pub(super) fn parse_edges(&mut self) {
        if !self.open_list("edges") {
            return;
        }
        while !self.at_end() && !self.text().starts_with(')') {
            if self.text() != "(" {
                self.parse_edge_entry();
            }
            self.advance();
        }
        self.close_list("edges");
    }

    fn parse_edge_entry(&mut self) {
        let text = self.text();
        let mut tokens = text.split_whitespace();

        let kind = match tokens.next().and_then(EdgeKind::from_keyword) {
            Some(kind) => kind,
            None => {
                self.diag(format!("invalid edge entry '{}'", text));
                return;
            }
        };
        let endpoints = (
            tokens.next().and_then(|t| t.parse::<i64>().ok()),
            tokens.next().and_then(|t| t.parse::<i64>().ok()),
        );
        let (v1, v2) = match endpoints {
            (Some(v1), Some(v2)) => (v1, v2),
            _ => {
                self.diag(format!("invalid vertex indices for edge '{}'", text));
                return;
            }
        };

        let mut control_points = Vec::new();
        for group in paren_groups(text) {
            match self.parse_control_point(group) {
                Some(point) => control_points.push(point),
                None => {
                    self.diag(format!(
                        "edge control point must be 3 coordinates, got '({})'",
                        group
                    ));
                    return;
                }
            }
        }

        let arity_ok = match kind {
            EdgeKind::Line => control_points.is_empty(),
            EdgeKind::Arc => control_points.len() == 1,
            EdgeKind::Spline | EdgeKind::PolyLine => !control_points.is_empty(),
        };
        if !arity_ok {
            let expected = match kind {
                EdgeKind::Line => "no control points",
                EdgeKind::Arc => "exactly one control point",
                EdgeKind::Spline | EdgeKind::PolyLine => "at least one control point",
            };
            self.diag(format!("{} edge expects {}", kind.keyword(), expected));
            return;
        }

        self.dict.edges.push(Edge {
            kind,
            v1,
            v2,
            control_points,
        });
    }

    /// Three float literals, scaled like vertices. Control point
    /// coordinates do not go through the macro table.
    fn parse_control_point(&mut self, group: &str) -> Option<Vertex> {
        let tokens: Vec<&str> = group.split_whitespace().collect();
        if tokens.len() != 3 {
            return None;
        }
        let mut coords = [0f64; 3];
        for (slot, token) in coords.iter_mut().zip(&tokens) {
            *slot = token.parse().ok().filter(|v: &f64| v.is_finite())?;
        }
        let s = self.dict.scale;
        Some(Vertex {
            x: coords[0] * s,
            y: coords[1] * s,
            z: coords[2] * s,
        })
    }
}
