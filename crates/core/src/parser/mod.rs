//! Structural parser for the dictionary format.
//!
//! A single forward cursor over the preprocessed line sequence. At each
//! position the parser dispatches on the leading keyword of the current
//! line to one of six section parsers; lines matching no keyword are
//! skipped, so stray tokens between sections are tolerated. A structural
//! problem downgrades the current entry (dropped or partially filled),
//! appends one diagnostic, and parsing resumes at a synchronization token
//! -- never a fatal failure.

mod blocks;
mod boundary;
mod geometry;

use crate::error::Diagnostic;
use crate::macros::{self, MacroTable};
use crate::model::{MergePatchPair, MeshDict};
use crate::source::{self, SourceLine};

/// Parse raw dictionary text into a [`MeshDict`].
///
/// Total: all failure is represented in the result's `diagnostics`. Each
/// call builds a fresh context; nothing survives across calls.
pub fn parse(raw: &str) -> MeshDict {
    let mut diagnostics = Vec::new();
    let lines = source::normalize(raw);
    let (lines, macros) = macros::preprocess(lines, &mut diagnostics);
    Parser::new(&lines, macros, diagnostics).run()
}

pub(crate) struct Parser<'a> {
    lines: &'a [SourceLine],
    pos: usize,
    macros: MacroTable,
    dict: MeshDict,
}

impl<'a> Parser<'a> {
    fn new(lines: &'a [SourceLine], macros: MacroTable, diagnostics: Vec<Diagnostic>) -> Self {
        let mut dict = MeshDict::new();
        dict.diagnostics = diagnostics;
        Parser {
            lines,
            pos: 0,
            macros,
            dict,
        }
    }

    fn run(mut self) -> MeshDict {
        while !self.at_end() {
            match self.first_token() {
                "scale" => self.parse_scale(),
                "vertices" => self.parse_vertices(),
                "edges" => self.parse_edges(),
                "blocks" => self.parse_blocks(),
                "boundary" => self.parse_boundary(),
                "mergePatchPairs" => self.parse_merge_patch_pairs(),
                _ => self.advance(),
            }
        }
        self.dict
    }

    // -- Cursor helpers -----------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Text of the current line, `""` past the end.
    fn text(&self) -> &'a str {
        match self.lines.get(self.pos) {
            Some(line) => line.text.as_str(),
            None => "",
        }
    }

    /// Text of the line `offset` positions ahead.
    fn peek_text(&self, offset: usize) -> Option<&'a str> {
        self.lines.get(self.pos + offset).map(|l| l.text.as_str())
    }

    fn first_token(&self) -> &'a str {
        first_word(self.text())
    }

    /// Original line number of the current line (or the last line once
    /// the cursor has run past the end).
    fn line_no(&self) -> u32 {
        match self.lines.get(self.pos) {
            Some(line) => line.number,
            None => self.lines.last().map(|l| l.number).unwrap_or(0),
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn diag(&mut self, message: impl Into<String>) {
        let line = self.line_no();
        self.dict.diagnostics.push(Diagnostic::parse(line, message));
    }

    /// Resolve a numeric token (literal or `$macro`) at the current line.
    fn resolve_number(&mut self, token: &str) -> Option<f64> {
        let line = self.line_no();
        self.macros
            .resolve_number(token, line, &mut self.dict.diagnostics)
    }

    // -- Shared section scaffolding -----------------------------

    /// Consume the section keyword line, then the opening `(` line.
    ///
    /// On a missing opener: one diagnostic, cursor left at the offending
    /// line so the dispatch loop can recover from it.
    fn open_list(&mut self, section: &str) -> bool {
        self.advance();
        if self.at_end() || self.text() != "(" {
            self.diag(format!("expected '(' after {} keyword", section));
            return false;
        }
        self.advance();
        true
    }

    /// Consume the closing `)` line of a list section, diagnosing its
    /// absence.
    fn close_list(&mut self, section: &str) {
        if !self.at_end() && self.text().starts_with(')') {
            self.advance();
        } else {
            self.diag(format!("missing closing ')' for {} section", section));
        }
    }

    // -- Small sections -----------------------------------------

    /// `scale <number|$macro>;` -- the last directive seen wins; vertices
    /// already parsed are not rescaled.
    fn parse_scale(&mut self) {
        let cleaned = self.text().replace(';', "");
        let parts: Vec<&str> = cleaned.split_whitespace().collect();
        if parts.len() >= 2 {
            match self.resolve_number(parts[1]) {
                Some(value) => self.dict.scale = value,
                None => self.diag(format!("invalid scale value '{}'", parts[1])),
            }
        } else {
            self.diag("malformed scale directive");
        }
        self.advance();
    }

    /// `mergePatchPairs ( (master slave) ... );` -- the section is
    /// optional; each entry names two patches.
    fn parse_merge_patch_pairs(&mut self) {
        if !self.open_list("mergePatchPairs") {
            return;
        }
        while !self.at_end() && !self.text().starts_with(')') {
            let text = self.text();
            let tokens: Vec<&str> = paren_groups(text)
                .first()
                .map(|g| g.split_whitespace().collect())
                .unwrap_or_default();
            if tokens.len() == 2 {
                self.dict.merge_patch_pairs.push(MergePatchPair {
                    master: tokens[0].to_string(),
                    slave: tokens[1].to_string(),
                });
            } else {
                self.diag(format!("invalid mergePatchPairs entry '{}'", text));
            }
            self.advance();
        }
        self.close_list("mergePatchPairs");
    }
}

// -- String helpers shared by the section parsers ---------------

/// First whitespace-delimited word of `text`, `""` when blank.
pub(crate) fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Innermost parenthesized groups of `text`, in order, trimmed.
///
/// Nesting is not tracked: a `(` restarts the current group, so
/// `((0 0 0) (1 1 1))` yields the two inner triplets.
pub(crate) fn paren_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match c {
            '(' => start = Some(i + 1),
            ')' => {
                if let Some(s) = start.take() {
                    groups.push(text[s..i].trim());
                }
            }
            _ => {}
        }
    }
    groups
}

/// Whether `text` is a bare identifier (`[A-Za-z0-9_]+`).
pub(crate) fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse every whitespace-delimited token of `group` as an integer index.
pub(crate) fn parse_index_list(group: &str) -> Option<Vec<i64>> {
    let tokens: Vec<&str> = group.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    tokens.iter().map(|t| t.parse::<i64>().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeKind, GradingType};

    #[test]
    fn paren_groups_finds_innermost() {
        assert_eq!(paren_groups("( 0 0 0 )"), vec!["0 0 0"]);
        assert_eq!(
            paren_groups("hex (0 1 2 3) (10 10 1)"),
            vec!["0 1 2 3", "10 10 1"]
        );
        assert_eq!(paren_groups("((0 0 0) (1 1 1))"), vec!["0 0 0", "1 1 1"]);
        assert!(paren_groups("no parens").is_empty());
    }

    #[test]
    fn scale_applied_to_vertices() {
        let dict = parse("scale 0.5;\nvertices\n(\n(1 2 3)\n);\n");
        assert!(dict.diagnostics.is_empty());
        assert_eq!(dict.scale, 0.5);
        assert_eq!(dict.vertices.len(), 1);
        assert_eq!(dict.vertices[0].x, 0.5);
        assert_eq!(dict.vertices[0].y, 1.0);
        assert_eq!(dict.vertices[0].z, 1.5);
    }

    #[test]
    fn eight_unit_cube_vertices_scaled() {
        let src = "scale 0.001;\nvertices\n(\n(0 0 0)\n(1 0 0)\n(1 1 0)\n(0 1 0)\n(0 0 1)\n(1 0 1)\n(1 1 1)\n(0 1 1)\n);\n";
        let dict = parse(src);
        assert!(dict.diagnostics.is_empty());
        assert_eq!(dict.vertices.len(), 8);
        assert_eq!(dict.vertices[6].x, 0.001);
        assert_eq!(dict.vertices[6].y, 0.001);
        assert_eq!(dict.vertices[6].z, 0.001);
    }

    #[test]
    fn scale_directive_is_not_retroactive() {
        let dict = parse("vertices\n(\n(1 1 1)\n);\nscale 2;\nvertices\n(\n(1 1 1)\n);\n");
        assert_eq!(dict.vertices.len(), 2);
        assert_eq!(dict.vertices[0].x, 1.0);
        assert_eq!(dict.vertices[1].x, 2.0);
    }

    #[test]
    fn macro_reference_in_vertex() {
        let dict = parse("r 2;\nvertices\n(\n($r 0 0)\n);\n");
        assert!(dict.diagnostics.is_empty());
        assert_eq!(dict.vertices[0].x, 2.0);
    }

    #[test]
    fn eval_macro_in_vertex() {
        let dict = parse("radius 0.5;\nhalf #eval{ $radius / 2 };\nvertices\n(\n($half 0 0)\n);\n");
        assert!(dict.diagnostics.is_empty());
        assert_eq!(dict.vertices[0].x, 0.25);
    }

    #[test]
    fn undefined_macro_drops_vertex_with_diagnostic() {
        let dict = parse("vertices\n(\n($ghost 0 0)\n(1 1 1)\n);\n");
        assert_eq!(dict.vertices.len(), 1);
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("undefined macro '$ghost'")));
    }

    #[test]
    fn malformed_vertex_reported_and_skipped() {
        let dict = parse("vertices\n(\n(1 2)\n(3 4 5)\n);\n");
        assert_eq!(dict.vertices.len(), 1);
        assert_eq!(dict.vertices[0].x, 3.0);
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("invalid vertex entry")));
    }

    #[test]
    fn missing_closing_paren_keeps_parsed_vertices() {
        let dict = parse("vertices\n(\n(0 0 0)\n(1 0 0)\n");
        assert_eq!(dict.vertices.len(), 2);
        assert_eq!(dict.diagnostics.len(), 1);
        assert!(dict.diagnostics[0].message.contains("missing closing ')'"));
    }

    #[test]
    fn missing_opening_paren_reported() {
        let dict = parse("vertices\n(0 0 0)\n");
        assert!(dict.vertices.is_empty());
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("expected '(' after vertices keyword")));
    }

    #[test]
    fn invalid_scale_value_leaves_scale_unchanged() {
        let dict = parse("scale bogus;\nvertices\n(\n(1 0 0)\n);\n");
        assert_eq!(dict.scale, 1.0);
        assert_eq!(dict.vertices[0].x, 1.0);
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("invalid scale value 'bogus'")));
    }

    #[test]
    fn stray_lines_between_sections_are_skipped_silently() {
        let dict = parse("FoamFile\n{\nnothing here\n}\nvertices\n(\n(0 0 0)\n);\n");
        assert_eq!(dict.vertices.len(), 1);
        assert!(dict.diagnostics.is_empty());
    }

    #[test]
    fn edge_entries_parsed_by_kind() {
        let src = "vertices\n(\n(0 0 0)\n(1 0 0)\n);\nedges\n(\narc 0 1 (0.5 0.3 0)\nline 0 1\nspline 0 1 ((0.2 0 0) (0.8 0 0))\n);\n";
        let dict = parse(src);
        assert!(dict.diagnostics.is_empty(), "{:?}", dict.diagnostics);
        assert_eq!(dict.edges.len(), 3);
        assert_eq!(dict.edges[0].kind, EdgeKind::Arc);
        assert_eq!(dict.edges[0].control_points.len(), 1);
        assert_eq!(dict.edges[0].control_points[0].x, 0.5);
        assert_eq!(dict.edges[1].kind, EdgeKind::Line);
        assert!(dict.edges[1].control_points.is_empty());
        assert_eq!(dict.edges[2].kind, EdgeKind::Spline);
        assert_eq!(dict.edges[2].control_points.len(), 2);
    }

    #[test]
    fn arc_control_point_scaled() {
        let dict = parse("scale 2;\nedges\n(\narc 0 1 (0.5 0.25 1)\n);\n");
        assert_eq!(dict.edges[0].control_points[0].x, 1.0);
        assert_eq!(dict.edges[0].control_points[0].y, 0.5);
        assert_eq!(dict.edges[0].control_points[0].z, 2.0);
    }

    #[test]
    fn arc_without_control_point_dropped() {
        let dict = parse("edges\n(\narc 0 1\n);\n");
        assert!(dict.edges.is_empty());
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("arc edge expects exactly one control point")));
    }

    #[test]
    fn unknown_edge_kind_reported() {
        let dict = parse("edges\n(\nbezier 0 1 (0.5 0.5 0)\n);\n");
        assert!(dict.edges.is_empty());
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("invalid edge entry")));
    }

    #[test]
    fn single_line_hex_block() {
        let dict = parse("blocks\n(\nhex (0 1 2 3 4 5 6 7) (10 10 1) simpleGrading (1 1 1)\n);\n");
        assert!(dict.diagnostics.is_empty(), "{:?}", dict.diagnostics);
        assert_eq!(dict.blocks.len(), 1);
        assert_eq!(dict.blocks[0].vertices, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(dict.blocks[0].cells, [10, 10, 1]);
        assert_eq!(dict.blocks[0].grading_type, GradingType::Simple);
        assert_eq!(dict.blocks[0].grading, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn hex_block_spread_over_three_lines() {
        let dict = parse("blocks\n(\nhex (0 1 2 3 4 5 6 7)\n(20 20 2)\nsimpleGrading (1 2 3)\n);\n");
        assert!(dict.diagnostics.is_empty(), "{:?}", dict.diagnostics);
        assert_eq!(dict.blocks.len(), 1);
        assert_eq!(dict.blocks[0].cells, [20, 20, 2]);
        assert_eq!(dict.blocks[0].grading, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn hex_block_grading_defaults_when_clause_absent() {
        let dict = parse("blocks\n(\nhex (0 1 2 3 4 5 6 7) (10 10 1)\n);\n");
        assert_eq!(dict.blocks.len(), 1);
        assert_eq!(dict.blocks[0].grading_type, GradingType::Simple);
        assert_eq!(dict.blocks[0].grading, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn hex_with_seven_vertices_rejected_with_one_diagnostic() {
        let dict = parse("blocks\n(\nhex (0 1 2 3 4 5 6) (10 10 1) simpleGrading (1 1 1)\n);\n");
        assert!(dict.blocks.is_empty());
        assert_eq!(dict.diagnostics.len(), 1);
        assert!(dict.diagnostics[0]
            .message
            .contains("requires 8 vertex indices, found 7"));
    }

    #[test]
    fn hex_with_nine_vertices_rejected_with_one_diagnostic() {
        let dict =
            parse("blocks\n(\nhex (0 1 2 3 4 5 6 7 8) (10 10 1) simpleGrading (1 1 1)\n);\n");
        assert!(dict.blocks.is_empty());
        assert_eq!(dict.diagnostics.len(), 1);
    }

    #[test]
    fn hex_with_bad_cell_count_rejected() {
        let dict = parse("blocks\n(\nhex (0 1 2 3 4 5 6 7) (10 10) simpleGrading (1 1 1)\n);\n");
        assert!(dict.blocks.is_empty());
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("3 integer cell counts")));
    }

    #[test]
    fn hex_cells_accept_macros() {
        let dict =
            parse("n 16;\nblocks\n(\nhex (0 1 2 3 4 5 6 7) ($n $n 1) simpleGrading (1 1 1)\n);\n");
        assert_eq!(dict.blocks[0].cells, [16, 16, 1]);
    }

    #[test]
    fn simple_grading_requires_three_values() {
        let dict = parse("blocks\n(\nhex (0 1 2 3 4 5 6 7) (10 10 1) simpleGrading (1 1)\n);\n");
        assert!(dict.blocks.is_empty());
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("simpleGrading requires 3 values")));
    }

    #[test]
    fn edge_grading_accepts_twelve_values() {
        let dict = parse(
            "blocks\n(\nhex (0 1 2 3 4 5 6 7) (10 10 1) edgeGrading (1 1 1 1 2 2 2 2 3 3 3 3)\n);\n",
        );
        assert_eq!(dict.blocks.len(), 1);
        assert_eq!(dict.blocks[0].grading_type, GradingType::Edge);
        assert_eq!(dict.blocks[0].grading.len(), 12);
    }

    #[test]
    fn malformed_hex_recovers_at_next_hex() {
        let dict = parse(
            "blocks\n(\nhex nonsense here\nhex (0 1 2 3 4 5 6 7) (10 10 1) simpleGrading (1 1 1)\n);\n",
        );
        assert_eq!(dict.blocks.len(), 1);
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("malformed hex definition")));
    }

    #[test]
    fn boundary_patch_with_inline_faces() {
        let dict = parse("boundary\n(\ninlet\n{\ntype patch;\nfaces ((0 4 7 3));\n}\n);\n");
        assert!(dict.diagnostics.is_empty(), "{:?}", dict.diagnostics);
        assert_eq!(dict.boundary.len(), 1);
        let patch = &dict.boundary[0];
        assert_eq!(patch.name, "inlet");
        assert_eq!(patch.patch_type.as_deref(), Some("patch"));
        assert_eq!(patch.faces, vec![vec![0, 4, 7, 3]]);
    }

    #[test]
    fn inline_faces_payload_may_hold_several_groups() {
        let dict =
            parse("boundary\n(\nwalls\n{\ntype wall;\nfaces ((0 1 2 3) (4 5 6 7));\n}\n);\n");
        assert_eq!(dict.boundary[0].faces.len(), 2);
    }

    #[test]
    fn boundary_patch_with_multi_line_faces() {
        let src = "boundary\n(\nfixedWalls\n{\ntype wall;\nfaces\n(\n(0 4 7 3)\n(2 6 5 1)\n);\n}\n);\n";
        let dict = parse(src);
        assert!(dict.diagnostics.is_empty(), "{:?}", dict.diagnostics);
        assert_eq!(dict.boundary[0].faces.len(), 2);
    }

    #[test]
    fn patch_missing_type_still_emitted_with_diagnostic() {
        let dict = parse("boundary\n(\noutlet\n{\nfaces ((1 2 6 5));\n}\n);\n");
        assert_eq!(dict.boundary.len(), 1);
        assert!(dict.boundary[0].patch_type.is_none());
        assert_eq!(dict.diagnostics.len(), 1);
        assert!(dict.diagnostics[0]
            .message
            .contains("patch 'outlet' missing 'type' definition"));
    }

    #[test]
    fn three_vertex_face_kept_for_validator() {
        let dict = parse("boundary\n(\ninlet\n{\ntype patch;\nfaces ((0 4 7));\n}\n);\n");
        assert!(dict.diagnostics.is_empty());
        assert_eq!(dict.boundary[0].faces, vec![vec![0, 4, 7]]);
    }

    #[test]
    fn malformed_patch_body_recovers_at_next_patch() {
        let src = "boundary\n(\nbroken\nnot_a_brace\ngood\n{\ntype patch;\nfaces ((0 1 2 3));\n}\n);\n";
        let dict = parse(src);
        let names: Vec<&str> = dict.boundary.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["good"]);
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("expected '{' after patch name")));
    }

    #[test]
    fn merge_patch_pairs_parsed() {
        let dict = parse("mergePatchPairs\n(\n(top bottom)\n(left right)\n);\n");
        assert_eq!(dict.merge_patch_pairs.len(), 2);
        assert_eq!(dict.merge_patch_pairs[0].master, "top");
        assert_eq!(dict.merge_patch_pairs[0].slave, "bottom");
    }

    #[test]
    fn merge_patch_pairs_section_is_optional() {
        let dict = parse("vertices\n(\n(0 0 0)\n);\n");
        assert!(dict.merge_patch_pairs.is_empty());
        assert!(dict.diagnostics.is_empty());
    }

    #[test]
    fn invalid_merge_pair_reported() {
        let dict = parse("mergePatchPairs\n(\n(only_one)\n);\n");
        assert!(dict.merge_patch_pairs.is_empty());
        assert!(dict
            .diagnostics
            .iter()
            .any(|d| d.message.contains("invalid mergePatchPairs entry")));
    }

    #[test]
    fn empty_input_yields_empty_model() {
        let dict = parse("");
        assert_eq!(dict.scale, 1.0);
        assert!(dict.vertices.is_empty());
        assert!(dict.diagnostics.is_empty());
    }

    #[test]
    fn diagnostics_cite_original_line_numbers() {
        let src = "/* header\ncomment */\nvertices\n(\n(1 2)\n);\n";
        let dict = parse(src);
        assert_eq!(dict.diagnostics.len(), 1);
        assert_eq!(dict.diagnostics[0].line, Some(5));
    }

    #[test]
    fn parse_is_idempotent() {
        let src = "scale 0.5;\nvertices\n(\n(1 1 1)\n(2 2)\n);\nblocks\n(\nhex (0 1 2 3 4 5 6 7) (4 4 4) simpleGrading (1 1 1)\n);\n";
        let first = parse(src);
        let second = parse(src);
        assert_eq!(first, second);
    }
}
