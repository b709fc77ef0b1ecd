//! Section parser for `blocks`.
//!
//! A `hex` entry supplies 8 vertex indices, a 3-integer cell-count triple,
//! and a grading clause; the three pieces may sit on one physical line or
//! be spread across up to three consecutive lines, so the parser assembles
//! one logical entry with bounded lookahead before checking arities.

use crate::model::{Block, GradingType};

use super::{first_word, paren_groups, parse_index_list, Parser};

impl<'a> Parser<'a> {
    pub(super) fn parse_blocks(&mut self) {
        if !self.open_list("blocks") {
            return;
        }
        while !self.at_end() && !self.text().starts_with(')') {
            let text = self.text();
            if first_word(text) == "hex" {
                self.parse_hex_entry();
            } else if text == "(" {
                self.advance();
            } else {
                self.diag(format!("unexpected line in blocks section '{}'", text));
                self.advance();
            }
        }
        self.close_list("blocks");
    }

    fn parse_hex_entry(&mut self) {
        let first = self.text();
        let rest = first.strip_prefix("hex").unwrap_or("");
        let (mut grading_kind, before_kw, after_kw) = split_grading(rest);
        let head_groups = paren_groups(before_kw);

        let vertex_group = match head_groups.first() {
            Some(group) => *group,
            None => {
                self.diag(format!("malformed hex definition '{}'", first));
                self.advance();
                self.skip_to_block_sync();
                return;
            }
        };
        let mut cells_group = head_groups.get(1).copied();
        let mut grading_group = after_kw.and_then(|a| paren_groups(a).first().copied());
        let mut consumed = 1;

        // cell counts on a following line
        if cells_group.is_none() {
            if let Some(next) = self.peek_text(consumed) {
                if next.starts_with('(') {
                    cells_group = paren_groups(next).first().copied();
                    if cells_group.is_some() {
                        consumed += 1;
                    }
                }
            }
        }
        // grading clause on a following line
        if grading_kind.is_none() {
            if let Some(next) = self.peek_text(consumed) {
                let (kind, before, after) = split_grading(next);
                if kind.is_some() && before.trim().is_empty() {
                    grading_kind = kind;
                    grading_group = after.and_then(|a| paren_groups(a).first().copied());
                    consumed += 1;
                }
            }
        }

        if let Some(block) = self.assemble_hex(vertex_group, cells_group, grading_kind, grading_group)
        {
            self.dict.blocks.push(block);
        }
        self.pos += consumed;
    }

    /// Arity-check the assembled pieces; a failing entry draws one
    /// diagnostic and is not appended to the model.
    fn assemble_hex(
        &mut self,
        vertex_group: &str,
        cells_group: Option<&str>,
        grading_kind: Option<GradingType>,
        grading_group: Option<&str>,
    ) -> Option<Block> {
        let vertices = parse_index_list(vertex_group);
        let cells = cells_group.and_then(|g| self.resolve_cells(g));
        // a hex without any grading clause gets the conventional default
        let (grading_type, grading) = match grading_kind {
            None => (GradingType::Simple, Some(vec![1.0, 1.0, 1.0])),
            Some(kind) => (kind, grading_group.and_then(|g| self.resolve_grading(g))),
        };

        let vertices = match vertices {
            Some(v) => v,
            None => {
                self.diag(format!(
                    "hex block vertex indices must be integers in '({})'",
                    vertex_group
                ));
                return None;
            }
        };
        if vertices.len() != 8 {
            self.diag(format!(
                "hex block requires 8 vertex indices, found {}",
                vertices.len()
            ));
            return None;
        }
        let cells = match cells {
            Some(c) => c,
            None => {
                self.diag("hex block requires 3 integer cell counts (nx ny nz)");
                return None;
            }
        };
        let grading = match grading {
            Some(g) => g,
            None => {
                self.diag("invalid grading values for hex block");
                return None;
            }
        };
        if grading_type == GradingType::Simple && grading.len() != 3 {
            self.diag(format!(
                "simpleGrading requires 3 values, found {}",
                grading.len()
            ));
            return None;
        }

        Some(Block {
            vertices,
            cells,
            grading_type,
            grading,
        })
    }

    /// Cell counts resolve through the macro table but must land on
    /// integers.
    fn resolve_cells(&mut self, group: &str) -> Option<[i64; 3]> {
        let tokens: Vec<&str> = group.split_whitespace().collect();
        if tokens.len() != 3 {
            return None;
        }
        let mut cells = [0i64; 3];
        for (slot, token) in cells.iter_mut().zip(&tokens) {
            let value = self.resolve_number(token)?;
            if value.fract() != 0.0 {
                return None;
            }
            *slot = value as i64;
        }
        Some(cells)
    }

    fn resolve_grading(&mut self, group: &str) -> Option<Vec<f64>> {
        let tokens: Vec<&str> = group.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }
        tokens
            .iter()
            .map(|token| self.resolve_number(token))
            .collect()
    }

    /// Resynchronize after a broken entry: the next `hex` line or the
    /// `)` that closes the section.
    fn skip_to_block_sync(&mut self) {
        while !self.at_end() {
            let text = self.text();
            if first_word(text) == "hex" || text.starts_with(')') {
                return;
            }
            self.advance();
        }
    }
}

/// Split `text` at its grading keyword, returning the kind, the text
/// before the keyword, and the text after it.
fn split_grading(text: &str) -> (Option<GradingType>, &str, Option<&str>) {
    for (keyword, kind) in [
        ("simpleGrading", GradingType::Simple),
        ("edgeGrading", GradingType::Edge),
    ] {
        if let Some(at) = text.find(keyword) {
            return (Some(kind), &text[..at], Some(&text[at + keyword.len()..]));
        }
    }
    (None, text, None)
}
