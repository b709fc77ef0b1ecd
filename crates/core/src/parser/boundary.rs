//! Section parser for `boundary`.
//!
//! The outer list holds patches of the form
//! `name { type <typeName>; faces ( (v0 v1 v2 v3) ... ); }` where the
//! `faces` payload may alternatively be written fully inline as
//! `faces ((v0 v1 v2 v3));`. Recovery from a malformed patch body scans
//! forward to an explicit synchronization token: `)` (section end), `}`
//! (end of the broken patch), or a bare identifier followed by `{` (the
//! next patch).

use crate::model::Patch;

use super::{is_identifier, paren_groups, parse_index_list, Parser};

impl<'a> Parser<'a> {
    pub(super) fn parse_boundary(&mut self) {
        if !self.open_list("boundary") {
            return;
        }
        while !self.at_end() && !self.text().starts_with(')') {
            self.parse_patch();
        }
        if !self.at_end() && self.text().starts_with(')') {
            self.advance();
            if !self.at_end() && self.text() == ";" {
                self.advance();
            }
        } else {
            self.diag("missing closing ')' for boundary section");
        }
    }

    fn parse_patch(&mut self) {
        let name_text = self.text();
        if !is_identifier(name_text) {
            self.diag(format!("expected patch name, found '{}'", name_text));
            self.sync_to_patch_start();
            return;
        }
        let name = name_text.to_string();
        self.advance();

        if self.at_end() || self.text() != "{" {
            self.diag(format!("patch '{}': expected '{{' after patch name", name));
            self.sync_to_patch_start();
            return;
        }
        self.advance();

        let mut patch = Patch {
            name,
            patch_type: None,
            faces: Vec::new(),
        };
        while !self.at_end() && self.text() != "}" {
            let text = self.text();
            if text.starts_with("type") {
                let parts: Vec<&str> = text.split_whitespace().collect();
                if parts.len() > 1 {
                    patch.patch_type = Some(parts[1].trim_end_matches(';').to_string());
                } else {
                    self.diag(format!(
                        "patch '{}': malformed type definition '{}'",
                        patch.name, text
                    ));
                }
                self.advance();
            } else if text.starts_with("faces") {
                if !self.parse_faces(&mut patch) {
                    break;
                }
            } else {
                self.diag(format!(
                    "patch '{}': unexpected line '{}'",
                    patch.name, text
                ));
                self.advance();
            }
        }

        if !self.at_end() && self.text() == "}" {
            self.advance();
        } else {
            self.diag(format!(
                "patch '{}': expected '}}' to close patch definition",
                patch.name
            ));
        }
        if patch.patch_type.is_none() {
            self.diag(format!("patch '{}' missing 'type' definition", patch.name));
        }
        self.dict.boundary.push(patch);
    }

    /// Parse a `faces` payload in either form. Returns false when the
    /// patch body cannot continue and recovery already ran.
    fn parse_faces(&mut self, patch: &mut Patch) -> bool {
        let text = self.text();
        if text.contains("((") {
            // fully inline: faces ((0 4 7 3) ...);
            let payload = text.strip_prefix("faces").unwrap_or(text);
            let groups = paren_groups(payload);
            if groups.is_empty() {
                self.diag(format!(
                    "patch '{}': malformed inline faces entry '{}'",
                    patch.name, text
                ));
            }
            for group in groups {
                match parse_index_list(group) {
                    Some(face) => patch.faces.push(face),
                    None => self.diag(format!(
                        "patch '{}': invalid vertex indices in face '({})'",
                        patch.name, group
                    )),
                }
            }
            self.advance();
            return true;
        }

        // multi-line: `faces` then '(' then one face per line
        self.advance();
        if self.at_end() || self.text() != "(" {
            self.diag(format!(
                "patch '{}': expected '(' after 'faces' keyword",
                patch.name
            ));
            self.sync_to_patch_end();
            return false;
        }
        self.advance();

        while !self.at_end() && !self.text().starts_with(')') {
            let text = self.text();
            match paren_groups(text).first().and_then(|g| parse_index_list(g)) {
                Some(face) => patch.faces.push(face),
                None => self.diag(format!(
                    "patch '{}': malformed face entry '{}'",
                    patch.name, text
                )),
            }
            self.advance();
        }
        if !self.at_end() && self.text().starts_with(')') {
            self.advance();
            if !self.at_end() && self.text() == ";" {
                self.advance();
            }
            true
        } else {
            self.diag(format!(
                "patch '{}': missing closing ')' for faces list",
                patch.name
            ));
            self.sync_to_patch_end();
            false
        }
    }

    /// Scan forward to a patch restart point. Tokens: `)` (left for the
    /// section loop), `}` (consumed, it closed the broken patch), or an
    /// identifier line whose successor is `{`.
    fn sync_to_patch_start(&mut self) {
        while !self.at_end() {
            let text = self.text();
            if text.starts_with(')') {
                return;
            }
            if text == "}" {
                self.advance();
                return;
            }
            if is_identifier(text) && self.peek_text(1) == Some("{") {
                return;
            }
            self.advance();
        }
    }

    /// Scan forward to the end of the current patch body: `}` or `)` or
    /// the start of the next patch, all left for the caller to inspect.
    fn sync_to_patch_end(&mut self) {
        while !self.at_end() {
            let text = self.text();
            if text == "}" || text.starts_with(')') {
                return;
            }
            if is_identifier(text) && self.peek_text(1) == Some("{") {
                return;
            }
            self.advance();
        }
    }
}
