use std::fmt::{self, Write};

use crate::ast::{
    Alignment, Block, Container, ContainerKind, Document, Inline, Leaf, LeafKind, ListData,
    ListKind, StyleFlags, TableData, Text,
};

/// Re-emit a document as canonical Markdown. The output is chosen so that
/// parsing it again produces a tree structurally equal to the input tree:
/// style toggles come back out as `**`/`_`/`~` at run boundaries, markers
/// are re-inserted with canonical spacing, and characters that would lex as
/// syntax inside plain text are backslash-escaped.
pub fn to_markdown(document: &Document) -> Result<String, fmt::Error> {
    let mut formatter = MarkdownFormatter::new();
    formatter.write_blocks(document.children(), "", "")?;
    Ok(formatter.finish())
}

pub struct MarkdownFormatter {
    result: String,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            result: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.result
    }

    /// Emit a sibling run of blocks. `first` prefixes the first line (it may
    /// end in a list marker), `cont` prefixes every other line.
    fn write_blocks(&mut self, blocks: &[Block], first: &str, cont: &str) -> fmt::Result {
        let mut previous_was_paragraph = false;
        for (index, block) in blocks.iter().enumerate() {
            let first_block = index == 0;
            let lead = if first_block { first } else { cont };

            if is_break(block) {
                // An explicit blank line. On a marker line the prefix is
                // kept whole so the marker survives.
                if first_block {
                    self.result.push_str(first);
                } else {
                    self.result.push_str(cont.trim_end());
                }
                self.result.push('\n');
                previous_was_paragraph = false;
                continue;
            }

            // Two paragraphs can sit side by side inside a list item when a
            // blank was swallowed by the list; re-insert it so the second
            // paragraph does not merge into the first on a reparse.
            if previous_was_paragraph && is_paragraph(block) {
                self.result.push_str(cont.trim_end());
                self.result.push('\n');
            }

            self.write_block(block, lead, cont)?;

            // A list that absorbed a blank line needs one emitted after it,
            // or the following sibling would be pulled into the list.
            if is_loose_list(block) && index + 1 < blocks.len() {
                self.result.push_str(cont.trim_end());
                self.result.push('\n');
            }

            previous_was_paragraph = is_paragraph(block);
        }
        Ok(())
    }

    fn write_block(&mut self, block: &Block, first: &str, cont: &str) -> fmt::Result {
        match block {
            Block::Container(container) => self.write_container(container, first, cont),
            Block::Leaf(leaf) => self.write_leaf(leaf, first, cont),
        }
    }

    fn write_container(&mut self, container: &Container, first: &str, cont: &str) -> fmt::Result {
        match container.kind() {
            ContainerKind::Document => self.write_blocks(container.children(), first, cont),
            ContainerKind::Quote => {
                let quote_first = format!("{first}> ");
                let quote_cont = format!("{cont}> ");
                self.write_blocks(container.children(), &quote_first, &quote_cont)
            }
            ContainerKind::List(data) => self.write_list(data, container.children(), first, cont),
            ContainerKind::ListItem(_) => self.write_blocks(container.children(), first, cont),
            ContainerKind::Table(data) => self.write_table(data, container.children(), first, cont),
        }
    }

    fn write_list(
        &mut self,
        data: &ListData,
        items: &[Block],
        first: &str,
        cont: &str,
    ) -> fmt::Result {
        let mut number = data.start;
        for (index, item) in items.iter().enumerate() {
            let Block::Container(item_container) = item else {
                continue;
            };
            let ContainerKind::ListItem(item_data) = item_container.kind() else {
                continue;
            };

            if index > 0 && data.spacing >= 1 {
                self.result.push_str(cont.trim_end());
                self.result.push('\n');
            }

            let lead = if index == 0 { first } else { cont };
            let mut marker = String::new();
            match data.kind {
                ListKind::Unordered => marker.push_str("- "),
                ListKind::Task => {
                    marker.push_str(if item_data.checked { "- [x] " } else { "- [ ] " })
                }
                ListKind::Ordered => write!(marker, "{number}. ")?,
            }

            let item_first = format!("{lead}{marker}");
            let item_cont = format!("{cont}{}", " ".repeat(marker.len()));
            if item_container.children().is_empty() {
                self.result.push_str(&item_first);
                self.result.push('\n');
            } else {
                self.write_blocks(item_container.children(), &item_first, &item_cont)?;
            }
            number += 1;
        }
        Ok(())
    }

    fn write_table(
        &mut self,
        data: &TableData,
        cells: &[Block],
        first: &str,
        cont: &str,
    ) -> fmt::Result {
        if data.ncol == 0 {
            return Ok(());
        }
        let rows: Vec<&[Block]> = cells.chunks(data.ncol).collect();

        for (index, row) in rows.iter().enumerate() {
            self.result
                .push_str(if index == 0 { first } else { cont });
            for cell in *row {
                self.result.push_str("| ");
                if let Block::Leaf(leaf) = cell {
                    self.write_inlines(leaf.inlines(), cont, true)?;
                }
                self.result.push(' ');
            }
            self.result.push_str("|\n");

            // The alignment separator always follows the header row.
            if index == 0 {
                self.result.push_str(cont);
                for column in 0..data.ncol {
                    let width = data.relative_width.get(column).copied().unwrap_or(3);
                    let dashes = "-".repeat(width.max(1));
                    match data.alignment.get(column).copied().unwrap_or(Alignment::Left) {
                        Alignment::Left => write!(self.result, "| {dashes} ")?,
                        Alignment::Center => write!(self.result, "| :{dashes}: ")?,
                        Alignment::Right => write!(self.result, "| {dashes}: ")?,
                    }
                }
                self.result.push_str("|\n");
            }
        }
        Ok(())
    }

    fn write_leaf(&mut self, leaf: &Leaf, first: &str, cont: &str) -> fmt::Result {
        match leaf.kind() {
            LeafKind::Paragraph => {
                self.result.push_str(first);
                self.write_inlines(leaf.inlines(), cont, false)?;
                self.result.push('\n');
                Ok(())
            }
            LeafKind::Heading(data) => {
                self.result.push_str(first);
                for _ in 0..data.level {
                    self.result.push('#');
                }
                self.result.push(' ');
                self.write_inlines(leaf.inlines(), cont, false)?;
                self.result.push('\n');
                Ok(())
            }
            LeafKind::Code(data) => {
                self.result.push_str(first);
                self.result.push_str(&data.opener);
                self.result.push_str(&data.tag);
                self.result.push('\n');

                let mut rest = data.text.as_str();
                while let Some(end) = rest.find('\n') {
                    self.result.push_str(cont);
                    self.result.push_str(&rest[..end]);
                    self.result.push('\n');
                    rest = &rest[end + 1..];
                }
                if !rest.is_empty() {
                    self.result.push_str(cont);
                    self.result.push_str(rest);
                    self.result.push('\n');
                }

                self.result.push_str(cont);
                self.result.push_str(&data.opener);
                self.result.push('\n');
                Ok(())
            }
            // Handled by write_blocks.
            LeafKind::Break => Ok(()),
        }
    }

    /// Emit inline runs, re-creating style toggles at run boundaries. Since
    /// delimiters are toggles to the parser, the transition between two runs
    /// is just the symmetric difference of their flag sets.
    fn write_inlines(&mut self, inlines: &[Inline], cont: &str, in_cell: bool) -> fmt::Result {
        let mut active = StyleFlags::empty();
        let mut at_line_start = !in_cell;

        for inline in inlines {
            match inline {
                Inline::Text(text) => {
                    self.write_style_transition(active, text.style.flags);
                    active = text.style.flags;
                    self.write_escaped_text(&text.content, in_cell, &mut at_line_start);
                }
                Inline::Codespan { content } => {
                    self.result.push('`');
                    self.result.push_str(content);
                    self.result.push('`');
                    at_line_start = false;
                }
                Inline::Link { url, text } => {
                    self.result.push('[');
                    self.write_styled_runs(text, in_cell)?;
                    self.result.push_str("](");
                    self.result.push_str(url);
                    self.result.push(')');
                    at_line_start = false;
                }
                Inline::Image { src, alt } => {
                    self.result.push_str("![");
                    self.write_styled_runs(alt, in_cell)?;
                    self.result.push_str("](");
                    self.result.push_str(src);
                    self.result.push(')');
                    at_line_start = false;
                }
                Inline::Autolink { url } => {
                    self.result.push('<');
                    self.result.push_str(url);
                    self.result.push('>');
                    at_line_start = false;
                }
                Inline::Linebreak => {
                    self.result.push_str("\\\n");
                    self.result.push_str(cont);
                    at_line_start = true;
                }
            }
        }

        self.write_style_transition(active, StyleFlags::empty());
        Ok(())
    }

    /// Link text and image alt text carry their own style scope, balanced
    /// inside the brackets.
    fn write_styled_runs(&mut self, runs: &[Text], in_cell: bool) -> fmt::Result {
        let mut active = StyleFlags::empty();
        let mut at_line_start = false;
        for run in runs {
            self.write_style_transition(active, run.style.flags);
            active = run.style.flags;
            self.write_escaped_text(&run.content, in_cell, &mut at_line_start);
        }
        self.write_style_transition(active, StyleFlags::empty());
        Ok(())
    }

    fn write_style_transition(&mut self, from: StyleFlags, to: StyleFlags) {
        const DELIMITERS: [(StyleFlags, &str); 3] = [
            (StyleFlags::BOLD, "**"),
            (StyleFlags::ITALIC, "_"),
            (StyleFlags::UNDERLINE, "~"),
        ];
        let changed = from ^ to;
        for (flag, delimiter) in DELIMITERS {
            if changed.contains(flag) {
                self.result.push_str(delimiter);
            }
        }
    }

    /// Escape everything that would lex back into syntax: emphasis
    /// delimiters, brackets, backticks and backslashes everywhere; block
    /// markers when they would start a line; pipes inside table cells.
    fn write_escaped_text(&mut self, content: &str, in_cell: bool, at_line_start: &mut bool) {
        for ch in content.chars() {
            let escape = match ch {
                '\\' | '`' | '*' | '_' | '~' | '[' | ']' | '<' | '>' => true,
                '|' => in_cell,
                '#' | '-' | '+' => *at_line_start,
                _ => false,
            };
            if escape {
                self.result.push('\\');
            }
            self.result.push(ch);
            if !ch.is_whitespace() {
                *at_line_start = false;
            }
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_break(block: &Block) -> bool {
    matches!(block, Block::Leaf(leaf) if matches!(leaf.kind(), LeafKind::Break))
}

fn is_paragraph(block: &Block) -> bool {
    matches!(block, Block::Leaf(leaf) if matches!(leaf.kind(), LeafKind::Paragraph))
}

fn is_loose_list(block: &Block) -> bool {
    matches!(
        block,
        Block::Container(container)
            if matches!(container.kind(), ContainerKind::List(data) if data.spacing >= 1)
    )
}
