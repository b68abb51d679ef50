use crate::ast::{
    Alignment, Block, Container, ContainerKind, Document, Inline, Leaf, LeafKind, ListData,
    ListKind, StyleFlags, TableData, Text,
};

const HEADER_OPEN_TAGS: [&str; 6] = ["<h1>", "<h2>", "<h3>", "<h4>", "<h5>", "<h6>"];
const HEADER_CLOSE_TAGS: [&str; 6] = ["</h1>", "</h2>", "</h3>", "</h4>", "</h5>", "</h6>"];

/// Render a document as an HTML5 fragment.
pub fn to_html(document: &Document) -> String {
    let mut formatter = HtmlFormatter::new();
    formatter.format_document(document);
    formatter.finish()
}

pub struct HtmlFormatter {
    result: String,
}

impl HtmlFormatter {
    pub fn new() -> Self {
        Self {
            result: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.result
    }

    pub fn format_document(&mut self, document: &Document) {
        self.format_block_list(document.children());
    }

    /// Emit a sequence of sibling blocks separated by newlines. Break leaves
    /// are spacing information and produce no output.
    fn format_block_list(&mut self, blocks: &[Block]) {
        let mut first = true;
        for block in blocks {
            if is_break(block) {
                continue;
            }
            if !first {
                self.result.push('\n');
            }
            first = false;
            self.format_block(block);
        }
    }

    fn format_block(&mut self, block: &Block) {
        match block {
            Block::Container(container) => self.format_container(container),
            Block::Leaf(leaf) => self.format_leaf(leaf),
        }
    }

    fn format_container(&mut self, container: &Container) {
        match container.kind() {
            ContainerKind::Document => self.format_block_list(container.children()),
            ContainerKind::Quote => {
                self.result.push_str("<blockquote>\n");
                self.format_block_list(container.children());
                self.result.push_str("\n</blockquote>");
            }
            ContainerKind::List(data) => self.format_list(data, container.children()),
            // Item bodies are rendered by format_list, which needs the list's
            // spacing; a bare item outside a list cannot occur.
            ContainerKind::ListItem(_) => self.format_block_list(container.children()),
            ContainerKind::Table(data) => self.format_table(data, container.children()),
        }
    }

    fn format_list(&mut self, data: &ListData, items: &[Block]) {
        let close = match data.kind {
            ListKind::Ordered => {
                if data.start != 1 {
                    self.result
                        .push_str(&format!("<ol start=\"{}\">\n", data.start));
                } else {
                    self.result.push_str("<ol>\n");
                }
                "</ol>"
            }
            ListKind::Unordered | ListKind::Task => {
                self.result.push_str("<ul>\n");
                "</ul>"
            }
        };

        for item in items {
            let Block::Container(item) = item else {
                continue;
            };
            let ContainerKind::ListItem(item_data) = item.kind() else {
                continue;
            };

            self.result.push_str("<li>");
            if data.kind == ListKind::Task {
                self.result.push_str("<input type=\"checkbox\"");
                if item_data.checked {
                    self.result.push_str(" checked");
                }
                self.result.push_str(" disabled /> ");
            }
            self.format_list_item(item.children(), data.spacing == 0);
            self.result.push_str("</li>\n");
        }

        self.result.push_str(close);
    }

    /// Tight lists render their paragraphs bare; loose lists keep the `<p>`
    /// wrappers.
    fn format_list_item(&mut self, children: &[Block], tight: bool) {
        if !tight {
            self.result.push('\n');
            self.format_block_list(children);
            self.result.push('\n');
            return;
        }

        let mut first = true;
        for block in children {
            if is_break(block) {
                continue;
            }
            if !first {
                self.result.push('\n');
            }
            first = false;
            match block {
                Block::Leaf(leaf) if matches!(leaf.kind(), LeafKind::Paragraph) => {
                    self.format_inline_list(leaf.inlines());
                }
                _ => self.format_block(block),
            }
        }
    }

    fn format_table(&mut self, data: &TableData, cells: &[Block]) {
        self.result.push_str("<table>\n");
        if data.ncol == 0 {
            self.result.push_str("</table>");
            return;
        }

        let rows: Vec<&[Block]> = cells.chunks(data.ncol).collect();

        self.result.push_str("<thead>\n<tr>\n");
        if let Some(header) = rows.first() {
            for (index, cell) in header.iter().enumerate() {
                self.format_table_cell(cell, "th", data.alignment.get(index));
            }
        }
        self.result.push_str("</tr>\n</thead>");

        if rows.len() > 1 {
            self.result.push_str("\n<tbody>\n");
            for row in &rows[1..] {
                self.result.push_str("<tr>\n");
                for (index, cell) in row.iter().enumerate() {
                    self.format_table_cell(cell, "td", data.alignment.get(index));
                }
                self.result.push_str("</tr>\n");
            }
            self.result.push_str("</tbody>");
        }
        self.result.push_str("\n</table>");
    }

    fn format_table_cell(&mut self, cell: &Block, tag: &str, alignment: Option<&Alignment>) {
        self.result.push('<');
        self.result.push_str(tag);
        match alignment {
            Some(Alignment::Center) => self.result.push_str(" align=\"center\""),
            Some(Alignment::Right) => self.result.push_str(" align=\"right\""),
            _ => {}
        }
        self.result.push('>');
        if let Block::Leaf(leaf) = cell {
            self.format_inline_list(leaf.inlines());
        }
        self.result.push_str("</");
        self.result.push_str(tag);
        self.result.push_str(">\n");
    }

    fn format_leaf(&mut self, leaf: &Leaf) {
        match leaf.kind() {
            LeafKind::Paragraph => {
                self.result.push_str("<p>");
                self.format_inline_list(leaf.inlines());
                self.result.push_str("</p>");
            }
            LeafKind::Heading(data) => {
                self.result
                    .push_str(HEADER_OPEN_TAGS[data.level as usize - 1]);
                self.format_inline_list(leaf.inlines());
                self.result
                    .push_str(HEADER_CLOSE_TAGS[data.level as usize - 1]);
            }
            LeafKind::Code(data) => {
                if data.tag.is_empty() {
                    self.result.push_str("<pre><code>");
                } else {
                    self.result.push_str("<pre><code class=\"language-");
                    push_escaped_attr(&mut self.result, &data.tag);
                    self.result.push_str("\">");
                }
                push_escaped_body(&mut self.result, &data.text);
                self.result.push_str("</code></pre>");
            }
            LeafKind::Break => {}
        }
    }

    fn format_inline_list(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.format_inline(inline);
        }
    }

    fn format_inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.format_text(text),
            Inline::Codespan { content } => {
                self.result.push_str("<code>");
                push_escaped_body(&mut self.result, content);
                self.result.push_str("</code>");
            }
            Inline::Link { url, text } => {
                self.result.push_str("<a href=\"");
                push_escaped_attr(&mut self.result, url);
                self.result.push_str("\">");
                for run in text {
                    self.format_text(run);
                }
                self.result.push_str("</a>");
            }
            Inline::Autolink { url } => {
                self.result.push_str("<a href=\"");
                push_escaped_attr(&mut self.result, url);
                self.result.push_str("\">");
                push_escaped_body(&mut self.result, url);
                self.result.push_str("</a>");
            }
            Inline::Image { src, alt } => {
                self.result.push_str("<img src=\"");
                push_escaped_attr(&mut self.result, src);
                self.result.push_str("\" alt=\"");
                let mut plain = String::new();
                for run in alt {
                    plain.push_str(&run.content);
                }
                push_escaped_attr(&mut self.result, &plain);
                self.result.push_str("\" />");
            }
            Inline::Linebreak => self.result.push_str("<br />\n"),
        }
    }

    /// Style flags map to nested tags; the terminal-only attributes and
    /// colors have no HTML equivalent and are dropped.
    fn format_text(&mut self, text: &Text) {
        const TAGS: [(StyleFlags, &str, &str); 4] = [
            (StyleFlags::BOLD, "<strong>", "</strong>"),
            (StyleFlags::ITALIC, "<em>", "</em>"),
            (StyleFlags::UNDERLINE, "<u>", "</u>"),
            (StyleFlags::STRIKE, "<del>", "</del>"),
        ];

        for (flag, open, _) in TAGS {
            if text.style.flags.contains(flag) {
                self.result.push_str(open);
            }
        }
        push_escaped_body(&mut self.result, &text.content);
        for (flag, _, close) in TAGS.iter().rev() {
            if text.style.flags.contains(*flag) {
                self.result.push_str(close);
            }
        }
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_break(block: &Block) -> bool {
    matches!(block, Block::Leaf(leaf) if matches!(leaf.kind(), LeafKind::Break))
}

/// Escape `&`, `<` and `>` for element bodies. The memchr fast path skips
/// over every span that needs no replacement.
fn push_escaped_body(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut last = 0;
    for position in memchr::memchr3_iter(b'&', b'<', b'>', bytes) {
        out.push_str(&text[last..position]);
        out.push_str(match bytes[position] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            _ => "&gt;",
        });
        last = position + 1;
    }
    out.push_str(&text[last..]);
}

/// Escape text for a double-quoted attribute value.
fn push_escaped_attr(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
