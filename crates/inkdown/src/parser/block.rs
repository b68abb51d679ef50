//! The line-oriented block machine.
//!
//! Each line of the token stream is offered to the tree's currently open
//! branch, rooted at the Document. Containers first strip their own
//! continuation marker and delegate the rest to their last open child,
//! falling back to opening new blocks when delegation fails; leaves either
//! absorb the line or reject it, in which case their parent closes them and
//! retries. Unrecognized structure is never an error: whatever no other rule
//! claims becomes paragraph text.

use log::{debug, trace};

use crate::ast::{
    Alignment, Block, CodeData, Container, ContainerKind, HeadingData, Leaf, LeafKind, ListData,
    ListItemData, TableData,
};
use crate::syntax::TokenKind;
use crate::token::Token;

use super::line::{Line, ListMarker, DISPATCH_WIGGLE};
use super::{inline, ParseContext};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LineResult {
    Consumed,
    Rejected,
}

/// Offer one line to `block`. Containers dispatch on their continuation
/// rules; leaves on their absorption rules.
pub(crate) fn handle_line(ctx: &ParseContext, block: &mut Block, line: Line) -> LineResult {
    match block {
        Block::Container(container) => match &container.kind {
            ContainerKind::Document => {
                handle_in_children(ctx, container, line);
                LineResult::Consumed
            }
            ContainerKind::Quote => handle_quote(ctx, container, line),
            ContainerKind::List(_) => handle_list(ctx, container, line),
            ContainerKind::ListItem(_) => handle_list_item(ctx, container, line),
            ContainerKind::Table(_) => handle_table(ctx, container, line),
        },
        Block::Leaf(leaf) => handle_leaf(ctx, leaf, line),
    }
}

/// Document-style handling shared by every container interior: delegate to
/// the last open child, close it if it refuses, and open whatever block the
/// remaining line calls for.
fn handle_in_children(ctx: &ParseContext, container: &mut Container, line: Line) {
    if let Some(child) = container.children.last_mut() {
        if child.is_open() {
            match handle_line(ctx, child, line) {
                LineResult::Consumed => return,
                LineResult::Rejected => close_block(ctx, child),
            }
        }
    }
    dispatch_new_block(ctx, container, line);
}

fn handle_quote(ctx: &ParseContext, container: &mut Container, line: Line) -> LineResult {
    if let Some(rest) = line.strip_quote_marker() {
        handle_in_children(ctx, container, rest);
        return LineResult::Consumed;
    }

    // Lazy continuation: the markerless line may still extend the deepest
    // open paragraph. Blank lines and block starts fail there and close the
    // quote through the parent.
    match container.children.last_mut() {
        Some(child) if child.is_open() => lazy_continue(ctx, child, line),
        _ => LineResult::Rejected,
    }
}

fn handle_list(ctx: &ParseContext, container: &mut Container, line: Line) -> LineResult {
    if line.is_blank() {
        {
            let ContainerKind::List(data) = &mut container.kind else {
                unreachable!("handle_list dispatched on a non-list container");
            };
            if data.pending_blanks >= 1 {
                // Two consecutive blank lines close the list.
                return LineResult::Rejected;
            }
            data.pending_blanks += 1;
            data.spacing = data.spacing.max(1);
        }
        if let Some(item) = container.children.last_mut() {
            if item.is_open() {
                handle_line(ctx, item, line);
            }
        }
        return LineResult::Consumed;
    }

    {
        let ContainerKind::List(data) = &mut container.kind else {
            unreachable!("handle_list dispatched on a non-list container");
        };
        data.pending_blanks = 0;
    }

    // A line indented to the open item's content column continues that item,
    // even when it looks like a marker; that is how nested lists form.
    if let Some(content_col) = open_item_content_col(container) {
        if line.leading_cols() >= content_col {
            let item = container
                .children
                .last_mut()
                .expect("open item disappeared");
            return handle_line(ctx, item, line);
        }
    }

    if let Some(marker) = line.list_marker() {
        let ContainerKind::List(data) = &container.kind else {
            unreachable!("handle_list dispatched on a non-list container");
        };
        if marker.kind == data.kind {
            open_list_item(ctx, container, marker, line);
            return LineResult::Consumed;
        }
        // A marker of the wrong kind closes this list; the parent retries.
        return LineResult::Rejected;
    }

    match container.children.last_mut() {
        Some(item) if item.is_open() => lazy_continue(ctx, item, line),
        _ => LineResult::Rejected,
    }
}

fn handle_list_item(ctx: &ParseContext, container: &mut Container, line: Line) -> LineResult {
    let ContainerKind::ListItem(data) = &container.kind else {
        unreachable!("handle_list_item dispatched on a non-item container");
    };
    let content_col = data.content_col;

    if line.is_blank() {
        // A blank inside an item closes its open paragraph but leaves the
        // item itself open. Open code fences keep absorbing blanks verbatim,
        // and nested lists run their own blank accounting.
        if let Some(child) = container.children.last_mut() {
            if child.is_open() && handle_line(ctx, child, line) == LineResult::Rejected {
                close_block(ctx, child);
            }
        }
        return LineResult::Consumed;
    }

    if line.leading_cols() >= content_col {
        handle_in_children(ctx, container, line.strip_indent(content_col));
        return LineResult::Consumed;
    }

    match container.children.last_mut() {
        Some(child) if child.is_open() => lazy_continue(ctx, child, line),
        _ => LineResult::Rejected,
    }
}

fn handle_table(ctx: &ParseContext, container: &mut Container, line: Line) -> LineResult {
    if line.starts_table() {
        absorb_table_row(ctx, container, line);
        return LineResult::Consumed;
    }
    LineResult::Rejected
}

fn handle_leaf(ctx: &ParseContext, leaf: &mut Leaf, line: Line) -> LineResult {
    if !leaf.open {
        return LineResult::Rejected;
    }

    match &leaf.kind {
        LeafKind::Paragraph => {
            if paragraph_accepts(line) {
                leaf.raw_tokens.extend_from_slice(line.tokens());
                LineResult::Consumed
            } else {
                LineResult::Rejected
            }
        }
        LeafKind::Code(_) => {
            let closes = {
                let LeafKind::Code(data) = &leaf.kind else {
                    unreachable!();
                };
                line.closing_fence_token()
                    .is_some_and(|token| line.text_of(token) == data.opener)
            };
            if closes {
                // The closing fence line is consumed but never stored.
                close_leaf(ctx, leaf);
            } else {
                leaf.raw_tokens.extend_from_slice(line.tokens());
            }
            LineResult::Consumed
        }
        // Headings and breaks are single-line leaves and close on creation;
        // an open one can never see a second line.
        LeafKind::Heading(_) | LeafKind::Break => LineResult::Rejected,
    }
}

/// Continuation-only delegation for a line that carries none of its
/// ancestors' markers: descend the open chain and extend the deepest open
/// paragraph, or fail without side effects.
fn lazy_continue(ctx: &ParseContext, block: &mut Block, line: Line) -> LineResult {
    match block {
        Block::Container(container) if container.open => match container.children.last_mut() {
            Some(child) if child.is_open() => lazy_continue(ctx, child, line),
            _ => LineResult::Rejected,
        },
        Block::Leaf(leaf) if leaf.open && matches!(leaf.kind, LeafKind::Paragraph) => {
            if paragraph_accepts(line) {
                leaf.raw_tokens.extend_from_slice(line.tokens());
                LineResult::Consumed
            } else {
                LineResult::Rejected
            }
        }
        _ => LineResult::Rejected,
    }
}

fn paragraph_accepts(line: Line) -> bool {
    !line.is_blank() && !line.is_block_start()
}

fn open_item_content_col(container: &Container) -> Option<u32> {
    match container.children.last() {
        Some(Block::Container(item)) if item.open => match &item.kind {
            ContainerKind::ListItem(data) => Some(data.content_col),
            _ => None,
        },
        _ => None,
    }
}

/// Open the block the head of a bare line calls for. Ancestor markers have
/// already been stripped; up to two columns of leading whitespace are
/// tolerated and removed here. Anything unclaimed becomes a paragraph.
fn dispatch_new_block(ctx: &ParseContext, parent: &mut Container, line: Line) {
    if line.is_empty() {
        return;
    }

    if line.is_blank() {
        parent
            .children
            .push(closed_leaf(ctx, LeafKind::Break, line.tokens()));
        return;
    }

    if ctx.verbose {
        if let Some(first) = line.tokens().first() {
            debug!(
                "dispatching new block at row {} col {}",
                first.location().row,
                first.location().col
            );
        }
    }

    if let Some(rest) = line.strip_quote_marker() {
        let mut quote = Block::new_container(ContainerKind::Quote);
        if let Block::Container(container) = &mut quote {
            if !rest.is_empty() {
                handle_in_children(ctx, container, rest);
            }
        }
        parent.children.push(quote);
        return;
    }

    if let Some(marker) = line.list_marker() {
        let mut list =
            Block::new_container(ContainerKind::List(ListData::new(marker.kind, marker.start)));
        if let Block::Container(container) = &mut list {
            open_list_item(ctx, container, marker, line);
        }
        parent.children.push(list);
        return;
    }

    if let Some(heading) = line.atx_heading() {
        let mut content = &line.tokens()[heading.content_start.min(line.tokens().len())..];
        if let [rest @ .., last] = content {
            if last.kind() == TokenKind::Break {
                content = rest;
            }
        }
        // A heading is a single-line leaf: it closes as soon as it has
        // absorbed its content.
        parent.children.push(closed_leaf(
            ctx,
            LeafKind::Heading(HeadingData {
                level: heading.level,
            }),
            content,
        ));
        return;
    }

    if let Some(index) = line.fence_open() {
        let fence = &line.tokens()[index];
        let tag_tokens = line.tokens()[index + 1..]
            .iter()
            .take_while(|token| token.kind() != TokenKind::Break);
        let mut tag = String::new();
        for token in tag_tokens {
            tag.push_str(line.text_of(token));
        }
        parent.children.push(Block::new_leaf(LeafKind::Code(CodeData {
            opener: line.text_of(fence).to_string(),
            tag: tag.trim().to_string(),
            text: String::new(),
        })));
        return;
    }

    if line.starts_table() {
        let mut table = Block::new_container(ContainerKind::Table(TableData::default()));
        if let Block::Container(container) = &mut table {
            absorb_table_row(ctx, container, line);
        }
        parent.children.push(table);
        return;
    }

    let trimmed = line.strip_leading_ws_up_to(DISPATCH_WIGGLE);
    let mut paragraph = Block::new_leaf(LeafKind::Paragraph);
    if let Block::Leaf(leaf) = &mut paragraph {
        leaf.raw_tokens.extend_from_slice(trimmed.tokens());
    }
    parent.children.push(paragraph);
}

/// Close the previous item, open a fresh one for `marker`, and feed it the
/// remainder of the line.
fn open_list_item(ctx: &ParseContext, list: &mut Container, marker: ListMarker, line: Line) {
    if let Some(previous) = list.children.last_mut() {
        close_block(ctx, previous);
    }

    let mut item = Block::new_container(ContainerKind::ListItem(ListItemData {
        checked: marker.checked,
        content_col: marker.content_col,
    }));
    if let Block::Container(container) = &mut item {
        let rest = line.advance(marker.tokens_consumed);
        if !rest.is_empty() {
            handle_in_children(ctx, container, rest);
        }
    }
    list.children.push(item);
}

/// Split a `|`-delimited row into cells and append them as closed Paragraph
/// leaves. The first row fixes the column count; a second row made of `-`,
/// `:` and whitespace becomes the alignment separator instead of cells.
fn absorb_table_row(ctx: &ParseContext, container: &mut Container, line: Line) {
    let line = line.strip_leading_ws_up_to(DISPATCH_WIGGLE);

    let mut cells: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut started = false;
    let mut previous = TokenKind::Eof;
    for token in line.tokens() {
        match token.kind() {
            TokenKind::Break => break,
            // A pipe preceded by a backslash is cell content, handled by the
            // inline escape rules.
            TokenKind::Pipe if previous != TokenKind::Bslash => {
                if started {
                    cells.push(std::mem::take(&mut current));
                } else {
                    started = true;
                }
            }
            _ if started => current.push(*token),
            _ => {}
        }
        previous = token.kind();
    }
    // A row without a trailing pipe still ends its last cell.
    if current.iter().any(|token| !token.kind().is_whitespace()) {
        cells.push(current);
    }
    for cell in &mut cells {
        trim_cell(cell);
    }

    {
        let ContainerKind::Table(data) = &mut container.kind else {
            unreachable!("absorb_table_row dispatched on a non-table container");
        };
        data.rows_seen += 1;

        if data.rows_seen == 1 {
            data.ncol = cells.len();
            data.alignment = vec![Alignment::Left; cells.len()];
            data.relative_width = vec![3; cells.len()];
        } else if data.rows_seen == 2 && is_separator_row(ctx, &cells) {
            for (index, cell) in cells.iter().take(data.ncol).enumerate() {
                let (alignment, width) = separator_cell(ctx, cell);
                data.alignment[index] = alignment;
                data.relative_width[index] = width;
            }
            return;
        }
    }

    let ncol = {
        let ContainerKind::Table(data) = &container.kind else {
            unreachable!();
        };
        data.ncol
    };
    cells.truncate(ncol);
    while cells.len() < ncol {
        cells.push(Vec::new());
    }
    for cell in cells {
        let block = closed_leaf(ctx, LeafKind::Paragraph, &cell);
        container.children.push(block);
    }
}

fn trim_cell(cell: &mut Vec<Token>) {
    while cell
        .last()
        .is_some_and(|token| token.kind().is_whitespace())
    {
        cell.pop();
    }
    let leading = cell
        .iter()
        .take_while(|token| token.kind().is_whitespace())
        .count();
    cell.drain(..leading);
}

fn is_separator_row(ctx: &ParseContext, cells: &[Vec<Token>]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            let mut has_dash = false;
            let valid = cell.iter().all(|token| match token.kind() {
                TokenKind::Minus => {
                    has_dash = true;
                    true
                }
                TokenKind::Space | TokenKind::Indent => true,
                TokenKind::Word => token.text(ctx.source) == ":",
                _ => false,
            });
            valid && has_dash
        })
}

fn separator_cell(ctx: &ParseContext, cell: &[Token]) -> (Alignment, usize) {
    let is_colon =
        |token: &Token| token.kind() == TokenKind::Word && token.text(ctx.source) == ":";
    let leading = cell.first().is_some_and(is_colon);
    let trailing = cell.len() > 1 && cell.last().is_some_and(is_colon);
    let width = cell
        .iter()
        .filter(|token| token.kind() == TokenKind::Minus)
        .count()
        .max(1);

    let alignment = match (leading, trailing) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        _ => Alignment::Left,
    };
    (alignment, width)
}

/// Build a leaf that absorbs `tokens` and closes immediately.
fn closed_leaf(ctx: &ParseContext, kind: LeafKind, tokens: &[Token]) -> Block {
    let mut block = Block::new_leaf(kind);
    if let Block::Leaf(leaf) = &mut block {
        leaf.raw_tokens.extend_from_slice(tokens);
        close_leaf(ctx, leaf);
    }
    block
}

/// Close `block` and everything still open below it, post-order. Closing an
/// already-closed block is a no-op.
pub(crate) fn close_block(ctx: &ParseContext, block: &mut Block) {
    match block {
        Block::Container(container) => close_container(ctx, container),
        Block::Leaf(leaf) => close_leaf(ctx, leaf),
    }
}

fn close_container(ctx: &ParseContext, container: &mut Container) {
    if !container.open {
        return;
    }
    // Only the last child of an open container can still be open.
    if let Some(child) = container.children.last_mut() {
        close_block(ctx, child);
    }
    if matches!(container.kind, ContainerKind::Table(_)) {
        finalize_table(ctx, container);
    }
    container.open = false;
    trace!("closed container with {} children", container.children.len());
}

/// The close transition for a leaf: code blocks concatenate their raw text
/// verbatim, everything else runs the inline machine. Inline runs are
/// populated exactly once.
pub(crate) fn close_leaf(ctx: &ParseContext, leaf: &mut Leaf) {
    if !leaf.open {
        return;
    }
    match &mut leaf.kind {
        LeafKind::Code(data) => {
            let mut text = String::new();
            for token in &leaf.raw_tokens {
                text.push_str(token.text(ctx.source));
            }
            data.text = text;
        }
        LeafKind::Break => {}
        LeafKind::Heading(_) | LeafKind::Paragraph => {
            leaf.inlines = inline::parse_inline(ctx.source, &leaf.raw_tokens);
        }
    }
    leaf.open = false;
}

/// Pad the cell list so every row has exactly `ncol` cells.
fn finalize_table(ctx: &ParseContext, container: &mut Container) {
    let ncol = {
        let ContainerKind::Table(data) = &container.kind else {
            unreachable!();
        };
        data.ncol
    };
    if ncol == 0 {
        return;
    }
    while container.children.len() % ncol != 0 {
        container
            .children
            .push(closed_leaf(ctx, LeafKind::Paragraph, &[]));
    }
}
