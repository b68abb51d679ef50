use bitflags::bitflags;
use serde::Serialize;

use crate::source::SourceText;
use crate::token::Token;

/// A node in the Markdown document tree: either a container holding child
/// blocks, or a leaf holding raw tokens and, once closed, inline runs.
///
/// Blocks carry an `open` flag for the duration of the parse. The parser
/// reaches the current insertion point by descending the chain of open last
/// children from the Document root; there is no separate stack and no parent
/// pointers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Block {
    Container(Container),
    Leaf(Leaf),
}

impl Block {
    pub(crate) fn new_container(kind: ContainerKind) -> Self {
        Block::Container(Container {
            kind,
            children: Vec::new(),
            open: true,
        })
    }

    pub(crate) fn new_leaf(kind: LeafKind) -> Self {
        Block::Leaf(Leaf {
            kind,
            raw_tokens: Vec::new(),
            inlines: Vec::new(),
            open: true,
        })
    }

    pub fn is_open(&self) -> bool {
        match self {
            Block::Container(container) => container.open,
            Block::Leaf(leaf) => leaf.open,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Block::Container(container) => Some(container),
            Block::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Block::Container(_) => None,
            Block::Leaf(leaf) => Some(leaf),
        }
    }

    /// A pre-order traversal of this block and everything below it. The
    /// iterator keeps an explicit work stack, so arbitrarily deep trees do
    /// not recurse.
    pub fn iter(&self) -> BlockIter<'_> {
        BlockIter { stack: vec![self] }
    }
}

/// A block that holds other blocks and no text of its own.
#[derive(Clone, Debug, Serialize)]
pub struct Container {
    pub(crate) kind: ContainerKind,
    pub(crate) children: Vec<Block>,
    #[serde(skip)]
    pub(crate) open: bool,
}

impl Container {
    pub fn kind(&self) -> &ContainerKind {
        &self.kind
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }
}

// Structural equality: raw parser bookkeeping is excluded so that two parses
// of equivalent text compare equal.
impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.open == other.open && self.children == other.children
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ContainerKind {
    Document,
    Quote,
    List(ListData),
    ListItem(ListItemData),
    Table(TableData),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ListKind {
    Unordered,
    Ordered,
    Task,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListData {
    pub kind: ListKind,
    /// The number carried by the first item of an ordered list.
    pub start: usize,
    /// 0 for a tight list; 1 once a blank line has appeared inside the list.
    pub spacing: u8,
    /// Consecutive blank lines seen at the current position. Two in a row
    /// force the list closed.
    #[serde(skip)]
    pub(crate) pending_blanks: u8,
}

impl ListData {
    pub(crate) fn new(kind: ListKind, start: usize) -> Self {
        Self {
            kind,
            start,
            spacing: 0,
            pending_blanks: 0,
        }
    }
}

impl PartialEq for ListData {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.start == other.start && self.spacing == other.spacing
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ListItemData {
    /// Whether a task item's checkbox is ticked. Always false outside task
    /// lists.
    pub checked: bool,
    /// The column where the item's own content begins. Continuation lines
    /// must be indented at least this far to stay inside the item.
    #[serde(skip)]
    pub(crate) content_col: u32,
}

impl PartialEq for ListItemData {
    fn eq(&self, other: &Self) -> bool {
        self.checked == other.checked
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TableData {
    /// Number of columns, fixed by the header row. The table's children are
    /// its cells in row-major order, so `rows = children.len() / ncol`.
    pub ncol: usize,
    /// Per-column dash counts from the alignment separator row.
    pub relative_width: Vec<usize>,
    pub alignment: Vec<Alignment>,
    #[serde(skip)]
    pub(crate) rows_seen: usize,
}

impl PartialEq for TableData {
    fn eq(&self, other: &Self) -> bool {
        self.ncol == other.ncol
            && self.relative_width == other.relative_width
            && self.alignment == other.alignment
    }
}

/// A block that holds text: raw tokens while open, inline runs once closed.
#[derive(Clone, Debug, Serialize)]
pub struct Leaf {
    pub(crate) kind: LeafKind,
    #[serde(skip)]
    pub(crate) raw_tokens: Vec<Token>,
    pub(crate) inlines: Vec<Inline>,
    #[serde(skip)]
    pub(crate) open: bool,
}

impl Leaf {
    pub fn kind(&self) -> &LeafKind {
        &self.kind
    }

    /// The styled runs of this leaf. Empty until the leaf is closed.
    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    /// The tokens accumulated while the leaf was open. They stay valid for
    /// the lifetime of the tree.
    pub fn raw_tokens(&self) -> &[Token] {
        &self.raw_tokens
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.open == other.open && self.inlines == other.inlines
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LeafKind {
    /// An explicit blank line between sibling blocks.
    Break,
    Code(CodeData),
    Heading(HeadingData),
    Paragraph,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CodeData {
    /// The exact fence run that opened the block; the closing fence must
    /// match it byte for byte.
    pub opener: String,
    /// The language or directive keyword following the opening fence.
    /// Interpreted by renderers, never by the parser.
    pub tag: String,
    /// The verbatim interior, populated when the block closes.
    pub text: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct HeadingData {
    /// Heading level, 1 through 6.
    pub level: u8,
}

/// A styled run or object in a closed leaf's inline sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Inline {
    Text(Text),
    Codespan { content: String },
    Image { src: String, alt: Vec<Text> },
    Link { url: String, text: Vec<Text> },
    Autolink { url: String },
    Linebreak,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Text {
    pub style: TextStyle,
    pub content: String,
}

impl Text {
    pub(crate) fn new(style: TextStyle, content: String) -> Self {
        Self { style, content }
    }
}

bitflags! {
    /// The independent boolean attributes a text run can carry. The last
    /// four only have meaning to terminal renderers.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKE = 1 << 3;
        const BLINK = 1 << 4;
        const REVERSE = 1 << 5;
        const HIDE = 1 << 6;
        const FASTBLINK = 1 << 7;
    }
}

impl Serialize for StyleFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

/// The complete styling of a text run: attribute flags plus optional colors
/// from the terminal palette. The parser only ever touches the flags; colors
/// ride along for renderers and tooling.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub struct TextStyle {
    pub flags: StyleFlags,
    pub fg_color: Option<Color>,
    pub bg_color: Option<Color>,
}

impl TextStyle {
    pub fn bold(&self) -> bool {
        self.flags.contains(StyleFlags::BOLD)
    }

    pub fn italic(&self) -> bool {
        self.flags.contains(StyleFlags::ITALIC)
    }

    pub fn underline(&self) -> bool {
        self.flags.contains(StyleFlags::UNDERLINE)
    }

    pub fn strike(&self) -> bool {
        self.flags.contains(StyleFlags::STRIKE)
    }

    pub(crate) fn toggle(&mut self, flags: StyleFlags) {
        self.flags.toggle(flags);
    }
}

/// The named sixteen-color terminal palette.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// The result of a parse: the Document root block plus shared ownership of
/// the text it was parsed from, so raw token spans stay resolvable for the
/// lifetime of the tree.
#[derive(Clone, Debug, Serialize)]
pub struct Document {
    #[serde(skip)]
    source: SourceText,
    root: Block,
}

impl Document {
    pub(crate) fn new(source: SourceText, root: Block) -> Self {
        debug_assert!(
            matches!(
                &root,
                Block::Container(container) if container.kind == ContainerKind::Document
            ),
            "Document must be rooted at a Document container"
        );
        Self { source, root }
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Pre-order traversal over every block in the tree, root included.
    pub fn blocks(&self) -> BlockIter<'_> {
        self.root.iter()
    }

    /// The root's direct children, in document order.
    pub fn children(&self) -> &[Block] {
        match &self.root {
            Block::Container(container) => &container.children,
            Block::Leaf(_) => unreachable!("Document root is always a container"),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

pub struct BlockIter<'a> {
    stack: Vec<&'a Block>,
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.stack.pop()?;
        if let Block::Container(container) = block {
            self.stack.extend(container.children.iter().rev());
        }
        Some(block)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn style_toggle_is_an_involution() {
        let mut style = TextStyle::default();
        style.toggle(StyleFlags::BOLD | StyleFlags::ITALIC);
        assert!(style.bold() && style.italic());
        style.toggle(StyleFlags::ITALIC);
        assert!(style.bold() && !style.italic());
        style.toggle(StyleFlags::BOLD);
        assert_eq!(style, TextStyle::default());
    }

    #[test]
    fn iter_is_preorder() {
        let mut root = Block::new_container(ContainerKind::Document);
        let mut quote = Block::new_container(ContainerKind::Quote);
        if let Block::Container(q) = &mut quote {
            q.children.push(Block::new_leaf(LeafKind::Paragraph));
        }
        if let Block::Container(doc) = &mut root {
            doc.children.push(quote);
            doc.children.push(Block::new_leaf(LeafKind::Break));
        }

        let kinds: Vec<&str> = root
            .iter()
            .map(|block| match block {
                Block::Container(c) => match c.kind {
                    ContainerKind::Document => "document",
                    ContainerKind::Quote => "quote",
                    _ => "other",
                },
                Block::Leaf(l) => match l.kind {
                    LeafKind::Paragraph => "paragraph",
                    LeafKind::Break => "break",
                    _ => "other",
                },
            })
            .collect();

        assert_eq!(kinds, vec!["document", "quote", "paragraph", "break"]);
    }
}
