//! Property tests: the parser must terminate, close every block, and keep
//! the tree invariants for arbitrary inputs, including adversarial emphasis
//! runs, list-marker permutations, and truncated documents.

use inkdown::{Block, ContainerKind, ListKind};
use proptest::prelude::*;

fn assert_tree_invariants(document: &inkdown::Document) {
    for block in document.blocks() {
        assert!(!block.is_open(), "block left open after parse");

        let Block::Container(container) = block else {
            continue;
        };
        match container.kind() {
            ContainerKind::List(data) => {
                for child in container.children() {
                    let Block::Container(item) = child else {
                        panic!("list child is not a container");
                    };
                    let ContainerKind::ListItem(item_data) = item.kind() else {
                        panic!("list child is not a list item");
                    };
                    if data.kind != ListKind::Task {
                        assert!(!item_data.checked, "checked item outside a task list");
                    }
                }
            }
            ContainerKind::Table(data) => {
                if data.ncol > 0 {
                    assert_eq!(container.children().len() % data.ncol, 0);
                    assert_eq!(data.alignment.len(), data.ncol);
                }
            }
            _ => {
                // List items appear nowhere except directly under a list.
                for child in container.children() {
                    if let Block::Container(inner) = child {
                        assert!(!matches!(inner.kind(), ContainerKind::ListItem(_)));
                    }
                }
            }
        }
    }
}

fn marker_kind(marker: &str) -> ListKind {
    match marker {
        "1. " | "2. " => ListKind::Ordered,
        "- [ ] " | "- [x] " => ListKind::Task,
        _ => ListKind::Unordered,
    }
}

proptest! {
    #[test]
    fn emphasis_soup_never_panics(
        pieces in proptest::collection::vec(
            proptest::sample::select(vec![
                "**", "*", "_", "__", "***", "~", "`", "``", "[", "]", "(",
                ")", "!", "\\", "word", " ", "\n",
            ]),
            0..64,
        )
    ) {
        let input: String = pieces.concat();
        let document = inkdown::parse(&input);
        assert_tree_invariants(&document);
    }

    #[test]
    fn list_marker_permutations_switch_kinds_correctly(
        markers in proptest::collection::vec(
            proptest::sample::select(vec![
                "- ", "* ", "+ ", "1. ", "2. ", "- [ ] ", "- [x] ",
            ]),
            1..12,
        )
    ) {
        let input: String = markers
            .iter()
            .enumerate()
            .map(|(index, marker)| format!("{marker}item{index}\n"))
            .collect();
        let document = inkdown::parse(&input);
        assert_tree_invariants(&document);

        // Consecutive markers of the same kind merge into one list; a kind
        // switch forces a new one.
        let mut expected_lists = 0;
        let mut previous: Option<ListKind> = None;
        for marker in &markers {
            let kind = marker_kind(marker);
            if previous != Some(kind) {
                expected_lists += 1;
            }
            previous = Some(kind);
        }

        let actual_lists = document
            .children()
            .iter()
            .filter(|block| {
                matches!(
                    block,
                    Block::Container(container)
                        if matches!(container.kind(), ContainerKind::List(_))
                )
            })
            .count();
        prop_assert_eq!(expected_lists, actual_lists);

        // Every marker produced exactly one item somewhere.
        let total_items: usize = document
            .children()
            .iter()
            .filter_map(|block| match block {
                Block::Container(container)
                    if matches!(container.kind(), ContainerKind::List(_)) =>
                {
                    Some(container.children().len())
                }
                _ => None,
            })
            .sum();
        prop_assert_eq!(total_items, markers.len());
    }

    #[test]
    fn prefix_fuzz_always_terminates(cut in 0usize..400) {
        // ASCII only, so every cut lands on a char boundary.
        let text = "# Title\n\nintro **bold _nested_ tail\n\n> quote\n> > deeper\n\n- item one\n- item two\n  continued\n\n1. first\n2. second\n\n```rs\nlet x = 1;\n```\n\n| a | b |\n| - | - |\n| 1 | 2 |\n\nSee [docs](https://x.y) and <https://z.w> `code` end\n";
        let cut = cut.min(text.len());
        let document = inkdown::parse(&text[..cut]);
        assert_tree_invariants(&document);
    }

    #[test]
    fn styles_balance_at_flush(
        pieces in proptest::collection::vec(
            proptest::sample::select(vec!["**", "_", "~", "word", " "]),
            0..32,
        )
    ) {
        let input: String = pieces.concat();
        let document = inkdown::parse(&input);
        assert_tree_invariants(&document);

        // Rendering must terminate and produce text for every word that
        // went in, no matter how unbalanced the delimiters were.
        let html = inkdown::format::to_html(&document);
        let words_in = input.split_whitespace().filter(|w| w.contains("word")).count();
        if words_in > 0 {
            prop_assert!(html.contains("word"));
        }
    }
}
