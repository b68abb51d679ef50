//! Round-trip stability of the auto-formatter: parse(format(parse(x)))
//! must be structurally equal to parse(x), and formatting must be
//! idempotent on its own output.

mod harness;

use crate::harness::roundtrip_test;

roundtrip_test!(heading, "# Hello\n");
roundtrip_test!(
    heading_and_paragraphs,
    "## Head 2\n\nPara one.\nPara two.\n"
);
roundtrip_test!(nested_quotes, "> outer\n> > inner\n> back\n");
roundtrip_test!(quote_then_list, "> a\n- b\n");
roundtrip_test!(
    unordered_list_with_continuation,
    "- a\n- b\n  continued b\n- c\n"
);
roundtrip_test!(list_kind_switch, "1. one\n2. two\n- three\n");
roundtrip_test!(ordered_start, "5. five\n6. six\n");
roundtrip_test!(nested_list, "- a\n  - b\n- c\n");
roundtrip_test!(loose_list, "- a\n\n- b\n");
roundtrip_test!(task_list, "- [ ] milk\n- [x] eggs\n");
roundtrip_test!(adjacent_same_kind_lists, "- a\n\n\n- b\n");
roundtrip_test!(list_then_paragraph, "- a\n\nafter\n");
roundtrip_test!(fenced_code, "```zig\nfn main() {}\n```\n");
roundtrip_test!(fence_inside_quote, "> ```\n> code\n> ```\n");
roundtrip_test!(longer_fence, "````\n```\ninner\n````\n");
roundtrip_test!(emphasis, "a **b _c_ d** e\n");
roundtrip_test!(embold, "***both*** plain\n");
roundtrip_test!(intra_word_underscores, "foo_bar_baz\n");
roundtrip_test!(
    links_and_images,
    "See [docs](https://x.y) and ![pic](a.png)\n"
);
roundtrip_test!(styled_link_text, "[**bold** label](u)\n");
roundtrip_test!(autolink, "Visit <https://x.y> now\n");
roundtrip_test!(code_span, "use `f(x)` here\n");
roundtrip_test!(hard_break, "line one\\\nline two\n");
roundtrip_test!(escaped_stars, "\\*literal\\* stars\n");
roundtrip_test!(
    table,
    "| A | B |\n| :-: | --- |\n| 1 | 2 |\n"
);
roundtrip_test!(
    table_without_separator,
    "| x | y |\n| 1 | 2 |\n"
);
roundtrip_test!(
    mixed_document,
    "# T\n\nintro **bold** text\n\n- a\n- b\n\nEnd\n"
);
roundtrip_test!(
    quote_with_inner_structure,
    "> # head\n>\n> body\n"
);
roundtrip_test!(blank_runs, "a\n\n\n\nb\n");
