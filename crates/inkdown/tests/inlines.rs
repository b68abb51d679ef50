//! Inline content: emphasis pairing, links and images, autolinks, code
//! spans, escapes, and hard breaks.

mod harness;

use harness::parse;
use inkdown::{Block, Inline, StyleFlags};

fn paragraph_inlines(input: &str) -> Vec<Inline> {
    let document = parse(input);
    let Block::Leaf(leaf) = &document.children()[0] else {
        panic!("expected a leaf block for input {input:?}");
    };
    leaf.inlines().to_vec()
}

mod emphasis {
    use super::*;
    use crate::harness::html_test;

    html_test!(bold_stars, "**bold** text", "<p><strong>bold</strong> text</p>");
    html_test!(bold_underscores, "__bold__ text", "<p><strong>bold</strong> text</p>");
    html_test!(italic, "an _italic_ word", "<p>an <em>italic</em> word</p>");
    html_test!(underline, "a ~struck~ word", "<p>a <u>struck</u> word</p>");
    html_test!(
        embold_toggles_both,
        "***both*** plain",
        "<p><strong><em>both</em></strong> plain</p>"
    );
    html_test!(
        lone_star_toggles_bold,
        "a *b* c",
        "<p>a <strong>b</strong> c</p>"
    );
    html_test!(
        intra_word_underscore_is_literal,
        "foo_bar_baz",
        "<p>foo_bar_baz</p>"
    );
    html_test!(
        unmatched_delimiter_styles_the_tail,
        "plain **rest of line",
        "<p>plain <strong>rest of line</strong></p>"
    );

    #[test]
    fn nested_styles_layer_across_runs() {
        let inlines = paragraph_inlines("a **b _c_ d** e");
        let styles: Vec<StyleFlags> = inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text(text) => text.style.flags,
                other => panic!("unexpected inline {other:?}"),
            })
            .collect();
        assert_eq!(
            styles,
            vec![
                StyleFlags::empty(),
                StyleFlags::BOLD,
                StyleFlags::BOLD | StyleFlags::ITALIC,
                StyleFlags::BOLD,
                StyleFlags::empty(),
            ]
        );
    }
}

mod links {
    use super::*;
    use crate::harness::html_test;

    html_test!(
        link_and_image,
        "See [docs](https://x.y) and ![pic](a.png)",
        "<p>See <a href=\"https://x.y\">docs</a> and <img src=\"a.png\" alt=\"pic\" /></p>"
    );
    html_test!(
        gap_between_brackets_invalidates,
        "[text] (url)",
        "<p>[text] (url)</p>"
    );
    html_test!(
        unclosed_url_is_literal,
        "[text](url",
        "<p>[text](url</p>"
    );
    html_test!(
        styled_link_text,
        "[**bold** label](u)",
        "<p><a href=\"u\"><strong>bold</strong> label</a></p>"
    );
    html_test!(
        nested_bracket_in_alt_is_literal,
        "![a [b] c](s)",
        "<p>![a [b] c](s)</p>"
    );

    #[test]
    fn url_is_concatenated_verbatim(){
        let inlines = paragraph_inlines("[d](https://e.f/g?h=i&j=k)");
        assert!(matches!(
            &inlines[0],
            Inline::Link { url, .. } if url == "https://e.f/g?h=i&j=k"
        ));
    }

    #[test]
    fn newline_inside_link_invalidates_it() {
        let inlines = paragraph_inlines("[docs\n](url)");
        assert!(matches!(&inlines[0], Inline::Text(_)));
    }
}

mod autolinks {
    use super::*;
    use crate::harness::html_test;

    html_test!(
        absolute_uri,
        "go to <https://x.y> now",
        "<p>go to <a href=\"https://x.y\">https://x.y</a> now</p>"
    );
    html_test!(
        space_invalidates_autolink,
        "<not a link>",
        "<p>&lt;not a link&gt;</p>"
    );
    html_test!(
        missing_scheme_invalidates_autolink,
        "<nocolon>",
        "<p>&lt;nocolon&gt;</p>"
    );

    #[test]
    fn autolink_produces_a_dedicated_inline() {
        let inlines = paragraph_inlines("<mailto:a@b.c>");
        assert!(matches!(
            &inlines[0],
            Inline::Autolink { url } if url == "mailto:a@b.c"
        ));
    }
}

mod code_spans {
    use crate::harness::html_test;

    html_test!(
        simple_span,
        "use `f(x)` here",
        "<p>use <code>f(x)</code> here</p>"
    );
    html_test!(
        emphasis_inside_span_is_literal,
        "`not **bold**`",
        "<p><code>not **bold**</code></p>"
    );
    html_test!(
        unmatched_backtick_is_literal,
        "a ` b",
        "<p>a ` b</p>"
    );
    html_test!(
        span_content_is_escaped,
        "`<tag>`",
        "<p><code>&lt;tag&gt;</code></p>"
    );
}

mod breaks_and_escapes {
    use super::*;
    use crate::harness::html_test;

    html_test!(
        backslash_newline_is_a_hard_break,
        "one\\\ntwo",
        "<p>one<br />\ntwo</p>"
    );
    html_test!(
        backslash_escapes_emphasis,
        "\\*\\*not bold\\*\\*",
        "<p>**not bold**</p>"
    );
    html_test!(
        backslash_before_word_is_literal,
        "a \\b",
        "<p>a \\b</p>"
    );

    #[test]
    fn hard_break_splits_runs() {
        let inlines = paragraph_inlines("one\\\ntwo");
        assert_eq!(inlines.len(), 3);
        assert!(matches!(inlines[1], Inline::Linebreak));
    }
}
