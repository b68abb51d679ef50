use inkdown::format::{to_html, to_markdown};
use inkdown::{Document, MarkdownParser, ParserOptions};

#[allow(unused)]
pub fn parse(content: &str) -> Document {
    MarkdownParser::new(content, ParserOptions::default()).parse()
}

/// Test that the input parses and renders to the given HTML fragment.
#[allow(unused)]
pub fn run_html_test(input: &str, expected: &str) {
    let document = parse(input);
    let output = to_html(&document);

    assert_eq!(expected, output, "input:\n{input}");
}

/// Test that formatting and reparsing reproduces the original tree:
/// parse(format(parse(x))) must equal parse(x) structurally, and the
/// formatter must be idempotent on its own output.
#[allow(unused)]
pub fn run_roundtrip_test(input: &str) {
    let first = parse(input);
    let formatted = to_markdown(&first).expect("formatting failed");
    let second = parse(&formatted);

    assert_eq!(first, second, "formatted output:\n{formatted}");

    let reformatted = to_markdown(&second).expect("reformatting failed");
    assert_eq!(formatted, reformatted, "formatter is not idempotent");
}

macro_rules! html_test {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            crate::harness::run_html_test($input, $expected);
        }
    };
}

macro_rules! roundtrip_test {
    ($name:ident, $input:expr) => {
        #[test]
        fn $name() {
            crate::harness::run_roundtrip_test($input);
        }
    };
}

#[allow(unused)]
pub(crate) use html_test;
#[allow(unused)]
pub(crate) use roundtrip_test;
