use autoheader::{
    AutoHeader, ErrorKind, LevelSpec, Options, RangeFault, RawOptions, RenderedDocument,
    Separator, options,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn engine(separator: Separator, levels: LevelSpec) -> AutoHeader {
    let scope = options::resolve(&levels).expect("levels");
    AutoHeader::new(
        Options::default()
            .with_separator(separator)
            .with_scope(scope)
            .with_debug(true),
    )
}

/// Labels produced by the text renderer, read back from the rewritten lines.
fn text_labels(engine: &AutoHeader, source: &str) -> Vec<String> {
    let (mut state, cleaned) = engine.parse_signifier_and_seed(source).expect("seed");
    let rendered = engine.render_text(&cleaned, &mut state);
    let document = RenderedDocument::parse(&rendered);
    document.headings().iter().map(|h| h.content.clone()).collect()
}

/// Labels produced by the tree renderer over the converted document.
fn tree_labels(engine: &AutoHeader, source: &str) -> Vec<String> {
    let (mut state, cleaned) = engine.parse_signifier_and_seed(source).expect("seed");
    let mut document = RenderedDocument::parse(&cleaned);
    engine.render_tree(document.headings_mut(), &mut state);
    document.headings().iter().map(|h| h.content.clone()).collect()
}

fn document(signifier: &str, levels: &[u8]) -> String {
    let mut source = format!("{signifier}\n");
    for (i, level) in levels.iter().enumerate() {
        source.push_str(&"#".repeat(usize::from(*level)));
        source.push_str(&format!(" Heading {i}\n\nBody text.\n\n"));
    }
    source
}

#[test]
fn outline_numbering_example() {
    let engine = engine(Separator::DASH, LevelSpec::default());
    let source = document("@autoHeader:1,1", &[1, 2, 2, 1, 2]);
    assert_eq!(
        text_labels(&engine, &source),
        vec![
            "1- Heading 0",
            "1-1- Heading 1",
            "1-2- Heading 2",
            "2- Heading 3",
            "2-1- Heading 4",
        ]
    );
}

#[test]
fn second_top_level_resets_deeper_levels() {
    let engine = engine(Separator::DASH, LevelSpec::default());
    let source = document("@autoHeader:1,1,1", &[1, 2, 3, 1, 2]);
    let labels = tree_labels(&engine, &source);
    assert_eq!(labels[4], "2-1- Heading 4");
}

#[test]
fn three_sibling_subtrees_restart_after_the_first() {
    let engine = engine(Separator::DECIMAL, LevelSpec::default());
    let source = document("<!-- autoHeader:4.2.5 -->", &[1, 2, 3, 1, 2, 3, 1, 2, 3, 3]);
    assert_eq!(
        tree_labels(&engine, &source),
        vec![
            "4. Heading 0",
            "4.2. Heading 1",
            "4.2.1. Heading 2",
            "5. Heading 3",
            "5.1. Heading 4",
            "5.1.1. Heading 5",
            "6. Heading 6",
            "6.1. Heading 7",
            "6.1.1. Heading 8",
            "6.1.2. Heading 9",
        ]
    );
}

#[test]
fn levels_outside_scope_never_get_labels() {
    let engine = engine(Separator::DECIMAL, LevelSpec::range(2, 3));
    let source = document("@autoHeader:1", &[1, 4, 2, 4, 4, 3, 5, 1, 2]);
    let labels = text_labels(&engine, &source);
    assert_eq!(labels[0], "Heading 0");
    assert_eq!(labels[1], "Heading 1");
    assert_eq!(labels[3], "Heading 3");
    assert_eq!(labels[4], "Heading 4");
    assert_eq!(labels[6], "Heading 6");
    assert_eq!(labels[7], "Heading 7");
    assert_eq!(labels[8], "2.1. Heading 8");
}

#[rstest]
#[case("@autoHeader:1", &[1, 2, 3, 4, 5, 6, 1, 6, 2])]
#[case("@autoHeader:3.2", &[2, 2, 1, 3, 3, 2, 1])]
#[case("@autoHeader:C.b", &[1, 2, 2, 1, 2, 3])]
#[case("<!-- autoHeader:9,9,9,9,9,9 -->", &[6, 5, 4, 3, 2, 1, 2, 3])]
fn text_and_tree_renderers_agree(#[case] signifier: &str, #[case] levels: &[u8]) {
    let engine = engine(Separator::DECIMAL, LevelSpec::default());
    let source = document(signifier, levels);
    assert_eq!(text_labels(&engine, &source), tree_labels(&engine, &source));
}

#[rstest]
#[case(".")]
#[case(")")]
#[case("*")]
#[case("_")]
#[case("`")]
#[case("<")]
#[case("&")]
#[case("~")]
fn sidebar_and_tree_paths_produce_identical_html(#[case] separator: &str) {
    let separator = Separator::parse(separator).expect("separator");
    let options = Options::default().with_separator(separator).with_debug(true);
    let source = document("@autoHeader:2,1", &[1, 2, 3, 2, 1, 2]);
    let sidebar = AutoHeader::new(options.clone().with_sidebar(true));
    let tree = AutoHeader::new(options);
    assert_eq!(
        sidebar.render_html(&source).unwrap(),
        tree.render_html(&source).unwrap()
    );
}

#[test]
fn single_token_pads_to_six_levels() {
    let engine = engine(Separator::DECIMAL, LevelSpec::max(6));
    let source = document("@autoHeader:2", &[1, 2, 3, 4, 5, 6]);
    assert_eq!(
        tree_labels(&engine, &source)[5],
        "2.1.1.1.1.1. Heading 5"
    );
}

#[test]
fn oversized_seed_is_rejected_not_overflowed() {
    let engine = engine(Separator::DECIMAL, LevelSpec::default());
    let err = engine
        .render_markdown("@autoHeader:9223372036854775807\n# A\n# B\n")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedSignifier);

    let quiet = AutoHeader::new(Options::default());
    let source = "@autoHeader:9223372036854775807\n# A\n# B\n";
    assert_eq!(quiet.render_markdown(source).unwrap(), source);
}

#[test]
fn mixed_signifier_is_malformed() {
    let engine = engine(Separator::DECIMAL, LevelSpec::default());
    let err = engine
        .parse_signifier_and_seed("@autoHeader:1,A\n# A\n")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedSignifier);
}

#[test]
fn inverted_levels_are_rejected() {
    let raw: RawOptions = toml::from_str("levels = { start = 3, finish = 2 }").unwrap();
    let err = Options::resolve(Some(&raw)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidLevelRange(RangeFault::Inverted));
}

#[rstest]
#[case::missing_signifier("# A\n## B\n")]
#[case::malformed_signifier("@autoHeader:1,A\n# A\n## B\n")]
#[case::mismatched_separator("@autoHeader:1-1\n# A\n## B\n")]
fn failures_without_debug_leave_input_untouched(#[case] source: &str) {
    let engine = AutoHeader::new(Options::default());
    assert_eq!(engine.render_markdown(source).unwrap(), source);

    let mut run = engine.document();
    let markdown = run.before_each(source).unwrap();
    assert_eq!(markdown, source);
    let mut document = RenderedDocument::parse(&markdown);
    let before = document.headings().to_vec();
    run.after_each(document.headings_mut()).unwrap();
    assert_eq!(document.headings(), before.as_slice());
}

#[test]
fn invalid_configuration_without_debug_is_swallowed() {
    let raw: RawOptions = toml::from_str("levels = { start = 3, finish = 2 }").unwrap();
    assert!(AutoHeader::configure(Some(&raw)).unwrap().is_none());
}

#[test]
fn documents_do_not_share_counters() {
    let engine = engine(Separator::DECIMAL, LevelSpec::default());
    let source = document("@autoHeader:1", &[1, 1]);
    let first = engine.render_markdown(&source).unwrap();
    let second = engine.render_markdown(&source).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("# 2. Heading 1"));
}
