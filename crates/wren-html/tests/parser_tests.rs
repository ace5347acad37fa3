//! Integration tests for the HTML parser.

use wren_dom::DomTree;
use wren_html::{HtmlParser, parse, parse_with_issues};

/// Helper to parse HTML without html/head/body insertion
fn parse_fragment(html: &str) -> DomTree {
    HtmlParser::new(html).with_implicit_tags(false).run()
}

#[test]
fn test_implicit_html_and_body() {
    let tree = parse("<p>Hello</p>");
    assert_eq!(
        tree.document_html(),
        "<html><body><p>Hello</p></body></html>"
    );
}

#[test]
fn test_head_and_body_are_separated() {
    let tree = parse("<title>Title</title><p>Hello</p>");
    assert_eq!(
        tree.document_html(),
        "<html><head><title>Title</title></head><body><p>Hello</p></body></html>"
    );
}

#[test]
fn test_bare_text_goes_into_html() {
    let tree = parse("Hello world");
    assert_eq!(tree.document_html(), "<html>Hello world</html>");
}

#[test]
fn test_explicit_skeleton_is_kept() {
    let html = "<!doctype html>\n<html>\n<head><title>T</title></head>\n<body>x</body>\n</html>\n";
    let (tree, warnings) = parse_with_issues(html);
    assert_eq!(
        tree.document_html(),
        "<html><head><title>T</title></head><body>x</body></html>"
    );
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn test_empty_document_still_has_root() {
    assert_eq!(parse("").document_html(), "<html></html>");
}

#[test]
fn test_paragraph_renesting() {
    let tree = parse_fragment("<div><p>Hello<p>World!</p></div>");
    assert_eq!(tree.document_html(), "<div><p>Hello</p><p>World!</p></div>");
}

#[test]
fn test_paragraph_renesting_duplicates_inline_ancestors() {
    let tree = parse_fragment("<div><p><b>Hello<p>World!</b></p></div>");
    assert_eq!(
        tree.document_html(),
        "<div><p><b>Hello</b></p><p><b>World!</b></p></div>"
    );
}

#[test]
fn test_reopened_elements_keep_attributes() {
    let tree = parse_fragment(r#"<div><p><i class="x">one<p>two</p></div>"#);
    assert_eq!(
        tree.document_html(),
        r#"<div><p><i class="x">one</i></p><p><i class="x">two</i></p></div>"#
    );
}

#[test]
fn test_content_after_closed_root_reenters_it() {
    let (tree, warnings) = HtmlParser::new("<b>a</b><i>b</i>")
        .with_implicit_tags(false)
        .run_with_issues();
    assert_eq!(tree.document_html(), "<b>a<i>b</i></b>");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_nested_lists_are_not_broken() {
    let html = "<ul><li>one<ol><li>nested</li></ol></li></ul>";
    assert_eq!(parse_fragment(html).document_html(), html);
}

#[test]
fn test_sibling_list_items() {
    let tree = parse_fragment("<ul><li>one<li>two</li></ul>");
    assert_eq!(tree.document_html(), "<ul><li>one</li><li>two</li></ul>");
}

#[test]
fn test_comments_are_dropped() {
    let tree = parse_fragment("<p>Hello<!-- a comment with a tag: <p> --></p>");
    assert_eq!(tree.document_html(), "<p>Hello</p>");
}

#[test]
fn test_unterminated_comment_consumes_rest() {
    let (tree, warnings) =
        HtmlParser::new("<p>Hi<!-- <b>never</b>").with_implicit_tags(false).run_with_issues();
    assert_eq!(tree.document_html(), "<p>Hi</p>");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_script_body_is_raw_text() {
    let html = "<script>x < 5 && x > 0</script>";
    assert_eq!(parse_fragment(html).document_html(), html);
}

#[test]
fn test_script_may_contain_other_closing_tags() {
    let html = "<script>document.write('</p><b>')</script>";
    assert_eq!(parse_fragment(html).document_html(), html);
}

#[test]
fn test_style_closing_tag_is_case_insensitive() {
    let tree = parse_fragment("<div><style>p > b { }</STYLE>after</div>");
    assert_eq!(
        tree.document_html(),
        "<div><style>p > b { }</style>after</div>"
    );
}

#[test]
fn test_script_goes_into_head() {
    let tree = parse("<script>go()</script><p>x</p>");
    assert_eq!(
        tree.document_html(),
        "<html><head><script>go()</script></head><body><p>x</p></body></html>"
    );
}

#[test]
fn test_declarations_are_ignored() {
    let tree = parse_fragment("<!DOCTYPE html><p>x</p>");
    assert_eq!(tree.document_html(), "<p>x</p>");
}

#[test]
fn test_stray_less_than_is_text() {
    let tree = parse_fragment("<p>1 < 2 and a <3 b</p>");
    assert_eq!(tree.document_html(), "<p>1 < 2 and a <3 b</p>");
}

#[test]
fn test_attribute_forms() {
    let tree = parse_fragment(r#"<a HREF="x y" target='_blank' id=main disabled>go</a>"#);
    assert_eq!(
        tree.document_html(),
        r#"<a disabled="" href="x y" id="main" target="_blank">go</a>"#
    );
}

#[test]
fn test_unquoted_value_stops_at_tag_end() {
    let tree = parse_fragment("<a href=/home>go</a>");
    let root = tree.root().unwrap();
    assert_eq!(
        tree.as_element(root).unwrap().attrs.get("href").map(String::as_str),
        Some("/home")
    );
}

#[test]
fn test_escaped_quote_in_value_is_passed_through() {
    let tree = parse_fragment(r#"<a title="say \"hi\"">x</a>"#);
    let root = tree.root().unwrap();
    assert_eq!(
        tree.as_element(root).unwrap().attrs.get("title").map(String::as_str),
        Some(r#"say \"hi\""#)
    );
}

#[test]
fn test_self_closing_tags() {
    let tree = parse_fragment("<p>a<br>b<img src=x.png/>c</p>");
    assert_eq!(
        tree.document_html(),
        r#"<p>a<br></br>b<img src="x.png/"></img>c</p>"#
    );
}

#[test]
fn test_self_closing_slash_before_end() {
    let tree = parse_fragment("<p>a<br/>b<hr />c</p>");
    assert_eq!(tree.document_html(), "<p>a<br></br>b<hr></hr>c</p>");
}

#[test]
fn test_tag_names_are_lowercased() {
    let tree = parse_fragment("<DIV><B>x</b></Div>");
    assert_eq!(tree.document_html(), "<div><b>x</b></div>");
}

#[test]
fn test_whitespace_only_text_is_dropped() {
    let tree = parse_fragment("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
    assert_eq!(tree.document_html(), "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn test_text_keeps_surrounding_whitespace() {
    let tree = parse_fragment("<p> a  b </p>");
    assert_eq!(tree.document_html(), "<p> a  b </p>");
}

#[test]
fn test_multibyte_text() {
    let tree = parse_fragment("<p>héllo 😀 wörld</p>");
    assert_eq!(tree.document_html(), "<p>héllo 😀 wörld</p>");
}

#[test]
fn test_unterminated_tag_at_end_of_input() {
    let (tree, warnings) = HtmlParser::new(r#"<p class="x"#)
        .with_implicit_tags(false)
        .run_with_issues();
    assert_eq!(tree.document_html(), r#"<p class="x"></p>"#);
    assert_eq!(warnings.len(), 2);
}

#[test]
fn test_mismatched_close_warns() {
    let (tree, warnings) = HtmlParser::new("<p><b>x</p></b>")
        .with_implicit_tags(false)
        .run_with_issues();
    assert_eq!(tree.document_html(), "<p><b>x</b></p>");
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].message.contains("<b>"));
}

#[test]
fn test_implicit_insertions_are_reported() {
    let (_, warnings) = parse_with_issues("<p>Hello</p>");
    let messages: Vec<_> = warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "implicitly opening <html> ahead of <p>",
            "implicitly opening <body> ahead of <p>",
        ]
    );
}
