//! Integration tests for the layout engine.

use std::cell::Cell;

use quickcheck_macros::quickcheck;
use wren_layout::{
    ApproximateMetrics, DisplayContent, DisplayList, FontKey, FontMetrics, LayoutEngine,
    LayoutOptions, LineElement, MetricsError, TextExtent, flatten, layout,
};

/// Every non-whitespace glyph advances `advance` pixels; spaces are free.
/// Ascent equals the font size and descent is a quarter of it, so a 16pt
/// line advances `round(16 * 1.25) + 4 = 24` pixels.
struct FixedMetrics {
    advance: i32,
    ascent_calls: Cell<usize>,
}

impl FixedMetrics {
    fn new(advance: i32) -> Self {
        Self {
            advance,
            ascent_calls: Cell::new(0),
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn measure(&self, text: &str, size: u32) -> Result<TextExtent, MetricsError> {
        if size == 0 {
            return Err(MetricsError::UnsupportedSize(size));
        }
        let glyphs = text.chars().filter(|c| !c.is_whitespace()).count() as i32;
        Ok(TextExtent {
            width: glyphs * self.advance,
            height: size as i32 + size as i32 / 4,
        })
    }

    fn ascent(&self, size: u32) -> Result<i32, MetricsError> {
        self.ascent_calls.set(self.ascent_calls.get() + 1);
        if size == 0 {
            return Err(MetricsError::UnsupportedSize(size));
        }
        Ok(size as i32)
    }

    fn descent(&self, size: u32) -> Result<i32, MetricsError> {
        Ok(size as i32 / 4)
    }
}

const LINE_16: i32 = 24;

fn word(text: &str, font_size: u32) -> LineElement {
    LineElement::Word {
        text: text.to_string(),
        italic: false,
        bold: false,
        superscript: false,
        font_size,
    }
}

fn sup(text: &str, font_size: u32) -> LineElement {
    LineElement::Word {
        text: text.to_string(),
        italic: false,
        bold: false,
        superscript: true,
        font_size,
    }
}

fn emoji() -> LineElement {
    LineElement::Emoji {
        code: "1F600".to_string(),
    }
}

fn options(width: i32) -> LayoutOptions {
    LayoutOptions {
        width,
        ..LayoutOptions::default()
    }
}

/// Helper to get (x, y) of every item
fn positions(list: &DisplayList) -> Vec<(i32, i32)> {
    list.items().iter().map(|item| (item.x, item.y)).collect()
}

#[test]
fn test_forced_break_every_k_words() {
    let metrics = FixedMetrics::new(10);
    let elements: Vec<_> = (0..7).map(|_| word("x", 16)).collect();
    let list = layout(&elements, options(30), &metrics);

    assert_eq!(
        positions(&list),
        [
            (0, 0),
            (10, 0),
            (20, 0),
            (0, LINE_16),
            (10, LINE_16),
            (20, LINE_16),
            (0, 2 * LINE_16),
        ]
    );
    assert_eq!(list.max_y(), 3 * LINE_16);
}

#[quickcheck]
fn prop_max_y_counts_lines(n: u8, k: u8) -> bool {
    let n = usize::from(n % 60) + 1;
    let k = usize::from(k % 12) + 1;
    let metrics = FixedMetrics::new(10);
    let elements: Vec<_> = (0..n).map(|_| word("x", 16)).collect();
    let list = layout(&elements, options(k as i32 * 10), &metrics);
    let lines = n.div_ceil(k) as i32;
    list.max_y() == lines * LINE_16 && list.len() == n
}

#[quickcheck]
fn prop_words_start_inside_width_unless_first(lengths: Vec<u8>, width: u8) -> bool {
    let width = i32::from(width) + 1;
    let metrics = ApproximateMetrics;
    let elements: Vec<_> = lengths
        .iter()
        .map(|&len| word(&"m".repeat(usize::from(len % 12) + 1), 16))
        .collect();
    let list = layout(&elements, options(width), &metrics);
    list.items()
        .iter()
        .all(|item| item.x == 0 || item.x + item.width <= width)
}

#[test]
fn test_word_that_does_not_fit_moves_to_next_line() {
    let metrics = FixedMetrics::new(10);
    let list = layout(&[word("ab", 16), word("cd", 16)], options(25), &metrics);
    assert_eq!(positions(&list), [(0, 0), (0, LINE_16)]);
}

#[test]
fn test_overlong_word_is_placed_alone() {
    let metrics = FixedMetrics::new(10);
    let list = layout(
        &[word("a", 16), word("toolongword", 16), word("b", 16)],
        options(50),
        &metrics,
    );
    assert_eq!(
        positions(&list),
        [(0, 0), (0, LINE_16), (0, 2 * LINE_16)]
    );
}

#[test]
fn test_words_are_separated_by_a_space() {
    let metrics = ApproximateMetrics;
    let list = layout(&[word("a", 10), word("b", 10)], options(800), &metrics);
    // 0.6 * 10 for the glyph plus the same again for the space.
    assert_eq!(positions(&list), [(0, 0), (12, 0)]);
}

#[test]
fn test_paragraph_break_doubles_advance() {
    let metrics = FixedMetrics::new(10);
    let list = layout(
        &[word("a", 16), LineElement::paragraph_break(), word("b", 16)],
        options(800),
        &metrics,
    );
    assert_eq!(positions(&list), [(0, 0), (0, 2 * LINE_16)]);
    assert_eq!(list.max_y(), 3 * LINE_16);
}

#[test]
fn test_break_on_empty_line_uses_base_font() {
    let metrics = FixedMetrics::new(10);
    let list = layout(
        &[LineElement::line_break(), word("a", 16)],
        LayoutOptions {
            width: 800,
            height: 600,
            base_font_size: 20,
        },
        &metrics,
    );
    // round(20 * 1.25) + 20 / 4
    assert_eq!(positions(&list), [(0, 30)]);
}

#[test]
fn test_baselines_align_and_superscripts_stay_on_top() {
    let metrics = FixedMetrics::new(10);
    let list = layout(
        &[word("big", 20), word("x", 16), sup("sup", 8)],
        options(800),
        &metrics,
    );
    assert_eq!(positions(&list), [(0, 0), (30, 4), (40, 0)]);
    // round(20 * 1.25) + 20 / 4
    assert_eq!(list.max_y(), 30);
}

#[test]
fn test_lines_are_aligned_independently() {
    let metrics = FixedMetrics::new(10);
    let list = layout(
        &[
            word("a", 16),
            word("b", 20),
            LineElement::line_break(),
            word("c", 16),
        ],
        options(800),
        &metrics,
    );
    assert_eq!(positions(&list), [(0, 4), (10, 0), (0, 30)]);
    assert_eq!(list.max_y(), 30 + LINE_16);
}

#[test]
fn test_emoji_take_fixed_slots() {
    let metrics = FixedMetrics::new(10);
    let list = layout(&[emoji(), emoji(), word("a", 16)], options(800), &metrics);
    assert_eq!(positions(&list), [(0, 0), (15, 0), (30, 0)]);
    assert!(matches!(
        &list.items()[0].content,
        DisplayContent::Emoji { code } if code == "1F600"
    ));
}

#[test]
fn test_emoji_only_line_counts_toward_max_y() {
    let metrics = FixedMetrics::new(10);
    let list = layout(&[emoji()], options(800), &metrics);
    assert_eq!(list.len(), 1);
    assert_eq!(list.max_y(), LINE_16);

    let list = layout(&[emoji()], options(10), &metrics);
    assert_eq!(list.max_y(), LINE_16);
}

#[test]
fn test_unmeasurable_word_is_skipped_with_warning() {
    let metrics = FixedMetrics::new(10);
    let engine = LayoutEngine::new(&metrics, options(800));
    let (list, warnings) = engine.layout_with_issues(&[word("gone", 0), word("kept", 16)]);
    assert_eq!(list.len(), 1);
    assert_eq!(list.items()[0].text(), Some("kept"));
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("gone"));
}

#[test]
fn test_fonts_are_acquired_once_per_layout() {
    let metrics = FixedMetrics::new(10);
    let elements: Vec<_> = (0..20).map(|i| word("w", 16 + i % 2)).collect();
    let engine = LayoutEngine::new(&metrics, options(100));
    let _ = engine.layout(&elements);
    assert_eq!(metrics.ascent_calls.get(), 2);

    let _ = engine.layout(&elements);
    assert_eq!(metrics.ascent_calls.get(), 4);
}

#[test]
fn test_relayout_is_deterministic() {
    let metrics = ApproximateMetrics;
    let elements = flatten(&wren_html::parse("<p>The <b>quick</b> brown <i>fox</i></p>"));
    let engine = LayoutEngine::new(&metrics, options(120));
    assert_eq!(engine.layout(&elements), engine.layout(&elements));
}

#[test]
fn test_text_items_carry_their_font() {
    let metrics = ApproximateMetrics;
    let elements = flatten(&wren_html::parse("<p>plain <b><i>both</i></b></p>"));
    let list = layout(&elements, LayoutOptions::default(), &metrics);
    let fonts: Vec<_> = list
        .items()
        .iter()
        .filter_map(|item| match &item.content {
            DisplayContent::Text { font, .. } => Some(*font),
            DisplayContent::Emoji { .. } => None,
        })
        .collect();
    assert_eq!(
        fonts,
        [
            FontKey {
                size: 16,
                bold: false,
                italic: false
            },
            FontKey {
                size: 16,
                bold: true,
                italic: true
            },
        ]
    );
}

#[test]
fn test_display_list_serializes() {
    let metrics = FixedMetrics::new(10);
    let list = layout(&[word("a", 16)], options(800), &metrics);
    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["max_y"], LINE_16);
    assert_eq!(json["items"][0]["content"]["kind"], "text");
    assert_eq!(json["items"][0]["content"]["font"]["size"], 16);
}
