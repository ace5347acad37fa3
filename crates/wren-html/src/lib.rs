//! Forgiving HTML parsing for the wren renderer.
//!
//! Two stages, driven together by [`HtmlParser`]:
//!
//! 1. **Scanning** ([`parser`]): splits markup into text runs, tags,
//!    comments and declarations, reading attributes along the way.
//! 2. **Tree construction** ([`tree_builder`]): maintains the stack of open
//!    elements, inserts implicit `html`/`head`/`body` elements and recovers
//!    from unclosed `p` and `li` elements.
//!
//! Parsing never fails. Anything unexpected is recorded as a
//! [`wren_common::Warning`] and the best-effort tree is returned.
//!
//! ```
//! let tree = wren_html::parse("<p>Hello</p>");
//! assert_eq!(tree.document_html(), "<html><body><p>Hello</p></body></html>");
//! ```

/// Markup scanner.
pub mod parser;
/// Character cursor used by the scanner.
pub mod reader;
/// Stack-of-open-elements tree construction.
pub mod tree_builder;

pub use parser::{HtmlParser, ParserState, parse, parse_with_issues};
pub use reader::Reader;
pub use tree_builder::{TreeBuilder, is_head_tag, is_self_closing};
