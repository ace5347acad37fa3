//! wren CLI
//!
//! Parses an HTML document, flattens it into line elements and lays them
//! out against a viewport, printing whichever stage is asked for.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::json;
use wren_browser::{LoadError, MetricsSource, Page, RenderOptions, load_document, resolve_metrics};
use wren_common::{Diagnostics, Verbosity, report};
use wren_dom::print_tree;
use wren_layout::{DEFAULT_FONT_SIZE, DisplayContent, DisplayList, LayoutOptions, LineElement};

/// wren: minimal HTML parsing and inline layout
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Lay out a file and print the display list
    wren page.html

    # Read from standard input
    cat page.html | wren -

    # Show the parsed tree and the line elements too
    wren --tree --elements page.html

    # Parse inline HTML at a narrow width, as JSON
    wren --html '<p>Hello <b>world</b></p>' --width 120 --json
"#)]
struct Cli {
    /// Path to an HTML file, or `-` for standard input
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800)]
    width: i32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    height: i32,

    /// Base font size in points
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: u32,

    /// Measure text with this TrueType/OpenType font
    #[arg(long, value_name = "TTF", conflicts_with = "approximate")]
    font: Option<PathBuf>,

    /// Use fixed-ratio metrics instead of a real font
    #[arg(long)]
    approximate: bool,

    /// Lay out the markup itself instead of the document
    #[arg(long)]
    view_source: bool,

    /// Do not insert implicit html, head and body elements
    #[arg(long)]
    no_implicit_tags: bool,

    /// Print the parsed tree
    #[arg(long)]
    tree: bool,

    /// Print the flattened line elements
    #[arg(long)]
    elements: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print pass timings and a warning summary
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress warnings
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    const fn render_options(&self) -> RenderOptions {
        RenderOptions {
            implicit_tags: !self.no_implicit_tags,
            view_source: self.view_source,
            layout: LayoutOptions {
                width: self.width,
                height: self.height,
                base_font_size: self.font_size,
            },
        }
    }

    fn metrics_source(&self) -> MetricsSource {
        match &self.font {
            Some(path) => MetricsSource::File(path.clone()),
            None if self.approximate => MetricsSource::Approximate,
            None => MetricsSource::System,
        }
    }

    fn source(&self) -> Result<String, LoadError> {
        match (&self.html, &self.path) {
            (Some(html), _) => Ok(html.clone()),
            (None, Some(path)) => load_document(path),
            (None, None) => load_document(wren_browser::STDIN_PATH),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    let source = cli.source()?;
    let mut diagnostics = Diagnostics::new();
    let metrics = resolve_metrics(&cli.metrics_source(), &mut diagnostics)
        .context("cannot set up font metrics")?;
    let page = Page::new(&source, cli.render_options(), metrics);
    diagnostics.extend(page.warnings().cloned());

    if cli.json {
        print_json(&cli, &page)?;
    } else {
        print_text(&cli, &page);
    }

    let _ = report(diagnostics.warnings(), verbosity);
    if verbosity == Verbosity::Verbose {
        print_timings(&page);
    }
    Ok(())
}

fn print_text(cli: &Cli, page: &Page) {
    if cli.tree {
        println!("=== DOM Tree ===");
        match page.tree.root() {
            Some(root) => print_tree(&page.tree, root, 0),
            None => println!("(empty)"),
        }
        println!();
    }

    if cli.elements {
        println!("=== Line Elements ({}) ===", page.elements.len());
        for element in &page.elements {
            println!("  {}", describe_element(element));
        }
        println!();
    }

    let layout = page.options().layout;
    println!(
        "=== Display List (viewport: {}x{}) ===",
        layout.width, layout.height
    );
    print_display_list(&page.display_list);
}

fn print_json(cli: &Cli, page: &Page) -> Result<()> {
    let mut output = json!({
        "viewport": {
            "width": page.options().layout.width,
            "height": page.options().layout.height,
        },
        "display_list": page.display_list,
    });
    if cli.tree {
        output["html"] = json!(page.tree.document_html());
    }
    if cli.elements {
        output["elements"] = serde_json::to_value(&page.elements)?;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn describe_element(element: &LineElement) -> String {
    match element {
        LineElement::Word {
            text,
            italic,
            bold,
            superscript,
            font_size,
        } => {
            let mut style = format!("{font_size}pt");
            for (flag, name) in [(bold, "bold"), (italic, "italic"), (superscript, "sup")] {
                if *flag {
                    style.push(' ');
                    style.push_str(name);
                }
            }
            format!("word {text:?} [{style}]")
        }
        LineElement::Break { paragraph: true } => "paragraph break".to_string(),
        LineElement::Break { paragraph: false } => "line break".to_string(),
        LineElement::Emoji { code } => format!("emoji U+{code}"),
    }
}

fn print_display_list(list: &DisplayList) {
    for item in list.items() {
        let position = format!("({}, {})", item.x, item.y);
        let size = format!("{}x{}", item.width, item.height);
        match &item.content {
            DisplayContent::Text {
                text,
                superscript,
                font,
            } => {
                let mut style = format!("{}pt", font.size);
                if font.bold {
                    style.push_str(" bold");
                }
                if font.italic {
                    style.push_str(" italic");
                }
                if *superscript {
                    style.push_str(" sup");
                }
                println!(
                    "  {position:<12} {size:<8} {text:?} {}",
                    format!("[{style}]").dimmed()
                );
            }
            DisplayContent::Emoji { code } => {
                println!("  {position:<12} {size:<8} {}", format!("U+{code}").cyan());
            }
        }
    }
    println!("max_y: {}", list.max_y());
}

fn print_timings(page: &Page) {
    let timings = page.timings;
    eprintln!(
        "{}",
        format!(
            "parse {:?}, flatten {:?}, layout {:?} ({} nodes, {} elements, {} items)",
            timings.parse,
            timings.flatten,
            timings.layout,
            page.tree.len(),
            page.elements.len(),
            page.display_list.len(),
        )
        .dimmed()
    );
}
