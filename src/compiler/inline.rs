//! Inline span compilation.
//!
//! Turns a run of sibling inline nodes into spans. Each text node becomes one
//! span carrying the mark set accumulated from its ancestors within the
//! current block; a mark-forming element pushes its mark and recurses. An
//! element that forms no mark recurses transparently.

use crate::document::{Mark, Span};
use crate::markup::{Element, Node};

pub(super) fn compile_inline(nodes: &[&Node]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut marks: Vec<Mark> = Vec::new();
    for node in nodes {
        collect(node, &mut marks, &mut spans);
    }
    if spans.is_empty() {
        // Paragraphs carry at least one span.
        spans.push(Span::empty());
    }
    spans
}

fn collect(node: &Node, marks: &mut Vec<Mark>, out: &mut Vec<Span>) {
    match node {
        Node::Text(text) => out.push(Span {
            text: text.clone(),
            marks: marks.clone(),
        }),
        Node::Element(el) => {
            if matches!(el.name.as_str(), "br" | "script" | "style") {
                return;
            }
            let mark = mark_for(el);
            let pushed = match mark {
                Some(mark) if !marks.contains(&mark) => {
                    marks.push(mark);
                    true
                }
                _ => false,
            };
            for child in &el.children {
                collect(child, marks, out);
            }
            if pushed {
                marks.pop();
            }
        }
    }
}

fn mark_for(el: &Element) -> Option<Mark> {
    match el.name.as_str() {
        "strong" | "b" => Some(Mark::Strong),
        "em" | "i" => Some(Mark::Em),
        "code" | "tt" => Some(Mark::Code),
        // An anchor without an href marks nothing.
        "a" => el.attr("href").map(|href| Mark::Link {
            href: href.to_string(),
            new_tab: el
                .attr("target")
                .is_some_and(|t| t.eq_ignore_ascii_case("_blank")),
        }),
        _ => None,
    }
}
