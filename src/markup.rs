//! A minimal element/text markup tree.
//!
//! Legacy exports use a small, predictable subset of HTML, so the tree is
//! purpose-built rather than a conforming DOM: elements carry a lower-cased
//! tag name, an attribute list, and children. Building is total: any input
//! yields a tree, with unmatched close tags dropped and open elements closed
//! at end of input.

mod lexer;

use lexer::Token;

/// Void elements per the HTML spec subset we accept; these never take
/// children even without a self-closing slash.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Legacy markup routinely omits these close tags; a new opener implicitly
/// closes a still-open element of the same name.
const IMPLICIT_CLOSE: &[&str] = &["p", "li"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// The value of the first attribute with this (lower-case) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Whether the space-separated `class` attribute contains `class_name`.
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class_name))
    }

    /// The flattened text of all descendant text nodes, in order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Depth-first search for the first descendant element with this name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(el) = child {
                if el.name == name {
                    return Some(el);
                }
                if let Some(found) = el.find(name) {
                    return Some(found);
                }
            }
        }
        None
    }
}

pub(crate) fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Parse markup into a list of top-level nodes.
pub fn parse(input: &str) -> Vec<Node> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    for token in lexer::lex(input) {
        match token {
            Token::Text(text) => attach(&mut root, &mut stack, Node::Text(text)),
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                if IMPLICIT_CLOSE.contains(&name.as_str())
                    && stack.iter().any(|e| e.name == name)
                {
                    close_through(&mut root, &mut stack, &name);
                }
                let element = Element {
                    name,
                    attrs,
                    children: Vec::new(),
                };
                if self_closing || VOID_TAGS.contains(&element.name.as_str()) {
                    attach(&mut root, &mut stack, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Token::EndTag { name } => {
                if stack.iter().any(|e| e.name == name) {
                    close_through(&mut root, &mut stack, &name);
                }
                // An end tag with no matching opener is dropped.
            }
        }
    }

    while !stack.is_empty() {
        close_one(&mut root, &mut stack);
    }
    root
}

/// Append a node to the innermost open element, or the root. Adjacent text
/// nodes merge so comment removal cannot split a run.
fn attach(root: &mut Vec<Node>, stack: &mut [Element], node: Node) {
    let target = match stack.last_mut() {
        Some(open) => &mut open.children,
        None => root,
    };
    if let Node::Text(text) = &node
        && let Some(Node::Text(prev)) = target.last_mut()
    {
        prev.push_str(text);
        return;
    }
    target.push(node);
}

fn close_one(root: &mut Vec<Node>, stack: &mut Vec<Element>) {
    if let Some(closed) = stack.pop() {
        attach(root, stack, Node::Element(closed));
    }
}

/// Pop open elements until one with this name has been closed.
fn close_through(root: &mut Vec<Node>, stack: &mut Vec<Element>, name: &str) {
    while let Some(open) = stack.last() {
        let done = open.name == name;
        close_one(root, stack);
        if done {
            break;
        }
    }
}
