// File: src/fragment.rs
// Purpose: Structured render output. Renderers build Node trees; html.rs materializes them.

use crate::section::SectionType;
use maud::{Markup, PreEscaped, Render};
use serde::Serialize;

/// Elements written without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "source"];

/// A framework-agnostic markup tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum Node {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    },
    /// Escaped on output
    Text { text: String },
    /// Trusted markup emitted verbatim (custom HTML sections only)
    Raw { html: String },
}

impl Node {
    pub fn el(tag: &str) -> Self {
        Node::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Node::Raw { html: html.into() }
    }

    /// Set an attribute, replacing an earlier value of the same name
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            let value = value.into();
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some(existing) => existing.1 = value,
                None => attrs.push((name.to_string(), value)),
            }
        }
        self
    }

    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn child_opt(self, node: Option<Node>) -> Self {
        match node {
            Some(n) => self.child(n),
            None => self,
        }
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// Element with a single text child
    pub fn with_text(tag: &str, text: impl Into<String>) -> Self {
        Node::el(tag).child(Node::text(text))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Concatenated text content, depth first
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Raw { .. } => {}
            Node::Element { children, .. } => children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl Render for Node {
    fn render_to(&self, buffer: &mut String) {
        match self {
            Node::Text { text } => text.as_str().render_to(buffer),
            Node::Raw { html } => buffer.push_str(html),
            Node::Element { tag, attrs, children } => {
                buffer.push('<');
                buffer.push_str(tag);
                for (name, value) in attrs {
                    buffer.push(' ');
                    buffer.push_str(name);
                    buffer.push_str("=\"");
                    value.as_str().render_to(buffer);
                    buffer.push('"');
                }
                buffer.push('>');

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }

                for child in children {
                    child.render_to(buffer);
                }
                buffer.push_str("</");
                buffer.push_str(tag);
                buffer.push('>');
            }
        }
    }
}

/// Client-side behavior attached once the fragment is in the document.
/// Markers only; the page script initializes each element at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Behavior {
    Carousel,
    Tabs,
    Marquee,
    Ticker,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Carousel => "carousel",
            Behavior::Tabs => "tabs",
            Behavior::Marquee => "marquee",
            Behavior::Ticker => "ticker",
        }
    }
}

/// The rendered form of one section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub section_id: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub name: String,
    pub root: Node,
    pub behaviors: Vec<Behavior>,
}

impl Fragment {
    pub fn new(section_id: impl Into<String>, kind: SectionType, name: impl Into<String>, root: Node) -> Self {
        Self {
            section_id: section_id.into(),
            kind,
            name: name.into(),
            root,
            behaviors: Vec::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        if !self.behaviors.contains(&behavior) {
            self.behaviors.push(behavior);
        }
        self
    }

    /// Outer element carrying the id, type and name the banner resolver matches on
    pub fn to_node(&self) -> Node {
        let behaviors: Vec<&str> = self.behaviors.iter().map(Behavior::as_str).collect();
        Node::el("section")
            .class("home-section")
            .attr("data-section-id", self.section_id.as_str())
            .attr("data-section-type", self.kind.as_str())
            .attr("data-section-name", self.name.as_str())
            .attr_opt(
                "data-behavior",
                (!behaviors.is_empty()).then(|| behaviors.join(" ")),
            )
            .child(self.root.clone())
    }

    pub fn to_markup(&self) -> Markup {
        PreEscaped(self.to_node().render().into_string())
    }
}

impl Render for Fragment {
    fn render_to(&self, buffer: &mut String) {
        self.to_node().render_to(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_rendering_escapes() {
        let node = Node::el("a")
            .attr("href", "/search?q=a&b")
            .attr("title", "say \"hi\"")
            .child(Node::text("<b>bold</b>"));

        assert_eq!(
            node.render().into_string(),
            "<a href=\"/search?q=a&amp;b\" title=\"say &quot;hi&quot;\">&lt;b&gt;bold&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn test_void_elements() {
        let node = Node::el("img").attr("src", "/x.png").attr("alt", "");
        assert_eq!(node.render().into_string(), "<img src=\"/x.png\" alt=\"\">");
    }

    #[test]
    fn test_raw_passes_through() {
        let node = Node::el("div").child(Node::raw("<em>ok</em>"));
        assert_eq!(node.render().into_string(), "<div><em>ok</em></div>");
    }

    #[test]
    fn test_attr_replaces() {
        let node = Node::el("div").class("a").class("b");
        assert_eq!(node.get_attr("class"), Some("b"));
    }

    #[test]
    fn test_fragment_wrapper() {
        let fragment = Fragment::new("s1", SectionType::HeroSlider, "Hero", Node::with_text("p", "hi"))
            .with_behavior(Behavior::Carousel)
            .with_behavior(Behavior::Carousel);

        let html = fragment.to_markup().into_string();
        assert!(html.starts_with("<section class=\"home-section\" data-section-id=\"s1\""));
        assert!(html.contains("data-section-type=\"heroSlider\""));
        assert!(html.contains("data-behavior=\"carousel\""));
        assert_eq!(fragment.behaviors.len(), 1);
    }

    #[test]
    fn test_text_content() {
        let node = Node::el("ul")
            .child(Node::with_text("li", "A"))
            .child(Node::with_text("li", "B"));
        assert_eq!(node.text_content(), "AB");
    }
}
