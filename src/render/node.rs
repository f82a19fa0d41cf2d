use std::fmt::Write;

use indexmap::IndexMap;

/// Retained SVG element.
///
/// Elements are located by class tags (`"n3-x n3-axis"` matches an element
/// carrying both classes), which is what makes re-rendering idempotent:
/// callers look an element up before creating it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgNode {
    tag: String,
    attrs: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<SvgNode>,
}

impl SvgNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.attrs.insert(name.to_owned(), value.to_string());
        self
    }

    #[must_use]
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn set_style(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.styles.insert(name.to_owned(), value.to_string());
        self
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// True when every class in the space-separated `classes` is present.
    #[must_use]
    pub fn has_classes(&self, classes: &str) -> bool {
        let mut wanted = classes.split_whitespace().peekable();
        if wanted.peek().is_none() {
            return false;
        }
        wanted.all(|class| self.classes().any(|own| own == class))
    }

    /// Appends a new child and returns it.
    pub fn append(&mut self, tag: impl Into<String>) -> &mut SvgNode {
        let index = self.children.len();
        self.children.push(SvgNode::new(tag));
        &mut self.children[index]
    }

    /// Returns the direct child `tag` tagged with `classes`, creating it
    /// (with `class="{classes}"`) when absent.
    pub fn ensure_child(&mut self, tag: &str, classes: &str) -> &mut SvgNode {
        if let Some(index) = self
            .children
            .iter()
            .position(|child| child.tag == tag && child.has_classes(classes))
        {
            return &mut self.children[index];
        }

        let child = self.append(tag);
        child.set_attr("class", classes);
        child
    }

    /// Returns the first direct child with `tag`, creating it when absent.
    pub fn ensure_tag(&mut self, tag: &str) -> &mut SvgNode {
        if let Some(index) = self.children.iter().position(|child| child.tag == tag) {
            return &mut self.children[index];
        }
        self.append(tag)
    }

    /// First descendant (depth-first, document order) carrying `classes`.
    #[must_use]
    pub fn select(&self, classes: &str) -> Option<&SvgNode> {
        for child in &self.children {
            if child.has_classes(classes) {
                return Some(child);
            }
            if let Some(found) = child.select(classes) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant carrying `classes`, in document order.
    #[must_use]
    pub fn select_all(&self, classes: &str) -> Vec<&SvgNode> {
        let mut out = Vec::new();
        self.collect_matching(classes, &mut out);
        out
    }

    fn collect_matching<'a>(&'a self, classes: &str, out: &mut Vec<&'a SvgNode>) {
        for child in &self.children {
            if child.has_classes(classes) {
                out.push(child);
            }
            child.collect_matching(classes, out);
        }
    }

    /// Like [`SvgNode::ensure_child`], but a newly created child is inserted
    /// before every existing sibling so it paints underneath them.
    pub fn ensure_first_child(&mut self, tag: &str, classes: &str) -> &mut SvgNode {
        if let Some(index) = self
            .children
            .iter()
            .position(|child| child.tag == tag && child.has_classes(classes))
        {
            return &mut self.children[index];
        }

        let mut child = SvgNode::new(tag);
        child.set_attr("class", classes);
        self.children.insert(0, child);
        &mut self.children[0]
    }

    /// Returns the `nth` direct child tagged with `classes`, appending new
    /// ones until it exists. Used for index-keyed joins.
    pub fn ensure_nth_child(&mut self, tag: &str, classes: &str, nth: usize) -> &mut SvgNode {
        if classes.split_whitespace().next().is_none() {
            return self.append(tag);
        }
        loop {
            let matching: Vec<usize> = self
                .children
                .iter()
                .enumerate()
                .filter(|(_, child)| child.tag == tag && child.has_classes(classes))
                .map(|(index, _)| index)
                .collect();
            if let Some(&index) = matching.get(nth) {
                return &mut self.children[index];
            }
            self.append(tag).set_attr("class", classes);
        }
    }

    /// Removes direct children carrying `classes`; returns how many were removed.
    pub fn remove_children(&mut self, classes: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|child| !child.has_classes(classes));
        before - self.children.len()
    }

    /// Keeps only the first `keep` direct children carrying `classes`.
    pub fn truncate_children(&mut self, classes: &str, keep: usize) -> usize {
        let mut seen = 0;
        let before = self.children.len();
        self.children.retain(|child| {
            if !child.has_classes(classes) {
                return true;
            }
            seen += 1;
            seen <= keep
        });
        before - self.children.len()
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Number of elements in this subtree, this one included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SvgNode::element_count)
            .sum::<usize>()
    }

    /// Serializes the subtree as SVG markup.
    pub fn write_svg(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape_xml(value));
        }
        if !self.styles.is_empty() {
            let style = self
                .styles
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", escape_xml(&style));
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_xml(text));
        }
        for child in &self.children {
            child.write_svg(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_svg(&mut out);
        out
    }
}

fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
