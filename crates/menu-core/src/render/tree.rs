//! Virtual render tree.
//!
//! Layouts build a [`RenderNode`] tree instead of touching a live surface.  A
//! surface adapter mounts the tree once and afterwards only receives small
//! [`crate::render::patch::Patch`] values.  The tree can also be serialised to
//! HTML, which is what the kiosk browser finally loads.

use std::fmt::Write as _;

/// Elements that never have children or a closing tag.
const VOID_TAGS: [&str; 4] = ["img", "meta", "br", "link"];

/// One element of the virtual tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Attributes other than `id`, `class` and `style`, in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Inline style declarations, in insertion order.
    pub style: Vec<(String, String)>,
    /// Escaped text content, rendered before the children.
    pub text: Option<String>,
    /// Trusted markup (inline SVG icons), rendered verbatim.
    pub markup: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    // ── Builders ──────────────────────────────────────────────────────────────

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds one or more space-separated classes.
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    pub fn with_child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Replaces the whole class list with the given space-separated classes.
    pub fn set_classes(&mut self, classes: &str) {
        self.classes = classes.split_whitespace().map(str::to_string).collect();
    }

    /// Sets a style property, replacing any previous value.
    pub fn set_style(&mut self, property: &str, value: &str) {
        match self.style.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.style.push((property.to_string(), value.to_string())),
        }
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Depth-first search for the element with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&RenderNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut RenderNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_by_id_mut(id))
    }

    /// First element (document order) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&RenderNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_class(class))
    }

    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut RenderNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_by_class_mut(class))
    }

    /// All elements carrying `class`, in document order.
    pub fn all_by_class(&self, class: &str) -> Vec<&RenderNode> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a RenderNode>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }

    /// Calls `f` with a running index for every element carrying `class`.
    /// Returns how many elements were visited.
    pub fn for_each_by_class_mut<F>(&mut self, class: &str, mut f: F) -> usize
    where
        F: FnMut(usize, &mut RenderNode),
    {
        let mut index = 0;
        self.visit_by_class_mut(class, &mut index, &mut f);
        index
    }

    fn visit_by_class_mut<F>(&mut self, class: &str, index: &mut usize, f: &mut F)
    where
        F: FnMut(usize, &mut RenderNode),
    {
        if self.has_class(class) {
            f(*index, self);
            *index += 1;
        }
        for child in &mut self.children {
            child.visit_by_class_mut(class, index, f);
        }
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    // ── Serialisation ─────────────────────────────────────────────────────────

    /// Serialises the tree to HTML, escaping text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            write_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            write_attr(out, "class", &self.classes.join(" "));
        }
        if !self.style.is_empty() {
            let css = self
                .style
                .iter()
                .map(|(p, v)| format!("{p}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            write_attr(out, "style", &css);
        }
        for (name, value) in &self.attrs {
            write_attr(out, name, value);
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        if let Some(markup) = &self.markup {
            out.push_str(markup);
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape(value));
}

/// Escapes the five HTML-significant characters.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
