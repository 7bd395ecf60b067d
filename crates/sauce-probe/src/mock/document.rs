//! In-memory DOM used by the mock driver.
//!
//! Supports the subset of selector syntax the storefront's page objects use:
//! compound CSS selectors made of a tag, `#id`, `.class` and `[attr]` /
//! `[attr="value"]` parts, comma-separated lists of those, ARIA roles with
//! accessible names, and `data-test` ids. Anything else is rejected with
//! [`E2eError::UnsupportedSelector`] rather than silently mismatching.

use crate::locator::{normalize_text, AriaRole, Locator, LocatorStep, Selector};
use crate::result::{E2eError, E2eResult};

// =============================================================================
// ELEMENT
// =============================================================================

/// One element of a mock document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    visible: bool,
    key: Option<String>,
    children: Vec<MockElement>,
}

impl MockElement {
    /// Create an element with the given tag name
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            visible: true,
            key: None,
            children: Vec::new(),
        }
    }

    /// Set an attribute (replaces an existing value)
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class
    #[must_use]
    pub fn class(self, class: &str) -> Self {
        let classes = match self.attribute("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.attr("class", classes)
    }

    /// Set the element's own text (rendered before its children)
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Render the element (and its subtree) invisible
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Tag the element so the site can tell which control was acted on
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Tag name (lower case)
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Site key, if any
    #[must_use]
    pub fn site_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Key reached by a pointer press at the centre of this element.
    ///
    /// An element without text of its own is covered by its first visible
    /// child, so the press lands as deep as that chain goes and bubbles back
    /// up to the nearest keyed element.
    fn pointer_key(&self) -> Option<&str> {
        let inner = if self.text.is_empty() {
            self.children
                .iter()
                .find(|c| c.visible)
                .and_then(Self::pointer_key)
        } else {
            None
        };
        inner.or_else(|| self.site_key())
    }

    /// Own text followed by the text of every descendant
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            let text = child.text_content();
            if !text.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&text);
            }
        }
        out
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn role(&self) -> Option<AriaRole> {
        if let Some(explicit) = self.attribute("role") {
            return [
                AriaRole::Button,
                AriaRole::Link,
                AriaRole::Combobox,
                AriaRole::Textbox,
            ]
            .into_iter()
            .find(|r| r.as_str() == explicit);
        }
        match self.tag.as_str() {
            "button" => Some(AriaRole::Button),
            "a" if self.attribute("href").is_some() => Some(AriaRole::Link),
            "select" => Some(AriaRole::Combobox),
            "textarea" => Some(AriaRole::Textbox),
            "input" => match self.attribute("type").unwrap_or("text") {
                "submit" | "button" | "reset" => Some(AriaRole::Button),
                "text" | "password" | "email" => Some(AriaRole::Textbox),
                _ => None,
            },
            _ => None,
        }
    }

    fn accessible_name(&self) -> String {
        if let Some(label) = self.attribute("aria-label") {
            return label.to_string();
        }
        if self.tag == "input" {
            return self.attribute("value").unwrap_or_default().to_string();
        }
        self.text_content()
    }
}

// =============================================================================
// CSS SUBSET
// =============================================================================

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, el: &MockElement) -> bool {
        self.tag.as_ref().map_or(true, |t| *t == el.tag)
            && self
                .id
                .as_ref()
                .map_or(true, |id| el.attribute("id") == Some(id.as_str()))
            && self.classes.iter().all(|c| el.has_class(c))
            && self.attributes.iter().all(|(name, value)| {
                match (el.attribute(name), value) {
                    (Some(actual), Some(expected)) => actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(source: &str, full: &str) -> E2eResult<Compound> {
    let unsupported = || E2eError::UnsupportedSelector {
        selector: full.to_string(),
    };
    let mut compound = Compound::default();
    let mut rest = source.trim();
    if rest.is_empty() {
        return Err(unsupported());
    }

    let take_ident = |s: &str| -> (String, usize) {
        let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
        (s[..end].to_string(), end)
    };

    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let (ident, len) = take_ident(rest);
        compound.tag = Some(ident.to_lowercase());
        rest = &rest[len..];
    }

    while let Some(first) = rest.chars().next() {
        match first {
            '#' | '.' => {
                let (ident, len) = take_ident(&rest[1..]);
                if ident.is_empty() {
                    return Err(unsupported());
                }
                if first == '#' {
                    compound.id = Some(ident);
                } else {
                    compound.classes.push(ident);
                }
                rest = &rest[1 + len..];
            }
            '[' => {
                let close = rest.find(']').ok_or_else(unsupported)?;
                let inner = &rest[1..close];
                let attribute = match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim();
                        let value = value
                            .strip_prefix('"')
                            .and_then(|v| v.strip_suffix('"'))
                            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                            .unwrap_or(value);
                        (name.trim().to_string(), Some(value.to_string()))
                    }
                    None => (inner.trim().to_string(), None),
                };
                if attribute.0.is_empty() || !attribute.0.chars().all(is_ident_char) {
                    return Err(unsupported());
                }
                compound.attributes.push(attribute);
                rest = &rest[close + 1..];
            }
            _ => return Err(unsupported()),
        }
    }
    Ok(compound)
}

fn parse_css(css: &str) -> E2eResult<Vec<Compound>> {
    css.split(',').map(|part| parse_compound(part, css)).collect()
}

// =============================================================================
// DOCUMENT
// =============================================================================

struct Node<'d> {
    element: &'d MockElement,
    parent: Option<usize>,
    /// One past the last descendant, in document order
    end: usize,
}

/// `Some(key)` when `target` sits under `element`, carrying the nearest keyed
/// strict ancestor of `target`
fn bubble_key<'a>(element: &'a MockElement, target: &MockElement) -> Option<Option<&'a str>> {
    if std::ptr::eq(element, target) {
        return Some(None);
    }
    element
        .children
        .iter()
        .find_map(|child| bubble_key(child, target))
        .map(|below| below.or_else(|| element.site_key()))
}

/// A rendered page: the children of `<body>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockDocument {
    body: Vec<MockElement>,
}

impl MockDocument {
    /// Create a document from top-level elements
    #[must_use]
    pub fn new(body: Vec<MockElement>) -> Self {
        Self { body }
    }

    /// Top-level elements
    #[must_use]
    pub fn body(&self) -> &[MockElement] {
        &self.body
    }

    fn flatten(&self) -> Vec<Node<'_>> {
        fn visit<'d>(el: &'d MockElement, parent: Option<usize>, nodes: &mut Vec<Node<'d>>) {
            let index = nodes.len();
            nodes.push(Node {
                element: el,
                parent,
                end: index + 1,
            });
            for child in &el.children {
                visit(child, Some(index), nodes);
            }
            let end = nodes.len();
            nodes[index].end = end;
        }

        let mut nodes = Vec::new();
        for el in &self.body {
            visit(el, None, &mut nodes);
        }
        nodes
    }

    /// Key handling a pointer click on `target`, an element of this document.
    ///
    /// Unkeyed targets pass the click up to their nearest keyed ancestor.
    #[must_use]
    pub fn click_key<'a>(&'a self, target: &'a MockElement) -> Option<&'a str> {
        target.pointer_key().or_else(|| {
            self.body
                .iter()
                .find_map(|root| bubble_key(root, target))
                .flatten()
        })
    }

    /// Resolve `locator` to matching elements in document order
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::UnsupportedSelector`] for CSS outside the supported
    /// subset.
    pub fn resolve(&self, locator: &Locator) -> E2eResult<Vec<&MockElement>> {
        Ok(self
            .resolve_rendered(locator)?
            .into_iter()
            .map(|(el, _)| el)
            .collect())
    }

    /// Matches paired with whether each is actually rendered
    fn resolve_rendered(&self, locator: &Locator) -> E2eResult<Vec<(&MockElement, bool)>> {
        let nodes = self.flatten();
        let mut current: Vec<Option<usize>> = vec![None];

        for step in locator.steps() {
            current = match step {
                LocatorStep::Select(selector) => {
                    let matcher = Matcher::new(selector)?;
                    let mut found: Vec<usize> = Vec::new();
                    for root in &current {
                        let range = match root {
                            None => 0..nodes.len(),
                            Some(i) => (i + 1)..nodes[*i].end,
                        };
                        found.extend(range.filter(|&j| matcher.matches(nodes[j].element)));
                    }
                    found.sort_unstable();
                    found.dedup();
                    found.into_iter().map(Some).collect()
                }
                LocatorStep::HasText(text) => {
                    let wanted = normalize_text(text);
                    current
                        .into_iter()
                        .filter(|root| match root {
                            Some(i) => normalize_text(&nodes[*i].element.text_content())
                                .contains(&wanted),
                            None => false,
                        })
                        .collect()
                }
                LocatorStep::Nth(n) => current.get(*n).copied().into_iter().collect(),
            };
        }

        Ok(current
            .into_iter()
            .flatten()
            .map(|i| (nodes[i].element, Self::rendered(&nodes, i)))
            .collect())
    }

    /// The element and all of its ancestors are visible
    fn rendered(nodes: &[Node<'_>], mut index: usize) -> bool {
        loop {
            let node = &nodes[index];
            if !node.element.visible {
                return false;
            }
            match node.parent {
                Some(parent) => index = parent,
                None => return true,
            }
        }
    }

    /// Whether the first match exists and is visible
    ///
    /// # Errors
    ///
    /// Same as [`MockDocument::resolve`].
    pub fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        let matched = self.resolve_rendered(locator)?;
        Ok(matched.first().is_some_and(|(_, visible)| *visible))
    }
}

enum Matcher<'s> {
    Css(Vec<Compound>),
    Role(AriaRole, Option<String>),
    TestId(&'s str),
}

impl<'s> Matcher<'s> {
    fn new(selector: &'s Selector) -> E2eResult<Self> {
        Ok(match selector {
            Selector::Css(css) => Self::Css(parse_css(css)?),
            Selector::Role { role, name } => Self::Role(*role, name.as_deref().map(normalize_text)),
            Selector::TestId(id) => Self::TestId(id),
        })
    }

    fn matches(&self, el: &MockElement) -> bool {
        match self {
            Self::Css(list) => list.iter().any(|c| c.matches(el)),
            Self::Role(role, name) => {
                el.role() == Some(*role)
                    && name
                        .as_ref()
                        .map_or(true, |n| normalize_text(&el.accessible_name()).contains(n))
            }
            Self::TestId(id) => el.attribute("data-test") == Some(*id),
        }
    }
}
