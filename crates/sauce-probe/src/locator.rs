//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a deferred query: an immutable chain of steps that is
//! resolved against the live page each time it is used. Constructing or
//! holding one never touches the browser, and never implies that a matching
//! element currently exists.
//!
//! Locators compose the way the storefront's markup nests:
//!
//! ```
//! use sauce_probe::{AriaRole, Locator};
//!
//! let items = Locator::css(".inventory_item");
//! let add = Locator::role(AriaRole::Button, "ADD TO CART");
//! let target = items.filter_has_text("Sauce Labs Backpack").locator(&add).first();
//! assert_eq!(
//!     target.to_string(),
//!     r#".inventory_item >> has-text="Sauce Labs Backpack" >> role=button[name="ADD TO CART"] >> nth=0"#
//! );
//! ```
//!
//! # Matching rules
//!
//! - Text filters match a case-insensitive substring of the element's
//!   whitespace-normalised text content.
//! - Role names match a case-insensitive substring of the accessible name
//!   (`aria-label`, then `value` for `<input>` buttons, then text content).
//! - Results are in document order without duplicates.

use std::fmt;

/// ARIA roles used by the storefront's controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    /// `<button>`, `<input type=submit|button|reset>`
    Button,
    /// `<a href>`
    Link,
    /// `<select>`
    Combobox,
    /// Text-like `<input>` and `<textarea>`
    Textbox,
}

impl AriaRole {
    /// ARIA role name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Combobox => "combobox",
            Self::Textbox => "textbox",
        }
    }

    /// CSS selector list covering the implicit and explicit forms of the role
    #[must_use]
    pub const fn implicit_css(self) -> &'static str {
        match self {
            Self::Button => {
                r#"button, input[type="submit"], input[type="button"], input[type="reset"], [role="button"]"#
            }
            Self::Link => r#"a[href], [role="link"]"#,
            Self::Combobox => r#"select, [role="combobox"]"#,
            Self::Textbox => {
                r#"input:not([type]), input[type="text"], input[type="password"], input[type="email"], textarea, [role="textbox"]"#
            }
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "#login-button")
    Css(String),
    /// ARIA role, optionally narrowed by accessible name
    Role {
        /// Role to match
        role: AriaRole,
        /// Accessible name substring
        name: Option<String>,
    },
    /// `data-test` attribute selector
    TestId(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a role selector with an accessible name
    #[must_use]
    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: Some(name.into()),
        }
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// The CSS that selects candidates for this selector
    #[must_use]
    pub fn candidate_css(&self) -> String {
        match self {
            Self::Css(css) => css.clone(),
            Self::Role { role, .. } => role.implicit_css().to_string(),
            Self::TestId(id) => format!("[data-test={}]", js_string(id)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => f.write_str(css),
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name={name:?}]"),
            Self::TestId(id) => write!(f, "data-test={id:?}"),
        }
    }
}

/// One step of a locator chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorStep {
    /// Descend: match the selector inside every current element
    Select(Selector),
    /// Keep current elements whose text contains the string
    HasText(String),
    /// Keep only the n-th current element (zero based)
    Nth(usize),
}

impl fmt::Display for LocatorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(selector) => write!(f, "{selector}"),
            Self::HasText(text) => write!(f, "has-text={text:?}"),
            Self::Nth(n) => write!(f, "nth={n}"),
        }
    }
}

/// A deferred reference to zero or more elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    steps: Vec<LocatorStep>,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            steps: vec![LocatorStep::Select(selector)],
        }
    }

    /// Create a locator with a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::css(selector))
    }

    /// Create a locator matching a role and accessible name
    #[must_use]
    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Self::from_selector(Selector::role(role, name))
    }

    /// Create a locator matching any element with the role
    #[must_use]
    pub fn any_role(role: AriaRole) -> Self {
        Self::from_selector(Selector::Role { role, name: None })
    }

    /// Create a locator on the `data-test` attribute
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::test_id(id))
    }

    /// Chain `inner` so it is resolved inside the elements matched by `self`
    #[must_use]
    pub fn locator(&self, inner: &Self) -> Self {
        let mut steps = self.steps.clone();
        steps.extend(inner.steps.iter().cloned());
        Self { steps }
    }

    /// Narrow to elements whose text contains `text`
    #[must_use]
    pub fn filter_has_text(&self, text: impl Into<String>) -> Self {
        self.with_step(LocatorStep::HasText(text.into()))
    }

    /// Narrow to the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Narrow to the n-th match (zero based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.with_step(LocatorStep::Nth(index))
    }

    /// The chain of steps
    #[must_use]
    pub fn steps(&self) -> &[LocatorStep] {
        &self.steps
    }

    fn with_step(&self, step: LocatorStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Compile to a JavaScript expression that evaluates to the ordered array
    /// of matching elements.
    #[must_use]
    pub fn to_js(&self) -> String {
        let mut js = String::from(
            "(() => {\n  \
             const norm = (s) => (s || '').replace(/\\s+/g, ' ').trim().toLowerCase();\n  \
             const uniq = (list) => Array.from(new Set(list));\n  \
             const name = (el) => norm(el.getAttribute('aria-label') || (el.tagName === 'INPUT' ? el.value : el.textContent));\n  \
             let els = [document];\n",
        );

        for step in &self.steps {
            match step {
                LocatorStep::Select(selector) => {
                    js.push_str(&format!(
                        "  els = uniq(els.flatMap((root) => Array.from(root.querySelectorAll({}))));\n",
                        js_string(&selector.candidate_css())
                    ));
                    if let Selector::Role { role, name } = selector {
                        js.push_str(&format!(
                            "  els = els.filter((el) => !el.hasAttribute('role') || el.getAttribute('role') === {});\n",
                            js_string(role.as_str())
                        ));
                        if let Some(name) = name {
                            js.push_str(&format!(
                                "  els = els.filter((el) => name(el).includes({}));\n",
                                js_string(&normalize_text(name))
                            ));
                        }
                    }
                }
                LocatorStep::HasText(text) => {
                    js.push_str(&format!(
                        "  els = els.filter((el) => norm(el.textContent).includes({}));\n",
                        js_string(&normalize_text(text))
                    ));
                }
                LocatorStep::Nth(n) => {
                    js.push_str(&format!("  els = els.length > {n} ? [els[{n}]] : [];\n"));
                }
            }
        }

        js.push_str("  return els;\n})()");
        js
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Collapse runs of whitespace and trim, the way rendered text is compared
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalised, lower-cased text used for substring matching
#[must_use]
pub fn normalize_text(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}

/// Encode a string as a JavaScript string literal
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
