//! XPath-backed element locators.
//!
//! A [`Locator`] is an immutable selector value. Composition methods never
//! mutate; they return a new locator whose expression is scoped under the
//! receiver, so page catalogs can hand out derived locators freely.

use std::fmt;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// How a text filter compares an element's text against a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// One of the element's own text nodes equals the label.
    Own,
    /// The element's whitespace-normalized text equals the label exactly.
    /// Used where visible labels can be prefixes of one another.
    Exact,
    /// The element's whitespace-normalized text contains the label, ignoring
    /// ASCII case.
    Contains,
}

/// A page-scoped selector identifying zero or more elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Locator {
    xpath: String,
}

impl Locator {
    /// Wrap an absolute XPath expression.
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self { xpath: expr.into() }
    }

    /// The rendered XPath expression.
    pub fn as_xpath(&self) -> &str {
        &self.xpath
    }

    /// Scope a relative path (`//div[...]`, `/a`) under this locator.
    pub fn join(&self, relative: &str) -> Self {
        Self {
            xpath: format!("{}{}", self.xpath, relative),
        }
    }

    /// The `index`-th match (zero-based) in document order.
    pub fn nth(&self, index: usize) -> Self {
        Self {
            xpath: format!("({})[{}]", self.xpath, index + 1),
        }
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Descendant `tag` elements whose text satisfies `matcher` against `text`.
    pub fn descendant_with_text(&self, tag: &str, matcher: TextMatch, text: &str) -> Self {
        let literal = xpath_literal(text);
        let predicate = match matcher {
            TextMatch::Own => format!("text()={literal}"),
            TextMatch::Exact => format!("normalize-space(.)={literal}"),
            TextMatch::Contains => format!(
                "contains(translate(normalize-space(.),\"{UPPER}\",\"{LOWER}\"),{})",
                xpath_literal(&text.to_ascii_lowercase())
            ),
        };
        self.join(&format!("//{tag}[{predicate}]"))
    }

    /// Nearest-to-farthest ancestors matching `step` (e.g. `label`).
    pub fn ancestor(&self, step: &str) -> Self {
        Self {
            xpath: format!("{}/ancestor::{}", self.xpath, step),
        }
    }

    /// Elements matching `step` that enclose this element or any node inside
    /// it, so a wrapper rendered either around or within the match is found.
    pub fn enclosing(&self, step: &str) -> Self {
        Self {
            xpath: format!("{}//ancestor::{}", self.xpath, step),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xpath)
    }
}

/// Quote `s` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape sequences, so strings holding both quote kinds
/// are assembled with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    let parts: Vec<String> = s
        .split('"')
        .map(|part| format!("\"{part}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}
