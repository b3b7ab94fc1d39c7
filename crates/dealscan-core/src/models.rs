use std::fmt;

use crate::catalog::TIME_BOUND_PROGRAMS;

/// Ordered sequence of visible filter labels.
///
/// Callers may pass a single label or a list; both normalize to a set here so
/// the filter operations only ever iterate.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if any selected program renders deals with a countdown.
    pub fn has_time_bound_program(&self) -> bool {
        TIME_BOUND_PROGRAMS.iter().any(|p| self.contains(p))
    }
}

impl From<&str> for LabelSet {
    fn from(label: &str) -> Self {
        Self(vec![label.to_string()])
    }
}

impl From<String> for LabelSet {
    fn from(label: String) -> Self {
        Self(vec![label])
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        Self(labels)
    }
}

impl From<Vec<&str>> for LabelSet {
    fn from(labels: Vec<&str>) -> Self {
        Self(labels.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LabelSet {
    fn from(labels: [&str; N]) -> Self {
        Self(labels.iter().map(|l| l.to_string()).collect())
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// A single filter axis with its requested labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Program(LabelSet),
    Department(LabelSet),
    Price(String),
}

/// The composite program × department × price filter of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DealFilters {
    pub program: LabelSet,
    pub department: LabelSet,
    pub price: String,
}

impl DealFilters {
    pub fn new(
        program: impl Into<LabelSet>,
        department: impl Into<LabelSet>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            department: department.into(),
            price: price.into(),
        }
    }

    /// The three axes in application order.
    pub fn specs(&self) -> [FilterSpec; 3] {
        [
            FilterSpec::Program(self.program.clone()),
            FilterSpec::Department(self.department.clone()),
            FilterSpec::Price(self.price.clone()),
        ]
    }
}

/// Text fields scraped from one product card: description, price and, for
/// time-bound programs, the countdown. Empty fields are left out, so the
/// position of a value is only meaningful together with the field count.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProductRow(Vec<String>);

impl ProductRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` unless it is empty.
    pub fn push_non_empty(&mut self, value: Option<String>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.0.push(v);
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[&str; N]> for ProductRow {
    fn from(fields: [&str; N]) -> Self {
        Self(fields.iter().map(|f| f.to_string()).collect())
    }
}

/// Rows scraped from the deal grid, in card order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ResultTable(Vec<ProductRow>);

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, row: ProductRow) {
        self.0.push(row);
    }

    pub fn rows(&self) -> &[ProductRow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRow> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ProductRow;
    type IntoIter = std::slice::Iter<'a, ProductRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
