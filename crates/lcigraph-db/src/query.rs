//! Composable filters over activities and exchanges
//!
//! A query is a slice of filters that must all hold. Fields missing on a
//! record (e.g. the product of a biosphere exchange) read as the empty string.

use crate::model::{Activity, Exchange};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    ReferenceProduct,
    Location,
    Unit,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Name => "name",
            Field::ReferenceProduct => "reference product",
            Field::Location => "location",
            Field::Unit => "unit",
        };
        f.write_str(s)
    }
}

/// Records that filters can look into.
pub trait Fields {
    fn field(&self, field: Field) -> &str;
}

impl Fields for Activity {
    fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::ReferenceProduct => &self.reference_product,
            Field::Location => &self.location,
            Field::Unit => &self.unit,
        }
    }
}

impl Fields for Exchange {
    fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::ReferenceProduct => self.product_or_empty(),
            Field::Location => self.location.as_deref().unwrap_or(""),
            Field::Unit => &self.unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals(Field, String),
    Contains(Field, String),
    StartsWith(Field, String),
    DoesntContainAny(Field, Vec<String>),
    /// At least one of the inner filters holds.
    Either(Vec<Filter>),
    /// The inner filter does not hold.
    Exclude(Box<Filter>),
}

impl Filter {
    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Filter::Equals(field, value.into())
    }

    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Filter::Contains(field, value.into())
    }

    pub fn starts_with(field: Field, value: impl Into<String>) -> Self {
        Filter::StartsWith(field, value.into())
    }

    pub fn doesnt_contain_any<I, S>(field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::DoesntContainAny(field, values.into_iter().map(Into::into).collect())
    }

    pub fn either(filters: Vec<Filter>) -> Self {
        Filter::Either(filters)
    }

    pub fn exclude(filter: Filter) -> Self {
        Filter::Exclude(Box::new(filter))
    }

    pub fn matches<R: Fields + ?Sized>(&self, record: &R) -> bool {
        match self {
            Filter::Equals(f, v) => record.field(*f) == v,
            Filter::Contains(f, v) => record.field(*f).contains(v.as_str()),
            Filter::StartsWith(f, v) => record.field(*f).starts_with(v.as_str()),
            Filter::DoesntContainAny(f, vs) => {
                let s = record.field(*f);
                !vs.iter().any(|v| s.contains(v.as_str()))
            }
            Filter::Either(fs) => fs.iter().any(|inner| inner.matches(record)),
            Filter::Exclude(inner) => !inner.matches(record),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Equals(field, v) => write!(f, "{field} == '{v}'"),
            Filter::Contains(field, v) => write!(f, "{field} ~ '{v}'"),
            Filter::StartsWith(field, v) => write!(f, "{field} ^= '{v}'"),
            Filter::DoesntContainAny(field, vs) => write!(f, "{field} !~ {vs:?}"),
            Filter::Either(fs) => {
                f.write_str("(")?;
                for (i, inner) in fs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{inner}")?;
                }
                f.write_str(")")
            }
            Filter::Exclude(inner) => write!(f, "!{inner}"),
        }
    }
}

/// True when every filter holds.
pub fn matches_all<R: Fields + ?Sized>(filters: &[Filter], record: &R) -> bool {
    filters.iter().all(|f| f.matches(record))
}

pub fn describe(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" & ")
}
