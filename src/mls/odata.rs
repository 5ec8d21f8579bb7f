// src/mls/odata.rs
//
// Filter clauses and query options for the AMPRE OData dialect. Clauses are
// built as a small tree and only turned into a `$filter` string at the very
// end, so builders can be tested on structure rather than on string output.

use std::fmt;

/// A value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Int(i64),
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<u32> for Literal {
    fn from(n: u32) -> Self {
        Literal::Int(i64::from(n))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "'{}'", escape(s)),
            Literal::Int(n) => write!(f, "{n}"),
        }
    }
}

/// One condition in a provider `$filter`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    Eq(&'static str, Literal),
    Ge(&'static str, Literal),
    Le(&'static str, Literal),
    Contains(&'static str, String),
    /// Disjunction, rendered in parentheses.
    Or(Vec<FilterClause>),
    /// Nested conjunction, for use inside an `Or`.
    And(Vec<FilterClause>),
}

impl FilterClause {
    pub fn eq(field: &'static str, value: impl Into<Literal>) -> Self {
        FilterClause::Eq(field, value.into())
    }

    pub fn ge(field: &'static str, value: impl Into<Literal>) -> Self {
        FilterClause::Ge(field, value.into())
    }

    pub fn le(field: &'static str, value: impl Into<Literal>) -> Self {
        FilterClause::Le(field, value.into())
    }

    pub fn contains(field: &'static str, value: impl Into<String>) -> Self {
        FilterClause::Contains(field, value.into())
    }

    /// OR-group. A single alternative collapses to itself.
    pub fn any_of(mut clauses: Vec<FilterClause>) -> Self {
        if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            FilterClause::Or(clauses)
        }
    }

    /// AND-group. A single member collapses to itself.
    pub fn all_of(mut clauses: Vec<FilterClause>) -> Self {
        if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            FilterClause::And(clauses)
        }
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterClause::Eq(field, v) => write!(f, "{field} eq {v}"),
            FilterClause::Ge(field, v) => write!(f, "{field} ge {v}"),
            FilterClause::Le(field, v) => write!(f, "{field} le {v}"),
            FilterClause::Contains(field, v) => write!(f, "contains({field},'{}')", escape(v)),
            FilterClause::Or(items) => write_group(f, items, " or ", "false"),
            FilterClause::And(items) => write_group(f, items, " and ", "true"),
        }
    }
}

fn write_group(
    f: &mut fmt::Formatter<'_>,
    items: &[FilterClause],
    sep: &str,
    empty: &str,
) -> fmt::Result {
    if items.is_empty() {
        return f.write_str(empty);
    }
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

/// OData string literals escape a single quote by doubling it.
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Asc => write!(f, "{} asc", self.field),
            Direction::Desc => write!(f, "{} desc", self.field),
        }
    }
}

/// Everything the gateway needs to issue one OData request.
/// The top-level `filters` are ANDed together.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub filters: Vec<FilterClause>,
    pub select: Vec<&'static str>,
    pub top: u32,
    pub skip: u32,
    pub order_by: Option<OrderBy>,
    pub count: bool,
}

impl ProviderQuery {
    pub fn new(filters: Vec<FilterClause>, select: &[&'static str]) -> Self {
        Self {
            filters,
            select: select.to_vec(),
            top: 0,
            skip: 0,
            order_by: None,
            count: false,
        }
    }

    pub fn filter_string(&self) -> String {
        self.filters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" and ")
    }

    /// Same filter and ordering, one window further on.
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.skip = self.skip + self.top;
        next
    }

    /// Query-string pairs in the order the provider documents them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let filter = self.filter_string();
        if !filter.is_empty() {
            params.push(("$filter", filter));
        }
        if !self.select.is_empty() {
            params.push(("$select", self.select.join(",")));
        }
        if self.top > 0 {
            params.push(("$top", self.top.to_string()));
        }
        if self.skip > 0 {
            params.push(("$skip", self.skip.to_string()));
        }
        if let Some(order) = &self.order_by {
            params.push(("$orderby", order.to_string()));
        }
        if self.count {
            params.push(("$count", "true".to_string()));
        }

        params
    }
}
