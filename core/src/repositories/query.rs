//! Filter, sort and limit descriptions for list queries.
//!
//! Callers build a [`ListQuery`] from untrusted field names and values;
//! [`ListQuery::compile`] checks it against a [`TableSchema`] and produces a
//! [`Selection`] whose column names all come from the static schema.

use std::fmt;
use std::str::FromStr;

use sv_shared::SortOrder;

use crate::errors::{DomainError, DomainResult};

use super::schema::{Column, ColumnKind, FieldValue, TableSchema};

/// Column used for the default newest-first ordering
pub const CREATED_AT: &str = "created_at";

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring match on text columns
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Contains => "contains",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Operator::as_str).collect()
    }

    fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Eq
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == wanted)
            .ok_or_else(|| DomainError::invalid_operator(s, &Self::names()))
    }
}

/// Parse a caller-supplied sort direction
pub fn parse_sort_order(value: &str) -> DomainResult<SortOrder> {
    value
        .parse::<SortOrder>()
        .map_err(DomainError::invalid_sort_order)
}

/// One unvalidated filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: FieldValue,
}

/// Exact-match conjunction of field/value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pairs: Vec<(String, FieldValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.pairs.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Filters, sorting and limit for a list operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    /// Sort field; `created_at` when absent
    pub sort_by: Option<String>,
    /// Sort direction; newest first when absent
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filter(field, Operator::Eq, value)
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Validate against `schema` and resolve every name to its static column
    pub fn compile(&self, schema: &'static TableSchema) -> DomainResult<Selection> {
        let conditions = self
            .filters
            .iter()
            .map(|filter| Condition::compile(schema, filter))
            .collect::<DomainResult<Vec<_>>>()?;

        let order = self.sort_order.unwrap_or(SortOrder::Desc);
        let sort_column = match &self.sort_by {
            Some(field) => schema.resolve(field)?,
            None => match schema.column(CREATED_AT) {
                Some(column) => column,
                None => schema.primary_key_column()?,
            },
        };

        let mut order_by = vec![(sort_column, order)];
        if sort_column.name != schema.primary_key {
            // Stable ordering for rows sharing the same sort value
            order_by.push((schema.primary_key_column()?, order));
        }

        Ok(Selection {
            conditions,
            order_by,
            limit: self.limit,
        })
    }
}

impl From<Filters> for ListQuery {
    fn from(filters: Filters) -> Self {
        filters
            .pairs
            .into_iter()
            .fold(ListQuery::new(), |query, (field, value)| query.eq(field, value))
    }
}

/// A validated condition over a known column
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static Column,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Condition {
    /// Equality on a known column
    pub fn equals(column: &'static Column, value: FieldValue) -> Self {
        Self {
            column,
            operator: Operator::Eq,
            value,
        }
    }

    fn compile(schema: &'static TableSchema, filter: &Filter) -> DomainResult<Self> {
        let column = schema.resolve(&filter.field)?;
        let value = column.kind.coerce(column.name, filter.value.clone())?;

        let unsupported = |reason: &str| {
            let mut details = serde_json::Map::new();
            details.insert("field".to_string(), column.name.into());
            details.insert("operator".to_string(), filter.operator.as_str().into());
            DomainError::validation_with(
                format!(
                    "Operator '{}' cannot be applied to field '{}': {}",
                    filter.operator, column.name, reason
                ),
                details,
            )
        };

        if value.is_null() && !matches!(filter.operator, Operator::Eq | Operator::Ne) {
            return Err(unsupported("null only supports eq and ne"));
        }
        if filter.operator == Operator::Contains && column.kind != ColumnKind::Text {
            return Err(unsupported("contains requires a text field"));
        }
        if filter.operator.is_ordering() && column.kind == ColumnKind::Json {
            return Err(unsupported("json values are not ordered"));
        }

        Ok(Self {
            column,
            operator: filter.operator,
            value,
        })
    }
}

/// Schema-checked selection handed to a store session
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub conditions: Vec<Condition>,
    pub order_by: Vec<(&'static Column, SortOrder)>,
    pub limit: Option<u64>,
}

impl Selection {
    /// Unordered match on a single column, used for key lookups
    pub fn by_column(column: &'static Column, value: FieldValue) -> Self {
        Self {
            conditions: vec![Condition::equals(column, value)],
            order_by: Vec::new(),
            limit: None,
        }
    }
}
