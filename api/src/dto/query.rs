//! Filter body accepted by list endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sv_core::errors::DomainResult;
use sv_core::repositories::{parse_sort_order, FieldValue, Filter, ListQuery, Operator};

/// `{filters: [{field, operator?, value}], sort_by?, sort_order?, limit?}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub filters: Vec<FilterRequest>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub field: String,
    /// `eq` when absent
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl ListRequest {
    /// Parse operator and sort names; field names are checked when the query runs
    pub fn into_query(self) -> DomainResult<ListQuery> {
        let filters = self
            .filters
            .into_iter()
            .map(|filter| {
                let operator = match filter.operator.as_deref() {
                    Some(name) => name.parse::<Operator>()?,
                    None => Operator::default(),
                };
                Ok(Filter {
                    field: filter.field,
                    operator,
                    value: FieldValue::from_json(filter.value),
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let sort_order = self
            .sort_order
            .as_deref()
            .map(parse_sort_order)
            .transpose()?;

        Ok(ListQuery {
            filters,
            sort_by: self.sort_by,
            sort_order,
            limit: self.limit,
        })
    }
}
