//! Transaction-backed session and the SQL it issues.

use async_trait::async_trait;
use sqlx::postgres::Postgres;
use sqlx::{QueryBuilder, Transaction};

use sv_core::errors::{DomainError, DomainResult};
use sv_core::repositories::{
    Condition, FieldValue, Operator, Record, Selection, Session, TableSchema,
};

use super::codec::{decode_row, ident, map_error, push_value};
use crate::database_failure;

/// One database transaction
///
/// Dropping the session without committing rolls the transaction back.
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
}

impl PgSession {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

fn column_list(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|c| ident(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `INSERT ... RETURNING` for the columns present in `record`
pub(crate) fn build_insert(
    schema: &'static TableSchema,
    record: &Record,
) -> DomainResult<QueryBuilder<'static, Postgres>> {
    let present: Vec<_> = schema
        .columns
        .iter()
        .filter_map(|column| record.get(column.name).map(|value| (column, value)))
        .collect();
    if present.len() != record.len() {
        let unknown: Vec<&str> = record
            .iter()
            .map(|(name, _)| name)
            .filter(|name| schema.column(name).is_none())
            .collect();
        return Err(DomainError::internal(format!(
            "Columns {:?} do not belong to table '{}'",
            unknown, schema.table
        )));
    }

    let mut qb = QueryBuilder::new(format!("INSERT INTO {} (", ident(schema.table)));
    for (i, (column, _)) in present.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(ident(column.name));
    }
    qb.push(") VALUES (");
    for (i, (column, value)) in present.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(&mut qb, column, value)?;
    }
    qb.push(") RETURNING ");
    qb.push(column_list(schema));
    Ok(qb)
}

fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, condition: &Condition) -> DomainResult<()> {
    let column = ident(condition.column.name);

    if condition.value.is_null() {
        let test = match condition.operator {
            Operator::Eq => "IS NULL",
            Operator::Ne => "IS NOT NULL",
            other => {
                return Err(DomainError::internal(format!(
                    "Operator '{}' cannot compare with null",
                    other
                )))
            }
        };
        qb.push(format!("{} {}", column, test));
        return Ok(());
    }

    let comparison = match condition.operator {
        Operator::Eq => "=",
        Operator::Ne => "<>",
        Operator::Gt => ">",
        Operator::Gte => ">=",
        Operator::Lt => "<",
        Operator::Lte => "<=",
        Operator::Contains => {
            qb.push(format!("strpos(lower({}), lower(", column));
            push_value(qb, condition.column, &condition.value)?;
            qb.push(")) > 0");
            return Ok(());
        }
    };
    qb.push(format!("{} {} ", column, comparison));
    push_value(qb, condition.column, &condition.value)
}

/// `SELECT` for a validated selection
pub(crate) fn build_select(
    schema: &'static TableSchema,
    selection: &Selection,
) -> DomainResult<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        column_list(schema),
        ident(schema.table)
    ));

    for (i, condition) in selection.conditions.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_condition(&mut qb, condition)?;
    }

    for (i, (column, order)) in selection.order_by.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(format!("{} {}", ident(column.name), order.as_sql()));
    }

    if let Some(limit) = selection.limit {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }
    Ok(qb)
}

/// `UPDATE` of the primary-key row; `None` when there is nothing to change
pub(crate) fn build_update(
    schema: &'static TableSchema,
    key: &FieldValue,
    changes: &Record,
) -> DomainResult<Option<QueryBuilder<'static, Postgres>>> {
    if changes.is_empty() {
        return Ok(None);
    }

    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", ident(schema.table)));
    for (i, (name, value)) in changes.iter().enumerate() {
        let column = schema.resolve(name)?;
        if i > 0 {
            qb.push(", ");
        }
        qb.push(format!("{} = ", ident(column.name)));
        push_value(&mut qb, column, value)?;
    }
    let key_column = schema.primary_key_column()?;
    qb.push(format!(" WHERE {} = ", ident(key_column.name)));
    push_value(&mut qb, key_column, key)?;
    Ok(Some(qb))
}

/// `DELETE` of the primary-key row; dependants go through `ON DELETE CASCADE`
pub(crate) fn build_delete(
    schema: &'static TableSchema,
    key: &FieldValue,
) -> DomainResult<QueryBuilder<'static, Postgres>> {
    let key_column = schema.primary_key_column()?;
    let mut qb = QueryBuilder::new(format!(
        "DELETE FROM {} WHERE {} = ",
        ident(schema.table),
        ident(key_column.name)
    ));
    push_value(&mut qb, key_column, key)?;
    Ok(qb)
}

#[async_trait]
impl Session for PgSession {
    async fn insert(&mut self, schema: &'static TableSchema, record: Record) -> DomainResult<Record> {
        let shown_key = record
            .get(schema.primary_key)
            .filter(|key| !key.is_null())
            .map(ToString::to_string);
        let mut qb = build_insert(schema, &record)?;

        let row = qb
            .build()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_error(e, schema, "insert", shown_key))?;
        decode_row(schema, &row)
    }

    async fn select(
        &mut self,
        schema: &'static TableSchema,
        selection: &Selection,
    ) -> DomainResult<Vec<Record>> {
        let mut qb = build_select(schema, selection)?;

        let rows = qb
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_error(e, schema, "select", None))?;
        rows.iter().map(|row| decode_row(schema, row)).collect()
    }

    async fn update(
        &mut self,
        schema: &'static TableSchema,
        key: FieldValue,
        changes: Record,
    ) -> DomainResult<u64> {
        let Some(mut qb) = build_update(schema, &key, &changes)? else {
            return Ok(0);
        };

        let result = qb
            .build()
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_error(e, schema, "update", None))?;
        Ok(result.rows_affected())
    }

    async fn delete(&mut self, schema: &'static TableSchema, key: FieldValue) -> DomainResult<u64> {
        let mut qb = build_delete(schema, &key)?;

        let result = qb
            .build()
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_error(e, schema, "delete", None))?;
        Ok(result.rows_affected())
    }

    async fn commit(self) -> DomainResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| database_failure(&e, Some("commit")))
    }

    async fn rollback(self) -> DomainResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| database_failure(&e, Some("rollback")))
    }
}
