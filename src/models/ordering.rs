use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::models::cast;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SortDir { #[default] Asc, Desc }

impl SortDir {
    pub fn as_sql(&self) -> &'static str {
        match self { SortDir::Asc => "ASC", SortDir::Desc => "DESC" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub column: &'static str,
    pub dir: SortDir,
}

/// A validated ORDER BY list. Columns come from a per-table whitelist, so
/// the rendered SQL never contains caller text.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy(pub Vec<SortSpec>);

impl OrderBy {
    /// Default presentation order.
    pub fn by_sort_order() -> Self {
        OrderBy(vec![SortSpec { column: "sort_order", dir: SortDir::Asc }])
    }

    /// Parse `"label desc, name"` style input. `None` or blank gives sort_order ascending.
    pub fn parse(raw: Option<&str>, allowed: &[&'static str]) -> Result<Self, AppError> {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(Self::by_sort_order()),
        };

        let mut specs = Vec::new();
        for part in raw.split(',') {
            let mut words = part.split_whitespace();
            let Some(col) = words.next() else {
                return Err(AppError::InvalidInput(format!("Empty sort term in {raw:?}")));
            };
            let column = allowed
                .iter()
                .copied()
                .find(|c| c.eq_ignore_ascii_case(col))
                .ok_or_else(|| AppError::InvalidInput(format!("Cannot order by {col:?}")))?;
            let dir = match words.next().map(|d| d.to_ascii_lowercase()) {
                None => SortDir::Asc,
                Some(d) if d == "asc" => SortDir::Asc,
                Some(d) if d == "desc" => SortDir::Desc,
                Some(d) => return Err(AppError::InvalidInput(format!("Unknown sort direction {d:?}"))),
            };
            if words.next().is_some() {
                return Err(AppError::InvalidInput(format!("Malformed sort term {part:?}")));
            }
            specs.push(SortSpec { column, dir });
        }
        Ok(OrderBy(specs))
    }

    /// Render the clause. Ties fall back to ascending id (storage order).
    pub fn to_sql(&self) -> String {
        let mut terms: Vec<String> = self
            .0
            .iter()
            .map(|s| format!("{} {}", s.column, s.dir.as_sql()))
            .collect();
        if !self.0.iter().any(|s| s.column == "id") {
            terms.push("id ASC".to_string());
        }
        format!(" ORDER BY {}", terms.join(", "))
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::by_sort_order()
    }
}

/// LIMIT/OFFSET pair. Zero or negative values count as not given.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Page {
            limit: limit.filter(|n| *n > 0),
            offset: offset.filter(|n| *n > 0),
        }
    }

    pub fn all() -> Self {
        Page::default()
    }

    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = self.offset {
            qb.push(" OFFSET ").push_bind(offset);
        }
    }
}

/// One entry of a drag-and-drop reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SortOrderItem {
    #[serde(deserialize_with = "required_id")]
    pub id: i64,
    #[serde(deserialize_with = "required_sort_order")]
    pub sort_order: i32,
}

fn required_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    cast::optional_id(deserializer)?.ok_or_else(|| serde::de::Error::custom("id is required"))
}

fn required_sort_order<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    cast::optional_sort_order(deserializer)?.ok_or_else(|| serde::de::Error::custom("sort_order is required"))
}

/// Apply a reorder batch to `table` inside one transaction. Ids that match
/// no row are skipped; returns how many rows were updated.
pub(crate) async fn reorder_rows(
    pool: &PgPool,
    table: &'static str,
    items: &[SortOrderItem],
) -> Result<u64, AppError> {
    let sql = format!("UPDATE {table} SET sort_order = $1 WHERE id = $2");
    let mut tx = pool.begin().await?;
    let mut updated = 0;
    for item in items {
        let result = sqlx::query(&sql)
            .bind(item.sort_order)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            log::warn!("{table}: id {} not found while reordering, skipped", item.id);
        }
        updated += result.rows_affected();
    }
    tx.commit().await?;
    Ok(updated)
}
