//! Ranking Module
//! Group-wise counts and totals with deterministic top-N ordering.

use polars::prelude::*;

const TALLY: &str = "__tally";

/// A group key with its count or total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub key: String,
    pub value: i64,
}

/// Count rows per non-null `key`, ranked.
pub fn frequency(lf: LazyFrame, key: &str) -> PolarsResult<Vec<Ranked>> {
    let df = lf
        .select([col(key).cast(DataType::String)])
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([len().cast(DataType::Int64).alias(TALLY)])
        .collect()?;
    ranked(&df, key)
}

/// Sum `value` per non-null `key`, ranked.
pub fn totals(lf: LazyFrame, key: &str, value: &str) -> PolarsResult<Vec<Ranked>> {
    let df = lf
        .select([col(key).cast(DataType::String), col(value)])
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([col(value).sum().cast(DataType::Int64).alias(TALLY)])
        .collect()?;
    ranked(&df, key)
}

/// Number of distinct non-null values in `column`.
pub fn distinct_count(lf: LazyFrame, column: &str) -> PolarsResult<usize> {
    let df = lf
        .select([col(column).drop_nulls().n_unique().cast(DataType::Int64).alias(TALLY)])
        .collect()?;
    let n = df.column(TALLY)?.i64()?.get(0).unwrap_or(0);
    Ok(n.max(0) as usize)
}

/// Keys of the ranks `[start, end)`, clamped to what exists.
pub fn slice_keys(ranked: &[Ranked], start: usize, end: usize) -> Vec<String> {
    ranked
        .iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(|r| r.key.clone())
        .collect()
}

/// Keys of the `n` highest ranks.
pub fn top_keys(ranked: &[Ranked], n: usize) -> Vec<String> {
    slice_keys(ranked, 0, n)
}

/// Descending value; ties fall back to ascending key.
pub fn rank(items: &mut [Ranked]) {
    items.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
}

fn ranked(df: &DataFrame, key: &str) -> PolarsResult<Vec<Ranked>> {
    let keys = df.column(key)?.str()?;
    let values = df.column(TALLY)?.i64()?;

    let mut items: Vec<Ranked> = keys
        .into_iter()
        .zip(values)
        .filter_map(|(k, v)| {
            Some(Ranked {
                key: k?.to_string(),
                value: v.unwrap_or(0),
            })
        })
        .collect();
    rank(&mut items);
    Ok(items)
}
