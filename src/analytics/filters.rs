//! Filter Predicates
//! Fixed category values and membership predicates shared by the queries.

use polars::prelude::*;

pub const MALE: &str = "MALE";
pub const FEMALE: &str = "FEMALE";
pub const DRIVER: &str = "DRIVER";
pub const HIT_AND_RUN: &str = "Y";
pub const SPEED: &str = "SPEED";

/// Body styles counted as two-wheelers.
pub const TWO_WHEELER_BODY_STYLES: [&str; 2] = ["MOTORCYCLE", "POLICE MOTORCYCLE"];

/// `column IN values`. Null cells never match; an empty list matches nothing.
pub fn is_one_of<S: AsRef<str>>(column: &str, values: &[S]) -> Expr {
    let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    col(column).is_in(lit(Series::new(column.into(), values)))
}

/// `(crash_id, unit_nbr)` join key expressions.
pub fn unit_key(crash_id: &str, unit_nbr: &str) -> [Expr; 2] {
    [col(crash_id), col(unit_nbr)]
}

/// Text column contains `needle` as a plain substring.
pub fn contains_text(column: &str, needle: &str) -> Expr {
    col(column).str().contains_literal(lit(needle))
}
