//! Crash Tables Module
//! The four tables the analytics run over, presence-checked and type-conformed.

use super::loader::LoaderError;
use super::schema::{ColumnKind, ColumnMap};
use polars::prelude::*;

pub const PRIMARY_PERSON: &str = "primary_person";
pub const UNITS: &str = "units";
pub const CHARGES: &str = "charges";
pub const DAMAGES: &str = "damages";

/// Read-only set of crash tables shared by every query.
#[derive(Debug, Clone)]
pub struct CrashTables {
    primary: DataFrame,
    units: DataFrame,
    charges: DataFrame,
    damages: DataFrame,
    columns: ColumnMap,
}

impl CrashTables {
    /// Check that every column a query reads is present, then cast keys and
    /// counts to Int64 and coded values to String.
    pub fn new(
        primary: DataFrame,
        units: DataFrame,
        charges: DataFrame,
        damages: DataFrame,
        columns: ColumnMap,
    ) -> Result<Self, LoaderError> {
        let primary = conform(PRIMARY_PERSON, primary, &columns.person_columns())?;
        let units = conform(UNITS, units, &columns.unit_columns())?;
        let charges = conform(CHARGES, charges, &columns.charge_columns())?;
        let damages = conform(DAMAGES, damages, &columns.damage_columns())?;

        Ok(Self {
            primary,
            units,
            charges,
            damages,
            columns,
        })
    }

    pub fn persons(&self) -> LazyFrame {
        self.primary.clone().lazy()
    }

    pub fn units(&self) -> LazyFrame {
        self.units.clone().lazy()
    }

    pub fn charges(&self) -> LazyFrame {
        self.charges.clone().lazy()
    }

    pub fn damages(&self) -> LazyFrame {
        self.damages.clone().lazy()
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Row counts per table, in load order.
    pub fn row_counts(&self) -> [(&'static str, usize); 4] {
        [
            (PRIMARY_PERSON, self.primary.height()),
            (UNITS, self.units.height()),
            (CHARGES, self.charges.height()),
            (DAMAGES, self.damages.height()),
        ]
    }
}

fn conform(
    table: &'static str,
    df: DataFrame,
    wanted: &[(&str, ColumnKind)],
) -> Result<DataFrame, LoaderError> {
    let mut seen: Vec<&str> = Vec::with_capacity(wanted.len());
    let mut casts: Vec<Expr> = Vec::with_capacity(wanted.len());

    for &(name, kind) in wanted {
        if df.get_column_index(name).is_none() {
            return Err(LoaderError::MissingColumn {
                table,
                column: name.to_string(),
            });
        }
        // Two logical columns may alias one source column
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let dtype = match kind {
            ColumnKind::Key | ColumnKind::Count => DataType::Int64,
            ColumnKind::Text => DataType::String,
        };
        casts.push(col(name).cast(dtype));
    }

    Ok(df.lazy().with_columns(casts).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{self, UnitRow};

    #[test]
    fn conform_casts_keys_counts_and_codes() {
        let units = df!(
            "CRASH_ID" => [1i32, 2],
            "UNIT_NBR" => [1i32, 1],
            "VEH_BODY_STYL_ID" => ["MOTORCYCLE", "PICKUP"],
            "VEH_MAKE_ID" => ["HONDA", "FORD"],
            "VEH_COLOR_ID" => [99i64, 98],
            "VIN" => ["V1", "V2"],
            "VEH_HNR_FL" => ["N", "Y"],
            "VEH_LIC_STATE_ID" => ["TX", "TX"],
            "VEH_DMAG_SCL_1_ID" => ["NA", "NA"],
            "VEH_DMAG_SCL_2_ID" => ["NA", "NA"],
            "CONTRIB_FACTR_P1_ID" => ["NONE", "NONE"],
            "FIN_RESP_TYPE_ID" => ["NA", "NA"],
            "TOT_INJRY_CNT" => [0i32, 1],
            "DEATH_CNT" => [0i32, 0]
        )
        .unwrap();

        let tables = CrashTables::new(
            fixtures::person_frame(&[]),
            units,
            fixtures::charge_frame(&[]),
            fixtures::damage_frame(&[]),
            ColumnMap::default(),
        )
        .unwrap();

        let units = tables.units().collect().unwrap();
        assert_eq!(units.column("CRASH_ID").unwrap().dtype(), &DataType::Int64);
        assert_eq!(units.column("TOT_INJRY_CNT").unwrap().dtype(), &DataType::Int64);
        assert_eq!(units.column("VEH_COLOR_ID").unwrap().dtype(), &DataType::String);
        assert_eq!(tables.row_counts()[1], (UNITS, 2));
    }

    #[test]
    fn conform_parses_text_keys_and_counts() {
        let charges = df!(
            "CRASH_ID" => ["10", "11"],
            "UNIT_NBR" => ["1", "2"],
            "CHARGE" => ["SPEEDING", "DWI"]
        )
        .unwrap();

        let tables = CrashTables::new(
            fixtures::person_frame(&[]),
            fixtures::unit_frame(&[]),
            charges,
            fixtures::damage_frame(&[]),
            ColumnMap::default(),
        )
        .unwrap();

        let charges = tables.charges().collect().unwrap();
        let ids: Vec<Option<i64>> = charges.column("CRASH_ID").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(10), Some(11)]);
        assert_eq!(charges.column("UNIT_NBR").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn missing_column_names_table_and_column() {
        let units = fixtures::unit_frame(&[UnitRow::default()])
            .drop("VIN")
            .unwrap();

        let err = CrashTables::new(
            fixtures::person_frame(&[]),
            units,
            fixtures::charge_frame(&[]),
            fixtures::damage_frame(&[]),
            ColumnMap::default(),
        )
        .unwrap_err();

        match err {
            LoaderError::MissingColumn { table, column } => {
                assert_eq!(table, UNITS);
                assert_eq!(column, "VIN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
