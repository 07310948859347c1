//! Test fixtures: typed rows turned into crash tables.

use crate::config::AnalyticsConfig;
use crate::data::{ColumnMap, CrashTables};
use polars::prelude::*;

pub const CONFIG: &str = r#"
paths:
  archive: Data.zip
  primary_person: Data/Primary_Person_use.csv
  units: Data/Units_use.csv
  charges: Data/Charges_use.csv
  damages: Data/Damages_use.csv
car_body_styles:
  - PASSENGER CAR, 2-DOOR
  - PASSENGER CAR, 4-DOOR
  - POLICE CAR/TRUCK
  - SPORT UTILITY VEHICLE
no_airbag:
  - NOT DEPLOYED
  - DEPLOYED, SIDE
  - DEPLOYED, REAR
valid_license_types:
  - COMMERCIAL DRIVER LIC.
  - DRIVER LICENSE
alcohol_contrib_factr:
  - HAD BEEN DRINKING
  - UNDER INFLUENCE - ALCOHOL
damage_more_than_four:
  - DAMAGED 5
  - DAMAGED 6
  - DAMAGED 7 HIGHEST
car_insurance:
  - PROOF OF LIABILITY INSURANCE
  - LIABILITY INSURANCE POLICY
"#;

pub const SEDAN: &str = "PASSENGER CAR, 4-DOOR";

pub fn config() -> AnalyticsConfig {
    AnalyticsConfig::from_yaml(CONFIG).unwrap()
}

#[derive(Debug, Clone)]
pub struct PersonRow {
    pub crash_id: i64,
    pub unit_nbr: i64,
    pub person_type: &'static str,
    pub gender: Option<&'static str>,
    pub death_count: i64,
    pub license_type: Option<&'static str>,
    pub license_state: Option<&'static str>,
    pub airbag: Option<&'static str>,
    pub ethnicity: Option<&'static str>,
    pub zip: Option<&'static str>,
}

impl Default for PersonRow {
    fn default() -> Self {
        Self {
            crash_id: 1,
            unit_nbr: 1,
            person_type: "DRIVER",
            gender: Some("MALE"),
            death_count: 0,
            license_type: Some("DRIVER LICENSE"),
            license_state: Some("Texas"),
            airbag: Some("DEPLOYED, FRONT"),
            ethnicity: Some("WHITE"),
            zip: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitRow {
    pub crash_id: i64,
    pub unit_nbr: i64,
    pub body_style: Option<&'static str>,
    pub make: Option<&'static str>,
    pub color: Option<&'static str>,
    pub vin: Option<&'static str>,
    pub hit_and_run: Option<&'static str>,
    pub license_state: Option<&'static str>,
    pub damage_1: Option<&'static str>,
    pub damage_2: Option<&'static str>,
    pub contrib: Option<&'static str>,
    pub fin_resp: Option<&'static str>,
    pub injuries: i64,
    pub deaths: i64,
}

impl Default for UnitRow {
    fn default() -> Self {
        Self {
            crash_id: 1,
            unit_nbr: 1,
            body_style: Some(SEDAN),
            make: Some("FORD"),
            color: Some("BLK"),
            vin: None,
            hit_and_run: Some("N"),
            license_state: Some("TX"),
            damage_1: None,
            damage_2: None,
            contrib: None,
            fin_resp: None,
            injuries: 0,
            deaths: 0,
        }
    }
}

pub fn person_frame(rows: &[PersonRow]) -> DataFrame {
    DataFrame::new(vec![
        Column::new("CRASH_ID".into(), rows.iter().map(|r| r.crash_id).collect::<Vec<_>>()),
        Column::new("UNIT_NBR".into(), rows.iter().map(|r| r.unit_nbr).collect::<Vec<_>>()),
        Column::new("PRSN_TYPE_ID".into(), rows.iter().map(|r| r.person_type).collect::<Vec<_>>()),
        Column::new("PRSN_GNDR_ID".into(), rows.iter().map(|r| r.gender).collect::<Vec<_>>()),
        Column::new("DEATH_CNT".into(), rows.iter().map(|r| r.death_count).collect::<Vec<_>>()),
        Column::new("DRVR_LIC_TYPE_ID".into(), rows.iter().map(|r| r.license_type).collect::<Vec<_>>()),
        Column::new("DRVR_LIC_STATE_ID".into(), rows.iter().map(|r| r.license_state).collect::<Vec<_>>()),
        Column::new("PRSN_AIRBAG_ID".into(), rows.iter().map(|r| r.airbag).collect::<Vec<_>>()),
        Column::new("PRSN_ETHNICITY_ID".into(), rows.iter().map(|r| r.ethnicity).collect::<Vec<_>>()),
        Column::new("DRVR_ZIP".into(), rows.iter().map(|r| r.zip).collect::<Vec<_>>()),
    ])
    .unwrap()
}

pub fn unit_frame(rows: &[UnitRow]) -> DataFrame {
    DataFrame::new(vec![
        Column::new("CRASH_ID".into(), rows.iter().map(|r| r.crash_id).collect::<Vec<_>>()),
        Column::new("UNIT_NBR".into(), rows.iter().map(|r| r.unit_nbr).collect::<Vec<_>>()),
        Column::new("VEH_BODY_STYL_ID".into(), rows.iter().map(|r| r.body_style).collect::<Vec<_>>()),
        Column::new("VEH_MAKE_ID".into(), rows.iter().map(|r| r.make).collect::<Vec<_>>()),
        Column::new("VEH_COLOR_ID".into(), rows.iter().map(|r| r.color).collect::<Vec<_>>()),
        Column::new("VIN".into(), rows.iter().map(|r| r.vin).collect::<Vec<_>>()),
        Column::new("VEH_HNR_FL".into(), rows.iter().map(|r| r.hit_and_run).collect::<Vec<_>>()),
        Column::new("VEH_LIC_STATE_ID".into(), rows.iter().map(|r| r.license_state).collect::<Vec<_>>()),
        Column::new("VEH_DMAG_SCL_1_ID".into(), rows.iter().map(|r| r.damage_1).collect::<Vec<_>>()),
        Column::new("VEH_DMAG_SCL_2_ID".into(), rows.iter().map(|r| r.damage_2).collect::<Vec<_>>()),
        Column::new("CONTRIB_FACTR_P1_ID".into(), rows.iter().map(|r| r.contrib).collect::<Vec<_>>()),
        Column::new("FIN_RESP_TYPE_ID".into(), rows.iter().map(|r| r.fin_resp).collect::<Vec<_>>()),
        Column::new("TOT_INJRY_CNT".into(), rows.iter().map(|r| r.injuries).collect::<Vec<_>>()),
        Column::new("DEATH_CNT".into(), rows.iter().map(|r| r.deaths).collect::<Vec<_>>()),
    ])
    .unwrap()
}

/// `(crash_id, unit_nbr, charge)` rows.
pub fn charge_frame(rows: &[(i64, i64, Option<&'static str>)]) -> DataFrame {
    DataFrame::new(vec![
        Column::new("CRASH_ID".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()),
        Column::new("UNIT_NBR".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
        Column::new("CHARGE".into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()),
    ])
    .unwrap()
}

/// `(crash_id, damaged_property)` rows.
pub fn damage_frame(rows: &[(i64, Option<&'static str>)]) -> DataFrame {
    DataFrame::new(vec![
        Column::new("CRASH_ID".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()),
        Column::new("DAMAGED_PROPERTY".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
    ])
    .unwrap()
}

/// Crash tables built from row fixtures with the stock column names.
#[derive(Default)]
pub struct TableBuilder {
    pub persons: Vec<PersonRow>,
    pub units: Vec<UnitRow>,
    pub charges: Vec<(i64, i64, Option<&'static str>)>,
    pub damages: Vec<(i64, Option<&'static str>)>,
}

impl TableBuilder {
    pub fn build(&self) -> CrashTables {
        CrashTables::new(
            person_frame(&self.persons),
            unit_frame(&self.units),
            charge_frame(&self.charges),
            damage_frame(&self.damages),
            ColumnMap::default(),
        )
        .unwrap()
    }
}
