//! Column Mapping Module
//! Maps the logical columns used by the queries onto source column names.

use serde::Deserialize;

/// Source column names, resolved once when the configuration is parsed.
///
/// Any entry left out of the `columns` section keeps the name used by the
/// published crash extracts, so an empty map targets the stock schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    // Join keys
    pub crash_id: String,
    pub unit_nbr: String,

    // Primary person
    pub gender: String,
    pub person_death_count: String,
    pub license_type: String,
    pub driver_license_state: String,
    pub airbag: String,
    pub ethnicity: String,
    pub driver_zip: String,
    pub person_type: String,

    // Unit
    pub body_style: String,
    pub make: String,
    pub color: String,
    pub vin: String,
    pub hit_and_run: String,
    pub vehicle_license_state: String,
    pub damage_scale_1: String,
    pub damage_scale_2: String,
    pub contributing_factor: String,
    pub financial_responsibility: String,
    pub total_injury_count: String,
    pub unit_death_count: String,

    // Charge
    pub charge: String,

    // Damage
    pub damaged_property: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            crash_id: "CRASH_ID".into(),
            unit_nbr: "UNIT_NBR".into(),
            gender: "PRSN_GNDR_ID".into(),
            person_death_count: "DEATH_CNT".into(),
            license_type: "DRVR_LIC_TYPE_ID".into(),
            driver_license_state: "DRVR_LIC_STATE_ID".into(),
            airbag: "PRSN_AIRBAG_ID".into(),
            ethnicity: "PRSN_ETHNICITY_ID".into(),
            driver_zip: "DRVR_ZIP".into(),
            person_type: "PRSN_TYPE_ID".into(),
            body_style: "VEH_BODY_STYL_ID".into(),
            make: "VEH_MAKE_ID".into(),
            color: "VEH_COLOR_ID".into(),
            vin: "VIN".into(),
            hit_and_run: "VEH_HNR_FL".into(),
            vehicle_license_state: "VEH_LIC_STATE_ID".into(),
            damage_scale_1: "VEH_DMAG_SCL_1_ID".into(),
            damage_scale_2: "VEH_DMAG_SCL_2_ID".into(),
            contributing_factor: "CONTRIB_FACTR_P1_ID".into(),
            financial_responsibility: "FIN_RESP_TYPE_ID".into(),
            total_injury_count: "TOT_INJRY_CNT".into(),
            unit_death_count: "DEATH_CNT".into(),
            charge: "CHARGE".into(),
            damaged_property: "DAMAGED_PROPERTY".into(),
        }
    }
}

/// How a column is conformed after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Join key, stored as Int64
    Key,
    /// Numeric count, stored as Int64
    Count,
    /// Coded category or free text, stored as String
    Text,
}

impl ColumnMap {
    /// Columns of the primary person table the queries read.
    pub fn person_columns(&self) -> Vec<(&str, ColumnKind)> {
        vec![
            (self.crash_id.as_str(), ColumnKind::Key),
            (self.unit_nbr.as_str(), ColumnKind::Key),
            (self.gender.as_str(), ColumnKind::Text),
            (self.person_death_count.as_str(), ColumnKind::Count),
            (self.license_type.as_str(), ColumnKind::Text),
            (self.driver_license_state.as_str(), ColumnKind::Text),
            (self.airbag.as_str(), ColumnKind::Text),
            (self.ethnicity.as_str(), ColumnKind::Text),
            (self.driver_zip.as_str(), ColumnKind::Text),
            (self.person_type.as_str(), ColumnKind::Text),
        ]
    }

    /// Columns of the unit table the queries read.
    pub fn unit_columns(&self) -> Vec<(&str, ColumnKind)> {
        vec![
            (self.crash_id.as_str(), ColumnKind::Key),
            (self.unit_nbr.as_str(), ColumnKind::Key),
            (self.body_style.as_str(), ColumnKind::Text),
            (self.make.as_str(), ColumnKind::Text),
            (self.color.as_str(), ColumnKind::Text),
            (self.vin.as_str(), ColumnKind::Text),
            (self.hit_and_run.as_str(), ColumnKind::Text),
            (self.vehicle_license_state.as_str(), ColumnKind::Text),
            (self.damage_scale_1.as_str(), ColumnKind::Text),
            (self.damage_scale_2.as_str(), ColumnKind::Text),
            (self.contributing_factor.as_str(), ColumnKind::Text),
            (self.financial_responsibility.as_str(), ColumnKind::Text),
            (self.total_injury_count.as_str(), ColumnKind::Count),
            (self.unit_death_count.as_str(), ColumnKind::Count),
        ]
    }

    pub fn charge_columns(&self) -> Vec<(&str, ColumnKind)> {
        vec![
            (self.crash_id.as_str(), ColumnKind::Key),
            (self.unit_nbr.as_str(), ColumnKind::Key),
            (self.charge.as_str(), ColumnKind::Text),
        ]
    }

    pub fn damage_columns(&self) -> Vec<(&str, ColumnKind)> {
        vec![
            (self.crash_id.as_str(), ColumnKind::Key),
            (self.damaged_property.as_str(), ColumnKind::Text),
        ]
    }
}
