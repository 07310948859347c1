//! Crash Analytics Queries
//! The ten analytical questions, each a filter/join/group-by pipeline over the crash tables.

use super::filters::{
    contains_text, is_one_of, unit_key, DRIVER, FEMALE, HIT_AND_RUN, MALE, SPEED,
    TWO_WHEELER_BODY_STYLES,
};
use super::ranking::{distinct_count, frequency, slice_keys, top_keys, totals};
use crate::config::{keys, AnalyticsConfig, ConfigError};
use crate::data::CrashTables;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

const TOP_MAKES: usize = 5;
const TOP_ZIPS: usize = 5;
const TOP_COLORS: usize = 10;
const TOP_OFFENSE_STATES: usize = 25;

const TOTAL_INJURIES: &str = "total_injuries";
const GROUP_COUNT: &str = "count";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Most frequent ethnicity for one body style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleEthnicity {
    pub body_style: String,
    pub top_ethnicity: String,
}

/// Answers the crash questions over a loaded, read-only set of tables.
pub struct CrashAnalytics<'a> {
    tables: &'a CrashTables,
    config: &'a AnalyticsConfig,
}

impl<'a> CrashAnalytics<'a> {
    pub fn new(tables: &'a CrashTables, config: &'a AnalyticsConfig) -> Self {
        Self { tables, config }
    }

    /// Join two frames on `(crash_id, unit_nbr)`.
    fn join_units(&self, left: LazyFrame, right: LazyFrame, how: JoinType) -> LazyFrame {
        let c = self.tables.columns();
        left.join(
            right,
            unit_key(&c.crash_id, &c.unit_nbr),
            unit_key(&c.crash_id, &c.unit_nbr),
            JoinArgs::new(how),
        )
    }

    /// Units whose body style is configured as a car.
    fn car_units(&self) -> Result<LazyFrame, QueryError> {
        let c = self.tables.columns();
        let styles = self.config.categories(keys::CAR_BODY_STYLES)?;
        Ok(self.tables.units().filter(is_one_of(&c.body_style, styles)))
    }

    /// `(crash_id, unit_nbr)` of drivers holding a valid license type.
    fn valid_license_drivers(&self) -> Result<LazyFrame, QueryError> {
        let c = self.tables.columns();
        let valid = self.config.categories(keys::VALID_LICENSE_TYPES)?;
        Ok(self
            .tables
            .persons()
            .filter(
                is_one_of(&c.license_type, valid)
                    .and(col(c.person_type.as_str()).eq(lit(DRIVER))),
            )
            .select(unit_key(&c.crash_id, &c.unit_nbr)))
    }

    /// Q1: crashes where more than two males were killed.
    pub fn crashes_with_male_deaths_over_two(&self) -> Result<usize, QueryError> {
        let c = self.tables.columns();
        let deaths = c.person_death_count.as_str();

        let crashes = self
            .tables
            .persons()
            .filter(
                col(deaths)
                    .eq(lit(1i64))
                    .and(col(c.gender.as_str()).eq(lit(MALE))),
            )
            .group_by([col(c.crash_id.as_str())])
            .agg([col(deaths).sum()])
            .filter(col(deaths).gt(lit(2i64)))
            .collect()?;

        log::debug!("Q1: {} crashes above two male deaths", crashes.height());
        Ok(crashes.height())
    }

    /// Q2: distinct two-wheelers booked with at least one charge.
    pub fn two_wheelers_charged(&self) -> Result<usize, QueryError> {
        let c = self.tables.columns();
        let [crash_id, unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);

        let two_wheelers = self
            .tables
            .units()
            .filter(is_one_of(&c.body_style, &TWO_WHEELER_BODY_STYLES))
            .select([crash_id, unit_nbr, col(c.vin.as_str())]);
        let charged = self.tables.charges().select(unit_key(&c.crash_id, &c.unit_nbr));

        let booked = self.join_units(two_wheelers, charged, JoinType::Inner);
        Ok(distinct_count(booked, &c.vin)?)
    }

    /// Q3: top car makes in crashes where the driver died and the airbag did not deploy.
    pub fn top_car_makes_fatal_no_airbag(&self) -> Result<Vec<String>, QueryError> {
        let c = self.tables.columns();
        let no_airbag = self.config.categories(keys::NO_AIRBAG)?;
        let [crash_id, unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);

        let makes = self
            .car_units()?
            .select([crash_id, unit_nbr, col(c.make.as_str())]);
        let fatal_drivers = self
            .tables
            .persons()
            .filter(
                is_one_of(&c.airbag, no_airbag)
                    .and(col(c.person_type.as_str()).eq(lit(DRIVER)))
                    .and(col(c.person_death_count.as_str()).eq(lit(1i64))),
            )
            .select(unit_key(&c.crash_id, &c.unit_nbr));

        let joined = self.join_units(makes, fatal_drivers, JoinType::Inner);
        Ok(top_keys(&frequency(joined, &c.make)?, TOP_MAKES))
    }

    /// Q4: distinct vehicles with a validly licensed driver involved in a hit and run.
    pub fn hit_and_run_valid_license_vehicles(&self) -> Result<usize, QueryError> {
        let c = self.tables.columns();
        let [crash_id, unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);

        let hit_and_run = self
            .tables
            .units()
            .filter(col(c.hit_and_run.as_str()).eq(lit(HIT_AND_RUN)))
            .select([crash_id, unit_nbr, col(c.vin.as_str())]);

        let joined = self.join_units(self.valid_license_drivers()?, hit_and_run, JoinType::Inner);
        Ok(distinct_count(joined, &c.vin)?)
    }

    /// Q5: driver license state with the most crashes that involved no female.
    ///
    /// Each crash counts once, under the state of its first person row.
    pub fn top_state_without_females(&self) -> Result<Option<String>, QueryError> {
        let c = self.tables.columns();
        let state = c.driver_license_state.as_str();
        let has_female = "has_female";

        let crashes = self
            .tables
            .persons()
            .group_by([col(c.crash_id.as_str())])
            .agg([
                col(c.gender.as_str())
                    .eq(lit(FEMALE))
                    .any(true)
                    .alias(has_female),
                col(state).first(),
            ])
            .filter(col(has_female).not());

        let ranked = frequency(crashes, state)?;
        Ok(ranked.first().map(|r| r.key.clone()))
    }

    /// Q6: makes ranked 3rd through 5th by total injuries including deaths.
    pub fn third_to_fifth_makes_by_injuries(&self) -> Result<Vec<String>, QueryError> {
        let c = self.tables.columns();

        // Local derivation; the shared unit table is left untouched
        let injuries = self.tables.units().select([
            col(c.make.as_str()),
            (col(c.total_injury_count.as_str()) + col(c.unit_death_count.as_str()))
                .alias(TOTAL_INJURIES),
        ]);

        let ranked = totals(injuries, &c.make, TOTAL_INJURIES)?;
        Ok(slice_keys(&ranked, 2, 5))
    }

    /// Q7: top ethnic group of each body style. Ties keep every tied ethnicity.
    pub fn top_ethnicity_per_body_style(&self) -> Result<Vec<StyleEthnicity>, QueryError> {
        let c = self.tables.columns();
        let style = c.body_style.as_str();
        let ethnicity = c.ethnicity.as_str();
        let [crash_id, unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);
        let [p_crash_id, p_unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);

        let units = self.tables.units().select([crash_id, unit_nbr, col(style)]);
        let persons = self
            .tables
            .persons()
            .select([p_crash_id, p_unit_nbr, col(ethnicity)]);

        let counts = self
            .join_units(units, persons, JoinType::Left)
            .filter(col(style).is_not_null().and(col(ethnicity).is_not_null()))
            .group_by([col(style), col(ethnicity)])
            .agg([len().cast(DataType::Int64).alias(GROUP_COUNT)])
            .collect()?;

        let styles = counts.column(style)?.str()?;
        let ethnicities = counts.column(ethnicity)?.str()?;
        let tallies = counts.column(GROUP_COUNT)?.i64()?;

        let mut groups: Vec<(&str, &str, i64)> = Vec::with_capacity(counts.height());
        let mut max_per_style: BTreeMap<&str, i64> = BTreeMap::new();
        for ((s, e), n) in styles.into_iter().zip(ethnicities).zip(tallies) {
            let (Some(s), Some(e), Some(n)) = (s, e, n) else {
                continue;
            };
            let max = max_per_style.entry(s).or_insert(n);
            *max = (*max).max(n);
            groups.push((s, e, n));
        }

        let mut rows: Vec<StyleEthnicity> = groups
            .into_iter()
            .filter(|(s, _, n)| max_per_style.get(s) == Some(n))
            .map(|(s, e, _)| StyleEthnicity {
                body_style: s.to_string(),
                top_ethnicity: e.to_string(),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.body_style
                .cmp(&b.body_style)
                .then_with(|| a.top_ethnicity.cmp(&b.top_ethnicity))
        });
        Ok(rows)
    }

    /// Q8: top driver zip codes among car crashes with alcohol as the contributing factor.
    pub fn top_zips_alcohol_car_crashes(&self) -> Result<Vec<String>, QueryError> {
        let c = self.tables.columns();
        let alcohol = self.config.categories(keys::ALCOHOL_CONTRIB_FACTR)?;
        let [crash_id, unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);

        let alcohol_cars = self
            .car_units()?
            .filter(is_one_of(&c.contributing_factor, alcohol))
            .select(unit_key(&c.crash_id, &c.unit_nbr));
        let zips = self
            .tables
            .persons()
            .select([crash_id, unit_nbr, col(c.driver_zip.as_str())]);

        let joined = self.join_units(alcohol_cars, zips, JoinType::Left);
        Ok(top_keys(&frequency(joined, &c.driver_zip)?, TOP_ZIPS))
    }

    /// Q9: distinct insured car crashes with damage level above 4 and no damaged property.
    pub fn insured_high_damage_crashes(&self) -> Result<usize, QueryError> {
        let c = self.tables.columns();
        let severe = self.config.categories(keys::DAMAGE_MORE_THAN_FOUR)?;
        let insurance = self.config.categories(keys::CAR_INSURANCE)?;
        let crash_id = c.crash_id.as_str();

        let damaged = self.car_units()?.filter(
            is_one_of(&c.damage_scale_1, severe).or(is_one_of(&c.damage_scale_2, severe)),
        );
        let with_property = self
            .tables
            .damages()
            .filter(col(c.damaged_property.as_str()).is_not_null())
            .select([col(crash_id)]);

        let insured = damaged
            .join(
                with_property,
                [col(crash_id)],
                [col(crash_id)],
                JoinArgs::new(JoinType::Anti),
            )
            .filter(is_one_of(&c.financial_responsibility, insurance));

        Ok(distinct_count(insured, crash_id)?)
    }

    /// Q10: top makes charged with speeding, limited to licensed drivers, cars,
    /// the ten most used colors and the 25 states with the most offenses.
    pub fn top_makes_speeding(&self) -> Result<Vec<String>, QueryError> {
        let c = self.tables.columns();
        let [crash_id, unit_nbr] = unit_key(&c.crash_id, &c.unit_nbr);

        let speeding = self
            .tables
            .charges()
            .filter(contains_text(&c.charge, SPEED))
            .select(unit_key(&c.crash_id, &c.unit_nbr));
        let licensed = self.join_units(self.valid_license_drivers()?, speeding, JoinType::Inner);
        let cars = self.join_units(self.car_units()?, licensed, JoinType::Inner);

        let colors = top_keys(&frequency(self.tables.units(), &c.color)?, TOP_COLORS);

        let offenses = self.join_units(
            self.tables
                .units()
                .select([crash_id, unit_nbr, col(c.vehicle_license_state.as_str())]),
            self.tables.charges().select(unit_key(&c.crash_id, &c.unit_nbr)),
            JoinType::Inner,
        );
        let states = top_keys(&frequency(offenses, &c.vehicle_license_state)?, TOP_OFFENSE_STATES);
        log::debug!("Q10: {} colors, {} offense states", colors.len(), states.len());

        let combined = cars.filter(
            is_one_of(&c.color, &colors).and(is_one_of(&c.vehicle_license_state, &states)),
        );
        Ok(top_keys(&frequency(combined, &c.make)?, TOP_MAKES))
    }
}
