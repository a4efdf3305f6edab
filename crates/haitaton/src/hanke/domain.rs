use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::contact::{ContactEntry, ContactInput, ContactRole};
use super::patch::Patch;

/// Database identifier of a stored Hanke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HankeId(pub i64);

/// Human-readable project code ("hanketunnus"), e.g. `HAI24-17`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HankeTunnus(pub String);

impl fmt::Display for HankeTunnus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User on whose behalf a mutating call runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(pub String);

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveType {
    Draft,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Programming,
    Design,
    Construction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningPhase {
    GeneralOrProjectPlanning,
    StreetPlanningOrAreaReservation,
    BuildingOrImplementationPlanning,
    DuringWorksite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkSiteType {
    Water,
    Sewer,
    Stormwater,
    DistrictHeating,
    Electricity,
    Telecommunications,
    TrafficLights,
    StreetLighting,
    StreetConstruction,
    TramTrack,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkSiteSize {
    NarrowOrPoint,
    Over10mOrBlock,
    WideOrSeveralBlocks,
}

/// Five-step estimate used for lane arrangement disruption and its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneDisruption {
    One,
    Two,
    Three,
    Four,
    Five,
}

/// Three-step estimate for noise, dust, and vibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NuisanceLevel {
    One,
    Two,
    Three,
}

/// Flags maintained by internal logic; never copied from incoming updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HankeStateFlags {
    pub has_geometries: bool,
    pub has_adjacent_projects: bool,
    pub has_customer_groups: bool,
}

/// Business fields of a Hanke as stored. Dates are kept at day precision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HankeFields {
    pub is_ykt_hanke: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub phase: Option<Phase>,
    pub planning_phase: Option<PlanningPhase>,
    pub save_type: Option<SaveType>,
    pub street_address: Option<String>,
    pub work_site_types: BTreeSet<WorkSiteType>,
    pub work_site_size: Option<WorkSiteSize>,
    pub disruption_start: Option<NaiveDate>,
    pub disruption_end: Option<NaiveDate>,
    pub lane_disruption: Option<LaneDisruption>,
    pub lane_length_disruption: Option<LaneDisruption>,
    pub noise_nuisance: Option<NuisanceLevel>,
    pub dust_nuisance: Option<NuisanceLevel>,
    pub vibration_nuisance: Option<NuisanceLevel>,
}

impl HankeFields {
    /// Copies provided fields from `input`. The YKT flag and the work-site
    /// types are replaced unconditionally.
    pub fn apply(&mut self, input: &HankeInput) {
        self.is_ykt_hanke = input.is_ykt_hanke;
        input.name.apply_to(&mut self.name);
        input.description.apply_to(&mut self.description);
        input.start_date.apply_with(&mut self.start_date, utc_day);
        input.end_date.apply_with(&mut self.end_date, utc_day);
        input.phase.apply_to(&mut self.phase);
        input.planning_phase.apply_to(&mut self.planning_phase);
        input.save_type.apply_to(&mut self.save_type);
        input.street_address.apply_to(&mut self.street_address);
        self.work_site_types = input.work_site_types.clone();
        input.work_site_size.apply_to(&mut self.work_site_size);
        input
            .disruption_start
            .apply_with(&mut self.disruption_start, utc_day);
        input.disruption_end.apply_with(&mut self.disruption_end, utc_day);
        input.lane_disruption.apply_to(&mut self.lane_disruption);
        input
            .lane_length_disruption
            .apply_to(&mut self.lane_length_disruption);
        input.noise_nuisance.apply_to(&mut self.noise_nuisance);
        input.dust_nuisance.apply_to(&mut self.dust_nuisance);
        input.vibration_nuisance.apply_to(&mut self.vibration_nuisance);
    }

    /// True when the Hanke starts before `end` and ends after `begin`.
    pub fn overlaps(&self, begin: NaiveDate, end: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(finish)) => start < end && finish > begin,
            _ => false,
        }
    }
}

fn utc_day(value: &DateTime<Utc>) -> NaiveDate {
    value.date_naive()
}

/// Incoming create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HankeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnus: Option<HankeTunnus>,
    pub is_ykt_hanke: bool,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub start_date: Patch<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub end_date: Patch<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub phase: Patch<Phase>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub planning_phase: Patch<PlanningPhase>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub save_type: Patch<SaveType>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub street_address: Patch<String>,
    pub work_site_types: BTreeSet<WorkSiteType>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub work_site_size: Patch<WorkSiteSize>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub disruption_start: Patch<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub disruption_end: Patch<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub lane_disruption: Patch<LaneDisruption>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub lane_length_disruption: Patch<LaneDisruption>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub noise_nuisance: Patch<NuisanceLevel>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub dust_nuisance: Patch<NuisanceLevel>,
    #[serde(skip_serializing_if = "Patch::is_omitted")]
    pub vibration_nuisance: Patch<NuisanceLevel>,
    pub state_flags: HankeStateFlags,
    pub owners: Vec<ContactInput>,
    pub implementers: Vec<ContactInput>,
    pub assessors: Vec<ContactInput>,
}

impl HankeInput {
    pub fn contacts(&self, role: ContactRole) -> &[ContactInput] {
        match role {
            ContactRole::Owner => &self.owners,
            ContactRole::Implementer => &self.implementers,
            ContactRole::Assessor => &self.assessors,
        }
    }

    /// Short description for debug logs; contact details are left out.
    pub fn log_summary(&self) -> String {
        format!(
            "name={:?} save_type={:?} contacts={}/{}/{}",
            self.name.as_set(),
            self.save_type.as_set(),
            self.owners.len(),
            self.implementers.len(),
            self.assessors.len()
        )
    }
}

/// Resolved Hanke handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hanke {
    pub id: HankeId,
    pub tunnus: HankeTunnus,
    #[serde(flatten)]
    pub fields: HankeFields,
    pub state_flags: HankeStateFlags,
    pub version: u32,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<Actor>,
    pub modified_at: Option<DateTime<Utc>>,
    pub owners: Vec<ContactEntry>,
    pub implementers: Vec<ContactEntry>,
    pub assessors: Vec<ContactEntry>,
}

impl Hanke {
    pub fn contacts(&self, role: ContactRole) -> &[ContactEntry] {
        match role {
            ContactRole::Owner => &self.owners,
            ContactRole::Implementer => &self.implementers,
            ContactRole::Assessor => &self.assessors,
        }
    }
}

/// Listing filter. Save type wins over the period; a period needs both bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HankeSearch {
    pub period_begin: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub save_type: Option<SaveType>,
}

impl HankeSearch {
    pub fn is_empty(&self) -> bool {
        self.period_begin.is_none() && self.period_end.is_none() && self.save_type.is_none()
    }
}
