use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::error::{ScheduleError, TimeParseError};
use crate::recipe::{RecipeInputs, RecipeMode};
use crate::yeast::FermentationHours;

/// Stage lengths of the 24-hour dough, in hours.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardStages {
    /// Bulk rise at room temperature right after kneading.
    pub bulk_rt_h: u32,
    /// Bulk rise in the fridge.
    pub bulk_ct_h: u32,
    /// Back to room temperature before balling.
    pub equilibrate_h: u32,
    /// Balls proofing at room temperature.
    pub proof_h: u32,
}

impl Default for StandardStages {
    fn default() -> Self {
        StandardStages {
            bulk_rt_h: 2,
            bulk_ct_h: 12,
            equilibrate_h: 2,
            proof_h: 8,
        }
    }
}

/// Schedule kind with its stage lengths.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScheduleParams {
    Standard(StandardStages),
    Poolish {
        fermentation: FermentationHours,
        bulk_rt_h: u32,
        proof_h: u32,
    },
}

impl ScheduleParams {
    pub fn poolish(fermentation: FermentationHours) -> Self {
        ScheduleParams::Poolish {
            fermentation,
            bulk_rt_h: 2,
            proof_h: 2,
        }
    }

    /// Default schedule for a recipe, `None` for Custom.
    pub fn for_inputs(inputs: &RecipeInputs) -> Option<Self> {
        match inputs.mode {
            RecipeMode::Standard => Some(ScheduleParams::Standard(StandardStages::default())),
            RecipeMode::Poolish { fermentation, .. } => Some(ScheduleParams::poolish(fermentation)),
            RecipeMode::Custom { .. } => None,
        }
    }

    /// Stages in order, each with its length in hours.
    fn stages(&self) -> Vec<(Stage, u32)> {
        match *self {
            ScheduleParams::Standard(s) => vec![
                (Stage::Kneaded, 0),
                (Stage::BulkRoomTempEnd, s.bulk_rt_h),
                (Stage::BulkColdEnd, s.bulk_ct_h),
                (Stage::EquilibrationEnd, s.equilibrate_h),
                (Stage::ReadyToBake, s.proof_h),
            ],
            ScheduleParams::Poolish {
                fermentation,
                bulk_rt_h,
                proof_h,
            } => vec![
                (Stage::PoolishStart, 0),
                (Stage::PoolishReady, u32::from(fermentation.hours())),
                (Stage::BulkRoomTempEnd, bulk_rt_h),
                (Stage::ReadyToBake, proof_h),
            ],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Kneaded,
    PoolishStart,
    PoolishReady,
    BulkRoomTempEnd,
    BulkColdEnd,
    EquilibrationEnd,
    ReadyToBake,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Kneaded => "Start (kneaded)",
            Stage::PoolishStart => "Poolish mixed",
            Stage::PoolishReady => "Poolish ready, mix final dough",
            Stage::BulkRoomTempEnd => "End of bulk rise (room temp)",
            Stage::BulkColdEnd => "End of bulk rise (fridge)",
            Stage::EquilibrationEnd => "Back at room temp, ball the dough",
            Stage::ReadyToBake => "Ready to bake",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub stage: Stage,
    pub at: NaiveDateTime,
    /// Hours since the start.
    pub offset_h: u32,
    /// Calendar days after the start date.
    pub day_offset: i64,
    /// Falls on a later calendar date than the start.
    pub next_day: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FermentationPlan {
    pub start: NaiveDateTime,
    pub milestones: Vec<Milestone>,
}

impl FermentationPlan {
    pub fn total_h(&self) -> u32 {
        self.milestones.last().map_or(0, |m| m.offset_h)
    }
}

/// Parse a 24-hour `HH:MM` clock reading. Surrounding whitespace is
/// ignored, anything else that doesn't fit is rejected.
pub fn parse_start_time(text: &str) -> Result<NaiveTime, TimeParseError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|e| {
        trace!(input = text, error = %e, "start time rejected");
        TimeParseError::InvalidTimeFormat {
            input: text.to_string(),
        }
    })
}

/// Build the milestone sequence for `params`, starting at `start_text`
/// on `anchor`. Either every milestone is produced or none.
pub fn schedule(
    params: &ScheduleParams,
    start_text: &str,
    anchor: NaiveDate,
) -> Result<FermentationPlan, ScheduleError> {
    let start = anchor.and_time(parse_start_time(start_text)?);
    let start_date = start.date();

    let mut at = start;
    let mut offset_h: u32 = 0;
    let mut milestones = Vec::new();
    for (stage, hours) in params.stages() {
        let out_of_range = || ScheduleError::OutOfRange { stage };
        offset_h = offset_h.checked_add(hours).ok_or_else(out_of_range)?;
        at = at
            .checked_add_signed(TimeDelta::hours(i64::from(hours)))
            .ok_or_else(out_of_range)?;
        let day_offset = (at.date() - start_date).num_days();
        milestones.push(Milestone {
            stage,
            at,
            offset_h,
            day_offset,
            next_day: at.date() != start_date,
        });
    }

    debug!(%start, milestones = milestones.len(), "fermentation plan built");
    Ok(FermentationPlan { start, milestones })
}

/// [`schedule`] anchored on today's local date.
pub fn schedule_today(
    params: &ScheduleParams,
    start_text: &str,
) -> Result<FermentationPlan, ScheduleError> {
    schedule(params, start_text, Local::now().date_naive())
}
