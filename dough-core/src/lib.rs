//! Dough ratio and fermentation schedule calculations.
//!
//! - [`compute`] turns ball count, ball weight and baker's percentages
//!   into ingredient masses, including the poolish split.
//! - [`schedule`] turns a start time into the milestones of the 24-hour
//!   or poolish fermentation, flagging the ones that land on a later day.
//!
//! Both are pure functions of their arguments.

pub mod error;
pub mod recipe;
pub mod schedule;
pub mod yeast;

pub use error::{InputError, OutOfDomainKey, ScheduleError, TimeParseError};
pub use recipe::{
    compute, Ingredients, ModeKind, PoolishSplit, Preferment, RecipeInputs, RecipeMode,
    RecipeOutputs, STANDARD_SALT_PCT, STANDARD_YEAST_PCT,
};
pub use schedule::{
    parse_start_time, schedule, schedule_today, FermentationPlan, Milestone, ScheduleParams, Stage,
    StandardStages,
};
pub use yeast::FermentationHours;
