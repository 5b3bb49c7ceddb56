use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use dough_core::{parse_start_time, FermentationHours, ModeKind, RecipeInputs, RecipeMode};
use tracing::debug;

use crate::render::Report;

/// Settable recipe inputs, as named on the `set` command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Balls,
    BallWeight,
    Hydration,
    Salt,
    Yeast,
    Poolish,
    FermentationHours,
}

/// Last-used inputs of one interactive session, kept per mode so that
/// switching back and forth doesn't lose edits. Every stored recipe
/// passes [`RecipeInputs::validate`].
#[derive(Clone, Debug)]
pub struct Session {
    mode: ModeKind,
    standard: RecipeInputs,
    custom: RecipeInputs,
    poolish: RecipeInputs,
    start: String,
}

impl Session {
    pub fn new(initial: RecipeInputs, start: String) -> Self {
        let mut session = Session {
            mode: initial.mode.kind(),
            standard: RecipeInputs::defaults(ModeKind::Standard),
            custom: RecipeInputs::defaults(ModeKind::Custom),
            poolish: RecipeInputs::defaults(ModeKind::Poolish),
            start,
        };
        *session.slot_mut(session.mode) = initial;
        session
    }

    pub fn mode(&self) -> ModeKind {
        self.mode
    }

    pub fn current(&self) -> &RecipeInputs {
        match self.mode {
            ModeKind::Standard => &self.standard,
            ModeKind::Custom => &self.custom,
            ModeKind::Poolish => &self.poolish,
        }
    }

    fn slot_mut(&mut self, kind: ModeKind) -> &mut RecipeInputs {
        match kind {
            ModeKind::Standard => &mut self.standard,
            ModeKind::Custom => &mut self.custom,
            ModeKind::Poolish => &mut self.poolish,
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn select(&mut self, kind: ModeKind) {
        debug!(from = ?self.mode, to = ?kind, "mode selected");
        self.mode = kind;
    }

    /// Update one input of the current mode. The change is dropped if the
    /// value doesn't parse, doesn't apply to the mode or is out of range.
    pub fn set(&mut self, field: Field, value: &str) -> Result<()> {
        let mut next = *self.current();
        let num = || -> Result<f64> {
            value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("not a number: {value:?}"))
        };

        match (field, &mut next.mode) {
            (Field::Balls, _) => {
                next.balls = value
                    .trim()
                    .parse()
                    .with_context(|| format!("not a whole number: {value:?}"))?
            }
            (Field::BallWeight, _) => next.ball_weight_g = num()?,
            (Field::Hydration, _) => next.hydration_pct = num()?,
            (Field::Salt, RecipeMode::Custom { salt_pct, .. })
            | (Field::Salt, RecipeMode::Poolish { salt_pct, .. }) => *salt_pct = num()?,
            (Field::Yeast, RecipeMode::Custom { yeast_pct, .. }) => *yeast_pct = num()?,
            (Field::Poolish, RecipeMode::Poolish { poolish_pct, .. }) => *poolish_pct = num()?,
            (Field::FermentationHours, RecipeMode::Poolish { fermentation, .. }) => {
                let hours: u8 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("not a whole number: {value:?}"))?;
                *fermentation = FermentationHours::try_from(hours)?;
            }
            (field, _) => bail!(
                "{} can't be changed in {:?} mode",
                field
                    .to_possible_value()
                    .map(|v| v.get_name().to_string())
                    .unwrap_or_default(),
                self.mode
            ),
        }

        next.validate()?;
        debug!(?field, value, "input updated");
        *self.slot_mut(self.mode) = next;
        Ok(())
    }

    /// Store a new start time. Unparseable text is kept as typed; the
    /// timeline then shows the parse error instead of milestones.
    pub fn set_start(&mut self, text: &str) {
        if parse_start_time(text).is_err() {
            debug!(text, "start time will not parse");
        }
        self.start = text.to_string();
    }

    /// Current mode back to its defaults.
    pub fn reset(&mut self) {
        let kind = self.mode;
        *self.slot_mut(kind) = RecipeInputs::defaults(kind);
        debug!(mode = ?kind, "inputs reset");
    }

    pub fn report(&self) -> Report {
        Report::build(self.current(), &self.start)
    }
}
