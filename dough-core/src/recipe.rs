use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InputError;
use crate::yeast::FermentationHours;

/// Salt in the 24-hour preset, % of flour.
pub const STANDARD_SALT_PCT: f64 = 3.0;
/// Yeast in the 24-hour preset, % of flour.
pub const STANDARD_YEAST_PCT: f64 = 0.2;

/// Which recipe the host has selected, without its parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Standard,
    Custom,
    Poolish,
}

impl ModeKind {
    /// Custom recipes get ingredients only.
    pub fn has_schedule(self) -> bool {
        !matches!(self, ModeKind::Custom)
    }
}

/// Mode-specific recipe parameters. Percentages are baker's percentages.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RecipeMode {
    /// The 24-hour dough: salt and yeast fixed at the preset values.
    Standard,
    Custom {
        salt_pct: f64,
        yeast_pct: f64,
    },
    /// Direct dough with part of the flour pre-fermented as a 100 %
    /// hydration poolish. Yeast comes from the fermentation table.
    Poolish {
        salt_pct: f64,
        /// Share of the flour that goes into the poolish.
        poolish_pct: f64,
        fermentation: FermentationHours,
    },
}

impl RecipeMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            RecipeMode::Standard => ModeKind::Standard,
            RecipeMode::Custom { .. } => ModeKind::Custom,
            RecipeMode::Poolish { .. } => ModeKind::Poolish,
        }
    }
}

/// Input for ingredient computation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeInputs {
    /// Number of dough balls.
    pub balls: u32,
    /// Weight of one ball in grams.
    pub ball_weight_g: f64,
    /// Water as % of flour.
    pub hydration_pct: f64,
    #[serde(flatten)]
    pub mode: RecipeMode,
}

/// Accepted input ranges, inclusive.
pub mod limits {
    pub const BALLS: (u32, u32) = (1, 20);
    pub const BALL_WEIGHT_G: (f64, f64) = (100.0, 500.0);
    pub const HYDRATION_PCT: (f64, f64) = (50.0, 100.0);
    pub const SALT_PCT: (f64, f64) = (1.0, 3.0);
    pub const YEAST_PCT: (f64, f64) = (0.1, 2.0);
    pub const POOLISH_PCT: (f64, f64) = (20.0, 40.0);
}

fn check(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), InputError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl RecipeInputs {
    /// Starting values for a freshly selected mode.
    pub fn defaults(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Standard => RecipeInputs {
                balls: 4,
                ball_weight_g: 390.0,
                hydration_pct: 64.0,
                mode: RecipeMode::Standard,
            },
            ModeKind::Custom => RecipeInputs {
                balls: 4,
                ball_weight_g: 250.0,
                hydration_pct: 65.0,
                mode: RecipeMode::Custom {
                    salt_pct: 2.0,
                    yeast_pct: 0.3,
                },
            },
            ModeKind::Poolish => RecipeInputs {
                balls: 4,
                ball_weight_g: 250.0,
                hydration_pct: 65.0,
                mode: RecipeMode::Poolish {
                    salt_pct: 2.5,
                    poolish_pct: 30.0,
                    fermentation: FermentationHours::default(),
                },
            },
        }
    }

    /// Range check the host runs before [`compute`]. The first offending
    /// field is reported.
    pub fn validate(&self) -> Result<(), InputError> {
        let (lo, hi) = limits::BALLS;
        check("balls", f64::from(self.balls), (f64::from(lo), f64::from(hi)))?;
        check("ball weight (g)", self.ball_weight_g, limits::BALL_WEIGHT_G)?;
        check("hydration (%)", self.hydration_pct, limits::HYDRATION_PCT)?;
        match self.mode {
            RecipeMode::Standard => Ok(()),
            RecipeMode::Custom {
                salt_pct,
                yeast_pct,
            } => {
                check("salt (%)", salt_pct, limits::SALT_PCT)?;
                check("yeast (%)", yeast_pct, limits::YEAST_PCT)
            }
            RecipeMode::Poolish {
                salt_pct,
                poolish_pct,
                ..
            } => {
                check("salt (%)", salt_pct, limits::SALT_PCT)?;
                check("poolish (%)", poolish_pct, limits::POOLISH_PCT)
            }
        }
    }

    pub fn salt_pct(&self) -> f64 {
        match self.mode {
            RecipeMode::Standard => STANDARD_SALT_PCT,
            RecipeMode::Custom { salt_pct, .. } | RecipeMode::Poolish { salt_pct, .. } => {
                salt_pct
            }
        }
    }

    /// Yeast % actually used: the input for Standard/Custom, the table
    /// value for Poolish.
    pub fn yeast_pct(&self) -> f64 {
        match self.mode {
            RecipeMode::Standard => STANDARD_YEAST_PCT,
            RecipeMode::Custom { yeast_pct, .. } => yeast_pct,
            RecipeMode::Poolish { fermentation, .. } => fermentation.yeast_percent(),
        }
    }

    pub fn total_dough_g(&self) -> f64 {
        f64::from(self.balls) * self.ball_weight_g
    }
}

/// Ingredient masses in grams.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredients {
    pub flour_g: f64,
    pub water_g: f64,
    pub salt_g: f64,
    pub yeast_g: f64,
}

/// Flour, water and yeast that go into the poolish. Never salted.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preferment {
    pub flour_g: f64,
    pub water_g: f64,
    pub yeast_g: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolishSplit {
    pub preferment: Preferment,
    /// What is added to the ripe poolish, including all of the salt.
    pub final_mix: Ingredients,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeOutputs {
    pub total_dough_g: f64,
    /// Effective yeast % of flour.
    pub yeast_pct: f64,
    pub totals: Ingredients,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poolish: Option<PoolishSplit>,
}

/// Compute ingredients for given input.
/// - dough = flour × (1 + hydration + salt + yeast), all as fractions
/// - Poolish: part of the flour plus the same weight of water is split
///   off into the preferment
pub fn compute(inputs: &RecipeInputs) -> RecipeOutputs {
    let total_dough = inputs.total_dough_g();
    let hydration = inputs.hydration_pct / 100.0;
    let salt_pct = inputs.salt_pct();
    let yeast_pct = inputs.yeast_pct();

    let flour = total_dough / (1.0 + hydration + salt_pct / 100.0 + yeast_pct / 100.0);
    let totals = Ingredients {
        flour_g: flour,
        water_g: flour * hydration,
        salt_g: flour * salt_pct / 100.0,
        yeast_g: flour * yeast_pct / 100.0,
    };

    let poolish = match inputs.mode {
        RecipeMode::Poolish { poolish_pct, .. } => Some(split_poolish(&totals, poolish_pct, yeast_pct)),
        RecipeMode::Standard | RecipeMode::Custom { .. } => None,
    };

    debug!(
        mode = ?inputs.mode.kind(),
        total_dough,
        flour,
        yeast_pct,
        "computed dough"
    );

    RecipeOutputs {
        total_dough_g: total_dough,
        yeast_pct,
        totals,
        poolish,
    }
}

fn split_poolish(totals: &Ingredients, poolish_pct: f64, yeast_pct: f64) -> PoolishSplit {
    let flour = totals.flour_g * poolish_pct / 100.0;
    let preferment = Preferment {
        flour_g: flour,
        water_g: flour,
        yeast_g: flour * yeast_pct / 100.0,
    };
    PoolishSplit {
        preferment,
        final_mix: Ingredients {
            flour_g: totals.flour_g - preferment.flour_g,
            water_g: totals.water_g - preferment.water_g,
            salt_g: totals.salt_g,
            yeast_g: totals.yeast_g - preferment.yeast_g,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn custom(balls: u32, weight: f64, hydration: f64, salt: f64, yeast: f64) -> RecipeInputs {
        RecipeInputs {
            balls,
            ball_weight_g: weight,
            hydration_pct: hydration,
            mode: RecipeMode::Custom {
                salt_pct: salt,
                yeast_pct: yeast,
            },
        }
    }

    fn poolish(poolish_pct: f64, hours: u8) -> RecipeInputs {
        RecipeInputs {
            balls: 6,
            ball_weight_g: 270.0,
            hydration_pct: 68.0,
            mode: RecipeMode::Poolish {
                salt_pct: 2.5,
                poolish_pct,
                fermentation: FermentationHours::try_from(hours).unwrap(),
            },
        }
    }

    #[test]
    fn test_total_dough_is_count_times_weight() {
        for (balls, weight) in [(1, 100.0), (4, 390.0), (7, 255.0), (20, 500.0)] {
            let out = compute(&custom(balls, weight, 65.0, 2.0, 0.3));
            assert_eq!(out.total_dough_g, f64::from(balls) * weight);
        }
    }

    #[test]
    fn test_flour_round_trip() {
        let inputs = custom(5, 280.0, 72.0, 2.8, 1.1);
        let out = compute(&inputs);
        let back = out.totals.flour_g * (1.0 + 0.72 + 0.028 + 0.011);
        assert_relative_eq!(back, 1400.0, max_relative = 1e-12);

        let t = out.totals;
        assert_relative_eq!(
            t.flour_g + t.water_g + t.salt_g + t.yeast_g,
            1400.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_standard_matches_custom_with_preset_ratios() {
        let standard = RecipeInputs {
            balls: 3,
            ball_weight_g: 300.0,
            hydration_pct: 70.0,
            mode: RecipeMode::Standard,
        };
        let custom = custom(3, 300.0, 70.0, STANDARD_SALT_PCT, STANDARD_YEAST_PCT);
        assert_eq!(compute(&standard).totals, compute(&custom).totals);
        assert!(compute(&standard).poolish.is_none());
    }

    #[test]
    fn test_poolish_uses_table_yeast() {
        let out = compute(&poolish(30.0, 16));
        assert_eq!(out.yeast_pct, 0.099);
        let flour = 1620.0 / (1.0 + 0.68 + 0.025 + 0.00099);
        assert_relative_eq!(out.totals.flour_g, flour, max_relative = 1e-12);
    }

    #[test]
    fn test_poolish_split_invariants() {
        for pct in [20.0, 25.0, 33.3, 40.0] {
            let out = compute(&poolish(pct, 14));
            let split = out.poolish.expect("poolish mode has a split");
            let (pre, rest, tot) = (split.preferment, split.final_mix, out.totals);

            assert_eq!(pre.water_g, pre.flour_g);
            assert_relative_eq!(pre.flour_g, tot.flour_g * pct / 100.0, max_relative = 1e-12);
            assert_relative_eq!(rest.flour_g + pre.flour_g, tot.flour_g, max_relative = 1e-12);
            assert_relative_eq!(rest.water_g + pre.water_g, tot.water_g, max_relative = 1e-12);
            assert_relative_eq!(rest.yeast_g + pre.yeast_g, tot.yeast_g, max_relative = 1e-12);
            assert_eq!(rest.salt_g, tot.salt_g);
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let inputs = poolish(35.0, 19);
        assert_eq!(compute(&inputs), compute(&inputs));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        for kind in [ModeKind::Standard, ModeKind::Custom, ModeKind::Poolish] {
            let inputs = RecipeInputs::defaults(kind);
            assert_eq!(inputs.mode.kind(), kind);
            assert_eq!(inputs.validate(), Ok(()));
        }
    }

    #[test]
    fn test_validate_reports_first_bad_field() {
        let err = custom(0, 250.0, 65.0, 2.0, 0.3).validate().unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "balls", .. }));

        let err = custom(4, 250.0, 65.0, 2.0, 2.5).validate().unwrap_err();
        assert_eq!(
            err,
            InputError::OutOfRange {
                field: "yeast (%)",
                value: 2.5,
                min: 0.1,
                max: 2.0,
            }
        );

        let err = poolish(45.0, 12).validate().unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "poolish (%)", .. }));
    }

    #[test]
    fn test_schedule_availability() {
        assert!(ModeKind::Standard.has_schedule());
        assert!(ModeKind::Poolish.has_schedule());
        assert!(!ModeKind::Custom.has_schedule());
    }
}
