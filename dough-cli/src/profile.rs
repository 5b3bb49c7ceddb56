use anyhow::{Context, Result};
use dough_core::{FermentationHours, ModeKind, RecipeInputs, RecipeMode};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, warn};

/// Recipe settings from the command line or a profile file. Unset fields
/// fall through to the next source and finally to the mode defaults.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub mode: Option<ModeKind>,
    pub balls: Option<u32>,
    pub ball_weight: Option<f64>,
    pub hydration: Option<f64>,
    pub salt: Option<f64>,
    pub yeast: Option<f64>,
    pub poolish: Option<f64>,
    pub fermentation_hours: Option<u8>,
    pub start: Option<String>,
}

pub fn load(path: &Path) -> Result<Profile> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&txt)
        .with_context(|| format!("Invalid profile JSON: {}", path.display()))?;
    debug!(path = %path.display(), ?profile, "profile loaded");
    Ok(profile)
}

impl Profile {
    /// Field-wise merge; `self` wins.
    pub fn or(self, fallback: Profile) -> Profile {
        Profile {
            mode: self.mode.or(fallback.mode),
            balls: self.balls.or(fallback.balls),
            ball_weight: self.ball_weight.or(fallback.ball_weight),
            hydration: self.hydration.or(fallback.hydration),
            salt: self.salt.or(fallback.salt),
            yeast: self.yeast.or(fallback.yeast),
            poolish: self.poolish.or(fallback.poolish),
            fermentation_hours: self.fermentation_hours.or(fallback.fermentation_hours),
            start: self.start.or(fallback.start),
        }
    }

    /// Lay the set fields over the defaults of the selected mode.
    /// Fields the mode has no use for are ignored with a warning.
    pub fn recipe_inputs(&self) -> Result<RecipeInputs> {
        let kind = self.mode.unwrap_or(ModeKind::Standard);
        let mut inputs = RecipeInputs::defaults(kind);

        if let Some(balls) = self.balls {
            inputs.balls = balls;
        }
        if let Some(w) = self.ball_weight {
            inputs.ball_weight_g = w;
        }
        if let Some(h) = self.hydration {
            inputs.hydration_pct = h;
        }

        match &mut inputs.mode {
            RecipeMode::Standard => {
                self.ignore("salt", self.salt.is_some(), kind);
                self.ignore("yeast", self.yeast.is_some(), kind);
                self.ignore("poolish", self.poolish.is_some(), kind);
                self.ignore("fermentation-hours", self.fermentation_hours.is_some(), kind);
            }
            RecipeMode::Custom {
                salt_pct,
                yeast_pct,
            } => {
                *salt_pct = self.salt.unwrap_or(*salt_pct);
                *yeast_pct = self.yeast.unwrap_or(*yeast_pct);
                self.ignore("poolish", self.poolish.is_some(), kind);
                self.ignore("fermentation-hours", self.fermentation_hours.is_some(), kind);
            }
            RecipeMode::Poolish {
                salt_pct,
                poolish_pct,
                fermentation,
            } => {
                *salt_pct = self.salt.unwrap_or(*salt_pct);
                *poolish_pct = self.poolish.unwrap_or(*poolish_pct);
                if let Some(h) = self.fermentation_hours {
                    *fermentation = FermentationHours::try_from(h)?;
                }
                self.ignore("yeast", self.yeast.is_some(), kind);
            }
        }

        Ok(inputs)
    }

    fn ignore(&self, field: &str, set: bool, kind: ModeKind) {
        if set {
            warn!("{field} has no effect in {kind:?} mode, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_wins_over_profile() {
        let cli = Profile {
            balls: Some(6),
            ..Profile::default()
        };
        let file = Profile {
            mode: Some(ModeKind::Custom),
            balls: Some(2),
            salt: Some(2.8),
            ..Profile::default()
        };
        let merged = cli.or(file);
        assert_eq!(merged.mode, Some(ModeKind::Custom));
        assert_eq!(merged.balls, Some(6));
        assert_eq!(merged.salt, Some(2.8));
    }

    #[test]
    fn test_empty_profile_gives_standard_defaults() {
        let inputs = Profile::default().recipe_inputs().unwrap();
        assert_eq!(inputs, RecipeInputs::defaults(ModeKind::Standard));
    }

    #[test]
    fn test_poolish_fields_applied() {
        let p = Profile {
            mode: Some(ModeKind::Poolish),
            poolish: Some(25.0),
            fermentation_hours: Some(18),
            yeast: Some(1.0),
            ..Profile::default()
        };
        let inputs = p.recipe_inputs().unwrap();
        assert_eq!(
            inputs.mode,
            RecipeMode::Poolish {
                salt_pct: 2.5,
                poolish_pct: 25.0,
                fermentation: FermentationHours::try_from(18).unwrap(),
            }
        );
        // table yeast, not the ignored flag
        assert_eq!(inputs.yeast_pct(), 0.062);
    }

    #[test]
    fn test_out_of_table_hours_fail_loudly() {
        let p = Profile {
            mode: Some(ModeKind::Poolish),
            fermentation_hours: Some(24),
            ..Profile::default()
        };
        let err = p.recipe_inputs().unwrap_err();
        assert!(err.to_string().contains("24 h"));
    }

    #[test]
    fn test_load_profile_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{ "mode": "custom", "balls": 3, "yeast": 0.5, "start": "18:00" }}"#
        )
        .unwrap();

        let p = load(f.path()).unwrap();
        assert_eq!(p.mode, Some(ModeKind::Custom));
        assert_eq!(p.start.as_deref(), Some("18:00"));
        let inputs = p.recipe_inputs().unwrap();
        assert_eq!(inputs.balls, 3);
        assert_eq!(inputs.yeast_pct(), 0.5);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "w": 280 }}"#).unwrap();
        let err = load(f.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid profile JSON"));
    }
}
