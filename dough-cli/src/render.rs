use anyhow::Result;
use chrono::{Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use dough_core::{
    compute, schedule, FermentationPlan, Ingredients, PoolishSplit, RecipeInputs, RecipeMode,
    RecipeOutputs, ScheduleError, ScheduleParams,
};
use serde::Serialize;
use std::fmt::Write;

/// One full recomputation: ingredients plus, for modes that have one,
/// the fermentation plan or the reason it couldn't be built.
#[derive(Debug, Serialize)]
pub struct Report {
    pub inputs: RecipeInputs,
    pub outputs: RecipeOutputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<FermentationPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_error: Option<String>,
}

impl Report {
    pub fn build(inputs: &RecipeInputs, start: &str) -> Self {
        Self::build_on(inputs, start, Local::now().date_naive())
    }

    pub fn build_on(inputs: &RecipeInputs, start: &str, anchor: NaiveDate) -> Self {
        let outputs = compute(inputs);
        let planned: Option<Result<FermentationPlan, ScheduleError>> =
            ScheduleParams::for_inputs(inputs).map(|params| schedule(&params, start, anchor));

        let (plan, schedule_error) = match planned {
            Some(Ok(plan)) => (Some(plan), None),
            Some(Err(e)) => (None, Some(e.to_string())),
            None => (None, None),
        };

        Report {
            inputs: *inputs,
            outputs,
            start: inputs.mode.kind().has_schedule().then(|| start.to_string()),
            plan,
            schedule_error,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n=== Ingredients summary ===");
        let _ = writeln!(out, "{}", ingredients_table(&self.inputs, &self.outputs));

        if let Some(split) = &self.outputs.poolish {
            let _ = writeln!(out, "\n=== Poolish split ===");
            let _ = writeln!(out, "{}", poolish_table(split));
        }

        if self.inputs.mode.kind().has_schedule() {
            let _ = writeln!(out, "\n=== Timeline ===");
            match (&self.plan, &self.schedule_error) {
                (Some(plan), _) => {
                    let _ = writeln!(out, "{}", plan_table(plan));
                    let _ = writeln!(out, "Total: {} h", plan.total_h());
                }
                (None, Some(msg)) => {
                    let _ = writeln!(out, "{msg}");
                }
                (None, None) => {}
            }
        }
        out
    }
}

/// Grams rounded to `decimals`, trailing zeros dropped when the value is whole.
pub fn fmt_g(x: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let v = (x * scale).round() / scale;
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0} g", v)
    } else {
        format!("{:.*} g", decimals, v)
    }
}

fn header(cols: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            cols.iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn yeast_note(inputs: &RecipeInputs, yeast_pct: f64) -> String {
    match inputs.mode {
        RecipeMode::Poolish { fermentation, .. } => {
            format!("{:.3} % ({} poolish)", yeast_pct, fermentation)
        }
        RecipeMode::Standard | RecipeMode::Custom { .. } => format!("{:.2} %", yeast_pct),
    }
}

pub fn ingredients_table(inputs: &RecipeInputs, out: &RecipeOutputs) -> Table {
    let Ingredients {
        flour_g,
        water_g,
        salt_g,
        yeast_g,
    } = out.totals;

    let mut table = header(&["Ingredient", "Amount", "Notes"]);
    table.add_row(vec![
        Cell::new("Balls"),
        Cell::new(format!("{} × {:.0} g", inputs.balls, inputs.ball_weight_g)),
        Cell::new(format!("{} dough", fmt_g(out.total_dough_g, 1))),
    ]);
    table.add_row(vec![
        Cell::new("Flour"),
        Cell::new(fmt_g(flour_g, 1)),
        Cell::new("100 %"),
    ]);
    table.add_row(vec![
        Cell::new("Water"),
        Cell::new(fmt_g(water_g, 1)),
        Cell::new(format!("{:.1} %", inputs.hydration_pct)),
    ]);
    table.add_row(vec![
        Cell::new("Salt"),
        Cell::new(fmt_g(salt_g, 1)),
        Cell::new(format!("{:.1} %", inputs.salt_pct())),
    ]);
    table.add_row(vec![
        Cell::new("Yeast"),
        Cell::new(fmt_g(yeast_g, 3)),
        Cell::new(yeast_note(inputs, out.yeast_pct)),
    ]);
    table
}

pub fn poolish_table(split: &PoolishSplit) -> Table {
    let pre = split.preferment;
    let rest = split.final_mix;

    let mut table = header(&["Ingredient", "Poolish", "Final mix"]);
    table.add_row(vec![
        Cell::new("Flour"),
        Cell::new(fmt_g(pre.flour_g, 1)),
        Cell::new(fmt_g(rest.flour_g, 1)),
    ]);
    table.add_row(vec![
        Cell::new("Water"),
        Cell::new(fmt_g(pre.water_g, 1)),
        Cell::new(fmt_g(rest.water_g, 1)),
    ]);
    table.add_row(vec![
        Cell::new("Salt"),
        Cell::new("-"),
        Cell::new(fmt_g(rest.salt_g, 1)),
    ]);
    table.add_row(vec![
        Cell::new("Yeast"),
        Cell::new(fmt_g(pre.yeast_g, 3)),
        Cell::new(fmt_g(rest.yeast_g, 3)),
    ]);
    table
}

fn day_marker(day_offset: i64) -> &'static str {
    match day_offset {
        0 => "",
        1 => " (next day!)",
        _ => " (later day!)",
    }
}

pub fn plan_table(plan: &FermentationPlan) -> Table {
    let mut table = header(&["Step", "At", "Elapsed"]);
    for m in &plan.milestones {
        table.add_row(vec![
            Cell::new(m.stage.label()),
            Cell::new(format!("{}{}", m.at.format("%H:%M"), day_marker(m.day_offset))),
            Cell::new(format!("+{} h", m.offset_h)),
        ]);
    }
    table
}
