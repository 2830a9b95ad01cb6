//! HTML rendering of the prediction page.

use insurecost_common::{FormData, PredictionOutcome, Region, Sex, Smoker};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::currency::format_inr;

const PAGE_TEMPLATE: &str = "index.html";

/// Template environment with the page template registered.
/// `.html` templates are auto-escaped.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(PAGE_TEMPLATE, include_str!("../templates/index.html"))?;
    Ok(env)
}

#[derive(Serialize)]
struct SelectOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

fn options<T: Copy>(
    all: &[T],
    current: &str,
    value: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> Vec<SelectOption> {
    all.iter()
        .map(|o| SelectOption {
            value: value(o),
            label: label(o),
            selected: value(o) == current,
        })
        .collect()
}

pub fn render_page(
    env: &Environment<'_>,
    form: &FormData,
    outcome: &PredictionOutcome,
) -> Result<String, minijinja::Error> {
    let state = match outcome {
        PredictionOutcome::Idle => "idle",
        PredictionOutcome::Pending => "pending",
        PredictionOutcome::Success { .. } => "success",
        PredictionOutcome::Failure { .. } => "failure",
    };

    env.get_template(PAGE_TEMPLATE)?.render(context! {
        form => form,
        state => state,
        pending => outcome.is_pending(),
        prediction => outcome.prediction().map(format_inr),
        error => outcome.error_message(),
        smoker_options => options(&Smoker::ALL, &form.smoker, Smoker::as_str, Smoker::label),
        sex_options => options(&Sex::ALL, &form.sex, Sex::as_str, Sex::label),
        region_options => options(&Region::ALL, &form.region, Region::as_str, Region::label),
    })
}
