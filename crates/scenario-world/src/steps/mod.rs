//! Step definitions.
//!
//! Each step turns its text and placeholders into one [`Action`] and hands
//! it to [`ScenarioContext::perform`]. Steps are collected by cucumber at
//! link time, so these modules only need to be compiled.
//!
//! [`Action`]: crate::action::Action
//! [`ScenarioContext::perform`]: crate::context::ScenarioContext::perform

mod account;
mod cart;
mod checkout;
mod comparison;
mod product;
mod search;

use cucumber::gherkin::Step;
use std::collections::HashMap;
use storefront_core::{Result, StorefrontError};

/// The rows of a step's data table, keyed by its header row.
pub(crate) fn table_hashes(step: &Step) -> Result<Vec<HashMap<String, String>>> {
    let table = step.table.as_ref().ok_or_else(|| {
        StorefrontError::misuse(format!("step '{}' needs a data table", step.value))
    })?;
    Ok(hashes(&table.rows))
}

fn hashes(rows: &[Vec<String>]) -> Vec<HashMap<String, String>> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    body.iter()
        .map(|row| {
            header
                .iter()
                .cloned()
                .zip(row.iter().map(|cell| cell.trim().to_string()))
                .collect()
        })
        .collect()
}

/// The first row of a table, for steps that only read one.
pub(crate) fn first_row(step: &Step) -> Result<HashMap<String, String>> {
    table_hashes(step)?.into_iter().next().ok_or_else(|| {
        StorefrontError::misuse(format!("table of step '{}' has no rows", step.value))
    })
}
