//! Step folder naming. Pure parse/format logic, no I/O.
//!
//! Recognized forms inside a media category directory:
//!
//! ```text
//! overview            reference media, excluded from step semantics
//! step_<N>            legacy, machine-type-agnostic
//! step_<N>_<machine>  qualified with a canonical machine-type key
//! ```
//!
//! `format` composed with `parse` is the identity on qualified names; the
//! canonical form carries no zero padding.

use crate::error::{Result, ZumenError};
use crate::model::{MachineType, StepFolderKind};

pub const STEP_PREFIX: &str = "step_";
pub const OVERVIEW_DIR: &str = "overview";

/// Classify a directory name.
///
/// Fails with `MalformedName` when the name is neither the overview
/// literal nor the step prefix followed by a numeric token, and with
/// `UnknownMachineType` when a tag is present but outside the closed set.
pub fn parse(name: &str) -> Result<StepFolderKind> {
    if name == OVERVIEW_DIR {
        return Ok(StepFolderKind::Overview);
    }

    let rest = name
        .strip_prefix(STEP_PREFIX)
        .ok_or_else(|| ZumenError::MalformedName(name.to_string()))?;

    let (digits, tag) = match rest.split_once('_') {
        Some((digits, tag)) => (digits, Some(tag)),
        None => (rest, None),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ZumenError::MalformedName(name.to_string()));
    }
    let step: u32 = digits
        .parse()
        .map_err(|_| ZumenError::MalformedName(name.to_string()))?;

    match tag {
        None => Ok(StepFolderKind::Legacy { step }),
        Some(tag) => match MachineType::from_key(tag) {
            Some(machine) => Ok(StepFolderKind::Qualified { step, machine }),
            None => Err(ZumenError::UnknownMachineType(tag.to_string())),
        },
    }
}

/// Canonical qualified folder name for a step and machine type.
pub fn format(step: u32, machine: MachineType) -> String {
    format!("{}{}_{}", STEP_PREFIX, step, machine.key())
}

/// Legacy (untagged) folder name for a step.
pub fn legacy_name(step: u32) -> String {
    format!("{}{}", STEP_PREFIX, step)
}
