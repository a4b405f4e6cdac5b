//! Core data types: drawing identifiers, the closed machine-type and media
//! category sets, step folder classification, and the serde model of the
//! `instruction.json` metadata document.

use crate::error::{Result, ZumenError};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Directory name prefix for drawing record directories.
pub const DRAWING_DIR_PREFIX: &str = "drawing-";

/// Identifier of one drawing record (the drawing number string token).
///
/// Operators may supply either the bare number (`04297711725`) or the full
/// directory name (`drawing-04297711725`); both resolve to the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(String);

impl DrawingId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.strip_prefix(DRAWING_DIR_PREFIX) {
            Some(rest) => Self(rest.to_string()),
            None => Self(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name of this drawing under the store root.
    pub fn dir_name(&self) -> String {
        format!("{}{}", DRAWING_DIR_PREFIX, self.0)
    }

    /// Inverse of [`dir_name`](Self::dir_name); `None` for directories that
    /// are not drawing records.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        name.strip_prefix(DRAWING_DIR_PREFIX)
            .filter(|rest| !rest.is_empty())
            .map(|rest| Self(rest.to_string()))
    }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of manufacturing process categories used to qualify step
/// folders and metadata buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MachineType {
    Machining,
    Turning,
    Yokonaka,
    Radial,
    Other,
}

/// Operator-facing spellings of each machine type, collected from the
/// historical record data. Canonical keys are included so they always
/// resolve to themselves.
static MACHINE_TYPE_ALIASES: Lazy<HashMap<&'static str, MachineType>> = Lazy::new(|| {
    use MachineType::*;
    HashMap::from([
        ("マシニング", Machining),
        ("マシニングセンタ", Machining),
        ("マシニングセンター", Machining),
        ("machining", Machining),
        ("mc", Machining),
        ("ターニング", Turning),
        ("ターニングセンタ", Turning),
        ("cnc旋盤", Turning),
        ("旋盤", Turning),
        ("turning", Turning),
        ("lathe", Turning),
        ("横中", Yokonaka),
        ("横中ぐり", Yokonaka),
        ("横中ぐり盤", Yokonaka),
        ("horizontal", Yokonaka),
        ("yokonaka", Yokonaka),
        ("ラジアル", Radial),
        ("ラジアルボール盤", Radial),
        ("ボール盤", Radial),
        ("drill", Radial),
        ("radial", Radial),
        ("フライス", Other),
        ("フライス盤", Other),
        ("その他", Other),
        ("other", Other),
    ])
});

impl MachineType {
    pub const ALL: [MachineType; 5] = [
        MachineType::Machining,
        MachineType::Turning,
        MachineType::Yokonaka,
        MachineType::Radial,
        MachineType::Other,
    ];

    /// Canonical key, used in folder names and metadata buckets.
    pub fn key(self) -> &'static str {
        match self {
            MachineType::Machining => "machining",
            MachineType::Turning => "turning",
            MachineType::Yokonaka => "yokonaka",
            MachineType::Radial => "radial",
            MachineType::Other => "other",
        }
    }

    /// Resolve a canonical key only. Folder name tags must be exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Resolve an operator-supplied or historical spelling. Tries the value
    /// as given, lowercased, and with whitespace removed.
    pub fn from_alias(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();
        let squeezed: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let squeezed_lower: String = lower.chars().filter(|c| !c.is_whitespace()).collect();

        MACHINE_TYPE_ALIASES
            .get(trimmed)
            .or_else(|| MACHINE_TYPE_ALIASES.get(lower.as_str()))
            .or_else(|| MACHINE_TYPE_ALIASES.get(squeezed.as_str()))
            .or_else(|| MACHINE_TYPE_ALIASES.get(squeezed_lower.as_str()))
            .copied()
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MachineType {
    type Err = ZumenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_alias(s).ok_or_else(|| ZumenError::UnknownMachineType(s.to_string()))
    }
}

/// The four fixed media category directories under a drawing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Images,
    Videos,
    Pdfs,
    Programs,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 4] = [
        MediaCategory::Images,
        MediaCategory::Videos,
        MediaCategory::Pdfs,
        MediaCategory::Programs,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            MediaCategory::Images => "images",
            MediaCategory::Videos => "videos",
            MediaCategory::Pdfs => "pdfs",
            MediaCategory::Programs => "programs",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Classification of one step folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFolderKind {
    /// The per-category reference media folder, excluded from step semantics.
    Overview,
    /// Numeric only, no machine-type tag; pending classification.
    Legacy { step: u32 },
    /// Step number plus machine-type tag.
    Qualified { step: u32, machine: MachineType },
}

impl StepFolderKind {
    pub fn step(&self) -> Option<u32> {
        match self {
            StepFolderKind::Overview => None,
            StepFolderKind::Legacy { step } => Some(*step),
            StepFolderKind::Qualified { step, .. } => Some(*step),
        }
    }

    pub fn is_overview(&self) -> bool {
        matches!(self, StepFolderKind::Overview)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, StepFolderKind::Legacy { .. })
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, StepFolderKind::Qualified { .. })
    }
}

/// One recognized directory inside a media category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFolder {
    pub name: String,
    pub kind: StepFolderKind,
}

/// The `metadata.machineType` value as found in historical documents:
/// a list, a single comma-separated string, or an explicit null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MachineTypeField {
    List(Vec<String>),
    Single(String),
    Null,
}

impl Default for MachineTypeField {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl MachineTypeField {
    /// The raw values as a list. A single string or null counts as zero
    /// list entries here, matching how the normalization pass detects
    /// change.
    pub fn raw_list(&self) -> &[String] {
        match self {
            MachineTypeField::List(values) => values,
            MachineTypeField::Single(_) | MachineTypeField::Null => &[],
        }
    }

    /// Normalize every value through the alias table. Unresolvable values
    /// fall back to `other`; duplicates collapse, first appearance wins.
    pub fn normalized(&self) -> Vec<MachineType> {
        let raw: Vec<String> = match self {
            MachineTypeField::List(values) => values.clone(),
            MachineTypeField::Single(joined) => joined
                .split(',')
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
            MachineTypeField::Null => Vec::new(),
        };

        let mut result = Vec::new();
        for value in raw {
            if value.trim().is_empty() {
                continue;
            }
            let machine = MachineType::from_alias(&value).unwrap_or(MachineType::Other);
            if !result.contains(&machine) {
                result.push(machine);
            }
        }
        result
    }
}

/// Header block of the metadata document.
///
/// Only the fields this tool reads or rewrites are typed; everything else
/// is preserved verbatim through `extra` so a rewrite never drops upstream
/// data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drawing_number: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    pub machine_type: MachineTypeField,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One recorded work step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_number: Option<u32>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The per-drawing metadata document (`instruction.json`).
///
/// Step records live either in machine-type buckets
/// (`workStepsByMachine`) or in the legacy flat `workSteps` sequence.
/// A missing key always reads as an empty sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataDocument {
    pub metadata: DrawingInfo,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub work_steps_by_machine: BTreeMap<MachineType, Vec<WorkStep>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub work_steps: Vec<WorkStep>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MetadataDocument {
    /// True iff at least one machine-type bucket is non-empty or the
    /// legacy sequence is non-empty.
    pub fn has_steps(&self) -> bool {
        self.work_steps_by_machine.values().any(|steps| !steps.is_empty())
            || !self.work_steps.is_empty()
    }

    /// Total recorded steps across all buckets and the legacy sequence.
    pub fn step_count(&self) -> usize {
        let bucketed: usize = self.work_steps_by_machine.values().map(Vec::len).sum();
        bucketed + self.work_steps.len()
    }

    /// Machine types with at least one recorded step.
    pub fn machine_types_with_steps(&self) -> Vec<MachineType> {
        self.work_steps_by_machine
            .iter()
            .filter(|(_, steps)| !steps.is_empty())
            .map(|(machine, _)| *machine)
            .collect()
    }
}
