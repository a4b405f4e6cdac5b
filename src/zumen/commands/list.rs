//! Enumerate the store's drawings with their recorded-step shape.

use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{DrawingId, MachineType};
use crate::store::DrawingStore;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct DrawingSummary {
    pub id: DrawingId,
    pub title: String,
    pub machine_types: Vec<MachineType>,
    pub step_count: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn run<S: DrawingStore>(store: &S) -> Result<CmdResult> {
    let mut summaries = Vec::new();

    for id in store.list_drawings()? {
        let doc = store.read_metadata(&id)?.unwrap_or_default();
        summaries.push(DrawingSummary {
            title: doc.metadata.title.clone(),
            machine_types: doc.machine_types_with_steps(),
            step_count: doc.step_count(),
            updated_at: doc.metadata.updated_at,
            id,
        });
    }

    Ok(CmdResult::default().with_listed_drawings(summaries))
}
