use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use dealflow_core::{Deal, Field, PipelineError};

use crate::rows::FIRST_DATA_ROW;
use crate::store::RowStore;

/// In-process [`RowStore`] used by tests and offline readiness checks.
///
/// Keeps the same invariants as the remote grid: append-assigned row
/// numbers starting at 2, no delete, cell-level writes. A write journal
/// records every mutation so tests can assert that a failed command left
/// the store untouched.
#[derive(Default)]
pub struct InMemoryRowStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    rows: Vec<BTreeMap<Field, String>>,
    journal: Vec<CellWrite>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellWrite {
    pub row_number: u32,
    pub field: Field,
    pub value: String,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one deal row without touching the journal.
    pub fn seed(&self, fields: BTreeMap<Field, String>) -> u32 {
        let mut state = self.state.lock().expect("store lock");
        state.rows.push(fields);
        FIRST_DATA_ROW + (state.rows.len() as u32 - 1)
    }

    pub fn cell_writes(&self) -> Vec<CellWrite> {
        self.state.lock().expect("store lock").journal.clone()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().expect("store lock").rows.len()
    }
}

fn deal_from_row(index: usize, fields: &BTreeMap<Field, String>) -> Deal {
    let mut deal = Deal::new(FIRST_DATA_ROW + index as u32);
    for (field, value) in fields {
        deal.set(*field, value.clone());
    }
    deal
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn fetch_all(&self) -> Result<Vec<Deal>, PipelineError> {
        let state = self.state.lock().expect("store lock");
        Ok(state
            .rows
            .iter()
            .enumerate()
            .map(|(index, fields)| deal_from_row(index, fields))
            .collect())
    }

    async fn update_cell(
        &self,
        row_number: u32,
        field: Field,
        value: &str,
    ) -> Result<(), PipelineError> {
        let mut state = self.state.lock().expect("store lock");
        let index = row_number
            .checked_sub(FIRST_DATA_ROW)
            .map(|offset| offset as usize)
            .filter(|offset| *offset < state.rows.len())
            .ok_or_else(|| {
                PipelineError::backend(format!("no data row at row number {row_number}"))
            })?;

        state.rows[index].insert(field, value.to_string());
        state.journal.push(CellWrite { row_number, field, value: value.to_string() });
        Ok(())
    }

    async fn append_row(&self, fields: &BTreeMap<Field, String>) -> Result<u32, PipelineError> {
        let mut state = self.state.lock().expect("store lock");
        state.rows.push(fields.clone());
        Ok(FIRST_DATA_ROW + (state.rows.len() as u32 - 1))
    }
}
