use std::collections::BTreeMap;

use async_trait::async_trait;

use dealflow_core::{Deal, Field, PipelineError};

/// The row-oriented backing store.
///
/// One implementation speaks to the remote spreadsheet, one is an
/// in-process fake; both observe the same invariants: row 1 is the
/// header row, `row_number` is assigned on append and never changes,
/// and there is no delete.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Full-grid scan, preserving store row order. There are no partial
    /// or indexed reads.
    async fn fetch_all(&self) -> Result<Vec<Deal>, PipelineError>;

    /// Writes a single cell at the field's fixed column and the given
    /// row, with as-typed interpretation left to the store.
    async fn update_cell(
        &self,
        row_number: u32,
        field: Field,
        value: &str,
    ) -> Result<(), PipelineError>;

    /// Appends a new final row built in fixed column order, empty text
    /// for unset fields. Returns the store-assigned row number.
    async fn append_row(&self, fields: &BTreeMap<Field, String>) -> Result<u32, PipelineError>;

    /// Case-insensitive substring match against all current rows, first
    /// match in row order. Ambiguity resolves to the first match by
    /// policy.
    async fn find_by_company(&self, company: &str) -> Result<Option<Deal>, PipelineError> {
        let deals = self.fetch_all().await?;
        Ok(deals.into_iter().find(|deal| deal.matches_company(company)))
    }
}
