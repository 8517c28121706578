use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use dealflow_core::{Action, Deal, Field, PipelineError, Stage};
use dealflow_sheets::RowStore;

use crate::prompt;

/// Validates and dispatches one [`Action`] against the row store.
///
/// Stateless by design - each call is one request/response; all state
/// lives in the store. Stage transitions are never checked: the pipeline
/// order is advice to the model, not an invariant of this system.
pub struct ActionExecutor {
    store: Arc<dyn RowStore>,
}

impl ActionExecutor {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, action: Action) -> Result<String, PipelineError> {
        match action {
            Action::Update { company, updates } => self.update(&company, updates).await,
            Action::Add { deal } => self.add(deal).await,
            Action::List { filter_stage } => self.list(filter_stage.as_deref()).await,
            Action::Clarify { message } => Ok(format!("Question: {message}")),
        }
    }

    async fn update(
        &self,
        company: &str,
        updates: BTreeMap<String, String>,
    ) -> Result<String, PipelineError> {
        let deal = self
            .store
            .find_by_company(company)
            .await?
            .ok_or_else(|| PipelineError::DealNotFound { company: company.to_string() })?;

        // Every key is checked before the first write, so an unknown
        // field leaves the store unmodified. Writes after that point are
        // per-cell and not rolled back on a later failure.
        let validated = validate_fields(updates)?;

        let mut applied = Vec::with_capacity(validated.len());
        for (field, value) in &validated {
            self.store.update_cell(deal.row_number, *field, value).await?;
            applied.push(format!("{}={}", field.name(), value));
        }

        info!(
            company = %deal.company_name,
            row_number = deal.row_number,
            field_count = applied.len(),
            "applied deal update"
        );
        Ok(format!("Updated {}: {}", deal.company_name, applied.join(", ")))
    }

    async fn add(&self, deal: BTreeMap<String, String>) -> Result<String, PipelineError> {
        let mut fields = validate_fields(deal)?.into_iter().collect::<BTreeMap<_, _>>();

        let today = prompt::today().to_string();
        fields.entry(Field::DateEntered).or_insert_with(|| today.clone());
        fields.entry(Field::StageDate).or_insert_with(|| today.clone());
        fields.entry(Field::Stage).or_insert_with(|| Stage::Lead.as_str().to_string());

        let company = fields.get(&Field::CompanyName).cloned().unwrap_or_default();
        let row_number = self.store.append_row(&fields).await?;

        info!(company = %company, row_number, "appended new deal");
        Ok(format!("Added new deal: {company}"))
    }

    async fn list(&self, filter_stage: Option<&str>) -> Result<String, PipelineError> {
        let deals = self.store.fetch_all().await?;
        let filtered: Vec<&Deal> = match filter_stage {
            Some(stage) => {
                deals.iter().filter(|deal| deal.stage.eq_ignore_ascii_case(stage)).collect()
            }
            None => deals.iter().collect(),
        };

        if filtered.is_empty() {
            return Ok("No deals found.".to_string());
        }

        let mut result = format!("Found {} deal(s):\n", filtered.len());
        for deal in filtered {
            result.push_str(&format!("  • {}: {}", deal.company_name, deal.stage));
            if !deal.next_action.is_empty() {
                result.push_str(&format!(" (Next: {})", deal.next_action));
            }
            result.push('\n');
        }
        Ok(result)
    }
}

/// Rejects any field name outside the fixed set before it can reach the
/// store. Order of application follows column order.
fn validate_fields(
    raw: BTreeMap<String, String>,
) -> Result<Vec<(Field, String)>, PipelineError> {
    let mut validated = BTreeMap::new();
    for (name, value) in raw {
        let field = Field::from_name(&name)
            .ok_or(PipelineError::UnknownField { field: name })?;
        validated.insert(field, value);
    }
    Ok(validated.into_iter().collect())
}
