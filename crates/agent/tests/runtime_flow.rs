//! End-to-end passes through the command core with a scripted model and
//! an in-memory store: raw text in, chat reply out, store mutated.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use dealflow_agent::{LlmClient, PipelineRuntime};
use dealflow_core::{Field, PipelineError};
use dealflow_sheets::{InMemoryRowStore, RowStore};

/// Replays a fixed reply and records the prompts it was shown.
struct ScriptedLlm {
    reply: String,
    seen_user_turns: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), seen_user_turns: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, PipelineError> {
        self.seen_user_turns.lock().expect("llm lock").push(user.to_string());
        Ok(self.reply.clone())
    }
}

fn seeded_store(rows: &[(&str, &str)]) -> Arc<InMemoryRowStore> {
    let store = InMemoryRowStore::new();
    for (company, stage) in rows {
        let mut fields = BTreeMap::new();
        fields.insert(Field::CompanyName, company.to_string());
        fields.insert(Field::Stage, stage.to_string());
        store.seed(fields);
    }
    Arc::new(store)
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

#[tokio::test]
async fn add_into_empty_store_creates_row_two_with_todays_dates() {
    let store = Arc::new(InMemoryRowStore::new());
    let llm = ScriptedLlm::new(
        "{\"action\": \"add\", \"deal\": {\"company_name\": \"Acme\", \"stage\": \"Lead\"}}",
    );
    let runtime = PipelineRuntime::new(store.clone(), llm.clone());

    let reply = runtime.handle("Add Acme Corp as a new lead").await;
    assert_eq!(reply, "Added new deal: Acme");

    let deals = store.fetch_all().await.expect("fetch");
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].row_number, 2);
    assert_eq!(deals[0].stage, "Lead");
    assert_eq!(deals[0].date_entered, today());
    assert_eq!(deals[0].stage_date, today());

    // The model saw the empty-pipeline marker, not a deal listing.
    let turns = llm.seen_user_turns.lock().expect("llm lock");
    assert!(turns[0].contains("Pipeline is currently empty."));
    assert!(turns[0].contains("User request: Add Acme Corp as a new lead"));
}

#[tokio::test]
async fn update_changes_named_fields_and_nothing_else() {
    let store = seeded_store(&[("Acme", "Lead")]);
    let llm = ScriptedLlm::new(
        "{\"action\": \"update\", \"company\": \"Acme\", \
         \"updates\": {\"stage\": \"Discovery\", \"stage_date\": \"2024-06-01\"}}",
    );
    let runtime = PipelineRuntime::new(store.clone(), llm);

    let reply = runtime.handle("Move Acme to Discovery").await;
    assert!(reply.starts_with("Updated Acme:"));

    let deals = store.fetch_all().await.expect("fetch");
    assert_eq!(deals[0].stage, "Discovery");
    assert_eq!(deals[0].stage_date, "2024-06-01");
    assert_eq!(deals[0].company_name, "Acme");
    assert_eq!(deals[0].notes, "");
}

#[tokio::test]
async fn update_on_unknown_company_reports_not_found_without_writes() {
    let store = seeded_store(&[("Acme", "Lead")]);
    let llm = ScriptedLlm::new(
        "{\"action\": \"update\", \"company\": \"Nonexistent\", \
         \"updates\": {\"stage\": \"Won\"}}",
    );
    let runtime = PipelineRuntime::new(store.clone(), llm);

    let reply = runtime.handle("Mark Nonexistent as won").await;
    assert_eq!(reply, "Could not find a deal for 'Nonexistent'");
    assert!(store.cell_writes().is_empty());
}

#[tokio::test]
async fn fenced_model_reply_is_handled_like_bare_json() {
    let store = seeded_store(&[("Acme", "Lead"), ("Initech", "Discovery")]);
    let llm =
        ScriptedLlm::new("```json\n{\"action\": \"list\", \"filter_stage\": \"discovery\"}\n```");
    let runtime = PipelineRuntime::new(store, llm);

    let reply = runtime.handle("who is in discovery?").await;
    assert!(reply.starts_with("Found 1 deal(s):"));
    assert!(reply.contains("Initech"));
}

#[tokio::test]
async fn clarify_is_relayed_without_touching_the_store() {
    let store = Arc::new(InMemoryRowStore::new());
    let llm = ScriptedLlm::new(
        "{\"action\": \"clarify\", \"message\": \"Which company do you mean?\"}",
    );
    let runtime = PipelineRuntime::new(store.clone(), llm);

    let reply = runtime.handle("update the deal").await;
    assert_eq!(reply, "Question: Which company do you mean?");
    assert_eq!(store.row_count(), 0);
    assert!(store.cell_writes().is_empty());
}

#[tokio::test]
async fn unknown_action_kind_becomes_a_diagnostic_reply() {
    let store = Arc::new(InMemoryRowStore::new());
    let llm = ScriptedLlm::new("{\"action\": \"delete\", \"company\": \"Acme\"}");
    let runtime = PipelineRuntime::new(store, llm);

    let reply = runtime.handle("delete acme").await;
    assert_eq!(reply, "Unknown action: delete");
}

#[tokio::test]
async fn prose_model_reply_becomes_an_error_reply() {
    let store = Arc::new(InMemoryRowStore::new());
    let llm = ScriptedLlm::new("I went ahead and updated that for you!");
    let runtime = PipelineRuntime::new(store, llm);

    let reply = runtime.handle("move acme forward").await;
    assert!(reply.starts_with("Error:"));
}

#[tokio::test]
async fn context_block_lists_current_deals_for_the_model() {
    let store = seeded_store(&[("Acme", "Lead"), ("Initech", "Discovery")]);
    let llm = ScriptedLlm::new("{\"action\": \"list\", \"filter_stage\": null}");
    let runtime = PipelineRuntime::new(store, llm.clone());

    runtime.handle("show everything").await;

    let turns = llm.seen_user_turns.lock().expect("llm lock");
    assert!(turns[0].contains("- Acme: Lead"));
    assert!(turns[0].contains("- Initech: Discovery"));
}
