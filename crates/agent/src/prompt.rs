//! The fixed instruction set for the classifier call.
//!
//! The model is told exactly four reply shapes and nothing else; all
//! interpretation freedom lives in which shape it picks and which field
//! values it fills in.

use chrono::NaiveDate;

use dealflow_core::{Deal, Field, Stage};

/// Marker used in place of the deal listing when the store has no rows.
pub const EMPTY_PIPELINE_MARKER: &str = "Pipeline is currently empty.";

/// Today's date in the process-local timezone; injected into the system
/// instruction and used by the executor's default-filling policy.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn system_prompt(today: NaiveDate) -> String {
    let stages: Vec<&str> = Stage::ALL.iter().map(|stage| stage.as_str()).collect();
    let fields: Vec<&str> = Field::ALL.iter().map(|field| field.name()).collect();

    format!(
        "You are a sales pipeline assistant. You help manage deals in a sales pipeline.\n\
         \n\
         The pipeline has these stages (in order): {stage_list}\n\
         \n\
         Each deal has these fields:\n\
         {field_list}\n\
         \n\
         Based on the user's message, determine what action to take and respond with JSON:\n\
         \n\
         For updating a deal:\n\
         {{\"action\": \"update\", \"company\": \"company name\", \"updates\": {{\"field\": \"value\"}}}}\n\
         \n\
         For adding a new deal:\n\
         {{\"action\": \"add\", \"deal\": {{\"company_name\": \"...\", \"stage\": \"Lead\"}}}}\n\
         \n\
         For listing deals:\n\
         {{\"action\": \"list\", \"filter_stage\": null}}  (or specify a stage)\n\
         \n\
         For questions or unclear requests:\n\
         {{\"action\": \"clarify\", \"message\": \"your question\"}}\n\
         \n\
         Always update stage_date to today when changing the stage.\n\
         Today's date is: {today}\n\
         \n\
         IMPORTANT: Respond ONLY with the JSON object, no other text.",
        stage_list = stages.join(" -> "),
        field_list = fields.iter().map(|name| format!("- {name}")).collect::<Vec<_>>().join("\n"),
        today = today,
    )
}

/// Context block summarizing the current pipeline, one line per deal.
pub fn deals_context(deals: &[Deal]) -> String {
    if deals.is_empty() {
        return EMPTY_PIPELINE_MARKER.to_string();
    }

    let mut context = String::from("Current deals in pipeline:\n");
    for deal in deals {
        let company =
            if deal.company_name.is_empty() { "Unknown" } else { deal.company_name.as_str() };
        let stage = if deal.stage.is_empty() { "No stage" } else { deal.stage.as_str() };
        context.push_str(&format!("- {company}: {stage}\n"));
    }
    context
}

/// The single user turn: pipeline snapshot, then the raw request.
pub fn user_message(context: &str, user_text: &str) -> String {
    format!("{context}\n\nUser request: {user_text}")
}
