use serde::{Deserialize, Serialize};

use crate::domain::field::Field;

/// The ordered pipeline progression. Order is meaningful to readers but
/// never enforced - any transition, including backward or skipped, is
/// accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Lead,
    Discovery,
    BuildPoc,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Lead,
        Stage::Discovery,
        Stage::BuildPoc,
        Stage::Proposal,
        Stage::Negotiation,
        Stage::Won,
        Stage::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lead => "Lead",
            Stage::Discovery => "Discovery",
            Stage::BuildPoc => "Build POC",
            Stage::Proposal => "Proposal",
            Stage::Negotiation => "Negotiation",
            Stage::Won => "Won",
            Stage::Lost => "Lost",
        }
    }

    pub fn parse(value: &str) -> Option<Stage> {
        let normalized = value.trim();
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(normalized))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse(value: &str) -> Option<Priority> {
        [Priority::High, Priority::Medium, Priority::Low]
            .iter()
            .copied()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// One sales-pipeline record, one contiguous row in the backing grid.
///
/// All attributes are stored as free text - the store is schemaless and
/// typing is optimistic. `row_number` is the durable identity: assigned
/// on append, stable for the record's lifetime, never reused. Row 1 is
/// the reserved header row, so data rows start at 2.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub row_number: u32,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub project_description: String,
    pub date_entered: String,
    pub stage: String,
    pub stage_date: String,
    pub notes: String,
    pub estimated_mrr: String,
    pub priority: String,
    pub next_action_date: String,
    pub next_action: String,
    pub lost_reason: String,
}

impl Deal {
    pub fn new(row_number: u32) -> Self {
        Self { row_number, ..Self::default() }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::CompanyName => &self.company_name,
            Field::ContactName => &self.contact_name,
            Field::ContactEmail => &self.contact_email,
            Field::ContactPhone => &self.contact_phone,
            Field::ProjectDescription => &self.project_description,
            Field::DateEntered => &self.date_entered,
            Field::Stage => &self.stage,
            Field::StageDate => &self.stage_date,
            Field::Notes => &self.notes,
            Field::EstimatedMrr => &self.estimated_mrr,
            Field::Priority => &self.priority,
            Field::NextActionDate => &self.next_action_date,
            Field::NextAction => &self.next_action,
            Field::LostReason => &self.lost_reason,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::CompanyName => self.company_name = value,
            Field::ContactName => self.contact_name = value,
            Field::ContactEmail => self.contact_email = value,
            Field::ContactPhone => self.contact_phone = value,
            Field::ProjectDescription => self.project_description = value,
            Field::DateEntered => self.date_entered = value,
            Field::Stage => self.stage = value,
            Field::StageDate => self.stage_date = value,
            Field::Notes => self.notes = value,
            Field::EstimatedMrr => self.estimated_mrr = value,
            Field::Priority => self.priority = value,
            Field::NextActionDate => self.next_action_date = value,
            Field::NextAction => self.next_action = value,
            Field::LostReason => self.lost_reason = value,
        }
    }

    /// Case-insensitive substring match on the company name.
    pub fn matches_company(&self, query: &str) -> bool {
        self.company_name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::{Deal, Priority, Stage};
    use crate::domain::field::Field;

    #[test]
    fn stage_sequence_runs_lead_to_lost() {
        let names: Vec<&str> = Stage::ALL.iter().map(|stage| stage.as_str()).collect();
        assert_eq!(
            names,
            vec!["Lead", "Discovery", "Build POC", "Proposal", "Negotiation", "Won", "Lost"]
        );
    }

    #[test]
    fn stage_parse_is_case_insensitive() {
        assert_eq!(Stage::parse("discovery"), Some(Stage::Discovery));
        assert_eq!(Stage::parse("BUILD POC"), Some(Stage::BuildPoc));
        assert_eq!(Stage::parse("closed"), None);
    }

    #[test]
    fn priority_parse_accepts_any_casing() {
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse(" Medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn get_and_set_cover_every_field() {
        let mut deal = Deal::new(2);
        for (index, field) in Field::ALL.iter().enumerate() {
            deal.set(*field, format!("value-{index}"));
        }
        for (index, field) in Field::ALL.iter().enumerate() {
            assert_eq!(deal.get(*field), format!("value-{index}"));
        }
    }

    #[test]
    fn company_match_is_case_insensitive_substring() {
        let mut deal = Deal::new(2);
        deal.company_name = "Acme Corp".to_string();
        assert!(deal.matches_company("acme"));
        assert!(deal.matches_company("CORP"));
        assert!(!deal.matches_company("initech"));
    }
}
