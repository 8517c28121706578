use serde::{Deserialize, Serialize};

/// One column of the backing grid.
///
/// `ALL` is the fixed column order (A through N); it is the single source
/// of truth for both the read path (zipping fetched rows) and the write
/// path (cell addressing, row building). Reordering or adding a field is
/// a change to this enum only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CompanyName,
    ContactName,
    ContactEmail,
    ContactPhone,
    ProjectDescription,
    DateEntered,
    Stage,
    StageDate,
    Notes,
    EstimatedMrr,
    Priority,
    NextActionDate,
    NextAction,
    LostReason,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::CompanyName,
        Field::ContactName,
        Field::ContactEmail,
        Field::ContactPhone,
        Field::ProjectDescription,
        Field::DateEntered,
        Field::Stage,
        Field::StageDate,
        Field::Notes,
        Field::EstimatedMrr,
        Field::Priority,
        Field::NextActionDate,
        Field::NextAction,
        Field::LostReason,
    ];

    /// Snake-case field name, matching the normalized header row.
    pub fn name(self) -> &'static str {
        match self {
            Field::CompanyName => "company_name",
            Field::ContactName => "contact_name",
            Field::ContactEmail => "contact_email",
            Field::ContactPhone => "contact_phone",
            Field::ProjectDescription => "project_description",
            Field::DateEntered => "date_entered",
            Field::Stage => "stage",
            Field::StageDate => "stage_date",
            Field::Notes => "notes",
            Field::EstimatedMrr => "estimated_mrr",
            Field::Priority => "priority",
            Field::NextActionDate => "next_action_date",
            Field::NextAction => "next_action",
            Field::LostReason => "lost_reason",
        }
    }

    /// Column letter in `ColumnLetterRowNumber` cell addressing.
    pub fn column_letter(self) -> char {
        let index = Field::ALL.iter().position(|field| *field == self);
        (b'A' + index.unwrap_or(0) as u8) as char
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|field| field.name() == name)
    }

    /// Header-row normalization: lower-case, spaces become underscores.
    pub fn normalize_header(header: &str) -> String {
        header.trim().to_ascii_lowercase().replace(' ', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::Field;

    #[test]
    fn columns_cover_a_through_n_in_order() {
        let letters: String = Field::ALL.iter().map(|field| field.column_letter()).collect();
        assert_eq!(letters, "ABCDEFGHIJKLMN");
    }

    #[test]
    fn name_and_from_name_are_inverse() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("mrr"), None);
    }

    #[test]
    fn stage_sits_in_column_g() {
        assert_eq!(Field::Stage.column_letter(), 'G');
        assert_eq!(Field::LostReason.column_letter(), 'N');
    }

    #[test]
    fn headers_normalize_to_field_names() {
        assert_eq!(Field::normalize_header("Company Name"), "company_name");
        assert_eq!(Field::normalize_header(" Estimated MRR "), "estimated_mrr");
        assert_eq!(Field::normalize_header("stage"), "stage");
    }
}
