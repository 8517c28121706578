//! Positional translation between grid rows and `Deal` records.
//!
//! All functions here are pure; both store implementations and the
//! tests share them, so the read and write paths cannot drift apart.

use std::collections::BTreeMap;

use dealflow_core::{Deal, Field};

/// The full column range of one deal row.
pub const DEAL_RANGE: &str = "A:N";

/// First data row; row 1 is reserved for headers.
pub const FIRST_DATA_ROW: u32 = 2;

/// Builds deals from a raw `get` response: row 1 is headers (normalized
/// to lower-case with underscores), each later row is zipped positionally
/// against them. Short rows are padded with empty text for the missing
/// trailing fields; cells under unrecognized headers are ignored.
pub fn deals_from_values(values: &[Vec<String>]) -> Vec<Deal> {
    let Some((header_row, data_rows)) = values.split_first() else {
        return Vec::new();
    };

    let headers: Vec<Option<Field>> = header_row
        .iter()
        .map(|header| Field::from_name(&Field::normalize_header(header)))
        .collect();

    data_rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut deal = Deal::new(FIRST_DATA_ROW + index as u32);
            for (position, field) in headers.iter().enumerate() {
                let Some(field) = field else { continue };
                let cell = row.get(position).cloned().unwrap_or_default();
                deal.set(*field, cell);
            }
            deal
        })
        .collect()
}

/// Builds one row in fixed column order, empty text for unset fields.
pub fn row_from_fields(fields: &BTreeMap<Field, String>) -> Vec<String> {
    Field::ALL
        .iter()
        .map(|field| fields.get(field).cloned().unwrap_or_default())
        .collect()
}

/// `ColumnLetterRowNumber` cell coordinate, e.g. `G17` for stage row 17.
pub fn cell_reference(field: Field, row_number: u32) -> String {
    format!("{}{}", field.column_letter(), row_number)
}

/// Extracts the assigned row number from an append response's updated
/// range, e.g. `Deals!A5:N5` -> 5.
pub fn row_number_from_range(updated_range: &str) -> Option<u32> {
    let cells = updated_range.rsplit('!').next()?;
    let first_cell = cells.split(':').next()?;
    let digits: String = first_cell.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use dealflow_core::Field;

    use super::{
        cell_reference, deals_from_values, row_from_fields, row_number_from_range, DEAL_RANGE,
    };

    fn header_row() -> Vec<String> {
        Field::ALL.iter().map(|field| field.name().to_string()).collect()
    }

    #[test]
    fn zips_rows_against_normalized_headers() {
        let headers = vec![
            "Company Name".to_string(),
            "Contact Name".to_string(),
            "Contact Email".to_string(),
        ];
        let values = vec![
            headers,
            vec!["Acme Corp".to_string(), "Jo Field".to_string(), "jo@acme.test".to_string()],
        ];

        let deals = deals_from_values(&values);
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].row_number, 2);
        assert_eq!(deals[0].company_name, "Acme Corp");
        assert_eq!(deals[0].contact_email, "jo@acme.test");
    }

    #[test]
    fn short_rows_are_padded_with_empty_text() {
        let values = vec![header_row(), vec!["Acme".to_string()]];

        let deals = deals_from_values(&values);
        assert_eq!(deals[0].company_name, "Acme");
        assert_eq!(deals[0].stage, "");
        assert_eq!(deals[0].lost_reason, "");
    }

    #[test]
    fn row_numbers_follow_store_order_from_two() {
        let values = vec![
            header_row(),
            vec!["First".to_string()],
            vec!["Second".to_string()],
            vec!["Third".to_string()],
        ];

        let rows: Vec<u32> = deals_from_values(&values).iter().map(|d| d.row_number).collect();
        assert_eq!(rows, vec![2, 3, 4]);
    }

    #[test]
    fn empty_grid_yields_no_deals() {
        assert!(deals_from_values(&[]).is_empty());
        assert!(deals_from_values(&[header_row()]).is_empty());
    }

    #[test]
    fn unknown_headers_are_ignored() {
        let values = vec![
            vec!["company_name".to_string(), "owner".to_string(), "stage".to_string()],
            vec!["Acme".to_string(), "someone".to_string(), "Lead".to_string()],
        ];

        let deals = deals_from_values(&values);
        assert_eq!(deals[0].company_name, "Acme");
        assert_eq!(deals[0].stage, "Lead");
    }

    #[test]
    fn rows_build_in_fixed_column_order() {
        let mut fields = BTreeMap::new();
        fields.insert(Field::CompanyName, "Acme".to_string());
        fields.insert(Field::Stage, "Lead".to_string());

        let row = row_from_fields(&fields);
        assert_eq!(row.len(), 14);
        assert_eq!(row[0], "Acme");
        assert_eq!(row[6], "Lead");
        assert!(row[1].is_empty());
        assert!(row[13].is_empty());
    }

    #[test]
    fn cell_references_use_column_letters() {
        assert_eq!(cell_reference(Field::Stage, 17), "G17");
        assert_eq!(cell_reference(Field::CompanyName, 2), "A2");
        assert_eq!(cell_reference(Field::LostReason, 9), "N9");
    }

    #[test]
    fn append_range_parses_back_to_a_row_number() {
        assert_eq!(row_number_from_range("Deals!A5:N5"), Some(5));
        assert_eq!(row_number_from_range("A2:N2"), Some(2));
        assert_eq!(row_number_from_range("garbage"), None);
    }

    #[test]
    fn deal_range_covers_all_columns() {
        assert_eq!(DEAL_RANGE, "A:N");
    }
}
