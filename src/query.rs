//! Builders for Drive `files.list` filter expressions.

/// MIME type Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// MIME type of the CSV files this crate downloads.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Escape single quotes so a value can be embedded in a quoted query literal.
///
/// Nothing else is escaped.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Query matching folders named exactly `name`.
pub fn folder_query(name: &str) -> String {
    format!(
        "name='{}' and mimeType='{}'",
        escape_query_value(name),
        FOLDER_MIME_TYPE
    )
}

/// Query matching CSV files named exactly `name`, optionally inside `parent_id`.
pub fn csv_file_query(name: &str, parent_id: Option<&str>) -> String {
    let mut query = format!(
        "name='{}' and mimeType='{}'",
        escape_query_value(name),
        CSV_MIME_TYPE
    );
    if let Some(parent_id) = parent_id {
        query.push_str(&format!(" and '{}' in parents", parent_id));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_single_quotes() {
        assert_eq!(escape_query_value("Bob's data"), "Bob\\'s data");
        assert_eq!(escape_query_value("''"), "\\'\\'");
    }

    #[test]
    fn test_escape_leaves_other_characters() {
        assert_eq!(escape_query_value("a\\b \"c\""), "a\\b \"c\"");
    }

    #[test]
    fn test_folder_query() {
        assert_eq!(
            folder_query("Data"),
            "name='Data' and mimeType='application/vnd.google-apps.folder'"
        );
        assert_eq!(
            folder_query("Team's"),
            "name='Team\\'s' and mimeType='application/vnd.google-apps.folder'"
        );
    }

    #[test]
    fn test_csv_file_query_unscoped() {
        assert_eq!(
            csv_file_query("Cdata_w_gaps_and_wind.csv", None),
            "name='Cdata_w_gaps_and_wind.csv' and mimeType='text/csv'"
        );
    }

    #[test]
    fn test_csv_file_query_in_folder() {
        assert_eq!(
            csv_file_query("a.csv", Some("F1")),
            "name='a.csv' and mimeType='text/csv' and 'F1' in parents"
        );
    }

    #[test]
    fn test_csv_file_query_escapes_file_name() {
        assert_eq!(
            csv_file_query("Bob's.csv", None),
            "name='Bob\\'s.csv' and mimeType='text/csv'"
        );
    }
}
