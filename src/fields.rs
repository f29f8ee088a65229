//! Formatting of the delimited and embedded-JSON text columns.

/// `keywords_used` is a `;`-separated list
pub fn split_keywords(raw: Option<&str>) -> Vec<String> {
    split_list(raw, ';')
}

/// `lot_numbers` is a `,`-separated list
pub fn split_lots(raw: Option<&str>) -> Vec<String> {
    split_list(raw, ',')
}

/// `code_departement` arrives as a JSON-ish literal like `["75","92"]`;
/// strip the wrapping and split on commas.
pub fn split_departments(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let cleaned = raw.replace("[\"", "").replace("\"]", "").replace('"', "");
    split_list(Some(&cleaned), ',')
}

fn split_list(raw: Option<&str>, sep: char) -> Vec<String> {
    raw.map(|s| {
        s.split(sep)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Best-effort decode of the embedded JSON columns (`gestion`, `donnees`).
/// Malformed content yields `None`, never an error.
pub fn parse_json_field(raw: Option<&str>) -> Option<serde_json::Value> {
    raw.and_then(|s| serde_json::from_str(s).ok())
}
