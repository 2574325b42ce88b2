use crate::model::ItemSet;

/// Parse free text into a set of item identifiers.
///
/// Commas and newlines both separate items; tokens are trimmed and empty
/// ones dropped. Duplicates collapse.
pub fn parse_items(text: &str) -> ItemSet {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
