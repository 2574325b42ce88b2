//! CSV encoding for the export matrix and decoding for description files.

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::model::{Descriptions, StatesMap, all_items};

const ITEM_COLUMN: &str = "item";
const DESCRIPTION_COLUMN: &str = "description";

/// Render the item × version matrix.
///
/// Header is `item[,description],<versions...>`; rows are sorted by item,
/// cells with no recorded state are empty and records end with `\r\n`.
pub fn export_csv(
    states: &StatesMap,
    descriptions: Option<&Descriptions>,
) -> csv::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    let mut header = vec![ITEM_COLUMN];
    if descriptions.is_some() {
        header.push(DESCRIPTION_COLUMN);
    }
    header.extend(states.keys().map(String::as_str));
    writer.write_record(&header)?;

    for item in all_items(states) {
        let mut row = vec![item];
        if let Some(descriptions) = descriptions {
            row.push(descriptions.get(item).map_or("", String::as_str));
        }
        for items in states.values() {
            row.push(items.get(item).map_or("", String::as_str));
        }
        writer.write_record(&row)?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Parse a description file with `item` and `description` columns.
///
/// Column order is free and extra columns are ignored. Every row needs a
/// non-blank item. Errors describe the first problem found; nothing is
/// returned on failure.
pub fn parse_descriptions(data: &[u8]) -> Result<Descriptions, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}') == name)
            .ok_or_else(|| format!("missing '{name}' column"))
    };
    let item_idx = column(ITEM_COLUMN)?;
    let description_idx = column(DESCRIPTION_COLUMN)?;

    let mut descriptions = Descriptions::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        let item = record
            .get(item_idx)
            .filter(|item| !item.trim().is_empty());
        let (Some(item), Some(description)) = (item, record.get(description_idx)) else {
            let line = record.position().map_or(0, |p| p.line());
            return Err(format!("line {line}: missing item or description"));
        };
        if descriptions
            .insert(item.to_string(), description.to_string())
            .is_some()
        {
            return Err(format!("duplicate item '{item}'"));
        }
    }
    Ok(descriptions)
}
