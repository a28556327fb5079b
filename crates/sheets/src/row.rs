use eternal_cards::Card;
use serde_json::Value;
use std::fmt;

/// One sheet row keyed by column header.
pub type RawRow = serde_json::Map<String, Value>;

/// Why a deck-buildable row could not become a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Cell contents as text. Numbers and booleans render the way the sheet shows them.
fn cell(row: &RawRow, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("TRUE".to_string()),
        Value::Bool(false) => Some("FALSE".to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn trimmed(row: &RawRow, key: &str) -> String {
    cell(row, key)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn non_empty(row: &RawRow, key: &str) -> Option<String> {
    Some(trimmed(row, key)).filter(|s| !s.is_empty())
}

fn stat(row: &RawRow, key: &str) -> Option<u32> {
    let raw = trimmed(row, key);
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn unit_types(row: &RawRow) -> Vec<String> {
    trimmed(row, "UnitType")
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps a sheet row to a card.
///
/// Returns `Ok(None)` for rows that are not deck-buildable or have no name,
/// and an error when the row should be a card but its cost is unreadable.
pub fn parse_card_row(row: &RawRow) -> Result<Option<Card>, RowError> {
    let buildable = cell(row, "DeckBuildable")
        .map(|v| v.trim().eq_ignore_ascii_case("TRUE"))
        .unwrap_or(false);
    if !buildable {
        return Ok(None);
    }

    let name = trimmed(row, "Name");
    if name.is_empty() {
        return Ok(None);
    }

    let raw_cost = trimmed(row, "Cost");
    let cost = raw_cost.parse::<u32>().map_err(|_| RowError {
        name: name.clone(),
        reason: format!("invalid cost '{raw_cost}'"),
    })?;

    Ok(Some(Card {
        name,
        cost,
        influence: trimmed(row, "Influence"),
        card_type: non_empty(row, "Type").unwrap_or_else(|| "Unknown".to_string()),
        card_text: trimmed(row, "CardText"),
        rarity: non_empty(row, "Rarity").unwrap_or_else(|| "Common".to_string()),
        deck_buildable: true,
        set_number: trimmed(row, "SetNumber"),
        attack: stat(row, "Attack"),
        health: stat(row, "Health"),
        eternal_id: non_empty(row, "EternalID"),
        image_url: non_empty(row, "ImageUrl"),
        unit_types: unit_types(row),
    }))
}

/// Parses every row, skipping and logging the ones that fail.
pub fn parse_card_rows(rows: &[RawRow]) -> Vec<Card> {
    rows.iter()
        .filter_map(|row| match parse_card_row(row) {
            Ok(card) => card,
            Err(err) => {
                log::warn!("Skipping card row {err}");
                None
            }
        })
        .collect()
}
