//! # Eternal Sheets
//!
//! Loads the Eternal card catalog from the community spreadsheet (or a JSON
//! export of it), normalizes rows into [`eternal_cards::Card`] records and
//! keeps them cached in memory.
//!
//! ## Example
//!
//! ```no_run
//! use eternal_sheets::{CardQuery, JsonFileSource, SheetsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SheetsClient::new(JsonFileSource::new("data/cards.json"));
//!
//!     let query = CardQuery {
//!         factions: vec!["Fire".to_string()],
//!         cost_max: Some(2),
//!         ..CardQuery::default()
//!     };
//!     for card in client.search_cards(&query).await? {
//!         println!("{card}");
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod row;
mod source;

pub use client::{CacheInfo, CardQuery, SheetsClient};
pub use error::{Result, SheetsError};
pub use row::{parse_card_row, parse_card_rows, RawRow, RowError};
pub use source::{
    rows_from_values, CardSource, GoogleSheetsSource, JsonFileSource, DEFAULT_RANGE,
    DEFAULT_SHEET_ID,
};
