use thiserror::Error;

pub type Result<T> = std::result::Result<T, CardError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("Unknown faction: {0}")]
    UnknownFaction(String),

    #[error("Unknown rarity: {0}")]
    UnknownRarity(String),

    #[error("Unknown game format: {0} (expected Throne or Expedition)")]
    UnknownFormat(String),

    #[error("Invalid quantity {quantity} for '{name}': allowed 1..={max}")]
    InvalidQuantity { name: String, quantity: u32, max: u32 },
}
