//! # Eternal Cards
//!
//! Typed card, deck and game-rule model shared by every other crate.
//!
//! ## Features
//!
//! - **Card records** normalized from the card sheet, with derived flags
//!   (power, unit, sigil, market access)
//! - **Factions** parsed from influence strings like `{F}{F}{S}`
//! - **Deck statistics** and validation against the constructed rules
//! - **Selections** mapping card names to quantities, as picked from a pool
//!
//! ## Example
//!
//! ```
//! use eternal_cards::{Card, Deck, DeckCard, DeckRules};
//!
//! let torch = Card::new("Torch", "Spell").with_cost(1, "{F}");
//! let mut deck = Deck::new("Burn");
//! deck.main_deck.push(DeckCard::new(torch, 4).unwrap());
//!
//! let report = deck.validate(&DeckRules::STANDARD);
//! assert!(!report.is_valid());
//! ```

mod card;
mod deck;
mod error;
mod faction;
mod rules;
mod selection;

pub use card::{Card, MARKET_ACCESS_PATTERNS};
pub use deck::{Deck, DeckCard, DeckValidation};
pub use error::{CardError, Result};
pub use faction::{factions_in, Faction};
pub use rules::{CardType, DeckRules, GameFormat, MarketRules, Rarity, SIGIL_MAX_COPIES};
pub use selection::{DeckSelection, PoolStats};
