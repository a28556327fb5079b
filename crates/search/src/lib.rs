mod engine;
mod error;
mod filters;
mod semantic;
mod suggest;

pub use engine::{SearchEngine, SearchMode, SearchResult, UnresolvedName, DEFAULT_RESULTS};
pub use error::{Result, SearchError};
pub use filters::{apply_post_filters, SearchFilters};
pub use semantic::{SemanticCardIndex, VectorCardIndex};
pub use suggest::suggest;
