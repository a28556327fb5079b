use crate::collection::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Metadata predicate for collection queries.
///
/// Mirrors the subset of Chroma's `where` syntax the search layer needs:
/// equality, membership and conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhereFilter {
    Eq { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    And(Vec<WhereFilter>),
}

impl WhereFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Combines clauses: none yields `None`, one is returned as is.
    pub fn all(mut clauses: Vec<WhereFilter>) -> Option<Self> {
        match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(Self::And(clauses)),
        }
    }

    #[must_use]
    pub fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            Self::Eq { field, value } => metadata.get(field) == Some(value),
            Self::In { field, values } => metadata
                .get(field)
                .is_some_and(|actual| values.contains(actual)),
            Self::And(clauses) => clauses.iter().all(|clause| clause.matches(metadata)),
        }
    }

    /// The same predicate in Chroma's JSON form, for logs and reports.
    #[must_use]
    pub fn to_chroma_json(&self) -> Value {
        match self {
            Self::Eq { field, value } => json!({ field.as_str(): value }),
            Self::In { field, values } => json!({ field.as_str(): { "$in": values } }),
            Self::And(clauses) => json!({
                "$and": clauses.iter().map(Self::to_chroma_json).collect::<Vec<_>>()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn meta(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => Metadata::new(),
        }
    }

    #[test]
    fn clauses_match_metadata() {
        let card = meta(json!({"type": "Unit", "rarity": "Rare", "can_access_market": false}));

        assert!(WhereFilter::eq("type", "Unit").matches(&card));
        assert!(!WhereFilter::eq("type", "Spell").matches(&card));
        assert!(WhereFilter::is_in("rarity", ["Common", "Rare"]).matches(&card));
        assert!(!WhereFilter::is_in("missing", ["x"]).matches(&card));

        let both = WhereFilter::all(vec![
            WhereFilter::eq("can_access_market", false),
            WhereFilter::is_in("type", ["Unit", "Spell"]),
        ])
        .unwrap();
        assert!(both.matches(&card));
    }

    #[test]
    fn all_collapses_trivial_conjunctions() {
        assert_eq!(WhereFilter::all(Vec::new()), None);
        assert_eq!(
            WhereFilter::all(vec![WhereFilter::eq("a", 1)]),
            Some(WhereFilter::eq("a", 1))
        );
    }

    #[test]
    fn renders_chroma_syntax() {
        let filter = WhereFilter::And(vec![
            WhereFilter::eq("can_access_market", true),
            WhereFilter::is_in("type", ["Unit"]),
        ]);
        assert_eq!(
            filter.to_chroma_json(),
            json!({"$and": [{"can_access_market": true}, {"type": {"$in": ["Unit"]}}]})
        );
    }
}
