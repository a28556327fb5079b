use crate::analysis::StrategyAnalysis;
use crate::error::Result;
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

/// Second pass over a keyword analysis. Implementations may call out to a
/// language model; a failure leaves the keyword analysis in place.
#[async_trait]
pub trait StrategyRefiner: Send + Sync {
    async fn refine(&self, input: &str, analysis: StrategyAnalysis) -> Result<StrategyAnalysis>;
}

/// Returns the analysis unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughRefiner;

#[async_trait]
impl StrategyRefiner for PassThroughRefiner {
    async fn refine(&self, _input: &str, analysis: StrategyAnalysis) -> Result<StrategyAnalysis> {
        Ok(analysis)
    }
}

/// Shortest card name worth looking for in free text.
const MIN_MENTION_LEN: usize = 4;

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// `\b` only binds next to word characters, so edges like `)` go without.
fn mention_pattern(name: &str) -> String {
    let start = if is_word_char(name.chars().next()) { r"\b" } else { "" };
    let end = if is_word_char(name.chars().last()) { r"\b" } else { "" };
    format!("{start}{}{end}", regex::escape(name))
}

/// Adds catalog cards named in the description to the must-include list.
pub struct CardMentionRefiner {
    names: Vec<(String, Regex)>,
}

impl CardMentionRefiner {
    pub fn new<I, S>(card_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        for name in card_names {
            let name = name.as_ref().trim();
            if name.chars().count() < MIN_MENTION_LEN {
                continue;
            }
            let pattern = RegexBuilder::new(&mention_pattern(name))
                .case_insensitive(true)
                .build()?;
            names.push((name.to_string(), pattern));
        }
        Ok(Self { names })
    }

    /// Catalog names that appear in `input`, in catalog order.
    #[must_use]
    pub fn mentions(&self, input: &str) -> Vec<&str> {
        self.names
            .iter()
            .filter(|(_, pattern)| pattern.is_match(input))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[async_trait]
impl StrategyRefiner for CardMentionRefiner {
    async fn refine(
        &self,
        input: &str,
        mut analysis: StrategyAnalysis,
    ) -> Result<StrategyAnalysis> {
        for name in self.mentions(input) {
            log::debug!("Card mentioned in strategy: {name}");
            analysis.add_must_include(name);
        }
        Ok(analysis)
    }
}
