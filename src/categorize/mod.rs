mod model;
mod remote;

use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::models::{CoreCategory, Expense};

pub(crate) use model::NaiveBayes;
pub(crate) use remote::RemoteSuggester;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuggestionSource {
    Remote,
    Local,
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Suggestion {
    pub(crate) category: String,
    pub(crate) source: SuggestionSource,
}

pub(crate) trait CategorySuggester {
    fn suggest(&self, description: &str, amount: Decimal) -> Result<Suggestion>;
}

/// Local classifier. Descriptions it knows nothing about become `Other`.
pub(crate) struct LocalSuggester {
    model: NaiveBayes,
}

impl LocalSuggester {
    pub(crate) fn new(model: NaiveBayes) -> Self {
        Self { model }
    }

    /// Seed model plus every categorized expense the user has recorded.
    pub(crate) fn from_history(expenses: &[Expense]) -> Self {
        let mut model = NaiveBayes::seeded();
        model.train(
            expenses
                .iter()
                .filter(|e| e.is_categorized())
                .map(|e| (e.description.as_str(), e.category.as_str())),
        );
        Self { model }
    }
}

impl CategorySuggester for LocalSuggester {
    fn suggest(&self, description: &str, _amount: Decimal) -> Result<Suggestion> {
        let category = self
            .model
            .predict(description)
            .unwrap_or(CoreCategory::Other.as_str())
            .to_string();
        Ok(Suggestion {
            category,
            source: SuggestionSource::Local,
        })
    }
}

impl CategorySuggester for RemoteSuggester {
    fn suggest(&self, description: &str, amount: Decimal) -> Result<Suggestion> {
        Ok(Suggestion {
            category: self.predict(description, amount)?,
            source: SuggestionSource::Remote,
        })
    }
}

/// Asks the primary suggester first and falls back to the local model on failure.
pub(crate) struct FallbackSuggester {
    primary: Option<Box<dyn CategorySuggester>>,
    local: LocalSuggester,
}

impl FallbackSuggester {
    pub(crate) fn new(primary: Option<Box<dyn CategorySuggester>>, local: LocalSuggester) -> Self {
        Self { primary, local }
    }

    /// Remote service from config (if any) backed by a history-trained local model.
    pub(crate) fn from_config(config: &Config, history: &[Expense]) -> Self {
        let primary = config.predict_endpoint.as_deref().and_then(|endpoint| {
            let timeout = Duration::from_secs(config.predict_timeout_secs);
            match RemoteSuggester::new(endpoint, timeout) {
                Ok(remote) => {
                    tracing::debug!(endpoint = remote.endpoint(), "using remote category suggestions");
                    Some(Box::new(remote) as Box<dyn CategorySuggester>)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "remote suggester unavailable");
                    None
                }
            }
        });
        Self::new(primary, LocalSuggester::from_history(history))
    }

    /// Rebuild the local model after the expense history changed.
    pub(crate) fn retrain(&mut self, history: &[Expense]) {
        self.local = LocalSuggester::from_history(history);
    }

    pub(crate) fn has_remote(&self) -> bool {
        self.primary.is_some()
    }
}

impl CategorySuggester for FallbackSuggester {
    fn suggest(&self, description: &str, amount: Decimal) -> Result<Suggestion> {
        if description.trim().is_empty() {
            anyhow::bail!("Description is required for a category suggestion");
        }
        if let Some(primary) = &self.primary {
            match primary.suggest(description, amount) {
                Ok(s) => return Ok(s),
                Err(e) => {
                    tracing::warn!(error = %e, "category suggestion failed, using local model");
                }
            }
        }
        self.local.suggest(description, amount)
    }
}

#[cfg(test)]
mod tests;
