use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

// Words of two or more characters, like a default count vectorizer.
// The pattern is a literal, so compiling it cannot fail.
#[allow(clippy::expect_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]{2,}").expect("token pattern is valid"));

/// Descriptions the bundled model is trained on before any user history.
pub(crate) const SEED_CORPUS: &[(&str, &str)] = &[
    ("pizza", "Food"),
    ("burger", "Food"),
    ("sandwich", "Food"),
    ("momos", "Food"),
    ("biryani", "Food"),
    ("uber ride", "Travel"),
    ("bus ticket", "Travel"),
    ("flight booking", "Travel"),
    ("train ticket", "Travel"),
    ("electricity bill", "Bills"),
    ("water bill", "Bills"),
    ("internet recharge", "Bills"),
    ("mobile recharge", "Bills"),
    ("shoes shopping", "Shopping"),
    ("clothes shopping", "Shopping"),
    ("amazon order", "Shopping"),
];

#[derive(Debug, Default)]
struct LabelStats {
    docs: usize,
    words: usize,
    counts: HashMap<String, usize>,
}

/// Multinomial Naive Bayes over a bag of lowercase word tokens,
/// with add-one smoothing.
#[derive(Debug, Default)]
pub(crate) struct NaiveBayes {
    // BTreeMap so equal scores resolve to the alphabetically first label.
    labels: BTreeMap<String, LabelStats>,
    vocabulary: HashSet<String>,
    total_docs: usize,
}

impl NaiveBayes {
    /// A model trained on [`SEED_CORPUS`].
    pub(crate) fn seeded() -> Self {
        let mut model = Self::default();
        model.train(SEED_CORPUS.iter().copied());
        model
    }

    pub(crate) fn tokenize(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Add labelled descriptions. Blank labels and token-less descriptions are skipped.
    pub(crate) fn train<'a, I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (text, label) in samples {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let tokens = Self::tokenize(text);
            if tokens.is_empty() {
                continue;
            }
            let stats = self.labels.entry(label.to_string()).or_default();
            stats.docs += 1;
            stats.words += tokens.len();
            for token in tokens {
                *stats.counts.entry(token.clone()).or_insert(0) += 1;
                self.vocabulary.insert(token);
            }
            self.total_docs += 1;
        }
    }

    #[cfg(test)]
    pub(crate) fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Most likely label, or `None` when no token of `text` was seen in training.
    pub(crate) fn predict(&self, text: &str) -> Option<&str> {
        let tokens: Vec<String> = Self::tokenize(text)
            .into_iter()
            .filter(|t| self.vocabulary.contains(t))
            .collect();
        if tokens.is_empty() || self.total_docs == 0 {
            return None;
        }

        let vocab_size = self.vocabulary.len() as f64;
        let mut best: Option<(&str, f64)> = None;
        for (label, stats) in &self.labels {
            let prior = (stats.docs as f64 / self.total_docs as f64).ln();
            let denom = stats.words as f64 + vocab_size;
            let likelihood: f64 = tokens
                .iter()
                .map(|t| {
                    let count = stats.counts.get(t).copied().unwrap_or(0) as f64;
                    ((count + 1.0) / denom).ln()
                })
                .sum();
            let score = prior + likelihood;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((label.as_str(), score));
            }
        }
        best.map(|(label, _)| label)
    }
}
