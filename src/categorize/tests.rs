#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn make_expense(description: &str, category: &str) -> Expense {
    Expense {
        id: None,
        amount: dec!(10.00),
        description: description.into(),
        date: "2024-01-15".into(),
        category: category.into(),
        created_at: String::new(),
    }
}

struct FixedSuggester(&'static str);

impl CategorySuggester for FixedSuggester {
    fn suggest(&self, _description: &str, _amount: Decimal) -> Result<Suggestion> {
        Ok(Suggestion {
            category: self.0.to_string(),
            source: SuggestionSource::Remote,
        })
    }
}

struct FailingSuggester;

impl CategorySuggester for FailingSuggester {
    fn suggest(&self, _description: &str, _amount: Decimal) -> Result<Suggestion> {
        anyhow::bail!("connection refused")
    }
}

// ── NaiveBayes ────────────────────────────────────────────────

#[test]
fn test_tokenize_lowercases_and_drops_short_words() {
    assert_eq!(
        NaiveBayes::tokenize("Uber-Ride #42 to A"),
        vec!["uber", "ride", "42", "to"]
    );
    assert!(NaiveBayes::tokenize("").is_empty());
}

#[test]
fn test_seeded_model_labels() {
    assert_eq!(NaiveBayes::seeded().label_count(), 4);
}

#[test]
fn test_seeded_model_predictions() {
    let model = NaiveBayes::seeded();
    assert_eq!(model.predict("pizza from dominos"), Some("Food"));
    assert_eq!(model.predict("Uber ride to airport"), Some("Travel"));
    assert_eq!(model.predict("Electricity bill for June"), Some("Bills"));
    assert_eq!(model.predict("MOBILE RECHARGE"), Some("Bills"));
    assert_eq!(model.predict("clothes shopping spree"), Some("Shopping"));
}

#[test]
fn test_unknown_words_give_no_prediction() {
    let model = NaiveBayes::seeded();
    assert_eq!(model.predict("xyzzy plugh"), None);
    assert_eq!(model.predict(""), None);
}

#[test]
fn test_empty_model_predicts_nothing() {
    assert_eq!(NaiveBayes::default().predict("pizza"), None);
}

#[test]
fn test_training_skips_blank_labels() {
    let mut model = NaiveBayes::default();
    model.train([("pizza", ""), ("  ", "Food")]);
    assert_eq!(model.label_count(), 0);
}

#[test]
fn test_training_on_history_learns_new_label() {
    let mut model = NaiveBayes::seeded();
    model.train([
        ("netflix subscription", "Entertainment"),
        ("netflix subscription", "Entertainment"),
        ("netflix subscription", "Entertainment"),
    ]);
    assert_eq!(model.predict("Netflix"), Some("Entertainment"));
    assert_eq!(model.predict("pizza"), Some("Food"));
}

// ── Suggesters ────────────────────────────────────────────────

#[test]
fn test_local_suggester_defaults_to_other() {
    let local = LocalSuggester::new(NaiveBayes::seeded());
    let s = local.suggest("quarterly dues", dec!(10)).unwrap();
    assert_eq!(s.category, "Other");
    assert_eq!(s.source, SuggestionSource::Local);
}

#[test]
fn test_local_suggester_from_history() {
    let history = vec![
        make_expense("gym membership", "Health"),
        make_expense("gym membership", "Health"),
        make_expense("gym membership", "Health"),
        make_expense("uncategorized gym thing", ""),
    ];
    let local = LocalSuggester::from_history(&history);
    assert_eq!(local.suggest("Gym", dec!(50)).unwrap().category, "Health");
}

#[test]
fn test_fallback_prefers_primary() {
    let suggester = FallbackSuggester::new(
        Some(Box::new(FixedSuggester("Travel"))),
        LocalSuggester::new(NaiveBayes::seeded()),
    );
    assert!(suggester.has_remote());
    let s = suggester.suggest("pizza", dec!(10)).unwrap();
    assert_eq!(s.category, "Travel");
    assert_eq!(s.source, SuggestionSource::Remote);
}

#[test]
fn test_fallback_uses_local_when_primary_fails() {
    let suggester = FallbackSuggester::new(
        Some(Box::new(FailingSuggester)),
        LocalSuggester::new(NaiveBayes::seeded()),
    );
    let s = suggester.suggest("burger", dec!(10)).unwrap();
    assert_eq!(s.category, "Food");
    assert_eq!(s.source, SuggestionSource::Local);
}

#[test]
fn test_fallback_without_primary() {
    let suggester = FallbackSuggester::new(None, LocalSuggester::new(NaiveBayes::seeded()));
    assert!(!suggester.has_remote());
    assert_eq!(
        suggester.suggest("bus ticket", dec!(2)).unwrap().category,
        "Travel"
    );
}

#[test]
fn test_blank_description_rejected() {
    let suggester = FallbackSuggester::new(
        Some(Box::new(FixedSuggester("Food"))),
        LocalSuggester::new(NaiveBayes::seeded()),
    );
    assert!(suggester.suggest("   ", dec!(10)).is_err());
}

#[test]
fn test_from_config_without_endpoint_is_local_only() {
    let config = Config::default();
    let suggester = FallbackSuggester::from_config(&config, &[]);
    assert!(!suggester.has_remote());
}

#[test]
fn test_from_config_with_endpoint() {
    let config = Config {
        predict_endpoint: Some("http://127.0.0.1:5000/predict".into()),
        ..Config::default()
    };
    let suggester = FallbackSuggester::from_config(&config, &[]);
    assert!(suggester.has_remote());
}

// ── Remote response parsing ───────────────────────────────────

#[test]
fn test_parse_prediction() {
    let body = r#"{"description": "pizza from dominos", "category": "Food"}"#;
    assert_eq!(remote::parse_prediction(body).unwrap(), "Food");
}

#[test]
fn test_parse_prediction_trims() {
    assert_eq!(
        remote::parse_prediction(r#"{"category": "  Bills "}"#).unwrap(),
        "Bills"
    );
}

#[test]
fn test_parse_prediction_errors() {
    assert!(remote::parse_prediction(r#"{"error": "description field is required"}"#).is_err());
    assert!(remote::parse_prediction(r#"{"category": ""}"#).is_err());
    assert!(remote::parse_prediction(r#"{}"#).is_err());
    assert!(remote::parse_prediction("not json").is_err());
}

#[test]
fn test_unreachable_remote_is_an_error() {
    let remote = RemoteSuggester::new(
        "http://127.0.0.1:9/predict",
        std::time::Duration::from_millis(200),
    )
    .unwrap();
    assert!(remote.suggest("pizza", dec!(10)).is_err());
}

#[test]
fn test_retrain_picks_up_new_history() {
    let mut suggester = FallbackSuggester::new(None, LocalSuggester::new(NaiveBayes::seeded()));
    assert_eq!(suggester.suggest("yoga class", dec!(5)).unwrap().category, "Other");
    let history = vec![
        make_expense("yoga class", "Health"),
        make_expense("yoga class", "Health"),
        make_expense("yoga class", "Health"),
    ];
    suggester.retrain(&history);
    assert_eq!(suggester.suggest("yoga class", dec!(5)).unwrap().category, "Health");
}
