//! # Sentiment Risk Engine
//!
//! News-driven risk signals.
//!
//! Headlines for an entity go through an external [`SentimentAnalyzer`]; the
//! mean negative probability becomes the base score and a [`StressOverlay`]
//! adds a fixed penalty for every panic keyword found in a headline.
//!
//! ```text
//! headlines ─▶ analyzer ─▶ negative * 100 ─▶ + penalty per keyword hit ─▶ min(100)
//! ```
//!
//! An entity with no headlines gets a neutral signal (score 0, confidence 0).
//! Fusion ignores confidence, so the neutral signal still carries the full
//! sentiment weight and pulls the composite towards 0.
//!
//! # Model lifecycle
//!
//! The analyzer is expensive to build and read-only once built. It lives in a
//! [`SentimentModelSlot`] shared by every engine that needs it: `init` loads
//! eagerly, `get` loads on first use, `teardown` drops it.

use crate::application::error::{ApplicationResult, ClassifierError};
use crate::application::services::signal_producer::RiskSignalProducer;
use crate::domain::entities::{NewsIndex, RiskSignal};
use crate::domain::value_objects::score::{SCORE_MAX, round2};
use crate::domain::value_objects::{EntityId, RiskType};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Default penalty per keyword hit.
pub const DEFAULT_KEYWORD_PENALTY: f64 = 20.0;

/// Default confidence of sentiment signals.
pub const DEFAULT_SENTIMENT_CONFIDENCE: f64 = 0.9;

/// Characters of the first headline kept in signal metadata.
const TOP_HEADLINE_CHARS: usize = 100;

/// Default panic keywords.
pub const DEFAULT_PANIC_KEYWORDS: [&str; 9] = [
    "fraud",
    "investigation",
    "bankruptcy",
    "insolvency",
    "default",
    "sanctions",
    "embezzlement",
    "raid",
    "jail",
];

/// Mean class probabilities over a set of headlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    /// Positive probability.
    pub positive: f64,
    /// Negative probability.
    pub negative: f64,
    /// Neutral probability.
    pub neutral: f64,
}

impl SentimentScores {
    /// Fully neutral scores.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

/// External sentiment model.
pub trait SentimentAnalyzer: Send + Sync + fmt::Debug {
    /// Returns mean class probabilities over `headlines`.
    ///
    /// # Errors
    ///
    /// Returns a `ClassifierError` if inference fails.
    fn predict(&self, headlines: &[String]) -> Result<SentimentScores, ClassifierError>;

    /// Returns the model name for logs.
    fn name(&self) -> &str;
}

type AnalyzerFactory =
    Box<dyn Fn() -> Result<Arc<dyn SentimentAnalyzer>, ClassifierError> + Send + Sync>;

/// Lazily initialized, read-only analyzer handle.
pub struct SentimentModelSlot {
    factory: AnalyzerFactory,
    model: RwLock<Option<Arc<dyn SentimentAnalyzer>>>,
}

impl SentimentModelSlot {
    /// Creates an empty slot that builds its analyzer with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SentimentAnalyzer>, ClassifierError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            model: RwLock::new(None),
        }
    }

    /// Creates a slot around an analyzer that is already built.
    #[must_use]
    pub fn preloaded(model: Arc<dyn SentimentAnalyzer>) -> Self {
        let handle = Arc::clone(&model);
        Self {
            factory: Box::new(move || Ok(Arc::clone(&handle))),
            model: RwLock::new(Some(model)),
        }
    }

    /// Builds the analyzer now if it is not loaded yet.
    ///
    /// # Errors
    ///
    /// Returns the factory error; the slot stays empty.
    pub fn init(&self) -> Result<Arc<dyn SentimentAnalyzer>, ClassifierError> {
        let mut slot = self.model.write();
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }
        let model = (self.factory)()?;
        info!(model = model.name(), "sentiment model initialized");
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Returns the analyzer, building it on first use.
    ///
    /// # Errors
    ///
    /// Same as [`SentimentModelSlot::init`].
    pub fn get(&self) -> Result<Arc<dyn SentimentAnalyzer>, ClassifierError> {
        if let Some(model) = self.model.read().as_ref() {
            return Ok(Arc::clone(model));
        }
        self.init()
    }

    /// Drops the analyzer. Returns true if one was loaded.
    pub fn teardown(&self) -> bool {
        let dropped = self.model.write().take().is_some();
        if dropped {
            info!("sentiment model released");
        }
        dropped
    }

    /// Returns true if the analyzer is loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.model.read().is_some()
    }
}

impl fmt::Debug for SentimentModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentModelSlot")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Keyword penalty applied on top of the model score.
#[derive(Debug, Clone, PartialEq)]
pub struct StressOverlay {
    keywords: Vec<String>,
    penalty: f64,
}

impl Default for StressOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_PANIC_KEYWORDS, DEFAULT_KEYWORD_PENALTY)
    }
}

impl StressOverlay {
    /// Creates an overlay. Keywords are matched case-insensitively.
    #[must_use]
    pub fn new<I, S>(keywords: I, penalty: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            penalty,
        }
    }

    /// Returns the keywords.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the penalty per hit.
    #[inline]
    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Adds the penalty for each keyword found in each headline, capped at 100.
    ///
    /// Returns the adjusted score and the distinct keywords that fired, in
    /// first-seen order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_risk::application::services::sentiment_engine::StressOverlay;
    ///
    /// let overlay = StressOverlay::default();
    /// let headlines = vec!["Fraud probe widens".to_string(), "CEO faces jail".to_string()];
    /// let (score, hits) = overlay.apply(30.0, &headlines);
    /// assert_eq!(score, 70.0);
    /// assert_eq!(hits, vec!["fraud", "jail"]);
    /// ```
    #[must_use]
    pub fn apply<'a>(&'a self, base: f64, headlines: &[String]) -> (f64, Vec<&'a str>) {
        let mut score = base;
        let mut hits: Vec<&str> = Vec::new();
        for headline in headlines {
            let text = headline.to_lowercase();
            for keyword in &self.keywords {
                if text.contains(keyword.as_str()) {
                    score += self.penalty;
                    if !hits.contains(&keyword.as_str()) {
                        hits.push(keyword);
                    }
                }
            }
        }
        (score.min(SCORE_MAX), hits)
    }
}

/// Sentiment engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentConfig {
    /// Keywords that add a penalty.
    pub panic_keywords: Vec<String>,
    /// Penalty per keyword hit.
    pub keyword_penalty: f64,
    /// Confidence attached to non-neutral signals.
    pub confidence: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            panic_keywords: DEFAULT_PANIC_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            keyword_penalty: DEFAULT_KEYWORD_PENALTY,
            confidence: DEFAULT_SENTIMENT_CONFIDENCE,
        }
    }
}

/// Sentiment risk producer.
#[derive(Debug)]
pub struct SentimentRiskEngine {
    slot: Arc<SentimentModelSlot>,
    news: NewsIndex,
    overlay: StressOverlay,
    confidence: f64,
}

impl SentimentRiskEngine {
    /// Creates an engine over a shared model slot and a news index.
    #[must_use]
    pub fn new(slot: Arc<SentimentModelSlot>, news: NewsIndex, config: &SentimentConfig) -> Self {
        Self {
            slot,
            news,
            overlay: StressOverlay::new(&config.panic_keywords, config.keyword_penalty),
            confidence: config.confidence,
        }
    }

    /// Returns the keyword overlay.
    #[must_use]
    pub fn overlay(&self) -> &StressOverlay {
        &self.overlay
    }

    fn neutral_signal(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
        debug!(entity_id = %entity_id, "no headlines, neutral sentiment");
        Ok(
            RiskSignal::new(entity_id.clone(), RiskType::Sentiment, 0.0, 0.0, 0.0)?
                .with_metadata("note", "No news data available"),
        )
    }
}

impl RiskSignalProducer for SentimentRiskEngine {
    fn risk_type(&self) -> RiskType {
        RiskType::Sentiment
    }

    fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
        let headlines = self.news.headlines(entity_id.as_str());
        let Some(first) = headlines.first() else {
            return self.neutral_signal(entity_id);
        };

        let model = self.slot.get()?;
        let scores = model.predict(headlines)?;
        let negative = scores.negative;
        if !negative.is_finite() || !(0.0..=1.0).contains(&negative) {
            return Err(ClassifierError::prediction(format!(
                "{} returned negative probability {negative}",
                model.name()
            ))
            .into());
        }

        let base = negative * 100.0;
        let (adjusted, hits) = self.overlay.apply(base, headlines);
        let score = round2(adjusted);

        let top_headline: String = first.chars().take(TOP_HEADLINE_CHARS).collect();
        let signal = RiskSignal::new(
            entity_id.clone(),
            RiskType::Sentiment,
            negative,
            score,
            self.confidence,
        )?
        .with_metadata("headline_count", headlines.len())
        .with_metadata("model_raw_negative", round2(base))
        .with_metadata("top_headline", format!("{top_headline}..."))
        .with_metadata("panic_keywords", hits);

        info!(
            entity_id = %entity_id,
            score,
            headlines = headlines.len(),
            "sentiment risk analyzed"
        );
        Ok(signal)
    }

    fn name(&self) -> &'static str {
        "SentimentRiskEngine"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::domain::entities::NewsHeadline;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedAnalyzer(f64);

    impl SentimentAnalyzer for FixedAnalyzer {
        fn predict(&self, _: &[String]) -> Result<SentimentScores, ClassifierError> {
            Ok(SentimentScores {
                positive: 0.0,
                negative: self.0,
                neutral: 1.0 - self.0,
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn news(rows: &[(&str, &str)]) -> NewsIndex {
        NewsIndex::from_rows(rows.iter().map(|(e, h)| NewsHeadline {
            entity_id: (*e).to_string(),
            headline: (*h).to_string(),
        }))
    }

    fn engine(negative: f64, index: NewsIndex) -> SentimentRiskEngine {
        let slot = Arc::new(SentimentModelSlot::preloaded(Arc::new(FixedAnalyzer(negative))));
        SentimentRiskEngine::new(slot, index, &SentimentConfig::default())
    }

    fn id(s: &str) -> EntityId {
        EntityId::new(s).unwrap()
    }

    mod overlay {
        use super::*;

        #[test]
        fn one_hit_per_keyword_per_headline() {
            let overlay = StressOverlay::default();
            let headlines = vec!["Fraud, more FRAUD".to_string()];
            let (score, hits) = overlay.apply(10.0, &headlines);
            assert_eq!(score, 30.0);
            assert_eq!(hits, vec!["fraud"]);
        }

        #[test]
        fn substring_matches_count() {
            let overlay = StressOverlay::default();
            let headlines = vec!["Issuer defaulted on notes".to_string()];
            let (score, _) = overlay.apply(0.0, &headlines);
            assert_eq!(score, 20.0);
        }

        #[test]
        fn capped_at_max() {
            let overlay = StressOverlay::default();
            let headlines = vec![
                "fraud investigation bankruptcy".to_string(),
                "insolvency default sanctions".to_string(),
            ];
            let (score, hits) = overlay.apply(50.0, &headlines);
            assert_eq!(score, 100.0);
            assert_eq!(hits.len(), 6);
        }

        #[test]
        fn custom_keywords_are_lowercased() {
            let overlay = StressOverlay::new(["  Recall "], 5.0);
            assert_eq!(overlay.keywords(), ["recall"]);
            let (score, _) = overlay.apply(1.0, &["product RECALL".to_string()]);
            assert_eq!(score, 6.0);
        }
    }

    mod slot {
        use super::*;

        #[test]
        fn lazy_init_runs_factory_once() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let slot = SentimentModelSlot::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(FixedAnalyzer(0.1)) as Arc<dyn SentimentAnalyzer>)
            });
            assert!(!slot.is_initialized());
            slot.get().unwrap();
            slot.get().unwrap();
            assert!(slot.is_initialized());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn teardown_then_get_reloads() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let slot = SentimentModelSlot::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(FixedAnalyzer(0.1)) as Arc<dyn SentimentAnalyzer>)
            });
            slot.init().unwrap();
            assert!(slot.teardown());
            assert!(!slot.teardown());
            slot.get().unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }

        #[test]
        fn factory_failure_leaves_slot_empty() {
            let slot = SentimentModelSlot::new(|| Err(ClassifierError::NotFound("weights".into())));
            assert!(slot.get().is_err());
            assert!(!slot.is_initialized());
        }
    }

    mod engine {
        use super::*;

        #[test]
        fn no_headlines_is_neutral() {
            let signal = engine(0.9, NewsIndex::empty()).analyze(&id("A")).unwrap();
            assert_eq!(signal.normalized_score(), 0.0);
            assert_eq!(signal.confidence(), 0.0);
            assert_eq!(signal.metadata()["note"], json!("No news data available"));
        }

        #[test]
        fn neutral_signal_still_weighs_in_fusion() {
            use crate::application::services::fusion_engine::{FusionConfig, RiskFusionEngine};
            use crate::domain::services::risk_scorer::RiskScorer;

            let neutral = engine(0.9, NewsIndex::empty()).analyze(&id("A")).unwrap();
            let credit = RiskSignal::new(id("A"), RiskType::Credit, 0.8, 80.0, 0.95).unwrap();
            let fusion =
                RiskFusionEngine::new(FusionConfig::default(), RiskScorer::default(), None).unwrap();

            let profile = fusion.aggregate(&id("A"), vec![credit, neutral]).unwrap();

            // 80 * 0.5 / (0.5 + 0.2)
            assert_eq!(profile.composite_risk_score(), 57.14);
        }

        #[test]
        fn no_headlines_does_not_load_model() {
            let slot = Arc::new(SentimentModelSlot::new(|| {
                Err(ClassifierError::NotFound("weights".into()))
            }));
            let engine = SentimentRiskEngine::new(
                Arc::clone(&slot),
                NewsIndex::empty(),
                &SentimentConfig::default(),
            );
            assert!(engine.analyze(&id("A")).is_ok());
            assert!(!slot.is_initialized());
        }

        #[test]
        fn negative_plus_overlay() {
            let index = news(&[("A", "Regulators open investigation"), ("A", "Quarterly update")]);
            let signal = engine(0.25, index).analyze(&id("A")).unwrap();
            assert_eq!(signal.raw_score(), 0.25);
            assert_eq!(signal.normalized_score(), 45.0);
            assert_eq!(signal.confidence(), 0.9);
            assert_eq!(signal.metadata()["headline_count"], json!(2));
            assert_eq!(signal.metadata()["model_raw_negative"], json!(25.0));
            assert_eq!(
                signal.metadata()["top_headline"],
                json!("Regulators open investigation...")
            );
            assert_eq!(signal.metadata()["panic_keywords"], json!(["investigation"]));
        }

        #[test]
        fn top_headline_is_truncated() {
            let long = "x".repeat(150);
            let index = news(&[("A", long.as_str())]);
            let signal = engine(0.1, index).analyze(&id("A")).unwrap();
            let top = signal.metadata()["top_headline"].as_str().unwrap();
            assert_eq!(top.len(), 103);
            assert!(top.ends_with("..."));
        }

        #[test]
        fn out_of_range_probability_is_model_error() {
            let index = news(&[("A", "anything")]);
            let err = engine(1.5, index).analyze(&id("A")).unwrap_err();
            assert!(matches!(err, ApplicationError::Model(ClassifierError::Prediction(_))));
        }

        #[test]
        fn model_load_failure_surfaces() {
            let slot = Arc::new(SentimentModelSlot::new(|| {
                Err(ClassifierError::NotFound("weights".into()))
            }));
            let engine = SentimentRiskEngine::new(
                slot,
                news(&[("A", "anything")]),
                &SentimentConfig::default(),
            );
            let err = engine.analyze(&id("A")).unwrap_err();
            assert!(matches!(err, ApplicationError::Model(ClassifierError::NotFound(_))));
        }
    }
}
