//! # Fusion Weights
//!
//! Per-domain weights for the static weighted-average fusion strategy.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::enums::RiskType;
use serde::{Deserialize, Serialize};

/// Default credit weight.
pub const DEFAULT_CREDIT_WEIGHT: f64 = 0.50;
/// Default systemic weight.
pub const DEFAULT_SYSTEMIC_WEIGHT: f64 = 0.30;
/// Default sentiment weight.
pub const DEFAULT_SENTIMENT_WEIGHT: f64 = 0.20;

/// Domain weight table.
///
/// Reserved domains (`market`, `liquidity`) take part in fusion only when a
/// weight is configured for them.
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::value_objects::fusion_weights::FusionWeights;
/// use sentinel_risk::domain::value_objects::RiskType;
///
/// let w = FusionWeights::default();
/// assert_eq!(w.weight_for(RiskType::Credit), Some(0.5));
/// assert_eq!(w.weight_for(RiskType::Market), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    /// Credit domain weight.
    #[serde(default = "default_credit")]
    pub credit: f64,
    /// Systemic domain weight.
    #[serde(default = "default_systemic")]
    pub systemic: f64,
    /// Sentiment domain weight.
    #[serde(default = "default_sentiment")]
    pub sentiment: f64,
    /// Market domain weight (reserved).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<f64>,
    /// Liquidity domain weight (reserved).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
}

fn default_credit() -> f64 {
    DEFAULT_CREDIT_WEIGHT
}

fn default_systemic() -> f64 {
    DEFAULT_SYSTEMIC_WEIGHT
}

fn default_sentiment() -> f64 {
    DEFAULT_SENTIMENT_WEIGHT
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            credit: DEFAULT_CREDIT_WEIGHT,
            systemic: DEFAULT_SYSTEMIC_WEIGHT,
            sentiment: DEFAULT_SENTIMENT_WEIGHT,
            market: None,
            liquidity: None,
        }
    }
}

impl FusionWeights {
    /// Creates a weight table for the three active domains.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeights` if the table fails validation.
    pub fn new(credit: f64, systemic: f64, sentiment: f64) -> DomainResult<Self> {
        let weights = Self {
            credit,
            systemic,
            sentiment,
            market: None,
            liquidity: None,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Sets a weight for any domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeights` if the resulting table fails
    /// validation.
    pub fn with_weight(mut self, risk_type: RiskType, weight: f64) -> DomainResult<Self> {
        match risk_type {
            RiskType::Credit => self.credit = weight,
            RiskType::Systemic => self.systemic = weight,
            RiskType::Sentiment => self.sentiment = weight,
            RiskType::Market => self.market = Some(weight),
            RiskType::Liquidity => self.liquidity = Some(weight),
        }
        self.validate()?;
        Ok(self)
    }

    /// Returns the configured weight for a domain.
    #[must_use]
    pub fn weight_for(&self, risk_type: RiskType) -> Option<f64> {
        match risk_type {
            RiskType::Credit => Some(self.credit),
            RiskType::Systemic => Some(self.systemic),
            RiskType::Sentiment => Some(self.sentiment),
            RiskType::Market => self.market,
            RiskType::Liquidity => self.liquidity,
        }
    }

    /// Iterates configured `(domain, weight)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskType, f64)> + '_ {
        RiskType::ALL
            .into_iter()
            .filter_map(|t| self.weight_for(t).map(|w| (t, w)))
    }

    /// Checks that every weight is finite and non-negative and at least one
    /// is positive.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeights` on violation.
    pub fn validate(&self) -> DomainResult<()> {
        for (risk_type, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DomainError::invalid_weights(format!(
                    "{risk_type} weight must be finite and non-negative, got {weight}"
                )));
            }
        }
        if !self.iter().any(|(_, w)| w > 0.0) {
            return Err(DomainError::invalid_weights("at least one weight must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_order_and_values() {
        let pairs: Vec<_> = FusionWeights::default().iter().collect();
        assert_eq!(
            pairs,
            vec![
                (RiskType::Credit, 0.5),
                (RiskType::Systemic, 0.3),
                (RiskType::Sentiment, 0.2)
            ]
        );
    }

    #[test]
    fn reserved_domain_opt_in() {
        let w = FusionWeights::default()
            .with_weight(RiskType::Liquidity, 0.1)
            .unwrap();
        assert_eq!(w.weight_for(RiskType::Liquidity), Some(0.1));
        assert_eq!(w.iter().count(), 4);
    }

    #[test]
    fn with_weight_rejects_negative() {
        let err = FusionWeights::default()
            .with_weight(RiskType::Liquidity, -0.4)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidWeights(_)));
    }

    #[test]
    fn with_weight_rejects_nan() {
        assert!(FusionWeights::default().with_weight(RiskType::Credit, f64::NAN).is_err());
    }

    #[test]
    fn rejects_negative() {
        assert!(FusionWeights::new(-0.1, 0.3, 0.2).is_err());
    }

    #[test]
    fn rejects_all_zero() {
        assert!(FusionWeights::new(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let w: FusionWeights = serde_json::from_str(r#"{"credit": 0.7}"#).unwrap();
        assert_eq!(w.credit, 0.7);
        assert_eq!(w.systemic, DEFAULT_SYSTEMIC_WEIGHT);
        assert_eq!(w.market, None);
    }
}
