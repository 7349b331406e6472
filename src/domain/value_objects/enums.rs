//! # Domain Enums
//!
//! Closed enumerations shared by every signal producer and the fusion engine:
//!
//! - [`RiskType`] - risk domain a signal speaks for
//! - [`RiskLevel`] - ordered categorical level derived from a 0-100 score
//! - [`FusionMethod`] - how a composite score was produced
//!
//! All enums implement `Display`, `FromStr` and Serde traits.

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk domain of a signal.
///
/// `Market` and `Liquidity` are reserved; no producer emits them yet but
/// fusion weights may be configured for them.
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::value_objects::enums::RiskType;
///
/// assert_eq!(RiskType::Systemic.to_string(), "systemic");
/// assert_eq!("CREDIT".parse::<RiskType>().unwrap(), RiskType::Credit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RiskType {
    /// Probability of default from financial statements.
    Credit = 0,
    /// Market price risk (reserved).
    Market = 1,
    /// Exposure through the transaction network.
    Systemic = 2,
    /// News-driven sentiment risk.
    Sentiment = 3,
    /// Funding liquidity risk (reserved).
    Liquidity = 4,
}

impl RiskType {
    /// All variants in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Credit,
        Self::Market,
        Self::Systemic,
        Self::Sentiment,
        Self::Liquidity,
    ];

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Market => "market",
            Self::Systemic => "systemic",
            Self::Sentiment => "sentiment",
            Self::Liquidity => "liquidity",
        }
    }

    /// Returns true for domains no producer emits yet.
    #[inline]
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Market | Self::Liquidity)
    }
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "market" => Ok(Self::Market),
            "systemic" => Ok(Self::Systemic),
            "sentiment" => Ok(Self::Sentiment),
            "liquidity" => Ok(Self::Liquidity),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "RiskType",
                value: s.to_string(),
            }),
        }
    }
}

/// Categorical risk level.
///
/// Ordered `Low < Medium < High < Critical`; derived from a numeric score by
/// [`RiskThresholds`](crate::domain::value_objects::thresholds::RiskThresholds).
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::value_objects::enums::RiskLevel;
///
/// assert!(RiskLevel::High > RiskLevel::Medium);
/// assert_eq!(RiskLevel::Critical.to_string(), "Critical");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum RiskLevel {
    /// Below the `low` threshold.
    #[default]
    Low = 0,
    /// Below the `medium` threshold.
    Medium = 1,
    /// Below the `high` threshold.
    High = 2,
    /// At or above the `high` threshold.
    Critical = 3,
}

impl RiskLevel {
    /// Returns the display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Returns true for `High` and `Critical`.
    #[inline]
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "RiskLevel",
                value: s.to_string(),
            }),
        }
    }
}

/// Strategy that produced a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    /// Learned classifier probability of the high-risk class.
    MetaModel,
    /// Static weighted average over present domains.
    StaticWeights,
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetaModel => write!(f, "meta_model"),
            Self::StaticWeights => write!(f, "static_weights"),
        }
    }
}
