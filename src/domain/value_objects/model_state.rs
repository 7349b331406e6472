//! # Meta-Model State
//!
//! Lifecycle of the fusion engine's learned classifier.
//!
//! # State Machine
//!
//! ```text
//! Unconfigured            (static weights for the whole process)
//! Available → Disabled    (one-way, after a failed prediction)
//! ```
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::domain::value_objects::model_state::ModelState;
//! use sentinel_risk::domain::value_objects::FusionMethod;
//!
//! let state = ModelState::Available;
//! assert!(state.can_transition_to(ModelState::Disabled));
//! assert!(!ModelState::Disabled.can_transition_to(ModelState::Available));
//! assert_eq!(ModelState::Disabled.fusion_method(), FusionMethod::StaticWeights);
//! ```

use crate::domain::value_objects::enums::FusionMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the learned fusion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ModelState {
    /// No classifier was configured or it failed to load.
    #[default]
    Unconfigured = 0,

    /// Classifier loaded and used for every fusion.
    Available = 1,

    /// Classifier failed at prediction time and is retired (terminal).
    Disabled = 2,
}

impl ModelState {
    /// Returns true if this state can transition to the target state.
    ///
    /// The only legal transition is `Available → Disabled`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Available, Self::Disabled))
    }

    /// Returns true if no further transition is possible.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Available)
    }

    /// Returns the fusion method this state implies.
    #[inline]
    #[must_use]
    pub const fn fusion_method(&self) -> FusionMethod {
        match self {
            Self::Available => FusionMethod::MetaModel,
            Self::Unconfigured | Self::Disabled => FusionMethod::StaticWeights,
        }
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unconfigured => "UNCONFIGURED",
            Self::Available => "AVAILABLE",
            Self::Disabled => "DISABLED",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle of the systemic risk engine.
///
/// ```text
/// Uninitialized → Ingesting → Ready
///                     ↓
///               Uninitialized   (ingest failed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionState {
    /// No dataset has been ingested.
    #[default]
    Uninitialized,
    /// Graph build and bulk metric computation in progress.
    Ingesting,
    /// Metrics computed; per-entity analysis allowed.
    Ready,
}

impl IngestionState {
    /// Returns true if this state can transition to the target state.
    ///
    /// `Ready → Ingesting` replaces the dataset with a new version.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Uninitialized, Self::Ingesting)
                | (Self::Ingesting, Self::Ready)
                | (Self::Ingesting, Self::Uninitialized)
                | (Self::Ready, Self::Ingesting)
        )
    }

    /// Returns true once analysis is allowed.
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for IngestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Ingesting => "INGESTING",
            Self::Ready => "READY",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod model_state {
        use super::*;

        const ALL: [ModelState; 3] = [
            ModelState::Unconfigured,
            ModelState::Available,
            ModelState::Disabled,
        ];

        #[test]
        fn only_available_to_disabled() {
            for from in ALL {
                for to in ALL {
                    let expected = from == ModelState::Available && to == ModelState::Disabled;
                    assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
                }
            }
        }

        #[test]
        fn terminal_states() {
            assert!(ModelState::Unconfigured.is_terminal());
            assert!(!ModelState::Available.is_terminal());
            assert!(ModelState::Disabled.is_terminal());
        }

        #[test]
        fn fusion_method_mapping() {
            assert_eq!(ModelState::Available.fusion_method(), FusionMethod::MetaModel);
            assert_eq!(
                ModelState::Unconfigured.fusion_method(),
                FusionMethod::StaticWeights
            );
        }

        #[test]
        fn serde_roundtrip() {
            for state in ALL {
                let json = serde_json::to_string(&state).unwrap();
                let back: ModelState = serde_json::from_str(&json).unwrap();
                assert_eq!(state, back);
            }
        }
    }

    mod ingestion_state {
        use super::*;

        #[test]
        fn happy_path() {
            assert!(IngestionState::Uninitialized.can_transition_to(IngestionState::Ingesting));
            assert!(IngestionState::Ingesting.can_transition_to(IngestionState::Ready));
        }

        #[test]
        fn cannot_skip_ingesting() {
            assert!(!IngestionState::Uninitialized.can_transition_to(IngestionState::Ready));
        }

        #[test]
        fn reingest_from_ready() {
            assert!(IngestionState::Ready.can_transition_to(IngestionState::Ingesting));
        }

        #[test]
        fn display() {
            assert_eq!(IngestionState::Ready.to_string(), "READY");
            assert!(!IngestionState::default().is_ready());
        }
    }
}
