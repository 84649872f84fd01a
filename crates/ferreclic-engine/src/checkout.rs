//! # Checkout Stage Machine
//!
//! The two-phase checkout flow as an explicit finite-state machine.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Stage Machine                              │
//! │                                                                         │
//! │                 begin_review          finalize                          │
//! │  ┌──────────┐  (cart ≥ 1 line)  ┌───────────┐      ┌───────────┐       │
//! │  │ Browsing │ ────────────────► │ Reviewing │ ───► │ Finalized │       │
//! │  └──────────┘                   └───────────┘      └───────────┘       │
//! │       ▲                              │                   │             │
//! │       │            abort             │                   │ reset       │
//! │       ◄──────────────────────────────┘                   │ (record     │
//! │       ▲                                                  │  handed     │
//! │       └──────────────────────────────────────────────────┘  off)       │
//! │                                                                         │
//! │  Reviewing is read-only: every cart mutation is rejected until the     │
//! │  operator aborts back to Browsing or confirms.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The original prototype drove this flow with a `showCheckout` boolean;
//! the explicit machine makes transitions such as "confirm while
//! browsing" unrepresentable instead of merely unlikely.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Checkout Stage
// =============================================================================

/// Where the session is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    /// Default state: the operator is building the cart.
    Browsing,
    /// Read-only review of lines and total before confirmation.
    Reviewing,
    /// A record has been built; transient until the session resets.
    Finalized,
}

impl Default for CheckoutStage {
    fn default() -> Self {
        CheckoutStage::Browsing
    }
}

// =============================================================================
// Stage Machine
// =============================================================================

/// Guards the checkout transitions. Pure: cart-emptiness and payment
/// rules live in the session, which composes them with this machine.
#[derive(Debug, Clone, Default)]
pub struct StageMachine {
    stage: CheckoutStage,
}

impl StageMachine {
    /// Creates a machine in the Browsing stage.
    pub fn new() -> Self {
        StageMachine {
            stage: CheckoutStage::Browsing,
        }
    }

    /// Current stage.
    #[inline]
    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// Whether a review is in progress.
    #[inline]
    pub fn is_reviewing(&self) -> bool {
        self.stage == CheckoutStage::Reviewing
    }

    /// Browsing → Reviewing.
    pub fn begin_review(&mut self) -> EngineResult<()> {
        match self.stage {
            CheckoutStage::Browsing => {
                self.stage = CheckoutStage::Reviewing;
                Ok(())
            }
            stage => Err(EngineError::InvalidStage {
                action: "begin review",
                stage,
            }),
        }
    }

    /// Reviewing → Browsing. Always safe: nothing has mutated yet.
    pub fn abort(&mut self) -> EngineResult<()> {
        match self.stage {
            CheckoutStage::Reviewing => {
                self.stage = CheckoutStage::Browsing;
                Ok(())
            }
            stage => Err(EngineError::InvalidStage {
                action: "abort review",
                stage,
            }),
        }
    }

    /// Reviewing → Finalized. Invoked exactly once per review session;
    /// a second confirm finds the machine back in Browsing and fails.
    pub fn finalize(&mut self) -> EngineResult<()> {
        match self.stage {
            CheckoutStage::Reviewing => {
                self.stage = CheckoutStage::Finalized;
                Ok(())
            }
            stage => Err(EngineError::InvalidStage {
                action: "confirm",
                stage,
            }),
        }
    }

    /// Finalized → Browsing, once the record has been handed off.
    pub fn reset(&mut self) {
        self.stage = CheckoutStage::Browsing;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut machine = StageMachine::new();
        assert_eq!(machine.stage(), CheckoutStage::Browsing);

        machine.begin_review().unwrap();
        assert!(machine.is_reviewing());

        machine.finalize().unwrap();
        assert_eq!(machine.stage(), CheckoutStage::Finalized);

        machine.reset();
        assert_eq!(machine.stage(), CheckoutStage::Browsing);
    }

    #[test]
    fn test_abort_returns_to_browsing() {
        let mut machine = StageMachine::new();
        machine.begin_review().unwrap();
        machine.abort().unwrap();
        assert_eq!(machine.stage(), CheckoutStage::Browsing);
    }

    #[test]
    fn test_confirm_while_browsing_is_rejected() {
        let mut machine = StageMachine::new();
        let err = machine.finalize().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidStage {
                stage: CheckoutStage::Browsing,
                ..
            }
        ));
    }

    #[test]
    fn test_double_review_is_rejected() {
        let mut machine = StageMachine::new();
        machine.begin_review().unwrap();
        assert!(machine.begin_review().is_err());
    }

    #[test]
    fn test_abort_without_review_is_rejected() {
        let mut machine = StageMachine::new();
        assert!(machine.abort().is_err());
    }
}
