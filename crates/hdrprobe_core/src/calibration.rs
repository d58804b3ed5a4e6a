//! Two-step calibration workflow.
//!
//! The operator arms calibration, picks a pixel, and is then asked for the
//! known luminance of that pixel. The answer arrives asynchronously from
//! whatever modal input the front end uses. Calibration is single-shot: the
//! workflow returns to [`CalibrationState::Idle`] as soon as the answer is
//! resolved, whether it was accepted, rejected or cancelled.

use crate::error::{ProbeError, Result};
use crate::geometry::SourceCoordinates;

/// Workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    /// Pointer input goes to probing.
    #[default]
    Idle,
    /// The next pointer-down selects the calibration pixel.
    Armed,
    /// A pixel was selected; waiting for the operator's reference value.
    AwaitingReferenceValue { target: SourceCoordinates },
}

/// Operator answer to the reference-value prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceInput {
    /// Raw text as typed
    Entered(String),
    /// Prompt dismissed
    Cancelled,
}

/// A validated calibration ready to send to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRequest {
    pub target: SourceCoordinates,
    /// Known luminance of `target` in cd/m²
    pub known_value: f64,
}

/// Parse an operator-supplied reference luminance.
///
/// Surrounding whitespace is ignored; the rest must be a finite number
/// greater than zero.
pub fn parse_reference_value(input: &str) -> Result<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ProbeError::invalid_reference_value(input))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ProbeError::invalid_reference_value(input));
    }
    Ok(value)
}

/// The calibration state machine.
#[derive(Debug, Clone, Default)]
pub struct CalibrationWorkflow {
    state: CalibrationState,
}

impl CalibrationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == CalibrationState::Armed
    }

    pub fn is_awaiting_value(&self) -> bool {
        matches!(self.state, CalibrationState::AwaitingReferenceValue { .. })
    }

    /// Arm calibration so the next pointer-down selects a pixel.
    ///
    /// No-op without a session or while a reference value is pending.
    /// Returns whether the workflow is armed afterwards.
    pub fn arm(&mut self, has_session: bool) -> bool {
        if !has_session {
            return false;
        }
        match self.state {
            CalibrationState::Idle | CalibrationState::Armed => {
                self.state = CalibrationState::Armed;
                true
            }
            CalibrationState::AwaitingReferenceValue { .. } => false,
        }
    }

    /// Consume the armed selection. Returns false if not armed.
    pub fn select_pixel(&mut self, target: SourceCoordinates) -> bool {
        if self.state != CalibrationState::Armed {
            return false;
        }
        self.state = CalibrationState::AwaitingReferenceValue { target };
        true
    }

    /// Resolve the pending prompt and return to idle.
    ///
    /// - `Ok(Some(_))`: valid value, send it to the backend
    /// - `Ok(None)`: cancelled, or nothing was pending
    /// - `Err(InvalidReferenceValue)`: rejected without contacting the backend
    pub fn resolve(&mut self, input: ReferenceInput) -> Result<Option<CalibrationRequest>> {
        let CalibrationState::AwaitingReferenceValue { target } = self.state else {
            return Ok(None);
        };
        self.state = CalibrationState::Idle;

        match input {
            ReferenceInput::Cancelled => Ok(None),
            ReferenceInput::Entered(text) => {
                let known_value = parse_reference_value(&text)?;
                Ok(Some(CalibrationRequest {
                    target,
                    known_value,
                }))
            }
        }
    }

    /// Abandon any calibration in progress.
    pub fn reset(&mut self) {
        self.state = CalibrationState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting(target: SourceCoordinates) -> CalibrationWorkflow {
        let mut workflow = CalibrationWorkflow::new();
        assert!(workflow.arm(true));
        assert!(workflow.select_pixel(target));
        workflow
    }

    #[test]
    fn test_arm_requires_session() {
        let mut workflow = CalibrationWorkflow::new();
        assert!(!workflow.arm(false));
        assert_eq!(workflow.state(), CalibrationState::Idle);

        assert!(workflow.arm(true));
        assert!(workflow.is_armed());
    }

    #[test]
    fn test_select_requires_armed() {
        let mut workflow = CalibrationWorkflow::new();
        assert!(!workflow.select_pixel(SourceCoordinates::new(1, 1)));
        assert_eq!(workflow.state(), CalibrationState::Idle);
    }

    #[test]
    fn test_selection_moves_to_awaiting_value() {
        let target = SourceCoordinates::new(12, 34);
        let workflow = awaiting(target);
        assert_eq!(
            workflow.state(),
            CalibrationState::AwaitingReferenceValue { target }
        );
    }

    #[test]
    fn test_cannot_rearm_while_awaiting() {
        let mut workflow = awaiting(SourceCoordinates::new(1, 2));
        assert!(!workflow.arm(true));
        assert!(workflow.is_awaiting_value());
    }

    #[test]
    fn test_valid_value_yields_request() {
        let target = SourceCoordinates::new(12, 34);
        let mut workflow = awaiting(target);

        let request = workflow
            .resolve(ReferenceInput::Entered(" 250.5 ".to_string()))
            .unwrap();
        assert_eq!(
            request,
            Some(CalibrationRequest {
                target,
                known_value: 250.5
            })
        );
        assert_eq!(workflow.state(), CalibrationState::Idle);
    }

    #[test]
    fn test_cancel_returns_to_idle_without_request() {
        let mut workflow = awaiting(SourceCoordinates::new(1, 2));
        assert_eq!(workflow.resolve(ReferenceInput::Cancelled), Ok(None));
        assert_eq!(workflow.state(), CalibrationState::Idle);
    }

    #[test]
    fn test_invalid_values_are_rejected_and_single_shot() {
        for input in ["-5", "abc", "0", "", "NaN", "inf", "12abc"] {
            let mut workflow = awaiting(SourceCoordinates::new(1, 2));
            let result = workflow.resolve(ReferenceInput::Entered(input.to_string()));
            assert!(
                matches!(result, Err(ProbeError::InvalidReferenceValue { .. })),
                "{input:?} should be rejected"
            );
            assert_eq!(workflow.state(), CalibrationState::Idle);
        }
    }

    #[test]
    fn test_resolve_without_pending_prompt_is_noop() {
        let mut workflow = CalibrationWorkflow::new();
        workflow.arm(true);
        assert_eq!(
            workflow.resolve(ReferenceInput::Entered("10".to_string())),
            Ok(None)
        );
        assert!(workflow.is_armed());
    }

    #[test]
    fn test_parse_reference_value() {
        assert_eq!(parse_reference_value("100"), Ok(100.0));
        assert_eq!(parse_reference_value("1e3"), Ok(1000.0));
        assert!(parse_reference_value("-0.1").is_err());
    }
}
