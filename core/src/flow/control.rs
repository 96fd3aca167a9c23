// storefront_core/src/flow/control.rs

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Stop the flow right here. Remaining handlers and steps are not run and
  /// the flow reports [`FlowOutcome::Halted`].
  Halt,
}

/// How a flow run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  Completed,
  Halted,
}
