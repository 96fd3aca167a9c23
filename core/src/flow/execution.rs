// storefront_core/src/flow/execution.rs

use super::context_data::ContextData;
use super::control::{FlowOutcome, StepControl};
use super::definition::{Flow, Phase};
use crate::error::FlowError;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// The first handler error is returned as-is. A required step without any
  /// handler fails with [`FlowError::HandlerMissing`] converted into `Err`.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(context = %std::any::type_name::<TData>(), steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    for step in &self.steps {
      let has_any = Phase::ORDER
        .iter()
        .any(|phase| !self.handlers_for(&step.name, *phase).is_empty());

      if !has_any {
        if step.optional {
          event!(Level::DEBUG, step = %step.name, "Optional step has no handlers, skipping.");
          continue;
        }
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      }

      let step_span = span!(Level::INFO, "flow_step", step = %step.name, optional = step.optional);
      let control = self.run_step(&step.name, ctx_data.clone()).instrument(step_span).await?;
      if control == StepControl::Halt {
        event!(Level::INFO, step = %step.name, "Flow halted by a handler.");
        return Ok(FlowOutcome::Halted);
      }
    }

    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step_name: &str, ctx_data: ContextData<TData>) -> Result<StepControl, Err> {
    for phase in Phase::ORDER {
      for handler in self.handlers_for(step_name, phase) {
        match handler(ctx_data.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Halt) => return Ok(StepControl::Halt),
          Err(e) => {
            event!(Level::WARN, phase = phase.label(), error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }
    Ok(StepControl::Continue)
  }
}
