//! State transition helpers for the payment orchestrator.
//!
//! Each transition mutates the task snapshot (state + status-message
//! metadata) and emits exactly one status event, in that order. Terminal
//! transitions emit final events.

use a2a_core::error::A2aError;
use a2a_core::executor::{EventQueue, RequestContext};
use a2a_core::types::{Task, TaskState, TaskStatusUpdateEvent};

use a2a_x402::error::StateError;
use a2a_x402::state::{PaymentState, record, set};

use crate::orchestrator::PaymentOrchestrator;

fn codec_err(err: StateError) -> A2aError {
    A2aError::Executor(err.to_string())
}

fn task_mut(ctx: &mut RequestContext) -> Result<&mut Task, A2aError> {
    ctx.task
        .as_mut()
        .ok_or_else(|| A2aError::Executor("no task in request context".to_owned()))
}

impl PaymentOrchestrator {
    /// Creates a freshly submitted task from the inbound message and
    /// emits the (non-final) `submitted` event.
    pub(crate) fn create_task(
        &self,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError> {
        let task = Task::submitted(&ctx.task_id, &ctx.context_id, ctx.message.clone());
        let event = TaskStatusUpdateEvent::new(&task, TaskState::Submitted, None);
        ctx.task = Some(task);
        queue.write(event)
    }

    /// Quote produced: task waits on the client for a signed payload.
    pub(crate) fn transition_to_payment_required(
        &self,
        ctx: &mut RequestContext,
        queue: &EventQueue,
        state: &PaymentState,
        original_prompt: &str,
    ) -> Result<(), A2aError> {
        let task = task_mut(ctx)?;
        task.status.state = TaskState::InputRequired;

        let requirements = state
            .requirements
            .as_ref()
            .ok_or_else(|| A2aError::Executor("payment-required without requirements".to_owned()))?;
        record::record_payment_required(task, requirements, "Payment required").map_err(codec_err)?;

        if !original_prompt.is_empty() {
            if let Some(msg) = task.status.message.as_mut() {
                set::set_original_prompt(msg, original_prompt);
            }
        }

        let event = TaskStatusUpdateEvent::new(task, TaskState::InputRequired, task.status.message.clone())
            .finalizing();
        queue.write(event)
    }

    /// Authorization verified: business logic may run. Non-final.
    pub(crate) fn transition_to_payment_verified(
        &self,
        ctx: &mut RequestContext,
        queue: &EventQueue,
        state: &PaymentState,
    ) -> Result<(), A2aError> {
        let task = task_mut(ctx)?;
        record::record_payment_verified(task, state, "Payment verified").map_err(codec_err)?;

        let event = TaskStatusUpdateEvent::new(task, task.status.state, task.status.message.clone());
        queue.write(event)
    }

    /// Settled: receipts recorded, replayable metadata cleared. Terminal.
    pub(crate) fn transition_to_completed(
        &self,
        ctx: &mut RequestContext,
        queue: &EventQueue,
        state: &PaymentState,
    ) -> Result<(), A2aError> {
        let task = task_mut(ctx)?;

        let result_text = state.message.as_deref().unwrap_or("Task completed");
        record::record_payment_completed(task, &state.receipts, result_text).map_err(codec_err)?;
        task.status.state = TaskState::Completed;

        let event = TaskStatusUpdateEvent::new(task, TaskState::Completed, task.status.message.clone())
            .finalizing();
        queue.write(event)
    }

    /// Terminal failure: error code in metadata, detail as text.
    pub(crate) fn transition_to_failed(
        &self,
        ctx: &mut RequestContext,
        queue: &EventQueue,
        error_code: &str,
        detail: &str,
    ) -> Result<(), A2aError> {
        tracing::warn!(task_id = %ctx.task_id, code = error_code, detail, "payment task failed");

        let task = task_mut(ctx)?;
        task.status.state = TaskState::Failed;
        record::record_payment_failed(task, error_code, detail);

        let event = TaskStatusUpdateEvent::new(task, TaskState::Failed, task.status.message.clone())
            .finalizing();
        queue.write(event)
    }
}
