//! The payment orchestrator.
//!
//! A re-entrant state machine keyed by [`PaymentStatus`], run once per
//! inbound request. Each pass reconstructs the payment state from the
//! task and live message metadata and drives it forward until it must
//! block on the client or reaches a terminal state.
//!
//! Ordering is load-bearing: `verify` completes before the business
//! runs, and the business completes before `settle` — once verification
//! confirms the authorization is collectable, executing first shields
//! the client from paying for work that never ran. A failed settle
//! after a successful execute is a merchant-side loss reported as task
//! failure; settlement is never retried.

use std::sync::Arc;

use a2a_core::error::A2aError;
use a2a_core::executor::{AgentExecutor, CallContext, EventQueue, RequestContext};
use a2a_core::types::{Message, Part, Role, TaskState, TaskStatusUpdateEvent};

use a2a_x402::config::{NetworkConfig, ResourceConfig};
use a2a_x402::error::codes;
use a2a_x402::networks::normalize_network;
use a2a_x402::proto::{PaymentRequired, PaymentRequirements};
use a2a_x402::scheme::SchemeError;
use a2a_x402::state::{PaymentState, PaymentStatus, extract};
use a2a_x402::{
    EXTRA_KEY_DESCRIPTION, EXTRA_KEY_MIME_TYPE, EXTRA_KEY_RESOURCE, X402_EXTENSION_URI,
};

use crate::business::BusinessService;
use crate::resource_server::ResourceServer;

/// Drives a task through the payment handshake.
///
/// Holds no per-task state; everything lives in the task record owned by
/// the transport, so concurrent tasks execute in parallel against the
/// same orchestrator instance.
pub struct PaymentOrchestrator {
    resource_server: Arc<dyn ResourceServer>,
    business: Arc<dyn BusinessService>,
    network_configs: Vec<NetworkConfig>,
}

impl PaymentOrchestrator {
    /// Creates an orchestrator over a resource server, a business
    /// service, and the networks payments are accepted on.
    #[must_use]
    pub fn new(
        resource_server: Arc<dyn ResourceServer>,
        business: Arc<dyn BusinessService>,
        network_configs: Vec<NetworkConfig>,
    ) -> Self {
        Self {
            resource_server,
            business,
            network_configs,
        }
    }

    async fn run(
        &self,
        call: &CallContext,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError> {
        if ctx.task.is_none() {
            self.create_task(ctx, queue)?;
        }

        self.ensure_extension(call, ctx, queue)?;

        let task = ctx.task.as_ref().expect("task created above");
        let mut state = match extract::extract_state(task, Some(&ctx.message)) {
            Ok(state) => state,
            Err(err) => {
                return self.transition_to_failed(
                    ctx,
                    queue,
                    codes::STATE_EXTRACTION_FAILED,
                    &format!("failed to extract payment state: {err}"),
                );
            }
        };

        loop {
            let task_state = ctx.task.as_ref().expect("task exists").status.state;
            if task_state.is_terminal() {
                return Ok(());
            }

            match state.status {
                // Quote is out. A payload on the inbound message promotes
                // the pass to verification in the same invocation;
                // otherwise keep waiting on the client.
                Some(PaymentStatus::Required | PaymentStatus::Rejected) => {
                    if state.payload.is_some() {
                        state.status = Some(PaymentStatus::Submitted);
                        state = self.handle_payment_submitted(ctx, queue, state).await?;
                        continue;
                    }
                    return Ok(());
                }

                Some(PaymentStatus::Submitted) => {
                    state = self.handle_payment_submitted(ctx, queue, state).await?;
                }

                Some(PaymentStatus::Verified) => {
                    match self.handle_payment_verified(ctx, &state).await {
                        Ok(next) => state = next,
                        Err(detail) => {
                            return self.transition_to_failed(
                                ctx,
                                queue,
                                codes::BUSINESS_EXECUTION_FAILED,
                                &format!("business execution failed: {detail}"),
                            );
                        }
                    }
                }

                Some(PaymentStatus::Completed) => {
                    return self.transition_to_completed(ctx, queue, &state);
                }

                // A failed status on a non-terminal task only occurs with
                // inconsistent metadata; there is nothing to drive.
                Some(PaymentStatus::Failed) => return Ok(()),

                // First-ever pass: produce the quote and wait.
                None => {
                    let prompt = ctx.message.first_text().unwrap_or_default().to_owned();
                    match self.build_payment_requirements(&prompt) {
                        Ok(new_state) => {
                            return self.transition_to_payment_required(
                                ctx, queue, &new_state, &prompt,
                            );
                        }
                        Err(err) => {
                            return self.transition_to_failed(
                                ctx,
                                queue,
                                codes::PAYMENT_REQUIREMENTS_CREATION_FAILED,
                                &format!("failed to create payment requirements: {err}"),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Fails closed when the transport did not carry the x402 extension
    /// negotiation header.
    fn ensure_extension(
        &self,
        call: &CallContext,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError> {
        let requested = call.requested_extensions();
        let code = if requested.is_empty() {
            codes::EXTENSION_MISSING
        } else if requested.iter().any(|uri| uri == X402_EXTENSION_URI) {
            return Ok(());
        } else {
            codes::EXTENSION_NOT_REQUESTED
        };

        let detail = format!(
            "x402 extension is required but not active. Client must send the {} header with value: {}",
            a2a_core::EXTENSIONS_HEADER,
            X402_EXTENSION_URI
        );
        self.transition_to_failed(ctx, queue, code, &detail)?;
        Err(A2aError::Executor(detail))
    }

    /// Builds the quote for a prompt across all configured networks.
    fn build_payment_requirements(&self, prompt: &str) -> Result<PaymentState, SchemeError> {
        let service = self.business.service_requirements(prompt);

        let mut accepts = Vec::new();
        for network_config in &self.network_configs {
            let config = ResourceConfig {
                scheme: service.scheme.clone(),
                pay_to: network_config.pay_to_address.clone(),
                price: service.price.clone(),
                network: normalize_network(&network_config.network_name),
                max_timeout_seconds: Some(service.max_timeout_seconds),
            };
            let mut requirements =
                self.resource_server
                    .build_requirements(&config)
                    .map_err(|e| -> SchemeError {
                        format!("network {}: {e}", network_config.network_name).into()
                    })?;
            for requirement in &mut requirements {
                attach_a2a_fields(requirement, &service);
            }
            accepts.extend(requirements);
        }

        Ok(PaymentState {
            status: Some(PaymentStatus::Required),
            requirements: Some(PaymentRequired::new(accepts)),
            ..PaymentState::default()
        })
    }

    /// Resolves the single requirement the submitted payload satisfies.
    fn find_matching_requirement(
        &self,
        state: &PaymentState,
    ) -> Result<PaymentRequirements, String> {
        let payload = state
            .payload
            .as_ref()
            .ok_or_else(|| "payment payload is required".to_owned())?;
        let requirements = state
            .requirements
            .as_ref()
            .filter(|r| !r.accepts.is_empty())
            .ok_or_else(|| "payment requirements are required".to_owned())?;

        self.resource_server
            .find_matching(&requirements.accepts, payload)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "no matching payment requirement found for payload (accepted: scheme={}, network={}, amount={}, asset={}, payTo={})",
                    payload.accepted.scheme,
                    payload.accepted.network,
                    payload.accepted.amount,
                    payload.accepted.asset,
                    payload.accepted.pay_to,
                )
            })
    }

    async fn verify_payment(&self, state: &PaymentState) -> Result<(), String> {
        let matched = self.find_matching_requirement(state)?;
        let payload = state.payload.as_ref().expect("checked by find_matching");

        let response = self
            .resource_server
            .verify(payload, &matched)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_valid {
            return Err(format!(
                "{}, {}",
                response.invalid_reason.unwrap_or_default(),
                response.invalid_message.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    /// Verifies a submitted payload and records the verified state.
    ///
    /// A terminal task short-circuits: the second of two identical
    /// submissions finds the task already completed and nothing runs
    /// twice.
    async fn handle_payment_submitted(
        &self,
        ctx: &mut RequestContext,
        queue: &EventQueue,
        mut state: PaymentState,
    ) -> Result<PaymentState, A2aError> {
        let task_state = ctx.task.as_ref().expect("task exists").status.state;
        if task_state.is_terminal() {
            return Ok(state);
        }

        if let Err(detail) = self.verify_payment(&state).await {
            self.transition_to_failed(
                ctx,
                queue,
                codes::PAYMENT_VERIFICATION_FAILED,
                &format!("payment verification failed: {detail}"),
            )?;
            return Ok(state);
        }

        state.status = Some(PaymentStatus::Verified);
        if let Some(task) = ctx.task.as_mut() {
            task.status.state = TaskState::Working;
        }
        self.transition_to_payment_verified(ctx, queue, &state)?;
        Ok(state)
    }

    /// Runs the paid work and settles. Returns the completed state; any
    /// failure in here collapses into `business_execution_failed`.
    async fn handle_payment_verified(
        &self,
        ctx: &RequestContext,
        state: &PaymentState,
    ) -> Result<PaymentState, String> {
        let matched = self.find_matching_requirement(state)?;
        let payload = state.payload.as_ref().expect("checked by find_matching");

        let task = ctx.task.as_ref().ok_or("no task in request context")?;
        let prompt = extract::extract_original_prompt(task)
            .ok_or("prompt is required: original prompt not found in task metadata")?;

        let business_message = self
            .business
            .execute(&prompt)
            .await
            .map_err(|e| format!("business logic execution failed: {e}"))?;

        let receipt = self
            .resource_server
            .settle(payload, &matched)
            .await
            .map_err(|e| format!("payment settlement failed: {e}"))?;
        if !receipt.success {
            return Err(format!(
                "payment settlement failed: {}",
                receipt.error_reason.clone().unwrap_or_default()
            ));
        }

        Ok(PaymentState {
            status: Some(PaymentStatus::Completed),
            message: Some(business_message),
            receipts: vec![receipt],
            ..PaymentState::default()
        })
    }
}

fn attach_a2a_fields(
    requirement: &mut PaymentRequirements,
    service: &crate::business::ServiceRequirements,
) {
    if !service.resource.is_empty() {
        requirement.set_extra(EXTRA_KEY_RESOURCE, serde_json::json!(service.resource));
    }
    if !service.description.is_empty() {
        requirement.set_extra(EXTRA_KEY_DESCRIPTION, serde_json::json!(service.description));
    }
    if !service.mime_type.is_empty() {
        requirement.set_extra(EXTRA_KEY_MIME_TYPE, serde_json::json!(service.mime_type));
    }
}

#[async_trait::async_trait]
impl AgentExecutor for PaymentOrchestrator {
    async fn execute(
        &self,
        call: &CallContext,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError> {
        self.run(call, ctx, queue).await
    }

    async fn cancel(
        &self,
        _call: &CallContext,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError> {
        let message = Message::new(Role::Agent, Part::text("Task cancelled"));
        let event = TaskStatusUpdateEvent {
            task_id: ctx.task_id.clone(),
            context_id: ctx.context_id.clone(),
            kind: "status-update".to_owned(),
            status: a2a_core::types::TaskStatus {
                message: Some(message),
                ..a2a_core::types::TaskStatus::new(TaskState::Failed)
            },
            is_final: true,
        };
        queue.write(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::HeaderMap;

    use a2a_core::types::Task;
    use a2a_x402::chain::ChainId;
    use a2a_x402::proto::{PaymentPayload, SettleResponse, VerifyResponse};
    use a2a_x402::scheme::SCHEME_EXACT;
    use a2a_x402::state::encode::encode_payment_submission;
    use a2a_x402::state::set;

    use crate::business::{BusinessError, ServiceRequirements};

    /// Resource server with scripted verify/settle outcomes.
    struct MockResourceServer {
        verify_response: Result<VerifyResponse, String>,
        settle_response: Result<SettleResponse, String>,
        verify_calls: AtomicUsize,
        settle_calls: AtomicUsize,
    }

    impl MockResourceServer {
        fn happy() -> Self {
            Self {
                verify_response: Ok(VerifyResponse::valid("0xPayer")),
                settle_response: Ok(SettleResponse::success("0xabc", "eip155:84532", "0xPayer")),
                verify_calls: AtomicUsize::new(0),
                settle_calls: AtomicUsize::new(0),
            }
        }

        fn rejecting(reason: &str) -> Self {
            Self {
                verify_response: Ok(VerifyResponse::invalid(reason, "verification declined")),
                ..Self::happy()
            }
        }

        fn settle_failing(reason: &str) -> Self {
            Self {
                settle_response: Ok(SettleResponse::failure(reason, "eip155:84532")),
                ..Self::happy()
            }
        }
    }

    #[async_trait::async_trait]
    impl ResourceServer for MockResourceServer {
        fn build_requirements(
            &self,
            config: &ResourceConfig,
        ) -> Result<Vec<PaymentRequirements>, SchemeError> {
            Ok(vec![PaymentRequirements {
                scheme: config.scheme.clone(),
                network: config.network.parse().map_err(|e| -> SchemeError {
                    format!("{e}").into()
                })?,
                amount: config.price.clone(),
                pay_to: config.pay_to.clone(),
                max_timeout_seconds: config.max_timeout_seconds.unwrap_or(300),
                asset: "0xUSDC".to_owned(),
                extra: None,
            }])
        }

        async fn verify(
            &self,
            _payload: &PaymentPayload,
            _requirements: &PaymentRequirements,
        ) -> Result<VerifyResponse, SchemeError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.verify_response.clone().map_err(Into::into)
        }

        async fn settle(
            &self,
            _payload: &PaymentPayload,
            _requirements: &PaymentRequirements,
        ) -> Result<SettleResponse, SchemeError> {
            self.settle_calls.fetch_add(1, Ordering::SeqCst);
            self.settle_response.clone().map_err(Into::into)
        }
    }

    /// Business service returning a fixed result and counting calls.
    struct MockBusiness {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    impl MockBusiness {
        fn ok() -> Self {
            Self {
                result: Ok("ok".to_owned()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                result: Err(detail.to_owned()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl BusinessService for MockBusiness {
        async fn execute(&self, _prompt: &str) -> Result<String, BusinessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(Into::into)
        }

        fn service_requirements(&self, _prompt: &str) -> ServiceRequirements {
            ServiceRequirements {
                price: "1.0".to_owned(),
                resource: "/generate-image".to_owned(),
                description: "Generate an AI image".to_owned(),
                mime_type: "application/json".to_owned(),
                scheme: SCHEME_EXACT.to_owned(),
                max_timeout_seconds: 600,
            }
        }
    }

    fn orchestrator(
        resource_server: Arc<MockResourceServer>,
        business: Arc<MockBusiness>,
    ) -> PaymentOrchestrator {
        PaymentOrchestrator::new(
            resource_server,
            business,
            vec![NetworkConfig {
                network_name: "base-sepolia".to_owned(),
                pay_to_address: "0xMerchant".to_owned(),
            }],
        )
    }

    fn extension_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            a2a_core::EXTENSIONS_HEADER,
            X402_EXTENSION_URI.parse().unwrap(),
        );
        headers
    }

    async fn run_pass(
        orch: &PaymentOrchestrator,
        headers: HeaderMap,
        message: Message,
        stored: Option<Task>,
    ) -> (Result<(), A2aError>, Task, Vec<TaskStatusUpdateEvent>) {
        let call = CallContext::new(headers);
        let mut ctx = RequestContext::new(message, stored);
        let queue = EventQueue::new();
        let result = orch.execute(&call, &mut ctx, &queue).await;
        let task = ctx.task.expect("task always created");
        (result, task, queue.drain())
    }

    fn prompt_message() -> Message {
        Message::new(Role::User, Part::text("Generate an image of a sunset"))
    }

    /// Runs the first pass and returns the input-required task.
    async fn quoted_task(orch: &PaymentOrchestrator) -> Task {
        let (result, task, events) =
            run_pass(orch, extension_headers(), prompt_message(), None).await;
        result.unwrap();
        assert_eq!(task.status.state, TaskState::InputRequired);
        assert!(events.last().unwrap().is_final);
        task
    }

    /// Builds the client's submission message for the task's quote.
    fn submission_for(task: &Task) -> Message {
        let requirements = extract::extract_requirements(task).unwrap().unwrap();
        let accepted = requirements.accepts[0].clone();
        let payload = PaymentPayload::new(accepted, serde_json::json!({"signature": "0xsig"}));
        encode_payment_submission(&task.id, &payload).unwrap()
    }

    #[tokio::test]
    async fn first_pass_produces_quote_and_preserves_prompt() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;

        let state = extract::extract_state(&task, None).unwrap();
        assert_eq!(state.status, Some(PaymentStatus::Required));
        let requirements = state.requirements.unwrap();
        assert_eq!(requirements.accepts.len(), 1);
        assert_eq!(requirements.accepts[0].network, ChainId::new("eip155", "84532"));
        assert_eq!(
            requirements.accepts[0].extra_str(EXTRA_KEY_RESOURCE),
            Some("/generate-image")
        );
        assert_eq!(
            extract::extract_original_prompt(&task).as_deref(),
            Some("Generate an image of a sunset")
        );
        assert_eq!(biz.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn happy_path_completes_with_receipts_and_no_replayable_metadata() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;
        let submission = submission_for(&task);
        let (result, task, events) =
            run_pass(&orch, extension_headers(), submission, Some(task)).await;

        result.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);

        let state = extract::extract_state(&task, None).unwrap();
        assert_eq!(state.status, Some(PaymentStatus::Completed));
        assert_eq!(state.receipts.len(), 1);
        assert!(state.payload.is_none());
        assert!(state.requirements.is_none());

        assert_eq!(biz.calls.load(Ordering::SeqCst), 1);
        assert_eq!(rs.verify_calls.load(Ordering::SeqCst), 1);
        assert_eq!(rs.settle_calls.load(Ordering::SeqCst), 1);

        // Events: verified (non-final, working) then completed (final).
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status.state, TaskState::Working);
        assert!(!events[0].is_final);
        assert_eq!(events[1].status.state, TaskState::Completed);
        assert!(events[1].is_final);

        assert_eq!(
            task.status.message.as_ref().unwrap().first_text(),
            Some("ok")
        );
    }

    #[tokio::test]
    async fn rejected_verification_fails_without_business_call() {
        let rs = Arc::new(MockResourceServer::rejecting("insufficient_funds"));
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;
        let submission = submission_for(&task);
        let (result, task, _) = run_pass(&orch, extension_headers(), submission, Some(task)).await;

        result.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::PAYMENT_VERIFICATION_FAILED)
        );
        assert!(
            task.status
                .message
                .as_ref()
                .unwrap()
                .first_text()
                .unwrap()
                .contains("insufficient_funds")
        );
        assert_eq!(biz.calls.load(Ordering::SeqCst), 0);
        assert_eq!(rs.settle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn settlement_failure_after_business_reports_business_code() {
        let rs = Arc::new(MockResourceServer::settle_failing("tx_reverted"));
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;
        let submission = submission_for(&task);
        let (result, task, _) = run_pass(&orch, extension_headers(), submission, Some(task)).await;

        result.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::BUSINESS_EXECUTION_FAILED)
        );
        // The business side-effect happened exactly once before settle.
        assert_eq!(biz.calls.load(Ordering::SeqCst), 1);
        assert_eq!(rs.settle_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn business_failure_never_reaches_settlement() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::failing("model unavailable"));
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;
        let submission = submission_for(&task);
        let (result, task, _) = run_pass(&orch, extension_headers(), submission, Some(task)).await;

        result.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::BUSINESS_EXECUTION_FAILED)
        );
        assert_eq!(rs.settle_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_extension_header_fails_closed() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let (result, task, events) =
            run_pass(&orch, HeaderMap::new(), prompt_message(), None).await;

        assert!(result.is_err());
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::EXTENSION_MISSING)
        );
        assert!(events.last().unwrap().is_final);
        assert_eq!(biz.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_extension_uri_is_not_requested() {
        let orch = orchestrator(Arc::new(MockResourceServer::happy()), Arc::new(MockBusiness::ok()));

        let mut headers = HeaderMap::new();
        headers.insert(
            a2a_core::EXTENSIONS_HEADER,
            "https://example.com/other-extension".parse().unwrap(),
        );
        let (result, task, _) = run_pass(&orch, headers, prompt_message(), None).await;

        assert!(result.is_err());
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::EXTENSION_NOT_REQUESTED)
        );
    }

    #[tokio::test]
    async fn duplicate_submission_settles_exactly_once() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;
        let submission = submission_for(&task);

        let (first, task, _) =
            run_pass(&orch, extension_headers(), submission.clone(), Some(task)).await;
        first.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);

        // Same submission again against the now-terminal task.
        let (second, task, events) =
            run_pass(&orch, extension_headers(), submission, Some(task)).await;
        second.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert!(events.is_empty());
        assert_eq!(rs.settle_calls.load(Ordering::SeqCst), 1);
        assert_eq!(biz.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_metadata_fails_with_state_extraction_code() {
        let orch = orchestrator(Arc::new(MockResourceServer::happy()), Arc::new(MockBusiness::ok()));

        let mut message = prompt_message();
        message.metadata_mut().insert(
            a2a_x402::METADATA_KEY_STATUS.to_owned(),
            serde_json::json!(["not", "a", "status"]),
        );
        let (result, task, _) = run_pass(&orch, extension_headers(), message, None).await;

        result.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::STATE_EXTRACTION_FAILED)
        );
    }

    #[tokio::test]
    async fn missing_original_prompt_fails_business_execution() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let mut task = quoted_task(&orch).await;
        // Drop the preserved prompt from the stored task's metadata.
        task.status
            .message
            .as_mut()
            .unwrap()
            .metadata
            .as_mut()
            .unwrap()
            .remove(a2a_x402::METADATA_KEY_ORIGINAL_PROMPT);

        let submission = submission_for(&task);
        let (result, task, _) = run_pass(&orch, extension_headers(), submission, Some(task)).await;

        result.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::BUSINESS_EXECUTION_FAILED)
        );
        assert_eq!(biz.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn quote_failure_reports_requirements_creation_code() {
        // No networks configured for the scheme server: building the quote
        // fails on the first network config pointing at it.
        struct FailingResourceServer;

        #[async_trait::async_trait]
        impl ResourceServer for FailingResourceServer {
            fn build_requirements(
                &self,
                _config: &ResourceConfig,
            ) -> Result<Vec<PaymentRequirements>, SchemeError> {
                Err("no scheme server registered".into())
            }

            async fn verify(
                &self,
                _payload: &PaymentPayload,
                _requirements: &PaymentRequirements,
            ) -> Result<VerifyResponse, SchemeError> {
                unreachable!("verify is never reached without a quote")
            }

            async fn settle(
                &self,
                _payload: &PaymentPayload,
                _requirements: &PaymentRequirements,
            ) -> Result<SettleResponse, SchemeError> {
                unreachable!("settle is never reached without a quote")
            }
        }

        let orch = PaymentOrchestrator::new(
            Arc::new(FailingResourceServer),
            Arc::new(MockBusiness::ok()),
            vec![NetworkConfig {
                network_name: "base-sepolia".to_owned(),
                pay_to_address: "0xMerchant".to_owned(),
            }],
        );

        let (result, task, _) = run_pass(&orch, extension_headers(), prompt_message(), None).await;
        result.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            extract::extract_error(&task).as_deref(),
            Some(codes::PAYMENT_REQUIREMENTS_CREATION_FAILED)
        );
    }

    #[tokio::test]
    async fn payload_on_required_state_promotes_in_same_pass() {
        let rs = Arc::new(MockResourceServer::happy());
        let biz = Arc::new(MockBusiness::ok());
        let orch = orchestrator(Arc::clone(&rs), Arc::clone(&biz));

        let task = quoted_task(&orch).await;

        // A submission message carrying only the payload, no status: the
        // task-side payment-required status plus the live payload still
        // promote to verification within one invocation.
        let requirements = extract::extract_requirements(&task).unwrap().unwrap();
        let payload =
            PaymentPayload::new(requirements.accepts[0].clone(), serde_json::json!({"s": 1}));
        let mut message = Message::for_task(Role::User, &task.id, Part::text("payment"));
        set::set_payload(&mut message, &payload).unwrap();

        let (result, task, _) = run_pass(&orch, extension_headers(), message, Some(task)).await;
        result.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(rs.settle_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_emits_final_failed_event() {
        let orch = orchestrator(Arc::new(MockResourceServer::happy()), Arc::new(MockBusiness::ok()));

        let call = CallContext::new(extension_headers());
        let mut ctx = RequestContext::new(prompt_message(), None);
        let queue = EventQueue::new();
        orch.cancel(&call, &mut ctx, &queue).await.unwrap();

        let events = queue.drain();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_final);
        assert_eq!(events[0].status.state, TaskState::Failed);
        assert_eq!(
            events[0].status.message.as_ref().unwrap().first_text(),
            Some("Task cancelled")
        );
    }
}
