//! Classifier — one bounded completion call per passage plus the failure policy.

use std::time::Duration;

use tracing::warn;

use crate::labelling::parser::{Classification, ERROR_LABEL};
use crate::labelling::variant::{build_prompt, FailurePolicy, Variant, VariantProfile};
use crate::llm_client::{CompletionService, LlmError};

/// Upper bound on a single completion call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct Classifier<'a> {
    service: &'a dyn CompletionService,
    profile: VariantProfile,
    policy: FailurePolicy,
    timeout: Duration,
}

impl<'a> Classifier<'a> {
    pub fn new(
        service: &'a dyn CompletionService,
        variant: Variant,
        policy: FailurePolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            profile: variant.profile(),
            policy,
            timeout,
        }
    }

    /// Classifies one passage.
    ///
    /// Under `FailSoft` this only ever returns `Ok`: failures become the error
    /// sentinel with the cause in the rationale. Under `FailFast` the error is returned.
    pub async fn classify(&self, passage: &str) -> Result<Classification, LlmError> {
        let prompt = build_prompt(self.profile.template, passage);
        match self.complete_with_timeout(&prompt).await {
            Ok(output) => Ok(self.profile.parse_rule.parse(&output)),
            Err(e) => match self.policy {
                FailurePolicy::FailSoft => {
                    warn!("Completion failed, recording sentinel: {e}");
                    Ok(Classification::new(ERROR_LABEL, format!("API Error: {e}")))
                }
                FailurePolicy::FailFast => Err(e),
            },
        }
    }

    async fn complete_with_timeout(&self, prompt: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.timeout, self.service.complete(prompt))
            .await
            .map_err(|_| LlmError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }
}
