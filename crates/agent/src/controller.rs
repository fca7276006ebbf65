//! Turn-scoped dialogue pipeline
//!
//! Each call to [`DialogueController::process_turn`] is one linear pass:
//! plan (classify), optionally execute (extract + tools) and evaluate,
//! then respond. Tool failures are absorbed into conversational text; the
//! only error surfaced to the host is a structurally invalid state handed
//! in from the checkpoint store.

use std::sync::Arc;

use serde::Serialize;
use yojana_agent_core::{
    ApplicationRecord, ContradictionRecord, ConversationState, ExtractedFields, Intent,
    ProfileField, Result, Scheme, Stage,
};
use yojana_agent_text_processing::{hindi, ExtractionEngine, IntentClassifier};
use yojana_agent_tools::{ApplicationSubmitter, EligibilityEngine, ToolError};

use crate::contradiction;
use crate::responder;

/// Structured side-channel result of one turn, for hosts that want more than
/// the reply text (logging, UI badges, tests).
#[derive(Debug, Clone, Serialize)]
pub struct TurnMetadata {
    pub intent: Intent,
    pub extracted: ExtractedFields,
    pub missing_fields: Vec<ProfileField>,
    pub eligible_scheme_ids: Vec<String>,
    pub ineligible_scheme_ids: Vec<String>,
    pub application_id: Option<String>,
    pub contradictions: Vec<ContradictionRecord>,
}

/// Everything one turn produces
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub state: ConversationState,
    pub metadata: TurnMetadata,
}

/// Scratch data accumulated while the stages of a single turn run
#[derive(Default)]
pub(crate) struct TurnContext {
    pub(crate) extracted: ExtractedFields,
    pub(crate) contradictions: Vec<ContradictionRecord>,
    /// Eligibility ran this turn (distinguishes a fresh result from a stale
    /// one carried in the state)
    pub(crate) eligibility_ran: bool,
    pub(crate) application: Option<ApplicationRecord>,
    pub(crate) tool_error: Option<ToolError>,
}

/// The dialogue controller. Stateless across turns apart from the mock
/// application store; safe to share behind an `Arc` as long as the host
/// serializes turns per thread id.
pub struct DialogueController {
    classifier: IntentClassifier,
    extractor: ExtractionEngine,
    eligibility: EligibilityEngine,
    submitter: ApplicationSubmitter,
    catalog: Arc<Vec<Scheme>>,
}

impl DialogueController {
    pub fn new(catalog: Arc<Vec<Scheme>>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            extractor: ExtractionEngine::new(),
            eligibility: EligibilityEngine::new(),
            submitter: ApplicationSubmitter::new(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &[Scheme] {
        &self.catalog
    }

    /// Status lookup for a previously submitted application
    pub fn application_status(&self, application_id: &str) -> Option<ApplicationRecord> {
        self.submitter.status(application_id)
    }

    /// Process one user utterance against the thread's prior state.
    ///
    /// `prior = None` starts a fresh conversation. A prior state that fails
    /// structural validation is rejected before anything is mutated, so a
    /// corrupted checkpoint can never silently lose contradiction history.
    pub fn process_turn(
        &self,
        thread_id: &str,
        utterance: &str,
        prior: Option<ConversationState>,
    ) -> Result<TurnOutcome> {
        let mut state = prior.unwrap_or_else(ConversationState::new);
        state.validate()?;

        state.push_user(utterance);
        state.turn_count += 1;
        state.should_continue = true;
        state.last_error = None;
        state.next_stage = Stage::Plan;

        tracing::debug!(thread_id, turn = state.turn_count, "Turn started");

        let mut ctx = TurnContext::default();
        loop {
            let stage = state.next_stage;
            let next = match stage {
                Stage::Plan => self.plan(&mut state, utterance),
                Stage::Execute => self.execute(&mut state, utterance, &mut ctx),
                Stage::Evaluate => self.evaluate(&state, &ctx),
                Stage::Respond => self.respond(&mut state, &ctx),
                Stage::End => break,
            };
            debug_assert!(stage.can_transition_to(next));
            state.next_stage = next;
        }

        let reply = state.last_reply().unwrap_or_default().to_string();
        let metadata = TurnMetadata {
            intent: state.current_intent.unwrap_or(Intent::ProvideInfo),
            extracted: ctx.extracted,
            missing_fields: state.profile.missing_required(),
            eligible_scheme_ids: state
                .eligibility
                .as_ref()
                .map(|o| o.eligible_ids().iter().map(|s| s.to_string()).collect())
                .unwrap_or_default(),
            ineligible_scheme_ids: state
                .eligibility
                .as_ref()
                .map(|o| o.ineligible_ids().iter().map(|s| s.to_string()).collect())
                .unwrap_or_default(),
            application_id: ctx.application.map(|a| a.application_id),
            contradictions: ctx.contradictions,
        };

        tracing::info!(
            thread_id,
            turn = state.turn_count,
            intent = %metadata.intent,
            contradictions = metadata.contradictions.len(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            reply,
            state,
            metadata,
        })
    }

    /// Classify the intent and gate tool intents on the required fields
    fn plan(&self, state: &mut ConversationState, utterance: &str) -> Stage {
        if is_low_quality(utterance) {
            state.current_intent = Some(Intent::Clarify);
            return Stage::Respond;
        }

        let intent = self
            .classifier
            .classify(utterance, state.profile.is_complete());
        state.current_intent = Some(intent);
        tracing::debug!(intent = %intent, "Planned");

        if intent.needs_tools() && !state.profile.is_complete() {
            // Ask for the next missing field instead of running tools
            return Stage::Respond;
        }
        Stage::Execute
    }

    /// Extract fields, apply them through contradiction detection, then run
    /// whichever tool the intent calls for. Tool failures land in the context
    /// and the state's last-error marker, never in the return path.
    fn execute(
        &self,
        state: &mut ConversationState,
        utterance: &str,
        ctx: &mut TurnContext,
    ) -> Stage {
        let extracted = self.extractor.extract(utterance, &state.profile);
        let detection = contradiction::detect(&state.profile, &extracted);
        for value in detection.to_apply.values() {
            state.profile.set(value.clone());
        }
        state
            .contradictions
            .extend(detection.contradictions.iter().cloned());
        ctx.contradictions = detection.contradictions;
        ctx.extracted = extracted;

        let intent = state.current_intent.unwrap_or(Intent::ProvideInfo);
        if state.profile.is_complete() {
            match intent {
                // ProvideInfo too: supplying the final required field should
                // surface schemes without the user having to re-ask
                Intent::FindSchemes | Intent::ProvideInfo => {
                    state.eligibility = Some(self.eligibility.check(&state.profile, &self.catalog));
                    ctx.eligibility_ran = true;
                }
                Intent::ApplyScheme => self.apply_scheme(state, utterance, ctx),
                _ => {}
            }
        }

        if let Some(err) = &ctx.tool_error {
            tracing::warn!(error = %err, "Tool failure absorbed");
            state.last_error = Some(err.to_string());
        }

        Stage::Evaluate
    }

    fn apply_scheme(&self, state: &mut ConversationState, utterance: &str, ctx: &mut TurnContext) {
        match self.resolve_scheme(state, utterance) {
            Some(scheme_id) if state.applied_schemes.contains(&scheme_id) => {
                ctx.tool_error = Some(ToolError::AlreadyApplied(scheme_id));
            }
            Some(scheme_id) => {
                match self
                    .submitter
                    .submit(&scheme_id, &state.profile, &self.catalog)
                {
                    Ok(record) => {
                        state.selected_scheme_id = Some(scheme_id.clone());
                        state.applied_schemes.push(scheme_id);
                        state.application_result = Some(record.clone());
                        ctx.application = Some(record);
                    }
                    Err(err) => ctx.tool_error = Some(err),
                }
            }
            None => ctx.tool_error = Some(ToolError::NoSchemeSelected),
        }
    }

    /// Scheme the user means: named in this utterance, else selected in a
    /// prior turn, else the single obvious candidate from the last
    /// eligibility result.
    fn resolve_scheme(&self, state: &ConversationState, utterance: &str) -> Option<String> {
        let text = hindi::normalize(utterance);
        for scheme in self.catalog.iter() {
            let id_lower = scheme.id.to_lowercase();
            let id_spaced = id_lower.replace('_', " ");
            let name_en = scheme.name_english.to_lowercase();
            if text.contains(&id_lower)
                || text.contains(&id_spaced)
                || (!name_en.is_empty() && text.contains(&name_en))
                || text.contains(&hindi::normalize(&scheme.name_hindi))
            {
                return Some(scheme.id.clone());
            }
        }

        if let Some(id) = &state.selected_scheme_id {
            return Some(id.clone());
        }

        match state.eligibility.as_ref().map(|o| o.eligible_ids()) {
            Some(ids) if ids.len() == 1 => Some(ids[0].to_string()),
            _ => None,
        }
    }

    /// Surface-priority decision point; routing is always to the responder
    fn evaluate(&self, _state: &ConversationState, ctx: &TurnContext) -> Stage {
        if !ctx.contradictions.is_empty() {
            tracing::info!(
                count = ctx.contradictions.len(),
                "Surfacing contradictions before tool results"
            );
        }
        Stage::Respond
    }

    fn respond(&self, state: &mut ConversationState, ctx: &TurnContext) -> Stage {
        let reply = responder::compose(state, ctx);
        state.push_assistant(&reply);
        state.should_continue = false;
        Stage::End
    }
}

/// An utterance with less than two letters or digits carries no signal;
/// short-circuit to a clarification request.
fn is_low_quality(utterance: &str) -> bool {
    hindi::normalize(utterance)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .count()
        < 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use yojana_agent_core::FieldValue;
    use yojana_agent_tools::default_catalog;

    fn controller() -> DialogueController {
        DialogueController::new(Arc::new(default_catalog()))
    }

    fn complete_state() -> ConversationState {
        let mut state = ConversationState::new();
        state.profile.set(FieldValue::Age(25));
        state.profile.set(FieldValue::Income(150_000.0));
        state.profile.set(FieldValue::Gender(yojana_agent_core::Gender::Male));
        state
    }

    #[test]
    fn test_turn_count_increments_by_one() {
        let controller = controller();
        let first = controller.process_turn("t1", "नमस्ते", None).unwrap();
        assert_eq!(first.state.turn_count, 1);

        let second = controller
            .process_turn("t1", "मेरी उम्र 25 साल है", Some(first.state))
            .unwrap();
        assert_eq!(second.state.turn_count, 2);
    }

    #[test]
    fn test_missing_field_gating_asks_for_age_first() {
        // Tools must not run on an empty profile
        let controller = controller();
        let outcome = controller
            .process_turn("t1", "मुझे सरकारी योजना चाहिए", None)
            .unwrap();

        assert_eq!(outcome.metadata.intent, Intent::FindSchemes);
        assert!(outcome.state.eligibility.is_none());
        assert!(outcome.reply.contains("उम्र"));
        assert_eq!(
            outcome.metadata.missing_fields,
            vec![ProfileField::Age, ProfileField::Income, ProfileField::Gender]
        );
    }

    #[test]
    fn test_contradiction_then_confirmation() {
        // Revise age, then confirm the revised value
        let controller = controller();
        let t1 = controller
            .process_turn("t1", "मेरी उम्र 25 साल है", None)
            .unwrap();
        assert_eq!(t1.state.profile.age, Some(25));
        assert!(t1.state.contradictions.is_empty());

        let t2 = controller
            .process_turn("t1", "मेरी उम्र 30 साल है", Some(t1.state))
            .unwrap();
        assert_eq!(t2.state.profile.age, Some(30));
        assert_eq!(t2.state.contradictions.len(), 1);
        assert_eq!(t2.state.contradictions[0].old_value, FieldValue::Age(25));
        assert_eq!(t2.state.contradictions[0].new_value, FieldValue::Age(30));
        assert!(t2.reply.contains("30"));

        let t3 = controller
            .process_turn("t1", "हां, मेरी उम्र 30 साल है", Some(t2.state))
            .unwrap();
        assert_eq!(t3.state.profile.age, Some(30));
        assert_eq!(t3.state.contradictions.len(), 1);
        assert!(t3.metadata.contradictions.is_empty());
    }

    #[test]
    fn test_find_schemes_with_complete_profile_runs_eligibility() {
        let controller = controller();
        let mut state = complete_state();
        state.profile.set(FieldValue::Occupation("farmer".to_string()));

        let outcome = controller
            .process_turn("t1", "मुझे योजना बताओ", Some(state))
            .unwrap();

        let eligibility = outcome.state.eligibility.expect("eligibility should run");
        assert_eq!(eligibility.total_checked, controller.catalog().len());
        assert!(outcome
            .metadata
            .eligible_scheme_ids
            .contains(&"PM_KISAN".to_string()));
    }

    #[test]
    fn test_completing_profile_runs_eligibility_without_re_asking() {
        // The last required field arrives as plain information; schemes
        // should be checked on that same turn
        let controller = controller();
        let mut state = ConversationState::new();
        state.profile.set(FieldValue::Age(25));
        state.profile.set(FieldValue::Income(150_000.0));

        let outcome = controller
            .process_turn("t1", "मैं पुरुष हूं", Some(state))
            .unwrap();

        assert_eq!(outcome.metadata.intent, Intent::ProvideInfo);
        assert!(outcome.state.eligibility.is_some());
    }

    #[test]
    fn test_apply_named_scheme() {
        let controller = controller();
        let mut state = complete_state();
        state.profile.set(FieldValue::Occupation("farmer".to_string()));

        let outcome = controller
            .process_turn("t1", "मैं pm kisan के लिए आवेदन करना चाहता हूं", Some(state))
            .unwrap();

        let record = outcome.state.application_result.expect("application expected");
        assert_eq!(record.scheme_id, "PM_KISAN");
        assert_eq!(outcome.state.applied_schemes, vec!["PM_KISAN"]);
        assert!(outcome.reply.contains(&record.application_id));
    }

    #[test]
    fn test_duplicate_application_is_refused() {
        let controller = controller();
        let outcome = controller
            .process_turn("t1", "मैं pm kisan के लिए आवेदन करना चाहता हूं", Some(complete_state()))
            .unwrap();
        let second = controller
            .process_turn(
                "t1",
                "मैं pm kisan के लिए आवेदन करना चाहता हूं",
                Some(outcome.state),
            )
            .unwrap();

        assert!(second.state.last_error.is_some());
        // Still exactly one application on record
        assert_eq!(second.state.applied_schemes.len(), 1);
        assert!(second.reply.contains("पहले ही"));
    }

    #[test]
    fn test_apply_without_scheme_asks_which_one() {
        let controller = controller();
        let outcome = controller
            .process_turn("t1", "आवेदन करना चाहता हूं", Some(complete_state()))
            .unwrap();

        assert!(outcome.state.application_result.is_none());
        assert!(outcome.state.last_error.is_some());
        assert!(outcome.reply.contains("योजना"));
    }

    #[test]
    fn test_low_quality_input_asks_for_clarification() {
        let controller = controller();
        let outcome = controller.process_turn("t1", "अ", None).unwrap();
        assert_eq!(outcome.metadata.intent, Intent::Clarify);
        assert!(outcome.state.eligibility.is_none());
    }

    #[test]
    fn test_corrupted_checkpoint_is_rejected() {
        let controller = controller();
        let mut state = ConversationState::new();
        state.push_user("अकेला संदेश");
        state.turn_count = 5;

        assert!(controller.process_turn("t1", "नमस्ते", Some(state)).is_err());
    }

    #[test]
    fn test_application_status_lookup_after_submission() {
        let controller = controller();
        let outcome = controller
            .process_turn("t1", "मैं pm kisan के लिए आवेदन करना चाहता हूं", Some(complete_state()))
            .unwrap();

        let id = outcome.metadata.application_id.unwrap();
        let record = controller.application_status(&id).unwrap();
        assert_eq!(record.scheme_id, "PM_KISAN");
        assert!(controller.application_status("APP_UNKNOWN").is_none());
    }

    #[test]
    fn test_tool_failure_never_escapes() {
        // No eligible context, unknown scheme name: the turn still succeeds
        let controller = controller();
        let outcome = controller
            .process_turn("t1", "आवेदन कर दो", Some(complete_state()))
            .unwrap();
        assert!(outcome.state.last_error.is_some());
        assert!(!outcome.reply.is_empty());
    }
}
