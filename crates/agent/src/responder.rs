//! Hindi reply composition
//!
//! Precedence: contradiction prompt, then absorbed tool failure, then
//! application confirmation, then scheme presentation, then intent-specific
//! text, then the missing-field prompt, then a generic acknowledgment. The
//! user never sees a technical failure message.

use yojana_agent_core::{ConversationState, Intent, ProfileField, SchemeDecision};
use yojana_agent_tools::ToolError;

use crate::controller::TurnContext;

pub(crate) fn compose(state: &ConversationState, ctx: &TurnContext) -> String {
    if let Some(record) = ctx.contradictions.last() {
        return format!(
            "आपने पहले अपनी {} {} बताई थी, अब {} बताई है। मैंने नई जानकारी ({}) दर्ज कर ली है। अगर यह गलत है तो कृपया बताइए।",
            record.field.hindi_label(),
            record.old_value.display_text(),
            record.new_value.display_text(),
            record.new_value.display_text(),
        );
    }

    if let Some(err) = &ctx.tool_error {
        return tool_failure_text(err);
    }

    if let Some(record) = &ctx.application {
        return format!(
            "आपका आवेदन सफलतापूर्वक जमा हो गया है। आवेदन संख्या: {}। अनुमानित प्रक्रिया समय: {} दिन।",
            record.application_id, record.estimated_processing_days,
        );
    }

    if ctx.eligibility_ran {
        if let Some(outcome) = &state.eligibility {
            return present_schemes(&outcome.eligible);
        }
    }

    match state.current_intent {
        Some(Intent::Greeting) => greeting_text(state),
        Some(Intent::EndConversation) => {
            "धन्यवाद! आपका दिन शुभ हो। फिर कभी योजनाओं की जानकारी चाहिए तो जरूर पूछिए।".to_string()
        }
        Some(Intent::Clarify) => {
            "क्षमा करें, मैं आपकी बात समझ नहीं पाया। कृपया फिर से बताइए।".to_string()
        }
        Some(Intent::GetDetails) => details_text(state),
        _ => acknowledgment_text(state, ctx),
    }
}

fn tool_failure_text(err: &ToolError) -> String {
    match err {
        ToolError::AlreadyApplied(_) => {
            "आप इस योजना के लिए पहले ही आवेदन कर चुके हैं। क्या आप किसी और योजना के बारे में जानना चाहेंगे?"
                .to_string()
        }
        ToolError::NoSchemeSelected => {
            "कृपया बताइए आप किस योजना के लिए आवेदन करना चाहते हैं। पहले मैं आपके लिए उपलब्ध योजनाएं खोज सकता हूं।"
                .to_string()
        }
        _ => "क्षमा करें, आवेदन जमा करते समय समस्या आई। कृपया थोड़ी देर बाद फिर से प्रयास करें।"
            .to_string(),
    }
}

fn present_schemes(eligible: &[SchemeDecision]) -> String {
    if eligible.is_empty() {
        return "क्षमा करें, आपकी दी गई जानकारी के अनुसार अभी कोई योजना उपलब्ध नहीं है। जानकारी बदलने पर दोबारा पूछ सकते हैं।"
            .to_string();
    }

    let mut reply = format!("आपके लिए {} योजनाएं उपलब्ध हैं:\n", eligible.len());
    for decision in eligible {
        reply.push_str(&format!("• {} — {}\n", decision.name_hindi, decision.benefits));
    }
    reply.push_str("किसी योजना के लिए आवेदन करना चाहें तो उसका नाम बताइए।");
    reply
}

fn greeting_text(state: &ConversationState) -> String {
    match state.profile.missing_required().first() {
        Some(field) => format!(
            "नमस्ते! मैं सरकारी योजनाओं की जानकारी देने में आपकी मदद करूंगा। शुरू करने के लिए {}",
            field_prompt(*field)
        ),
        None => "नमस्ते! आपकी जानकारी पूरी है। क्या आप अपने लिए उपलब्ध योजनाएं देखना चाहेंगे?"
            .to_string(),
    }
}

fn details_text(state: &ConversationState) -> String {
    // A details question after applying is almost always a status question
    if let Some(record) = &state.application_result {
        return format!(
            "आपका आवेदन {} जमा किया जा चुका है। वर्तमान स्थिति: जमा किया गया। अनुमानित प्रक्रिया समय: {} दिन।",
            record.application_id, record.estimated_processing_days,
        );
    }

    let selected = state.selected_scheme_id.as_deref().and_then(|id| {
        state.eligibility.as_ref().and_then(|o| {
            o.eligible
                .iter()
                .chain(o.ineligible.iter())
                .find(|d| d.scheme_id == id)
        })
    });
    let candidate = selected.or_else(|| {
        state
            .eligibility
            .as_ref()
            .and_then(|o| o.eligible.first())
    });

    match candidate {
        Some(decision) => format!(
            "{}: {} लाभ: {}",
            decision.name_hindi, decision.description_hindi, decision.benefits,
        ),
        None => "कृपया बताइए आप किस योजना की जानकारी चाहते हैं।".to_string(),
    }
}

fn acknowledgment_text(state: &ConversationState, ctx: &TurnContext) -> String {
    match state.profile.missing_required().first() {
        Some(field) if ctx.extracted.is_empty() => format!(
            "आपके लिए योजनाएं खोजने से पहले मुझे थोड़ी जानकारी चाहिए। {}",
            field_prompt(*field)
        ),
        Some(field) => format!("धन्यवाद, जानकारी दर्ज कर ली गई है। अब {}", field_prompt(*field)),
        None => "धन्यवाद, आपकी जानकारी पूरी हो गई है। क्या आप अपने लिए उपलब्ध योजनाएं देखना चाहेंगे?"
            .to_string(),
    }
}

fn field_prompt(field: ProfileField) -> &'static str {
    match field {
        ProfileField::Age => "कृपया अपनी उम्र बताइए।",
        ProfileField::Income => "कृपया अपनी सालाना आय बताइए।",
        ProfileField::Gender => "कृपया बताइए आप पुरुष हैं या महिला।",
        _ => "कृपया अपने बारे में थोड़ी और जानकारी दीजिए।",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use yojana_agent_core::{
        ApplicationRecord, ApplicationStatus, ContradictionRecord, EligibilityOutcome, FieldValue,
        Profile, ProfileField,
    };

    fn record() -> ContradictionRecord {
        ContradictionRecord {
            field: ProfileField::Age,
            old_value: FieldValue::Age(25),
            new_value: FieldValue::Age(30),
            detected_at: Utc::now(),
        }
    }

    fn application() -> ApplicationRecord {
        ApplicationRecord {
            application_id: "APP_20260830101530_0".to_string(),
            scheme_id: "PM_KISAN".to_string(),
            profile: Profile::default(),
            status: ApplicationStatus::Submitted,
            submitted_at: Utc::now(),
            estimated_processing_days: 15,
        }
    }

    #[test]
    fn test_contradiction_outranks_application_confirmation() {
        let state = ConversationState::new();
        let ctx = TurnContext {
            contradictions: vec![record()],
            application: Some(application()),
            ..Default::default()
        };

        let reply = compose(&state, &ctx);
        assert!(reply.contains("पहले"));
        assert!(reply.contains("30"));
        assert!(!reply.contains("आवेदन संख्या"));
    }

    #[test]
    fn test_application_confirmation_includes_id_and_days() {
        let state = ConversationState::new();
        let ctx = TurnContext {
            application: Some(application()),
            ..Default::default()
        };

        let reply = compose(&state, &ctx);
        assert!(reply.contains("APP_20260830101530_0"));
        assert!(reply.contains("15"));
    }

    #[test]
    fn test_empty_eligible_list_is_a_polite_reply_not_an_error() {
        let mut state = ConversationState::new();
        state.eligibility = Some(EligibilityOutcome {
            total_checked: 3,
            ..Default::default()
        });
        let ctx = TurnContext {
            eligibility_ran: true,
            ..Default::default()
        };

        let reply = compose(&state, &ctx);
        assert!(reply.contains("कोई योजना उपलब्ध नहीं"));
    }

    #[test]
    fn test_incomplete_profile_prompts_next_missing_field() {
        let mut state = ConversationState::new();
        state.current_intent = Some(Intent::ProvideInfo);
        state.profile.set(FieldValue::Age(25));

        let reply = compose(&state, &TurnContext::default());
        assert!(reply.contains("आय"));
    }

    #[test]
    fn test_details_after_applying_reports_application_status() {
        let mut state = ConversationState::new();
        state.current_intent = Some(Intent::GetDetails);
        state.application_result = Some(application());

        let reply = compose(&state, &TurnContext::default());
        assert!(reply.contains("APP_20260830101530_0"));
        assert!(reply.contains("स्थिति"));
    }

    #[test]
    fn test_tool_failure_is_a_polite_apology() {
        let state = ConversationState::new();
        let ctx = TurnContext {
            tool_error: Some(ToolError::UnknownScheme("X".to_string())),
            ..Default::default()
        };

        let reply = compose(&state, &ctx);
        assert!(reply.contains("क्षमा"));
        assert!(!reply.contains("UnknownScheme"));
    }
}
