//! Conversation state, turns, intents and pipeline stages

use crate::application::ApplicationRecord;
use crate::error::{Error, Result};
use crate::profile::{ContradictionRecord, Profile};
use crate::scheme::EligibilityOutcome;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a message in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message in the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

/// Closed set of user intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FindSchemes,
    ProvideInfo,
    ApplyScheme,
    GetDetails,
    Greeting,
    Clarify,
    EndConversation,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::FindSchemes => "find_schemes",
            Intent::ProvideInfo => "provide_info",
            Intent::ApplyScheme => "apply_scheme",
            Intent::GetDetails => "get_details",
            Intent::Greeting => "greeting",
            Intent::Clarify => "clarify",
            Intent::EndConversation => "end_conversation",
        }
    }

    /// Intents that may trigger tools and therefore gate on required fields
    pub fn needs_tools(&self) -> bool {
        matches!(
            self,
            Intent::FindSchemes | Intent::ApplyScheme | Intent::GetDetails
        )
    }

    /// Fixed tie-break priority for the keyword classifier; higher wins
    pub fn priority(&self) -> u8 {
        match self {
            Intent::ApplyScheme => 7,
            Intent::FindSchemes => 6,
            Intent::GetDetails => 5,
            Intent::EndConversation => 4,
            Intent::Greeting => 3,
            Intent::Clarify => 2,
            Intent::ProvideInfo => 1,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage of the dialogue controller.
///
/// Every turn is one linear pass: Plan, then optionally Execute and Evaluate,
/// then Respond, then End. There is no backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Plan,
    Execute,
    Evaluate,
    Respond,
    End,
}

/// Static transition map; `End` restarts at `Plan` on the next turn.
static STAGE_TRANSITIONS: Lazy<HashMap<Stage, &'static [Stage]>> = Lazy::new(|| {
    use Stage::*;
    let mut map = HashMap::new();
    map.insert(Plan, &[Execute, Respond] as &[_]);
    map.insert(Execute, &[Evaluate] as &[_]);
    map.insert(Evaluate, &[Respond] as &[_]);
    map.insert(Respond, &[End] as &[_]);
    map.insert(End, &[Plan] as &[_]);
    map
});

impl Stage {
    pub fn allowed_transitions(&self) -> &'static [Stage] {
        STAGE_TRANSITIONS.get(self).copied().unwrap_or(&[])
    }

    pub fn can_transition_to(&self, target: Stage) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Plan => "plan",
            Stage::Execute => "execute",
            Stage::Evaluate => "evaluate",
            Stage::Respond => "respond",
            Stage::End => "end",
        };
        f.write_str(name)
    }
}

/// Full per-thread conversation state.
///
/// Owned and mutated exclusively by the dialogue controller during a turn;
/// persisted between turns by a host-provided [`crate::StateStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub profile: Profile,
    /// Ordered message history, alternating user/assistant
    pub messages: Vec<Turn>,
    /// Completed turns; strictly +1 per `process_turn` call
    pub turn_count: u32,
    pub current_intent: Option<Intent>,
    /// Most recent eligibility result, if the engine has run
    pub eligibility: Option<EligibilityOutcome>,
    /// Scheme locked in for application, once resolved
    pub selected_scheme_id: Option<String>,
    pub application_result: Option<ApplicationRecord>,
    /// Ids already applied to in this conversation (duplicate guard)
    pub applied_schemes: Vec<String>,
    /// Append-only contradiction log, in detection order
    pub contradictions: Vec<ContradictionRecord>,
    /// Stage the controller executes next
    pub next_stage: Stage,
    /// True while internal processing continues, false once a reply is ready
    pub should_continue: bool,
    /// Most recent absorbed tool failure, if any
    pub last_error: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structural validation of a checkpointed state.
    ///
    /// A completed turn contributes exactly one user and one assistant
    /// message, and roles must alternate starting with the user. Anything
    /// else means the checkpoint is corrupted and the turn is rejected.
    pub fn validate(&self) -> Result<()> {
        let expected = self.turn_count as usize * 2;
        if self.messages.len() != expected {
            return Err(Error::InvalidState(format!(
                "history has {} messages but turn_count {} implies {}",
                self.messages.len(),
                self.turn_count,
                expected
            )));
        }

        for (i, turn) in self.messages.iter().enumerate() {
            let expected_role = if i % 2 == 0 {
                TurnRole::User
            } else {
                TurnRole::Assistant
            };
            if turn.role != expected_role {
                return Err(Error::InvalidState(format!(
                    "message {} has role {:?}, expected {:?}",
                    i, turn.role, expected_role
                )));
            }
        }

        Ok(())
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Turn {
            role: TurnRole::User,
            text: text.into(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(Turn {
            role: TurnRole::Assistant,
            text: text.into(),
        });
    }

    /// Last assistant reply, if any
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::Assistant)
            .map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_validates() {
        assert!(ConversationState::new().validate().is_ok());
    }

    #[test]
    fn test_completed_turn_validates() {
        let mut state = ConversationState::new();
        state.push_user("नमस्ते");
        state.push_assistant("नमस्ते!");
        state.turn_count = 1;
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_turn_count_mismatch_rejected() {
        let mut state = ConversationState::new();
        state.push_user("नमस्ते");
        state.turn_count = 3;
        let err = state.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_role_order_mismatch_rejected() {
        let mut state = ConversationState::new();
        state.push_assistant("पहले मैं");
        state.push_user("फिर आप");
        state.turn_count = 1;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_stage_transitions() {
        assert!(Stage::Plan.can_transition_to(Stage::Execute));
        assert!(Stage::Plan.can_transition_to(Stage::Respond));
        assert!(!Stage::Plan.can_transition_to(Stage::Evaluate));
        assert!(Stage::Execute.can_transition_to(Stage::Evaluate));
        assert!(Stage::Respond.can_transition_to(Stage::End));
    }

    #[test]
    fn test_intent_tie_break_priority() {
        assert!(Intent::ApplyScheme.priority() > Intent::FindSchemes.priority());
        assert!(Intent::FindSchemes.priority() > Intent::ProvideInfo.priority());
    }

    #[test]
    fn test_state_serde_round_trip() {
        let mut state = ConversationState::new();
        state.push_user("मेरी उम्र 25 साल है");
        state.push_assistant("धन्यवाद");
        state.turn_count = 1;
        state.profile.age = Some(25);
        state.current_intent = Some(Intent::ProvideInfo);

        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
