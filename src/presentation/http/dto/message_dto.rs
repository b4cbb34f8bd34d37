use serde::{Deserialize, Serialize};

use crate::application::services::AskOutcome;
use crate::application::use_cases::{AskQuestionResponse, MessagePage};
use crate::domain::entities::{Role, Turn};
use crate::presentation::http::dto::OutcomeKind;

#[derive(Debug, Deserialize)]
pub struct AskRequestDto {
    pub query: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct SinceQueryDto {
    #[serde(default)]
    pub since: usize,
}

#[derive(Debug, Serialize)]
pub struct TurnDto {
    pub role: Role,
    pub text: String,
    pub created_at: String,
}

impl From<&Turn> for TurnDto {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            text: turn.text().to_string(),
            created_at: turn.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponseDto {
    pub kind: OutcomeKind,
    /// Guidance text when the question was not sent.
    pub message: Option<String>,
    pub answer: Option<TurnDto>,
    pub message_count: usize,
}

impl From<AskQuestionResponse> for AskResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        let (kind, message, answer) = match &response.outcome {
            AskOutcome::Guidance(text) => (OutcomeKind::Guidance, Some(text.clone()), None),
            AskOutcome::Answered(turn) => (OutcomeKind::Success, None, Some(TurnDto::from(turn))),
            AskOutcome::Failed(turn) => (OutcomeKind::Error, None, Some(TurnDto::from(turn))),
        };

        Self {
            kind,
            message,
            answer,
            message_count: response.message_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageListResponseDto {
    pub messages: Vec<TurnDto>,
    pub offset: usize,
    pub total: usize,
}

impl From<MessagePage> for MessageListResponseDto {
    fn from(page: MessagePage) -> Self {
        Self {
            messages: page.turns.iter().map(TurnDto::from).collect(),
            offset: page.offset,
            total: page.total,
        }
    }
}
