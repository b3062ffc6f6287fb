//! 외부 생성형 AI에 요금 절감 분석을 요청하는 부분.
//!
//! 계산 엔진은 이 모듈에 의존하지 않는다. 화면 쪽에서 계산 결과를 받아
//! [`get_advice`]로 넘기면 항상 사용자에게 보여줄 문자열이 돌아온다.

pub mod gemini;
pub mod prompt;

use crate::billing::{BillBreakdown, BillInput, SimulationMode};

pub use gemini::GeminiClient;
pub use prompt::build_prompt;

/// 응답이 비었을 때 보여주는 문구.
pub const EMPTY_ADVICE_MESSAGE: &str = "Non è stato possibile generare l'analisi al momento.";
/// 호출이 실패했을 때 보여주는 문구.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Errore nella connessione con l'AI di BollettaChiara. Riprova tra poco.";

/// AI 호출 중 발생 가능한 오류.
#[derive(Debug, thiserror::Error)]
pub enum AdviceError {
    #[error("API key not configured (environment variable {0})")]
    MissingApiKey(String),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream error ({status}): {message}")]
    Upstream {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// 텍스트 생성 서비스. 프롬프트를 받아 생성된 텍스트(없으면 `None`)를 돌려준다.
pub trait AdviceProvider {
    fn generate(&self, prompt: &str) -> Result<Option<String>, AdviceError>;
}

/// 입력/계산 결과로 프롬프트를 만들어 분석을 요청한다.
///
/// 실패하지 않는다. 빈 응답과 호출 오류는 고정 안내 문구로 바뀐다.
pub fn get_advice(
    provider: &dyn AdviceProvider,
    input: &BillInput,
    breakdown: &BillBreakdown,
    mode: SimulationMode,
) -> String {
    let prompt = build_prompt(input, breakdown, mode);
    tracing::debug!(%mode, prompt_len = prompt.len(), "requesting advice");
    match provider.generate(&prompt) {
        Ok(Some(text)) if !text.is_empty() => text,
        Ok(_) => {
            tracing::warn!(%mode, "advice provider returned no text");
            EMPTY_ADVICE_MESSAGE.to_string()
        }
        Err(err) => {
            tracing::error!(error = %err, "error fetching advice");
            CONNECTION_ERROR_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{compute_breakdown, RateTable};
    use std::cell::RefCell;

    struct Canned {
        reply: Result<Option<String>, ()>,
        seen: RefCell<Vec<String>>,
    }

    impl AdviceProvider for Canned {
        fn generate(&self, prompt: &str) -> Result<Option<String>, AdviceError> {
            self.seen.borrow_mut().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| AdviceError::MissingApiKey("TEST_KEY".into()))
        }
    }

    fn run(reply: Result<Option<String>, ()>) -> (String, usize) {
        let provider = Canned {
            reply,
            seen: RefCell::new(Vec::new()),
        };
        let input = BillInput::default();
        let b = compute_breakdown(&input, SimulationMode::Luce, &RateTable::default());
        let text = get_advice(&provider, &input, &b, SimulationMode::Luce);
        let calls = provider.seen.borrow().len();
        (text, calls)
    }

    #[test]
    fn passes_through_generated_text() {
        let (text, calls) = run(Ok(Some("1. Riduci la potenza".into())));
        assert_eq!(text, "1. Riduci la potenza");
        assert_eq!(calls, 1);
    }

    #[test]
    fn empty_reply_becomes_fallback() {
        assert_eq!(run(Ok(None)).0, EMPTY_ADVICE_MESSAGE);
        assert_eq!(run(Ok(Some(String::new()))).0, EMPTY_ADVICE_MESSAGE);
    }

    #[test]
    fn whitespace_reply_is_passed_through() {
        assert_eq!(run(Ok(Some("  ".into()))).0, "  ");
    }

    #[test]
    fn error_becomes_connection_message() {
        assert_eq!(run(Err(())).0, CONNECTION_ERROR_MESSAGE);
    }
}
