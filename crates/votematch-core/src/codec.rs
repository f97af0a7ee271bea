use crate::model::answer::{AnswerMap, AnswerValue};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

/// 3 bits cover the six wire symbols: five option indices plus "unanswered".
pub const BITS_PER_ANSWER: usize = 3;
pub const UNANSWERED_CODE: u8 = AnswerValue::ORDERED.len() as u8;

/// Practical ceiling for a share token carried in a URL query parameter.
pub const MAX_URL_LENGTH: usize = 2000;

#[derive(Debug, Error)]
pub enum AnswerDecodeError {
    #[error("token is not url-safe base64: {0}")]
    Alphabet(#[from] base64::DecodeError),
    #[error("token holds {got} bytes but the question list needs {needed}")]
    Truncated { needed: usize, got: usize },
    #[error("code {code} at position {index} is outside the answer scale")]
    InvalidCode { index: usize, code: u8 },
}

/// Encode one slot per survey question, in survey order, as a URL-safe
/// token. Unanswered slots are carried explicitly so positions survive.
pub fn encode_answers(values: &[Option<AnswerValue>]) -> String {
    let mut bytes = vec![0u8; (values.len() * BITS_PER_ANSWER).div_ceil(8)];
    for (index, slot) in values.iter().enumerate() {
        let code = slot.map(AnswerValue::code).unwrap_or(UNANSWERED_CODE);
        write_code(&mut bytes, index, code);
    }
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a share token against the ordered id list it was produced for.
/// Returns the sparse answer map; unanswered ids are simply absent. Any
/// malformed input yields an error, never a panic, and callers must
/// discard the token rather than apply partial answers.
pub fn decode_answers(
    token: &str,
    question_ids: &[String],
) -> Result<AnswerMap, AnswerDecodeError> {
    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    let needed = (question_ids.len() * BITS_PER_ANSWER).div_ceil(8);
    if bytes.len() < needed {
        return Err(AnswerDecodeError::Truncated {
            needed,
            got: bytes.len(),
        });
    }

    let mut answers = AnswerMap::new();
    for (index, id) in question_ids.iter().enumerate() {
        let code = read_code(&bytes, index);
        if code == UNANSWERED_CODE {
            continue;
        }
        match AnswerValue::from_code(code) {
            Some(value) => {
                answers.insert(id.clone(), value);
            }
            None => return Err(AnswerDecodeError::InvalidCode { index, code }),
        }
    }
    Ok(answers)
}

fn write_code(bytes: &mut [u8], index: usize, code: u8) {
    let start = index * BITS_PER_ANSWER;
    for offset in 0..BITS_PER_ANSWER {
        if code & (1 << (BITS_PER_ANSWER - 1 - offset)) != 0 {
            let bit = start + offset;
            bytes[bit / 8] |= 1 << (7 - (bit % 8));
        }
    }
}

fn read_code(bytes: &[u8], index: usize) -> u8 {
    let start = index * BITS_PER_ANSWER;
    let mut code = 0u8;
    for offset in 0..BITS_PER_ANSWER {
        let bit = start + offset;
        if bytes[bit / 8] & (1 << (7 - (bit % 8))) != 0 {
            code |= 1 << (BITS_PER_ANSWER - 1 - offset);
        }
    }
    code
}
