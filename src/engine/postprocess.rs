//! Output repair for generated text: complete-response truncation repair and
//! teaser trimming. Sentence handling is a deliberate pragmatic heuristic
//! (split on terminal punctuation); abbreviations and decimals are not
//! special-cased.

const TERMINALS: [char; 4] = ['.', '!', '?', '…'];
const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];
const TEASER_MAX_SENTENCES: usize = 3;

/// Drop fenced code blocks from model output; oracles never answer in code.
pub fn strip_code_fences(text: &str) -> String {
    if !text.contains("```") {
        return text.to_string();
    }
    text.split("```")
        .enumerate()
        .filter_map(|(i, segment)| if i % 2 == 0 { Some(segment) } else { None })
        .collect::<Vec<_>>()
        .join(" ")
}

fn ends_complete(text: &str, emojis: &[char]) -> bool {
    match text.chars().last() {
        Some(last) => TERMINALS.contains(&last) || emojis.contains(&last),
        None => false,
    }
}

/// Cut the trailing unterminated fragment, keeping everything up to and
/// including the last sentence-ending mark.
fn truncate_to_last_sentence(text: &str) -> &str {
    match text.rfind(&SENTENCE_ENDINGS[..]) {
        // The endings are ASCII, so idx + 1 is a char boundary.
        Some(idx) => &text[..=idx],
        None => text,
    }
}

/// Repair a full-mode response that may have been cut off mid-sentence.
///
/// Already-complete text (ending in terminal punctuation or one of the
/// persona's emoji) passes through untouched, which makes the repair
/// idempotent. Otherwise the trailing fragment is dropped if enough text
/// survives; as a last resort an ellipsis marks the truncation.
pub fn repair_completion(raw: &str, emojis: &[char], min_len: usize) -> String {
    let stripped = strip_code_fences(raw);
    let text = stripped.trim();

    if ends_complete(text, emojis) {
        return text.to_string();
    }

    let repaired = truncate_to_last_sentence(text).trim_end();
    if repaired.chars().count() >= min_len {
        repaired.to_string()
    } else {
        format!("{}…", text)
    }
}

/// Build a teaser: keep at most the first three sentences, guarantee a
/// terminal mark, then append the persona's fixed hook block.
pub fn teaser(raw: &str, hook_block: &str) -> String {
    let stripped = strip_code_fences(raw);
    let text = stripped.trim();

    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if SENTENCE_ENDINGS.contains(&c) {
            sentences.push(current.trim().to_string());
            current.clear();
            if sentences.len() == TEASER_MAX_SENTENCES {
                break;
            }
        }
    }
    if sentences.len() < TEASER_MAX_SENTENCES && !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }

    let mut out = sentences.join(" ");
    if !ends_complete(&out, &[]) {
        out.push('.');
    }
    out.push_str("\n\n");
    out.push_str(hook_block);
    out
}
