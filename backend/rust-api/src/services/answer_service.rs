use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Unicode-aware: accented letters count as word characters and survive
    // normalization, so answers differing only by diacritics stay distinct.
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
}

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Lowercases, trims, and strips punctuation. Accents are kept as-is.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_WORD.replace_all(&lowered, "").into_owned()
}

/// Compares a submitted answer against the canonical one using several
/// fallback heuristics, from strictest to loosest:
///
/// 1. exact match after trimming whitespace;
/// 2. match after normalization (case, whitespace, punctuation);
/// 3. match after trimming whitespace and trailing punctuation only;
/// 4. normalized submission contained in the normalized canonical answer;
/// 5. normalized canonical answer contained in the normalized submission.
///
/// The containment rules are deliberately lenient towards free-text input:
/// a partial answer that names the right thing passes.
pub fn answers_match(user_answer: &str, correct_answer: &str) -> bool {
    if user_answer.is_empty() || correct_answer.is_empty() {
        return false;
    }

    if user_answer.trim() == correct_answer.trim() {
        return true;
    }

    let user_norm = normalize(user_answer);
    let correct_norm = normalize(correct_answer);
    if user_norm == correct_norm {
        return true;
    }

    if user_answer.trim().trim_end_matches(TRAILING_PUNCTUATION)
        == correct_answer.trim().trim_end_matches(TRAILING_PUNCTUATION)
    {
        return true;
    }

    correct_norm.contains(&user_norm) || user_norm.contains(&correct_norm)
}
