//! Retrieval query expansion for short questions.
//!
//! Terse questions ("what is X?") embed poorly against paragraph-length chunks, so
//! questions under a small word count are rewritten with an intent-matched suffix
//! before embedding. The rewrite is pure string work; the original question is what
//! callers see echoed in the response.

const SHORT_QUERY_WORD_LIMIT: usize = 5;

/// Rewrite short or vague questions into richer retrieval queries.
///
/// Questions with at least [`SHORT_QUERY_WORD_LIMIT`] words pass through unchanged.
pub fn expand_query(question: &str) -> String {
    let words = question.split_whitespace().count();
    if words >= SHORT_QUERY_WORD_LIMIT {
        return question.to_string();
    }

    let base = question.trim_end_matches(['?', '!', '.', ' ']);
    let lower = base.to_lowercase();

    let expanded = if lower.starts_with("what is ") || lower.starts_with("what are ") {
        let topic = base.splitn(3, ' ').nth(2).unwrap_or(base);
        format!("{question} definition and explanation of {topic}")
    } else if lower.starts_with("how do")
        || lower.starts_with("how can")
        || lower.starts_with("how to")
    {
        let topic = base.splitn(3, ' ').nth(2).unwrap_or(base);
        format!("{question} steps to {topic}")
    } else if lower.starts_with("can i") || lower.starts_with("should i") {
        format!("{question} guidelines and recommendations")
    } else {
        format!("{question} details and explanation")
    };

    tracing::debug!(original = question, expanded = %expanded, "Query expanded");
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_questions_pass_through_unchanged() {
        let question = "how should daily disposable lenses be stored overnight";
        assert_eq!(expand_query(question), question);
    }

    #[test]
    fn definition_questions_gain_definition_suffix() {
        let expanded = expand_query("what is astigmatism?");
        assert!(expanded.starts_with("what is astigmatism?"));
        assert!(expanded.contains("definition and explanation"));
    }

    #[test]
    fn how_questions_gain_steps_suffix() {
        let expanded = expand_query("how to clean");
        assert!(expanded.contains("steps to"));
    }

    #[test]
    fn permission_questions_gain_guidelines_suffix() {
        let expanded = expand_query("can I swim?");
        assert!(expanded.ends_with("guidelines and recommendations"));
    }

    #[test]
    fn other_short_questions_gain_generic_suffix() {
        let expanded = expand_query("lens care");
        assert!(expanded.ends_with("details and explanation"));
    }

    #[test]
    fn expansion_is_deterministic() {
        assert_eq!(expand_query("what is this"), expand_query("what is this"));
    }
}
