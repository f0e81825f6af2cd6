/// Character budget for a single document or video transcript.
pub const DOCUMENT_CONTEXT_CHARS: usize = 6_000;
/// Character budget for the combined transcript library.
pub const LIBRARY_CONTEXT_CHARS: usize = 12_000;

pub const INSTRUCTION: &str = "You are a VC-focused AI. ONLY answer using the following context:";

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    pub label: String,
    pub text: String,
}

impl ContextBlock {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Characters the rendered `[label]` header line adds on top of the text.
    pub fn header_chars(&self) -> usize {
        self.label.chars().count() + 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    max_context_chars: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(LIBRARY_CONTEXT_CHARS)
    }
}

impl PromptComposer {
    pub fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    pub fn max_context_chars(&self) -> usize {
        self.max_context_chars
    }

    /// Same budget, widened by the header of `block`, for text that was
    /// already cut to size upstream.
    pub fn with_header_of(&self, block: &ContextBlock) -> Self {
        Self::new(self.max_context_chars + block.header_chars())
    }

    /// Renders the labeled blocks in order, cutting off once the budget is
    /// spent. Labels count towards the budget.
    pub fn context_segment(&self, contexts: &[ContextBlock]) -> String {
        let mut segment = String::new();
        let mut remaining = self.max_context_chars;

        for (idx, block) in contexts.iter().enumerate() {
            if remaining == 0 {
                break;
            }

            let separator = if idx == 0 { "" } else { "\n\n" };
            let rendered = format!("{separator}[{}]\n{}", block.label, block.text);
            let kept = truncate_chars(&rendered, remaining);

            remaining -= kept.chars().count();
            segment.push_str(kept);
        }

        segment
    }

    pub fn compose(&self, question: &str, contexts: &[ContextBlock]) -> String {
        format!(
            "{INSTRUCTION}\n{}\nQuestion: {}",
            self.context_segment(contexts),
            question.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_of(prompt: &str) -> &str {
        let start = INSTRUCTION.len() + 1;
        let end = prompt.rfind("\nQuestion: ").unwrap();
        &prompt[start..end]
    }

    #[test]
    fn test_compose_embeds_blocks_in_order() {
        let composer = PromptComposer::default();
        let prompt = composer.compose(
            " What is founder fit? ",
            &[
                ContextBlock::new("Notion VC Doc", "Founder fit is..."),
                ContextBlock::new("dQw4w9WgXcQ", "Outreach means..."),
            ],
        );

        assert_eq!(
            prompt,
            "You are a VC-focused AI. ONLY answer using the following context:\n\
             [Notion VC Doc]\nFounder fit is...\n\n[dQw4w9WgXcQ]\nOutreach means...\n\
             Question: What is founder fit?"
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = PromptComposer::new(100);
        let blocks = [ContextBlock::new("doc", "text")];

        assert_eq!(
            composer.compose("q", &blocks),
            composer.compose("q", &blocks)
        );
    }

    #[test]
    fn test_context_segment_never_exceeds_cap() {
        let composer = PromptComposer::new(DOCUMENT_CONTEXT_CHARS);
        let long = "é".repeat(DOCUMENT_CONTEXT_CHARS * 2);

        let prompt = composer.compose(
            "q",
            &[
                ContextBlock::new("first", long.clone()),
                ContextBlock::new("second", long),
            ],
        );

        let segment = segment_of(&prompt);
        assert_eq!(segment.chars().count(), DOCUMENT_CONTEXT_CHARS);
        assert!(!segment.contains("[second]"));
    }

    #[test]
    fn test_header_allowance_keeps_pre_cut_text_whole() {
        let block = ContextBlock::new("Transcript library", "x".repeat(LIBRARY_CONTEXT_CHARS));
        let composer = PromptComposer::default();

        let cut = composer.context_segment(std::slice::from_ref(&block));
        assert_eq!(cut.chars().count(), LIBRARY_CONTEXT_CHARS);
        assert!(cut.ends_with(&"x".repeat(100)));
        assert_eq!(cut.matches('x').count(), LIBRARY_CONTEXT_CHARS - 21);

        let whole = composer
            .with_header_of(&block)
            .context_segment(std::slice::from_ref(&block));
        assert_eq!(whole, format!("[Transcript library]\n{}", block.text));
    }

    #[test]
    fn test_empty_context_still_yields_a_block() {
        let prompt = PromptComposer::default().compose("q", &[ContextBlock::new("doc", "")]);
        assert_eq!(segment_of(&prompt), "[doc]\n");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo", 0), "");
    }
}
