//! Citation extraction from generated answers

use regex::Regex;

/// Extract the chunk indices an answer actually cites
///
/// Matches `[chunk N]` tags and keeps only indices that were supplied as
/// context; the model cannot introduce a citation to a chunk it was never
/// shown. When no recognizable tag survives, all supplied chunks are cited,
/// since every one of them was part of the grounding context. The returned
/// indices are ascending and deduplicated.
pub fn extract_cited_chunks(answer: &str, supplied: &[u32]) -> Vec<u32> {
    let pattern = Regex::new(r"(?i)\[chunk\s+(\d+)\]").expect("invalid citation regex");

    let mut cited: Vec<u32> = pattern
        .captures_iter(answer)
        .filter_map(|cap| cap.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
        .filter(|index| supplied.contains(index))
        .collect();

    cited.sort_unstable();
    cited.dedup();

    if cited.is_empty() {
        let mut all = supplied.to_vec();
        all.sort_unstable();
        all.dedup();
        return all;
    }

    cited
}

/// Strip citation tags from an answer for display
pub fn strip_citation_tags(answer: &str) -> String {
    let pattern = Regex::new(r"(?i)\s*\[chunk\s+\d+\]").expect("invalid citation regex");
    pattern.replace_all(answer, "").trim().to_string()
}

/// Truncate a snippet to a maximum length, preferring word boundaries
pub fn truncate_snippet(snippet: &str, max_len: usize) -> String {
    if snippet.len() <= max_len {
        return snippet.to_string();
    }

    let mut end = max_len;
    while end > 0 && !snippet.is_char_boundary(end) {
        end -= 1;
    }

    if let Some(pos) = snippet[..end].rfind(' ') {
        return format!("{}...", &snippet[..pos]);
    }

    format!("{}...", &snippet[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_cited_indices() {
        let cited = extract_cited_chunks("Blue [chunk 2], also [chunk 0].", &[0, 1, 2]);
        assert_eq!(cited, vec![0, 2]);
    }

    #[test]
    fn fabricated_citations_are_dropped() {
        let cited = extract_cited_chunks("See [chunk 0] and [chunk 99].", &[0, 1]);
        assert_eq!(cited, vec![0]);
    }

    #[test]
    fn no_tags_falls_back_to_all_supplied() {
        let cited = extract_cited_chunks("An answer without tags.", &[3, 1]);
        assert_eq!(cited, vec![1, 3]);
    }

    #[test]
    fn only_fabricated_tags_falls_back_to_all_supplied() {
        let cited = extract_cited_chunks("See [chunk 7].", &[0, 1]);
        assert_eq!(cited, vec![0, 1]);
    }

    #[test]
    fn duplicate_tags_deduplicate() {
        let cited = extract_cited_chunks("[chunk 1] twice [chunk 1]", &[0, 1]);
        assert_eq!(cited, vec![1]);
    }

    #[test]
    fn tags_are_case_insensitive() {
        let cited = extract_cited_chunks("[Chunk 1] and [CHUNK 0]", &[0, 1]);
        assert_eq!(cited, vec![0, 1]);
    }

    #[test]
    fn strips_tags_for_display() {
        let stripped = strip_citation_tags("The sky is blue. [chunk 0]");
        assert_eq!(stripped, "The sky is blue.");
    }

    #[test]
    fn truncates_on_word_boundary() {
        let truncated = truncate_snippet("This is a very long snippet that needs truncating", 20);
        assert!(truncated.len() <= 23);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn short_snippet_untouched() {
        assert_eq!(truncate_snippet("short", 20), "short");
    }
}
