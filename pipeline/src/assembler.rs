use docqa_core::config::DEFAULT_CONTEXT_FIELDS;
use docqa_index::RetrievedChunk;
use tracing::debug;

/// Placed between chunk texts in the assembled context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Joins the text of retrieved chunks into the prompt context.
///
/// Chunk text is read from the first metadata field in `fields` that holds a
/// non-empty string; chunks without text are skipped. With a character budget,
/// any chunk longer than the budget on its own is dropped first, then the
/// lowest-scoring chunks go until the joined text fits. The rest keep their
/// original order.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    fields: Vec<String>,
    max_chars: Option<usize>,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_FIELDS.iter().map(|f| f.to_string()).collect())
    }
}

impl ContextAssembler {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            max_chars: None,
        }
    }

    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn assemble(&self, matches: &[RetrievedChunk]) -> String {
        // (position, score, text) of every match that has text
        let mut kept: Vec<(usize, f32, &str)> = matches
            .iter()
            .enumerate()
            .map(|(pos, m)| (pos, m.score, m.text(&self.fields)))
            .filter(|(_, _, text)| !text.is_empty())
            .collect();

        if let Some(limit) = self.max_chars {
            let before = kept.len();
            // Never cut a chunk; one that cannot fit alone is dropped outright
            kept.retain(|(_, _, text)| text.chars().count() <= limit);
            while joined_len(&kept) > limit {
                // Lowest score goes first; on a tie, the later match
                let Some(drop_at) = (0..kept.len()).min_by(|&a, &b| {
                    kept[a]
                        .1
                        .total_cmp(&kept[b].1)
                        .then_with(|| kept[b].0.cmp(&kept[a].0))
                }) else {
                    break;
                };
                kept.remove(drop_at);
            }
            if kept.len() < before {
                debug!(
                    dropped = before - kept.len(),
                    limit, "Context over budget, dropped chunks"
                );
            }
        }

        kept.iter()
            .map(|(_, _, text)| *text)
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }
}

fn joined_len(kept: &[(usize, f32, &str)]) -> usize {
    let text: usize = kept.iter().map(|(_, _, t)| t.chars().count()).sum();
    let separators = kept.len().saturating_sub(1) * CONTEXT_SEPARATOR.chars().count();
    text + separators
}
