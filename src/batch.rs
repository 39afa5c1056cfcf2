//! Token-budget batch planning
//!
//! Packs file and chunk payloads into request batches under a character
//! budget (a cheap proxy for tokens), preserving insertion order. Each
//! batch records which detected smells its payload covers so the prompt
//! can ask about the right findings.

use crate::chunker::ChunkInfo;
use crate::config::BatchingConfig;
use crate::models::Smell;

/// One payload headed for the model: a whole file or one chunk of it.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub file_path: String,
    pub content: String,
    pub chunk: Option<ChunkInfo>,
}

impl BatchItem {
    pub fn whole_file(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
            chunk: None,
        }
    }

    pub fn from_chunk(info: ChunkInfo, content: String) -> Self {
        Self {
            file_path: info.source_file.clone(),
            content,
            chunk: Some(info),
        }
    }

    /// Display label, disambiguated per chunk.
    pub fn label(&self) -> String {
        match &self.chunk {
            Some(info) => format!("{} (chunk {}/{})", self.file_path, info.index, info.total),
            None => self.file_path.clone(),
        }
    }

    /// The exact text this item contributes to a prompt. Budget accounting
    /// and prompt assembly both go through here so they can never disagree.
    pub fn render(&self) -> String {
        match &self.chunk {
            Some(info) => format!(
                "\n// === FILE: {} ===\n{}\n{}\n",
                self.label(),
                info.context_header,
                self.content
            ),
            None => format!("\n// === FILE: {} ===\n{}\n", self.file_path, self.content),
        }
    }

    pub fn size_chars(&self) -> usize {
        self.render().chars().count()
    }
}

/// A planned model request: payload items plus the indices (into the run's
/// smell list) of the findings they cover.
#[derive(Debug, Clone)]
pub struct Batch {
    pub items: Vec<BatchItem>,
    pub linked_smells: Vec<usize>,
    pub size_chars: usize,
}

impl Batch {
    pub fn file_paths(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.file_path.as_str()).collect()
    }
}

/// Greedy first-fit packer over a character budget.
///
/// The budget covers the whole assembled prompt, not just the source
/// payload, so callers reserve the instruction template and smell report
/// up front via [`BatchPlanner::with_overhead`]; packing then runs against
/// the remainder.
pub struct BatchPlanner {
    budget_chars: usize,
    overhead_chars: usize,
}

impl BatchPlanner {
    pub fn new(config: &BatchingConfig) -> Self {
        Self {
            budget_chars: config.budget_chars,
            overhead_chars: 0,
        }
    }

    /// Reserve characters for everything the prompt adds around the source
    /// payload (see [`crate::ai::PromptBuilder::overhead_chars`]).
    pub fn with_overhead(mut self, overhead_chars: usize) -> Self {
        self.overhead_chars = overhead_chars;
        self
    }

    /// Pack items into batches in insertion order. An item larger than the
    /// whole payload budget still ships, alone in its own batch. Every item
    /// lands in exactly one batch.
    pub fn plan(&self, items: Vec<BatchItem>, smells: &[Smell]) -> Vec<Batch> {
        let budget = self.budget_chars.saturating_sub(self.overhead_chars);
        let mut batches: Vec<Batch> = Vec::new();
        let mut current: Vec<BatchItem> = Vec::new();
        let mut current_size = 0usize;

        for item in items {
            let size = item.size_chars();

            if size > budget {
                if !current.is_empty() {
                    batches.push(self.finish(std::mem::take(&mut current), current_size, smells));
                    current_size = 0;
                }
                batches.push(self.finish(vec![item], size, smells));
                continue;
            }

            if current_size + size > budget && !current.is_empty() {
                batches.push(self.finish(std::mem::take(&mut current), current_size, smells));
                current_size = 0;
            }
            current_size += size;
            current.push(item);
        }

        if !current.is_empty() {
            batches.push(self.finish(current, current_size, smells));
        }

        batches
    }

    fn finish(&self, items: Vec<BatchItem>, size_chars: usize, smells: &[Smell]) -> Batch {
        let mut linked: Vec<usize> = smells
            .iter()
            .enumerate()
            .filter(|(_, s)| items.iter().any(|i| i.file_path == s.file_path))
            .map(|(idx, _)| idx)
            .collect();

        // A batch with no matching smells still asks about all of them
        // rather than shipping code the model has no questions for.
        if linked.is_empty() {
            linked = (0..smells.len()).collect();
        }

        Batch {
            items,
            linked_smells: linked,
            size_chars,
        }
    }
}
