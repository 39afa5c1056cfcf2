//! Overlapping-window chunking for oversized files
//!
//! Files longer than the window are split into overlapping line windows so
//! no line sits unseen at a window boundary. Every chunk of a file carries
//! the same structural context (package, import count, first type
//! signature) derived once from the head of the whole file, so each chunk
//! is independently interpretable by the model.

use crate::config::ChunkingConfig;
use crate::scanner::SourceFile;

/// How many leading lines are inspected for structural context
const CONTEXT_SCAN_LINES: usize = 50;

/// Metadata for one chunk of an oversized file. Lines are 1-based and
/// inclusive; indices are contiguous starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub source_file: String,
    pub index: usize,
    pub total: usize,
    pub line_start: usize,
    pub line_end: usize,
    pub context_header: String,
}

/// Structural context shared by every chunk of one file
#[derive(Debug, Clone, Default)]
struct FileContext {
    package: String,
    import_summary: String,
    class_signature: String,
}

impl FileContext {
    fn extract(lines: &[&str]) -> Self {
        let mut package = String::new();
        let mut imports = 0usize;
        let mut class_signature = String::new();

        for line in lines.iter().take(CONTEXT_SCAN_LINES) {
            let trimmed = line.trim();
            if trimmed.starts_with("package ") {
                package = trimmed.to_string();
            } else if trimmed.starts_with("import ") {
                imports += 1;
            } else if trimmed.contains("class ") && !trimmed.starts_with("//") {
                class_signature = trimmed.to_string();
                break;
            }
        }

        let import_summary = if imports > 0 {
            format!("{} imports", imports)
        } else {
            "no imports".to_string()
        };

        Self {
            package,
            import_summary,
            class_signature,
        }
    }
}

/// Splits oversized files into overlapping windows.
pub struct Chunker {
    window_lines: usize,
    overlap_lines: usize,
}

impl Chunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self::with_windows(config.window_lines, config.overlap_lines)
    }

    /// Overlap must be strictly smaller than the window or the walk would
    /// not advance; callers violating that get the overlap clamped.
    pub fn with_windows(window_lines: usize, overlap_lines: usize) -> Self {
        let window_lines = window_lines.max(1);
        Self {
            window_lines,
            overlap_lines: overlap_lines.min(window_lines - 1),
        }
    }

    pub fn needs_chunking(&self, file: &SourceFile) -> bool {
        file.line_count() > self.window_lines
    }

    /// Chunk a file into overlapping windows.
    ///
    /// Restartable by construction: calling this again recomputes the same
    /// sequence. The last chunk is clamped to the file end and the walk
    /// stops there; no empty trailing chunk is emitted.
    pub fn chunk(&self, file: &SourceFile) -> Vec<(ChunkInfo, String)> {
        let lines: Vec<&str> = file.content.lines().collect();
        if lines.is_empty() {
            return Vec::new();
        }

        let step = self.window_lines - self.overlap_lines;
        let total = if lines.len() <= self.window_lines {
            1
        } else {
            1 + (lines.len() - self.window_lines).div_ceil(step)
        };

        let context = FileContext::extract(&lines);
        let mut chunks = Vec::with_capacity(total);
        let mut start = 0usize;
        let mut index = 1usize;

        loop {
            let end = (start + self.window_lines).min(lines.len());
            let info = ChunkInfo {
                source_file: file.rel_path.clone(),
                index,
                total,
                line_start: start + 1,
                line_end: end,
                context_header: self.render_header(file, index, total, start + 1, end, &context),
            };
            chunks.push((info, lines[start..end].join("\n")));

            if end >= lines.len() {
                break;
            }
            start += step;
            index += 1;
        }

        chunks
    }

    fn render_header(
        &self,
        file: &SourceFile,
        index: usize,
        total: usize,
        line_start: usize,
        line_end: usize,
        context: &FileContext,
    ) -> String {
        format!(
            "// FILE: {}\n\
             // CHUNK: {}/{} (Lines {}-{})\n\
             // CONTEXT: This is part of a larger file. Key structural elements:\n\
             // Package: {}\n\
             // Imports: {}\n\
             // Class: {}\n\
             // ---",
            file.rel_path,
            index,
            total,
            line_start,
            line_end,
            context.package,
            context.import_summary,
            context.class_signature,
        )
    }
}
