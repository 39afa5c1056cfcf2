//! Smell detection and suggestion pipeline
//!
//! Orchestrates the full run:
//! 1. Walk source files
//! 2. Run the static smell rules and collect per-file metrics
//! 3. Prioritize findings by severity and cap the suggestion workload
//! 4. Chunk oversized files and pack everything into budgeted batches
//! 5. Call the model per batch and decode suggestions
//!
//! Per-file and per-batch failures are recorded on the report instead of
//! aborting the run; the status reflects whether anything was lost.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::ai::{
    CompletionApi, CompletionRequest, Pacer, PromptBuilder, ResilientCaller, ResponseParser,
    SmellEntry,
};
use crate::batch::{Batch, BatchItem, BatchPlanner};
use crate::chunker::Chunker;
use crate::config::Config;
use crate::detectors::SmellEngine;
use crate::models::{RunReport, RunStatus, Severity, Smell, SmellSummary};
use crate::scanner::Scanner;

/// Default cap on how many smells get a suggestion per run
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Full detection and suggestion pipeline.
pub struct Pipeline {
    root: PathBuf,
    config: Config,
    scan_path: Option<PathBuf>,
    max_files: Option<usize>,
    max_suggestions: usize,
    min_severity: Option<Severity>,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            scan_path: None,
            max_files: None,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            min_severity: None,
        }
    }

    /// Restrict scanning to a subdirectory of the root.
    pub fn with_scan_path(mut self, scan_path: impl Into<PathBuf>) -> Self {
        self.scan_path = Some(scan_path.into());
        self
    }

    /// Stop after this many files (useful for smoke runs on large repos).
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Only request suggestions for smells at or above this severity.
    pub fn with_min_severity(mut self, min_severity: Severity) -> Self {
        self.min_severity = Some(min_severity);
        self
    }

    /// Detection-only run: scan, detect, summarize. Never touches the
    /// network.
    pub fn detect(&self) -> Result<DetectionOutcome> {
        let scanner = Scanner::new(&self.root, self.config.scanner.clone())
            .with_scan_path(self.scan_path.clone())
            .with_max_files(self.max_files);

        let engine = SmellEngine::new(&self.config.thresholds);
        let mut report = RunReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            repo_path: self.root.display().to_string(),
            ..Default::default()
        };
        let mut contents: HashMap<String, String> = HashMap::new();

        let paths = scanner.collect()?;
        info!(files = paths.len(), "scanning source files");

        for path in &paths {
            let Some(file) = scanner.read(path) else {
                report
                    .errors
                    .push(format!("failed to read {}", path.display()));
                continue;
            };

            report.files_scanned += 1;
            report.total_lines += file.line_count();
            report.smells.extend(engine.detect(&file));
            report.metrics.push(engine.metrics(&file));
            contents.insert(file.rel_path.clone(), file.content);
        }

        report.summary = SmellSummary::from_smells(&report.smells);
        report.finalize_status();
        info!(
            smells = report.smells.len(),
            files = report.files_scanned,
            "detection finished"
        );

        Ok(DetectionOutcome { report, contents })
    }

    /// Full run: detection followed by batched suggestion calls.
    pub fn suggest<C: CompletionApi, P: Pacer>(
        &self,
        caller: &mut ResilientCaller<C, P>,
    ) -> Result<RunReport> {
        let DetectionOutcome {
            mut report,
            contents,
        } = self.detect()?;

        if report.smells.is_empty() {
            info!("no smells detected, skipping suggestion calls");
            return Ok(report);
        }

        let targets = self.prioritize(&report.smells);
        if targets.is_empty() {
            info!("no smells at or above the requested severity");
            return Ok(report);
        }

        let target_smells: Vec<Smell> = targets
            .iter()
            .map(|&idx| report.smells[idx].clone())
            .collect();
        let items = self.payload_items(&target_smells, &contents);
        // Reserve room for the instruction template and the worst-case
        // smell report so the assembled prompt never overruns the budget.
        let all_entries: Vec<SmellEntry> = target_smells
            .iter()
            .map(|smell| SmellEntry {
                smell,
                snippet: self.snippet_for(smell, &contents),
            })
            .collect();
        let planner = BatchPlanner::new(&self.config.batching)
            .with_overhead(PromptBuilder::overhead_chars(&all_entries));
        drop(all_entries);
        let batches = planner.plan(items, &target_smells);
        info!(
            batches = batches.len(),
            smells = target_smells.len(),
            "requesting suggestions"
        );

        let mut filled: HashSet<usize> = HashSet::new();
        let last = batches.len().saturating_sub(1);

        for (batch_no, batch) in batches.iter().enumerate() {
            match self.run_batch(caller, batch, &target_smells, &contents) {
                Ok(suggestions) => {
                    for mut suggestion in suggestions {
                        // remap batch-local position to the run's smell list
                        let global = targets[batch.linked_smells[suggestion.smell_index]];
                        if !filled.insert(global) {
                            continue;
                        }
                        suggestion.smell_index = global;
                        suggestion.id = uuid::Uuid::new_v4().to_string();
                        report.suggestions.push(suggestion);
                    }
                }
                Err(err) => {
                    warn!("batch {} failed: {err}", batch_no + 1);
                    report.errors.push(format!("batch {}: {err}", batch_no + 1));
                }
            }

            if batch_no != last {
                caller.cooldown();
            }
        }

        if report.suggestions.is_empty() && !report.errors.is_empty() {
            report.status = RunStatus::Error;
        } else {
            report.finalize_status();
        }
        Ok(report)
    }

    /// Severity-first ordering (HIGH, MEDIUM, LOW; detection order within a
    /// tier), filtered by the minimum severity, capped at the suggestion
    /// budget. Returns indices into the report's smell list.
    fn prioritize(&self, smells: &[Smell]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..smells.len())
            .filter(|&i| match self.min_severity {
                Some(min) => smells[i].severity >= min,
                None => true,
            })
            .collect();
        indices.sort_by_key(|&i| std::cmp::Reverse(smells[i].severity));
        indices.truncate(self.max_suggestions);
        indices
    }

    /// Payload for the batch planner: each file carrying a target smell,
    /// once, in first-smell order; oversized files become chunk items.
    fn payload_items(
        &self,
        target_smells: &[Smell],
        contents: &HashMap<String, String>,
    ) -> Vec<BatchItem> {
        let chunker = Chunker::new(&self.config.chunking);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut items = Vec::new();

        for smell in target_smells {
            if !seen.insert(&smell.file_path) {
                continue;
            }
            let Some(content) = contents.get(&smell.file_path) else {
                continue;
            };
            let file = crate::scanner::SourceFile::new(smell.file_path.clone(), content.clone());
            if chunker.needs_chunking(&file) {
                for (info, chunk_content) in chunker.chunk(&file) {
                    items.push(BatchItem::from_chunk(info, chunk_content));
                }
            } else {
                items.push(BatchItem::whole_file(&smell.file_path, content.clone()));
            }
        }

        items
    }

    fn snippet_for(&self, smell: &Smell, contents: &HashMap<String, String>) -> String {
        contents
            .get(&smell.file_path)
            .map(|content| PromptBuilder::extract_snippet(content, smell.line_start, smell.line_end))
            .unwrap_or_else(|| "(code unavailable)".to_string())
    }

    fn run_batch<C: CompletionApi, P: Pacer>(
        &self,
        caller: &mut ResilientCaller<C, P>,
        batch: &Batch,
        target_smells: &[Smell],
        contents: &HashMap<String, String>,
    ) -> crate::ai::AiResult<Vec<crate::models::Suggestion>> {
        let entries: Vec<SmellEntry> = batch
            .linked_smells
            .iter()
            .map(|&idx| {
                let smell = &target_smells[idx];
                SmellEntry {
                    smell,
                    snippet: self.snippet_for(smell, contents),
                }
            })
            .collect();

        let prompt = PromptBuilder::batch_prompt(batch, &entries);
        let request = CompletionRequest {
            system: PromptBuilder::SYSTEM,
            prompt: &prompt,
            temperature: self.config.llm.temperature,
            max_tokens: self.config.llm.max_output_tokens,
        };

        let raw = caller.call(&request)?;
        ResponseParser::parse(&raw, &entries)
    }
}

/// Detection results plus the file contents needed to build prompts.
pub struct DetectionOutcome {
    pub report: RunReport,
    pub contents: HashMap<String, String>,
}

impl DetectionOutcome {
    pub fn into_report(self) -> RunReport {
        self.report
    }
}

/// Convenience for detection-only callers.
pub fn detect(root: &Path, config: Config) -> Result<RunReport> {
    Ok(Pipeline::new(root, config).detect()?.into_report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetectionMethod;

    fn smell(path: &str, severity: Severity) -> Smell {
        Smell {
            smell_type: "Large Class".to_string(),
            file_path: path.to_string(),
            location: "X".to_string(),
            line_start: 1,
            line_end: 5,
            severity,
            description: String::new(),
            detection_method: DetectionMethod::Static,
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new("/tmp/none", Config::default())
    }

    #[test]
    fn test_prioritize_orders_by_severity_and_caps() {
        let smells = vec![
            smell("a", Severity::Low),
            smell("b", Severity::High),
            smell("c", Severity::Medium),
            smell("d", Severity::High),
        ];
        let p = pipeline().with_max_suggestions(3);
        assert_eq!(p.prioritize(&smells), vec![1, 3, 2]);
    }

    #[test]
    fn test_prioritize_is_stable_within_a_tier() {
        let smells = vec![
            smell("a", Severity::Medium),
            smell("b", Severity::Medium),
            smell("c", Severity::Medium),
        ];
        assert_eq!(pipeline().prioritize(&smells), vec![0, 1, 2]);
    }

    #[test]
    fn test_prioritize_honors_min_severity() {
        let smells = vec![
            smell("a", Severity::Low),
            smell("b", Severity::High),
            smell("c", Severity::Medium),
        ];
        let p = pipeline().with_min_severity(Severity::Medium);
        assert_eq!(p.prioritize(&smells), vec![1, 2]);
    }

    #[test]
    fn test_payload_items_deduplicate_files() {
        let smells = vec![
            smell("A.java", Severity::High),
            smell("A.java", Severity::Low),
            smell("B.java", Severity::Medium),
        ];
        let mut contents = HashMap::new();
        contents.insert("A.java".to_string(), "class A {}".to_string());
        contents.insert("B.java".to_string(), "class B {}".to_string());

        let items = pipeline().payload_items(&smells, &contents);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file_path, "A.java");
        assert_eq!(items[1].file_path, "B.java");
    }

    #[test]
    fn test_payload_items_chunk_oversized_files() {
        let smells = vec![smell("Big.java", Severity::High)];
        let big: Vec<String> = (0..1200).map(|i| format!("line {i}")).collect();
        let mut contents = HashMap::new();
        contents.insert("Big.java".to_string(), big.join("\n"));

        let items = pipeline().payload_items(&smells, &contents);
        assert!(items.len() > 1);
        assert!(items.iter().all(|i| i.chunk.is_some()));
    }

    #[test]
    fn test_payload_skips_missing_content() {
        let smells = vec![smell("Gone.java", Severity::High)];
        let items = pipeline().payload_items(&smells, &HashMap::new());
        assert!(items.is_empty());
    }
}
