//! Shared structural scanning for the method-level rules
//!
//! Method boundaries are found by brace-depth balancing from the first `{`
//! after a recognized signature line. This is a documented heuristic: braces
//! inside string/char literals or comments will skew the depth count. The
//! rules built on top of it tolerate the occasional mis-span.

use regex::Regex;
use std::sync::OnceLock;

/// Keywords whose parenthesized form would otherwise match a signature
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch"];

/// A method discovered in a source file. Lines are 1-based and inclusive.
#[derive(Debug, Clone)]
pub struct MethodSpan {
    pub name: String,
    pub params: Vec<String>,
    pub line_start: usize,
    pub line_end: usize,
}

impl MethodSpan {
    /// Body span in lines, signature line included.
    pub fn span_lines(&self) -> usize {
        self.line_end - self.line_start + 1
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

fn signature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Access-modifier-like prefix, a return type soup, a name, and a
        // parenthesized parameter list on one line.
        Regex::new(r"^\s*(?:public|protected|private|static)[\w<>\[\],\s]*\s(\w+)\s*\(([^)]*)\)")
            .expect("valid signature regex")
    })
}

/// Scan a file's lines for method declarations and their brace-balanced
/// extents, in declaration order. Methods whose closing brace is never
/// found (truncated or unbalanced source) are dropped.
pub fn scan_methods(lines: &[&str]) -> Vec<MethodSpan> {
    let re = signature_regex();
    let mut methods = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let captures = match re.captures(lines[i]) {
            Some(c) => c,
            None => {
                i += 1;
                continue;
            }
        };

        let name = captures[1].to_string();
        if CONTROL_KEYWORDS.contains(&name.as_str()) {
            i += 1;
            continue;
        }

        let params: Vec<String> = captures[2]
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        // Balance braces from the signature line onward
        let mut depth: i32 = 0;
        let mut found_open = false;
        let mut j = i;
        let mut closed_at = None;
        while j < lines.len() {
            for ch in lines[j].chars() {
                match ch {
                    '{' => {
                        depth += 1;
                        found_open = true;
                    }
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            if found_open && depth == 0 {
                closed_at = Some(j);
                break;
            }
            j += 1;
        }

        match closed_at {
            Some(end) => {
                methods.push(MethodSpan {
                    name,
                    params,
                    line_start: i + 1,
                    line_end: end + 1,
                });
                // Resume after the method so nested matches are not re-scanned
                i = end + 1;
            }
            None => {
                i += 1;
            }
        }
    }

    methods
}

/// Simple class names pulled from `import a.b.TypeName;` statements.
pub fn imported_types(content: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"import\s+[\w.]+\.(\w+)\s*;").expect("valid regex"));
    re.captures_iter(content).map(|c| c[1].to_string()).collect()
}

/// First class or interface declaration in the file: (name, 1-based line).
pub fn first_type_declaration(lines: &[&str]) -> Option<(String, usize)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\b(?:class|interface|enum)\s+(\w+)").expect("valid regex")
    });
    for (idx, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("//") {
            continue;
        }
        if let Some(c) = re.captures(line) {
            return Some((c[1].to_string(), idx + 1));
        }
    }
    None
}

/// Count field declarations (modifier-prefixed, semicolon-terminated,
/// not a method signature).
pub fn count_fields(lines: &[&str]) -> usize {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*(?:public|protected|private)\s+[\w<>\[\],\s]+\s+\w+\s*(?:=.*)?;")
            .expect("valid regex")
    });
    lines
        .iter()
        .filter(|line| !line.contains('(') && re.is_match(line))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"package com.example;

import java.util.List;

public class Sample {
    private int counter;
    public String name;

    public void shortMethod() {
        counter++;
    }

    public int add(int a, int b, int c) {
        if (a > 0) {
            return a + b + c;
        }
        return 0;
    }
}
"#;

    fn lines(content: &str) -> Vec<&str> {
        content.lines().collect()
    }

    #[test]
    fn test_scan_methods_finds_declarations_in_order() {
        let lines = lines(SAMPLE);
        let methods = scan_methods(&lines);
        let names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["shortMethod", "add"]);
    }

    #[test]
    fn test_method_spans_are_brace_balanced() {
        let lines = lines(SAMPLE);
        let methods = scan_methods(&lines);
        let add = &methods[1];
        assert_eq!(add.param_count(), 3);
        // add() spans its signature through the matching close brace
        assert_eq!(add.span_lines(), 6);
    }

    #[test]
    fn test_control_keywords_not_methods() {
        let src = "public class X {\n    public void run() {\n        if (done) {\n            stop();\n        }\n    }\n}\n";
        let lines: Vec<&str> = src.lines().collect();
        let methods = scan_methods(&lines);
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "run");
    }

    #[test]
    fn test_unclosed_method_dropped() {
        let src = "public class X {\n    public void broken() {\n        open(\n";
        let lines: Vec<&str> = src.lines().collect();
        assert!(scan_methods(&lines).is_empty());
    }

    #[test]
    fn test_imported_types() {
        let imports = imported_types("import java.util.List;\nimport com.foo.Bar;\n");
        assert_eq!(imports, vec!["List", "Bar"]);
    }

    #[test]
    fn test_first_type_declaration_skips_comments() {
        let src = "// class Fake\npublic interface Real {\n}\n";
        let lines: Vec<&str> = src.lines().collect();
        let (name, line) = first_type_declaration(&lines).unwrap();
        assert_eq!(name, "Real");
        assert_eq!(line, 2);
    }

    #[test]
    fn test_count_fields_excludes_methods() {
        let lines = lines(SAMPLE);
        assert_eq!(count_fields(&lines), 2);
    }
}
