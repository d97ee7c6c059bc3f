use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:int|float|double|char|long|short)\s+([a-zA-Z_][a-zA-Z0-9_]*(?:\s*,\s*[a-zA-Z_][a-zA-Z0-9_]*)*)")
        .unwrap()
});

static SCANF_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"scanf\s*\([^,]+,\s*&([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());

static PRINTF_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"printf\s*\([^)]*,\s*([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).unwrap());

static STDIO_INCLUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\s*include\s*<stdio\.h>").unwrap());

static MAIN_FUNCTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bint\s+main\s*\(").unwrap());

fn is_skipped(line: &str) -> bool {
    line.starts_with("//") || line.starts_with('#') || line.starts_with("/*")
}

/// Returns gcc-style findings; empty means the source looks compilable.
pub fn validate(source: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let declared: Vec<&str> = DECLARATION
        .captures_iter(source)
        .filter_map(|cap| cap.get(1))
        .flat_map(|m| m.as_str().split(','))
        .map(str::trim)
        .collect();

    for (i, line) in source.lines().enumerate() {
        let line = line.trim();
        if is_skipped(line) {
            continue;
        }
        let scanned = SCANF_ADDRESS.captures_iter(line).map(|cap| cap.get(1));
        // Only the last argument of each printf call is inspected, and never
        // text inside a format string.
        let unquoted = STRING_LITERAL.replace_all(line, "\"\"");
        let printed = PRINTF_ARG
            .captures_iter(&unquoted)
            .map(|cap| cap.get(1))
            .filter(|m| m.map_or(false, |m| !matches!(m.as_str(), "printf" | "scanf")));
        for var in scanned.chain(printed).flatten().map(|m| m.as_str()) {
            if !declared.iter().any(|&d| d == var) {
                errors.push(format!(
                    "Line {}: '{}' undeclared (first use in this function)",
                    i + 1,
                    var
                ));
            }
        }
    }

    if source.matches('{').count() != source.matches('}').count() {
        errors.push("Mismatched braces { }".to_owned());
    }
    if source.matches('(').count() != source.matches(')').count() {
        errors.push("Mismatched parentheses ( )".to_owned());
    }

    for (i, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || is_skipped(line) {
            continue;
        }
        let is_statement = ["printf", "scanf", "return"].iter().any(|kw| line.contains(kw));
        let terminated = line.ends_with(';') || line.ends_with('{') || line.ends_with('}');
        if is_statement && !terminated {
            errors.push(format!("Line {}: expected ';' before end of line", i + 1));
        }
    }

    if errors.is_empty() {
        if !STDIO_INCLUDE.is_match(source) {
            errors.push("Missing #include <stdio.h> header".to_owned());
        }
        if !MAIN_FUNCTION.is_match(source) {
            errors.push("Missing main() function".to_owned());
        }
    }

    errors
}
