use crate::cmd::PhaseCommand;
use crate::config::ExecutorConfig;
use crate::error::{ExecError, Phase};
use crate::language::Language;
use crate::probe::Toolchain;
use crate::runner::LanguageAdapter;
use crate::workspace::Workspace;

use once_cell::sync::Lazy;
use regex::Regex;

static PUBLIC_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bpublic\s+(?:(?:abstract|final|sealed|strictfp|static)\s+)*(?:class|interface|enum|record)\s+([A-Za-z_$][A-Za-z0-9_$]*)",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaAdapter;

/// Finds the single top-level public type, which `javac` requires to match
/// the file name.
///
/// Comments, string and char literals and anything nested inside braces are
/// ignored. Zero or several candidates is an error rather than a guess.
pub fn public_type_name(source: &str) -> Result<String, ExecError> {
    let top_level = top_level_text(source);

    let mut names: Vec<&str> = Vec::new();
    for cap in PUBLIC_TYPE.captures_iter(&top_level) {
        let name = cap.get(1).map_or("", |m| m.as_str());
        if !names.contains(&name) {
            names.push(name);
        }
    }

    match names.as_slice() {
        [] => Err(ExecError::MalformedInput(
            "no public class found in Java source".to_owned(),
        )),
        [name] => Ok((*name).to_owned()),
        many => Err(ExecError::MalformedInput(format!(
            "multiple public types found in Java source: {}",
            many.join(", ")
        ))),
    }
}

/// The source with comments and literals blanked and every brace body dropped.
fn top_level_text(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut depth = 0usize;
    let mut i = 0;

    // Backslash escapes apply inside literals only, never to comments.
    let skip_until = |from: usize, end: &str, escapes: bool| -> usize {
        let end: Vec<char> = end.chars().collect();
        let mut j = from;
        while j < chars.len() {
            if escapes && chars[j] == '\\' {
                j += 2;
                continue;
            }
            if chars[j..].starts_with(&end) {
                return j + end.len();
            }
            j += 1;
        }
        chars.len()
    };

    while i < chars.len() {
        let rest = &chars[i..];
        let next = if rest.starts_with(&['/', '/']) {
            skip_until(i + 2, "\n", false)
        } else if rest.starts_with(&['/', '*']) {
            skip_until(i + 2, "*/", false)
        } else if rest.starts_with(&['"', '"', '"']) {
            skip_until(i + 3, "\"\"\"", true)
        } else if rest[0] == '"' {
            skip_until(i + 1, "\"", true)
        } else if rest[0] == '\'' {
            skip_until(i + 1, "'", true)
        } else {
            match rest[0] {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                c if depth == 0 => out.push(c),
                _ => {}
            }
            i += 1;
            continue;
        };
        out.push(' ');
        i = next;
    }
    out
}

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn source_file(&self, source: &str) -> Result<String, ExecError> {
        Ok(format!("{}.java", public_type_name(source)?))
    }

    fn compile_command(
        &self,
        ws: &Workspace,
        toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<Option<PhaseCommand>, ExecError> {
        let mut cmd = PhaseCommand::new(
            Phase::Compile,
            toolchain.require("javac")?,
            config.compile_timeout(),
        );
        cmd.arg("-encoding")
            .arg("UTF-8")
            .arg(ws.source_path())
            .current_dir(ws.dir());
        Ok(Some(cmd))
    }

    fn run_command(
        &self,
        ws: &Workspace,
        toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<PhaseCommand, ExecError> {
        let class_name = ws
            .source_path()
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("staged Java source has no file stem"))?;

        let mut cmd =
            PhaseCommand::new(Phase::Run, toolchain.require("java")?, config.run_timeout());
        cmd.arg("-Dfile.encoding=UTF-8")
            .arg("-cp")
            .arg(".")
            .arg(class_name)
            .current_dir(ws.dir());
        Ok(cmd)
    }
}
