use crate::language::Language;

use std::fmt;

/// Produces the stdin fed to a submitted program.
pub trait InputSynthesizer: Send + Sync + fmt::Debug {
    fn synthesize(&self, language: Language, source: &str) -> String;
}

/// Feeds nothing; programs reading stdin see EOF immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSynthesizer for NoInput {
    fn synthesize(&self, _: Language, _: &str) -> String {
        String::new()
    }
}

/// Guesses stdin from keyword cues in the source.
///
/// The rule table mirrors the interactive exercises shipped with the
/// platform: it recognises their variable names and format strings and
/// nothing else. Arbitrary programs get empty or wrong input.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateInput;

#[derive(Debug, Clone, Copy)]
enum Cue {
    /// Every word present, compared case-insensitively.
    AllFolded(&'static [&'static str]),
    /// Every word present, compared exactly.
    All(&'static [&'static str]),
}

impl Cue {
    fn matches(self, source: &str, folded: &str) -> bool {
        match self {
            Cue::AllFolded(words) => words.iter().all(|w| folded.contains(w)),
            Cue::All(words) => words.iter().all(|w| source.contains(w)),
        }
    }
}

struct InputRule {
    cue: Cue,
    payload: &'static str,
}

const RULES: &[InputRule] = &[
    InputRule {
        cue: Cue::AllFolded(&["name", "age"]),
        payload: "John\n25\n",
    },
    InputRule {
        cue: Cue::All(&["num1", "num2"]),
        payload: "10\n5\n",
    },
    InputRule {
        cue: Cue::All(&["number"]),
        payload: "7\n",
    },
    InputRule {
        cue: Cue::All(&["%d"]),
        payload: "42\n",
    },
    InputRule {
        cue: Cue::All(&["%f"]),
        payload: "3.14\n",
    },
    InputRule {
        cue: Cue::All(&["%s"]),
        payload: "Hello\n",
    },
];

fn input_idioms(language: Language) -> &'static [&'static str] {
    match language {
        Language::C => &["scanf", "fgets", "getchar", "gets("],
        Language::Cpp => &["cin", "getline", "scanf"],
        Language::Java => &["Scanner", "BufferedReader", "readLine"],
        Language::Python => &["input(", "sys.stdin"],
    }
}

impl TemplateInput {
    pub fn reads_stdin(language: Language, source: &str) -> bool {
        input_idioms(language).iter().any(|idiom| source.contains(idiom))
    }
}

impl InputSynthesizer for TemplateInput {
    fn synthesize(&self, language: Language, source: &str) -> String {
        if !Self::reads_stdin(language, source) {
            return String::new();
        }
        let folded = source.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.cue.matches(source, &folded))
            .map(|rule| rule.payload.to_owned())
            .unwrap_or_default()
    }
}
