use once_cell::sync::Lazy;
use regex::Regex;

static PRINTF_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"printf\s*\(\s*"([^"]*)"(?:\s*,\s*([^)]*))?\s*\)"#).unwrap());

static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static COUNTING_BOUND: Lazy<Regex> = Lazy::new(|| Regex::new(r"i\s*<=?\s*[n5]").unwrap());

const NO_OUTPUT: &str = "Program executed successfully (no output)";

/// The exercises whose transcripts are known ahead of time, in priority order.
///
/// Closed on purpose: each entry corresponds to one shipped sample task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    HelloWorld,
    Greeting,
    Arithmetic,
    EvenOdd,
    CountingLoop,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::HelloWorld,
        Scenario::Greeting,
        Scenario::Arithmetic,
        Scenario::EvenOdd,
        Scenario::CountingLoop,
    ];

    pub fn detect(source: &str) -> Option<Self> {
        let folded = source.to_lowercase();
        Self::ALL.into_iter().find(|s| s.matches(source, &folded))
    }

    fn matches(self, source: &str, folded: &str) -> bool {
        let reads = source.contains("scanf");
        match self {
            Scenario::HelloWorld => source.contains("Hello, World!"),
            Scenario::Greeting => reads && folded.contains("name") && folded.contains("age"),
            Scenario::Arithmetic => reads && source.contains("num1") && source.contains("num2"),
            Scenario::EvenOdd => {
                reads
                    && source.contains("number")
                    && (source.contains("even") || source.contains("odd"))
            }
            Scenario::CountingLoop => {
                (source.contains("for") || source.contains("while"))
                    && COUNTING_BOUND.is_match(source)
            }
        }
    }

    pub fn transcript(self) -> &'static str {
        match self {
            Scenario::HelloWorld => "Hello, World!",
            Scenario::Greeting => {
                "Enter your name: John\nEnter your age: 25\nHello John, you are 25 years old!"
            }
            Scenario::Arithmetic => {
                "Enter first number: 10\nEnter second number: 5\nSum: 15\nDifference: 5\nProduct: 50"
            }
            Scenario::EvenOdd => "Enter a number: 7\n7 is odd",
            Scenario::CountingLoop => "Enter a number: 5\n1\n2\n3\n4\n5",
        }
    }
}

/// Guesses what a validated C program prints.
pub fn predict(source: &str) -> String {
    if let Some(scenario) = Scenario::detect(source) {
        return scenario.transcript().to_owned();
    }

    let output = substitute_printf(source);
    let output = output.trim();
    if output.is_empty() {
        NO_OUTPUT.to_owned()
    } else {
        output.to_owned()
    }
}

fn substitute_printf(source: &str) -> String {
    let mut output = String::new();

    for cap in PRINTF_CALL.captures_iter(source) {
        let format = &cap[1];
        let args = cap.get(2).map_or("", |m| m.as_str());

        let mut line = format.replace("\\n", "\n");

        if line.contains("%s") {
            let word = if args.to_lowercase().contains("name") {
                "John"
            } else {
                "string"
            };
            line = line.replace("%s", word);
        }

        if line.contains("%d") {
            let number = NUMERAL.find(args).map_or("42", |m| m.as_str());
            line = line.replace("%d", number);
        }

        line = line.replace("%f", "3.14");

        output.push_str(&line);
    }

    output
}
