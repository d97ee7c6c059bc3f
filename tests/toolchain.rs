//! These need real compilers; each test returns early when its toolchain is
//! not installed.

mod common;

use common::{toolchain_present, Harness};
use polyexec::{Language, NoInput, Outcome};

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

const C_HELLO: &str = "#include <stdio.h>\nint main() {\n    printf(\"Hello, World!\\n\");\n    return 0;\n}\n";

const CPP_HELLO: &str = "#include <iostream>\nint main() {\n    std::cout << \"Hello, World!\" << std::endl;\n    return 0;\n}\n";

const JAVA_HELLO: &str = "public class Hello {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}\n";

const PY_HELLO: &str = "print(\"Hello, World!\")\n";

fn hello(language: Language) -> &'static str {
    match language {
        Language::C => C_HELLO,
        Language::Cpp => CPP_HELLO,
        Language::Java => JAVA_HELLO,
        Language::Python => PY_HELLO,
    }
}

#[test]
fn t01_hello_all_languages() -> Result<()> {
    let h = Harness::new("t01_hello");
    for language in Language::ALL {
        if !toolchain_present(language) {
            continue;
        }
        let result = h.run(language, hello(language));
        assert!(result.success, "{}: {:?}", language, result);
        assert_eq!(result.outcome, Outcome::RunSucceeded);
        assert_eq!(result.output, "Hello, World!\n");
        assert_eq!(result.error, "");
        assert!(h.workspace_is_clean());
    }
    Ok(())
}

#[test]
fn t02_compile_errors() -> Result<()> {
    let h = Harness::new("t02_compile_errors");
    let broken = [
        (Language::C, "#include <stdio.h>\nint main() {\n    printf(\"hi\\n\")\n    return 0;\n}\n"),
        (Language::Cpp, "int main() {\n    return 0\n}\n"),
        (Language::Java, "public class Broken {\n    public static void main(String[] a) {\n        int x = 1\n    }\n}\n"),
    ];
    for (language, source) in broken {
        if !toolchain_present(language) {
            continue;
        }
        let result = h.run(language, source);
        assert!(!result.success);
        assert_eq!(result.outcome, Outcome::CompileFailed, "{:?}", result);
        assert!(result.error.starts_with("Compilation Error:\n"));
        assert_eq!(result.output, "");
        assert!(h.workspace_is_clean());
    }
    Ok(())
}

#[test]
fn t03_compile_only_has_no_run_side_effects() -> Result<()> {
    let h = Harness::new("t03_compile_only");
    let crashing = [
        (Language::C, "#include <stdlib.h>\nint main() {\n    abort();\n}\n"),
        (Language::Cpp, "#include <cstdlib>\nint main() {\n    std::abort();\n}\n"),
        (
            Language::Java,
            "public class Boom {\n    public static void main(String[] a) {\n        throw new RuntimeException(\"boom\");\n    }\n}\n",
        ),
        (Language::Python, "raise SystemExit(3)\n"),
    ];
    for (language, source) in crashing {
        if !toolchain_present(language) {
            continue;
        }
        let result = h.compile(language, source);
        assert!(result.success, "{}: {:?}", language, result);
        assert_eq!(result.outcome, Outcome::CompileOnlySucceeded);
        assert_eq!(result.output, "");
        assert!(h.workspace_is_clean());
    }
    Ok(())
}

#[test]
fn t04_python_syntax_check() -> Result<()> {
    if !toolchain_present(Language::Python) {
        return Ok(());
    }
    let h = Harness::new("t04_python_syntax");
    let result = h.compile(Language::Python, "def broken(:\n    pass\n");
    assert_eq!(result.outcome, Outcome::CompileFailed);
    assert!(result.error.starts_with("Compilation Error:\n"));
    assert!(result.error.contains("SyntaxError"));

    let marker = h.root.join("side_effect");
    let source = format!("open({:?}, 'w').write('x')\n", marker.display().to_string());
    let result = h.compile(Language::Python, &source);
    assert!(result.success);
    assert!(!marker.exists());
    Ok(())
}

#[test]
fn t05_idempotent() -> Result<()> {
    let h = Harness::new("t05_idempotent");
    for language in Language::ALL {
        if !toolchain_present(language) {
            continue;
        }
        let first = h.run(language, hello(language));
        let second = h.run(language, hello(language));
        assert_eq!(first.success, second.success);
        assert_eq!(first.output, second.output);
    }
    Ok(())
}

#[test]
fn t06_run_timeout() -> Result<()> {
    if !toolchain_present(Language::C) {
        return Ok(());
    }
    let h = Harness::new("t06_run_timeout");
    let t0 = Instant::now();
    let result = h.run(Language::C, "int main() {\n    for (;;) {}\n}\n");
    let elapsed = t0.elapsed().as_secs_f64();

    assert!(!result.success);
    assert_eq!(result.outcome, Outcome::Timeout);
    assert!(result.error.to_lowercase().contains("timeout"));
    assert!(result.execution_time_seconds >= 5.0);
    assert_le!(elapsed, 5.0 + 10.0 + 2.0);
    assert!(h.workspace_is_clean());
    Ok(())
}

#[test]
fn t07_timeout_kills_forked_children() -> Result<()> {
    if !toolchain_present(Language::C) {
        return Ok(());
    }
    let h = Harness::with_config("t07_forked_timeout", |c| c.run_timeout_ms = 1000);
    let marker = h.root.join("orphan_alive");
    let source = format!(
        r#"#include <stdio.h>
#include <unistd.h>
int main() {{
    if (fork() == 0) {{
        sleep(3);
        FILE *f = fopen("{}", "w");
        if (f) fclose(f);
        return 0;
    }}
    for (;;) {{}}
}}
"#,
        marker.display()
    );
    let result = h.run(Language::C, &source);
    assert_eq!(result.outcome, Outcome::Timeout);

    std::thread::sleep(std::time::Duration::from_secs(3));
    assert!(!marker.exists(), "forked child survived the deadline");
    Ok(())
}

#[test]
fn t08_partial_output_on_runtime_error() -> Result<()> {
    if !toolchain_present(Language::C) {
        return Ok(());
    }
    let h = Harness::new("t08_partial_output");
    let source = "#include <stdio.h>\n#include <stdlib.h>\nint main() {\n    printf(\"before failure\\n\");\n    fflush(stdout);\n    abort();\n}\n";
    let result = h.run(Language::C, source);
    assert!(!result.success);
    assert_eq!(result.outcome, Outcome::RunFailed);
    assert!(result.error.starts_with("Runtime Error:\n"));
    assert!(result.error.contains("SIGABRT"), "{}", result.error);
    assert_eq!(result.output, "before failure\n");
    assert!(h.workspace_is_clean());
    Ok(())
}

#[test]
fn t09_stderr_is_surfaced() -> Result<()> {
    if !toolchain_present(Language::Python) {
        return Ok(());
    }
    let h = Harness::new("t09_stderr");
    let result = h.run(Language::Python, "print('partial')\nraise ValueError('bad value')\n");
    assert_eq!(result.outcome, Outcome::RunFailed);
    assert!(result.error.contains("ValueError: bad value"));
    assert_eq!(result.output, "partial\n");
    Ok(())
}

#[test]
fn t10_synthesized_stdin() -> Result<()> {
    if !toolchain_present(Language::Python) {
        return Ok(());
    }
    let h = Harness::new("t10_stdin");
    let source = "name = input()\nage = int(input())\nprint(f'{name} is {age}')\n";
    let result = h.run(Language::Python, source);
    assert!(result.success, "{:?}", result);
    assert_eq!(result.output, "John is 25\n");

    let h = Harness::new("t10_no_stdin").with_input(Arc::new(NoInput));
    let result = h.run(Language::Python, source);
    assert_eq!(result.outcome, Outcome::RunFailed);
    assert!(result.error.contains("EOFError"));
    Ok(())
}

#[test]
fn t11_java_without_public_class() -> Result<()> {
    if !toolchain_present(Language::Java) {
        return Ok(());
    }
    let h = Harness::new("t11_java_malformed");
    let result = h.run(Language::Java, "class Hidden {\n    public static void main(String[] a) {}\n}\n");
    assert_eq!(result.outcome, Outcome::MalformedInput);
    assert!(result.error.contains("no public class found"));
    assert!(h.workspace_is_clean());
    Ok(())
}

#[test]
fn t12_output_is_capped() -> Result<()> {
    if !toolchain_present(Language::Python) {
        return Ok(());
    }
    let h = Harness::with_config("t12_output_cap", |c| c.max_output_bytes = 1024);
    let result = h.run(Language::Python, "import sys\nsys.stdout.write('x' * 4096)\n");
    assert_le!(result.output.len(), 1024);
    assert!(h.workspace_is_clean());
    Ok(())
}

#[test]
fn t13_malformed_requests() -> Result<()> {
    let h = Harness::with_config("t13_malformed", |c| c.max_source_bytes = 16);
    for language in Language::ALL {
        let result = h.run(language, "  \n\t ");
        assert_eq!(result.outcome, Outcome::MalformedInput);
        assert_eq!(result.error, "Error: Empty code provided");

        let result = h.run(language, "int main() { return 0; }");
        assert_eq!(result.outcome, Outcome::MalformedInput);
        assert!(result.error.contains("limit is 16 bytes"));
    }
    assert!(h.workspace_is_clean());
    Ok(())
}

#[test]
fn t14_json_shape() -> Result<()> {
    let h = Harness::new("t14_json_shape");
    let result = h.run(Language::Python, "");
    let value = serde_json::to_value(&result)?;
    let obj = value.as_object().unwrap();

    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["error", "execution_time", "output", "success"]);
    assert_eq!(obj["success"], serde_json::Value::Bool(false));
    assert!(obj["execution_time"].is_f64());
    Ok(())
}

#[test]
fn t15_compile_phase_timeouts() -> Result<()> {
    let h = Harness::with_config("t15_compile_timeouts", |c| {
        c.compile_timeout_ms = 1;
        c.syntax_check_timeout_ms = 1;
    });

    if toolchain_present(Language::Cpp) {
        let result = h.run(Language::Cpp, CPP_HELLO);
        assert_eq!(result.outcome, Outcome::Timeout, "{:?}", result);
        assert_eq!(
            result.error,
            "Compilation timeout - compiler took too long to finish"
        );
        assert_eq!(result.output, "");
        assert!(h.workspace_is_clean());
    }

    if toolchain_present(Language::Python) {
        let result = h.compile(Language::Python, PY_HELLO);
        assert_eq!(result.outcome, Outcome::Timeout, "{:?}", result);
        assert_eq!(
            result.error,
            "Syntax check timeout - parser took too long to finish"
        );
        assert!(h.workspace_is_clean());
    }
    Ok(())
}
