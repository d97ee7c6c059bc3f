use crate::cmd::PhaseCommand;
use crate::config::ExecutorConfig;
use crate::error::{ExecError, Phase};
use crate::language::Language;
use crate::probe::Toolchain;
use crate::runner::LanguageAdapter;
use crate::workspace::Workspace;

/// Compiles the file to a code object without executing it or writing bytecode.
const PARSE_ONLY: &str =
    "import sys; compile(open(sys.argv[1], encoding='utf-8').read(), sys.argv[1], 'exec')";

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonAdapter;

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn source_file(&self, _source: &str) -> Result<String, ExecError> {
        Ok("main.py".to_owned())
    }

    fn compile_command(
        &self,
        _ws: &Workspace,
        _toolchain: &Toolchain,
        _config: &ExecutorConfig,
    ) -> Result<Option<PhaseCommand>, ExecError> {
        Ok(None)
    }

    fn syntax_check_command(
        &self,
        ws: &Workspace,
        toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<Option<PhaseCommand>, ExecError> {
        let mut cmd = PhaseCommand::new(
            Phase::SyntaxCheck,
            toolchain.require("python")?,
            config.syntax_check_timeout(),
        );
        cmd.arg("-B")
            .arg("-c")
            .arg(PARSE_ONLY)
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
        let mut cmd = PhaseCommand::new(
            Phase::Run,
            toolchain.require("python")?,
            config.run_timeout(),
        );
        cmd.arg("-B").arg(ws.source_path()).current_dir(ws.dir());
        Ok(cmd)
    }
}
