use crate::cmd::PhaseCommand;
use crate::config::ExecutorConfig;
use crate::error::{ExecError, Phase};
use crate::language::Language;
use crate::probe::Toolchain;
use crate::runner::LanguageAdapter;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, Default)]
pub struct CAdapter;

impl LanguageAdapter for CAdapter {
    fn language(&self) -> Language {
        Language::C
    }

    fn source_file(&self, _source: &str) -> Result<String, ExecError> {
        Ok("main.c".to_owned())
    }

    fn compile_command(
        &self,
        ws: &Workspace,
        toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<Option<PhaseCommand>, ExecError> {
        let mut cmd = PhaseCommand::new(
            Phase::Compile,
            toolchain.require("cc")?,
            config.compile_timeout(),
        );
        cmd.arg(ws.source_path())
            .arg("-o")
            .arg(ws.artifact_path("main"));
        Ok(Some(cmd))
    }

    fn run_command(
        &self,
        ws: &Workspace,
        _toolchain: &Toolchain,
        config: &ExecutorConfig,
    ) -> Result<PhaseCommand, ExecError> {
        let mut cmd =
            PhaseCommand::new(Phase::Run, ws.artifact_path("main"), config.run_timeout());
        cmd.current_dir(ws.dir());
        Ok(cmd)
    }
}
