use agent_deploy::config::Config;
use agent_deploy::error::{AgentDeployError, Result};
use agent_deploy::pipeline::{Pipeline, Stage};
use agent_deploy::runner::{CommandOutput, CommandRunner, CommandSpec};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REMOTE_PY: &str = r#"import os
import sys

sys.path.insert(0, os.path.join(os.path.dirname(__file__), 'interview-agents-local'))

from interview_agents.agent import root_agent


def create():
    remote_app = agent_engines.create(
        agent_engine=app,
        requirements=["google-cloud-aiplatform[adk,agent_engines]"],
        extra_packages=["../interview-agents"],
    )
"#;

const PYPROJECT: &str = r#"[tool.poetry]
name = "deployment"

[tool.poetry.dependencies]
python = "^3.11"
interview-agents = {path = "../interview-agents", develop = true}
google-cloud-aiplatform = {extras = ["adk", "agent-engines"], version = "^1.93"}
"#;

/// Records every command and fails the call at `fail_at` (0-based)
struct ScriptedRunner {
    fail_at: Option<usize>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    fn new(fail_at: Option<usize>) -> Self {
        Self {
            fail_at,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn displayed(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.display()).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(spec.clone());
        let code = if self.fail_at == Some(index) { 1 } else { 0 };
        Ok(CommandOutput {
            code: Some(code),
            ..Default::default()
        })
    }
}

struct Fixture {
    _root: TempDir,
    source: PathBuf,
    deployment: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let source = root.path().join("interview-agents");
        let deployment = root.path().join("deployment");

        let module = source.join("interview_agents");
        fs::create_dir_all(module.join("__pycache__")).unwrap();
        fs::write(source.join("pyproject.toml"), "[tool.poetry]\n").unwrap();
        fs::write(module.join("__init__.py"), "").unwrap();
        fs::write(module.join("agent.py"), "root_agent = None\n").unwrap();
        fs::write(module.join("agent.pyc"), "bytecode").unwrap();
        fs::write(module.join("__pycache__/agent.cpython-311.pyc"), "bytecode").unwrap();

        fs::create_dir_all(&deployment).unwrap();
        fs::write(deployment.join("remote.py"), REMOTE_PY).unwrap();
        fs::write(deployment.join("pyproject.toml"), PYPROJECT).unwrap();

        Self {
            _root: root,
            source,
            deployment,
        }
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(&Config::default(), self.deployment.clone()).unwrap()
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.deployment.join(name)).unwrap()
    }
}

fn staged(dir: &Path) -> bool {
    dir.join("interview_agents").exists()
}

#[test]
fn test_full_pipeline_success() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(None);

    let report = fixture.pipeline().run(&runner);

    assert!(report.success());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.completed, Stage::ALL.to_vec());
    assert_eq!(
        runner.displayed(),
        vec![
            "poetry install",
            "poetry lock",
            "poetry install",
            "poetry run python remote.py --create",
        ]
    );

    let calls = runner.calls.borrow();
    assert_eq!(
        calls[0].cwd,
        Some(fixture.deployment.join("../interview-agents"))
    );
    assert_eq!(
        calls[0].cwd.as_ref().unwrap().canonicalize().unwrap(),
        fixture.source.canonicalize().unwrap()
    );
    for call in &calls[1..] {
        assert_eq!(call.cwd.as_deref(), Some(fixture.deployment.as_path()));
    }
}

#[test]
fn test_staged_copy_excludes_bytecode() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(None);
    fixture.pipeline().run(&runner);

    let staged = fixture.deployment.join("interview_agents");
    assert!(staged.join("__init__.py").is_file());
    assert!(staged.join("agent.py").is_file());
    assert!(!staged.join("agent.pyc").exists());
    assert!(!staged.join("__pycache__").exists());
}

#[test]
fn test_rewrite_removes_external_references() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(None);
    fixture.pipeline().run(&runner);

    let remote = fixture.read("remote.py");
    assert!(remote.lines().all(|line| !line.contains("extra_packages=")));
    assert!(remote.contains("# Local package import"));
    assert!(remote.contains("requirements=[\"google-cloud-aiplatform[adk,agent_engines]\"],"));

    let manifest = fixture.read("pyproject.toml");
    assert!(manifest.lines().all(|line| !line
        .trim()
        .starts_with("interview-agents = {path = \"../interview-agents\"")));
    assert!(manifest.contains("google-cloud-aiplatform"));
}

#[test]
fn test_install_failure_stops_pipeline() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(Some(0));

    let report = fixture.pipeline().run(&runner);

    assert_eq!(report.exit_code(), 1);
    assert!(report.completed.is_empty());
    assert!(matches!(
        report.failed,
        Some((Stage::InstallPackage, AgentDeployError::CommandExitCode { code: 1, .. }))
    ));
    assert_eq!(runner.calls.borrow().len(), 1);
    assert!(!staged(&fixture.deployment));
    assert_eq!(fixture.read("remote.py"), REMOTE_PY);
}

#[test]
fn test_stage_failure_when_module_missing() {
    let fixture = Fixture::new();
    fs::remove_dir_all(fixture.source.join("interview_agents")).unwrap();
    let runner = ScriptedRunner::new(None);

    let report = fixture.pipeline().run(&runner);

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.completed, vec![Stage::InstallPackage]);
    assert!(matches!(
        report.failed,
        Some((Stage::StagePackage, AgentDeployError::SourceNotFound(_)))
    ));
    assert_eq!(runner.calls.borrow().len(), 1);
    assert_eq!(fixture.read("pyproject.toml"), PYPROJECT);
}

#[test]
fn test_rewrite_failure_when_script_missing() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.deployment.join("remote.py")).unwrap();
    let runner = ScriptedRunner::new(None);

    let report = fixture.pipeline().run(&runner);

    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        report.completed,
        vec![Stage::InstallPackage, Stage::StagePackage]
    );
    assert!(matches!(
        report.failed,
        Some((Stage::RewriteConfig, AgentDeployError::RewriteTargetMissing(_)))
    ));
    // No lock, install or deploy
    assert_eq!(runner.calls.borrow().len(), 1);
}

#[test]
fn test_lock_failure_stops_before_install_and_deploy() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(Some(1));

    let report = fixture.pipeline().run(&runner);

    assert_eq!(report.exit_code(), 1);
    assert!(matches!(report.failed, Some((Stage::LockAndInstall, _))));
    assert_eq!(runner.displayed(), vec!["poetry install", "poetry lock"]);
}

#[test]
fn test_install_after_lock_failure_stops_before_deploy() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(Some(2));

    let report = fixture.pipeline().run(&runner);

    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        report.completed,
        vec![
            Stage::InstallPackage,
            Stage::StagePackage,
            Stage::RewriteConfig
        ]
    );
    assert!(matches!(
        report.failed,
        Some((Stage::LockAndInstall, AgentDeployError::CommandExitCode { code: 1, .. }))
    ));
    assert_eq!(
        runner.displayed(),
        vec!["poetry install", "poetry lock", "poetry install"]
    );
}

#[test]
fn test_deploy_failure() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new(Some(3));

    let report = fixture.pipeline().run(&runner);

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.completed.len(), 4);
    assert!(matches!(report.failed, Some((Stage::Deploy, _))));
}

#[test]
fn test_custom_package_manager_and_deploy_command() {
    let fixture = Fixture::new();
    let config: Config = toml::from_str(
        r#"
[tools]
package_manager = "uv"

[deploy]
command = ["./deploy.sh", "--region", "europe-west1"]
"#,
    )
    .unwrap();
    let runner = ScriptedRunner::new(None);

    let report = Pipeline::from_config(&config, fixture.deployment.clone())
        .unwrap()
        .run(&runner);

    assert!(report.success());
    assert_eq!(
        runner.displayed(),
        vec![
            "uv install",
            "uv lock",
            "uv install",
            "./deploy.sh --region europe-west1",
        ]
    );
}

#[test]
fn test_rerun_is_stable() {
    let fixture = Fixture::new();
    fixture.pipeline().run(&ScriptedRunner::new(None));
    let remote_first = fixture.read("remote.py");

    let report = fixture.pipeline().run(&ScriptedRunner::new(None));

    assert!(report.success());
    assert_eq!(fixture.read("remote.py"), remote_first);
}

#[test]
fn test_absolute_source_dir_still_drops_path_dependency() {
    let fixture = Fixture::new();
    let mut config = Config::default();
    config.package.source_dir = format!("{}/", fixture.source.canonicalize().unwrap().display());
    let runner = ScriptedRunner::new(None);

    let report = Pipeline::from_config(&config, fixture.deployment.clone())
        .unwrap()
        .run(&runner);

    assert!(report.success());
    let manifest = fixture.read("pyproject.toml");
    assert!(
        manifest
            .lines()
            .all(|line| !line.trim_start().starts_with("interview-agents = {path =")),
        "path dependency left in manifest:\n{}",
        manifest
    );
    assert!(manifest.contains("google-cloud-aiplatform"));
    assert!(fixture.deployment.join("interview_agents/agent.py").is_file());
}

#[test]
fn test_invalid_ignore_pattern_rejected() {
    let fixture = Fixture::new();
    let mut config = Config::default();
    config.package.ignore = vec!["[*.pyc".to_string()];

    let err = Pipeline::from_config(&config, fixture.deployment.clone()).unwrap_err();
    assert!(matches!(err, AgentDeployError::InvalidConfig(_)));
}
