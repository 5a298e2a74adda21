//! Scripted command runner: records every invocation and answers from a closure, so the publish
//! workflow runs without git, gh or network.
#![allow(dead_code)]

use gitmax::{Cmd, CmdOutput, CommandRunner, Identity, PublishContext};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = Box<dyn Fn(&Cmd) -> CmdOutput + Send + Sync>;

pub struct ScriptedRunner {
    calls: Mutex<Vec<Cmd>>,
    respond: Responder,
    create_git_on_init: bool,
}

impl ScriptedRunner {
    pub fn new(respond: impl Fn(&Cmd) -> CmdOutput + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            create_git_on_init: false,
        }
    }

    /// Every command succeeds the way a healthy git/gh would.
    pub fn happy() -> Self {
        Self::new(happy_response)
    }

    /// Make `git init` create `.git` in its working directory, like the real thing.
    pub fn creating_git_dir(mut self) -> Self {
        self.create_git_on_init = true;
        self
    }

    pub fn calls(&self) -> Vec<Cmd> {
        self.calls.lock().unwrap().clone()
    }

    /// Drain recorded calls.
    pub fn take_calls(&self) -> Vec<Cmd> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    /// Number of `program` invocations whose arguments start with `prefix`.
    pub fn count(&self, program: &str, prefix: &[&str]) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.program == program && c.starts_with(prefix))
            .count()
    }

    pub fn find(&self, program: &str, prefix: &[&str]) -> Option<Cmd> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.program == program && c.starts_with(prefix))
            .cloned()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cmd: &Cmd) -> CmdOutput {
        self.calls.lock().unwrap().push(cmd.clone());
        if self.create_git_on_init
            && is_git(cmd, &["init"])
            && let Some(dir) = &cmd.cwd
        {
            std::fs::create_dir_all(dir.join(".git")).unwrap();
        }
        (self.respond)(cmd)
    }
}

pub fn is_git(cmd: &Cmd, prefix: &[&str]) -> bool {
    cmd.program == "git" && cmd.starts_with(prefix)
}

pub fn is_gh(cmd: &Cmd, prefix: &[&str]) -> bool {
    cmd.program == "gh" && cmd.starts_with(prefix)
}

/// Healthy defaults: no existing remote, two files staged and pushed, repo visible on the host.
pub fn happy_response(cmd: &Cmd) -> CmdOutput {
    if is_git(cmd, &["remote", "get-url"]) {
        return CmdOutput::failed("error: No such remote 'origin'");
    }
    if is_git(cmd, &["diff", "--cached", "--name-only"]) {
        return CmdOutput::ok("a.txt\nsub/b.txt\n");
    }
    if is_git(cmd, &["ls-tree"]) {
        return CmdOutput::ok("a.txt\nsub/b.txt\n");
    }
    CmdOutput::ok("")
}

/// Context owned by `octo`, with waits disabled.
pub fn test_ctx(runner: Arc<ScriptedRunner>) -> PublishContext {
    let mut ctx = PublishContext::new(runner, Identity::new("octo", None));
    ctx.pace = Duration::ZERO;
    ctx
}

/// `a.txt` and `sub/b.txt` under `dir`.
pub fn write_two_files(dir: &Path) {
    std::fs::write(dir.join("a.txt"), "a").unwrap();
    std::fs::create_dir_all(dir.join("sub")).unwrap();
    std::fs::write(dir.join("sub").join("b.txt"), "b").unwrap();
}
