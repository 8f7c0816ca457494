//! Publish the site: stage, commit and push every pending change
//!
//! Steps run strictly in order and the first failure stops the rest;
//! a half-finished deploy is left for the author to sort out by hand.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::config::DeployConfig;
use crate::Blog;

/// Deploy errors
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Failed to run git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} failed (git exited with {code})")]
    StepFailed { step: String, code: String },
}

/// Runs git commands
pub trait GitRunner {
    /// Run a read-only command and capture its stdout
    fn output(&self, args: &[&str]) -> Result<String, DeployError>;

    /// Run a command with inherited stdio; `step` names it in errors
    fn run(&self, step: &str, args: &[&str]) -> Result<(), DeployError>;
}

/// The real `git` binary, run inside the site directory
#[derive(Debug, Clone)]
pub struct SystemGit {
    repo_dir: PathBuf,
}

impl SystemGit {
    pub fn new<P: AsRef<Path>>(repo_dir: P) -> Self {
        Self {
            repo_dir: repo_dir.as_ref().to_path_buf(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.repo_dir);
        cmd
    }
}

fn exit_code(status: std::process::ExitStatus) -> String {
    status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string())
}

impl GitRunner for SystemGit {
    fn output(&self, args: &[&str]) -> Result<String, DeployError> {
        let output = self
            .command(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| DeployError::Spawn {
                args: args.join(" "),
                source,
            })?;

        if !output.status.success() {
            return Err(DeployError::StepFailed {
                step: format!("git {}", args.join(" ")),
                code: exit_code(output.status),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, step: &str, args: &[&str]) -> Result<(), DeployError> {
        let status = self
            .command(args)
            .status()
            .map_err(|source| DeployError::Spawn {
                args: args.join(" "),
                source,
            })?;

        if !status.success() {
            return Err(DeployError::StepFailed {
                step: step.to_string(),
                code: exit_code(status),
            });
        }
        Ok(())
    }
}

/// What a deploy did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Working tree was clean; nothing touched
    NothingToDeploy,
    Deployed {
        files: Vec<String>,
        message: String,
    },
}

/// Paths from `git status --porcelain -z` output
///
/// Records are NUL-terminated and paths are written verbatim. A rename or
/// copy record is followed by an extra record holding the source path.
pub fn changed_files(porcelain: &str) -> Vec<String> {
    let mut files = Vec::new();
    let mut records = porcelain.split('\0').filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        let (Some(status), Some(path)) = (record.get(..2), record.get(3..)) else {
            continue;
        };
        if status.contains(['R', 'C']) {
            records.next();
        }
        files.push(path.to_string());
    }

    files
}

/// Commit message naming the changed markdown posts
pub fn commit_message(files: &[String], prefix: &str) -> String {
    let posts: Vec<&str> = files
        .iter()
        .map(Path::new)
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()))
        .collect();

    if posts.is_empty() {
        format!("{} blog update", prefix)
    } else {
        format!("{} {} post added/updated", prefix, posts.join(", "))
    }
}

/// Commands to run by hand after a failed deploy
pub fn manual_steps(config: &DeployConfig) -> Vec<String> {
    vec![
        "git add .".to_string(),
        format!("git commit -m \"{} add post\"", config.message_prefix),
        format!("git push {} {}", config.remote, config.branch),
    ]
}

/// Run the deploy sequence
pub fn deploy(git: &dyn GitRunner, config: &DeployConfig) -> Result<DeployOutcome, DeployError> {
    let status = git.output(&["status", "--porcelain", "-z"])?;
    let files = changed_files(&status);

    if files.is_empty() {
        return Ok(DeployOutcome::NothingToDeploy);
    }

    tracing::info!("{} changed file(s)", files.len());
    for file in &files {
        println!("   - {}", file);
    }

    println!("\n📝 Staging changes...");
    git.run("Staging changes", &["add", "-A"])?;

    let message = commit_message(&files, &config.message_prefix);
    println!("\n📝 Creating commit...");
    git.run("Creating commit", &["commit", "-m", &message])?;

    println!("\n📝 Pushing to {}/{}...", config.remote, config.branch);
    git.run("Pushing", &["push", &config.remote, &config.branch])?;

    Ok(DeployOutcome::Deployed { files, message })
}

/// Deploy the site in `blog.base_dir`
pub fn run(blog: &Blog) -> Result<DeployOutcome, DeployError> {
    println!("🚀 Deploying blog...\n");
    let git = SystemGit::new(&blog.base_dir);
    let outcome = deploy(&git, &blog.config.deploy)?;

    match &outcome {
        DeployOutcome::NothingToDeploy => println!("✅ Nothing to deploy."),
        DeployOutcome::Deployed { message, .. } => {
            println!("\n✅ Deployed: {}", message);
            if !blog.config.url.is_empty() {
                println!("🌐 Check {} in a few minutes.", blog.config.url);
            }
        }
    }

    Ok(outcome)
}
