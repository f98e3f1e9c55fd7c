//! Non-blocking external process runner.
//!
//! A [`ProcessRunner`] executes at most one external process at a time.
//! Requests that arrive while it is busy wait in a FIFO queue. Output is
//! streamed into two accumulators (stdout and stderr) while the process
//! runs, and completion is observed by [`tick`], which the host event loop
//! calls once per iteration. Nothing here blocks the calling thread.
//!
//! Continuations receive the host (`&mut H`) rather than capturing it, so a
//! continuation can inspect the runner's output, update workflow state and
//! issue further [`run`] calls without shared ownership or locks.
//!
//! ```no_run
//! use csk_core::runner::{run, tick, ProcessRequest, ProcessRunner, RunnerHost, ToolEnvironment};
//! use csk_protocol::Channel;
//!
//! struct Panel {
//!     runner: ProcessRunner<Panel>,
//!     greeting: Option<String>,
//! }
//!
//! impl RunnerHost for Panel {
//!     fn runner(&mut self, _channel: Channel) -> &mut ProcessRunner<Panel> {
//!         &mut self.runner
//!     }
//! }
//!
//! # async fn example() {
//! let mut panel = Panel {
//!     runner: ProcessRunner::new(Channel::Foreground, ToolEnvironment::detect()),
//!     greeting: None,
//! };
//! run(&mut panel, Channel::Foreground, ProcessRequest::new("echo", "hello", ".", |p: &mut Panel| {
//!     p.greeting = Some(p.runner.stdout().to_string());
//! }));
//! while panel.runner.is_running() {
//!     tick(&mut panel, Channel::Foreground);
//!     tokio::time::sleep(std::time::Duration::from_millis(16)).await;
//! }
//! # }
//! ```

pub mod env;
pub mod error;
mod pump;

pub use env::ToolEnvironment;
pub use error::RunnerError;

use csk_protocol::Channel;
use pump::ProcessEvent;
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

/// Completion callback of a [`ProcessRequest`], invoked exactly once.
pub type Continuation<H> = Box<dyn FnOnce(&mut H)>;

/// A request to run one external process.
pub struct ProcessRequest<H> {
    pub executable: String,
    /// Shell-style argument string; callers are responsible for quoting.
    pub arguments: String,
    pub working_dir: PathBuf,
    on_complete: Continuation<H>,
}

impl<H> ProcessRequest<H> {
    pub fn new(
        executable: impl Into<String>,
        arguments: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        on_complete: impl FnOnce(&mut H) + 'static,
    ) -> Self {
        Self {
            executable: executable.into(),
            arguments: arguments.into(),
            working_dir: working_dir.into(),
            on_complete: Box::new(on_complete),
        }
    }

    /// The invocation as echoed into the output accumulators.
    pub fn command_line(&self) -> String {
        if self.arguments.is_empty() {
            self.executable.clone()
        } else {
            format!("{} {}", self.executable, self.arguments)
        }
    }
}

impl<H> fmt::Debug for ProcessRequest<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRequest")
            .field("executable", &self.executable)
            .field("arguments", &self.arguments)
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}

/// The live process of a runner.
struct ActiveProcess<H> {
    command_line: String,
    events: UnboundedReceiver<ProcessEvent>,
    on_complete: Continuation<H>,
}

/// What a single poll of the runner observed.
enum PollOutcome<H> {
    Unchanged,
    Output,
    Completed(Continuation<H>),
}

/// One serialization channel for external processes.
pub struct ProcessRunner<H> {
    channel: Channel,
    env: ToolEnvironment,
    /// Present iff a process is running.
    active: Option<ActiveProcess<H>>,
    pending: VecDeque<ProcessRequest<H>>,
    stdout: String,
    stderr: String,
    last_exit_code: Option<i32>,
}

impl<H> ProcessRunner<H> {
    pub fn new(channel: Channel, env: ToolEnvironment) -> Self {
        Self {
            channel,
            env,
            active: None,
            pending: VecDeque::new(),
            stdout: String::new(),
            stderr: String::new(),
            last_exit_code: None,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Number of requests waiting behind the active one.
    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// Running or holding queued work.
    pub fn is_busy(&self) -> bool {
        self.is_running() || !self.pending.is_empty()
    }

    /// The command line of the running process, if any.
    pub fn current_command(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.command_line.as_str())
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Stdout followed by stderr, for marker searches over both streams.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Exit code of the most recently finished process. `None` after a
    /// launch failure or when the process was killed by a signal.
    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    /// Empty both accumulators. Queue and running state are untouched.
    pub fn clear_output(&mut self) {
        self.stdout.clear();
        self.stderr.clear();
    }

    /// Append a line of the host's own to stdout, for work that runs
    /// without a process.
    pub fn append_note(&mut self, line: &str) {
        self.stdout.push_str(line);
        self.stdout.push('\n');
    }

    /// Start the request now or queue it behind the running process.
    ///
    /// Returns the continuation when the request failed to launch.
    fn submit(&mut self, request: ProcessRequest<H>) -> Option<Continuation<H>> {
        if self.is_running() {
            tracing::debug!(
                channel = self.channel.name(),
                command = %request.command_line(),
                queued = self.pending.len() + 1,
                "queueing process request"
            );
            self.pending.push_back(request);
            None
        } else {
            self.start(request)
        }
    }

    fn start(&mut self, request: ProcessRequest<H>) -> Option<Continuation<H>> {
        let command_line = request.command_line();
        let echo = format!("$ {command_line}\n");
        self.stdout.push_str(&echo);
        self.stderr.push_str(&echo);

        let ProcessRequest {
            executable,
            arguments,
            working_dir,
            on_complete,
        } = request;

        let launched = self
            .env
            .resolve(&executable, &working_dir)
            .ok_or_else(|| RunnerError::ExecutableNotFound(executable.clone()))
            .and_then(|program| {
                if !working_dir.is_dir() {
                    return Err(RunnerError::MissingWorkingDir(working_dir.clone()));
                }
                pump::spawn(&program, &arguments, &working_dir, self.env.path_var())
            });

        match launched {
            Ok(events) => {
                tracing::info!(
                    channel = self.channel.name(),
                    command = %command_line,
                    cwd = %working_dir.display(),
                    "process started"
                );
                self.active = Some(ActiveProcess {
                    command_line,
                    events,
                    on_complete,
                });
                None
            }
            Err(e) => {
                tracing::warn!(
                    channel = self.channel.name(),
                    command = %command_line,
                    error = %e,
                    "process failed to launch"
                );
                self.stdout.push_str(&format!("error: {e}\n"));
                self.last_exit_code = None;
                Some(on_complete)
            }
        }
    }

    /// Drain the output that arrived since the last poll and detect exit.
    fn poll(&mut self) -> PollOutcome<H> {
        let Some(active) = self.active.as_mut() else {
            return PollOutcome::Unchanged;
        };

        let mut changed = false;
        let mut exit = None;
        loop {
            match active.events.try_recv() {
                Ok(ProcessEvent::Stdout(line)) => {
                    self.stdout.push_str(&line);
                    self.stdout.push('\n');
                    changed = true;
                }
                Ok(ProcessEvent::Stderr(line)) => {
                    self.stderr.push_str(&line);
                    self.stderr.push('\n');
                    changed = true;
                }
                Ok(ProcessEvent::Exited(code)) => {
                    exit = Some(code);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                // The pump task is gone without reporting an exit code.
                Err(TryRecvError::Disconnected) => {
                    exit = Some(None);
                    break;
                }
            }
        }

        match (exit, self.active.take()) {
            (Some(code), Some(finished)) => {
                tracing::info!(
                    channel = self.channel.name(),
                    command = %finished.command_line,
                    exit_code = ?code,
                    "process finished"
                );
                self.last_exit_code = code;
                PollOutcome::Completed(finished.on_complete)
            }
            (None, finished) => {
                self.active = finished;
                if changed {
                    PollOutcome::Output
                } else {
                    PollOutcome::Unchanged
                }
            }
            (Some(_), None) => PollOutcome::Unchanged,
        }
    }

    /// Start the next queued request if idle.
    ///
    /// Returns a continuation when the dequeued request failed to launch;
    /// the caller invokes it and asks again.
    fn start_next(&mut self) -> Option<Continuation<H>> {
        if self.is_running() {
            return None;
        }
        let request = self.pending.pop_front()?;
        self.start(request)
    }
}

/// A type that owns process runners, one per [`Channel`].
///
/// Continuations are invoked with the host, which is how they reach both
/// the runner output and the rest of the application state.
pub trait RunnerHost: Sized {
    fn runner(&mut self, channel: Channel) -> &mut ProcessRunner<Self>;
}

/// Run a request on `channel`, or queue it if that runner is busy.
///
/// A request that cannot be launched completes immediately: the error is
/// written to the runner's output and its continuation is invoked before
/// this function returns.
pub fn run<H: RunnerHost>(host: &mut H, channel: Channel, request: ProcessRequest<H>) {
    if let Some(on_complete) = host.runner(channel).submit(request) {
        on_complete(host);
        drain_queue(host, channel);
    }
}

/// Poll the runner on `channel` once.
///
/// Appends newly arrived output, and when the process has exited invokes
/// its continuation and then starts the next queued request. Returns true
/// when anything changed (output or completion), i.e. a repaint is due.
pub fn tick<H: RunnerHost>(host: &mut H, channel: Channel) -> bool {
    match host.runner(channel).poll() {
        PollOutcome::Completed(on_complete) => {
            on_complete(host);
            drain_queue(host, channel);
            true
        }
        PollOutcome::Output => true,
        PollOutcome::Unchanged => false,
    }
}

fn drain_queue<H: RunnerHost>(host: &mut H, channel: Channel) {
    while let Some(on_complete) = host.runner(channel).start_next() {
        on_complete(host);
    }
}
