//! Real bot supervisor implementation
//!
//! Owns the process table: one entry per configured bot, keyed by name.
//! Every launch bumps the entry's generation; exit notifications and restart
//! timers carry the generation they were created for and are ignored once
//! it is stale. Crashed bots are restarted after a fixed delay, forever.
//! Bots that exit cleanly are dropped from the table.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, Mutex, Notify};
use tokio::task::JoinHandle;

use shared::{service_debug, service_error, service_info, service_warn, LifecycleState, ServiceId};

use crate::core::lifecycle::{on_exit, Effect, ExitOutcome};
use crate::core::BotSpec;
use crate::error::{LauncherError, LauncherResult};
use crate::services::env_file::USERNAME_KEY;
use crate::services::output_handler::{configure_child_stdio, spawn_output_forwarders};
use crate::traits::{EnvLoader, LogSink, ProcessSnapshot, ProcessTable};

/// Default delay between a crash and the next launch attempt
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(5);

/// Supervisor handle, cheap to clone
pub struct RealSupervisor<L, E> {
    inner: Arc<SupervisorInner<L, E>>,
}

impl<L, E> Clone for RealSupervisor<L, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct SupervisorInner<L, E> {
    table: Mutex<HashMap<String, ManagedProcess>>,
    shutting_down: AtomicBool,
    restart_delay: Duration,
    log_sink: Arc<L>,
    env_loader: E,
    idle: Notify,
}

/// One entry of the process table
struct ManagedProcess {
    spec: BotSpec,
    username: Option<String>,
    state: LifecycleState,
    pid: Option<u32>,
    started_at: Instant,
    generation: u64,
    restart_count: u32,
    kill_tx: Option<oneshot::Sender<()>>,
    restart_task: Option<JoinHandle<()>>,
}

impl ManagedProcess {
    fn new(spec: BotSpec) -> Self {
        Self {
            spec,
            username: None,
            state: LifecycleState::Restarting,
            pid: None,
            started_at: Instant::now(),
            generation: 0,
            restart_count: 0,
            kill_tx: None,
            restart_task: None,
        }
    }

    fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            name: self.spec.name.clone(),
            username: self.username.clone(),
            state: self.state,
            pid: self.pid,
            started_at: self.started_at,
            restart_count: self.restart_count,
        }
    }
}

impl<L, E> RealSupervisor<L, E>
where
    L: LogSink + 'static,
    E: EnvLoader + 'static,
{
    pub fn new(restart_delay: Duration, log_sink: L, env_loader: E) -> Self {
        Self {
            inner: Arc::new(SupervisorInner {
                table: Mutex::new(HashMap::new()),
                shutting_down: AtomicBool::new(false),
                restart_delay,
                log_sink: Arc::new(log_sink),
                env_loader,
                idle: Notify::new(),
            }),
        }
    }

    /// Start supervising one bot and return the pid of its first process
    ///
    /// A spawn failure leaves the bot in the table as `error` with a restart
    /// already scheduled; the error is still returned for the caller to log.
    pub async fn start(&self, spec: BotSpec) -> LauncherResult<u32> {
        if self.is_shutting_down() {
            return Err(LauncherError::spawn(&spec.name, "launcher is shutting down"));
        }

        let name = spec.name.clone();
        {
            let mut table = self.inner.table.lock().await;
            if table.contains_key(&name) {
                return Err(LauncherError::spawn(&name, "a bot with this name is already managed"));
            }
            table.insert(name.clone(), ManagedProcess::new(spec));
        }

        launch(&self.inner, &name).await
    }

    /// Start every bot, logging failures instead of aborting
    pub async fn start_all(&self, specs: Vec<BotSpec>) -> usize {
        let mut started = 0;
        for spec in specs {
            let name = spec.name.clone();
            match self.start(spec).await {
                Ok(pid) => {
                    started += 1;
                    service_info!(ServiceId::current(), bot = %name, pid, "🤖 Bot started");
                }
                Err(e) => {
                    service_error!(ServiceId::current(), bot = %name, error = %e, "❌ Bot failed to start");
                }
            }
        }
        started
    }

    /// Stop supervising
    ///
    /// Cancels every pending restart, drops entries that have no live
    /// process and sends a termination request to each running bot. Returns
    /// the number of bots signalled; their entries disappear as they exit.
    pub async fn shutdown_all(&self) -> usize {
        self.inner.shutting_down.store(true, Ordering::SeqCst);

        let mut table = self.inner.table.lock().await;
        let mut signalled = 0;

        table.retain(|name, entry| {
            if let Some(task) = entry.restart_task.take() {
                task.abort();
            }

            match (entry.state, entry.pid) {
                (LifecycleState::Running, Some(pid)) => {
                    entry.state = LifecycleState::Terminated;
                    request_termination(name, pid, entry);
                    signalled += 1;
                    true
                }
                _ => false,
            }
        });

        if table.is_empty() {
            self.inner.idle.notify_waiters();
        }

        signalled
    }

    /// Hard-kill every process still in the table
    pub async fn kill_remaining(&self) -> usize {
        let mut table = self.inner.table.lock().await;
        let mut killed = 0;
        for (name, entry) in table.iter_mut() {
            if let Some(kill_tx) = entry.kill_tx.take() {
                if kill_tx.send(()).is_ok() {
                    killed += 1;
                    service_warn!(ServiceId::current(), bot = %name, "💀 Force killing bot");
                }
            }
        }
        killed
    }

    /// Wait until the process table is empty
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let inner = &self.inner;
        tokio::time::timeout(timeout, async {
            loop {
                let notified = inner.idle.notified();
                if inner.table.lock().await.is_empty() {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.table.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.table.lock().await.is_empty()
    }
}

#[async_trait]
impl<L, E> ProcessTable for RealSupervisor<L, E>
where
    L: LogSink + 'static,
    E: EnvLoader + 'static,
{
    async fn snapshot(&self) -> Vec<ProcessSnapshot> {
        let table = self.inner.table.lock().await;
        let mut snapshots: Vec<_> = table.values().map(ManagedProcess::snapshot).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}

/// Spawn a fresh OS process for the entry called `name`
async fn launch<L, E>(inner: &Arc<SupervisorInner<L, E>>, name: &str) -> LauncherResult<u32>
where
    L: LogSink + 'static,
    E: EnvLoader + 'static,
{
    let spec = {
        let table = inner.table.lock().await;
        match table.get(name) {
            Some(entry) => entry.spec.clone(),
            None => return Err(LauncherError::spawn(name, "bot is no longer managed")),
        }
    };

    // The env file is re-read on every launch so edits apply on restart
    let env = match inner.env_loader.load(&spec.command) {
        Ok(env) => env,
        Err(e) => {
            service_warn!(ServiceId::current(), bot = %name, error = %e, "⚠️ Ignoring unreadable env file");
            HashMap::new()
        }
    };
    let username = env.get(USERNAME_KEY).cloned();

    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args()).envs(&env);
    configure_child_stdio(&mut cmd);

    let mut table = inner.table.lock().await;
    if inner.shutting_down.load(Ordering::SeqCst) {
        return Err(LauncherError::spawn(name, "launcher is shutting down"));
    }
    let Some(entry) = table.get_mut(name) else {
        return Err(LauncherError::spawn(name, "bot is no longer managed"));
    };

    entry.generation += 1;
    entry.username = username;
    let generation = entry.generation;

    match cmd.spawn() {
        Ok(mut child) => {
            let pid = child.id().unwrap_or_default();
            let (kill_tx, kill_rx) = oneshot::channel();

            entry.state = LifecycleState::Running;
            entry.pid = Some(pid);
            entry.started_at = Instant::now();
            entry.kill_tx = Some(kill_tx);
            drop(table);

            spawn_output_forwarders(&mut child, name, inner.log_sink.clone());
            tokio::spawn(watch_child(inner.clone(), name.to_string(), generation, child, kill_rx));

            service_debug!(ServiceId::current(), bot = %name, pid, generation, "Spawned bot process");
            Ok(pid)
        }
        Err(e) => {
            apply_exit(inner, &mut table, name, generation, ExitOutcome::SpawnFailed);
            Err(LauncherError::spawn(name, e.to_string()))
        }
    }
}

/// Wait for a child to exit, or kill it on request
async fn watch_child<L, E>(
    inner: Arc<SupervisorInner<L, E>>,
    name: String,
    generation: u64,
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
) where
    L: LogSink + 'static,
    E: EnvLoader + 'static,
{
    let status = tokio::select! {
        status = child.wait() => status,
        Ok(()) = kill_rx => {
            let _ = child.start_kill();
            child.wait().await
        }
    };

    let outcome = match status {
        Ok(status) => ExitOutcome::from_status(status),
        Err(e) => {
            service_warn!(ServiceId::current(), bot = %name, error = %e, "⚠️ Lost track of bot process");
            ExitOutcome::Signal(None)
        }
    };

    let mut table = inner.table.lock().await;
    apply_exit(&inner, &mut table, &name, generation, outcome);
}

/// Run the lifecycle transition for an exit and perform its effect
fn apply_exit<L, E>(
    inner: &Arc<SupervisorInner<L, E>>,
    table: &mut HashMap<String, ManagedProcess>,
    name: &str,
    generation: u64,
    outcome: ExitOutcome,
) where
    L: LogSink + 'static,
    E: EnvLoader + 'static,
{
    let Some(entry) = table.get_mut(name) else {
        return;
    };
    if entry.generation != generation {
        return;
    }

    let shutting_down = inner.shutting_down.load(Ordering::SeqCst);
    let transition = on_exit(entry.state, outcome, shutting_down);
    entry.state = transition.next;
    entry.pid = None;
    entry.kill_tx = None;

    match transition.effect {
        Effect::Remove => {
            table.remove(name);
            service_info!(ServiceId::current(), bot = %name, outcome = %outcome, "🛑 Bot stopped");
            if table.is_empty() {
                inner.idle.notify_waiters();
            }
        }
        Effect::ScheduleRestart => {
            service_warn!(
                ServiceId::current(),
                bot = %name,
                outcome = %outcome,
                delay_secs = inner.restart_delay.as_secs_f32(),
                "🔄 Bot exited, restart scheduled"
            );
            entry.restart_task = Some(tokio::spawn(restart_after(inner.clone(), name.to_string(), generation)));
        }
    }
}

/// Relaunch `name` after the restart delay unless it was superseded
fn restart_after<L, E>(
    inner: Arc<SupervisorInner<L, E>>,
    name: String,
    generation: u64,
) -> Pin<Box<dyn Future<Output = ()> + Send>>
where
    L: LogSink + 'static,
    E: EnvLoader + 'static,
{
    Box::pin(async move {
        tokio::time::sleep(inner.restart_delay).await;

        {
            let mut table = inner.table.lock().await;
            if inner.shutting_down.load(Ordering::SeqCst) {
                return;
            }
            match table.get_mut(&name) {
                Some(entry) if entry.generation == generation => {
                    entry.restart_count += 1;
                    entry.restart_task = None;
                }
                _ => return,
            }
        }

        match launch(&inner, &name).await {
            Ok(pid) => service_info!(ServiceId::current(), bot = %name, pid, "🤖 Bot restarted"),
            Err(e) => service_error!(ServiceId::current(), bot = %name, error = %e, "❌ Restart failed"),
        }
    })
}

/// Ask a running bot to terminate
#[cfg(unix)]
fn request_termination(name: &str, pid: u32, entry: &mut ManagedProcess) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match i32::try_from(pid).map(|raw| kill(Pid::from_raw(raw), Signal::SIGTERM)) {
        Ok(Ok(())) => {
            service_debug!(ServiceId::current(), bot = %name, pid, "Sent SIGTERM");
        }
        _ => {
            if let Some(kill_tx) = entry.kill_tx.take() {
                let _ = kill_tx.send(());
            }
        }
    }
}

#[cfg(not(unix))]
fn request_termination(_name: &str, _pid: u32, entry: &mut ManagedProcess) {
    if let Some(kill_tx) = entry.kill_tx.take() {
        let _ = kill_tx.send(());
    }
}
