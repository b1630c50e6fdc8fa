//! Helper to handle bot stdout/stderr output
//!
//! Both streams are piped and drained until EOF so a bot never blocks on a
//! full pipe or dies of SIGPIPE. Output is decoded lossily: invalid UTF-8 is
//! replaced, never fatal. Lines go to the log sink tagged with the bot name:
//! stdout at info level, stderr at error level.

use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use shared::{service_warn, ServiceId};
use tokio::process::{Child, Command};

use crate::traits::{LogLevel, LogSink};

/// Configure stdio for a bot process
pub fn configure_child_stdio(cmd: &mut Command) {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());
}

/// Spawn tasks forwarding the child's piped output to `sink`
pub fn spawn_output_forwarders<L>(child: &mut Child, bot: &str, sink: Arc<L>)
where
    L: LogSink + 'static,
{
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_lines(stdout, bot.to_string(), LogLevel::Info, sink.clone()));
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_lines(stderr, bot.to_string(), LogLevel::Error, sink));
    }
}

async fn forward_lines<R, L>(stream: R, bot: String, level: LogLevel, sink: Arc<L>)
where
    R: AsyncRead + Unpin,
    L: LogSink,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                if !line.is_empty() {
                    sink.line(&bot, level, line);
                }
            }
            Err(e) => {
                service_warn!(ServiceId::current(), bot = %bot, error = %e, "⚠️ Stopped reading bot output");
                break;
            }
        }
    }
}
