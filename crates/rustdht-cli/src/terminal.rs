//! Terminal driver for the CLI.
//!
//! Implements the [`Driver`] trait for line-oriented terminal I/O. Each input
//! line becomes a [`HostCommand`]; each render prints only the transcript and
//! conversation entries that appeared since the previous render.

use std::io::{self, Stdout, Write};

use rustdht_app::{Driver, HostCommand, SessionView};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
Commands:
  /start            start the P2P client
  /connect <addr>   connect to a peer or relay
  /clear            clear the log
  /restart          reload the peer module
  /quit             exit
Anything else is sent as a chat message.";

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Generic over its input and output so tests can feed scripted lines and
/// capture what was printed.
pub struct TerminalDriver<R, W> {
    lines: Lines<R>,
    out: W,
    transcript_cursor: Option<u64>,
    conversation_cursor: Option<u64>,
}

impl TerminalDriver<BufReader<Stdin>, Stdout> {
    /// Create a driver over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver reading commands from `input` and printing to `out`.
    pub fn new(input: R, out: W) -> Self {
        Self { lines: input.lines(), out, transcript_cursor: None, conversation_cursor: None }
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }
}

impl<R, W> Driver for TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = CliError;

    async fn next_command(&mut self) -> Result<Option<HostCommand>, Self::Error> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(command) = HostCommand::parse(&line) {
                return Ok(Some(command));
            }

            let line = line.trim();
            if line == "/help" {
                writeln!(self.out, "{HELP}")?;
            } else if !line.is_empty() {
                writeln!(self.out, "Unknown command: {line} (try /help)")?;
            }
            self.out.flush()?;
        }
        Ok(None)
    }

    fn render(&mut self, view: SessionView<'_>) -> Result<(), Self::Error> {
        // An empty sink was cleared or belongs to a fresh session, so
        // whatever appears next is new.
        if view.transcript.is_empty() {
            self.transcript_cursor = None;
        }
        if view.conversation.is_empty() {
            self.conversation_cursor = None;
        }

        for entry in view.transcript.since(self.transcript_cursor) {
            writeln!(self.out, "{entry}")?;
            self.transcript_cursor = Some(entry.seq);
        }
        for entry in view.conversation.since(self.conversation_cursor) {
            writeln!(self.out, "{entry}")?;
            self.conversation_cursor = Some(entry.seq);
        }

        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rustdht_app::{ClientState, ConversationLog, Direction, Transcript};

    use super::*;

    fn at(secs: i64) -> chrono::DateTime<chrono::FixedOffset> {
        chrono::DateTime::from_timestamp(secs, 0).unwrap().fixed_offset()
    }

    fn driver(input: &'static str) -> TerminalDriver<&'static [u8], Vec<u8>> {
        TerminalDriver::new(input.as_bytes(), Vec::new())
    }

    fn printed(driver: &TerminalDriver<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8_lossy(driver.output()).into_owned()
    }

    fn view<'a>(transcript: &'a Transcript, conversation: &'a ConversationLog) -> SessionView<'a> {
        SessionView { state: ClientState::Connected, transcript, conversation, draft: "" }
    }

    #[tokio::test]
    async fn lines_become_commands() {
        let mut driver = driver("/start\n\n/nope\nhello\n");

        assert_eq!(driver.next_command().await.unwrap(), Some(HostCommand::Start));
        assert_eq!(
            driver.next_command().await.unwrap(),
            Some(HostCommand::Send { body: "hello".into() })
        );
        assert_eq!(driver.next_command().await.unwrap(), None);
        insta::assert_snapshot!(printed(&driver), @"Unknown command: /nope (try /help)");
    }

    #[test]
    fn render_prints_only_new_entries() {
        let mut driver = driver("");
        let mut transcript = Transcript::new();
        let mut conversation = ConversationLog::new();

        transcript.append(at(3661), "P2P client started");
        driver.render(view(&transcript, &conversation)).unwrap();

        transcript.append(at(3662), "Connection request sent");
        conversation.append("you", "ping", Direction::Sent);
        conversation.append("peer42", "pong", Direction::Received);
        driver.render(view(&transcript, &conversation)).unwrap();
        driver.render(view(&transcript, &conversation)).unwrap();

        insta::assert_snapshot!(printed(&driver), @r"
        [01:01:01] P2P client started
        [01:01:02] Connection request sent
        -> you: ping
        <- peer42: pong
        ");
    }

    #[test]
    fn cleared_transcript_resumes_with_new_entries() {
        let mut driver = driver("");
        let mut transcript = Transcript::new();
        let conversation = ConversationLog::new();

        transcript.append(at(0), "before");
        driver.render(view(&transcript, &conversation)).unwrap();
        transcript.clear();
        driver.render(view(&transcript, &conversation)).unwrap();
        transcript.append(at(1), "after");
        driver.render(view(&transcript, &conversation)).unwrap();

        insta::assert_snapshot!(printed(&driver), @r"
        [00:00:00] before
        [00:00:01] after
        ");
    }
}
