//! Headless stdio bridge.
//!
//! Lets an outer host (a browser extension's native messaging shim, a test
//! driver) run the page over JSON lines. Each stdin line is one page event:
//!
//! ```text
//! {"type":"message","source":"tab-1","origin":"https://a.example","data":"{\"version\":1}"}
//! {"type":"input","field":"master_password","value":"..."}
//! {"type":"case","value":"mixed"}
//! {"type":"keydown","code":13}
//! {"type":"submit"}
//! {"type":"reveal"}
//! {"type":"adjust","step":"up"}
//! ```
//!
//! Each post the page makes becomes one stdout line,
//! `{"source":"tab-1","origin":"https://a.example","data":"{\"height\":420}"}`.
//! The bridge can't see the receiving window, so the outer host must deliver
//! `data` only to a window whose origin equals `origin`.

use genpass_core::{Field, InboundEvent, KeyValueStore, MessageSource, Origin, PageEvent, Step};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
    task,
};

use crate::{driver::PageDriver, error::PageError, fetch::AssetFetcher};

/// A browsing context on the far side of the bridge, named by the host.
#[derive(Debug, Clone)]
pub struct StdioSource {
    name: String,
    outbox: mpsc::UnboundedSender<String>,
}

impl StdioSource {
    /// Context named `name`, whose posts go to `outbox` as output lines.
    pub fn new(name: impl Into<String>, outbox: mpsc::UnboundedSender<String>) -> Self {
        Self { name: name.into(), outbox }
    }

    /// Host-assigned name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for StdioSource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for StdioSource {}

#[derive(Serialize)]
struct BridgeOutput<'a> {
    source: &'a str,
    origin: &'a str,
    data: &'a str,
}

impl MessageSource for StdioSource {
    fn post_message(&self, data: &str, target_origin: &Origin) {
        let output = BridgeOutput { source: &self.name, origin: target_origin.as_str(), data };
        match serde_json::to_string(&output) {
            Ok(line) => {
                if self.outbox.send(line).is_err() {
                    tracing::debug!(source = %self.name, "bridge output closed, dropping post");
                }
            },
            Err(e) => tracing::warn!(error = %e, "failed to encode bridge output"),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum BridgeInput {
    Message { source: String, origin: String, data: serde_json::Value },
    Input { field: BridgeField, value: String },
    Case { value: Option<String> },
    Keydown { code: u32 },
    Submit,
    Reveal,
    Adjust { step: BridgeStep },
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum BridgeField {
    MasterPassword,
    Domain,
    Length,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum BridgeStep {
    Up,
    Down,
}

/// Parse one input line into a page event.
///
/// Message data may be a string (passed through as the wire payload) or any
/// other JSON value (re-serialized), as a structured-clone `postMessage`
/// would carry either.
///
/// # Errors
///
/// Returns [`PageError::Bridge`] if the line isn't a known event.
pub fn parse_line(
    line: &str,
    outbox: &mpsc::UnboundedSender<String>,
) -> Result<PageEvent<StdioSource>, PageError> {
    let event = match serde_json::from_str(line)? {
        BridgeInput::Message { source, origin, data } => {
            let data = match data {
                serde_json::Value::String(data) => data,
                other => other.to_string(),
            };
            PageEvent::MessageReceived(InboundEvent {
                source: StdioSource::new(source, outbox.clone()),
                origin,
                data,
            })
        },
        BridgeInput::Input { field, value } => {
            let field = match field {
                BridgeField::MasterPassword => Field::MasterPassword,
                BridgeField::Domain => Field::Domain,
                BridgeField::Length => Field::Length,
            };
            PageEvent::Input { field, value }
        },
        BridgeInput::Case { value } => PageEvent::CaseSelected(value),
        BridgeInput::Keydown { code } => PageEvent::KeyDown { code },
        BridgeInput::Submit => PageEvent::Submit,
        BridgeInput::Reveal => PageEvent::Reveal,
        BridgeInput::Adjust { step } => PageEvent::AdjustLength(match step {
            BridgeStep::Up => Step::Up,
            BridgeStep::Down => Step::Down,
        }),
    };
    Ok(event)
}

/// Run the page over a line-oriented input and output until input ends and
/// every fetch has completed. Returns the output once everything is written.
///
/// Must be awaited inside a `LocalSet`.
///
/// # Errors
///
/// Returns the first fatal error of the driver, the reader or the writer.
/// Unparseable input lines are logged and skipped.
pub async fn serve<K, F, R, W>(
    driver: PageDriver<StdioSource, K, F>,
    input: R,
    output: W,
) -> Result<W, PageError>
where
    K: KeyValueStore,
    F: AssetFetcher + 'static,
    R: AsyncBufRead + Unpin + 'static,
    W: AsyncWrite + Unpin + 'static,
{
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let writer = task::spawn_local(write_lines(output, outbox_rx));
    let reader = task::spawn_local(read_events(input, outbox_tx, event_tx));

    let driver = driver.run(event_rx).await?;
    reader.await??;

    // The driver's endpoint holds the last outbox sender.
    drop(driver);
    writer.await?
}

async fn read_events<R: AsyncBufRead + Unpin>(
    input: R,
    outbox: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedSender<PageEvent<StdioSource>>,
) -> Result<(), PageError> {
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line, &outbox) {
            Ok(event) => {
                if events.send(event).is_err() {
                    break;
                }
            },
            Err(e) => tracing::warn!(error = %e, "skipping bridge input line"),
        }
    }
    Ok(())
}

async fn write_lines<W: AsyncWrite + Unpin>(
    mut output: W,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> Result<W, PageError> {
    while let Some(line) = lines.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(output)
}
