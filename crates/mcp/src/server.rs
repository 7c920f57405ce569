//! Newline-delimited JSON-RPC server loop.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::handler::Handler;
use crate::protocol::{JsonRpcError, JsonRpcResponse};

/// Maximum request size (1MB).
pub const MAX_LINE_SIZE: usize = 1024 * 1024;

/// Serves one client until its input closes.
pub struct Server {
    handler: Handler,
}

impl Server {
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }

    /// Serve over the process's stdin and stdout.
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests read from `reader`, one JSON object per line.
    ///
    /// Requests are handled in arrival order; responses are flushed as
    /// soon as they are written. At most `MAX_LINE_SIZE` bytes of a line
    /// are buffered; the rest of an oversized line is skipped.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(tools = self.handler.registry().len(), "mcp server started");
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let bytes_read = (&mut reader)
                .take(MAX_LINE_SIZE as u64 + 1)
                .read_until(b'\n', &mut buf)
                .await?;
            if bytes_read == 0 {
                break;
            }

            let response = if buf.len() > MAX_LINE_SIZE && buf.last() != Some(&b'\n') {
                warn!(max = MAX_LINE_SIZE, "request too large");
                discard_line(&mut reader).await?;
                Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::invalid_request(format!(
                        "request too large (max {MAX_LINE_SIZE} bytes)"
                    )),
                ))
            } else {
                match std::str::from_utf8(&buf) {
                    Ok(line) if line.trim().is_empty() => continue,
                    Ok(line) => self.handler.handle_line(line.trim()).await,
                    Err(e) => Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error(e))),
                }
            };

            if let Some(response) = response {
                let json = serde_json::to_string(&response)?;
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        debug!("input closed, mcp server stopping");
        Ok(())
    }
}

/// Drop input up to and including the next newline.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;
    use tools::{ToolDescriptor, ToolError, ToolRegistry};

    fn server() -> Server {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::builder("current_time")
                    .description("Returns the current time.")
                    .handler(|_| Ok::<_, ToolError>("12:00:00")),
            )
            .unwrap();
        Server::new(Handler::new(Arc::new(registry)))
    }

    fn responses(output: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn answers_each_request_line() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"current_time"}}"#,
            "\n",
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let responses = responses(&output);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["content"][0]["text"], "12:00:00");
    }

    #[tokio::test]
    async fn oversized_line_is_rejected_and_skipped() {
        let mut input = " ".repeat(MAX_LINE_SIZE + 10);
        input.push_str("{}\n");
        input.push_str(r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.push('\n');
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let responses = responses(&output);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], JsonRpcError::INVALID_REQUEST);
        assert_eq!(responses[1]["id"], 2);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_a_parse_error() {
        let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\xff\xfe\"}\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.push(b'\n');
        let mut output = Vec::new();
        server().serve(input.as_slice(), &mut output).await.unwrap();

        let responses = responses(&output);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"], serde_json::json!({}));
    }
}
