use crate::handler::RequestHandler;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const PROMPT: &str = "> ";
const EXIT_COMMAND: &str = "exit";

/// Interactive loop on the terminal against the shared request handler.
pub async fn run(handler: Arc<RequestHandler>) -> Result<(), StdioError> {
    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    run_with_io(handler, stdin, stdout).await
}

/// Same loop over arbitrary streams; ends on `exit` or end of input.
pub async fn run_with_io<R, W>(
    handler: Arc<RequestHandler>,
    reader: R,
    mut writer: W,
) -> Result<(), StdioError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    write_line(&mut writer, &format!("Type a message, or '{EXIT_COMMAND}' to quit.")).await?;

    loop {
        prompt(&mut writer).await?;
        let Some(line) = lines.next_line().await? else {
            debug!("stdin closed, leaving stdio mode");
            write_line(&mut writer, "").await?;
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        match handler.handle(input).await {
            Ok(response) => write_line(&mut writer, &response).await?,
            Err(err) => {
                warn!(error = %err, "Request failed in stdio mode");
                write_line(&mut writer, &format!("Error: {err}")).await?;
            }
        }
    }

    writer.flush().await?;
    Ok(())
}

async fn prompt<W: AsyncWrite + Unpin>(writer: &mut W) -> io::Result<()> {
    writer.write_all(PROMPT.as_bytes()).await?;
    writer.flush().await
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
