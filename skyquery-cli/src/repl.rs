use crate::turn::{apology, TurnHandler};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

pub const GREETING: &str = "Hello. I am a travel planning assistant. How can I help you today?";
pub const PROMPT: &str = ">> ";
pub const REPLY_PREFIX: &str = "|> ";

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(format!("{}{}\n", REPLY_PREFIX, text).as_bytes()).await?;
    output.flush().await
}

/// Read lines until `exit` or end of input, answering each through `handler`.
/// Failed turns print an apology and the loop carries on.
pub async fn run<R, W>(handler: &mut dyn TurnHandler, input: R, output: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    say(output, GREETING).await?;
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let span = info_span!("turn", id = %Uuid::new_v4());
        let reply = match handler.handle(line).instrument(span).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Turn failed: {}", e);
                apology(&e).to_string()
            }
        };
        say(output, &reply).await?;
    }

    Ok(())
}
