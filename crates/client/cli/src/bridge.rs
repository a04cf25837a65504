//! Line-delimited JSON bridge between a presentation process and the runtime.
use anyhow::Result;
use tap_runtime::{ActionResponse, RuntimeHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest request line accepted, newline excluded.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Answer every request line until `input` is exhausted.
///
/// Blank lines are skipped. Lines that are not UTF-8 or exceed
/// [`MAX_REQUEST_BYTES`] get a failure reply and the loop moves on; only I/O
/// errors on the streams themselves end it. Returns the number of requests
/// served.
pub async fn serve<R, W>(handle: &RuntimeHandle, mut input: R, mut output: W) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut served = 0;

    loop {
        buf.clear();
        let read = (&mut input)
            .take(MAX_REQUEST_BYTES as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if read == 0 {
            break;
        }

        let reply = if buf.last() != Some(&b'\n') && buf.len() > MAX_REQUEST_BYTES {
            discard_rest_of_line(&mut input).await?;
            tracing::warn!("rejected request line over {} bytes", MAX_REQUEST_BYTES);
            ActionResponse::failure(format!(
                "bad request: line exceeds {MAX_REQUEST_BYTES} bytes"
            ))
            .to_json()
        } else {
            match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    handle.dispatch(line).await
                }
                Err(e) => {
                    tracing::warn!("rejected request line: {}", e);
                    ActionResponse::failure(format!("bad request: {e}")).to_json()
                }
            }
        };

        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        served += 1;
    }

    Ok(served)
}

async fn discard_rest_of_line<R>(input: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut scratch = Vec::new();
    loop {
        scratch.clear();
        let read = (&mut *input)
            .take(MAX_REQUEST_BYTES as u64)
            .read_until(b'\n', &mut scratch)
            .await?;
        if read == 0 || scratch.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;
    use tap_runtime::{InMemoryPlayerStore, Runtime};

    use super::*;

    fn replies(output: Vec<u8>) -> Vec<Value> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn start() -> Runtime {
        Runtime::builder()
            .store(Arc::new(InMemoryPlayerStore::new()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn answers_each_line_in_order() {
        let runtime = start();
        let handle = runtime.handle();

        let input = concat!(
            r#"{"user_id": 5, "action": "tap"}"#,
            "\n\n",
            r#"{"user_id": 5, "action": "set_name_from_app", "name": "Eve"}"#,
            "\n",
            "garbage\n",
            r#"{"user_id": 5, "action": "get_state"}"#,
            "\n",
        );
        let mut output = Vec::new();

        let served = serve(&handle, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(served, 4);

        let replies = replies(output);
        assert_eq!(replies.len(), 4);
        assert_eq!(replies[0]["coins"], 1);
        assert_eq!(replies[1]["success"], true);
        assert_eq!(replies[2]["success"], false);
        assert_eq!(replies[3]["display_name"], "Eve");
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_stop_later_requests() {
        let runtime = start();
        let handle = runtime.handle();

        let mut input = Vec::new();
        input.extend_from_slice(br#"{"user_id": 8, "action": "tap"}"#);
        input.extend_from_slice(b"\n\xff\xfe\n");
        input.extend_from_slice(br#"{"user_id": 8, "action": "tap"}"#);
        input.extend_from_slice(b"\n");
        let mut output = Vec::new();

        let served = serve(&handle, input.as_slice(), &mut output).await.unwrap();
        assert_eq!(served, 3);

        let replies = replies(output);
        assert_eq!(replies[0]["coins"], 1);
        assert_eq!(replies[1]["success"], false);
        assert!(replies[1]["error"].as_str().unwrap().starts_with("bad request"));
        assert_eq!(replies[2]["coins"], 2);
    }

    #[tokio::test]
    async fn oversized_line_is_rejected_and_skipped() {
        let runtime = start();
        let handle = runtime.handle();

        let mut input = vec![b' '; MAX_REQUEST_BYTES * 2 + 10];
        input.push(b'\n');
        input.extend_from_slice(br#"{"user_id": 9, "action": "get_state"}"#);
        input.push(b'\n');
        let mut output = Vec::new();

        let served = serve(&handle, input.as_slice(), &mut output).await.unwrap();
        assert_eq!(served, 2);

        let replies = replies(output);
        assert_eq!(replies[0]["success"], false);
        assert_eq!(replies[1]["success"], true);
        assert_eq!(replies[1]["coins"], 0);
    }
}
