use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::supervisor::ProcessEvent;

/// Reads `reader` line by line and forwards each line wrapped by `wrap`.
/// A final line without a trailing newline is still delivered.
pub(crate) fn pump_lines<R>(
    reader: R,
    tx: mpsc::UnboundedSender<ProcessEvent>,
    stream: &'static str,
    wrap: fn(String) -> ProcessEvent,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::with_capacity(256);
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(wrap(decode_line(&buf))).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(stream, error = %e, "read from child failed");
                    break;
                }
            }
        }
    })
}

pub(crate) fn decode_line(buf: &[u8]) -> String {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    let buf = buf.strip_suffix(b"\r").unwrap_or(buf);
    String::from_utf8_lossy(buf).into_owned()
}
