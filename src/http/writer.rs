use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Response, ResponsePayload};

pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let eol = resp.line_ending.as_bytes();
    let mut buf = Vec::with_capacity(64 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}",
        resp.version.as_str(),
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());
    buf.extend_from_slice(eol);

    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(eol);
    }

    // Header/body separator
    buf.extend_from_slice(eol);

    buf.extend_from_slice(&resp.body);

    buf
}

/// Writes the whole payload and flushes.
pub async fn write_payload<W>(stream: &mut W, payload: &ResponsePayload) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let bytes = payload.as_bytes();
    let mut written = 0;

    while written < bytes.len() {
        let n = stream.write(&bytes[written..]).await?;

        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "connection closed while writing",
            ));
        }

        written += n;
    }

    stream.flush().await
}
