// CGI response framing: header block, blank line, JSON body on stdout

use crate::models::MetricsSnapshot;
use std::io::Write;

/// Set by the invoking web server (`CGI/1.1`).
pub const GATEWAY_INTERFACE: &str = "GATEWAY_INTERFACE";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// True when the process was started by a web server as a CGI script.
pub fn is_cgi_invocation() -> bool {
    std::env::var_os(GATEWAY_INTERFACE).is_some_and(|v| !v.is_empty())
}

/// Writes `Content-Type: application/json`, a blank line, then the snapshot as compact JSON.
pub fn write_response<W: Write>(w: &mut W, snapshot: &MetricsSnapshot) -> anyhow::Result<()> {
    let body = serde_json::to_vec(snapshot)?;
    write!(w, "Content-Type: {CONTENT_TYPE_JSON}\n\n")?;
    w.write_all(&body)?;
    w.flush()?;
    Ok(())
}

/// Writes a `Status: 500` response, used when even framing the snapshot failed.
pub fn write_error_response<W: Write>(w: &mut W, message: &str) -> anyhow::Result<()> {
    let body = serde_json::json!({ "error": message });
    write!(
        w,
        "Status: 500 Internal Server Error\nContent-Type: {CONTENT_TYPE_JSON}\n\n{body}"
    )?;
    w.flush()?;
    Ok(())
}
