//! Best-effort line reading for the scanned snapshot.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Reads `path` into lines with separators stripped.
///
/// Never fails: an open or read error is logged and whatever was read
/// before it is returned, possibly nothing. Bytes that are not valid UTF-8
/// are replaced with `U+FFFD` so the rest of the line and file still count.
pub async fn read_lines(path: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to open input file");
            return lines;
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => lines.push(decode_line(&buf)),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    line = lines.len() + 1,
                    error = %error,
                    "failed to read input file, keeping lines read so far"
                );
                break;
            }
        }
    }

    debug!(path = %path.display(), lines = lines.len(), "read input file");
    lines
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
