use tracing::warn;

/// Longest unterminated fragment kept between chunks.
pub const MAX_FRAGMENT_LEN: usize = 64 * 1024;

/// Accumulates transport chunks and yields complete lines.
///
/// Lines end at `\n`; a trailing `\r` is stripped and empty lines are
/// skipped. Bytes after the last terminator are kept for the next chunk.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let mut line = &self.pending[start..end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            if !line.is_empty() {
                lines.push(String::from_utf8_lossy(line).into_owned());
            }
            start = end + 1;
        }
        self.pending.drain(..start);

        if self.pending.len() > MAX_FRAGMENT_LEN {
            warn!(
                "Dropping {} byte unterminated fragment from console",
                self.pending.len()
            );
            self.pending.clear();
        }
        lines
    }

    /// Bytes waiting for a terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
