/*!
 * Markdown block writer for ctxcopy
 *
 * Every surviving file becomes one fenced code block labeled with a language
 * hint and its display path. The layout is consumed verbatim by downstream
 * tooling, so it is kept byte-exact:
 *
 * ~~~text
 * <"\n\n" if the buffer already holds something>
 * ```<hint> <display path>
 * <raw content><"\n" if content is non-empty and lacks one>
 * ```
 * ~~~
 */

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::{info, warn};

use crate::language::language_hint;
use crate::types::{EntryOutcome, SkipReason};

/// Files larger than this are left out entirely
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Only NUL bytes paired within this many leading bytes are tolerated
const WIDE_CHAR_WINDOW: usize = 10;

const FENCE: &[u8] = b"```";
const SEPARATOR: &[u8] = b"\n\n";

/// Append-only buffer holding the final artifact
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Raw artifact bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Artifact as text, with invalid UTF-8 replaced
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Consume the buffer, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the blank-line separator unless the buffer is empty
    pub fn push_separator(&mut self) {
        if !self.is_empty() {
            self.bytes.extend_from_slice(SEPARATOR);
        }
    }

    /// Append free-form text (the trailing prompt), separated from prior content
    pub fn append_text(&mut self, text: &str) {
        self.push_separator();
        self.bytes.extend_from_slice(text.as_bytes());
    }

    /// Append one fenced block
    pub fn append_block(&mut self, hint: &str, display_path: &str, content: &[u8]) {
        self.push_separator();

        self.bytes.extend_from_slice(FENCE);
        if !hint.is_empty() {
            self.bytes.extend_from_slice(hint.as_bytes());
            self.bytes.push(b' ');
        }
        self.bytes.extend_from_slice(display_path.as_bytes());
        self.bytes.push(b'\n');

        self.bytes.extend_from_slice(content);
        if content.last().is_some_and(|&b| b != b'\n') {
            self.bytes.push(b'\n');
        }

        self.bytes.extend_from_slice(FENCE);
        self.bytes.push(b'\n');
    }
}

/// Check content for NUL bytes.
///
/// One pair of consecutive NULs starting within the first ten bytes is
/// tolerated; any other NUL means binary.
pub fn is_binary(content: &[u8]) -> bool {
    let mut tolerated = false;
    let mut i = 0;

    while i < content.len() {
        if content[i] == 0 {
            if !tolerated && i < WIDE_CHAR_WINDOW && content.get(i + 1) == Some(&0) {
                tolerated = true;
                i += 2;
                continue;
            }
            return true;
        }
        i += 1;
    }

    false
}

/// Serializes single files into an [`OutputBuffer`]
#[derive(Debug, Clone)]
pub struct BlockWriter {
    max_file_size: u64,
}

impl Default for BlockWriter {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl BlockWriter {
    /// Create a writer with the standard 1 MiB size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` and append its block, or report why it was left out
    pub fn serialize(
        &self,
        path: &Path,
        display_path: &str,
        buffer: &mut OutputBuffer,
    ) -> EntryOutcome {
        let content = match self.read_limited(path) {
            Ok(ReadContent::Complete(content)) => content,
            Ok(ReadContent::TooLarge(size)) => {
                info!("Skipping large file (> 1MB): {}", display_path);
                return EntryOutcome::Skipped(SkipReason::TooLarge(size));
            }
            Err(e) => {
                warn!("Error reading file {}: {}", display_path, e);
                return EntryOutcome::Errored(e.to_string());
            }
        };

        if is_binary(&content) {
            info!("Skipping likely binary file: {}", display_path);
            return EntryOutcome::Skipped(SkipReason::Binary);
        }

        info!("Adding file: {}", display_path);
        buffer.append_block(&language_hint(path), display_path, &content);

        EntryOutcome::Serialized(content.len() as u64)
    }

    /// Read at most one byte past the limit
    fn read_limited(&self, path: &Path) -> io::Result<ReadContent> {
        let file = File::open(path)?;
        let reported_size = file.metadata().map(|m| m.len()).ok();

        let mut content = Vec::new();
        file.take(self.max_file_size + 1).read_to_end(&mut content)?;

        if content.len() as u64 > self.max_file_size {
            let size = reported_size.unwrap_or(content.len() as u64);
            return Ok(ReadContent::TooLarge(size));
        }

        Ok(ReadContent::Complete(content))
    }
}

enum ReadContent {
    Complete(Vec<u8>),
    TooLarge(u64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_block_layout() {
        let mut buffer = OutputBuffer::new();
        buffer.append_block("go", "cmd/main.go", b"package main\n");
        assert_eq!(buffer.to_string_lossy(), "```go cmd/main.go\npackage main\n```\n");
    }

    #[test]
    fn test_blocks_are_separated() {
        let mut buffer = OutputBuffer::new();
        buffer.append_block("", "LICENSE", b"MIT");
        buffer.append_block("rust", "lib.rs", b"");
        assert_eq!(
            buffer.to_string_lossy(),
            "```LICENSE\nMIT\n```\n\n\n```rust lib.rs\n```\n"
        );
    }

    #[test]
    fn test_append_text_after_blocks() {
        let mut buffer = OutputBuffer::new();
        buffer.append_text("Refactor this");
        assert_eq!(buffer.as_bytes(), b"Refactor this");

        buffer.append_text("again");
        assert_eq!(buffer.as_bytes(), b"Refactor this\n\nagain");
    }

    #[test]
    fn test_binary_detection() {
        assert!(is_binary(b"a\x00b"));
        assert!(!is_binary(b"\x00\x00hello"));
        assert!(!is_binary(b"plain text"));
        assert!(!is_binary(b""));
        // The paired allowance applies once and only near the start
        assert!(is_binary(b"\x00\x00h\x00\x00i"));
        assert!(is_binary(b"0123456789\x00\x00"));
        assert!(is_binary(b"ab\x00"));
    }

    #[test]
    fn test_size_gate_boundary() {
        let dir = tempdir().unwrap();
        let exact = dir.path().join("exact.txt");
        let over = dir.path().join("over.txt");
        fs::write(&exact, vec![b'a'; MAX_FILE_SIZE as usize]).unwrap();
        fs::write(&over, vec![b'a'; MAX_FILE_SIZE as usize + 1]).unwrap();

        let writer = BlockWriter::new();
        let mut buffer = OutputBuffer::new();

        assert_eq!(
            writer.serialize(&exact, "exact.txt", &mut buffer),
            EntryOutcome::Serialized(MAX_FILE_SIZE)
        );
        let len_after_exact = buffer.len();

        assert_eq!(
            writer.serialize(&over, "over.txt", &mut buffer),
            EntryOutcome::Skipped(SkipReason::TooLarge(MAX_FILE_SIZE + 1))
        );
        assert_eq!(buffer.len(), len_after_exact);
    }

    #[test]
    fn test_serialize_appends_missing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "first\nlast").unwrap();

        let mut buffer = OutputBuffer::new();
        BlockWriter::new().serialize(&path, "notes.txt", &mut buffer);

        assert_eq!(buffer.to_string_lossy(), "```text notes.txt\nfirst\nlast\n```\n");
    }

    #[test]
    fn test_serialize_skips_binary_and_missing_files() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("blob.bin");
        fs::write(&bin, b"a\x00b").unwrap();

        let writer = BlockWriter::new();
        let mut buffer = OutputBuffer::new();

        assert_eq!(
            writer.serialize(&bin, "blob.bin", &mut buffer),
            EntryOutcome::Skipped(SkipReason::Binary)
        );
        assert!(matches!(
            writer.serialize(&dir.path().join("missing.txt"), "missing.txt", &mut buffer),
            EntryOutcome::Errored(_)
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_serialize_keeps_non_utf8_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9\n").unwrap();

        let mut buffer = OutputBuffer::new();
        BlockWriter::new().serialize(&path, "latin1.txt", &mut buffer);

        assert_eq!(buffer.as_bytes(), b"```text latin1.txt\ncaf\xe9\n```\n");
    }
}
