//! Conversion output value types and deterministic output naming.

use std::sync::Arc;

/// A host-supplied input file: a name and a shared, read-only byte buffer.
///
/// The bytes are behind an `Arc` so previews and codec calls can share the
/// buffer without copying; nothing in the library mutates it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name as supplied by the host, extension included.
    pub name: String,
    /// Raw file content.
    pub bytes: Arc<Vec<u8>>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes.into()),
        }
    }

    /// Byte length of the file content.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The binary output of a successful conversion, paired with a suggested
/// download filename and MIME type.
///
/// Produced by the codec operations; the session registers the bytes into its
/// object store and keeps the resulting reference for download.
#[derive(Debug, Clone)]
pub struct ConvertedArtifact {
    /// Output bytes.
    pub bytes: Vec<u8>,
    /// Suggested output filename, derived deterministically from the input
    /// name (strip original extension, apply the new one). No collision
    /// handling; overwrite semantics are the host's responsibility.
    pub file_name: String,
    /// MIME type of the output bytes.
    pub mime: &'static str,
}

/// Strip the final extension from a filename.
///
/// Mirrors the product's naming rule: remove a trailing `.ext` where `ext` is
/// non-empty and contains neither `.` nor `/`. `"archive.tar.gz"` becomes
/// `"archive.tar"`; a name without such a suffix is returned unchanged.
pub fn file_stem(name: &str) -> &str {
    if let Some(idx) = name.rfind('.') {
        let ext = &name[idx + 1..];
        if !ext.is_empty() && !ext.contains('.') && !ext.contains('/') {
            return &name[..idx];
        }
    }
    name
}
