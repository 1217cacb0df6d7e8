use std::sync::Arc;

use xxhash_rust::xxh3::Xxh3;

use crate::model::document::Document;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Stable 128-bit digest of a document's serialized value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Immutable deep copy of document state for undo/redo.
///
/// Cloning a snapshot shares the captured state; nothing can mutate it afterwards.
#[derive(Clone, Debug)]
pub struct Snapshot {
    state: Arc<Document>,
    fingerprint: StateFingerprint,
}

impl Snapshot {
    /// Capture `doc`.
    pub fn capture(doc: &Document) -> Self {
        Self {
            fingerprint: fingerprint_document(doc),
            state: Arc::new(doc.clone()),
        }
    }

    /// Captured state.
    pub fn state(&self) -> &Document {
        &self.state
    }

    /// Owned copy of the captured state, for restoring into a live document.
    pub fn to_document(&self) -> Document {
        self.state.as_ref().clone()
    }

    /// Digest of the captured state.
    pub fn fingerprint(&self) -> StateFingerprint {
        self.fingerprint
    }

    /// Whether both snapshots hold the same serialized value.
    pub fn same_state(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.state == other.state
    }
}

struct HashWriter(Xxh3);

impl std::io::Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Digest of `doc`'s JSON serialization.
pub fn fingerprint_document(doc: &Document) -> StateFingerprint {
    let mut w = HashWriter(Xxh3::with_seed(XXH3_SEED));
    if let Err(e) = serde_json::to_writer(&mut w, doc) {
        tracing::warn!(error = %e, "document fingerprint is partial");
    }
    let v = w.0.digest128();
    StateFingerprint {
        hi: (v >> 64) as u64,
        lo: v as u64,
    }
}
