//! Persistence boundary for processed results.
//!
//! The pipeline treats storage as a write-only collaborator: nothing read
//! back from here ever feeds into pixel output.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

use uuid::Uuid;

/// Listing size callers get when they don't ask for a specific one.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// A stored processing result.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Generated identifier.
    pub id: Uuid,
    /// File name the caller uploaded.
    pub original_name: String,
    /// Base64-encoded output image.
    pub processed_data: String,
    /// Request id of the filter that was applied.
    pub filter_type: String,
    /// Intensity the filter ran at.
    pub intensity: f32,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// A record to persist, before an id and timestamp are assigned.
#[derive(Debug, Clone)]
pub struct NewProcessedImage {
    /// File name the caller uploaded.
    pub original_name: String,
    /// Base64-encoded output image.
    pub processed_data: String,
    /// Request id of the filter that was applied.
    pub filter_type: String,
    /// Intensity the filter ran at.
    pub intensity: f32,
}

/// Storage backend for processed images.
///
/// Implementations must be safe to share across concurrent pipeline
/// invocations.
pub trait ImageStore: Send + Sync {
    /// Persist a new record, assigning it an id and creation timestamp.
    fn create(&self, image: NewProcessedImage) -> ProcessedImage;

    /// Fetch a record by id.
    fn get(&self, id: &Uuid) -> Option<ProcessedImage>;

    /// The most recently created records, newest first, at most `limit`.
    fn recent(&self, limit: usize) -> Vec<ProcessedImage>;
}

/// Thread-safe in-memory [`ImageStore`].
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<MemStoreInner>,
}

#[derive(Default)]
struct MemStoreInner {
    images: HashMap<Uuid, (u64, ProcessedImage)>,
    // SystemTime can collapse rapid inserts into one tick; the sequence
    // keeps `recent` ordering deterministic.
    next_seq: u64,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemStore {
    fn create(&self, image: NewProcessedImage) -> ProcessedImage {
        let record = ProcessedImage {
            id: Uuid::new_v4(),
            original_name: image.original_name,
            processed_data: image.processed_data,
            filter_type: image.filter_type,
            intensity: image.intensity,
            created_at: SystemTime::now(),
        };

        let mut inner = self.inner.write().expect("store lock poisoned");
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.images.insert(record.id, (seq, record.clone()));
        record
    }

    fn get(&self, id: &Uuid) -> Option<ProcessedImage> {
        self.inner
            .read()
            .expect("store lock poisoned")
            .images
            .get(id)
            .map(|(_, record)| record.clone())
    }

    fn recent(&self, limit: usize) -> Vec<ProcessedImage> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records: Vec<&(u64, ProcessedImage)> = inner.images.values().collect();
        records.sort_by(|a, b| {
            b.1.created_at
                .cmp(&a.1.created_at)
                .then_with(|| b.0.cmp(&a.0))
        });
        records
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect()
    }
}
