//! On-disk storage for uploaded audio.

use super::mime::resolve_declared_mime;
use super::UploadError;
use futures::{Stream, StreamExt};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Bytes kept from the start of an upload for content sniffing.
const SNIFF_LEN: usize = 64;

const MAX_EXTENSION_LEN: usize = 10;

/// A successfully stored upload.
#[derive(Debug, Clone)]
pub struct UploadedAudio {
    pub storage_path: PathBuf,
    pub original_name: String,
    pub declared_mime_type: String,
    pub size_bytes: u64,
}

/// Upload directory manager.
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: u64,
    keep_uploads: bool,
    sequence: AtomicU64,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64, keep_uploads: bool) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            keep_uploads,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Initialize the store (creates the upload directory).
    pub async fn init(&self) -> Result<(), UploadError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Unique file name: millisecond timestamp, process-local sequence, original extension.
    fn fresh_name(&self, original_name: &str) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        match safe_extension(original_name) {
            Some(ext) => format!("{}-{}.{}", millis, seq, ext),
            None => format!("{}-{}", millis, seq),
        }
    }

    /// Stream an upload to disk.
    ///
    /// Data lands in a `.part` file that is only renamed into place once the
    /// whole upload arrived within the size limit. An empty upload counts as
    /// no upload.
    pub async fn receive<S, B>(
        &self,
        original_name: &str,
        declared_mime: Option<&str>,
        chunks: S,
    ) -> Result<StoredUpload, UploadError>
    where
        S: Stream<Item = Result<B, UploadError>>,
        B: AsRef<[u8]>,
    {
        let file_name = self.fresh_name(original_name);
        let final_path = self.dir.join(&file_name);
        let part_path = self.dir.join(format!("{}.part", file_name));

        let (size_bytes, head) = match self.write_part(&part_path, chunks).await {
            Ok(written) => written,
            Err(e) => {
                remove_partial(&part_path).await;
                return Err(e);
            }
        };

        commit_part(&part_path, &final_path).await?;

        let audio = UploadedAudio {
            storage_path: final_path,
            original_name: original_name.to_string(),
            declared_mime_type: resolve_declared_mime(declared_mime, &head),
            size_bytes,
        };

        debug!(
            "Stored upload {:?} as {:?} ({} bytes)",
            audio.original_name, audio.storage_path, audio.size_bytes
        );

        Ok(StoredUpload {
            audio,
            keep: self.keep_uploads,
        })
    }

    async fn write_part<S, B>(&self, path: &Path, chunks: S) -> Result<(u64, Vec<u8>), UploadError>
    where
        S: Stream<Item = Result<B, UploadError>>,
        B: AsRef<[u8]>,
    {
        let mut chunks = std::pin::pin!(chunks);
        let mut file = fs::File::create(path).await?;
        let mut size: u64 = 0;
        let mut head = Vec::with_capacity(SNIFF_LEN);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            let data = chunk.as_ref();

            size += data.len() as u64;
            if size > self.max_bytes {
                return Err(UploadError::FileTooLarge {
                    max_bytes: self.max_bytes,
                });
            }

            if head.len() < SNIFF_LEN {
                let take = (SNIFF_LEN - head.len()).min(data.len());
                head.extend_from_slice(&data[..take]);
            }

            file.write_all(data).await?;
        }

        file.flush().await?;

        if size == 0 {
            return Err(UploadError::MissingFile);
        }

        Ok((size, head))
    }
}

/// Moves a finished `.part` file into place, dropping it if the move fails.
async fn commit_part(part_path: &Path, final_path: &Path) -> Result<(), UploadError> {
    if let Err(e) = fs::rename(part_path, final_path).await {
        remove_partial(part_path).await;
        return Err(e.into());
    }
    Ok(())
}

async fn remove_partial(part_path: &Path) {
    if let Err(e) = fs::remove_file(part_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove partial upload {:?}: {}", part_path, e);
        }
    }
}

/// The lowercased extension of a client-supplied name, if it is plain ASCII alphanumerics.
fn safe_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// An upload on disk, deleted when dropped unless uploads are kept.
#[derive(Debug)]
pub struct StoredUpload {
    audio: UploadedAudio,
    keep: bool,
}

impl StoredUpload {
    pub fn audio(&self) -> &UploadedAudio {
        &self.audio
    }
}

impl Deref for StoredUpload {
    type Target = UploadedAudio;

    fn deref(&self) -> &Self::Target {
        &self.audio
    }
}

// Drop cannot await, so removal is a blocking call on the runtime thread.
// Uploads are single files, so this stays short.
impl Drop for StoredUpload {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_file(&self.audio.storage_path) {
            Ok(()) => debug!("Removed upload {:?}", self.audio.storage_path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove upload {:?}: {}",
                self.audio.storage_path, e
            ),
        }
    }
}
