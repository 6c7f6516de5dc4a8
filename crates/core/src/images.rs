//! Image staging for a draft: attach local files, remove entries.
//!
//! Removing a stored image makes no server call. It only drops the id from
//! the retained list sent on the next update, which the backend treats as
//! "detach this image".

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::draft::{Attachment, ImageRef, PendingImage};
use crate::error::CoreError;

/// Order in which concurrently read files are appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddOrder {
    /// Each file is appended as soon as its preview is ready.
    #[default]
    Completion,
    /// Files are appended in the order they were selected.
    Selection,
}

impl std::str::FromStr for AddOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completion" => Ok(Self::Completion),
            "selection" => Ok(Self::Selection),
            other => Err(CoreError::Validation(format!(
                "unknown image order '{other}', expected 'completion' or 'selection'"
            ))),
        }
    }
}

/// Result of a batch add: how many files were staged and which failed.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: usize,
    pub failed: Vec<(PathBuf, CoreError)>,
}

/// Mutable view over a draft's image list.
pub struct ImageStager<'a> {
    images: &'a mut Vec<ImageRef>,
}

impl<'a> ImageStager<'a> {
    pub fn new(images: &'a mut Vec<ImageRef>) -> Self {
        Self { images }
    }

    /// Append an already-prepared pending image.
    pub fn push(&mut self, image: PendingImage) {
        self.images.push(ImageRef::Pending(image));
    }

    /// Remove the entry at `index`. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<ImageRef> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Read the given files concurrently and append one pending image per
    /// readable file. A failed read never discards the others.
    pub async fn add_files<P: AsRef<Path>>(&mut self, paths: &[P], order: AddOrder) -> AddReport {
        let mut report = AddReport::default();

        let mut reads: FuturesUnordered<_> = paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let path = path.as_ref().to_path_buf();
                async move {
                    let result = read_preview(&path).await;
                    (index, path, result)
                }
            })
            .collect();

        let mut ready = Vec::with_capacity(paths.len());
        while let Some(done) = reads.next().await {
            match order {
                AddOrder::Completion => self.accept(done, &mut report),
                AddOrder::Selection => ready.push(done),
            }
        }

        ready.sort_by_key(|(index, _, _)| *index);
        for done in ready {
            self.accept(done, &mut report);
        }

        report
    }

    fn accept(
        &mut self,
        (_, path, result): (usize, PathBuf, Result<PendingImage, CoreError>),
        report: &mut AddReport,
    ) {
        match result {
            Ok(image) => {
                tracing::debug!(path = %path.display(), "Staged image");
                self.push(image);
                report.added += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read image");
                report.failed.push((path, e));
            }
        }
    }
}

/// Read a local file and derive its `data:` URL preview. No network access.
pub async fn read_preview(path: &Path) -> Result<PendingImage, CoreError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CoreError::Io(format!("{}: {e}", path.display())))?;

    let content_type = content_type_for(path).to_string();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let preview_url = format!("data:{content_type};base64,{}", BASE64.encode(&bytes));
    Ok(PendingImage::new(
        preview_url,
        Attachment {
            file_name,
            content_type,
            bytes,
        },
    ))
}

/// MIME type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
