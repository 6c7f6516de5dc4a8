//! The product draft: the client-held, not-yet-persisted product.
//!
//! A draft is created empty for the "new product" screen or hydrated from
//! the backend for editing (see [`crate::normalize`]). It is only mutated
//! through the setters below and is discarded without persistence when the
//! screen is left.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexSet;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::CategoryId;

/// Standard garment sizes offered by the size picker: 30 to 50 in steps of 2.
pub const STANDARD_SIZES: [u32; 11] = [30, 32, 34, 36, 38, 40, 42, 44, 46, 48, 50];

/// Server identifier of a stored image. The backend emits these as either
/// numbers or strings, so the textual form is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(pub String);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for MediaId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A local binary file attached to the draft, not yet uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A locally attached image awaiting upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    /// Stable key for list rendering; never sent to the server.
    pub local_id: Uuid,
    /// Local preview, typically a `data:` URL.
    pub preview_url: String,
    pub file: Attachment,
}

impl PendingImage {
    pub fn new(preview_url: String, file: Attachment) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            preview_url,
            file,
        }
    }
}

/// One entry of a draft's image list.
///
/// The two variants can never be confused: only `Persisted` carries a
/// server identifier and only `Pending` carries a file payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRef {
    /// Already stored by the backend. Images that arrived as bare URL
    /// strings have no identifier and therefore cannot be retained on update.
    Persisted { id: Option<MediaId>, url: String },
    /// Attached locally, uploaded on the next submit.
    Pending(PendingImage),
}

impl ImageRef {
    pub fn persisted(id: Option<MediaId>, url: impl Into<String>) -> Self {
        Self::Persisted {
            id,
            url: url.into(),
        }
    }

    /// `true` for images that have not been uploaded yet.
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// URL to display: the stored URL or the local preview.
    pub fn display_url(&self) -> &str {
        match self {
            Self::Persisted { url, .. } => url,
            Self::Pending(p) => &p.preview_url,
        }
    }

    pub fn server_id(&self) -> Option<&MediaId> {
        match self {
            Self::Persisted { id, .. } => id.as_ref(),
            Self::Pending(_) => None,
        }
    }

    pub fn file(&self) -> Option<&Attachment> {
        match self {
            Self::Persisted { .. } => None,
            Self::Pending(p) => Some(&p.file),
        }
    }
}

/// Server-assigned, read-only fields present only when editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerFields {
    pub ulid: Option<String>,
    pub order_count: Option<u64>,
}

/// In-memory representation of a product being authored or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    price: f64,
    pub categories: IndexSet<CategoryId>,
    pub description: String,
    pub status: bool,
    available_sizes: BTreeSet<u32>,
    pub custom_size_available: bool,
    available_colors: IndexSet<String>,
    pub images: Vec<ImageRef>,
    server: Option<ServerFields>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            categories: IndexSet::new(),
            description: String::new(),
            status: true,
            available_sizes: BTreeSet::new(),
            custom_size_available: false,
            available_colors: IndexSet::new(),
            images: Vec::new(),
            server: None,
        }
    }
}

impl ProductDraft {
    /// An empty draft for the "new product" screen.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Ascending, duplicate-free.
    pub fn available_sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.available_sizes.iter().copied()
    }

    /// Insertion order, duplicate-free.
    pub fn available_colors(&self) -> impl Iterator<Item = &str> + '_ {
        self.available_colors.iter().map(String::as_str)
    }

    pub fn server_fields(&self) -> Option<&ServerFields> {
        self.server.as_ref()
    }

    pub(crate) fn set_server_fields(&mut self, fields: ServerFields) {
        self.server = Some(fields);
    }

    /// The first image is the cover by convention.
    pub fn cover(&self) -> Option<&ImageRef> {
        self.images.first()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Rejects negative or non-finite prices, leaving the draft unchanged.
    pub fn set_price(&mut self, price: f64) -> Result<(), CoreError> {
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Validation(format!(
                "price must be a non-negative number, got {price}"
            )));
        }
        self.price = price;
        Ok(())
    }

    pub fn set_status(&mut self, available: bool) {
        self.status = available;
    }

    pub fn set_custom_size_available(&mut self, enabled: bool) {
        self.custom_size_available = enabled;
    }

    /// Select the category if absent, deselect it otherwise. Returns whether
    /// it is selected afterwards.
    pub fn toggle_category(&mut self, id: CategoryId) -> bool {
        if self.categories.shift_remove(&id) {
            false
        } else {
            self.categories.insert(id);
            true
        }
    }

    /// Add the size if absent, remove it otherwise. Returns whether it is
    /// selected afterwards.
    pub fn toggle_size(&mut self, size: u32) -> bool {
        if self.available_sizes.remove(&size) {
            false
        } else {
            self.available_sizes.insert(size);
            true
        }
    }

    pub fn set_sizes(&mut self, sizes: impl IntoIterator<Item = u32>) {
        self.available_sizes = sizes.into_iter().collect();
    }

    /// Append a trimmed color label. Blank input and duplicates are ignored.
    pub fn add_color(&mut self, input: &str) -> bool {
        let label = input.trim();
        if label.is_empty() {
            return false;
        }
        self.available_colors.insert(label.to_string())
    }

    pub fn remove_color(&mut self, label: &str) -> bool {
        self.available_colors.shift_remove(label)
    }
}
