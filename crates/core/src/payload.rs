//! Outbound mapping: [`ProductDraft`] → multipart form payload.
//!
//! The payload is a transport-neutral list of named parts; the client crate
//! turns it into an HTTP multipart body. Repeated fields use the backend's
//! `name[]` convention.

use crate::draft::{Attachment, ImageRef, MediaId, ProductDraft};

pub const FIELD_NAME: &str = "name";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_CATEGORIES: &str = "categories[]";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CUSTOM_TAILORING: &str = "custom_tailoring";
pub const FIELD_SIZES: &str = "sizes[]";
pub const FIELD_COLORS: &str = "colors[]";
/// Newly attached image files.
pub const FIELD_NEW_MEDIA: &str = "media[]";
/// Ids of stored images the server must keep; omitted ids are detached.
pub const FIELD_RETAINED_MEDIA: &str = "wanted_media[]";

/// Which endpoint the payload is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(Attachment),
}

/// Ordered multipart fields. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    parts: Vec<(String, FormValue)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.parts
            .push((name.to_string(), FormValue::Text(value.into())));
        self
    }

    pub fn file(&mut self, name: &str, file: Attachment) -> &mut Self {
        self.parts.push((name.to_string(), FormValue::File(file)));
        self
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<(String, FormValue)> {
        self.parts
    }

    /// All text values stored under `name`, in order.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, v)| match v {
                FormValue::Text(t) => Some(t.as_str()),
                FormValue::File(_) => None,
            })
            .collect()
    }

    /// All files stored under `name`, in order.
    pub fn files(&self, name: &str) -> Vec<&Attachment> {
        self.parts
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, v)| match v {
                FormValue::File(f) => Some(f),
                FormValue::Text(_) => None,
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }
}

/// Ids of stored images still present in the draft, in display order.
pub fn retained_media(draft: &ProductDraft) -> Vec<MediaId> {
    draft
        .images
        .iter()
        .filter_map(ImageRef::server_id)
        .cloned()
        .collect()
}

/// Build the create/update payload for a draft.
///
/// Status is not part of the payload; it has its own endpoint. Server-only
/// fields (`ulid`, order count) are never sent. Stored images are referenced
/// by id on update and never re-uploaded.
pub fn product_to_form(draft: &ProductDraft, mode: SubmitMode) -> FormPayload {
    let mut form = FormPayload::new();

    form.text(FIELD_NAME, draft.name.as_str())
        .text(FIELD_PRICE, draft.price().to_string());
    for id in &draft.categories {
        form.text(FIELD_CATEGORIES, id.to_string());
    }
    form.text(FIELD_DESCRIPTION, draft.description.as_str())
        .text(
            FIELD_CUSTOM_TAILORING,
            if draft.custom_size_available { "1" } else { "0" },
        );
    for size in draft.available_sizes() {
        form.text(FIELD_SIZES, size.to_string());
    }
    for color in draft.available_colors() {
        form.text(FIELD_COLORS, color);
    }

    for image in &draft.images {
        match image {
            ImageRef::Pending(pending) => {
                form.file(FIELD_NEW_MEDIA, pending.file.clone());
            }
            ImageRef::Persisted { id: Some(id), .. } if mode == SubmitMode::Update => {
                form.text(FIELD_RETAINED_MEDIA, id.0.as_str());
            }
            ImageRef::Persisted { .. } => {}
        }
    }

    form
}
