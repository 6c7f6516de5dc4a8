//! Category reference data and the category edit form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::Attachment;
use crate::error::CoreError;
use crate::payload::FormPayload;
use crate::types::CategoryId;
use crate::wire;

/// Read-only category entry, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
}

/// Decode a category list, bare or wrapped in `{"data": [...]}`. Entries
/// without a usable id are skipped.
pub fn categories_from_wire(raw: &Value) -> Vec<CategoryRef> {
    let Value::Array(list) = wire::unwrap_envelope(raw) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|c| {
            let id = wire::field(c, "id").and_then(wire::integer)?;
            Some(CategoryRef {
                id,
                name: wire::field(c, "name").and_then(wire::text).unwrap_or_default(),
                image: wire::non_empty_text(c, "image"),
            })
        })
        .collect()
}

pub fn find_category(list: &[CategoryRef], id: CategoryId) -> Result<&CategoryRef, CoreError> {
    list.iter()
        .find(|c| c.id == id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "category",
            id: id.to_string(),
        })
}

/// Editable category fields. The image is only sent when a new file was
/// chosen; otherwise the stored image is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub current_image: Option<String>,
    pub new_image: Option<Attachment>,
}

impl CategoryDraft {
    pub fn from_ref(category: &CategoryRef) -> Self {
        Self {
            name: category.name.clone(),
            current_image: category.image.clone(),
            new_image: None,
        }
    }

    pub fn to_form(&self) -> Result<FormPayload, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("category name is required".to_string()));
        }
        let mut form = FormPayload::new();
        form.text("name", self.name.as_str());
        if let Some(image) = &self.new_image {
            form.file("image", image.clone());
        }
        Ok(form)
    }
}
