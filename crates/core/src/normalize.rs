//! Inbound mapping: backend product payload → [`ProductDraft`].
//!
//! The backend is loosely typed (ids as numbers or strings, images as bare
//! URLs or objects, flags as booleans or integers). Decoding never fails:
//! anything unrecognised falls back to the empty value for that field.

use serde_json::Value;

use crate::draft::{ImageRef, MediaId, ProductDraft, ServerFields};
use crate::types::CategoryId;
use crate::wire;

/// Build a draft from a product payload, bare or wrapped in `{"data": ...}`.
pub fn product_from_wire(raw: &Value) -> ProductDraft {
    let p = wire::unwrap_envelope(raw);
    let mut draft = ProductDraft::new();

    draft.name = wire::field(p, "name").and_then(wire::text).unwrap_or_default();
    draft.description = wire::field(p, "description")
        .and_then(wire::text)
        .unwrap_or_default();

    let price = wire::field(p, "price").and_then(wire::number).unwrap_or(0.0);
    if draft.set_price(price).is_err() {
        tracing::warn!(price, "Ignoring invalid product price from backend");
    }

    draft.categories = categories_from_wire(p).into_iter().collect();
    draft.status = wire::field(p, "is_active").map_or(true, wire::truthy);
    draft.set_sizes(sizes_from_wire(p));
    draft.custom_size_available = wire::field(p, "custom_tailoring").is_some_and(wire::truthy);

    if let Some(Value::Array(colors)) = wire::field(p, "colors") {
        for color in colors.iter().filter_map(wire::text) {
            draft.add_color(&color);
        }
    }

    draft.images = match wire::field(p, "images") {
        Some(Value::Array(images)) => images.iter().filter_map(image_from_wire).collect(),
        _ => Vec::new(),
    };

    draft.set_server_fields(ServerFields {
        ulid: wire::field(p, "ulid").and_then(wire::text),
        order_count: wire::field(p, "orders_count")
            .and_then(wire::whole)
            .map(u64::from),
    });

    draft
}

/// Category ids from a `categories` list of objects or bare ids, falling
/// back to the legacy single `category_id` field.
fn categories_from_wire(p: &Value) -> Vec<CategoryId> {
    match wire::field(p, "categories") {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|c| match c {
                Value::Object(_) => wire::field(c, "id").and_then(wire::integer),
                other => wire::integer(other),
            })
            .collect(),
        _ => wire::field(p, "category_id")
            .filter(|v| wire::truthy(v))
            .and_then(wire::integer)
            .into_iter()
            .collect(),
    }
}

/// Sizes arrive as numbers or numeric strings. Entries that are not whole
/// non-negative numbers are dropped.
fn sizes_from_wire(p: &Value) -> Vec<u32> {
    match wire::field(p, "sizes") {
        Some(Value::Array(sizes)) => sizes.iter().filter_map(wire::whole).collect(),
        _ => Vec::new(),
    }
}

/// A stored image from either a bare URL string or an object carrying
/// `url` (or its `image` alias) and an optional `id`.
fn image_from_wire(img: &Value) -> Option<ImageRef> {
    match img {
        Value::Null => None,
        Value::String(url) => Some(ImageRef::persisted(None, url.clone())),
        Value::Object(_) => {
            let url = wire::non_empty_text(img, "url")
                .or_else(|| wire::non_empty_text(img, "image"))
                .unwrap_or_default();
            let id = wire::field(img, "id").and_then(wire::text).map(MediaId);
            Some(ImageRef::persisted(id, url))
        }
        _ => Some(ImageRef::persisted(None, String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_payload_in_data_envelope() {
        let raw = json!({
            "data": {
                "name": "Evening Dress",
                "price": "250.5",
                "categories": [{"id": 3, "name": "Dresses"}, {"id": "4"}],
                "description": "Silk",
                "is_active": 0,
                "sizes": ["38", 40, "36"],
                "custom_tailoring": 1,
                "colors": ["Red", "Red", "Navy"],
                "images": [{"id": 11, "url": "http://x/a.jpg"}, {"id": "12", "image": "http://x/b.jpg"}],
                "ulid": "01HZX",
                "orders_count": 9
            }
        });

        let draft = product_from_wire(&raw);
        assert_eq!(draft.name, "Evening Dress");
        assert_eq!(draft.price(), 250.5);
        assert_eq!(draft.categories.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(draft.description, "Silk");
        assert!(!draft.status);
        assert_eq!(draft.available_sizes().collect::<Vec<_>>(), vec![36, 38, 40]);
        assert!(draft.custom_size_available);
        assert_eq!(draft.available_colors().collect::<Vec<_>>(), vec!["Red", "Navy"]);
        assert_eq!(draft.images.len(), 2);
        assert_eq!(draft.images[0].server_id(), Some(&MediaId::from(11)));
        assert_eq!(draft.images[1].display_url(), "http://x/b.jpg");

        let server = draft.server_fields().unwrap();
        assert_eq!(server.ulid.as_deref(), Some("01HZX"));
        assert_eq!(server.order_count, Some(9));
    }

    #[test]
    fn missing_fields_fall_back_to_empty_values() {
        let draft = product_from_wire(&json!({}));
        assert_eq!(draft.name, "");
        assert_eq!(draft.price(), 0.0);
        assert!(draft.categories.is_empty());
        assert_eq!(draft.description, "");
        assert!(draft.status, "missing is_active defaults to available");
        assert_eq!(draft.available_sizes().count(), 0);
        assert!(!draft.custom_size_available);
        assert!(draft.images.is_empty());
    }

    #[test]
    fn legacy_category_id_is_wrapped() {
        let draft = product_from_wire(&json!({"category_id": 7}));
        assert_eq!(draft.categories.iter().copied().collect::<Vec<_>>(), vec![7]);

        let draft = product_from_wire(&json!({"category_id": 0}));
        assert!(draft.categories.is_empty());
    }

    #[test]
    fn categories_list_takes_precedence_over_legacy_field() {
        let draft = product_from_wire(&json!({"categories": [1, 2], "category_id": 9}));
        assert_eq!(draft.categories.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn bare_string_images_become_persisted_without_ids() {
        let raw = json!({"images": ["http://x/a.jpg", "http://x/b.jpg"]});
        let draft = product_from_wire(&raw);

        assert_eq!(draft.images.len(), 2);
        for (img, url) in draft.images.iter().zip(["http://x/a.jpg", "http://x/b.jpg"]) {
            assert!(!img.is_new());
            assert!(img.server_id().is_none());
            assert_eq!(img.display_url(), url);
        }
    }

    #[test]
    fn image_url_prefers_url_then_image_alias() {
        let raw = json!({"images": [
            {"id": 1, "url": "", "image": "http://x/alias.jpg"},
            {"id": 2},
        ]});
        let draft = product_from_wire(&raw);
        assert_eq!(draft.images[0].display_url(), "http://x/alias.jpg");
        assert_eq!(draft.images[1].display_url(), "");
    }

    #[test]
    fn negative_price_falls_back_to_zero() {
        let draft = product_from_wire(&json!({"price": -5}));
        assert_eq!(draft.price(), 0.0);
    }
}
