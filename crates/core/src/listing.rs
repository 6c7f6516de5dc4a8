//! Product listing: search query, paging and the row summary shown in the
//! product grid.

use serde_json::Value;

use crate::error::CoreError;
use crate::payload::FormPayload;
use crate::types::{CategoryId, ProductId};
use crate::wire;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: Option<String>,
    /// `None` means all categories.
    pub category: Option<CategoryId>,
    pub page: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            term: None,
            category: None,
            page: 1,
        }
    }
}

impl SearchQuery {
    /// Multipart body for `POST /search`. Empty filters are omitted.
    pub fn to_form(&self) -> FormPayload {
        let mut form = FormPayload::new();
        if let Some(term) = self.term.as_deref().filter(|t| !t.is_empty()) {
            form.text("search", term);
        }
        if let Some(category) = self.category {
            form.text("category", category.to_string());
        }
        form
    }

    /// Any change to the filters restarts from the first page.
    pub fn set_filters(&mut self, term: Option<String>, category: Option<CategoryId>) {
        if self.term != term || self.category != category {
            self.term = term;
            self.category = category;
            self.page = 1;
        }
    }

    /// Move to `page` if it lies within `1..=last_page`.
    pub fn go_to(&mut self, page: u32, last_page: u32) -> Result<(), CoreError> {
        if page == 0 || page > last_page {
            return Err(CoreError::Validation(format!(
                "page {page} is outside 1..={last_page}"
            )));
        }
        self.page = page;
        Ok(())
    }
}

/// One row of the product grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    /// First category, if any.
    pub category: Option<CategoryId>,
    pub is_active: bool,
    pub orders_count: u64,
    pub colors: Vec<String>,
    pub sizes: Vec<u32>,
    pub cover: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    pub last_page: u32,
}

impl ProductPage {
    /// Decode `{"products": {"data": [...], "meta": {"last_page": n}}}`.
    /// Rows without an id are skipped; `last_page` defaults to 1.
    pub fn from_wire(raw: &Value) -> Self {
        let products = wire::field(raw, "products");
        let rows = match products.and_then(|p| wire::field(p, "data")) {
            Some(Value::Array(rows)) => rows.iter().filter_map(summary_from_wire).collect(),
            _ => Vec::new(),
        };
        let last_page = products
            .and_then(|p| wire::field(p, "meta"))
            .and_then(|m| wire::field(m, "last_page"))
            .and_then(wire::whole)
            .filter(|n| *n > 0)
            .unwrap_or(1);
        Self {
            products: rows,
            last_page,
        }
    }
}

fn summary_from_wire(p: &Value) -> Option<ProductSummary> {
    let id = wire::field(p, "id").and_then(wire::integer)?;
    let images: Vec<String> = match wire::field(p, "images") {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|img| match img {
                Value::String(url) => Some(url.clone()),
                other => wire::non_empty_text(other, "url"),
            })
            .collect(),
        _ => Vec::new(),
    };
    let category = match wire::field(p, "categories") {
        Some(Value::Array(list)) => list
            .first()
            .and_then(|c| wire::field(c, "id"))
            .and_then(wire::integer),
        _ => None,
    };
    Some(ProductSummary {
        id,
        name: wire::field(p, "name").and_then(wire::text).unwrap_or_default(),
        price: wire::field(p, "price").and_then(wire::number).unwrap_or(0.0),
        category,
        is_active: wire::field(p, "is_active").is_some_and(wire::truthy),
        orders_count: wire::field(p, "orders_count")
            .and_then(wire::whole)
            .map_or(0, u64::from),
        colors: match wire::field(p, "colors") {
            Some(Value::Array(list)) => list.iter().filter_map(wire::text).collect(),
            _ => Vec::new(),
        },
        sizes: match wire::field(p, "sizes") {
            Some(Value::Array(list)) => list.iter().filter_map(wire::whole).collect(),
            _ => Vec::new(),
        },
        cover: images.first().cloned(),
        images,
    })
}
