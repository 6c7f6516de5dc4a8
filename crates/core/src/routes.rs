//! Screens the dashboard can navigate to after an operation settles.

use std::fmt;

use crate::types::{CategoryId, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    ProductList,
    NewProduct,
    EditProduct(ProductId),
    CategoryList,
    EditCategory(CategoryId),
    Settings,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::ProductList => "/".to_string(),
            Route::NewProduct => "/products/new".to_string(),
            Route::EditProduct(id) => format!("/products/{id}/edit"),
            Route::CategoryList => "/categories".to_string(),
            Route::EditCategory(id) => format!("/categories/{id}/edit"),
            Route::Settings => "/settings".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
