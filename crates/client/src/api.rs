//! REST client for the store backend's admin endpoints.
//!
//! Wraps the backend HTTP API (auth, categories, products, settings) using
//! [`reqwest`]. Every authenticated call reads the token from the
//! [`Session`] first; a 401 clears it and publishes an expiry event before
//! [`ClientError::SessionExpired`] is returned.

use atelier_core::category::{categories_from_wire, find_category, CategoryDraft, CategoryRef};
use atelier_core::draft::ProductDraft;
use atelier_core::listing::{ProductPage, SearchQuery};
use atelier_core::messages::{self, MessagePreference};
use atelier_core::normalize::product_from_wire;
use atelier_core::password::PasswordReset;
use atelier_core::payload::{FormPayload, FormValue};
use atelier_core::routes::Route;
use atelier_core::settings::SiteSettings;
use atelier_core::types::{CategoryId, ProductId};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Shown when a status change succeeds with an empty body.
const STATUS_CHANGED_FALLBACK: &str = "Product status updated.";

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// No bearer token; a 401 is an ordinary rejection (login).
    Public,
    /// Bearer token attached when held; a 401 expires the session.
    Session,
    /// Bearer token required; without one the call fails before sending.
    Required,
}

/// What a 404 means for a given request.
#[derive(Debug, Clone)]
struct NotFoundAs {
    entity: &'static str,
    id: String,
}

/// HTTP client for the admin backend.
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: reqwest::Client,
    config: ClientConfig,
    session: Session,
}

impl AdminApi {
    /// Create a client with a fresh connection pool and the configured
    /// request timeout.
    pub fn new(config: ClientConfig, session: Session) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config, session))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ClientConfig, session: Session) -> Self {
        Self {
            client,
            config,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ---- auth ----

    /// Exchange credentials for a token and store it.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let body = serde_json::json!({ "email": email, "password": password });
        let request = self
            .request(Method::POST, "auth/login", Access::Public)
            .await?
            .json(&body);
        let response = self
            .send(request, Access::Public, None, MessagePreference::ErrorsFirst)
            .await?;

        let body = Self::read_json(response).await?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Api {
                status: StatusCode::OK.as_u16(),
                message: Some("login response did not contain a token".to_string()),
            })?;

        self.session.sign_in(token).await?;
        tracing::info!("Login succeeded");
        Ok(())
    }

    /// Forget the local token. The backend is not contacted.
    pub async fn logout(&self) -> ClientResult<Route> {
        self.session.sign_out().await?;
        tracing::info!("Logged out");
        Ok(Route::Login)
    }

    /// Change the password. On success the current session is invalidated
    /// and the caller must log in again.
    pub async fn reset_password(&self, reset: &PasswordReset) -> ClientResult<Route> {
        reset.validate()?;
        let request = self
            .request(Method::POST, "auth/reset_password", Access::Required)
            .await?
            .json(reset);
        self.send(request, Access::Required, None, MessagePreference::MessageFirst)
            .await?;

        self.session.sign_out().await?;
        tracing::info!("Password changed, session cleared");
        Ok(Route::Login)
    }

    // ---- categories ----

    pub async fn categories(&self) -> ClientResult<Vec<CategoryRef>> {
        let request = self.request(Method::GET, "categories", Access::Session).await?;
        let response = self
            .send(request, Access::Session, None, MessagePreference::MessageFirst)
            .await?;
        let body = Self::read_json(response).await?;
        Ok(categories_from_wire(&body))
    }

    /// Look a category up by id. The backend has no single-category read, so
    /// this filters the full list.
    pub async fn category(&self, id: CategoryId) -> ClientResult<CategoryRef> {
        let list = self.categories().await?;
        Ok(find_category(&list, id)?.clone())
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> ClientResult<()> {
        let form = draft.to_form()?;
        self.post_form("dashboard/category", form, None).await?;
        tracing::info!(name = %draft.name, "Category created");
        Ok(())
    }

    pub async fn update_category(&self, id: CategoryId, draft: &CategoryDraft) -> ClientResult<()> {
        let form = draft.to_form()?;
        let not_found = NotFoundAs {
            entity: "category",
            id: id.to_string(),
        };
        self.post_form(&format!("dashboard/category/{id}/update"), form, Some(not_found))
            .await?;
        tracing::info!(category_id = id, "Category updated");
        Ok(())
    }

    // ---- products ----

    /// Fetch a product and normalize it into an editable draft.
    pub async fn product(&self, id: ProductId) -> ClientResult<ProductDraft> {
        let request = self
            .request(Method::GET, &format!("products/{id}"), Access::Session)
            .await?;
        let not_found = NotFoundAs {
            entity: "product",
            id: id.to_string(),
        };
        let response = self
            .send(
                request,
                Access::Session,
                Some(not_found),
                MessagePreference::MessageFirst,
            )
            .await?;
        let body = Self::read_json(response).await?;
        Ok(product_from_wire(&body))
    }

    pub async fn search_products(&self, query: &SearchQuery) -> ClientResult<ProductPage> {
        let form = Self::multipart(query.to_form())?;
        let request = self
            .request(Method::POST, &format!("search?page={}", query.page), Access::Session)
            .await?
            .multipart(form);
        let response = self
            .send(request, Access::Session, None, MessagePreference::MessageFirst)
            .await?;
        let body = Self::read_json(response).await?;
        Ok(ProductPage::from_wire(&body))
    }

    pub async fn create_product(&self, form: FormPayload) -> ClientResult<()> {
        self.post_form("dashboard/product", form, None).await?;
        tracing::info!("Product created");
        Ok(())
    }

    pub async fn update_product(&self, id: ProductId, form: FormPayload) -> ClientResult<()> {
        let not_found = NotFoundAs {
            entity: "product",
            id: id.to_string(),
        };
        self.post_form(&format!("dashboard/product/{id}/update"), form, Some(not_found))
            .await?;
        tracing::info!(product_id = id, "Product updated");
        Ok(())
    }

    /// Flip a product's availability. Returns the backend's confirmation
    /// text, which is shown to the user as-is.
    pub async fn change_product_status(&self, id: ProductId) -> ClientResult<String> {
        let request = self
            .request(
                Method::POST,
                &format!("dashboard/product/{id}/changeStatus"),
                Access::Required,
            )
            .await?;
        let not_found = NotFoundAs {
            entity: "product",
            id: id.to_string(),
        };
        let response = self
            .send(
                request,
                Access::Required,
                Some(not_found),
                MessagePreference::MessageFirst,
            )
            .await?;

        let text = response.text().await?;
        let message = match serde_json::from_str::<Value>(&text) {
            Ok(Value::String(s)) => s,
            Ok(body) => messages::top_level_message(&body).unwrap_or_else(|| text.trim().to_string()),
            Err(_) => text.trim().to_string(),
        };
        tracing::info!(product_id = id, "Product status changed");
        Ok(if message.is_empty() {
            STATUS_CHANGED_FALLBACK.to_string()
        } else {
            message
        })
    }

    // ---- settings ----

    pub async fn settings(&self) -> ClientResult<SiteSettings> {
        let request = self.request(Method::GET, "settings", Access::Session).await?;
        let response = self
            .send(request, Access::Session, None, MessagePreference::MessageFirst)
            .await?;
        let body = Self::read_json(response).await?;
        Ok(SiteSettings::from_wire(&body))
    }

    pub async fn update_settings(&self, settings: &SiteSettings) -> ClientResult<()> {
        settings.validate()?;
        let request = self
            .request(Method::POST, "dashboard/settings/update", Access::Required)
            .await?
            .json(settings);
        self.send(request, Access::Required, None, MessagePreference::MessageFirst)
            .await?;
        tracing::info!("Settings updated");
        Ok(())
    }

    // ---- private helpers ----

    /// Build a request for `path`, attaching the bearer token as `access`
    /// demands.
    async fn request(
        &self,
        method: Method,
        path: &str,
        access: Access,
    ) -> ClientResult<RequestBuilder> {
        let url = self.config.endpoint(path);
        tracing::debug!(%method, %url, "Preparing request");
        let builder = self.client.request(method, url);

        match access {
            Access::Public => Ok(builder),
            Access::Session => Ok(match self.session.token().await? {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            }),
            Access::Required => match self.session.token().await? {
                Some(token) => Ok(builder.bearer_auth(token)),
                None => {
                    self.session.expire().await;
                    Err(ClientError::SessionExpired)
                }
            },
        }
    }

    async fn post_form(
        &self,
        path: &str,
        form: FormPayload,
        not_found: Option<NotFoundAs>,
    ) -> ClientResult<reqwest::Response> {
        let request = self
            .request(Method::POST, path, Access::Required)
            .await?
            .multipart(Self::multipart(form)?);
        self.send(request, Access::Required, not_found, MessagePreference::MessageFirst)
            .await
    }

    /// Send a request and classify any failure into the client error
    /// taxonomy.
    async fn send(
        &self,
        request: RequestBuilder,
        access: Access,
        not_found: Option<NotFoundAs>,
        preference: MessagePreference,
    ) -> ClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Request failed");
            ClientError::Request(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && access != Access::Public {
            self.session.expire().await;
            return Err(ClientError::SessionExpired);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(NotFoundAs { entity, id }) = not_found {
                tracing::warn!(entity, id = %id, "Resource not found");
                return Err(ClientError::NotFound { entity, id });
            }
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        let message = messages::extract(&body, preference);

        if status.is_client_error() {
            if let Some(message) = message {
                tracing::warn!(status = status.as_u16(), %message, "Request rejected");
                return Err(ClientError::Validation {
                    status: status.as_u16(),
                    message,
                });
            }
        }

        tracing::error!(status = status.as_u16(), body = %text, "Backend returned an error");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json(response: reqwest::Response) -> ClientResult<Value> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Convert a transport-neutral payload into a reqwest multipart form.
    fn multipart(payload: FormPayload) -> ClientResult<Form> {
        payload
            .into_parts()
            .into_iter()
            .try_fold(Form::new(), |form, (name, value)| -> ClientResult<Form> {
                Ok(match value {
                    FormValue::Text(text) => form.text(name, text),
                    FormValue::File(file) => {
                        let part = Part::bytes(file.bytes)
                            .file_name(file.file_name)
                            .mime_str(&file.content_type)?;
                        form.part(name, part)
                    }
                })
            })
    }
}
