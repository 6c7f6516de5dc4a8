//! Form-level orchestration for the product, category and settings screens.
//!
//! Each form owns its draft for as long as the screen is open. Failed
//! requests never touch the draft, so the user can fix the problem and
//! resubmit without losing input.

use std::path::Path;

use atelier_core::category::CategoryDraft;
use atelier_core::category::CategoryRef;
use atelier_core::draft::ProductDraft;
use atelier_core::error::CoreError;
use atelier_core::images::{read_preview, AddReport, ImageStager};
use atelier_core::optimistic::StatusToggle;
use atelier_core::payload::{product_to_form, SubmitMode};
use atelier_core::routes::Route;
use atelier_core::settings::SiteSettings;
use atelier_core::submission::{SubmitPolicy, SubmitState};
use atelier_core::tabs::TabController;
use atelier_core::types::{CategoryId, ProductId};

use crate::api::AdminApi;
use crate::error::{ClientError, ClientResult, ErrorKind};

pub const PRODUCT_SAVE_FAILED: &str = "Saving the product failed.";
pub const STATUS_CHANGE_FAILED: &str = "Changing the product status failed.";
pub const CATEGORY_SAVE_FAILED: &str = "Saving the category failed.";
pub const SETTINGS_SAVE_FAILED: &str = "Saving the settings failed.";

/// Banner text for an error, or `None` when the session expired and the
/// global handler takes over.
fn banner(err: &ClientError, fallback: &str) -> Option<String> {
    (err.kind() != ErrorKind::SessionExpiry).then(|| err.user_message(fallback))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

impl FormMode {
    fn submit_mode(self) -> SubmitMode {
        match self {
            FormMode::Create => SubmitMode::Create,
            FormMode::Edit(_) => SubmitMode::Update,
        }
    }
}

/// The multi-tab product create/edit form.
#[derive(Debug)]
pub struct ProductForm {
    api: AdminApi,
    mode: FormMode,
    draft: ProductDraft,
    tabs: TabController,
    status: StatusToggle,
    state: SubmitState,
    policy: SubmitPolicy,
    categories: Vec<CategoryRef>,
    error: Option<String>,
}

impl ProductForm {
    /// An empty form for a new product.
    pub fn create(api: AdminApi) -> Self {
        Self::with_draft(api, FormMode::Create, ProductDraft::new())
    }

    /// Load an existing product for editing. Errors here have no draft to
    /// preserve and are shown as a full-page state by the caller.
    pub async fn edit(api: AdminApi, id: ProductId) -> ClientResult<Self> {
        let draft = api.product(id).await?;
        tracing::debug!(product_id = id, images = draft.images.len(), "Loaded product for editing");
        Ok(Self::with_draft(api, FormMode::Edit(id), draft))
    }

    fn with_draft(api: AdminApi, mode: FormMode, draft: ProductDraft) -> Self {
        let policy =
            SubmitPolicy::for_mode(mode.submit_mode(), api.config().edit_requires_category);
        Self {
            status: StatusToggle::new(draft.status),
            api,
            mode,
            draft,
            tabs: TabController::new(),
            state: SubmitState::Editing,
            policy,
            categories: Vec::new(),
            error: None,
        }
    }

    /// Fetch the category choices. Independent of the product fetch; they
    /// fill disjoint state.
    pub async fn load_categories(&mut self) -> ClientResult<()> {
        match self.api.categories().await {
            Ok(list) => {
                self.categories = list;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch categories");
                Err(e)
            }
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabController {
        &mut self.tabs
    }

    pub fn categories(&self) -> &[CategoryRef] {
        &self.categories
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Inline error banner, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    /// Override the submission preconditions.
    pub fn set_policy(&mut self, policy: SubmitPolicy) {
        self.policy = policy;
    }

    /// Availability as currently displayed, including an unconfirmed toggle.
    pub fn displayed_status(&self) -> bool {
        self.status.displayed()
    }

    /// The toggle is only offered for saved products and is disabled while a
    /// change is in flight.
    pub fn can_toggle_status(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_)) && self.status.is_enabled()
    }

    pub fn images(&mut self) -> ImageStager<'_> {
        ImageStager::new(&mut self.draft.images)
    }

    /// Stage local image files using the configured ordering.
    pub async fn attach_images<P: AsRef<Path>>(&mut self, paths: &[P]) -> AddReport {
        let order = self.api.config().image_order;
        ImageStager::new(&mut self.draft.images)
            .add_files(paths, order)
            .await
    }

    /// Validate and send the draft. On success returns the listing route;
    /// on failure the draft is kept and [`error`](Self::error) is set.
    pub async fn submit(&mut self) -> ClientResult<Route> {
        if let Err(e) = self.policy.check(&self.draft) {
            let err = ClientError::from(e);
            self.error = banner(&err, PRODUCT_SAVE_FAILED);
            return Err(err);
        }

        self.state = SubmitState::Submitting;
        self.error = None;

        let form = product_to_form(&self.draft, self.mode.submit_mode());
        let result = match self.mode {
            FormMode::Create => self.api.create_product(form).await,
            FormMode::Edit(id) => self.api.update_product(id, form).await,
        };
        self.state = SubmitState::Editing;

        match result {
            Ok(()) => Ok(Route::ProductList),
            Err(e) => {
                self.error = banner(&e, PRODUCT_SAVE_FAILED);
                Err(e)
            }
        }
    }

    /// Flip availability through the dedicated endpoint. The new value is
    /// shown immediately and reverted if the backend refuses.
    pub async fn toggle_status(&mut self) -> ClientResult<String> {
        let FormMode::Edit(id) = self.mode else {
            return Err(CoreError::Validation(
                "status can only be changed for a saved product".to_string(),
            )
            .into());
        };

        let api = &self.api;
        let result = self
            .status
            .toggle(&mut self.draft, || api.change_product_status(id))
            .await;

        match result {
            Ok(message) => {
                self.error = None;
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(product_id = id, error = %e, "Status change reverted");
                self.error = banner(&e, STATUS_CHANGE_FAILED);
                Err(e)
            }
        }
    }
}

/// Category create/edit form with a single optional image.
#[derive(Debug)]
pub struct CategoryForm {
    api: AdminApi,
    id: Option<CategoryId>,
    pub draft: CategoryDraft,
    preview: Option<String>,
    error: Option<String>,
}

impl CategoryForm {
    pub fn create(api: AdminApi) -> Self {
        Self {
            api,
            id: None,
            draft: CategoryDraft::default(),
            preview: None,
            error: None,
        }
    }

    /// Load a category for editing; a missing id is a not-found error that
    /// routes back to the category list.
    pub async fn edit(api: AdminApi, id: CategoryId) -> ClientResult<Self> {
        let category = api.category(id).await?;
        Ok(Self {
            draft: CategoryDraft::from_ref(&category),
            api,
            id: Some(id),
            preview: None,
            error: None,
        })
    }

    /// Preview of the newly chosen image, or the stored image otherwise.
    pub fn image_url(&self) -> Option<&str> {
        self.preview
            .as_deref()
            .or(self.draft.current_image.as_deref())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn choose_image(&mut self, path: &Path) -> ClientResult<()> {
        let image = read_preview(path).await?;
        self.preview = Some(image.preview_url);
        self.draft.new_image = Some(image.file);
        Ok(())
    }

    pub async fn submit(&mut self) -> ClientResult<Route> {
        self.error = None;
        let result = match self.id {
            None => self.api.create_category(&self.draft).await,
            Some(id) => self.api.update_category(id, &self.draft).await,
        };
        match result {
            Ok(()) => Ok(Route::CategoryList),
            Err(e) => {
                self.error = banner(&e, CATEGORY_SAVE_FAILED);
                Err(e)
            }
        }
    }
}

/// Site settings form.
#[derive(Debug)]
pub struct SettingsForm {
    api: AdminApi,
    pub settings: SiteSettings,
    error: Option<String>,
}

impl SettingsForm {
    pub async fn load(api: AdminApi) -> ClientResult<Self> {
        let settings = api.settings().await?;
        Ok(Self {
            api,
            settings,
            error: None,
        })
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn save(&mut self) -> ClientResult<()> {
        self.error = None;
        match self.api.update_settings(&self.settings).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.error = banner(&e, SETTINGS_SAVE_FAILED);
                Err(e)
            }
        }
    }
}
