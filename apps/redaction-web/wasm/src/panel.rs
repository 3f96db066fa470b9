//! Restriction panel exported to JavaScript
//!
//! The host page owns the markup: an `<img>` for the document page inside a
//! positioned wrapper, a form, and the restriction lists. It forwards pointer
//! events and form changes here and re-renders its lists from the getters.
//! Asynchronous operations return a `Promise` that rejects with a message
//! suitable for display.

use crate::fetch_api::FetchRestrictionApi;
use crate::image::{display_size, load_image, natural_size, to_image_point, wait_for_image};
use crate::overlay::OverlayManager;
use crate::{console_error, console_log, DEFAULT_CONFIG};
use js_sys::Promise;
use redaction_core::{
    compose_overlay, DragOutcome, FetchOutcome, OverlayBox, OverlayInput, PanelConfig, RestrictionError,
    RestrictionForm, RestrictionStore, Selector, TargetMode,
};
use redaction_types::{
    Collaborator, CollaboratorRef, NaturalSize, Restriction, Role, SessionContext,
};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{HtmlElement, HtmlImageElement};

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js_error(err: RestrictionError) -> JsValue {
    if !err.is_validation() {
        console_error(&format!("Restriction panel: {}", err));
    }
    JsValue::from_str(&err.user_message())
}

struct PanelInner {
    config: PanelConfig,
    store: RestrictionStore<FetchRestrictionApi>,
    selector: RefCell<Selector>,
    form: RefCell<RestrictionForm>,
    image: HtmlImageElement,
    overlay: OverlayManager,
    natural: Cell<NaturalSize>,
}

impl PanelInner {
    fn active_document(&self) -> Result<String, RestrictionError> {
        self.store
            .active_document()
            .ok_or(RestrictionError::NoDocument)
    }

    fn overlay_boxes(&self) -> Vec<OverlayBox> {
        let existing: Vec<Restriction> = self
            .store
            .area_restrictions()
            .into_iter()
            .map(|entry| entry.restriction)
            .collect();
        let selector = self.selector.borrow();
        compose_overlay(OverlayInput {
            live: selector.live_rect(),
            confirmed: selector.confirmed(),
            existing: &existing,
            natural: self.natural.get(),
            display: display_size(&self.image),
            live_label: &self.config.custom_area_label,
        })
    }

    fn render(&self) {
        if let Err(e) = self.overlay.render(&self.overlay_boxes()) {
            console_error(&format!("Failed to draw overlay: {:?}", e));
        }
    }

    fn set_natural_size(&self, size: NaturalSize) {
        self.natural.set(size);
        self.store.set_image_size(size);
    }

    async fn open(
        &self,
        document_id: String,
        collaborators: Vec<Collaborator>,
    ) -> Result<(), JsValue> {
        self.store.open_document(&document_id, collaborators);
        self.selector.borrow_mut().clear();
        self.form.borrow_mut().reset();
        self.natural.set(NaturalSize::new(0.0, 0.0));
        self.overlay.clear();

        let refreshed = self.store.refresh(&document_id).await;
        if self.store.active_document().as_deref() != Some(document_id.as_str()) {
            return Ok(());
        }

        let image_url = self.store.document().and_then(|d| d.image_url);
        if let Some(url) = image_url {
            load_image(&self.image, &url);
            match wait_for_image(&self.image).await {
                Ok(size) => {
                    if self.store.active_document().as_deref() == Some(document_id.as_str()) {
                        self.set_natural_size(size);
                    }
                }
                Err(e) => console_error(&format!("{:?}", e)),
            }
        }

        self.render();
        refreshed.map_err(to_js_error)
    }

    fn finish_drag(&self, outcome: DragOutcome) -> bool {
        let confirmed = match outcome {
            DragOutcome::Confirmed(rect) => {
                self.form.borrow_mut().set_selection(Some(rect));
                true
            }
            DragOutcome::ImageNotReady => {
                console_log("Page image is not loaded yet, selection dropped");
                false
            }
            DragOutcome::Discarded | DragOutcome::NotDragging => false,
        };
        self.render();
        confirmed
    }

    async fn submit(&self) -> Result<(), RestrictionError> {
        let document_id = self.active_document()?;
        let new = self.form.borrow().validate()?;
        let outcome = self.store.create_restriction(&document_id, &new).await?;
        // the form and selection now belong to another document
        if outcome == FetchOutcome::Stale {
            return Ok(());
        }
        self.form.borrow_mut().reset();
        self.selector.borrow_mut().clear();
        self.render();
        Ok(())
    }

    async fn remove(&self, restriction_id: String) -> Result<(), RestrictionError> {
        let document_id = self.active_document()?;
        let result = self
            .store
            .remove_restriction(&document_id, &restriction_id)
            .await;
        self.render();
        result.map(|_| ())
    }

    async fn refresh(&self) -> Result<(), RestrictionError> {
        let document_id = self.active_document()?;
        let result = self.store.refresh(&document_id).await;
        self.render();
        result
    }
}

/// Restriction panel for one document image
#[wasm_bindgen]
pub struct RestrictionPanel {
    inner: Rc<PanelInner>,
}

#[wasm_bindgen]
impl RestrictionPanel {
    /// Create a panel over `image`. The overlay is appended to `host`.
    ///
    /// `config_json` overrides the bundled defaults when given.
    #[wasm_bindgen(constructor)]
    pub fn new(
        image: HtmlImageElement,
        host: HtmlElement,
        user_id: String,
        role: String,
        api_token: Option<String>,
        config_json: Option<String>,
    ) -> Result<RestrictionPanel, JsValue> {
        let config = match config_json {
            Some(json) => PanelConfig::from_json_str(&json),
            None => PanelConfig::from_toml_str(DEFAULT_CONFIG),
        }
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;

        let session = SessionContext::new(user_id, Role::parse(&role), api_token.clone());
        let api = FetchRestrictionApi::new(config.api_base_url.clone(), api_token);
        let store = RestrictionStore::new(api, &config).with_session(session);
        let overlay = OverlayManager::new(&host)?;

        console_log(&format!(
            "Restriction panel ready (api: {})",
            if config.api_base_url.is_empty() {
                "same origin"
            } else {
                config.api_base_url.as_str()
            }
        ));

        Ok(Self {
            inner: Rc::new(PanelInner {
                selector: RefCell::new(Selector::new(config.min_selection_px)),
                form: RefCell::new(RestrictionForm::new()),
                natural: Cell::new(natural_size(&image)),
                config,
                store,
                image,
                overlay,
            }),
        })
    }

    /// Switch to a document. `collaborators` is an array of
    /// `{CollaboratorID, CollaboratorName}` objects.
    #[wasm_bindgen(js_name = openDocument)]
    pub fn open_document(
        &self,
        document_id: String,
        collaborators: JsValue,
    ) -> Result<Promise, JsValue> {
        let collaborators: Vec<Collaborator> =
            if collaborators.is_undefined() || collaborators.is_null() {
                Vec::new()
            } else {
                serde_wasm_bindgen::from_value(collaborators)
                    .map_err(|e| JsValue::from_str(&format!("Invalid collaborators: {}", e)))?
            };

        let inner = self.inner.clone();
        Ok(future_to_promise(async move {
            inner.open(document_id, collaborators).await?;
            Ok(JsValue::UNDEFINED)
        }))
    }

    #[wasm_bindgen(js_name = closeDocument)]
    pub fn close_document(&self) {
        self.inner.store.close();
        self.inner.selector.borrow_mut().clear();
        self.inner.form.borrow_mut().reset();
        self.inner.overlay.clear();
    }

    /// Re-read the natural size after the host changed the image itself
    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&self) {
        self.inner.set_natural_size(natural_size(&self.inner.image));
        self.inner.render();
    }

    /// Redraw after the image was resized
    pub fn relayout(&self) {
        self.inner.render();
    }

    // ---- pointer events (viewport coordinates) ----

    /// Returns true when a drag started. Nothing starts before the page
    /// image has loaded.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, client_x: f64, client_y: f64) -> bool {
        if self.inner.form.borrow().mode() != TargetMode::CustomArea {
            return false;
        }
        let point = to_image_point(&self.inner.image, client_x, client_y);
        let started = self
            .inner
            .selector
            .borrow_mut()
            .press(point, self.inner.natural.get(), display_size(&self.inner.image));
        if started {
            self.inner.render();
        }
        started
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, client_x: f64, client_y: f64) {
        if !self.inner.selector.borrow().is_dragging() {
            return;
        }
        let point = to_image_point(&self.inner.image, client_x, client_y);
        self.inner
            .selector
            .borrow_mut()
            .move_to(point, display_size(&self.inner.image));
        self.inner.render();
    }

    /// Returns true when the drag produced a selection
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, client_x: f64, client_y: f64) -> bool {
        let point = to_image_point(&self.inner.image, client_x, client_y);
        let outcome = self.inner.selector.borrow_mut().release(
            point,
            self.inner.natural.get(),
            display_size(&self.inner.image),
        );
        self.inner.finish_drag(outcome)
    }

    /// Leaving the image ends the drag like a release
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) -> bool {
        let outcome = self
            .inner
            .selector
            .borrow_mut()
            .leave(self.inner.natural.get(), display_size(&self.inner.image));
        self.inner.finish_drag(outcome)
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.inner.selector.borrow().is_dragging()
    }

    /// Confirmed selection in natural pixels, or `null`
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.form.borrow().selection())
    }

    // ---- form ----

    /// `"field"` or `"custom_area"`
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode = TargetMode::parse(mode)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown restriction mode: {}", mode)))?;
        self.inner.form.borrow_mut().set_mode(mode);
        if mode != TargetMode::CustomArea {
            self.inner.selector.borrow_mut().clear();
        }
        self.inner.render();
        Ok(())
    }

    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&self, field: Option<String>) {
        self.inner.form.borrow_mut().set_field(field);
    }

    /// Select the collaborator the restriction applies to. Without an
    /// explicit role the one from the collaborator list is used.
    #[wasm_bindgen(js_name = setCollaborator)]
    pub fn set_collaborator(&self, user_id: Option<String>, role: Option<String>) {
        let collaborator = user_id.map(|id| {
            let role = role.unwrap_or_else(|| {
                self.inner
                    .store
                    .collaborators()
                    .into_iter()
                    .find(|c| c.id == id)
                    .and_then(|c| c.role)
                    .unwrap_or_else(|| Role::Viewer.as_str().to_string())
            });
            CollaboratorRef::new(id, role)
        });
        self.inner.form.borrow_mut().set_collaborator(collaborator);
    }

    #[wasm_bindgen(js_name = setReason)]
    pub fn set_reason(&self, reason: String) {
        self.inner.form.borrow_mut().set_reason(reason);
    }

    #[wasm_bindgen(js_name = canSubmit)]
    pub fn can_submit(&self) -> bool {
        self.inner.form.borrow().can_submit()
    }

    /// Why the form cannot be submitted yet, or `undefined`
    #[wasm_bindgen(js_name = validationMessage)]
    pub fn validation_message(&self) -> Option<String> {
        self.inner.form.borrow().validate().err().map(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = canManage)]
    pub fn can_manage(&self) -> bool {
        self.inner
            .store
            .session()
            .map(SessionContext::can_manage_restrictions)
            .unwrap_or(false)
    }

    // ---- persistence ----

    /// Create a restriction from the form. Resets the form on success.
    pub fn submit(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.submit().await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = removeRestriction)]
    pub fn remove_restriction(&self, restriction_id: String) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.remove(restriction_id).await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn refresh(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            inner.refresh().await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    // ---- read model ----

    #[wasm_bindgen(js_name = getRestrictions)]
    pub fn get_restrictions(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.restrictions())
    }

    #[wasm_bindgen(js_name = getFieldRestrictions)]
    pub fn get_field_restrictions(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.field_restrictions())
    }

    #[wasm_bindgen(js_name = getAreaRestrictions)]
    pub fn get_area_restrictions(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.area_restrictions())
    }

    #[wasm_bindgen(js_name = getFieldNames)]
    pub fn get_field_names(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.field_names())
    }

    #[wasm_bindgen(js_name = getCollaborators)]
    pub fn get_collaborators(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.collaborators())
    }

    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.document())
    }

    /// Boxes currently drawn, bottom to top
    #[wasm_bindgen(js_name = getOverlayBoxes)]
    pub fn get_overlay_boxes(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.overlay_boxes())
    }

    /// Pending banner `{kind, message}`, cleared once read
    #[wasm_bindgen(js_name = takeNotice)]
    pub fn take_notice(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.store.take_notice())
    }
}
