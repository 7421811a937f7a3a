use std::time::Duration;

use crate::view_model::AppViewModel;
use crate::{ExtractionOptions, ExtractionResult, SelectedDocument};

pub type RequestId = u64;
pub type SelectionId = u64;
pub type AckId = u64;

/// How long the "copied" acknowledgement stays visible.
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

/// Lifecycle of the single extraction request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestLifecycle {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Succeeded(ExtractionResult),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Preview {
    #[default]
    None,
    Loading,
    /// Base64 data URL of the selected image.
    Image(String),
    /// Encoding failed; the selection is still usable.
    Unavailable,
    /// Documents without an image preview (PDF).
    Placeholder,
}

/// Answer to one of the auxiliary service queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceInfo {
    Health { status: String, available: bool },
    Languages(Vec<String>),
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    document: Option<SelectedDocument>,
    selection_id: SelectionId,
    preview: Preview,
    options: ExtractionOptions,
    lifecycle: RequestLifecycle,
    last_request_id: RequestId,
    copy_ack: Option<AckId>,
    last_ack_id: AckId,
    notice: Option<String>,
    service_info: Option<ServiceInfo>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn document(&self) -> Option<&SelectedDocument> {
        self.document.as_ref()
    }

    pub fn selection_id(&self) -> SelectionId {
        self.selection_id
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn options(&self) -> ExtractionOptions {
        self.options
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.lifecycle, RequestLifecycle::Pending { .. })
    }

    /// Extract is enabled only with a document and no request in flight.
    pub fn can_submit(&self) -> bool {
        self.document.is_some() && !self.is_pending()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.lifecycle {
            RequestLifecycle::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn copy_ack(&self) -> Option<AckId> {
        self.copy_ack
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn service_info(&self) -> Option<&ServiceInfo> {
        self.service_info.as_ref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replaces the document and returns the new selection id.
    pub(crate) fn select_document(&mut self, document: SelectedDocument) -> SelectionId {
        self.selection_id += 1;
        self.preview = if document.is_image() {
            Preview::Loading
        } else {
            Preview::Placeholder
        };
        self.document = Some(document);
        self.reset_lifecycle();
        self.mark_dirty();
        self.selection_id
    }

    pub(crate) fn clear_document(&mut self) {
        self.selection_id += 1;
        self.document = None;
        self.preview = Preview::None;
        self.reset_lifecycle();
        self.mark_dirty();
    }

    pub(crate) fn set_preview(&mut self, preview: Preview) {
        self.preview = preview;
        self.mark_dirty();
    }

    pub(crate) fn set_options(&mut self, options: ExtractionOptions) {
        if self.options != options {
            self.options = options;
            self.mark_dirty();
        }
    }

    /// Moves to `Pending`, dropping any previous result or error.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.lifecycle = RequestLifecycle::Pending {
            request_id: self.last_request_id,
        };
        self.copy_ack = None;
        self.mark_dirty();
        self.last_request_id
    }

    /// Id of the request whose response is still wanted, if any.
    pub(crate) fn pending_request(&self) -> Option<RequestId> {
        match self.lifecycle {
            RequestLifecycle::Pending { request_id } => Some(request_id),
            _ => None,
        }
    }

    pub(crate) fn finish_request(&mut self, lifecycle: RequestLifecycle) {
        self.lifecycle = lifecycle;
        self.mark_dirty();
    }

    pub(crate) fn acknowledge_copy(&mut self) -> AckId {
        self.last_ack_id += 1;
        self.copy_ack = Some(self.last_ack_id);
        self.mark_dirty();
        self.last_ack_id
    }

    pub(crate) fn expire_copy_ack(&mut self, ack_id: AckId) {
        if self.copy_ack == Some(ack_id) {
            self.copy_ack = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        if self.notice != notice {
            self.notice = notice;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_service_info(&mut self, info: ServiceInfo) {
        self.service_info = Some(info);
        self.mark_dirty();
    }

    fn reset_lifecycle(&mut self) {
        self.lifecycle = RequestLifecycle::Idle;
        self.copy_ack = None;
    }
}
