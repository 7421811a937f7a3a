use crate::{
    AckId, ExtractionError, ExtractionResult, Language, RequestId, SelectedDocument, SelectionId,
    ServiceInfo,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a document that passed the picker's allow-list.
    FileSelected(SelectedDocument),
    /// User cleared the current document.
    FileCleared,
    /// Preview encoding finished. `data_url` is `None` when encoding failed.
    PreviewReady {
        selection_id: SelectionId,
        data_url: Option<String>,
    },
    /// User chose a recognition language.
    LanguageChanged(Language),
    /// User set or unset the "save to database" flag.
    PersistChanged(Option<bool>),
    /// User clicked Extract.
    ExtractClicked,
    /// Engine finished an extraction request.
    ExtractionFinished {
        request_id: RequestId,
        outcome: Result<ExtractionResult, ExtractionError>,
    },
    /// User clicked Copy.
    CopyClicked,
    /// The "copied" acknowledgement timer fired.
    CopyAckExpired { ack_id: AckId },
    /// User clicked Download.
    DownloadClicked,
    /// Engine finished writing a downloaded text file.
    DownloadFinished { outcome: Result<String, String> },
    /// User asked for the service health.
    HealthCheckRequested,
    /// User asked for the languages the service supports.
    LanguagesRequested,
    /// Engine answered a health or languages query.
    ServiceInfoReceived(ServiceInfo),
}
