// Request dispatch: turns decoded client messages into replies using the
// shared, read-only dataset.

use std::sync::Arc;

use pitchlab_core::aggregate::Statistic;
use pitchlab_core::dataset::Dataset;
use pitchlab_core::view::{self, ViewQuery, ViewSettings};
use tracing::{debug, warn};

use crate::protocol::{ClientMessage, ErrorKind, ServerMessage, ViewRequest};

/// Everything a connection needs to answer requests. Cloning is cheap; all
/// clones share one dataset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    settings: ViewSettings,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, settings: ViewSettings) -> Self {
        Dashboard { dataset, settings }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Decode and answer a raw text frame. Malformed JSON becomes an
    /// `ERROR` reply rather than a dropped message.
    pub fn handle_text(&self, text: &str) -> ServerMessage {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                warn!("Failed to parse client message: {}", e);
                ServerMessage::error(None, ErrorKind::BadRequest, format!("malformed request: {e}"))
            }
        }
    }

    pub fn handle(&self, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::OptionsRequest => self.options(),
            ClientMessage::ViewRequest(req) => self.view(req),
        }
    }

    fn options(&self) -> ServerMessage {
        ServerMessage::Options {
            pitch_types: self.dataset.pitch_types(),
            statistics: Statistic::ALL.iter().map(|s| s.label().to_string()).collect(),
            athletes: self.dataset.athletes(),
            dates: self.dataset.dates(),
        }
    }

    fn view(&self, req: ViewRequest) -> ServerMessage {
        debug!(
            "View request {:?}: {:?} types={:?} stat={:?} selection={:?}",
            req.request_id, req.view, req.pitch_types, req.statistic, req.selection
        );

        // A cleared picker arrives as an empty string; treat it as unset.
        let statistic = match req
            .statistic
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Statistic>)
            .transpose()
        {
            Ok(s) => s,
            Err(e) => {
                warn!("Rejected view request: {}", e);
                return ServerMessage::from_core_error(req.request_id, &e);
            }
        };

        let query = ViewQuery {
            pitch_types: req.pitch_types,
            statistic,
            selection: req.selection,
        };
        match view::render(&self.dataset, req.view, &query, &self.settings) {
            Ok(result) => ServerMessage::View {
                request_id: req.request_id,
                view: req.view,
                result,
            },
            Err(e) => {
                warn!("View {:?} failed: {}", req.view, e);
                ServerMessage::from_core_error(req.request_id, &e)
            }
        }
    }
}
