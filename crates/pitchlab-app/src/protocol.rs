// JSON message types exchanged with the dashboard front end over WebSocket.
//
// Every request carries its full selection context; the server keeps nothing
// between messages.

use chrono::NaiveDate;
use pitchlab_core::selection::SelectionKey;
use pitchlab_core::view::{ViewKind, ViewResult};
use pitchlab_core::CoreError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Ask for the values that populate the pitch type and statistic pickers.
    OptionsRequest,
    ViewRequest(ViewRequest),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewRequest {
    /// Echoed back so the client can match replies to figures.
    #[serde(default)]
    pub request_id: Option<String>,
    pub view: ViewKind,
    #[serde(default)]
    pub pitch_types: Option<Vec<String>>,
    /// Statistic name as shown in the picker (`Mean`, `Median`, ...).
    #[serde(default)]
    pub statistic: Option<String>,
    /// Point metadata from a previous reply (hover/click), if any.
    #[serde(default)]
    pub selection: Option<SelectionKey>,
}

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    Options {
        pitch_types: Vec<String>,
        statistics: Vec<String>,
        athletes: Vec<String>,
        dates: Vec<NaiveDate>,
    },
    View {
        request_id: Option<String>,
        view: ViewKind,
        result: ViewResult,
    },
    Error {
        request_id: Option<String>,
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownCategory,
    UnknownStatistic,
    BadRequest,
    Internal,
}

impl ErrorKind {
    pub fn of(err: &CoreError) -> Self {
        match err {
            CoreError::UnknownCategory(_) => ErrorKind::UnknownCategory,
            CoreError::UnknownStatistic(_) => ErrorKind::UnknownStatistic,
            CoreError::NoMetrics => ErrorKind::BadRequest,
            CoreError::SchemaMismatch { .. }
            | CoreError::InvalidValue { .. }
            | CoreError::Io { .. }
            | CoreError::Csv(_) => ErrorKind::Internal,
        }
    }
}

impl ServerMessage {
    pub fn error(request_id: Option<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            request_id,
            kind,
            message: message.into(),
        }
    }

    pub fn from_core_error(request_id: Option<String>, err: &CoreError) -> Self {
        ServerMessage::error(request_id, ErrorKind::of(err), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchlab_core::view::TrendMetric;

    #[test]
    fn parses_options_request() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"OPTIONS_REQUEST"}"#).unwrap();
        assert_eq!(msg, ClientMessage::OptionsRequest);
    }

    #[test]
    fn parses_minimal_view_request() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"VIEW_REQUEST","view":"break_aggregate"}"#).unwrap();
        match msg {
            ClientMessage::ViewRequest(req) => {
                assert_eq!(req.view, ViewKind::BreakAggregate);
                assert!(req.pitch_types.is_none());
                assert!(req.statistic.is_none());
                assert!(req.selection.is_none());
                assert!(req.request_id.is_none());
            }
            other => panic!("expected ViewRequest, got {other:?}"),
        }
    }

    #[test]
    fn parses_trend_view_with_selection() {
        let json = r#"{
            "type": "VIEW_REQUEST",
            "request_id": "velo-1",
            "view": {"trend": "velocity"},
            "pitch_types": ["Slider", "Cutter"],
            "statistic": "Mean",
            "selection": {"date": "2024-03-01", "athlete_name": "A", "pitch_type": "Slider"}
        }"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        let ClientMessage::ViewRequest(req) = msg else {
            panic!("expected ViewRequest");
        };
        assert_eq!(req.view, ViewKind::Trend(TrendMetric::Velocity));
        assert_eq!(req.request_id.as_deref(), Some("velo-1"));
        assert_eq!(req.statistic.as_deref(), Some("Mean"));
        let sel = req.selection.unwrap();
        assert_eq!(sel.pitch_type, "Slider");
        assert_eq!(sel.athlete_name, "A");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let res: Result<ClientMessage, _> = serde_json::from_str(r#"{"type":"SHUTDOWN"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn error_message_serializes_kind() {
        let msg = ServerMessage::from_core_error(
            Some("r1".into()),
            &CoreError::UnknownCategory("Forkball".into()),
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "ERROR");
        assert_eq!(json["kind"], "unknown_category");
        assert_eq!(json["request_id"], "r1");
        assert_eq!(json["message"], "unknown pitch type `Forkball`");
    }
}
