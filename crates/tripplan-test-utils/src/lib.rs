//! Shared test utilities for tripplan integration tests.
//!
//! Provides scripted stand-ins for the two external seams (the language
//! model responder and the generation transport), temp-dir backed stores,
//! and plan fixtures.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tempfile::TempDir;

use tripplan_core::plan::{
    GenerationRequest, GenerationSettings, OutingCriteria, PlanGenerator, Transport,
    TransportError, TransportResponse, TripCriteria,
};
use tripplan_core::responder::{CompletionRequest, Responder, ResponderError};
use tripplan_store::{
    Accommodation, DayPlan, FileStore, Plan, PlanStore, ScheduleItem, TravelPlan, WeatherInfo,
};

// ---------------------------------------------------------------------------
// Responder
// ---------------------------------------------------------------------------

/// One scripted responder reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Fail { status: u16, message: String },
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// Responder that plays back queued replies and records every request.
///
/// Once the queue is drained it keeps answering with [`Reply::Empty`].
#[derive(Debug, Default)]
pub struct ScriptedResponder {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedResponder {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Responder that answers every call with `text`, once.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new([Reply::text(text)])
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, ResponderError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Reply::Empty);
        match reply {
            Reply::Text(text) => Ok(Some(text)),
            Reply::Empty => Ok(None),
            Reply::Fail { status, message } => Err(ResponderError::Api { status, message }),
        }
    }
}

/// Generator over a scripted responder with default settings.
pub fn generator(responder: Arc<ScriptedResponder>) -> Arc<PlanGenerator> {
    Arc::new(PlanGenerator::new(responder, GenerationSettings::default()))
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Transport that returns one canned response and records what it was sent.
#[derive(Debug)]
pub struct RecordingTransport {
    response: Result<TransportResponse, String>,
    sent: Mutex<Vec<GenerationRequest>>,
}

impl RecordingTransport {
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: Ok(TransportResponse {
                status,
                body: body.into(),
            }),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Transport whose every send fails before reaching the endpoint.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<GenerationRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, TransportError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.response.clone().map_err(TransportError::Other)
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// A plan store backed by a file inside a fresh temp dir.
///
/// Keep the returned [`TempDir`] alive for as long as the store is used.
pub fn temp_file_store() -> (TempDir, PlanStore<FileStore>) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = PlanStore::new(FileStore::open(dir.path().join("store.json")));
    (dir, store)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn outing_criteria() -> OutingCriteria {
    OutingCriteria {
        date: "2025-06-01".to_string(),
        area: "Tokyo Station".to_string(),
        interests: vec!["cafe".to_string()],
        budget: Some("5000".to_string()),
    }
}

pub fn trip_criteria() -> TripCriteria {
    TripCriteria {
        start_date: "2025-06-01".to_string(),
        end_date: "2025-06-02".to_string(),
        area: "Kyoto".to_string(),
        transportation: "train".to_string(),
        interests: vec!["temples".to_string(), "food".to_string()],
        budget: None,
    }
}

/// Responder output for a one-item outing.
pub const OUTING_JSON: &str =
    r#"{"plan":[{"timeRange":"10:00 - 11:00","spotName":"Cafe ABC","description":"coffee"}]}"#;

/// Responder output for a two-day trip.
pub const TRIP_JSON: &str = r#"{
  "plan": [
    {
      "date": "2025-06-01",
      "weather": {"icon": "sunny", "highTemp": "27", "lowTemp": "19"},
      "schedule": [
        {"timeRange": "09:00 - 11:00", "spotName": "Fushimi Inari", "description": "gates"},
        {"timeRange": "12:00 - 13:00", "spotName": "Nishiki Market", "description": "lunch"}
      ],
      "accommodation": {"name": "Ryokan Sakura", "description": "near Gion"}
    },
    {
      "date": "2025-06-02",
      "weather": {"icon": "cloudy", "highTemp": "25", "lowTemp": "18"},
      "schedule": [
        {"timeRange": "10:00 - 12:00", "spotName": "Kinkaku-ji", "description": "golden pavilion"}
      ]
    }
  ]
}"#;

pub fn sample_outing() -> Plan {
    Plan::Outing(vec![
        ScheduleItem::new("10:00 - 11:00", "Cafe ABC", "coffee").expect("valid item"),
        ScheduleItem::new("11:30 - 13:00", "National Museum", "").expect("valid item"),
    ])
}

pub fn sample_trip() -> Plan {
    Plan::Trip(TravelPlan::new(vec![
        DayPlan {
            date: "2025-06-01".to_string(),
            weather: WeatherInfo {
                icon: "sunny".to_string(),
                high_temp: "27".to_string(),
                low_temp: "19".to_string(),
            },
            schedule: vec![
                ScheduleItem::new("09:00 - 11:00", "Fushimi Inari", "gates").expect("valid item"),
            ],
            accommodation: Some(Accommodation {
                name: "Ryokan Sakura".to_string(),
                description: "near Gion".to_string(),
            }),
        },
        DayPlan::new("2025-06-02", None).expect("valid day"),
    ]))
}
