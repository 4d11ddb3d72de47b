//! Plan generation, editing and the planner session for tripplan.

pub mod editor;
pub mod plan;
pub mod responder;
pub mod session;

pub use editor::{EditError, PlanEdit};
pub use plan::{
    Criteria, GenerateError, GenerationClient, GenerationRequest, GenerationSettings,
    HttpTransport, LocalTransport, OutingCriteria, PlanGenerator, ServiceFailure, Transport,
    TripCriteria, ValidationError,
};
pub use responder::{OpenAiResponder, Responder, ResponderError};
pub use session::{OpenOutcome, PlannerSession};
