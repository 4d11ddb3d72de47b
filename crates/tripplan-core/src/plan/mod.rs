//! Plan generation: criteria, prompt, service, endpoint contract, client.
//!
//! ```text
//! Criteria --GenerationClient--> Transport --> endpoint --> PlanGenerator
//!                                                              |
//!                                                       dyn Responder
//! ```

pub mod client;
pub mod criteria;
pub mod endpoint;
pub mod prompt;
pub mod service;
pub mod transport;

pub use client::{GENERIC_SERVICE_MESSAGE, GenerateError, GenerationClient, INVALID_FORMAT_MESSAGE};
pub use criteria::{Criteria, GenerationRequest, OutingCriteria, TripCriteria, ValidationError};
pub use endpoint::{EndpointResponse, handle_generate};
pub use service::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerationSettings, PlanGenerator, ServiceFailure};
pub use transport::{
    GENERATE_PATH, HttpTransport, LocalTransport, Transport, TransportError, TransportResponse,
};
