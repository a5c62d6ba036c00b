mod extractors;
mod routes;
mod state;

pub mod handlers;
pub mod openapi;
pub mod response;

pub use response::{Ingress, ResponseEnvelope};
pub use routes::create_router;
pub use state::{AppState, MonotonicClock};
