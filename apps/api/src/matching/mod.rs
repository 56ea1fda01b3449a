// AI job matching: candidate ↔ job scoring and ranked, paginated recommendations.
// Pure scoring lives in scorer/ranker; service and handlers bring in the stores.

pub mod handlers;
pub mod profile;
pub mod ranker;
pub mod scorer;
pub mod service;
