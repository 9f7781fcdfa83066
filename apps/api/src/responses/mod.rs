// Candidate responses: listing and review actions, the interview summary
// aggregation, and returning-candidate detection used when a call starts.

pub mod dedup;
pub mod handlers;
pub mod summary;
