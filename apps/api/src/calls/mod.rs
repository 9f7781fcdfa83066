// Call lifecycle: starting a candidate's voice call, relaying SDK events into a
// live session, ending it, and pulling the finished call back for analysis.
// Audio never passes through this service; the browser talks to the provider directly.

pub mod handlers;
pub mod registry;
pub mod session;
