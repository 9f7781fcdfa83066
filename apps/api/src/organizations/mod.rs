// Organizations: plan and response quota. Records are created lazily on first fetch.

pub mod handlers;
pub mod quota;
