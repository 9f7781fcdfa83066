// Post-interview candidate feedback.

pub mod handlers;
