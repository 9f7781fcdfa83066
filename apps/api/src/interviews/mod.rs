// Interviews: CRUD, the creation wizard rules, and share links.
// Pure rules live in wizard.rs and share.rs; handlers.rs talks to the store.

pub mod handlers;
pub mod share;
pub mod wizard;
