pub mod feedback;
pub mod interview;
pub mod interviewer;
pub mod organization;
pub mod response;
