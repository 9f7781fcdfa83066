// Interviewer personas: the gallery shown in the wizard and the voice agent each one drives.

pub mod handlers;
