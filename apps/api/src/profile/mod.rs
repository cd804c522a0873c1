// Profile intake: the five-step form, its completion gating, and the
// `profiles` table it is persisted to.

pub mod handlers;
pub mod intake;
pub mod models;
pub mod multipart;
pub mod repository;
