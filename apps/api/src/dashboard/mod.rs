// Dashboard: tabbed read models over the newest stored analysis.

pub mod handlers;
pub mod view;
