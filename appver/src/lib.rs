//! Deployment version history for an application: a newest-first table of every version that
//! was deployed, which one is live, and a confirmed rollback to an earlier one.

pub mod cli;
pub mod conf;
pub mod history;
pub mod models;
pub mod table;
