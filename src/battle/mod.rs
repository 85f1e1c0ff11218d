pub mod ai;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod engine;
pub mod event_log;
pub mod priority;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
