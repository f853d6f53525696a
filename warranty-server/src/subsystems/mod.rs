pub mod answer;
pub mod classify;
pub mod pipeline;
