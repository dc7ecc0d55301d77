pub mod assessment;
pub mod compose;
pub mod context;
pub mod parsing;
pub mod preprocess;
pub mod prompt;
pub mod research;
pub mod scoring;
pub mod task;
pub mod vision;
pub mod workflow;

#[cfg(test)]
pub mod testing;
