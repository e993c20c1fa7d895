pub mod jsonl;
pub mod model;
