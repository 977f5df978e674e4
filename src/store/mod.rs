pub mod high_scores;
pub mod question_store;
pub mod record;
pub mod session_log;
