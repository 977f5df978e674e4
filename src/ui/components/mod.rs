pub mod menu;
pub mod progress_bar;
pub mod question_panel;
pub mod review_panel;
pub mod score_table;
pub mod summary;
