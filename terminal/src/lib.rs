pub mod app;
pub mod effects;
pub mod high_score;
pub mod render;
pub mod views;
