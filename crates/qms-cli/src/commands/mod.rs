pub mod answer;
pub mod dispatch;
pub mod progress;
pub mod score;
pub mod shared;
