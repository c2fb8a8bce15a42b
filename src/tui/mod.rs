pub mod app;
pub mod dispatch;
pub mod input;
pub mod render;
pub mod theme;
pub mod view;

pub use app::run;
