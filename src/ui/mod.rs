pub mod app;
pub mod pages;
pub mod router;
pub mod widget;

pub use app::App;
pub use router::Route;
