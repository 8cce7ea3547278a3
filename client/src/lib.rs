mod app;
mod dom;
mod net;
mod render;
mod state;
mod toolbar;

pub use app::run;
