pub mod event;
pub mod save;
pub mod spawn;
pub mod step;
pub mod world;
