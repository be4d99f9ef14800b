pub mod cell;
pub mod display;
pub mod frame;

pub use display::DisplayManager;
pub use frame::FrameComposer;
