pub mod display;
pub mod keyboard;
pub mod overlay;
pub mod viewer;
