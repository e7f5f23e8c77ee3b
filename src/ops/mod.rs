//! Pixel operations. Each one takes the current buffer and returns a new
//! one of the same size; validation of user input happens in the controller.

pub mod channel;
pub mod filters;
pub mod shapes;
