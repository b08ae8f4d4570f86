pub mod history;
pub mod image;
pub mod request;
pub mod wire;

pub use history::*;
pub use image::*;
pub use request::*;
