pub mod category;
pub mod classifier;
pub mod encoding;
pub mod palette;
pub mod perception;
pub mod pixel;
