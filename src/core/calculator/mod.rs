pub mod elapsed;
pub mod threshold;
pub mod timeline;
