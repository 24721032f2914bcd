pub mod backends;
pub mod classes;
pub mod config;
pub mod explain;

pub use backends::*;
pub use classes::*;
pub use config::*;
pub use explain::*;
