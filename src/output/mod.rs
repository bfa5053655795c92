// Output generation module

pub mod generator;
pub mod manifest;
pub mod template;
pub mod workspace;

pub use generator::*;
pub use manifest::*;
pub use template::*;
pub use workspace::*;
