pub mod environment;
pub mod error;
pub mod interpreter;
pub mod logic;
pub mod platform;
pub mod preprocess;
pub mod registry;
pub mod stdlib;
pub mod value;

pub use interpreter::{ExecState, Interpreter};
