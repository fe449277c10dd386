pub mod config;
pub mod language;
pub mod runtime;
pub mod tools;

#[cfg(test)]
mod tests;

use runtime::{platform::Platform, registry::Catalog};
use std::rc::Rc;

pub use config::Config;
pub use runtime::{error::ScriptError, ExecState, Interpreter};

/// Preprocesses and runs `source` with the `std` module wired to `platform`.
pub fn run_source(
    source: &str,
    config: Config,
    platform: Rc<dyn Platform>,
) -> Result<(), ScriptError> {
    let catalog = Catalog::with_platform(platform);
    let mut interpreter = Interpreter::new(source, config, &catalog)?;
    interpreter.run()
}
