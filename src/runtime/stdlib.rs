use crate::runtime::{
    platform::Platform,
    registry::{Arity, ModuleTable, NativeFunction},
    value::Value,
};
use std::rc::Rc;

pub const MODULE_NAME: &str = "std";

/// Registers `print` and `input`.
pub fn setup(platform: Rc<dyn Platform>, table: &mut ModuleTable) {
    let out = platform.clone();
    table.insert(
        "print".into(),
        NativeFunction::new(Arity::Variadic { min: 0 }, move |args| {
            let line = args
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            out.write(&format!("{line}\n"))?;
            Ok(Value::Str(String::new()))
        }),
    );

    table.insert(
        "input".into(),
        NativeFunction::new(Arity::Fixed(1), move |args| {
            let prompt = args.first().map(Value::to_string).unwrap_or_default();
            platform.write(&prompt)?;
            match platform.read_line()? {
                Some(line) => Ok(Value::Str(line)),
                None => Err("end of input while reading a line".into()),
            }
        }),
    );
}
