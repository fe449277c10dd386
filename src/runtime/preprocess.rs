use crate::language::{errors::SyntaxError, parser::is_identifier};
use crate::runtime::{
    error::{Phase, RuntimeError, ScriptError},
    registry::{ModuleLoader, Registry},
};
use tracing::debug;

/// Expands directives. `+include` lines load modules into `registry` as they
/// are met; `+replace` rules are collected and applied to the whole program
/// once every line has been read.
///
/// Every line survives (trimmed), so line numbers in the result match the
/// original source.
pub fn preprocess(
    source: &str,
    registry: &mut Registry,
    loader: &dyn ModuleLoader,
) -> Result<String, ScriptError> {
    let mut lines = Vec::new();
    let mut replacements: Vec<(String, String)> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        lines.push(line);
        let Some(directive) = line.strip_prefix('+') else {
            continue;
        };
        let fail = |err: RuntimeError| ScriptError::new(err, index + 1, line, Phase::Preprocessing);
        match split_word(directive) {
            ("include", rest) => {
                let module = rest.trim();
                if !is_identifier(module) {
                    return Err(fail(
                        SyntaxError::new(format!("Could not parse directive `{line}`"))
                            .with_help("write `+include <module>`; module names use letters, digits and `_`")
                            .into(),
                    ));
                }
                registry.include(module, loader).map_err(fail)?;
                debug!(module, line = index + 1, "included module");
            }
            ("replace", rest) => {
                let (needle, replacement) = split_word(rest);
                if needle.is_empty() {
                    return Err(fail(
                        SyntaxError::new(format!("Could not parse directive `{line}`"))
                            .with_help("write `+replace <pattern> <replacement>`")
                            .into(),
                    ));
                }
                debug!(needle, replacement, line = index + 1, "recorded replacement");
                match replacements.iter_mut().find(|(existing, _)| existing == needle) {
                    Some(rule) => rule.1 = replacement.to_string(),
                    None => replacements.push((needle.to_string(), replacement.to_string())),
                }
            }
            (keyword, _) => {
                return Err(fail(
                    SyntaxError::new(format!("Unknown directive `+{keyword}`"))
                        .with_help("directives are `+include` and `+replace`")
                        .into(),
                ));
            }
        }
    }

    let mut output = lines.join("\n");
    for (needle, replacement) in &replacements {
        output = output.replace(needle.as_str(), replacement);
    }
    Ok(output)
}

/// Splits off the first whitespace-delimited word; the remainder keeps its
/// inner spacing.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}
