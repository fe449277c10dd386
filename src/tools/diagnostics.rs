use crate::runtime::error::ScriptError;
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{kind}: {message}")]
#[diagnostic(code(sicl::script))]
pub struct ScriptDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    kind: String,
    message: String,
    label: String,
}

impl ScriptDiagnostic {
    /// `source` is the program as the user wrote it; the error's line number
    /// indexes into it.
    pub fn from_error(name: &str, source: &str, err: &ScriptError) -> Self {
        Self {
            src: NamedSource::new(name, source.to_string()),
            span: line_span(source, err.line),
            help: err.help.clone(),
            kind: err.kind.to_string(),
            message: err.message.clone(),
            label: format!("line {} while {}", err.line, err.phase.action()),
        }
    }
}

pub fn report_script_error(name: &str, source: &str, err: &ScriptError) {
    let diagnostic = ScriptDiagnostic::from_error(name, source, err);
    eprintln!("{:?}", Report::new(diagnostic));
}

pub fn report_io_error(path: &Path, error: &std::io::Error) {
    eprintln!("Failed to access {}: {}", path.display(), error);
}

/// Byte span of the 1-based `line` without its terminator.
fn line_span(source: &str, line: usize) -> SourceSpan {
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let trimmed = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
            return SourceSpan::from((offset, trimmed.len()));
        }
        offset += text.len();
    }
    SourceSpan::from((source.len(), 0))
}
