use crate::config::Config;
use crate::language::{
    ast::{CallSite, Statement},
    errors::SyntaxError,
    parser::{conditional_end_label, parse_call, parse_line},
    types::DeclaredType,
};
use crate::runtime::{
    environment::{Environment, Variable},
    error::{Phase, RuntimeError, RuntimeResult, ScriptError},
    logic,
    preprocess::preprocess,
    registry::{ModuleLoader, NativeFunction, Registry},
    value::Value,
};
use tracing::{debug, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecState {
    Running,
    Halted,
    Failed,
}

/// Program counter driven executor over the preprocessed source lines.
///
/// The counter is 1-based. Every step runs the current line and then advances
/// by one; handlers that jump place the counter one line before their target.
pub struct Interpreter {
    lines: Vec<String>,
    pc: usize,
    env: Environment,
    registry: Registry,
    config: Config,
    state: ExecState,
    call_depth: usize,
}

impl Interpreter {
    /// Preprocesses `source`, loading included modules through `loader`.
    pub fn new(
        source: &str,
        config: Config,
        loader: &dyn ModuleLoader,
    ) -> Result<Self, ScriptError> {
        let mut registry = Registry::new();
        let expanded = preprocess(source, &mut registry, loader)?;
        let lines: Vec<String> = expanded.lines().map(str::to_string).collect();
        let state = if lines.is_empty() {
            ExecState::Halted
        } else {
            ExecState::Running
        };
        Ok(Self {
            lines,
            pc: 1,
            env: Environment::new(),
            registry,
            config,
            state,
            call_depth: 0,
        })
    }

    pub fn run(&mut self) -> Result<(), ScriptError> {
        info!(lines = self.lines.len(), "starting program");
        while self.step()? == ExecState::Running {}
        info!("program halted");
        Ok(())
    }

    /// Executes the line under the program counter.
    pub fn step(&mut self) -> Result<ExecState, ScriptError> {
        if self.state != ExecState::Running {
            return Ok(self.state);
        }
        let Some(line) = self
            .pc
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .cloned()
        else {
            self.state = ExecState::Halted;
            return Ok(self.state);
        };
        trace!(line = self.pc, text = %line, "executing");
        if let Err(err) = self.execute(&line) {
            self.state = ExecState::Failed;
            return Err(ScriptError::new(err, self.pc, &line, Phase::Executing));
        }
        self.pc += 1;
        if self.pc > self.lines.len() {
            self.state = ExecState::Halted;
        }
        Ok(self.state)
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn program_counter(&self) -> usize {
        self.pc
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.env.get(name)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn register(&mut self, module: &str, name: &str, function: NativeFunction) {
        self.registry.register(module, name, function);
    }

    fn execute(&mut self, line: &str) -> RuntimeResult<()> {
        match parse_line(line)? {
            Statement::FunctionCall(call) => {
                self.dispatch(&call)?;
            }
            Statement::Assignment(assignment) => {
                let value = self.convert(&assignment.value)?;
                self.env
                    .assign(&assignment.name, assignment.ty, &assignment.flags, value)?;
            }
            Statement::NumericLoopOpen { name, lower, upper } => {
                let lower = self.loop_bound(&lower)?;
                let upper = self.loop_bound(&upper)?;
                self.env.open_loop(&name, lower, upper, self.pc + 1)?;
            }
            Statement::Loopback { name } => {
                if let Some(resume) = self.env.loop_back(&name)? {
                    debug!(variable = %name, from = self.pc, to = resume, "loop back");
                    self.pc = resume.saturating_sub(1);
                }
            }
            Statement::ConditionalOpen { name, condition } => {
                let result = logic::evaluate(&condition, |token| self.convert(token))?;
                self.env.record_condition(result);
                if !result {
                    let end = self.find_conditional_end(&name)?;
                    debug!(label = %name, from = self.pc, to = end, "skipping conditional block");
                    self.pc = end;
                }
            }
            Statement::NoOp => {}
        }
        Ok(())
    }

    /// Resolves, checks and invokes a call, returning the callable's result.
    fn dispatch(&mut self, call: &CallSite) -> RuntimeResult<Value> {
        let function = self.registry.resolve(&call.module, &call.name)?.clone();
        function
            .arity
            .check(&call.module, &call.name, call.args.len())?;
        let args = call
            .args
            .iter()
            .map(|arg| self.convert(arg))
            .collect::<RuntimeResult<Vec<_>>>()?;
        debug!(function = %call.qualified_name(), args = args.len(), "calling");
        function
            .call(&args)
            .map_err(|message| RuntimeError::Native {
                module: call.module.clone(),
                name: call.name.clone(),
                message,
            })
    }

    /// Turns a delimited token into a value. The first matching rule wins:
    /// boolean keyword, integer, decimal, `$variable`, `"string"`, `!call`,
    /// then the bare text itself.
    fn convert(&mut self, token: &str) -> RuntimeResult<Value> {
        let token = token.trim();
        if let Some(value) = parse_bool(token) {
            return Ok(Value::Bool(value));
        }
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            return token
                .parse()
                .map(Value::Int)
                .map_err(|_| RuntimeError::TypeMismatch {
                    message: format!("integer literal `{token}` is out of range"),
                });
        }
        if is_decimal_literal(token) {
            return token
                .parse()
                .map(Value::Float)
                .map_err(|_| RuntimeError::TypeMismatch {
                    message: format!("malformed decimal literal `{token}`"),
                });
        }
        if let Some(name) = token.strip_prefix('$') {
            return self.env.read(name);
        }
        if token.starts_with('"') {
            if token.len() < 2 || !token.ends_with('"') {
                return Err(
                    SyntaxError::new(format!("Unterminated string literal `{token}`")).into(),
                );
            }
            return Ok(Value::Str(unescape(&token[1..token.len() - 1])));
        }
        if token.starts_with('!') {
            return self.nested_call(token);
        }
        Ok(Value::Str(token.to_string()))
    }

    fn nested_call(&mut self, token: &str) -> RuntimeResult<Value> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }
        let call = parse_call(token)?;
        self.call_depth += 1;
        let result = self.dispatch(&call);
        self.call_depth -= 1;
        result
    }

    fn loop_bound(&mut self, token: &str) -> RuntimeResult<i64> {
        let value = self.convert(token)?;
        match value.coerce(DeclaredType::Integer) {
            Some(Value::Int(bound)) => Ok(bound),
            _ => Err(RuntimeError::TypeMismatch {
                message: format!(
                    "loop bound must be an integer, found {} \"{}\"",
                    value.type_name(),
                    value
                ),
            }),
        }
    }

    /// First `?end $label` after the current line.
    fn find_conditional_end(&self, label: &str) -> RuntimeResult<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(self.pc)
            .find(|(_, line)| conditional_end_label(line) == Some(label))
            .map(|(index, _)| index + 1)
            .ok_or_else(|| RuntimeError::MissingConditionalEnd {
                label: label.to_string(),
            })
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Digits with exactly one decimal point.
fn is_decimal_literal(token: &str) -> bool {
    token.bytes().filter(|b| *b == b'.').count() == 1
        && token.bytes().any(|b| b.is_ascii_digit())
        && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
