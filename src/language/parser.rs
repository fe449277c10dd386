use crate::language::{
    ast::{Assignment, CallSite, DEFAULT_MODULE, Statement},
    errors::SyntaxError,
    lexer::{assignment_value, split_arguments, split_operands, unwrap_group},
    types::DeclaredType,
};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, char, space0, space1},
    combinator::{map, rest},
    sequence::{preceded, terminated, tuple},
    IResult,
};

/// Parses one source line into a [`Statement`].
pub fn parse_line(line: &str) -> Result<Statement, SyntaxError> {
    let line = line.trim();
    match line.chars().next() {
        None | Some('+') | Some('#') => Ok(Statement::NoOp),
        Some('!') => parse_call(line).map(Statement::FunctionCall),
        Some('$') => parse_assignment(line).map(Statement::Assignment),
        Some('@') => parse_loop(line),
        Some('?') => parse_conditional(line),
        Some(_) => Err(SyntaxError::new(format!("Unrecognised statement `{line}`"))
            .with_help("statements start with `!`, `$`, `@`, `?`, `+` or `#`")),
    }
}

/// Parses `![module] name: (arg1), (arg2),`. Also used for nested calls
/// appearing as argument tokens.
pub fn parse_call(text: &str) -> Result<CallSite, SyntaxError> {
    let text = text.trim();
    let (args, (module, name)) = match call_header(text) {
        Ok(parsed) => parsed,
        Err(_) if !text.contains(':') => {
            return Err(SyntaxError::end_of_line(
                "End of line (EOL) when scanning function call",
            )
            .with_help("a call is written `!module name: (arg),`"));
        }
        Err(_) => {
            return Err(
                SyntaxError::new(format!("Could not parse function call `{text}`"))
                    .with_help("a call is written `!module name: (arg),`"),
            );
        }
    };
    Ok(CallSite {
        module: module.unwrap_or(DEFAULT_MODULE).to_string(),
        name: name.to_string(),
        args: split_arguments(args)?,
    })
}

/// Returns the label of a `?end $label` line.
pub fn conditional_end_label(line: &str) -> Option<&str> {
    let parsed: IResult<&str, &str> = terminated(
        preceded(tuple((tag("?end"), space1, char('$'))), identifier),
        space0,
    )(line.trim());
    match parsed {
        Ok(("", label)) => Some(label),
        _ => None,
    }
}

fn parse_assignment(line: &str) -> Result<Assignment, SyntaxError> {
    let help = "an assignment is written `$name type[flag/flag] = (value)`";
    let parsed: IResult<&str, (&str, &str, &str, &str)> = tuple((
        preceded(char('$'), identifier),
        preceded(space1, alpha1),
        preceded(char('['), take_while(|c: char| c != ']')),
        preceded(tuple((char(']'), space0, char('='), space0)), rest),
    ))(line);
    let (name, ty, flags, value) = match parsed {
        Ok((_, parts)) if !parts.3.trim().is_empty() => parts,
        _ => {
            return Err(SyntaxError::new(format!(
                "Could not parse variable assignment `{line}`"
            ))
            .with_help(help));
        }
    };
    let ty = DeclaredType::from_name(ty).ok_or_else(|| {
        SyntaxError::new(format!("Unknown type `{ty}` in `{line}`")).with_help(format!(
            "known types are {}",
            DeclaredType::NAMES.join(", ")
        ))
    })?;
    let value = assignment_value(value)?;
    let flags = flags
        .split('/')
        .map(str::trim)
        .filter(|flag| !flag.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Assignment {
        name: name.to_string(),
        ty,
        flags,
        value: value.to_string(),
    })
}

fn parse_loop(line: &str) -> Result<Statement, SyntaxError> {
    let parsed: IResult<&str, (&str, &str)> = tuple((
        alt((tag("@n"), tag("@b"))),
        preceded(tuple((space1, char('$'))), identifier),
    ))(line);
    match parsed {
        Ok((remaining, ("@n", name))) => {
            let bounds = split_operands(remaining)?;
            match bounds.as_slice() {
                [lower, upper] => Ok(Statement::NumericLoopOpen {
                    name: name.to_string(),
                    lower: unwrap_group(lower).to_string(),
                    upper: unwrap_group(upper).to_string(),
                }),
                _ => Err(SyntaxError::new(format!("Could not parse numeric loop `{line}`"))
                    .with_help("a numeric loop is written `@n $name lower upper`")),
            }
        }
        Ok((remaining, (_, name))) if remaining.trim().is_empty() => Ok(Statement::Loopback {
            name: name.to_string(),
        }),
        _ => Err(SyntaxError::new(format!("Could not parse loop statement `{line}`"))
            .with_help("loops are written `@n $name lower upper` and closed with `@b $name`")),
    }
}

fn parse_conditional(line: &str) -> Result<Statement, SyntaxError> {
    if conditional_end_label(line).is_some() {
        return Ok(Statement::NoOp);
    }
    let parsed: IResult<&str, (&str, &str)> = tuple((
        preceded(tuple((tag("?if"), space1, char('$'))), identifier),
        preceded(tuple((space0, char('|'), space0)), rest),
    ))(line);
    match parsed {
        Ok((_, (name, condition))) if !condition.trim().is_empty() => {
            Ok(Statement::ConditionalOpen {
                name: name.to_string(),
                condition: condition.trim().to_string(),
            })
        }
        _ => Err(SyntaxError::new(format!("Could not parse conditional `{line}`"))
            .with_help("a conditional is written `?if $name | <expr>` and closed with `?end $name`")),
    }
}

/// `name:` or `module name:`, with any spacing after the `!`.
fn call_header(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    preceded(
        tuple((char('!'), space0)),
        alt((
            map(terminated(identifier, char(':')), |name| (None, name)),
            map(
                tuple((terminated(identifier, space1), terminated(identifier, char(':')))),
                |(module, name)| (Some(module), name),
            ),
        )),
    )(input)
}

/// True when `text` is a whole identifier: letters, digits and `_`.
pub fn is_identifier(text: &str) -> bool {
    matches!(identifier(text), Ok(("", _)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}
