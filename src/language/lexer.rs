use crate::language::errors::SyntaxError;

/// Splits a call's argument list `(a), (b), (c),` into the raw inner tokens.
///
/// Commas and whitespace inside parentheses or double quotes belong to the
/// argument. A trailing comma is accepted but not required.
pub fn split_arguments(input: &str) -> Result<Vec<String>, SyntaxError> {
    let mut scanner = Scanner::new(input);
    let mut args = Vec::new();
    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None => break,
            Some('(') => {}
            Some(ch) => {
                return Err(
                    SyntaxError::new(format!("Expected `(` to open an argument, found `{ch}`"))
                        .with_help("arguments are written as `(value),`"),
                );
            }
        }
        let inner = scanner.group().ok_or_else(|| {
            SyntaxError::end_of_line("End of line (EOL) when scanning function call")
        })?;
        args.push(inner.trim().to_string());
        scanner.skip_whitespace();
        match scanner.peek() {
            None => break,
            Some(',') => {
                scanner.bump();
            }
            Some(ch) => {
                return Err(SyntaxError::new(format!(
                    "Expected `,` after argument, found `{ch}`"
                )));
            }
        }
    }
    Ok(args)
}

/// Splits on whitespace, keeping parenthesised groups and quoted strings whole.
pub fn split_operands(input: &str) -> Result<Vec<String>, SyntaxError> {
    let mut scanner = Scanner::new(input);
    let mut operands = Vec::new();
    loop {
        scanner.skip_whitespace();
        if scanner.is_at_end() {
            break;
        }
        let word = scanner.word().ok_or_else(|| {
            SyntaxError::new(format!("Unbalanced parentheses or quotes in `{}`", input.trim()))
        })?;
        operands.push(word.to_string());
    }
    Ok(operands)
}

/// Reads the right-hand side of an assignment. A grouped value must close
/// exactly at the end of the line; a bare value must balance its quotes.
pub fn assignment_value(input: &str) -> Result<&str, SyntaxError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('(') {
        split_operands(trimmed)?;
        return Ok(trimmed);
    }
    let mut scanner = Scanner::new(trimmed);
    let inner = scanner.group().ok_or_else(|| {
        SyntaxError::end_of_line("End of line (EOL) when scanning assignment value")
            .with_help("close the value's parentheses and quotes")
    })?;
    scanner.skip_whitespace();
    if !scanner.is_at_end() {
        return Err(SyntaxError::new(format!(
            "Unexpected `{}` after assignment value",
            &scanner.src[scanner.offset..]
        )));
    }
    Ok(inner.trim())
}

/// Strips one pair of enclosing parentheses when the first `(` closes at the
/// very end of the token. `(1)` becomes `1`; `(1) + (2)` is left alone.
pub fn unwrap_group(token: &str) -> &str {
    let trimmed = token.trim();
    if trimmed.starts_with('(') {
        let mut scanner = Scanner::new(trimmed);
        if let Some(inner) = scanner.group() {
            if scanner.is_at_end() {
                return inner.trim();
            }
        }
    }
    trimmed
}

struct Scanner<'a> {
    src: &'a str,
    offset: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, offset: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.offset >= self.src.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    /// Consumes a balanced `( ... )` group and returns its contents, or `None`
    /// when the input ends before the group closes.
    fn group(&mut self) -> Option<&'a str> {
        let start = self.offset;
        let mut depth = 0usize;
        let mut in_quote = false;
        while let Some(ch) = self.bump() {
            if in_quote {
                match ch {
                    '\\' => {
                        self.bump();
                    }
                    '"' => in_quote = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_quote = true,
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(&self.src[start + 1..self.offset - 1]);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Consumes up to the next top-level whitespace.
    fn word(&mut self) -> Option<&'a str> {
        let start = self.offset;
        let mut depth = 0usize;
        let mut in_quote = false;
        while let Some(ch) = self.peek() {
            if !in_quote && depth == 0 && ch.is_whitespace() {
                break;
            }
            self.bump();
            if in_quote {
                match ch {
                    '\\' => {
                        self.bump();
                    }
                    '"' => in_quote = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_quote = true,
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if depth > 0 || in_quote {
            None
        } else {
            Some(&self.src[start..self.offset])
        }
    }
}
