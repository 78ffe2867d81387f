use crate::host::HostEditor;
use rhai::{Engine, OptimizationLevel, ParseError, AST};
use thiserror::Error;

pub const VALID_SYNTAX_MESSAGE: &str = "No syntax errors detected.";

const SCRIPT_FN_NAME: &str = "attached_script";
const SCRIPT_FN_HEADER: &str = "fn attached_script() {\n";
const SCRIPT_FN_FOOTER: &str = "\n}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Script is empty. Please write some Rhai code.")]
    EmptyInput,
    #[error("Syntax Error: {0}")]
    Syntax(String),
}

/// Compile-only Rhai checker. Scripts are parsed as the body of a function and never evaluated.
pub struct ScriptValidator {
    engine: Engine,
}

impl ScriptValidator {
    pub fn new() -> Self {
        let mut engine = Engine::new_raw();
        // constant folding may call registered functions
        engine.set_optimization_level(OptimizationLevel::None);
        Self { engine }
    }

    pub fn validate(&self, source: &str) -> Result<(), ValidationError> {
        if source.trim().is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        let wrapped = format!("{SCRIPT_FN_HEADER}{source}{SCRIPT_FN_FOOTER}");
        match self.engine.compile(wrapped) {
            Ok(ast) if closes_body_early(&ast) => Err(ValidationError::Syntax(format!(
                "Unexpected '}}' closing the script body (line {})",
                early_close_line(source)
            ))),
            Ok(_) => Ok(()),
            Err(err) => Err(ValidationError::Syntax(describe_parse_error(&err, source))),
        }
    }
}

impl Default for ScriptValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// An unbalanced `}` ends the wrapper early, leaving extra functions or top-level statements.
fn closes_body_early(ast: &AST) -> bool {
    let mut functions = ast.iter_functions();
    let only_wrapper = matches!(
        (functions.next(), functions.next()),
        (Some(function), None) if function.name == SCRIPT_FN_NAME && function.params.is_empty()
    );
    !only_wrapper || !ast.statements().is_empty()
}

/// Line of the first `}` without a matching `{`, ignoring strings and comments.
fn early_close_line(source: &str) -> usize {
    let mut depth = 0usize;
    let mut line = 1;
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\n' => line += 1,
            '"' | '`' | '\'' => {
                while let Some(next) = chars.next() {
                    match next {
                        '\\' => {
                            chars.next();
                        }
                        '\n' => line += 1,
                        _ if next == ch => break,
                        _ => {}
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '{' => depth += 1,
            '}' if depth == 0 => return line,
            '}' => depth -= 1,
            _ => {}
        }
    }
    line
}

/// Reports positions relative to the author's text rather than the wrapping function.
fn describe_parse_error(err: &ParseError, source: &str) -> String {
    let kind = err.err_type();
    let pos = err.position();
    match (pos.line(), pos.position()) {
        (Some(line), column) => {
            let last_line = source.lines().count().max(1);
            let line = line.saturating_sub(1).clamp(1, last_line);
            match column {
                Some(column) => format!("{kind} (line {line}, position {column})"),
                None => format!("{kind} (line {line})"),
            }
        }
        (None, _) => kind.to_string(),
    }
}

pub struct ScriptCallbacks {
    on_run: Box<dyn FnMut()>,
    on_error: Box<dyn FnMut(&ValidationError)>,
}

impl ScriptCallbacks {
    pub fn new() -> Self {
        Self {
            on_run: Box::new(|| log::info!("[script-attach] valid syntax")),
            on_error: Box::new(|err| log::info!("[script-attach] error: {err}")),
        }
    }

    pub fn on_run(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_run = Box::new(callback);
        self
    }

    pub fn on_error(mut self, callback: impl FnMut(&ValidationError) + 'static) -> Self {
        self.on_error = Box::new(callback);
        self
    }
}

impl Default for ScriptCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Valid,
    Invalid(ValidationError),
}

impl RunOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, RunOutcome::Valid)
    }
}

/// Validates editor content and reports the result. Failures stop here.
pub struct ValidationService {
    validator: ScriptValidator,
    callbacks: ScriptCallbacks,
}

impl ValidationService {
    pub fn new(callbacks: ScriptCallbacks) -> Self {
        Self { validator: ScriptValidator::new(), callbacks }
    }

    pub fn run(&mut self, source: &str, host: &mut dyn HostEditor) -> RunOutcome {
        match self.validator.validate(source) {
            Ok(()) => {
                host.notify(VALID_SYNTAX_MESSAGE);
                (self.callbacks.on_run)();
                RunOutcome::Valid
            }
            Err(err) => {
                log::error!("[script-attach] script validation error: {err}");
                (self.callbacks.on_error)(&err);
                host.notify(&err.to_string());
                RunOutcome::Invalid(err)
            }
        }
    }
}
