//! Template compilation
//!
//! Output templates are written in the dot syntax users of the management
//! tooling already know (`{{.Name}}`, `{{range .Parameters}}...{{end}}`).
//! They are translated into minijinja source and executed there:
//!
//! | template                     | minijinja                                  |
//! |------------------------------|--------------------------------------------|
//! | `{{.Name}}`                  | `{{ dot0["Name"] }}`                        |
//! | `{{range .Parameters}}`      | `{% for dot1 in (dot0["Parameters"])\|range_values %}` |
//! | `{{if .Status}}`             | `{% if dot0["Status"] %}`                   |
//! | `{{with .Status}}`           | `{% with dot1 = ... %}{% if dot1 %}`        |
//! | `{{upper .Name}}`            | `{{ (dot0["Name"])\|upper }}`               |
//!
//! The data being rendered is bound to `dot0`. Missing fields are errors when
//! executed strictly; header rows are executed leniently.

use super::error::FormatError;
use minijinja::value::ValueKind;
use minijinja::{context, AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};
use serde::Serialize;

const TEMPLATE_NAME: &str = "format";

/// Functions callable from templates and the minijinja filters backing them
const FUNCTIONS: &[(&str, &str)] = &[
    ("json", "json"),
    ("jsonPretty", "json_pretty"),
    ("upper", "upper"),
    ("lower", "lower"),
    ("title", "title"),
    ("len", "length"),
];

/// A compiled output template
pub struct Template {
    source: String,
    strict: Environment<'static>,
    lenient: Environment<'static>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Template {
    /// Compile template text
    pub fn compile(source: &str) -> Result<Self, FormatError> {
        let translated = translate(source)?;
        tracing::trace!("Compiled template {:?} to {:?}", source, translated);

        Ok(Self {
            source: source.to_string(),
            strict: environment(&translated, UndefinedBehavior::Strict)?,
            lenient: environment(&translated, UndefinedBehavior::Lenient)?,
        })
    }

    /// The text this template was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Execute against `data`; referencing a missing field is an error
    pub fn execute<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, FormatError> {
        render(&self.strict, data)
    }

    /// Execute against `data`, printing missing fields as empty text
    pub fn execute_lenient<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, FormatError> {
        render(&self.lenient, data)
    }
}

fn environment(source: &str, undefined: UndefinedBehavior) -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(undefined);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("json", to_json);
    env.add_filter("json_pretty", to_json_pretty);
    env.add_filter("range_values", range_values);
    env.add_template_owned(TEMPLATE_NAME, source.to_string())?;
    Ok(env)
}

fn render<T: Serialize + ?Sized>(
    env: &Environment<'static>,
    data: &T,
) -> Result<String, FormatError> {
    let template = env.get_template(TEMPLATE_NAME)?;
    let output = template.render(context! { dot0 => Value::from_serialize(data) })?;
    Ok(output)
}

fn to_json(value: Value) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(json_error)
}

fn to_json_pretty(value: Value) -> Result<String, Error> {
    serde_json::to_string_pretty(&value).map_err(json_error)
}

/// What `range` walks: list elements, or map values in key order
fn range_values(value: Value) -> Result<Value, Error> {
    match value.kind() {
        ValueKind::Seq | ValueKind::Iterable | ValueKind::Undefined => Ok(value),
        ValueKind::None => Ok(Value::from(Vec::<Value>::new())),
        ValueKind::Map => {
            let mut keys: Vec<Value> = value.try_iter()?.collect();
            keys.sort();
            let values = keys
                .iter()
                .map(|key| value.get_item(key))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::from(values))
        }
        _ => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("range can't iterate over {}", value),
        )),
    }
}

fn json_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::InvalidOperation, "cannot serialize value to JSON").with_source(err)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Range,
    If,
    With,
}

impl BlockKind {
    fn name(self) -> &'static str {
        match self {
            BlockKind::Range => "range",
            BlockKind::If => "if",
            BlockKind::With => "with",
        }
    }
}

#[derive(Debug)]
struct Block {
    kind: BlockKind,
    /// Dot in effect outside the block
    outer_dot: String,
    has_else: bool,
}

/// Translate dot-syntax template text into minijinja source
pub(crate) fn translate(source: &str) -> Result<String, FormatError> {
    let mut translator = Translator::new();
    let mut offset = 0;

    while let Some(start) = source[offset..].find("{{") {
        let position = offset + start;
        translator.text(&source[offset..position]);

        let body_start = position + 2;
        let Some(len) = source[body_start..].find("}}") else {
            return Err(FormatError::syntax(position, "unclosed action"));
        };
        translator.action(&source[body_start..body_start + len], position)?;
        offset = body_start + len + 2;
    }
    translator.text(&source[offset..]);

    translator.finish(source.len())
}

struct Translator {
    out: String,
    pending: String,
    trim_next: bool,
    dot: String,
    blocks: Vec<Block>,
    vars: usize,
}

impl Translator {
    fn new() -> Self {
        Self {
            out: String::new(),
            pending: String::new(),
            trim_next: false,
            dot: "dot0".to_string(),
            blocks: Vec::new(),
            vars: 0,
        }
    }

    fn text(&mut self, text: &str) {
        let text = if self.trim_next {
            self.trim_next = false;
            text.trim_start()
        } else {
            text
        };
        self.pending.push_str(text);
    }

    /// Emit buffered literal text
    ///
    /// Text containing braces goes through a string expression so the engine
    /// never mistakes it for its own delimiters.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        if text.contains(['{', '}']) {
            self.out.push_str("{{ \"");
            for c in text.chars() {
                match c {
                    '\\' => self.out.push_str("\\\\"),
                    '"' => self.out.push_str("\\\""),
                    '\n' => self.out.push_str("\\n"),
                    '\r' => self.out.push_str("\\r"),
                    '\t' => self.out.push_str("\\t"),
                    c => self.out.push(c),
                }
            }
            self.out.push_str("\" }}");
        } else {
            self.out.push_str(&text);
        }
    }

    fn action(&mut self, raw: &str, position: usize) -> Result<(), FormatError> {
        let mut body = raw;

        let trim_left = body.len() > 1
            && body.starts_with('-')
            && body[1..].starts_with(|c: char| c.is_ascii_whitespace());
        if trim_left {
            body = &body[1..];
            let kept = self.pending.trim_end().len();
            self.pending.truncate(kept);
        }

        let trim_right = body.len() > 1
            && body.ends_with('-')
            && body[..body.len() - 1].ends_with(|c: char| c.is_ascii_whitespace());
        if trim_right {
            body = &body[..body.len() - 1];
        }

        let body = body.trim();
        if body.starts_with("/*") && body.ends_with("*/") && body.len() >= 4 {
            self.trim_next = trim_right;
            return Ok(());
        }

        self.flush();
        let keyword = body.split_whitespace().next();

        match keyword {
            None => return Err(FormatError::syntax(position, "missing value for command")),
            Some("end") => self.end(after_keyword(body, "end"), position)?,
            Some("else") => self.else_branch(after_keyword(body, "else"), position)?,
            Some("range") => {
                let expr = self.pipeline(after_keyword(body, "range"), position)?;
                let var = self.fresh_var();
                self.out.push_str(&format!("{{% for {} in ({})|range_values %}}", var, expr));
                self.open(BlockKind::Range, Some(var));
            }
            Some("if") => {
                let expr = self.pipeline(after_keyword(body, "if"), position)?;
                self.out.push_str(&format!("{{% if {} %}}", expr));
                self.open(BlockKind::If, None);
            }
            Some("with") => {
                let expr = self.pipeline(after_keyword(body, "with"), position)?;
                let var = self.fresh_var();
                self.out.push_str(&format!(
                    "{{% with {var} = {expr} %}}{{% if {var} %}}",
                    var = var,
                    expr = expr
                ));
                self.open(BlockKind::With, Some(var));
            }
            Some(_) => {
                let expr = self.pipeline(body, position)?;
                self.out.push_str(&format!("{{{{ {} }}}}", expr));
            }
        }

        self.trim_next = trim_right;
        Ok(())
    }

    fn finish(mut self, end: usize) -> Result<String, FormatError> {
        if let Some(block) = self.blocks.last() {
            return Err(FormatError::syntax(
                end,
                format!("unexpected EOF: unclosed {}", block.kind.name()),
            ));
        }
        self.flush();
        Ok(self.out)
    }

    fn fresh_var(&mut self) -> String {
        self.vars += 1;
        format!("dot{}", self.vars)
    }

    fn open(&mut self, kind: BlockKind, new_dot: Option<String>) {
        let outer_dot = match new_dot {
            Some(dot) => std::mem::replace(&mut self.dot, dot),
            None => self.dot.clone(),
        };
        self.blocks.push(Block {
            kind,
            outer_dot,
            has_else: false,
        });
    }

    fn end(&mut self, rest: &str, position: usize) -> Result<(), FormatError> {
        if !rest.is_empty() {
            return Err(FormatError::syntax(position, "unexpected argument to end"));
        }
        let Some(block) = self.blocks.pop() else {
            return Err(FormatError::syntax(position, "unexpected {{end}}"));
        };

        self.out.push_str(match block.kind {
            BlockKind::Range => "{% endfor %}",
            BlockKind::If => "{% endif %}",
            BlockKind::With => "{% endif %}{% endwith %}",
        });
        self.dot = block.outer_dot;
        Ok(())
    }

    fn else_branch(&mut self, rest: &str, position: usize) -> Result<(), FormatError> {
        let else_if = match rest.strip_prefix("if") {
            Some(cond) if cond.is_empty() || cond.starts_with(char::is_whitespace) => {
                Some(cond.trim())
            }
            _ if rest.is_empty() => None,
            _ => return Err(FormatError::syntax(position, "unexpected argument to else")),
        };

        let Some(block) = self.blocks.last() else {
            return Err(FormatError::syntax(position, "unexpected {{else}}"));
        };
        if block.has_else {
            return Err(FormatError::syntax(position, "expected end; found else"));
        }
        let kind = block.kind;

        match else_if {
            Some(cond) => {
                if kind != BlockKind::If {
                    return Err(FormatError::syntax(
                        position,
                        format!("else if is not allowed in {}", kind.name()),
                    ));
                }
                let expr = self.pipeline(cond, position)?;
                self.out.push_str(&format!("{{% elif {} %}}", expr));
            }
            None => {
                self.out.push_str("{% else %}");
                if let Some(block) = self.blocks.last_mut() {
                    block.has_else = true;
                    // Outside the element/value binding, dot is the enclosing one again
                    if kind != BlockKind::If {
                        self.dot = block.outer_dot.clone();
                    }
                }
            }
        }
        Ok(())
    }

    /// Translate `arg`, `func arg` or `arg | func | func`
    fn pipeline(&self, text: &str, position: usize) -> Result<String, FormatError> {
        let mut expr: Option<String> = None;

        for command in text.split('|') {
            let words: Vec<&str> = command.split_whitespace().collect();
            expr = Some(match (expr, words.as_slice()) {
                (_, []) => return Err(FormatError::syntax(position, "missing value for command")),
                (None, [arg]) => {
                    if lookup_function(arg).is_some() {
                        return Err(FormatError::syntax(
                            position,
                            format!("wrong number of args for {}: want 1 got 0", arg),
                        ));
                    }
                    self.argument(arg, position)?
                }
                (None, [func, arg]) => {
                    let arg = self.argument(arg, position)?;
                    format!("({})|{}", arg, self.function(func, position)?)
                }
                (Some(prev), [func]) => format!("({})|{}", prev, self.function(func, position)?),
                (_, [first, ..]) => {
                    return Err(FormatError::syntax(
                        position,
                        format!("too many arguments in command starting with {}", first),
                    ))
                }
            });
        }

        expr.ok_or_else(|| FormatError::syntax(position, "missing value for command"))
    }

    fn function(&self, name: &str, position: usize) -> Result<&'static str, FormatError> {
        lookup_function(name).ok_or_else(|| {
            FormatError::syntax(position, format!("function \"{}\" not defined", name))
        })
    }

    /// Translate `.`, `.A.B`, `$` or `$.A.B`
    fn argument(&self, arg: &str, position: usize) -> Result<String, FormatError> {
        let (base, path) = if arg == "$" {
            return Ok("dot0".to_string());
        } else if let Some(path) = arg.strip_prefix("$.") {
            ("dot0", path)
        } else if arg.starts_with('$') {
            return Err(FormatError::syntax(
                position,
                format!("undefined variable \"{}\"", arg),
            ));
        } else if arg == "." {
            return Ok(self.dot.clone());
        } else if let Some(path) = arg.strip_prefix('.') {
            (self.dot.as_str(), path)
        } else {
            return Err(FormatError::syntax(
                position,
                format!("unexpected \"{}\" in command", arg),
            ));
        };

        let mut expr = base.to_string();
        for field in path.split('.') {
            if !is_identifier(field) {
                return Err(FormatError::syntax(
                    position,
                    format!("bad field name \"{}\" in \"{}\"", field, arg),
                ));
            }
            expr.push_str(&format!("[\"{}\"]", field));
        }
        Ok(expr)
    }
}

fn after_keyword<'a>(body: &'a str, keyword: &str) -> &'a str {
    body[keyword.len()..].trim()
}

fn lookup_function(name: &str) -> Option<&'static str> {
    FUNCTIONS
        .iter()
        .find(|(func, _)| *func == name)
        .map(|(_, filter)| *filter)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
