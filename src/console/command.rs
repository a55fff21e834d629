//! Turning an input line into a [`Command`].
//!
//! Two forms are accepted:
//!
//! - plain: `show User 1234`
//! - dot-call: `User.show("1234")`, rewritten to the plain form. The dot-call
//!   `update` also takes a JSON object: `User.update("1234", {"age": 36})`.

use serde_json::{Map, Value};

/// One whitespace-separated argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub text: String,
    /// Whether the argument was written in double quotes.
    pub quoted: bool,
}

impl Arg {
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    /// Interpret the argument as an attribute value.
    ///
    /// Quoted text is always a string. Bare text becomes an integer or a
    /// float when it parses as one, and a string otherwise. Integer literals
    /// outside the `i64` range stay strings rather than losing precision.
    pub fn to_value(&self) -> Value {
        if self.quoted {
            return Value::String(self.text.clone());
        }
        if is_integer_literal(&self.text) {
            return match self.text.parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(self.text.clone()),
            };
        }
        if let Some(n) = self
            .text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
        Value::String(self.text.clone())
    }
}

/// An optional sign followed by one or more ASCII digits.
fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Create(Vec<Arg>),
    Show(Vec<Arg>),
    Destroy(Vec<Arg>),
    All(Vec<Arg>),
    Count(Vec<Arg>),
    Update(Vec<Arg>),
    /// Dot-call update with a dictionary. `args` holds class and id.
    UpdateMany {
        args: Vec<Arg>,
        attributes: Map<String, Value>,
    },
    Help(Option<String>),
    Quit,
    Eof,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        if let Some(command) = parse_dot_call(line) {
            return command;
        }

        let mut args = tokenize(line, false);
        if args.is_empty() {
            return Self::Empty;
        }
        let verb = args.remove(0);
        if verb.quoted {
            return Self::Unknown(line.to_string());
        }

        Self::from_verb(&verb.text, args).unwrap_or_else(|| Self::Unknown(line.to_string()))
    }

    fn from_verb(verb: &str, args: Vec<Arg>) -> Option<Self> {
        let command = match verb {
            "create" => Self::Create(args),
            "show" => Self::Show(args),
            "destroy" => Self::Destroy(args),
            "all" => Self::All(args),
            "count" => Self::Count(args),
            "update" => Self::Update(args),
            "help" | "?" => Self::Help(args.into_iter().next().map(|a| a.text)),
            "quit" => Self::Quit,
            "EOF" => Self::Eof,
            _ => return None,
        };
        Some(command)
    }
}

/// Parse `<Class>.<verb>(<args>)`. Returns `None` when the line is not in
/// dot-call form or names a verb that has no dot-call spelling.
fn parse_dot_call(line: &str) -> Option<Command> {
    let (class, rest) = line.split_once('.')?;
    if class.is_empty() || class.contains(char::is_whitespace) {
        return None;
    }
    let (verb, inner) = rest.split_once('(')?;
    let inner = inner.trim_end().strip_suffix(')')?;

    let mut args = vec![Arg::bare(class)];

    if verb == "update" {
        if let Some((id, dict)) = split_dictionary(inner) {
            let attributes = serde_json::from_str::<Map<String, Value>>(dict).ok()?;
            args.extend(tokenize(id, true));
            return Some(Command::UpdateMany { args, attributes });
        }
    }

    args.extend(tokenize(inner, true));

    match verb {
        "all" | "count" | "show" | "destroy" | "update" => Command::from_verb(verb, args),
        _ => None,
    }
}

/// Split `"<id>", {...}` into the id part and the JSON object text.
fn split_dictionary(inner: &str) -> Option<(&str, &str)> {
    let (id, rest) = inner.split_once(',')?;
    let rest = rest.trim();
    rest.starts_with('{').then_some((id, rest))
}

/// Split on whitespace (and commas, for dot-call argument lists) outside of
/// double quotes. `\"` inside quotes is a literal quote.
pub fn tokenize(input: &str, commas: bool) -> Vec<Arg> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
                quoted = true;
            }
            '\\' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            c if !in_quotes && (c.is_whitespace() || (commas && c == ',')) => {
                if in_token {
                    args.push(Arg {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                    in_token = false;
                    quoted = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        args.push(Arg {
            text: current,
            quoted,
        });
    }

    args
}
