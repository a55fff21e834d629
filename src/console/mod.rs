//! The line-oriented command loop.
//!
//! [`Console::run`] reads one line at a time, parses it into a [`Command`],
//! dispatches it against [`Storage`] and prints either the result or a fixed
//! error string. A failed command never ends the session; only `quit`, `EOF`
//! and end of input do.

mod command;
mod error;
pub mod help;

use std::io::{self, BufRead, Write};

use hbnb_core::models::{ClassName, Instance};
use hbnb_core::storage::Storage;
use serde_json::Value;

pub use command::{tokenize, Arg, Command};
pub use error::ConsoleError;

pub const PROMPT: &str = "(hbnb) ";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

enum Reply {
    Nothing,
    Text(String),
    Exit,
}

pub struct Console {
    storage: Storage,
    interactive: bool,
}

impl Console {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            interactive: false,
        }
    }

    /// Print the prompt before each line (and a newline at end of input).
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Read and run lines until `quit`, `EOF` or end of input. Lines that
    /// are not valid UTF-8 are decoded lossily and run like any other.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            if self.interactive {
                write!(out, "{}", PROMPT)?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                if self.interactive {
                    writeln!(out)?;
                }
                tracing::debug!("End of input");
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buf);
            if matches!(line, std::borrow::Cow::Owned(_)) {
                tracing::warn!("Input line is not valid UTF-8");
            }

            if self.execute(&line, out)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Run a single line. Only I/O errors on `out` are returned; command
    /// failures are printed.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = Command::parse(line);
        tracing::debug!("Dispatching {:?}", command);

        match self.dispatch(command) {
            Ok(Reply::Nothing) => Ok(Flow::Continue),
            Ok(Reply::Text(text)) => {
                writeln!(out, "{}", text)?;
                Ok(Flow::Continue)
            }
            Ok(Reply::Exit) => Ok(Flow::Exit),
            Err(e) => {
                if let ConsoleError::Storage(inner) = &e {
                    tracing::error!("Storage failure: {}", inner);
                }
                writeln!(out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Reply, ConsoleError> {
        match command {
            Command::Empty => Ok(Reply::Nothing),
            Command::Create(args) => self.create(&args),
            Command::Show(args) => self.show(&args),
            Command::Destroy(args) => self.destroy(&args),
            Command::All(args) => self.all(&args),
            Command::Count(args) => self.count(&args),
            Command::Update(args) => self.update(&args),
            Command::UpdateMany { args, attributes } => {
                let (class, id) = require_instance(&args)?;
                self.apply_update(class, id, attributes.into_iter().collect())
            }
            Command::Help(topic) => Ok(Reply::Text(match topic {
                None => help::overview(),
                Some(name) => match help::topic(&name) {
                    Some(text) => text.to_string(),
                    None => format!("*** No help on {}", name),
                },
            })),
            Command::Quit | Command::Eof => Ok(Reply::Exit),
            Command::Unknown(line) => Ok(Reply::Text(format!("*** Unknown syntax: {}", line))),
        }
    }

    // ============================================================
    // Handlers
    // ============================================================

    fn create(&mut self, args: &[Arg]) -> Result<Reply, ConsoleError> {
        let class = require_class(args)?;

        let mut instance = Instance::new(class);
        instance.touch();
        let id = instance.id.to_string();
        self.storage.insert(instance);
        self.storage.save()?;

        tracing::debug!("Created {}.{}", class, id);
        Ok(Reply::Text(id))
    }

    fn show(&self, args: &[Arg]) -> Result<Reply, ConsoleError> {
        let (class, id) = require_instance(args)?;
        let instance = self
            .storage
            .get(class, id)
            .ok_or(ConsoleError::NoInstanceFound)?;
        Ok(Reply::Text(instance.to_string()))
    }

    fn destroy(&mut self, args: &[Arg]) -> Result<Reply, ConsoleError> {
        let (class, id) = require_instance(args)?;
        self.storage
            .remove(class, id)
            .ok_or(ConsoleError::NoInstanceFound)?;
        self.storage.save()?;

        tracing::debug!("Destroyed {}.{}", class, id);
        Ok(Reply::Nothing)
    }

    fn all(&self, args: &[Arg]) -> Result<Reply, ConsoleError> {
        let rendered: Vec<String> = if args.is_empty() {
            self.storage.all().values().map(|i| i.to_string()).collect()
        } else {
            let class = require_class(args)?;
            self.storage.all_of(class).map(|i| i.to_string()).collect()
        };
        Ok(Reply::Text(render_list(&rendered)))
    }

    fn count(&self, args: &[Arg]) -> Result<Reply, ConsoleError> {
        let class = require_class(args)?;
        Ok(Reply::Text(self.storage.count(class).to_string()))
    }

    fn update(&mut self, args: &[Arg]) -> Result<Reply, ConsoleError> {
        let (class, id) = require_instance(args)?;
        if self.storage.get(class, id).is_none() {
            return Err(ConsoleError::NoInstanceFound);
        }
        let name = args.get(2).ok_or(ConsoleError::AttributeNameMissing)?;
        let value = args.get(3).ok_or(ConsoleError::ValueMissing)?;

        self.apply_update(class, id, vec![(name.text.clone(), value.to_value())])
    }

    /// Set every attribute, bump `updated_at` once and save. Nothing changes
    /// if any name is reserved or any value is nested.
    fn apply_update(
        &mut self,
        class: ClassName,
        id: &str,
        attributes: Vec<(String, Value)>,
    ) -> Result<Reply, ConsoleError> {
        let instance = self
            .storage
            .get_mut(class, id)
            .ok_or(ConsoleError::NoInstanceFound)?;

        for (name, value) in &attributes {
            Instance::check_attribute(name, value)?;
        }

        for (name, value) in attributes {
            instance.set_attribute(name, value)?;
        }
        instance.touch();
        self.storage.save()?;

        tracing::debug!("Updated {}.{}", class, id);
        Ok(Reply::Nothing)
    }
}

// ============================================================
// Argument validation
// ============================================================

fn require_class(args: &[Arg]) -> Result<ClassName, ConsoleError> {
    let name = args.first().ok_or(ConsoleError::ClassNameMissing)?;
    ClassName::from_str(&name.text).ok_or(ConsoleError::ClassDoesNotExist)
}

fn require_instance(args: &[Arg]) -> Result<(ClassName, &str), ConsoleError> {
    let class = require_class(args)?;
    let id = args.get(1).ok_or(ConsoleError::InstanceIdMissing)?;
    Ok((class, id.text.as_str()))
}

/// `['<instance>', '<instance>']`, with `\` and `'` escaped inside each item.
fn render_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|s| format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}
