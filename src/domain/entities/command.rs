use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Header line of the help listing
pub const HELP_HEADER: &str = "Here's what I can do:\n";

/// Command handler function type.
///
/// Handlers map positional arguments to the reply text. Failures are reported
/// inside the returned string; there is no error channel.
pub type CommandHandler = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub handler: CommandHandler,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            usage: name.clone(),
            name,
            description: String::new(),
            handler: Arc::new(|_: &[String]| String::new()),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.handler = Arc::new(handler);
        self
    }

    /// Run the handler with the given arguments
    pub fn run(&self, args: &[String]) -> String {
        (self.handler)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Command registry for managing available commands.
///
/// Filled once at startup, then shared read-only (usually behind an `Arc`)
/// with every dispatched task.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, command: Command) {
        if self.commands.contains_key(&command.name) {
            tracing::debug!("Replacing command: {}", command.name);
        }
        self.commands.insert(command.name.clone(), Arc::new(command));
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).cloned()
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Format the help listing, one tab-indented line per command
    pub fn help_text(&self) -> String {
        let mut commands: Vec<&Command> = self.all().collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));

        let mut help = HELP_HEADER.to_string();
        for cmd in commands {
            help.push_str(&format!("\t {} - {}\n", cmd.name, cmd.description));
        }
        help
    }
}
