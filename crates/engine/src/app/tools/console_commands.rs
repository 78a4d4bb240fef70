use std::collections::{HashMap, VecDeque};

const MAX_PENDING_COMMANDS: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub enum LocalAction {
    Help,
    Clear,
    Echo { text: String },
    Quit,
}

/// Result of parsing one console line: either handled by the console itself
/// or queued for the owning screen as a `C`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand<C> {
    Local(LocalAction),
    Queueable(C),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandParseError {
    reason: String,
    usage: String,
}

impl CommandParseError {
    pub fn new(reason: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            usage: usage.into(),
        }
    }
}

/// Lines the console should show in response to one submitted line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleReply {
    pub clear_output: bool,
    pub lines: Vec<String>,
}

type ParseFn<C> = dyn Fn(&[String]) -> Result<ParsedCommand<C>, CommandParseError> + Send + Sync;

struct CommandSpec<C> {
    name: String,
    help: String,
    arg_schema: String,
    parse: Box<ParseFn<C>>,
}

/// Name-to-parser table. Lookup is case-insensitive and help output keeps
/// registration order.
pub struct CommandRegistry<C> {
    specs: Vec<CommandSpec<C>>,
    lookup_by_lower_name: HashMap<String, usize>,
}

impl<C: 'static> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> CommandRegistry<C> {
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            lookup_by_lower_name: HashMap::new(),
        }
    }

    pub fn with_engine_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("help", "List commands", "", parse_help_command)
            .expect("built-in command registration should not fail");
        registry
            .register("clear", "Clear console output", "", parse_clear_command)
            .expect("built-in command registration should not fail");
        registry
            .register(
                "echo",
                "Print text to console",
                "<text...>",
                parse_echo_command,
            )
            .expect("built-in command registration should not fail");
        registry
            .register("quit", "Quit game", "", parse_quit_command)
            .expect("built-in command registration should not fail");
        registry
    }

    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        arg_schema: impl Into<String>,
        parse: F,
    ) -> Result<(), String>
    where
        F: Fn(&[String]) -> Result<ParsedCommand<C>, CommandParseError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("command name cannot be empty".to_string());
        }
        let lower = name.to_ascii_lowercase();
        if self.lookup_by_lower_name.contains_key(&lower) {
            return Err(format!("duplicate command registration: {name}"));
        }

        self.specs.push(CommandSpec {
            name,
            help: help.into(),
            arg_schema: arg_schema.into(),
            parse: Box::new(parse),
        });
        self.lookup_by_lower_name.insert(lower, self.specs.len() - 1);
        Ok(())
    }

    fn lookup(&self, input_name: &str) -> Option<&CommandSpec<C>> {
        let lower = input_name.to_ascii_lowercase();
        let index = self.lookup_by_lower_name.get(&lower)?;
        self.specs.get(*index)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn help_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.specs.iter().map(|spec| {
            if spec.arg_schema.is_empty() {
                format!("{} - {}", spec.name, spec.help)
            } else {
                format!("{} {} - {}", spec.name, spec.arg_schema, spec.help)
            }
        })
    }
}

/// Turns submitted console lines into replies and a bounded queue of `C`.
pub struct CommandProcessor<C> {
    registry: CommandRegistry<C>,
    pending_commands: VecDeque<C>,
    quit_requested: bool,
}

impl<C: 'static> CommandProcessor<C> {
    pub fn new(registry: CommandRegistry<C>) -> Self {
        Self {
            registry,
            pending_commands: VecDeque::new(),
            quit_requested: false,
        }
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry<C> {
        &mut self.registry
    }

    pub fn process_line(&mut self, raw_line: &str, reply: &mut ConsoleReply) {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            return;
        }

        let tokens = match tokenize_line(trimmed) {
            Ok(tokens) => tokens,
            Err(reason) => {
                reply.lines.push(format!("error: {reason}. usage: help"));
                return;
            }
        };
        let Some((command_name, args)) = tokens.split_first() else {
            return;
        };

        let Some(spec) = self.registry.lookup(command_name) else {
            reply
                .lines
                .push(format!("error: unknown command '{command_name}'. try: help"));
            return;
        };

        match (spec.parse)(args) {
            Ok(ParsedCommand::Local(action)) => self.apply_local_action(action, reply),
            Ok(ParsedCommand::Queueable(command)) => self.push_queueable(command),
            Err(error) => {
                reply
                    .lines
                    .push(format!("error: {}. usage: {}", error.reason, error.usage));
            }
        }
    }

    pub fn drain_pending_commands_into(&mut self, out: &mut Vec<C>) {
        out.extend(self.pending_commands.drain(..));
    }

    pub fn take_quit_requested(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }

    fn apply_local_action(&mut self, action: LocalAction, reply: &mut ConsoleReply) {
        match action {
            LocalAction::Help => reply.lines.extend(self.registry.help_lines()),
            LocalAction::Clear => {
                reply.clear_output = true;
                reply.lines.clear();
            }
            LocalAction::Echo { text } => reply.lines.push(text),
            LocalAction::Quit => self.quit_requested = true,
        }
    }

    fn push_queueable(&mut self, command: C) {
        if self.pending_commands.len() == MAX_PENDING_COMMANDS {
            self.pending_commands.pop_front();
        }
        self.pending_commands.push_back(command);
    }
}

fn tokenize_line(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut seen_token_content = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                seen_token_content = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if seen_token_content {
                    tokens.push(std::mem::take(&mut current));
                    seen_token_content = false;
                }
            }
            _ => {
                current.push(ch);
                seen_token_content = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted string".to_string());
    }
    if seen_token_content {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_help_command<C>(args: &[String]) -> Result<ParsedCommand<C>, CommandParseError> {
    require_no_args(args, "help")?;
    Ok(ParsedCommand::Local(LocalAction::Help))
}

fn parse_clear_command<C>(args: &[String]) -> Result<ParsedCommand<C>, CommandParseError> {
    require_no_args(args, "clear")?;
    Ok(ParsedCommand::Local(LocalAction::Clear))
}

fn parse_echo_command<C>(args: &[String]) -> Result<ParsedCommand<C>, CommandParseError> {
    if args.is_empty() {
        return Err(CommandParseError::new(
            "missing required argument <text...>",
            "echo <text...>",
        ));
    }
    Ok(ParsedCommand::Local(LocalAction::Echo {
        text: args.join(" "),
    }))
}

fn parse_quit_command<C>(args: &[String]) -> Result<ParsedCommand<C>, CommandParseError> {
    require_no_args(args, "quit")?;
    Ok(ParsedCommand::Local(LocalAction::Quit))
}

pub fn require_no_args(args: &[String], usage: &str) -> Result<(), CommandParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandParseError::new("unexpected extra arguments", usage))
    }
}
