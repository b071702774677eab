//! Terminal front end for the chatbot core

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use tepabot_core::telemetry::{get_subscriber, init_subscriber};
use tepabot_core::{
    get_configuration, Conversation, SupportTicket, Tepabot, TicketError, TicketPriority,
    TicketSink,
};

#[derive(Parser)]
#[command(name = "tepabot")]
#[command(about = "Tepabot - keyword chatbot for the agency website", long_about = None)]
struct Cli {
    /// Settings file (.toml, .yaml or .json); defaults to ./tepabot.* if present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rule tables as JSON (overrides the settings file)
    #[arg(long, global = true)]
    rules: Option<String>,

    /// Response table as JSON (overrides the settings file)
    #[arg(long, global = true)]
    responses: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the response key for a message
    Classify {
        /// Print tier and trigger as JSON
        #[arg(long)]
        json: bool,

        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Chat on stdin/stdout. `/ticket <name> <email>` raises a ticket, `/reset` starts over.
    Chat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        get_configuration(cli.config.as_deref()).context("failed to load settings")?;
    if cli.rules.is_some() {
        settings.rules_path = cli.rules;
    }
    if cli.responses.is_some() {
        settings.responses_path = cli.responses;
    }

    init_subscriber(get_subscriber(&settings.log_level))
        .context("failed to install tracing subscriber")?;

    let bot = Tepabot::from_settings(settings).context("failed to build chatbot tables")?;

    match cli.command {
        Commands::Classify { json, text } => {
            let input = text.join(" ");
            if json {
                let detailed = bot.matcher().classify_detailed(&input);
                println!("{}", serde_json::to_string_pretty(&detailed)?);
            } else {
                println!("{}", bot.matcher().classify(&input));
            }
        }
        Commands::Chat => chat(&bot)?,
    }

    Ok(())
}

/// Prints the ticket as the JSON body the contact endpoint would receive
fn print_ticket(ticket: &SupportTicket) -> Result<(), TicketError> {
    let body = serde_json::to_string_pretty(ticket)?;
    println!("{body}");
    Ok(())
}

/// Arguments of a `/ticket [name] [email]` command, or None for any other input
fn parse_ticket_command(text: &str) -> Option<(&str, &str)> {
    let rest = match text.strip_prefix("/ticket") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => return None,
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let email = parts.next().unwrap_or_default();
    Some((name, email))
}

/// State of one terminal chat
struct ChatRepl<'a> {
    bot: &'a Tepabot,
    conversation: Conversation,
    pending_priority: Option<TicketPriority>,
}

impl<'a> ChatRepl<'a> {
    fn new(bot: &'a Tepabot) -> Self {
        Self {
            bot,
            conversation: Conversation::new(),
            pending_priority: None,
        }
    }

    fn greet(&mut self) {
        self.bot.greet(&mut self.conversation, Utc::now());
        self.print_last();
    }

    fn reset(&mut self) {
        self.conversation.reset();
        self.pending_priority = None;
        self.greet();
    }

    fn reply(&mut self, text: &str) {
        let reply = self.bot.reply(&mut self.conversation, text, Utc::now());
        println!("tepabot> {}", reply.text);
        if reply.open_ticket_form {
            self.pending_priority = reply.ticket_priority;
            println!("tepabot> (type /ticket <name> <email> to open a support ticket)");
        }
    }

    fn ticket(&mut self, name: &str, email: &str, sink: &dyn TicketSink) {
        let ticket = SupportTicket::from_conversation(
            name,
            email,
            "",
            &self.conversation,
            self.pending_priority.unwrap_or(TicketPriority::Low),
        );
        match self
            .bot
            .submit_ticket(&mut self.conversation, sink, &ticket, Utc::now())
        {
            Ok(_) => {
                self.pending_priority = None;
                self.print_last();
            }
            Err(err) => println!("! could not submit ticket: {err}"),
        }
    }

    fn print_last(&self) {
        if let Some(message) = self.conversation.last() {
            println!("tepabot> {}", message.text);
        }
    }
}

fn chat(bot: &Tepabot) -> anyhow::Result<()> {
    let mut repl = ChatRepl::new(bot);
    let stdout = io::stdout();

    repl.greet();

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let text = line.trim();

        if text.is_empty() {
            continue;
        }
        if text == "/quit" {
            break;
        }
        if text == "/reset" {
            repl.reset();
        } else if let Some((name, email)) = parse_ticket_command(text) {
            repl.ticket(name, email, &print_ticket);
        } else {
            repl.reply(text);
        }
        stdout.lock().flush()?;
    }

    Ok(())
}
