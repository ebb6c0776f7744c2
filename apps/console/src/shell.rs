//! Line-oriented command shell driving one mounted screen.

use std::io::Write;

use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    ContactsController, EventsController, GroupSubmission, ScreenError, Toast,
};
use shared::domain::{
    ContactId, ContactType, EventGroupId, EventId, NewContact, Relation,
};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::TryRecvError},
};
use tracing::debug;

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// Splits a command line on whitespace, keeping double-quoted runs together.
pub fn split_command_line(line: &str) -> Result<Vec<String>, SplitError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(SplitError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DraftField {
    Relation,
    Type,
    Name,
    Value,
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ContactsLine {
    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum ContactsCommand {
    /// Show the contact list
    List,
    /// Open or close the new-contact form
    Add,
    /// Change one field of the new-contact form
    Set {
        field: DraftField,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Submit the new-contact form
    Save,
    /// Remove a contact from the list
    Remove { id: i64 },
    Quit,
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct EventsLine {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum EventsCommand {
    /// Show all events
    Events,
    /// Show all event groups
    Groups,
    /// Show one event's details
    Show { id: i64 },
    /// Open the editor for a new event
    New,
    /// Close the event details
    Close,
    /// Set the new event group name
    GroupName {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Create the event group named by `group-name`
    AddGroup,
    /// Start editing an event group
    Edit { id: i64 },
    /// Change the name of the group being edited
    Rename {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Save the group being edited
    Save,
    /// Discard the group being edited
    Cancel,
    /// Re-fetch events and groups
    Refresh,
    Quit,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Step {
    pub output: Vec<String>,
    pub quit: bool,
}

impl Step {
    fn say(line: impl Into<String>) -> Self {
        Self {
            output: vec![line.into()],
            quit: false,
        }
    }

    fn quit() -> Self {
        Self {
            output: Vec::new(),
            quit: true,
        }
    }
}

/// Gateway failures are already surfaced as toasts; only inline errors print here.
fn describe_failure(err: &ScreenError) -> Step {
    match err {
        ScreenError::Validation(validation) => Step::say(format!("! {validation}")),
        other => {
            debug!(error = %other, "command failed");
            Step::default()
        }
    }
}

pub async fn execute_contacts(controller: &ContactsController, command: ContactsCommand) -> Step {
    match command {
        ContactsCommand::List => Step::say(render::render_contacts(&controller.snapshot().await)),
        ContactsCommand::Add => {
            let open = controller.toggle_adding().await;
            Step::say(if open { "Add contact form opened" } else { "Add contact form closed" })
        }
        ContactsCommand::Set { field, value } => {
            let value = value.join(" ");
            match field {
                DraftField::Relation => match value.parse::<Relation>() {
                    Ok(relation) => {
                        controller
                            .edit_draft(move |draft| NewContact { relation, ..draft })
                            .await
                    }
                    Err(err) => return Step::say(format!("! {err}")),
                },
                DraftField::Type => match value.parse::<ContactType>() {
                    Ok(contact_type) => {
                        controller
                            .edit_draft(move |draft| NewContact {
                                contact_type,
                                ..draft
                            })
                            .await
                    }
                    Err(err) => return Step::say(format!("! {err}")),
                },
                DraftField::Name => {
                    controller
                        .edit_draft(move |draft| NewContact {
                            name: value,
                            ..draft
                        })
                        .await
                }
                DraftField::Value => {
                    controller
                        .edit_draft(move |draft| NewContact { value, ..draft })
                        .await
                }
            }
            Step::default()
        }
        ContactsCommand::Save => match controller.submit().await {
            Ok(contact) => Step::say(format!("Saved contact {}", contact.id)),
            Err(err) => describe_failure(&err),
        },
        ContactsCommand::Remove { id } => {
            if controller.remove(ContactId(id)).await {
                Step::say(format!("Removed contact {id}"))
            } else {
                Step::say(format!("No contact with id {id}"))
            }
        }
        ContactsCommand::Quit => Step::quit(),
    }
}

pub async fn execute_events(controller: &EventsController, command: EventsCommand) -> Step {
    match command {
        EventsCommand::Events => Step::say(render::render_events(&controller.snapshot().await)),
        EventsCommand::Groups => Step::say(render::render_groups(&controller.snapshot().await)),
        EventsCommand::Show { id } => {
            if controller.view_event(EventId(id)).await {
                let snapshot = controller.snapshot().await;
                Step::say(render::render_event_detail(snapshot.detail.as_ref()))
            } else {
                Step::say(format!("No event with id {id}"))
            }
        }
        EventsCommand::New => {
            controller.open_new_event().await;
            Step::say(render::render_event_detail(controller.snapshot().await.detail.as_ref()))
        }
        EventsCommand::Close => {
            controller.close_event().await;
            Step::default()
        }
        EventsCommand::GroupName { name } => {
            controller.set_new_group_name(name.join(" ")).await;
            Step::default()
        }
        EventsCommand::AddGroup => match controller.add_group().await {
            Ok(GroupSubmission::Created(_)) => {
                Step::say(render::render_groups(&controller.snapshot().await))
            }
            Ok(GroupSubmission::Busy) => Step::say("An event group is already being created"),
            Err(err) => describe_failure(&err),
        },
        EventsCommand::Edit { id } => {
            if controller.start_editing(EventGroupId(id)).await {
                Step::say(render::render_groups(&controller.snapshot().await))
            } else {
                Step::say(format!("No event group with id {id}"))
            }
        }
        EventsCommand::Rename { name } => {
            if controller.edit_group_name(name.join(" ")).await {
                Step::default()
            } else {
                Step::say("No event group is being edited")
            }
        }
        EventsCommand::Save => match controller.save_editing().await {
            Ok(Some(_)) => Step::say(render::render_groups(&controller.snapshot().await)),
            Ok(None) => Step::say("No event group is being edited"),
            Err(err) => describe_failure(&err),
        },
        EventsCommand::Cancel => {
            controller.cancel_editing().await;
            Step::default()
        }
        EventsCommand::Refresh => match controller.refresh().await {
            Ok(()) => Step::say(render::render_events(&controller.snapshot().await)),
            Err(err) => describe_failure(&err),
        },
        EventsCommand::Quit => Step::quit(),
    }
}

fn drain_toasts(toasts: &mut broadcast::Receiver<Toast>) {
    loop {
        match toasts.try_recv() {
            Ok(toast) => println!("{}", render::render_toast(&toast)),
            Err(TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "toast receiver lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

fn prompt(label: &str) -> std::io::Result<()> {
    print!("{label}> ");
    std::io::stdout().flush()
}

#[async_trait]
pub trait ShellScreen: Send + Sync {
    type Command: Send;

    fn label(&self) -> &'static str;
    fn parse(tokens: Vec<String>) -> Result<Self::Command, clap::Error>;
    async fn execute(&self, command: Self::Command) -> Step;
}

#[async_trait]
impl ShellScreen for ContactsController {
    type Command = ContactsCommand;

    fn label(&self) -> &'static str {
        "contacts"
    }

    fn parse(tokens: Vec<String>) -> Result<ContactsCommand, clap::Error> {
        ContactsLine::try_parse_from(tokens).map(|line| line.command)
    }

    async fn execute(&self, command: ContactsCommand) -> Step {
        execute_contacts(self, command).await
    }
}

#[async_trait]
impl ShellScreen for EventsController {
    type Command = EventsCommand;

    fn label(&self) -> &'static str {
        "events"
    }

    fn parse(tokens: Vec<String>) -> Result<EventsCommand, clap::Error> {
        EventsLine::try_parse_from(tokens).map(|line| line.command)
    }

    async fn execute(&self, command: EventsCommand) -> Step {
        execute_events(self, command).await
    }
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run<S: ShellScreen>(
    screen: &S,
    mut toasts: broadcast::Receiver<Toast>,
) -> anyhow::Result<()> {
    let label = screen.label();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    drain_toasts(&mut toasts);
    prompt(label)?;

    while let Some(line) = lines.next_line().await? {
        let tokens = match split_command_line(&line) {
            Ok(tokens) => tokens,
            Err(err) => {
                println!("! {err}");
                prompt(label)?;
                continue;
            }
        };
        if tokens.is_empty() {
            prompt(label)?;
            continue;
        }

        match S::parse(tokens) {
            Ok(command) => {
                let step = screen.execute(command).await;
                drain_toasts(&mut toasts);
                for line in &step.output {
                    println!("{line}");
                }
                if step.quit {
                    return Ok(());
                }
            }
            Err(err) => println!("{err}"),
        }
        prompt(label)?;
    }
    Ok(())
}
