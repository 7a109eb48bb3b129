//! One-shot subcommands. Each builds a fresh page, performs one action and
//! prints the resulting banner and table.

use std::process::ExitCode;

use anyhow::{bail, Result};
use person_core::page::FETCH_FAILED;
use person_core::{
    ApiError, DeleteOutcome, Envelope, FormField, Person, PersonClient, PersonId, PersonsPage,
    SubmitOutcome, Transport,
};

use crate::args::Command;
use crate::prompt::Prompter;
use crate::render;
use crate::shell;
use crate::transport::UreqTransport;

pub fn run(command: Command, client: PersonClient, color: bool) -> Result<ExitCode> {
    let mut page = PersonsPage::new(client, UreqTransport::new());

    match command {
        Command::List => {
            let loaded = page.mount();
            Ok(finish(&page, loaded, color))
        }
        Command::Show { id } => {
            let id = parse_id(&id);
            let result = page.client().get_person(page.transport(), &id);
            Ok(print_person(result, color))
        }
        Command::Find { email } => {
            let result = page.client().find_by_email(page.transport(), &email);
            Ok(print_person(result, color))
        }
        Command::Create {
            full_name,
            email,
            phone,
        } => {
            page.open_new();
            page.set_field(FormField::FullName, full_name);
            page.set_field(FormField::Email, email);
            page.set_field(FormField::PhoneNumber, phone);
            submit(&mut page, color)
        }
        Command::Update {
            id,
            full_name,
            email,
            phone,
        } => {
            let id = parse_id(&id);
            if !page.mount() {
                return Ok(finish(&page, false, color));
            }
            let person = match page.find(&id).cloned() {
                Some(person) => person,
                // Not in the list; let the server explain.
                None => match page.client().get_person(page.transport(), &id) {
                    Ok(Envelope {
                        success: true,
                        data: Some(person),
                        ..
                    }) => person,
                    other => return Ok(print_person(other, color)),
                },
            };
            page.edit(&person);
            let changes = [
                (FormField::FullName, full_name),
                (FormField::Email, email),
                (FormField::PhoneNumber, phone),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    page.set_field(field, value);
                }
            }
            submit(&mut page, color)
        }
        Command::Delete { id, yes } => {
            let id = parse_id(&id);
            let confirmed = if yes {
                true
            } else {
                Prompter::new()?.confirm(&format!("Delete person {id}?"))
            };
            match page.delete(&id, || confirmed) {
                DeleteOutcome::Cancelled => {
                    println!("Aborted");
                    Ok(ExitCode::SUCCESS)
                }
                DeleteOutcome::Deleted => {
                    println!("Deleted person {id}");
                    Ok(finish(&page, page.error().is_none(), color))
                }
                DeleteOutcome::Rejected | DeleteOutcome::Failed => Ok(finish(&page, false, color)),
            }
        }
        Command::Shell => {
            let mut prompter = Prompter::new()?;
            shell::run(&mut page, &mut prompter, color)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_id(raw: &str) -> PersonId {
    raw.parse().unwrap_or_else(|never| match never {})
}

fn submit<T: Transport>(page: &mut PersonsPage<T>, color: bool) -> Result<ExitCode> {
    match page.submit() {
        SubmitOutcome::Incomplete => bail!("full name, email and phone number must not be blank"),
        SubmitOutcome::Saved => {
            println!("Saved");
            Ok(finish(page, page.error().is_none(), color))
        }
        SubmitOutcome::Rejected | SubmitOutcome::Failed => Ok(finish(page, false, color)),
    }
}

/// Print the banner to stderr and, when the list is current, the table.
fn finish<T: Transport>(page: &PersonsPage<T>, list_current: bool, color: bool) -> ExitCode {
    if let Some(banner) = render::banner(page.error(), page.field_errors(), color) {
        eprint!("{banner}");
    }
    if list_current {
        print!("{}", render::table(page.persons()));
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_person(result: Result<Envelope<Person>, ApiError>, color: bool) -> ExitCode {
    let (message, errors) = match result {
        Ok(Envelope {
            success: true,
            data: Some(person),
            ..
        }) => {
            print!("{}", render::details(&person));
            return ExitCode::SUCCESS;
        }
        Ok(env) => (env.message_or(FETCH_FAILED).to_string(), env.errors),
        Err(err) => {
            tracing::error!(error = %err, "request failed");
            (FETCH_FAILED.to_string(), Vec::new())
        }
    };
    if let Some(banner) = render::banner(Some(&message), &errors, color) {
        eprint!("{banner}");
    }
    ExitCode::FAILURE
}
