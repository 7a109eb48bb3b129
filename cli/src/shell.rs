//! Interactive session over a single `PersonsPage`: the table is shown after
//! every action, `new` and `edit` walk through the form, `delete` asks first.

use anyhow::Result;
use person_core::{FormField, PersonId, PersonsPage, SubmitOutcome, Transport};

use crate::prompt::Prompter;
use crate::render;

const HELP: &str = "\
Commands:
  list            re-fetch and show all persons
  new             fill in the form for a new person
  edit <id>       edit the person with that id
  delete <id>     delete the person with that id
  dismiss         hide the error banner
  help            show this help
  quit            leave the shell
Ctrl-C while filling in the form cancels it.
";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    New,
    Edit(PersonId),
    Delete(PersonId),
    Dismiss,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for `{verb}`"));
    }

    let id = |verb: &str| -> Result<PersonId, String> {
        match arg {
            Some(raw) => Ok(raw.parse().unwrap_or_else(|never| match never {})),
            None => Err(format!("usage: {verb} <id>")),
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" | "refresh" => ShellCommand::List,
        "new" | "add" => ShellCommand::New,
        "edit" => ShellCommand::Edit(id("edit")?),
        "delete" | "rm" => ShellCommand::Delete(id("delete")?),
        "dismiss" => ShellCommand::Dismiss,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    if arg.is_some() && !matches!(command, ShellCommand::Edit(_) | ShellCommand::Delete(_)) {
        return Err(format!("`{verb}` takes no argument"));
    }
    Ok(command)
}

pub fn run<T: Transport>(page: &mut PersonsPage<T>, prompter: &mut Prompter, color: bool) -> Result<()> {
    page.mount();
    show(page, color);
    println!("Type `help` for commands.");

    while let Some(line) = prompter.line("persons> ")? {
        match parse(&line) {
            Ok(ShellCommand::Empty) => {}
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Help) => print!("{HELP}"),
            Ok(ShellCommand::List) => {
                page.refresh();
                show(page, color);
            }
            Ok(ShellCommand::New) => {
                page.open_new();
                fill_form(page, prompter, color)?;
                show(page, color);
            }
            Ok(ShellCommand::Edit(id)) => match page.find(&id).cloned() {
                Some(person) => {
                    page.edit(&person);
                    fill_form(page, prompter, color)?;
                    show(page, color);
                }
                None => println!("No person with id {id} in the list"),
            },
            Ok(ShellCommand::Delete(id)) => {
                page.delete(&id, || prompter.confirm(&format!("Delete person {id}?")));
                show(page, color);
            }
            Ok(ShellCommand::Dismiss) => {
                page.dismiss_error();
                show(page, color);
            }
            Err(msg) => println!("{msg}"),
        }
    }
    Ok(())
}

/// Prompt for every field until the form saves or the user cancels.
fn fill_form<T: Transport>(page: &mut PersonsPage<T>, prompter: &mut Prompter, color: bool) -> Result<()> {
    let title = if page.editing().is_some() { "Edit person" } else { "New person" };
    println!("{title}");

    loop {
        for field in FormField::ALL {
            let current = page.form().get(field).to_string();
            match prompter.field(field.label(), &current)? {
                Some(value) => page.set_field(field, value.trim()),
                None => {
                    page.cancel();
                    println!("Cancelled");
                    return Ok(());
                }
            }
        }

        match page.submit() {
            SubmitOutcome::Saved => return Ok(()),
            SubmitOutcome::Incomplete => println!("All fields are required"),
            SubmitOutcome::Rejected | SubmitOutcome::Failed => {
                if let Some(banner) = render::banner(page.error(), page.field_errors(), color) {
                    print!("{banner}");
                }
            }
        }
    }
}

fn show<T: Transport>(page: &PersonsPage<T>, color: bool) {
    if let Some(banner) = render::banner(page.error(), page.field_errors(), color) {
        print!("{banner}");
    }
    print!("{}", render::table(page.persons()));
}
