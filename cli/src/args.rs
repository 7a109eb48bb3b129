use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "persons")]
#[command(about = "Manage person records on a remote persons API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Full API URL, e.g. http://localhost:8081/sgu-api/api. When absent the
    /// URL is derived from the PERSONS_MODE / PERSONS_API_* variables.
    #[arg(long, env = "PERSONS_API_URL", global = true)]
    pub base_url: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show every person as a table.
    List,

    /// Show one person.
    Show { id: String },

    /// Find a person by email address.
    Find { email: String },

    Create {
        #[arg(long)]
        full_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,
    },

    /// Replace a person's fields; omitted flags keep their current value.
    Update {
        id: String,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    Delete {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Interactive table/form session.
    Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_all_fields() {
        let err = Cli::try_parse_from(["persons", "create", "--full-name", "Ada", "--email", "a@b.c"]);
        assert!(err.is_err());

        let cli = Cli::try_parse_from([
            "persons", "create", "--full-name", "Ada", "--email", "a@b.c", "--phone", "1",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Create {
                full_name: "Ada".to_string(),
                email: "a@b.c".to_string(),
                phone: "1".to_string(),
            }
        );
    }

    #[test]
    fn update_fields_are_optional() {
        let cli = Cli::try_parse_from(["persons", "update", "4", "--phone", "555"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Update {
                id: "4".to_string(),
                full_name: None,
                email: None,
                phone: Some("555".to_string()),
            }
        );
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["persons", "delete", "4", "-y", "--base-url", "http://h/api"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://h/api"));
        assert_eq!(
            cli.command,
            Command::Delete {
                id: "4".to_string(),
                yes: true,
            }
        );
    }
}
