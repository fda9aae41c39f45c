use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::HttpBackend;
use crate::config::Config;
use crate::form::{Action, StatusMessage};
use crate::roles::{Role, SubPermission, ROLE_CHOICES};
use crate::sync::ListSynchronizer;

#[derive(Parser)]
#[command(name = "roleform")]
#[command(about = "Assign roles and sub-permissions to users")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, env = "ROLEFORM_API_URL", help = "Base URL of the user_roles backend")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    Add {
        email: Option<String>,

        #[arg(long, help = "Role (Admin/User)")]
        role: Option<Role>,

        #[arg(long, help = "Sub-permission allowed for the role")]
        sub_role: Option<SubPermission>,
    },

    Delete {
        email: String,
    },

    Roles,

    Ui,

    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Init,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { email, role, sub_role } => {
            let config = load_config(cli.api_url)?;
            add(&config, email, role, sub_role).await
        }
        Commands::Delete { email } => {
            let config = load_config(cli.api_url)?;
            delete(&config, &email).await
        }
        Commands::Roles => {
            show_roles();
            Ok(())
        }
        Commands::Ui => {
            let config = load_config(cli.api_url)?;
            crate::tui::run_form(&config).await
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) => crate::config::show_config().await,
            Some(ConfigAction::Init) => crate::config::init_config().await,
            None => crate::config::show_config().await,
        },
    }
}

fn load_config(api_url: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = api_url {
        config.api_url = url;
    }
    Ok(config)
}

async fn add(
    config: &Config,
    email: Option<String>,
    role: Option<Role>,
    sub_role: Option<SubPermission>,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?,
    };

    let role = match role {
        Some(role) => role,
        None => {
            let labels: Vec<&str> = ROLE_CHOICES.iter().map(Role::as_str).collect();
            let index = dialoguer::Select::new()
                .with_prompt("Role")
                .items(&labels)
                .default(0)
                .interact()?;
            ROLE_CHOICES[index]
        }
    };

    let sub_permission = match sub_role {
        Some(sub_permission) => {
            if !role.allows(sub_permission) {
                anyhow::bail!("Sub-permission {} is not available for role {}", sub_permission, role);
            }
            sub_permission
        }
        None => {
            let options = role.sub_permissions();
            if options.len() == 1 {
                options[0]
            } else {
                let labels: Vec<&str> = options.iter().map(SubPermission::as_str).collect();
                let index = dialoguer::Select::new()
                    .with_prompt("Sub-permission")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                options[index]
            }
        }
    };

    let mut sync = ListSynchronizer::new(HttpBackend::new(config)?);
    sync.dispatch(Action::SetEmail(email));
    sync.dispatch(Action::SetRole(role));
    sync.dispatch(Action::SetSubPermission(sub_permission));
    sync.add().await;

    report(sync.state().status.as_ref())
}

async fn delete(config: &Config, email: &str) -> Result<()> {
    let mut sync = ListSynchronizer::new(HttpBackend::new(config)?);
    sync.delete(email).await;

    report(sync.state().status.as_ref())
}

fn report(status: Option<&StatusMessage>) -> Result<()> {
    match status {
        Some(message) if message.is_error() => anyhow::bail!("{}", message.text()),
        Some(message) => {
            println!("✓ {}", message.text());
            Ok(())
        }
        None => Ok(()),
    }
}

fn show_roles() {
    for role in ROLE_CHOICES {
        let subs: Vec<&str> = role.sub_permissions().iter().map(SubPermission::as_str).collect();
        println!("{:<6} {}", role.as_str(), subs.join(", "));
    }
}
