//! User account command handlers.

use secrecy::SecretString;
use tabled::Tabled;

use parkvision_core::{
    Command as CoreCommand, CommandResult, CreateUserRequest, Dashboard, UpdateUserRequest, User,
};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Last Login")]
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            email: u.email.clone(),
            admin: if u.is_admin { "yes" } else { "" }.into(),
            last_login: util::format_time(u.last_login),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!("ID:         {}", u.id),
        format!("Username:   {}", u.username),
        format!("Email:      {}", u.email),
        format!("Admin:      {}", u.is_admin),
        format!("Created:    {}", util::format_time(u.created_at)),
        format!("Last Login: {}", util::format_time(u.last_login)),
    ]
    .join("\n")
}

fn print_user(result: &CommandResult, global: &GlobalOpts) {
    if let CommandResult::User(user) = result {
        let out = output::render_single(&global.output, user, detail, |u| u.id.to_string());
        output::print_output(&out, global.quiet);
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = dashboard.users().await?;
            let out = output::render_list(&global.output, &users, |u| UserRow::from(u), |u| {
                u.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = dashboard.user(id).await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create { username, email } => {
            let password = SecretString::from(util::prompt_new_password()?);
            let result = dashboard
                .execute(CoreCommand::CreateUser(CreateUserRequest {
                    username,
                    email,
                    password,
                }))
                .await?;
            print_user(&result, global);
            Ok(())
        }

        UsersCommand::Update {
            id,
            username,
            email,
            password,
        } => {
            let password = if password {
                Some(SecretString::from(util::prompt_new_password()?))
            } else {
                None
            };
            let update = UpdateUserRequest {
                username,
                email,
                password,
            };
            let result = dashboard
                .execute(CoreCommand::UpdateUser { id, update })
                .await?;
            print_user(&result, global);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm("users delete", &format!("Delete user {id}?"), global.yes)? {
                return Ok(());
            }
            dashboard.execute(CoreCommand::DeleteUser { id }).await?;
            if !global.quiet {
                eprintln!("User {id} deleted");
            }
            Ok(())
        }
    }
}
