use clap::Subcommand;
use serde_json::json;

use crate::api::users::{filter_users, UserForm};
use crate::cli::utils::{check, output_records, output_success, read_form, read_form_over, read_line};
use crate::cli::{Context, OutputFormat};
use crate::routes::Route;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List user accounts")]
    List {
        #[arg(long, help = "Filter on username, email, first or last name")]
        search: Option<String>,
    },
    #[command(about = "Create an account from JSON form data")]
    Add {
        #[arg(long, help = "Form JSON (read from stdin if omitted)")]
        data: Option<String>,
    },
    #[command(about = "Edit an account from JSON form data")]
    Edit {
        id: i64,
        #[arg(long, help = "Form JSON (read from stdin if omitted)")]
        data: Option<String>,
    },
    #[command(about = "Set a new password for an account")]
    ResetPassword {
        id: i64,
        #[arg(long, help = "New password (read from stdin if omitted)")]
        password: Option<String>,
    },
    #[command(about = "Health centers that accounts can be assigned to")]
    Centers,
}

const USER_FIELDS: &[&str] = &["id", "username", "firstName", "lastName", "email", "phoneNumber", "role", "status"];

pub async fn handle(cmd: UserCommands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::Users, output_format)?;
    let api = ctx.client.users();

    match cmd {
        UserCommands::List { search } => {
            let users = check(output_format, api.list().await)?;
            let shown: Vec<_> = filter_users(&users, search.as_deref().unwrap_or(""))
                .into_iter()
                .cloned()
                .collect();
            output_records(output_format, "users", &shown, USER_FIELDS)
        }
        UserCommands::Add { data } => {
            let form: UserForm = read_form(data)?;
            check(output_format, api.create(&form).await)?;
            output_success(output_format, "User created successfully", None)
        }
        UserCommands::Edit { id, data } => {
            let users = check(output_format, api.list().await)?;
            let existing = users
                .iter()
                .find(|u| u.id == id)
                .ok_or_else(|| anyhow::anyhow!("User {} not found", id))?;
            let form = read_form_over(&UserForm::from(existing), data)?;
            check(output_format, api.update(existing, &form).await)?;
            output_success(output_format, "User updated successfully", Some(json!({ "id": id })))
        }
        UserCommands::ResetPassword { id, password } => {
            let password = match password {
                Some(p) => p,
                None => read_line("New password")?,
            };
            check(output_format, api.reset_password(id, &password).await)?;
            output_success(output_format, "Password reset successfully", Some(json!({ "id": id })))
        }
        UserCommands::Centers => {
            let centers = check(output_format, ctx.client.districts().top_level_centers().await)?;
            output_records(output_format, "healthCenters", &centers, &["id", "code", "name", "districtName"])
        }
    }
}
