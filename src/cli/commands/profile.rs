use clap::Subcommand;
use serde_json::json;

use crate::api::profile::PasswordChange;
use crate::cli::utils::{check, output_success, read_line};
use crate::cli::{Context, OutputFormat};
use crate::routes::Route;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Show,

    #[command(about = "Update email and phone number")]
    Update {
        #[arg(long, help = "New email (keeps the current one if omitted)")]
        email: Option<String>,
        #[arg(long, help = "New phone number (keeps the current one if omitted)")]
        phone: Option<String>,
    },

    #[command(about = "Change your password (prompts for anything not given)")]
    Password {
        #[arg(long)]
        current: Option<String>,
        #[arg(long = "new")]
        new_password: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: ProfileCommands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::Profile, output_format)?;
    let profile_api = ctx.client.profile();

    match cmd {
        ProfileCommands::Show => {
            let profile = check(output_format, profile_api.get().await)?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
                OutputFormat::Text => {
                    println!("Username: {}", profile.username);
                    println!("Email: {}", profile.email);
                    println!("Phone: {}", profile.phone_number);
                    println!("Role: {}", profile.role);
                }
            }
            Ok(())
        }
        ProfileCommands::Update { email, phone } => {
            let current = check(output_format, profile_api.get().await)?;
            let email = email.unwrap_or(current.email);
            let phone = phone.unwrap_or(current.phone_number);
            check(output_format, profile_api.update(&email, &phone).await)?;
            output_success(
                output_format,
                "Profile updated successfully",
                Some(json!({ "email": email, "phoneNumber": phone })),
            )
        }
        ProfileCommands::Password { current, new_password, confirm } => {
            let change = PasswordChange {
                current_password: prompt_unless_given(current, "Current password")?,
                new_password: prompt_unless_given(new_password, "New password")?,
                confirm_password: prompt_unless_given(confirm, "Confirm password")?,
            };
            check(output_format, profile_api.change_password(&change).await)?;
            output_success(output_format, "Password changed successfully", None)
        }
    }
}

fn prompt_unless_given(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => read_line(prompt),
    }
}
