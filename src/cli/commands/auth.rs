use serde_json::json;

use crate::auth::flow::{self, login_view_redirect};
use crate::auth::role::user_info;
use crate::cli::utils::{output_success, read_line};
use crate::cli::{Context, OutputFormat};

pub async fn login(
    ctx: &mut Context,
    username: &str,
    password: Option<String>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    if let Some(route) = login_view_redirect(ctx.session.as_ref()) {
        let user = user_info(ctx.session.as_ref());
        return output_success(
            output_format,
            &format!("Already signed in as {}", user.username),
            Some(json!({ "redirect": route.path(), "username": user.username, "role": user.role })),
        );
    }

    let password = match password {
        Some(p) => p,
        None => read_line("Password")?,
    };

    match flow::login(&ctx.client, username, &password).await {
        Ok(route) => {
            ctx.router.refresh();
            let user = user_info(ctx.session.as_ref());
            output_success(
                output_format,
                &format!("Signed in as {} ({})", user.username, user.role),
                Some(json!({ "redirect": route.path(), "username": user.username, "role": user.role })),
            )
        }
        Err(failure) => Err(failure.into()),
    }
}

pub async fn logout(ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    let route = flow::logout(&ctx.client).await;
    ctx.router.refresh();
    output_success(output_format, "Signed out", Some(json!({ "redirect": route.path() })))
}

pub fn whoami(ctx: &Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    if !ctx.session.is_present() {
        anyhow::bail!("Not signed in");
    }
    let user = user_info(ctx.session.as_ref());
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
        OutputFormat::Text => {
            println!("Username: {}", user.username);
            println!("Role: {}", user.role);
            if let Some(email) = &user.email {
                println!("Email: {}", email);
            }
        }
    }
    Ok(())
}
