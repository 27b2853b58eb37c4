use serde_json::json;

use crate::api::format::menu_lines;
use crate::auth::flow::{self, set_test_role};
use crate::cli::utils::{output_access_denied, output_success};
use crate::cli::{Context, OutputFormat};
use crate::routes::{Navigation, Route};
use crate::types::Role;

pub fn menu(ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    let page = ctx.open(Route::Dashboard, output_format)?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "menu": page.menu }))?),
        OutputFormat::Text => {
            for line in menu_lines(&page.menu) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// One navigation pass, reporting what the shell would show. Opening the logout
/// page signs out and lands on the login page.
pub async fn open(ctx: &mut Context, path: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut outcome = ctx.router.navigate(path);
    if matches!(&outcome, Navigation::Render(page) if page.route == Route::Logout) {
        let to = flow::logout(&ctx.client).await;
        ctx.router.refresh();
        outcome = Navigation::Redirect { to, reason: "Signed out".to_string() };
    }
    if let OutputFormat::Json = output_format {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        Navigation::Render(page) if page.route == Route::AccessDenied => {
            output_access_denied(output_format, ctx.session.as_ref(), "")?;
        }
        Navigation::Render(page) => {
            println!("{} ({})", page.route.title(), page.route.path());
            if !page.route.is_public() {
                println!("Signed in as {} ({})", page.user.username, page.user.role);
            }
        }
        Navigation::Redirect { to: Route::AccessDenied, reason } => {
            output_access_denied(output_format, ctx.session.as_ref(), &reason)?;
        }
        Navigation::Redirect { to, reason } => println!("→ {} ({})", to, reason),
        Navigation::NotFound { path } => anyhow::bail!("No page at {}", path),
    }
    Ok(())
}

pub fn role_test(ctx: &mut Context, role: Role, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::RoleTest, output_format)?;
    set_test_role(ctx.session.as_ref(), role)?;
    ctx.router.reload();
    output_success(
        output_format,
        &format!("Session switched to testuser ({})", role),
        Some(json!({ "username": "testuser", "role": role, "menu": ctx.router.menu() })),
    )
}
