use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::format::Table;
use crate::api::{Page, PageRequest};
use crate::auth::role::user_info;
use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::session::SessionProvider;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Value::Object(target)) = (data, &mut response) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a client error, including per-field messages for rejected forms
pub fn output_error(output_format: &OutputFormat, error: &ClientError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = error.to_json();
            response["success"] = json!(false);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if let Some(fields) = error.field_errors() {
                for (field, message) in fields {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
    }
    Ok(())
}

/// Show the error, then hand it back for the command to fail with
pub fn check<T>(output_format: &OutputFormat, result: Result<T, ClientError>) -> anyhow::Result<T> {
    result.or_else(|e| {
        output_error(output_format, &e)?;
        Err(e.into())
    })
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Records as a JSON array under `collection_name`, or a text table of `fields`
pub fn output_records<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    records: &[T],
    fields: &[&str],
) -> anyhow::Result<()> {
    if records.is_empty() {
        return output_empty_collection(output_format, collection_name, &format!("No {} found", collection_name));
    }
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: records }))?);
        }
        OutputFormat::Text => {
            println!("{}", Table::from_records(records, fields).render());
        }
    }
    Ok(())
}

/// One page of a paginated listing plus its position
pub fn output_page<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    page: &Page<T>,
    request: &PageRequest,
    fields: &[&str],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: page.content,
                    "page": request.page,
                    "size": request.size,
                    "sortBy": request.sort_by,
                    "sortDir": request.sort_dir,
                    "totalPages": page.total_pages,
                    "totalElements": page.total_elements,
                }))?
            );
        }
        OutputFormat::Text => {
            if page.content.is_empty() {
                println!("No {} found", collection_name);
            } else {
                println!("{}", Table::from_records(&page.content, fields).render());
            }
            println!(
                "Page {} of {} ({} total, sorted by {} {})",
                request.page + 1,
                page.total_pages.max(1),
                page.total_elements,
                request.sort_by,
                request.sort_dir
            );
        }
    }
    Ok(())
}

/// The 403 page: who is signed in and why the page was refused
pub fn output_access_denied(output_format: &OutputFormat, session: &dyn SessionProvider, reason: &str) -> anyhow::Result<()> {
    let user = user_info(session);
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "status": 403,
                    "error": "Access Denied",
                    "reason": reason,
                    "username": user.username,
                    "role": user.role,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("403 Access Denied");
            println!("You don't have permission to access this page.");
            println!("Signed in as {} ({})", user.username, user.role);
            println!("Go back, or run `dashboard open /dashboard`.");
        }
    }
    Ok(())
}

/// Form body from `--data`, or stdin when not given
pub fn read_form<T: DeserializeOwned>(data: Option<String>) -> anyhow::Result<T> {
    let raw = match data {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if raw.trim().is_empty() {
        anyhow::bail!("No form data given; pass --data '<json>' or pipe JSON on stdin");
    }
    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid form JSON: {}", e))
}

/// Edit form: fields given in `--data` (or stdin) replace those of `current`
pub fn read_form_over<T: Serialize + DeserializeOwned>(current: &T, data: Option<String>) -> anyhow::Result<T> {
    let changes: Value = read_form(data)?;
    let Value::Object(changes) = changes else {
        anyhow::bail!("Form data must be a JSON object");
    };
    let mut merged = serde_json::to_value(current)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(changes);
    }
    serde_json::from_value(merged).map_err(|e| anyhow::anyhow!("Invalid form JSON: {}", e))
}

/// Single line from stdin, trimmed of its newline
pub fn read_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}: ", prompt);
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
