//! System lookup pages: companies, coded lookups, positions, equipment,
//! districts and health centers, and the constant data enumerations.

use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::companies::{self, Company, CompanyForm};
use crate::api::departments::{search, CodedForm, CodedLookup};
use crate::api::districts::{organize_centers, HealthCenterForm};
use crate::api::equipments::{self, type_label, Equipment, EquipmentForm};
use crate::api::format::{center_tree_lines, enum_table};
use crate::api::lookups::EnumTable;
use crate::api::positions::PositionForm;
use crate::api::{ApiClient, PageRequest, SortDir};
use crate::cli::utils::{check, output_page, output_records, output_success, read_form, read_form_over};
use crate::cli::{Context, OutputFormat};
use crate::error::ClientError;
use crate::routes::Route;

/// Paging flags shared by paginated listings
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
    pub page: u32,
    #[arg(long, help = "Page size (defaults to the configured size)")]
    pub size: Option<u32>,
    #[arg(long, help = "Sort field")]
    pub sort_by: Option<String>,
    #[arg(long, default_value = "asc", help = "asc or desc")]
    pub sort_dir: SortDir,
}

impl PageArgs {
    fn request(&self, default_sort: &str) -> PageRequest {
        let mut request = PageRequest::new(self.sort_by.clone().unwrap_or_else(|| default_sort.to_string()))
            .page(self.page.saturating_sub(1))
            .sort_dir(self.sort_dir);
        if let Some(size) = self.size {
            request = request.size(size);
        }
        request
    }
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    #[command(about = "List companies, one page at a time")]
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    #[command(about = "Add a company from JSON form data")]
    Add {
        #[arg(long, help = "Form JSON (read from stdin if omitted)")]
        data: Option<String>,
    },
    #[command(about = "Edit a company from JSON form data")]
    Edit {
        id: i64,
        #[arg(long, help = "Form JSON (read from stdin if omitted)")]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CodedCommands {
    #[command(about = "List records, optionally filtered by name or code")]
    List {
        #[arg(long)]
        search: Option<String>,
    },
    #[command(about = "Add a record from JSON form data")]
    Add {
        #[arg(long)]
        data: Option<String>,
    },
    #[command(about = "Edit a record from JSON form data")]
    Edit {
        id: i64,
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PositionCommands {
    #[command(about = "List positions by display order")]
    List,
    #[command(about = "Add a position from JSON form data")]
    Add {
        #[arg(long)]
        data: Option<String>,
    },
    #[command(about = "Edit a position from JSON form data")]
    Edit {
        id: i64,
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EquipmentCommands {
    #[command(about = "List equipment, one page at a time")]
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long = "type", help = "Only show this equipment type (applies to the fetched page)")]
        equipment_type: Option<String>,
    },
    #[command(about = "List known equipment types")]
    Types,
    #[command(about = "Add equipment from JSON form data")]
    Add {
        #[arg(long)]
        data: Option<String>,
    },
    #[command(about = "Edit equipment from JSON form data")]
    Edit {
        id: i64,
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CenterCommands {
    #[command(about = "List health centers grouped by district")]
    List {
        #[arg(long, help = "Flat table instead of the district tree")]
        flat: bool,
    },
    #[command(about = "List health center types")]
    Types,
    #[command(about = "Add a health center from JSON form data")]
    Add {
        #[arg(long)]
        data: Option<String>,
    },
    #[command(about = "Edit a health center from JSON form data")]
    Edit {
        id: i64,
        #[arg(long)]
        data: Option<String>,
    },
}

const COMPANY_FIELDS: &[&str] = &["id", "companyName", "contactPerson", "phoneNumber", "email", "companyAddress"];
const CODED_FIELDS: &[&str] = &["id", "code", "name", "description", "status"];
const POSITION_FIELDS: &[&str] = &["id", "displayOrder", "name", "description", "isActive"];
const EQUIPMENT_FIELDS: &[&str] = &["id", "equipmentType", "equipmentName", "updatedAt"];
const CENTER_FIELDS: &[&str] = &["id", "code", "name", "type", "districtName", "parentCenterName", "status"];
const DISTRICT_FIELDS: &[&str] = &["id", "name", "code"];

pub async fn companies(cmd: CompanyCommands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::Companies, output_format)?;
    let api = ctx.client.companies();

    match cmd {
        CompanyCommands::List { paging } => {
            let request = paging.request(companies::DEFAULT_SORT);
            let page = check(output_format, api.list(&request).await)?;
            output_page(output_format, "companies", &page, &request, COMPANY_FIELDS)
        }
        CompanyCommands::Add { data } => {
            let form: CompanyForm = read_form(data)?;
            check(output_format, api.create(&form).await)?;
            output_success(output_format, "Company created successfully", None)
        }
        CompanyCommands::Edit { id, data } => {
            let existing = check(output_format, find_company(&ctx.client, id).await)?;
            let form = read_form_over(&CompanyForm::from(&existing), data)?;
            check(output_format, api.update(&existing, &form).await)?;
            output_success(output_format, "Company updated successfully", Some(json!({ "id": id })))
        }
    }
}

/// Companies are only listed in pages, so walk them until the id turns up
async fn find_company(client: &ApiClient, id: i64) -> Result<Company, ClientError> {
    let mut request = PageRequest::new(companies::DEFAULT_SORT);
    loop {
        let page = client.companies().list(&request).await?;
        if let Some(found) = page.content.iter().find(|c| c.id == id) {
            return Ok(found.clone());
        }
        if !page.has_next(&request) {
            return Err(not_found("Company", id));
        }
        request.page += 1;
    }
}

async fn find_equipment(client: &ApiClient, id: i64) -> Result<Equipment, ClientError> {
    let mut request = PageRequest::new(equipments::DEFAULT_SORT);
    loop {
        let page = client.equipments().list(&request, None).await?;
        if let Some(found) = page.content.iter().find(|e| e.id == id) {
            return Ok(found.clone());
        }
        if !page.has_next(&request) {
            return Err(not_found("Equipment", id));
        }
        request.page += 1;
    }
}

fn not_found(noun: &str, id: i64) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("{} {} not found", noun, id),
    }
}

pub async fn coded(cmd: CodedCommands, route: Route, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(route, output_format)?;
    let api: CodedLookup<'_> = match route {
        Route::JobTitles => ctx.client.job_titles(),
        _ => ctx.client.departments(),
    };

    match cmd {
        CodedCommands::List { search: term } => {
            let records = check(output_format, api.list().await)?;
            let shown: Vec<_> = search(&records, term.as_deref().unwrap_or("")).into_iter().cloned().collect();
            output_records(output_format, api.path.trim_start_matches("/api/"), &shown, CODED_FIELDS)
        }
        CodedCommands::Add { data } => {
            let form: CodedForm = read_form(data)?;
            check(output_format, api.create(&form).await)?;
            output_success(output_format, &format!("{} created successfully", capitalize(api.noun)), None)
        }
        CodedCommands::Edit { id, data } => {
            let records = check(output_format, api.list().await)?;
            let existing = records
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| anyhow::anyhow!("{} {} not found", capitalize(api.noun), id))?;
            let form = read_form_over(&CodedForm::from(existing), data)?;
            check(output_format, api.update(existing, &form).await)?;
            output_success(
                output_format,
                &format!("{} updated successfully", capitalize(api.noun)),
                Some(json!({ "id": id })),
            )
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub async fn positions(cmd: PositionCommands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::Positions, output_format)?;
    let api = ctx.client.positions();

    match cmd {
        PositionCommands::List => {
            let positions = check(output_format, api.list().await)?;
            output_records(output_format, "positions", &positions, POSITION_FIELDS)
        }
        PositionCommands::Add { data } => {
            let form: PositionForm = read_form(data)?;
            check(output_format, api.create(&form).await)?;
            output_success(output_format, "Position created successfully", None)
        }
        PositionCommands::Edit { id, data } => {
            let positions = check(output_format, api.list().await)?;
            let existing = positions
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow::anyhow!("Position {} not found", id))?;
            let form = read_form_over(&PositionForm::from(existing), data)?;
            check(output_format, api.update(id, &form).await)?;
            output_success(output_format, "Position updated successfully", Some(json!({ "id": id })))
        }
    }
}

pub async fn equipments(cmd: EquipmentCommands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::Equipments, output_format)?;
    let api = ctx.client.equipments();

    match cmd {
        EquipmentCommands::List { paging, equipment_type } => {
            let request = paging.request(equipments::DEFAULT_SORT);
            let page = check(output_format, api.list(&request, equipment_type.as_deref()).await)?;
            output_page(output_format, "equipments", &page, &request, EQUIPMENT_FIELDS)
        }
        EquipmentCommands::Types => {
            let types = api.types().await;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "types": types }))?),
                OutputFormat::Text if types.is_empty() => println!("No equipment types found"),
                OutputFormat::Text => {
                    for t in &types {
                        println!("{:<28} {}", t, type_label(t));
                    }
                }
            }
            Ok(())
        }
        EquipmentCommands::Add { data } => {
            let form: EquipmentForm = read_form(data)?;
            check(output_format, api.create(&form).await)?;
            output_success(output_format, "Equipment created successfully", None)
        }
        EquipmentCommands::Edit { id, data } => {
            let existing = check(output_format, find_equipment(&ctx.client, id).await)?;
            let current = EquipmentForm {
                equipment_type: existing.equipment_type.clone(),
                equipment_name: existing.equipment_name.clone(),
            };
            let form = read_form_over(&current, data)?;
            check(output_format, api.update(&existing, &form).await)?;
            output_success(output_format, "Equipment updated successfully", Some(json!({ "id": id })))
        }
    }
}

pub async fn districts(ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::DistrictsCenters, output_format)?;
    let districts = check(output_format, ctx.client.districts().list().await)?;
    output_records(output_format, "districts", &districts, DISTRICT_FIELDS)
}

pub async fn centers(cmd: CenterCommands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::DistrictsCenters, output_format)?;
    let api = ctx.client.districts();

    match cmd {
        CenterCommands::List { flat } => {
            let centers = check(output_format, api.centers().await)?;
            if flat {
                return output_records(output_format, "healthCenters", &centers, CENTER_FIELDS);
            }
            let organized = organize_centers(&centers);
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "districts": organized }))?),
                OutputFormat::Text if organized.is_empty() => println!("No health centers found"),
                OutputFormat::Text => {
                    for (district, nodes) in &organized {
                        let total: usize = nodes.iter().map(|n| n.count()).sum();
                        println!("{} ({} centers)", district, total);
                        for line in center_tree_lines(nodes) {
                            println!("  {}", line);
                        }
                    }
                }
            }
            Ok(())
        }
        CenterCommands::Types => {
            let types = check(output_format, api.center_types().await)?;
            let table = EnumTable { key: "centerType".into(), label: "Center Type".into(), rows: types };
            print_enum_tables(output_format, &[table])
        }
        CenterCommands::Add { data } => {
            let form: HealthCenterForm = read_form(data)?;
            check(output_format, api.create_center(&form).await)?;
            output_success(output_format, "Health center created successfully", None)
        }
        CenterCommands::Edit { id, data } => {
            let existing = check(output_format, api.center(id).await)?;
            let form = read_form_over(&HealthCenterForm::from(&existing), data)?;
            check(output_format, api.update_center(id, &form).await)?;
            output_success(output_format, "Health center updated successfully", Some(json!({ "id": id })))
        }
    }
}

/// Constant data page: every enumeration at once, or just `name`
pub async fn constant_data(name: Option<String>, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    ctx.open(Route::ConstantData, output_format)?;
    let lookups = ctx.client.lookups();

    let tables = match name {
        Some(name) => {
            let rows = check(output_format, lookups.enumeration(&name).await)?;
            vec![EnumTable { key: name.clone(), label: name, rows }]
        }
        None => check(output_format, lookups.constant_data().await)?,
    };
    print_enum_tables(output_format, &tables)
}

fn print_enum_tables(output_format: &OutputFormat, tables: &[EnumTable]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let body: serde_json::Map<_, _> = tables.iter().map(|t| (t.key.clone(), json!(t.rows))).collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for table in tables {
                println!("{}", table.label);
                if table.rows.is_empty() {
                    println!("  (no values)");
                } else {
                    println!("{}", enum_table(table).render());
                }
                println!();
            }
        }
    }
    Ok(())
}
