pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::routes::{Navigation, Page, Route, Router};
use crate::session::{SessionProvider, StorageSessionProvider};
use crate::types::Role;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Dashboard console - role-based administration of reference data")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in and store the session")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and clear the stored session")]
    Logout,

    #[command(about = "Show the signed-in user and role")]
    Whoami,

    #[command(about = "Show the navigation menu for the current role")]
    Menu,

    #[command(about = "Navigate to a page path, e.g. /system-lookups/companies")]
    Open {
        #[arg(help = "Page path")]
        path: String,
    },

    #[command(about = "Replace the session with a test user of the given role")]
    RoleTest {
        #[arg(help = "ADMIN, MANAGER or USER")]
        role: Role,
    },

    #[command(about = "View and edit your profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Manage companies")]
    Companies {
        #[command(subcommand)]
        cmd: commands::lookups::CompanyCommands,
    },

    #[command(about = "Manage departments")]
    Departments {
        #[command(subcommand)]
        cmd: commands::lookups::CodedCommands,
    },

    #[command(about = "Manage job titles")]
    JobTitles {
        #[command(subcommand)]
        cmd: commands::lookups::CodedCommands,
    },

    #[command(about = "Manage positions")]
    Positions {
        #[command(subcommand)]
        cmd: commands::lookups::PositionCommands,
    },

    #[command(about = "Manage equipment")]
    Equipments {
        #[command(subcommand)]
        cmd: commands::lookups::EquipmentCommands,
    },

    #[command(about = "List districts")]
    Districts,

    #[command(about = "Manage health centers")]
    Centers {
        #[command(subcommand)]
        cmd: commands::lookups::CenterCommands,
    },

    #[command(about = "Manage user accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "Show constant data enumerations")]
    Lookups {
        #[arg(long, help = "Show a single enumeration, e.g. center-type")]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Session, HTTP client and router shared by every command
pub struct Context {
    pub session: Arc<dyn SessionProvider>,
    pub client: ApiClient,
    pub router: Router,
}

impl Context {
    pub fn new(session: Arc<dyn SessionProvider>, client: ApiClient) -> Self {
        let router = Router::new(session.clone());
        Self { session, client, router }
    }

    /// Session on disk, backend from configuration
    pub fn from_config() -> anyhow::Result<Self> {
        let session: Arc<dyn SessionProvider> = Arc::new(StorageSessionProvider::from_config()?);
        let client = ApiClient::from_config(session.clone())?;
        Ok(Self::new(session, client))
    }

    /// Enter a page before touching its data. Redirects become errors once the
    /// reason has been shown.
    pub fn open(&mut self, route: Route, output_format: &OutputFormat) -> anyhow::Result<Page> {
        match self.router.enter(route) {
            Navigation::Render(page) => Ok(page),
            Navigation::Redirect { to: Route::AccessDenied, reason } => {
                utils::output_access_denied(output_format, self.session.as_ref(), &reason)?;
                Err(anyhow::anyhow!("Access denied to {}", route.title()))
            }
            Navigation::Redirect { to: Route::Login, .. } => {
                Err(anyhow::anyhow!("Not signed in. Run `dashboard login <username>` first"))
            }
            Navigation::Redirect { to, reason } => Err(anyhow::anyhow!("Redirected to {}: {}", to, reason)),
            Navigation::NotFound { path } => Err(anyhow::anyhow!("No page at {}", path)),
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut ctx = Context::from_config()?;
    dispatch(cli.command, &mut ctx, &output_format).await
}

pub async fn dispatch(command: Commands, ctx: &mut Context, output_format: &OutputFormat) -> anyhow::Result<()> {
    use commands::{auth, lookups, nav, profile, users};

    match command {
        Commands::Login { username, password } => auth::login(ctx, &username, password, output_format).await,
        Commands::Logout => auth::logout(ctx, output_format).await,
        Commands::Whoami => auth::whoami(ctx, output_format),
        Commands::Menu => nav::menu(ctx, output_format),
        Commands::Open { path } => nav::open(ctx, &path, output_format).await,
        Commands::RoleTest { role } => nav::role_test(ctx, role, output_format),
        Commands::Profile { cmd } => profile::handle(cmd, ctx, output_format).await,
        Commands::Companies { cmd } => lookups::companies(cmd, ctx, output_format).await,
        Commands::Departments { cmd } => lookups::coded(cmd, Route::Departments, ctx, output_format).await,
        Commands::JobTitles { cmd } => lookups::coded(cmd, Route::JobTitles, ctx, output_format).await,
        Commands::Positions { cmd } => lookups::positions(cmd, ctx, output_format).await,
        Commands::Equipments { cmd } => lookups::equipments(cmd, ctx, output_format).await,
        Commands::Districts => lookups::districts(ctx, output_format).await,
        Commands::Centers { cmd } => lookups::centers(cmd, ctx, output_format).await,
        Commands::Users { cmd } => users::handle(cmd, ctx, output_format).await,
        Commands::Lookups { name } => lookups::constant_data(name, ctx, output_format).await,
    }
}
