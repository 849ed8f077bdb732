use std::fmt::Write as _;

use anyhow::Context;
use charity_api::{build_router, AppState};
use charity_config::load as load_config;
use charity_database::{Campaign, CampaignRepository, Organization, OrganizationRepository};
use charity_runtime::{telemetry, BackendServices};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "charity-server")]
#[command(about = "Charity platform backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create an administrator account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Print organizations and the funding progress of their campaigns
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&config, services).await,
        Commands::CreateAdmin {
            email,
            name,
            password,
        } => create_admin(&services, &email, &name, &password).await,
        Commands::Summary => print_summary(&services).await,
    }
}

async fn run_server(
    config: &charity_config::AppConfig,
    services: BackendServices,
) -> anyhow::Result<()> {
    info!("starting charity platform backend");

    let state = AppState::new(services.db_pool.clone(), services.authenticator.clone());
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(charity_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn create_admin(
    services: &BackendServices,
    email: &str,
    name: &str,
    password: &str,
) -> anyhow::Result<()> {
    let admin = services
        .authenticator
        .create_admin(email, name, password)
        .await
        .with_context(|| format!("failed to create administrator {email}"))?;

    info!(user_id = %admin.id, "administrator created");
    println!("Created administrator {} ({})", admin.email, admin.id);
    Ok(())
}

async fn print_summary(services: &BackendServices) -> anyhow::Result<()> {
    let organizations = OrganizationRepository::new(services.db_pool.clone())
        .list_all()
        .await
        .context("failed to fetch organizations")?;
    let campaigns = CampaignRepository::new(services.db_pool.clone())
        .list_all()
        .await
        .context("failed to fetch campaigns")?;

    print!("{}", render_summary(&organizations, &campaigns));
    Ok(())
}

fn render_summary(organizations: &[Organization], campaigns: &[Campaign]) -> String {
    let mut out = String::new();
    if organizations.is_empty() {
        out.push_str("No organizations found in database\n");
        return out;
    }

    for organization in organizations {
        let _ = writeln!(
            out,
            "=== {} [{}] ({}) ===",
            organization.name, organization.status, organization.id
        );

        let owned: Vec<&Campaign> = campaigns
            .iter()
            .filter(|campaign| campaign.organization_id == organization.id)
            .collect();
        if owned.is_empty() {
            out.push_str("  no campaigns\n");
            continue;
        }

        let _ = writeln!(
            out,
            "  {:<30} {:<10} {:>12} {:>12} {:>8}",
            "Title", "Status", "Raised", "Target", "Progress"
        );
        for campaign in owned {
            let _ = writeln!(
                out,
                "  {:<30} {:<10} {:>12.2} {:>12.2} {:>7}%",
                campaign.title,
                campaign.status.as_str(),
                campaign.current_amount,
                campaign.target_amount,
                campaign.progress()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use charity_database::{CampaignStatus, OrganizationStatus};

    fn organization(id: &str, name: &str) -> Organization {
        Organization {
            id: id.into(),
            user_id: format!("user-{id}"),
            name: name.into(),
            description: "Test".into(),
            website: None,
            logo: None,
            email: None,
            phone: None,
            address: None,
            status: OrganizationStatus::Approved,
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
        }
    }

    fn campaign(organization_id: &str, title: &str, current: f64, target: f64) -> Campaign {
        Campaign {
            id: format!("campaign-{title}"),
            organization_id: organization_id.into(),
            user_id: format!("user-{organization_id}"),
            title: title.into(),
            description: "Test".into(),
            target_amount: target,
            current_amount: current,
            start_date: "2024-01-01T00:00:00+00:00".into(),
            end_date: "2030-01-01T00:00:00+00:00".into(),
            image: None,
            status: CampaignStatus::Active,
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
            organization_name: None,
        }
    }

    #[test]
    fn summary_groups_campaigns_under_their_organization() {
        let organizations = [organization("a", "Water Aid"), organization("b", "Food Bank")];
        let campaigns = [campaign("a", "Wells", 100.0, 300.0)];

        let rendered = render_summary(&organizations, &campaigns);

        assert!(rendered.contains("=== Water Aid [APPROVED] (a) ==="));
        assert!(rendered.contains("Wells"));
        assert!(rendered.contains("33%"));
        assert!(rendered.contains("=== Food Bank [APPROVED] (b) ===\n  no campaigns"));
    }

    #[test]
    fn summary_reports_empty_database() {
        assert_eq!(render_summary(&[], &[]), "No organizations found in database\n");
    }
}
