use anyhow::Context;
use storage::{Database, MemoryStore};
use utoipa::OpenApi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::users::handlers::list_users,
        features::users::handlers::get_user,
        features::users::handlers::finish_profile,
        features::users::handlers::update_picture,
        features::users::handlers::attach_org,
        features::users::handlers::attach_athlete,
    ),
    components(
        schemas(
            storage::dto::user::FinishProfileRequest,
            storage::dto::user::UpdatePictureRequest,
            storage::dto::user::PictureRequest,
            storage::dto::user::UserFoundResponse,
            storage::dto::user::MutationResponse,
            storage::dto::org::CreateOrgRequest,
            storage::dto::org::AttachOrgResponse,
            storage::dto::org::AttachedOrg,
            storage::dto::athlete::CreateAthleteRequest,
            storage::dto::athlete::AttachAthleteResponse,
            storage::dto::athlete::AttachedAthlete,
            storage::models::User,
            storage::models::Org,
            storage::models::Athlete,
            storage::models::Picture,
            storage::models::UpdateResult,
        )
    ),
    tags(
        (name = "users", description = "User profile endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Session id")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting user profile API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let state = match &config.database_url {
        Some(database_url) => {
            tracing::info!(
                "Connecting to database at: {}",
                config.database_host().unwrap_or("unknown")
            );
            let db = Database::new(database_url, config.max_connections)
                .await
                .context("Failed to initialize database")?;
            tracing::info!("Database connection established");

            tracing::info!("Running database migrations");
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Database migrations completed successfully");

            AppState::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
            AppState::new(MemoryStore::new())
        }
    };

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
