//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{ChatService, JwtAuthService};
use crate::application::AuthService;
use crate::config::Settings;
use crate::hub::MessageHub;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{PgMembershipRepository, PgMessageRepository};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub chat: Arc<ChatService>,
    pub auth: Arc<dyn AuthService>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Create database pool
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        database::run_migrations(&db).await?;
        tracing::info!("Database migrations applied");

        // Start the routing hub; one task owns all membership state
        let hub = MessageHub::start();

        let messages = Arc::new(PgMessageRepository::new(db.clone()));
        let memberships = Arc::new(PgMembershipRepository::new(db.clone()));

        let chat = Arc::new(ChatService::new(
            hub,
            messages,
            memberships,
            settings.websocket.outbound_queue_capacity,
        ));

        let auth: Arc<dyn AuthService> = Arc::new(JwtAuthService::new(
            settings.jwt.secret.clone(),
            settings.jwt.token_expiry_minutes,
        ));

        // Create app state
        let state = AppState {
            db,
            chat,
            auth,
            settings: Arc::new(settings.clone()),
        };

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr = settings.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
