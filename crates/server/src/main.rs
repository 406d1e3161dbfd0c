//! Hustings server entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use hustings_api::{middleware::AppState, router as api_router};
use hustings_common::Config;
use hustings_core::{
    AuthService, BallotService, CandidateService, ConstituencyDirectory, EmailService,
    PartyService, RegistrationService, VoterService,
};
use hustings_db::repositories::{
    CandidateRepository, ConstituencyRepository, PartyRepository, PendingVerificationRepository,
    VoteRepository, VoterRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hustings=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting hustings server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = hustings_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    hustings_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let voter_repo = VoterRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let candidate_repo = CandidateRepository::new(Arc::clone(&db));
    let party_repo = PartyRepository::new(Arc::clone(&db));
    let pending_repo = PendingVerificationRepository::new(Arc::clone(&db));
    let constituency_repo = ConstituencyRepository::new(Arc::clone(&db));

    // Load the postcode lookup table and set up outbound mail
    let directory = ConstituencyDirectory::from_file(&config.election.constituency_file)?;
    let email = EmailService::new(&config.email)?;

    // Initialize services
    let auth_service = AuthService::new(
        voter_repo.clone(),
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_minutes,
    );
    let registration_service = RegistrationService::new(
        voter_repo.clone(),
        pending_repo,
        directory,
        email.clone(),
        config.election.fixed_verification_code.clone(),
    );
    let ballot_service = BallotService::new(
        vote_repo,
        voter_repo.clone(),
        candidate_repo.clone(),
        party_repo.clone(),
    );
    let candidate_service = CandidateService::new(
        candidate_repo,
        party_repo.clone(),
        constituency_repo.clone(),
    );
    let party_service = PartyService::new(party_repo);
    let voter_service = VoterService::new(voter_repo, constituency_repo, email);

    // Create app state
    let state = AppState {
        auth_service,
        ballot_service,
        candidate_service,
        party_service,
        registration_service,
        voter_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api/v1.0", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            hustings_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
