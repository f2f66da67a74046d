use tower_http::{ compression::CompressionLayer, trace::TraceLayer };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

use recipe_proxy::{ config::Config, middleware, routes, state::AppState };

#[tokio::main]
async fn main() {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_|
                    "recipe_proxy=debug,tower_http=debug,axum::rejection=trace".into()
                )
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Environment: {:?}", config.server.environment);
    tracing::info!("CORS enabled: {}", config.security.cors_enabled);
    tracing::info!("Fallback policy: {}", config.fallback);

    let state = AppState::new(config.clone()).expect("Failed to initialize Spoonacular client");

    let app = routes
        ::create_routes(state)
        .layer(middleware::cors::setup_cors(&config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Recipe proxy starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Failed to start server");
}
