use std::time::Duration;

use actix_web::{dev::Server, error::JsonPayloadError, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use fsp_engine::{OrderFlowApi, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    integrations::razorpay::RazorpayGateway,
    routes::{health, CreateOrderRoute, MyOrdersRoute, OrderByIdRoute, VerifyPaymentRoute},
};

const DB_MAX_CONNECTIONS: u32 = 25;
/// Create-order bodies are a handful of fields. Anything much bigger is not a legitimate request.
const JSON_PAYLOAD_LIMIT: usize = 16 * 1024;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, DB_MAX_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(format!("Database migration failed. {e}")))?;
    info!("🚀️ Database ready at {}", db.url());
    let gateway =
        RazorpayGateway::new(config.razorpay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Malformed JSON bodies are reported in the same `{success, message}` shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(JSON_PAYLOAD_LIMIT).error_handler(|err: JsonPayloadError, _req| {
        debug!("💻️ Rejected request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
) -> Result<Server, ServerError> {
    let flow_config = config.order_flow();
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), gateway.clone(), flow_config);
        let token_verifier = TokenVerifier::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fsp::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(token_verifier))
            .service(health)
            .service(CreateOrderRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(OrderByIdRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(MyOrdersRoute::<SqliteDatabase, RazorpayGateway>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
