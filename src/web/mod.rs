//! Dashboard HTTP server.

mod error;
pub mod html;
pub mod routes;

use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;
use tracing::info;

use crate::context::AppContext;
use crate::errors::AppResult;
use crate::scheduler::spawn_scheduler;

/// Serve the dashboard until the process is stopped. The scheduler starts
/// right away when credentials are present, otherwise after the first
/// successful `/config` submission.
pub async fn start_server(ctx: Arc<AppContext>, bind: &str, port: u16) -> AppResult<()> {
    if ctx.is_configured() {
        spawn_scheduler(Arc::clone(&ctx));
    } else {
        info!("record store not configured, waiting for /config");
    }

    let data = web::Data::from(ctx);
    info!(bind, port, "starting dashboard server");

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((bind, port))?
    .run()
    .await?;

    Ok(())
}
