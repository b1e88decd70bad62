use std::sync::Arc;

use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::web::start_server;

pub async fn handle(cmd: &Commands, ctx: Arc<AppContext>) -> AppResult<()> {
    if let Commands::Serve { bind, port } = cmd {
        let server = ctx.config().server;
        let bind = bind.clone().unwrap_or(server.bind);
        let port = port.unwrap_or(server.port);

        info(format!("Dashboard on http://{bind}:{port}/ (Ctrl+C to stop)"));
        start_server(ctx, &bind, port).await?;
    }
    Ok(())
}
