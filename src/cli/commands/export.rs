use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let snapshot = ctx.build_snapshot().await?;
        ExportLogic::export(&snapshot, *format, file, *force)?;
    }
    Ok(())
}
