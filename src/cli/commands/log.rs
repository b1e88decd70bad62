use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Log { print: true, limit } = cmd {
        let pool = DbPool::open(&ctx.config().database)?;
        LogLogic::print_log(&pool, *limit)?;
    }

    Ok(())
}
