use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cooper user`. Needs no acting user.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Create { email, name } => {
            let user = ctx
                .service
                .create_user(email, name.as_deref(), ctx.now())
                .await?;
            output(&user, flags.format)
        }
        UserCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let users = ctx.service.list_users(limit).await?;
            output(&users, flags.format)
        }
        UserCommands::Get { id_or_email } => {
            let user = if id_or_email.contains('@') {
                ctx.service.get_user_by_email(id_or_email).await?
            } else {
                ctx.service.get_user(id_or_email).await?
            };
            output(&user, flags.format)
        }
    }
}
