use crate::api;
use crate::auth::AuthState;
use crate::cli::actions::Action;
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            jwt_secret,
        } => {
            let auth_state = Arc::new(AuthState::new(&jwt_secret));

            api::new(port, dsn, auth_state).await?;
        }
    }

    Ok(())
}
