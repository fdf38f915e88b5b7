//! Sign-in commands.
//!
//! With the http backend the principal comes from the server (`GET /me` for
//! the configured API key); otherwise it is given on the command line.

use chrono::Utc;
use clap::Args;
use shelf_sync_core::{IdentityProvider, Principal, PrincipalId};

use crate::context::Context;
use crate::error::CliError;
use crate::session::SessionRecord;

/// Sign in and record the login on the profile
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Principal id (required unless the http backend is used)
    #[arg(long)]
    pub principal: Option<String>,

    /// Email stored on the profile
    #[arg(long)]
    pub email: Option<String>,
}

impl LoginCommand {
    pub async fn run(&self, ctx: &Context) -> Result<(), CliError> {
        let principal = self.resolve(ctx).await?;

        ctx.session_file.save(&SessionRecord {
            principal_id: principal.id.clone(),
            email: principal.email.clone(),
            signed_in_at: Utc::now(),
        })?;
        ctx.reset();
        ctx.session.sign_in(principal.clone());

        let states = ctx.state_store()?;
        if states.load_profile().await?.is_none() {
            states.create_user_profile(&principal.email).await?;
            println!("Created profile for {}", principal.id);
        } else {
            states.update_last_login().await?;
        }

        println!("Signed in as {}", describe(&principal));
        Ok(())
    }

    async fn resolve(&self, ctx: &Context) -> Result<Principal, CliError> {
        if let Some(http) = ctx.http_store()? {
            let me = http.whoami().await?;
            if let Some(requested) = &self.principal {
                if requested != me.id.as_str() {
                    return Err(CliError::Session(format!(
                        "the API key belongs to '{}', not '{}'",
                        me.id, requested
                    )));
                }
            }
            let email = self.email.clone().unwrap_or(me.email);
            return Ok(Principal::new(me.id, email));
        }

        let id = self.principal.as_deref().ok_or_else(|| {
            CliError::Session("--principal is required unless the http backend is used".into())
        })?;
        Ok(Principal::new(
            PrincipalId::new(id)?,
            self.email.clone().unwrap_or_default(),
        ))
    }
}

/// Signs out and forgets the session.
pub fn logout(ctx: &Context) -> Result<(), CliError> {
    let was_signed_in = ctx.session_file.clear()?;
    ctx.session.sign_out();
    ctx.reset();

    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Already signed out.");
    }
    Ok(())
}

/// Shows the signed-in principal.
pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    let Some(principal) = ctx.session.current_principal() else {
        println!("Not signed in. Run 'shelf login' to sign in.");
        return Ok(());
    };

    println!("Signed in as {}", describe(&principal));
    if let Some(record) = ctx.session_file.load()? {
        println!("  since: {}", record.signed_in_at.format("%Y-%m-%d %H:%M"));
    }

    match ctx.state_store()?.load_profile().await {
        Ok(Some(profile)) => {
            if let Some(last_login) = profile.last_login {
                println!("  last login: {}", last_login.format("%Y-%m-%d %H:%M"));
            }
        }
        Ok(None) => println!("  (no profile stored)"),
        Err(e) => tracing::warn!("Could not load profile: {}", e),
    }
    Ok(())
}

fn describe(principal: &Principal) -> String {
    if principal.email.is_empty() {
        principal.id.to_string()
    } else {
        format!("{} <{}>", principal.id, principal.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::test_context;
    use shelf_sync_core::current_principal_id;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_login_creates_profile_then_updates() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, None);
        let login = LoginCommand {
            principal: Some("reader".into()),
            email: Some("reader@example.com".into()),
        };

        login.run(&ctx).await.unwrap();
        assert_eq!(current_principal_id(&ctx.session).unwrap().as_str(), "reader");
        assert!(ctx.session_file.load().unwrap().is_some());

        let first = ctx.state_store().unwrap().load_profile().await.unwrap().unwrap();
        assert_eq!(first.email, "reader@example.com");

        login.run(&ctx).await.unwrap();
        let second = ctx.state_store().unwrap().load_profile().await.unwrap().unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.last_login >= first.last_login);
    }

    #[tokio::test]
    async fn test_login_requires_principal_for_local_store() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, None);
        let login = LoginCommand {
            principal: None,
            email: None,
        };

        assert!(matches!(login.run(&ctx).await, Err(CliError::Session(_))));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_principal() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, None);
        let login = LoginCommand {
            principal: Some("../other".into()),
            email: None,
        };

        assert!(matches!(login.run(&ctx).await, Err(CliError::Sync(_))));
    }

    #[tokio::test]
    async fn test_whoami_after_login() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, Some("reader"));
        whoami(&ctx).await.unwrap();

        logout(&ctx).unwrap();
        whoami(&ctx).await.unwrap();
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir, Some("reader"));
        assert!(ctx.principal_id().is_ok());

        logout(&ctx).unwrap();
        assert!(ctx.principal_id().is_err());
        assert!(ctx.session_file.load().unwrap().is_none());

        // Second logout is harmless
        logout(&ctx).unwrap();
    }
}
