//! Sign-in, sign-out, and session inspection.

use storekeeper_merchant::login::{LoginFlow, LoginStep};

use super::{Context, prompt};

/// Run the interactive two-step login.
pub async fn login(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(session) = ctx.sessions.current() {
        println!(
            "Already signed in as {} ({}). Run `storekeeper logout` first to switch accounts.",
            session.owner_name(),
            session.store_name()
        );
        return Ok(());
    }

    let mut flow = LoginFlow::new();

    loop {
        match flow.step().clone() {
            LoginStep::Username => {
                let input = prompt("Username: ")?;
                flow.set_username(input);

                match flow.submit_username(&ctx.sessions).await {
                    Ok(LoginStep::Password {
                        store_name,
                        owner_name,
                    }) => println!("Welcome {owner_name} ({store_name})"),
                    Ok(LoginStep::Username) => {}
                    Err(e) => println!("{e}"),
                }
            }
            LoginStep::Password { .. } => {
                let input = prompt("Password (empty to go back): ")?;
                if input.is_empty() {
                    flow.back();
                    continue;
                }
                flow.set_password(input);

                match flow.submit_password(&ctx.sessions).await {
                    Ok(session) => {
                        println!(
                            "Signed in as {} ({})",
                            session.owner_name(),
                            session.store_name()
                        );
                        return Ok(());
                    }
                    Err(e) => println!("Login failed: {e}"),
                }
            }
        }
    }
}

/// Clear the session and its persisted record.
pub fn logout(ctx: &Context) {
    ctx.sessions.logout();
    println!("Signed out.");
}

/// Print the signed-in store, if any.
pub fn whoami(ctx: &Context) {
    match ctx.sessions.current() {
        Some(session) => {
            println!("Store:    {}", session.store_name());
            println!("Owner:    {}", session.owner_name());
            println!("Username: {}", session.username());
            println!("Store id: {}", session.store_id());
        }
        None => println!("Not signed in."),
    }
}
