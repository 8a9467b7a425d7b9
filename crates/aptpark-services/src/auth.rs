//! Administrator and resident login.

use crate::console::Console;
use crate::error::{Outcome, ServiceResult};
use crate::messages::DisplayMessages;
use crate::prompt;
use crate::unit_of_work::settle;
use aptpark_core::validation;
use aptpark_storage::repositories::{admin, residents};
use aptpark_storage::{Admin, Database, Resident, transaction};
use sqlx::SqliteConnection;
use tracing::{info, warn};

/// Replace the administrator's name and password.
///
/// # Errors
///
/// A blank name or a password failing the policy is an input error.
pub async fn update_admin_credentials(
    conn: &mut SqliteConnection,
    current_name: &str,
    new_name: &str,
    new_password: &str,
) -> ServiceResult<Outcome<Admin>> {
    let name = validation::non_empty("Admin name", new_name)?;
    validation::password_policy(new_password)?;

    admin::update_credentials(conn, current_name, &name, new_password).await?;
    info!(from = current_name, to = %name, "Admin credentials changed");

    Ok(Outcome::Done(Admin {
        name,
        password: new_password.to_string(),
    }))
}

#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The administrator matching both name and password.
    pub async fn login_admin(&self, name: &str, password: &str) -> ServiceResult<Option<Admin>> {
        let mut conn = self.db.acquire().await?;
        let found = admin::find_by_name(&mut conn, name.trim())
            .await?
            .filter(|a| a.verify_password(password));

        match &found {
            Some(a) => info!(admin = %a.name, "Admin logged in"),
            None => warn!("Admin login failed"),
        }
        Ok(found)
    }

    /// The resident matching both username and password.
    pub async fn login_resident(
        &self,
        username: &str,
        password: &str,
    ) -> ServiceResult<Option<Resident>> {
        let mut conn = self.db.acquire().await?;
        let found = residents::find_by_username(&mut conn, username.trim())
            .await?
            .filter(|r| r.verify_password(password));

        match &found {
            Some(r) => info!(resident_id = %r.resident_id, "Resident logged in"),
            None => warn!("Resident login failed"),
        }
        Ok(found)
    }

    /// Prompt for a new name and a policy-compliant password.
    ///
    /// On success the caller logs the administrator out.
    pub async fn change_admin_credentials(
        &self,
        console: &mut impl Console,
        current: &Admin,
    ) -> ServiceResult<Outcome<Admin>> {
        let new_name = prompt::non_empty(console, "Enter new admin name: ", "Admin name")?;
        let new_password = loop {
            let password = prompt::password(console, "Enter new password: ")?;
            let confirm = console
                .read_line("Confirm new password: ")
                .ok_or(crate::error::ServiceError::InputClosed)?;
            if confirm == password {
                break password;
            }
            console.say("Passwords do not match.");
        };

        let mut tx = transaction::begin(&self.db).await?;
        let result = update_admin_credentials(&mut tx, &current.name, &new_name, &new_password).await;
        let outcome = settle(tx, console, result).await?;

        if outcome.is_done() {
            console.say(DisplayMessages::CREDENTIALS_CHANGED);
        }
        Ok(outcome)
    }
}
