//! Menu shell: the top menu, login, and the two role menus.

mod admin;
mod resident;

use crate::config::AppConfig;
use aptpark_services::console::Console;
use aptpark_services::messages::DisplayMessages;
use aptpark_services::{
    AuthService, ParkingService, ServiceError, ServiceResult, TenancyService, VehicleService,
    prompt,
};
use aptpark_storage::Database;
use std::path::PathBuf;
use tracing::{error, info};

const TOP_MENU: &str = "\n===== APARTMENT PARKING MANAGEMENT =====\n\
1. Admin Login\n\
2. Resident Login\n\
3. Exit";

/// Whether a role menu keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Stay,
    Logout,
}

pub struct Shell<C: Console> {
    console: C,
    auth: AuthService,
    tenancy: TenancyService,
    vehicles: VehicleService,
    parking: ParkingService,
    report_dir: PathBuf,
}

impl<C: Console> Shell<C> {
    pub async fn new(db: Database, console: C, config: &AppConfig) -> ServiceResult<Self> {
        Ok(Self {
            console,
            auth: AuthService::new(db.clone()),
            tenancy: TenancyService::new(db.clone()),
            vehicles: VehicleService::new(db.clone()),
            parking: ParkingService::new(db, config.waitlist_capacity).await?,
            report_dir: config.report_dir.clone(),
        })
    }

    /// Run until the operator exits or input ends.
    pub async fn run(&mut self) -> ServiceResult<()> {
        match self.top_menu().await {
            Err(ServiceError::InputClosed) => {
                info!("Input closed, leaving");
                Ok(())
            }
            other => other,
        }
    }

    async fn top_menu(&mut self) -> ServiceResult<()> {
        loop {
            self.console.say(TOP_MENU);
            match prompt::choice(&mut self.console, "Enter choice: ", 1..=3)? {
                1 => self.admin_login().await?,
                2 => self.resident_login().await?,
                _ => {
                    self.console.say("Exiting... Goodbye!");
                    return Ok(());
                }
            }
        }
    }

    async fn admin_login(&mut self) -> ServiceResult<()> {
        let name = prompt::text(&mut self.console, "Admin name: ")?;
        let password = prompt::text(&mut self.console, "Password: ")?;
        let found = self.auth.login_admin(&name, &password).await;

        match tolerate(&mut self.console, found)? {
            Some(Some(admin)) => {
                self.console.say(&format!("Welcome, {}!", admin.name));
                self.admin_menu(admin).await
            }
            Some(None) => {
                self.console.say(DisplayMessages::LOGIN_FAILED);
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn resident_login(&mut self) -> ServiceResult<()> {
        let username = prompt::text(&mut self.console, "Username: ")?;
        let password = prompt::text(&mut self.console, "Password: ")?;
        let found = self.auth.login_resident(&username, &password).await;

        match tolerate(&mut self.console, found)? {
            Some(Some(resident)) => {
                self.console.say(&format!(
                    "Welcome, {}! (Wing {}, House {})",
                    resident.full_name(),
                    resident.wing,
                    resident.house_number
                ));
                self.resident_menu(resident.resident_id).await
            }
            Some(None) => {
                self.console.say(DisplayMessages::LOGIN_FAILED);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Keep the shell alive across failed operations.
///
/// Storage and validation failures are reported and swallowed; only the
/// end of input escapes, since no further prompt can be answered.
fn tolerate<T>(console: &mut impl Console, result: ServiceResult<T>) -> ServiceResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ServiceError::InputClosed) => Err(ServiceError::InputClosed),
        Err(ServiceError::Invalid(invalid)) => {
            console.say(&invalid.to_string());
            Ok(None)
        }
        Err(err) => {
            error!(error = %err, "Operation failed");
            console.warn(&format!("{} ({err})", DisplayMessages::OPERATION_FAILED));
            Ok(None)
        }
    }
}
