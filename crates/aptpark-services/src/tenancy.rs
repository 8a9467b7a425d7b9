//! Resident lifecycle: admission, profile edits, removal and subscriptions.

use crate::console::Console;
use crate::error::{Outcome, Rejection, ServiceError, ServiceResult};
use crate::messages::DisplayMessages;
use crate::prompt;
use crate::unit_of_work::settle;
use crate::vehicles::VehicleService;
use crate::views;
use aptpark_core::constants::{MAX_RESIDENTS, MAX_RESIDENTS_PER_WING, SUBSCRIPTION_MONTHS};
use aptpark_core::{SubscriptionTier, Wing, validation};
use aptpark_storage::repositories::residents;
use aptpark_storage::{Database, Resident, StorageError, transaction};
use chrono::{Local, Months, NaiveDate};
use sqlx::SqliteConnection;
use tracing::info;

/// Details typed in for a new resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentForm {
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub wing: Wing,
}

/// Admit a resident: allocate the next id and the wing's lowest free house
/// number and store them on Silver with derived credentials.
///
/// # Errors
///
/// A malformed contact number or an empty name is an input error; capacity,
/// duplicate contacts and a clashing username are rejections.
pub async fn admit(
    conn: &mut SqliteConnection,
    form: &ResidentForm,
) -> ServiceResult<Outcome<Resident>> {
    if residents::count(conn).await? >= MAX_RESIDENTS {
        return Ok(Rejection::ApartmentFull.into());
    }
    if residents::count_in_wing(conn, form.wing).await? >= MAX_RESIDENTS_PER_WING {
        return Ok(Rejection::WingFull(form.wing).into());
    }

    let first_name = validation::non_empty("First name", &form.first_name)?;
    let last_name = validation::non_empty("Last name", &form.last_name)?;
    let contact = validation::contact_number(&form.contact_number)?;
    if residents::contact_exists(conn, &contact, None).await? {
        return Ok(Rejection::ContactInUse(contact).into());
    }

    let serial = residents::next_serial(conn).await? + 1;
    let house = residents::next_house_number(conn, form.wing).await?;
    let resident = Resident::admitted(serial, &first_name, &last_name, &contact, form.wing, house);
    if residents::username_exists(conn, &resident.username, None).await? {
        return Ok(Rejection::UsernameTaken(resident.username).into());
    }
    residents::insert(conn, &resident).await?;

    info!(
        resident_id = %resident.resident_id,
        wing = %resident.wing,
        house = resident.house_number,
        "Resident admitted"
    );
    Ok(Outcome::Done(resident))
}

/// Move a resident to a paid tier for six months from `today`.
pub async fn apply_upgrade(
    conn: &mut SqliteConnection,
    resident_id: &str,
    target: SubscriptionTier,
    today: NaiveDate,
) -> ServiceResult<Outcome<Resident>> {
    let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
        return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
    };

    let current = resident.subscription_tier;
    if current.is_top() {
        return Ok(Rejection::AlreadyTopTier.into());
    }
    if target == current {
        return Ok(Rejection::AlreadyOnTier(current).into());
    }
    if target < current {
        return Ok(Rejection::DowngradeNotOffered {
            from: current,
            to: target,
        }
        .into());
    }

    let valid_until = today
        .checked_add_months(Months::new(SUBSCRIPTION_MONTHS))
        .ok_or_else(|| ServiceError::Internal(format!("Subscription end overflows from {today}")))?;
    residents::update_subscription(conn, resident_id, target, today, valid_until).await?;

    info!(resident_id, from = %current, to = %target, %valid_until, "Subscription upgraded");
    let updated = residents::find_by_id(conn, resident_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Resident", "resident_id", resident_id))?;
    Ok(Outcome::Done(updated))
}

/// Change name and contact, recomputing the login. The contact and the new
/// username must stay unique among the other residents.
pub async fn apply_profile(
    conn: &mut SqliteConnection,
    resident_id: &str,
    first_name: &str,
    last_name: &str,
    contact_number: &str,
) -> ServiceResult<Outcome<Resident>> {
    let Some(mut resident) = residents::find_by_id(conn, resident_id).await? else {
        return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
    };

    let contact = validation::contact_number(contact_number)?;
    if residents::contact_exists(conn, &contact, Some(resident_id)).await? {
        return Ok(Rejection::ContactInUse(contact).into());
    }

    resident.first_name = validation::non_empty("First name", first_name)?;
    resident.last_name = validation::non_empty("Last name", last_name)?;
    resident.contact_number = contact;
    resident.refresh_credentials();
    if residents::username_exists(conn, &resident.username, Some(resident_id)).await? {
        return Ok(Rejection::UsernameTaken(resident.username).into());
    }
    residents::update_profile(conn, &resident).await?;

    info!(resident_id, "Resident profile updated");
    Ok(Outcome::Done(resident))
}

/// Delete a resident; their vehicles and parking rows go with them.
pub async fn remove(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> ServiceResult<Outcome<Resident>> {
    let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
        return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
    };

    residents::delete(conn, resident_id).await?;
    info!(resident_id, "Resident deleted");
    Ok(Outcome::Done(resident))
}

fn show_credentials(console: &mut impl Console, resident: &Resident) {
    console.say(&format!("Resident ID: {}", resident.resident_id));
    console.say(&format!("Username:    {}", resident.username));
    console.say(&format!("Password:    {}", resident.password));
}

/// Resident use cases.
///
/// Resident ids are matched exactly; typed ids go through
/// [`prompt::resident_id`] first.
#[derive(Debug, Clone)]
pub struct TenancyService {
    db: Database,
}

impl TenancyService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Admit a resident and run vehicle onboarding, all in one transaction.
    pub async fn add_resident(&self, console: &mut impl Console) -> ServiceResult<Outcome<Resident>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::add_resident_in(&mut tx, console).await;
        settle(tx, console, result).await
    }

    async fn add_resident_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
    ) -> ServiceResult<Outcome<Resident>> {
        if residents::count(conn).await? >= MAX_RESIDENTS {
            return Ok(Rejection::ApartmentFull.into());
        }

        let first_name = prompt::non_empty(console, "Enter First Name: ", "First name")?;
        let last_name = prompt::non_empty(console, "Enter Last Name: ", "Last name")?;
        let contact_number = loop {
            let contact = prompt::contact(console, "Enter Contact Number: ")?;
            if !residents::contact_exists(conn, &contact, None).await? {
                break contact;
            }
            console.say(DisplayMessages::CONTACT_IN_USE);
        };
        let wing = prompt::wing(console, "Enter Wing (A/B/C): ")?;

        let form = ResidentForm {
            first_name,
            last_name,
            contact_number,
            wing,
        };
        let resident = match admit(conn, &form).await? {
            Outcome::Done(resident) => resident,
            stopped => return Ok(stopped),
        };

        console.say(DisplayMessages::RESIDENT_ADDED);
        show_credentials(console, &resident);

        VehicleService::onboard_new_resident(conn, console, &resident.resident_id).await?;

        let stored = residents::find_by_id(conn, &resident.resident_id)
            .await?
            .ok_or_else(|| StorageError::not_found("Resident", "resident_id", &resident.resident_id))?;
        Ok(Outcome::Done(stored))
    }

    /// Edit name and contact; an empty answer keeps the current value.
    pub async fn edit_resident(
        &self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<Resident>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::edit_resident_in(&mut tx, console, resident_id).await;
        let outcome = settle(tx, console, result).await?;

        if let Outcome::Done(resident) = &outcome {
            console.say(DisplayMessages::RESIDENT_UPDATED);
            show_credentials(console, resident);
        }
        Ok(outcome)
    }

    async fn edit_resident_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<Resident>> {
        let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
            return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
        };
        console.say(&views::resident_details(&resident));

        let first_name = prompt::keep_or(console, "First Name", &resident.first_name)?;
        let last_name = prompt::keep_or(console, "Last Name", &resident.last_name)?;
        let contact_number = loop {
            let entered = prompt::keep_or(console, "Contact Number", &resident.contact_number)?;
            let Ok(contact) = validation::contact_number(&entered) else {
                console.say(DisplayMessages::INVALID_CONTACT);
                continue;
            };
            if !residents::contact_exists(conn, &contact, Some(resident_id)).await? {
                break contact;
            }
            console.say(DisplayMessages::CONTACT_IN_USE);
        };

        apply_profile(conn, resident_id, &first_name, &last_name, &contact_number).await
    }

    /// Delete a resident after a y/n confirmation.
    pub async fn delete_resident(
        &self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<Resident>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::delete_resident_in(&mut tx, console, resident_id).await;
        let outcome = settle(tx, console, result).await?;

        if outcome.is_done() {
            console.say(DisplayMessages::RESIDENT_DELETED);
        }
        Ok(outcome)
    }

    async fn delete_resident_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<Resident>> {
        let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
            return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
        };
        console.say(&views::resident_details(&resident));

        if !prompt::yes_no(
            console,
            "Deleting a resident also removes their vehicles and active parking. Continue? (y/n): ",
        )? {
            return Ok(Outcome::Cancelled);
        }

        remove(conn, resident_id).await
    }

    /// Offer Gold or Platinum and record the purchase after confirmation.
    pub async fn upgrade_subscription(
        &self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<Resident>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::upgrade_in(&mut tx, console, resident_id).await;
        let outcome = settle(tx, console, result).await?;

        if let Outcome::Done(resident) = &outcome {
            console.say(DisplayMessages::SUBSCRIPTION_UPGRADED);
            if let Some(valid_until) = resident.subscription_valid_until {
                console.say(&format!(
                    "{} plan valid until {}",
                    resident.subscription_tier,
                    valid_until.format("%Y-%m-%d")
                ));
            }
        }
        Ok(outcome)
    }

    async fn upgrade_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<Resident>> {
        let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
            return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
        };
        if resident.subscription_tier.is_top() {
            return Ok(Rejection::AlreadyTopTier.into());
        }

        console.say(&format!("Current plan: {}", resident.subscription_tier));
        for (index, tier) in SubscriptionTier::PAID.iter().enumerate() {
            let caps = tier.caps();
            console.say(&format!(
                "{}. {} - ₹{:.2} for {} months ({} 4-wheelers, {} 2-wheelers)",
                index + 1,
                tier,
                tier.price(),
                SUBSCRIPTION_MONTHS,
                caps.four_wheelers,
                caps.two_wheelers
            ));
        }
        console.say("3. Cancel");

        let target = match prompt::choice(console, "Enter choice (1-3): ", 1..=3)? {
            1 => SubscriptionTier::Gold,
            2 => SubscriptionTier::Platinum,
            _ => return Ok(Outcome::Cancelled),
        };
        if target == resident.subscription_tier {
            return Ok(Rejection::AlreadyOnTier(target).into());
        }

        if !prompt::yes_no(
            console,
            &format!("Confirm upgrade to {} for ₹{:.2}? (y/n): ", target, target.price()),
        )? {
            return Ok(Outcome::Cancelled);
        }

        apply_upgrade(conn, resident_id, target, Local::now().date_naive()).await
    }

    pub async fn search_resident(&self, resident_id: &str) -> ServiceResult<Option<Resident>> {
        let mut conn = self.db.acquire().await?;
        Ok(residents::find_by_id(&mut conn, resident_id).await?)
    }

    /// All residents, or one wing's, in id order.
    pub async fn list_residents(&self, wing: Option<Wing>) -> ServiceResult<Vec<Resident>> {
        let mut conn = self.db.acquire().await?;
        Ok(residents::list(&mut conn, wing).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use rstest::rstest;

    fn form(first: &str, contact: &str, wing: Wing) -> ResidentForm {
        ResidentForm {
            first_name: first.to_string(),
            last_name: "shah".to_string(),
            contact_number: contact.to_string(),
            wing,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_admit_derives_identity() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        let first = admit(&mut conn, &form("amit", "9876543210", Wing::A))
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(first.resident_id, "RES001");
        assert_eq!(first.house_number, 1);
        assert_eq!(first.username, "amit1");
        assert_eq!(first.password, "3210@A#1");
        assert_eq!(first.subscription_tier, SubscriptionTier::Silver);

        let second = admit(&mut conn, &form("neha", "9876500001", Wing::B))
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(second.resident_id, "RES002");
        assert_eq!(second.house_number, 1);
    }

    #[tokio::test]
    async fn test_admit_rejects_duplicate_contact() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        admit(&mut conn, &form("amit", "9876543210", Wing::A)).await.unwrap();
        let again = admit(&mut conn, &form("ravi", "9876543210", Wing::C)).await.unwrap();

        assert_eq!(
            again.rejection(),
            Some(&Rejection::ContactInUse("9876543210".into()))
        );
    }

    #[tokio::test]
    async fn test_admit_rejects_full_wing() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        for n in 0..MAX_RESIDENTS_PER_WING {
            let contact = format!("9{:09}", n);
            assert!(admit(&mut conn, &form("user", &contact, Wing::C)).await.unwrap().is_done());
        }

        let overflow = admit(&mut conn, &form("late", "8000000000", Wing::C)).await.unwrap();
        assert_eq!(overflow.rejection(), Some(&Rejection::WingFull(Wing::C)));
        assert_eq!(residents::count(&mut conn).await.unwrap(), MAX_RESIDENTS_PER_WING);
    }

    #[tokio::test]
    async fn test_admit_rejects_malformed_contact() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        let result = admit(&mut conn, &form("amit", "12345", Wing::A)).await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_readmission_after_delete_reuses_free_house() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        admit(&mut conn, &form("amit", "9000000001", Wing::A)).await.unwrap();
        admit(&mut conn, &form("neha", "9000000002", Wing::A)).await.unwrap();
        assert!(remove(&mut conn, "RES001").await.unwrap().is_done());

        let back = admit(&mut conn, &form("neha", "9000000003", Wing::A))
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(back.resident_id, "RES003");
        assert_eq!(back.house_number, 1);
        assert_eq!(back.username, "neha1");

        let next = admit(&mut conn, &form("neha", "9000000004", Wing::A))
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(next.house_number, 3);
        assert_eq!(next.username, "neha3");
    }

    #[tokio::test]
    async fn test_admit_rejects_username_held_in_another_wing() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        admit(&mut conn, &form("amit", "9000000001", Wing::A)).await.unwrap();
        let clash = admit(&mut conn, &form("Amit", "9000000002", Wing::B)).await.unwrap();

        assert_eq!(clash.rejection(), Some(&Rejection::UsernameTaken("amit1".into())));
        assert_eq!(residents::count(&mut conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_profile_edit_rejects_username_clash() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        admit(&mut conn, &form("amit", "9000000001", Wing::A)).await.unwrap();
        admit(&mut conn, &form("neha", "9000000002", Wing::B)).await.unwrap();

        let clash = apply_profile(&mut conn, "RES002", "amit", "shah", "9000000002")
            .await
            .unwrap();
        assert_eq!(clash.rejection(), Some(&Rejection::UsernameTaken("amit1".into())));

        let own = apply_profile(&mut conn, "RES001", "amit", "mehta", "9000000001")
            .await
            .unwrap();
        assert!(own.is_done());
    }

    #[rstest]
    #[case(SubscriptionTier::Gold, "2025-01-31", "2025-07-31")]
    #[case(SubscriptionTier::Platinum, "2025-08-31", "2026-02-28")]
    #[tokio::test]
    async fn test_apply_upgrade_sets_period(
        #[case] target: SubscriptionTier,
        #[case] today: &str,
        #[case] expected_end: &str,
    ) {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        admit(&mut conn, &form("amit", "9876543210", Wing::A)).await.unwrap();

        let upgraded = apply_upgrade(&mut conn, "RES001", target, date(today))
            .await
            .unwrap()
            .done()
            .unwrap();

        assert_eq!(upgraded.subscription_tier, target);
        assert_eq!(upgraded.subscription_cost, target.price());
        assert_eq!(upgraded.subscription_start_date, Some(date(today)));
        assert_eq!(upgraded.subscription_valid_until, Some(date(expected_end)));
    }

    #[tokio::test]
    async fn test_apply_upgrade_noops() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        admit(&mut conn, &form("amit", "9876543210", Wing::A)).await.unwrap();
        let today = date("2025-01-01");

        apply_upgrade(&mut conn, "RES001", SubscriptionTier::Gold, today).await.unwrap();
        let same = apply_upgrade(&mut conn, "RES001", SubscriptionTier::Gold, today).await.unwrap();
        assert_eq!(
            same.rejection(),
            Some(&Rejection::AlreadyOnTier(SubscriptionTier::Gold))
        );

        let down = apply_upgrade(&mut conn, "RES001", SubscriptionTier::Silver, today).await.unwrap();
        assert!(matches!(
            down.rejection(),
            Some(Rejection::DowngradeNotOffered { .. })
        ));

        apply_upgrade(&mut conn, "RES001", SubscriptionTier::Platinum, today).await.unwrap();
        let top = apply_upgrade(&mut conn, "RES001", SubscriptionTier::Gold, today).await.unwrap();
        assert_eq!(top.rejection(), Some(&Rejection::AlreadyTopTier));
    }

    #[tokio::test]
    async fn test_add_resident_interactive() {
        let db = Database::in_memory().await.unwrap();
        let service = TenancyService::new(db);
        let mut console = ScriptedConsole::new([
            "amit", "shah", "98765", "9876543210", "x", "a", // details with two re-prompts
            "n", "n", // no vehicles
        ]);

        let resident = service.add_resident(&mut console).await.unwrap().done().unwrap();

        assert_eq!(resident.resident_id, "RES001");
        assert_eq!(resident.wing, Wing::A);
        assert!(console.output_contains("amit1"));
        assert!(console.output_contains("3210@A#1"));
        assert_eq!(console.remaining(), 0);
    }

    #[tokio::test]
    async fn test_input_closed_rolls_back_admission() {
        let db = Database::in_memory().await.unwrap();
        let service = TenancyService::new(db);
        // Input ends during onboarding, after the resident row was written
        let mut console = ScriptedConsole::new(["amit", "shah", "9876543210", "A"]);

        let result = service.add_resident(&mut console).await;
        assert!(matches!(result, Err(ServiceError::InputClosed)));
        assert!(service.list_residents(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_blank_fields_and_recomputes_login() {
        let db = Database::in_memory().await.unwrap();
        {
            let mut conn = db.acquire().await.unwrap();
            admit(&mut conn, &form("amit", "9876543210", Wing::A)).await.unwrap();
        }
        let service = TenancyService::new(db);
        let mut console = ScriptedConsole::new(["rahul", "", "9123456789"]);

        let edited = service
            .edit_resident(&mut console, "RES001")
            .await
            .unwrap()
            .done()
            .unwrap();

        assert_eq!(edited.first_name, "rahul");
        assert_eq!(edited.last_name, "shah");
        assert_eq!(edited.username, "rahul1");
        assert_eq!(edited.password, "6789@A#1");
    }

    #[tokio::test]
    async fn test_delete_resident_confirmation() {
        let db = Database::in_memory().await.unwrap();
        {
            let mut conn = db.acquire().await.unwrap();
            admit(&mut conn, &form("amit", "9876543210", Wing::A)).await.unwrap();
        }
        let service = TenancyService::new(db);

        let mut console = ScriptedConsole::new(["n"]);
        let kept = service.delete_resident(&mut console, "RES001").await.unwrap();
        assert_eq!(kept, Outcome::Cancelled);

        let mut console = ScriptedConsole::new(["y"]);
        let gone = service.delete_resident(&mut console, "res001").await.unwrap();
        assert_eq!(gone.rejection(), Some(&Rejection::ResidentNotFound("res001".into())));

        let mut console = ScriptedConsole::new(["y"]);
        assert!(service.delete_resident(&mut console, "RES001").await.unwrap().is_done());
        assert!(service.search_resident("RES001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upgrade_interactive_cancel_and_confirm() {
        let db = Database::in_memory().await.unwrap();
        {
            let mut conn = db.acquire().await.unwrap();
            admit(&mut conn, &form("amit", "9876543210", Wing::A)).await.unwrap();
        }
        let service = TenancyService::new(db);

        let mut console = ScriptedConsole::new(["1", "n"]);
        assert_eq!(
            service.upgrade_subscription(&mut console, "RES001").await.unwrap(),
            Outcome::Cancelled
        );

        let mut console = ScriptedConsole::new(["1", "y"]);
        let upgraded = service
            .upgrade_subscription(&mut console, "RES001")
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(upgraded.subscription_tier, SubscriptionTier::Gold);
        assert!(console.output_contains("₹1800.00"));
    }
}
