//! Vehicle registration, removal and listings.
//!
//! Every registration goes through the subscription cap check: a tier allows
//! a fixed number of 4-wheelers and 2-wheelers, and a registration that
//! would exceed it is rejected without writing anything.

use crate::console::Console;
use crate::error::{Outcome, Rejection, ServiceResult};
use crate::messages::DisplayMessages;
use crate::prompt;
use crate::unit_of_work::settle;
use aptpark_core::{SubscriptionTier, VehicleType, validation};
use aptpark_storage::repositories::{history, parking, residents, vehicles};
use aptpark_storage::{
    Database, NewParkingRecord, Resident, Vehicle, VehicleStatus, VehicleWithOwner, transaction,
};
use sqlx::SqliteConnection;
use tracing::info;

/// Who is driving an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Admin,
    /// A logged-in resident, by id
    Resident(String),
}

impl Actor {
    /// Possessive used in prompts and notices.
    pub fn possessive(&self) -> &'static str {
        match self {
            Actor::Admin => "the resident's",
            Actor::Resident(_) => "your",
        }
    }

    /// Resident whose vehicles this actor may touch, `None` for any.
    fn scope(&self) -> Option<&str> {
        match self {
            Actor::Admin => None,
            Actor::Resident(resident_id) => Some(resident_id),
        }
    }
}

/// Details of a vehicle about to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub vehicle_number: String,
    pub vehicle_type: VehicleType,
    pub vehicle_brand: String,
}

/// Where a resident stands against the cap for one vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapCheck {
    pub tier: SubscriptionTier,
    pub vehicle_type: VehicleType,
    pub registered: i64,
    pub cap: i64,
}

impl CapCheck {
    /// Whether one more vehicle of this type fits.
    pub fn allows(&self) -> bool {
        self.registered < self.cap
    }

    fn rejection(&self) -> Rejection {
        Rejection::VehicleCapReached {
            tier: self.tier,
            vehicle_type: self.vehicle_type,
            cap: self.cap,
        }
    }
}

/// Compare a resident's registrations of one type against their tier.
///
/// Read-only; repeated calls without a mutation in between agree.
pub async fn cap_check(
    conn: &mut SqliteConnection,
    resident: &Resident,
    vehicle_type: VehicleType,
) -> ServiceResult<CapCheck> {
    let (four_wheelers, two_wheelers) =
        vehicles::resident_vehicle_counts(conn, &resident.resident_id).await?;
    let registered = match vehicle_type {
        VehicleType::FourWheeler => four_wheelers,
        VehicleType::TwoWheeler => two_wheelers,
    };

    Ok(CapCheck {
        tier: resident.subscription_tier,
        vehicle_type,
        registered,
        cap: resident.caps().for_type(vehicle_type),
    })
}

/// Register a resident-owned vehicle and bump the owner's vehicle count.
pub async fn register(
    conn: &mut SqliteConnection,
    resident_id: &str,
    new_vehicle: &NewVehicle,
) -> ServiceResult<Outcome<Vehicle>> {
    let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
        return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
    };

    let number = validation::vehicle_number(&new_vehicle.vehicle_number)?;
    let brand = validation::non_empty("Vehicle brand", &new_vehicle.vehicle_brand)?;

    if vehicles::exists(conn, &number).await? {
        return Ok(Rejection::VehicleAlreadyRegistered(number).into());
    }

    let check = cap_check(conn, &resident, new_vehicle.vehicle_type).await?;
    if !check.allows() {
        return Ok(check.rejection().into());
    }

    let vehicle = Vehicle::resident_owned(&number, resident_id, new_vehicle.vehicle_type, &brand);
    vehicles::insert(conn, &vehicle).await?;
    residents::adjust_vehicle_count(conn, resident_id, 1).await?;

    info!(
        vehicle = %vehicle.vehicle_number,
        resident_id,
        vehicle_type = %vehicle.vehicle_type,
        "Vehicle registered"
    );
    Ok(Outcome::Done(vehicle))
}

/// Remove a vehicle, closing its parking session first if it holds a slot.
///
/// With `scope` set, only that resident's vehicles may be removed. The
/// archived row of a session cut short this way has no `time_in`.
pub async fn deregister(
    conn: &mut SqliteConnection,
    vehicle_number: &str,
    scope: Option<&str>,
) -> ServiceResult<Outcome<Vehicle>> {
    let Some(vehicle) = vehicles::find(conn, vehicle_number).await? else {
        return Ok(Rejection::VehicleNotFound(vehicle_number.to_string()).into());
    };
    if scope.is_some_and(|owner| owner != vehicle.resident_id) {
        return Ok(Rejection::NotOwner(vehicle_number.to_string()).into());
    }

    if let Some(parked) = parking::find_by_vehicle(conn, vehicle_number).await? {
        history::archive(
            conn,
            &NewParkingRecord {
                slot_id: parked.slot_id,
                vehicle_number: vehicle.vehicle_number.clone(),
                resident_id: Some(vehicle.resident_id.clone()),
                vehicle_brand: vehicle.vehicle_brand.clone(),
                vehicle_type: vehicle.vehicle_type,
                time_in: None,
            },
        )
        .await?;
        parking::release(conn, parked.area(), vehicle_number).await?;
    }

    vehicles::delete(conn, vehicle_number).await?;
    if !vehicle.is_guest() {
        residents::adjust_vehicle_count(conn, &vehicle.resident_id, -1).await?;
    }

    info!(vehicle = %vehicle_number, resident_id = %vehicle.resident_id, "Vehicle deleted");
    Ok(Outcome::Done(vehicle))
}

/// Read a registration number that is not yet taken.
pub(crate) async fn unregistered_number(
    conn: &mut SqliteConnection,
    console: &mut impl Console,
    prompt_text: &str,
) -> ServiceResult<String> {
    loop {
        let number = prompt::vehicle_number(console, prompt_text)?;
        if !vehicles::exists(conn, &number).await? {
            return Ok(number);
        }
        console.say(DisplayMessages::VEHICLE_EXISTS);
    }
}

/// Vehicle use cases on top of the repositories.
#[derive(Debug, Clone)]
pub struct VehicleService {
    db: Database,
}

impl VehicleService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register one more vehicle for a resident, within their tier's caps.
    pub async fn add_vehicle_for_resident(
        &self,
        console: &mut impl Console,
        resident_id: &str,
        actor: &Actor,
    ) -> ServiceResult<Outcome<Vehicle>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::add_vehicle_in(&mut tx, console, resident_id, actor).await;
        let outcome = settle(tx, console, result).await?;

        if let Outcome::Done(vehicle) = &outcome {
            console.say(&format!(
                "Vehicle {} added to {} account.",
                vehicle.vehicle_number,
                actor.possessive()
            ));
        }
        Ok(outcome)
    }

    async fn add_vehicle_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
        actor: &Actor,
    ) -> ServiceResult<Outcome<Vehicle>> {
        let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
            return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
        };

        let (four_wheelers, two_wheelers) =
            vehicles::resident_vehicle_counts(conn, resident_id).await?;
        let caps = resident.caps();
        console.say(&format!(
            "Current {} plan: {} (4-wheelers {}/{}, 2-wheelers {}/{})",
            actor.possessive(),
            resident.subscription_tier,
            four_wheelers,
            caps.four_wheelers,
            two_wheelers,
            caps.two_wheelers
        ));

        let vehicle_type = prompt::vehicle_type(console)?;
        let check = cap_check(conn, &resident, vehicle_type).await?;
        if !check.allows() {
            return Ok(check.rejection().into());
        }

        let vehicle_number =
            unregistered_number(conn, console, "Enter Vehicle Number (e.g. GJ01AB1234): ").await?;
        let vehicle_brand = prompt::non_empty(console, "Enter Vehicle Brand: ", "Vehicle brand")?;

        register(
            conn,
            resident_id,
            &NewVehicle {
                vehicle_number,
                vehicle_type,
                vehicle_brand,
            },
        )
        .await
    }

    /// Offer a freshly admitted resident up to one 4-wheeler and two
    /// 2-wheelers, inside the admission transaction.
    pub async fn onboard_new_resident(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Vec<Vehicle>> {
        let mut added = Vec::new();

        if prompt::yes_no(console, "Does the resident own a 4-wheeler? (y/n): ")? {
            if let Some(vehicle) =
                Self::onboard_one(conn, console, resident_id, VehicleType::FourWheeler).await?
            {
                added.push(vehicle);
            }
        }

        for offer in 0..2 {
            let question = if offer == 0 {
                "Does the resident own a 2-wheeler? (y/n): "
            } else {
                "Add another 2-wheeler? (y/n): "
            };
            if !prompt::yes_no(console, question)? {
                break;
            }
            if let Some(vehicle) =
                Self::onboard_one(conn, console, resident_id, VehicleType::TwoWheeler).await?
            {
                added.push(vehicle);
            }
        }

        Ok(added)
    }

    async fn onboard_one(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
        vehicle_type: VehicleType,
    ) -> ServiceResult<Option<Vehicle>> {
        let vehicle_number = unregistered_number(
            conn,
            console,
            &format!("Enter {vehicle_type} Number (e.g. GJ01AB1234): "),
        )
        .await?;
        let vehicle_brand = prompt::non_empty(
            console,
            &format!("Enter {vehicle_type} Brand: "),
            "Vehicle brand",
        )?;

        let outcome = register(
            conn,
            resident_id,
            &NewVehicle {
                vehicle_number,
                vehicle_type,
                vehicle_brand,
            },
        )
        .await?;

        match outcome {
            Outcome::Done(vehicle) => {
                console.say(&format!("{vehicle_type} {} registered.", vehicle.vehicle_number));
                Ok(Some(vehicle))
            }
            Outcome::Rejected(rejection) => {
                console.say(&rejection.to_string());
                Ok(None)
            }
            Outcome::Cancelled => Ok(None),
        }
    }

    /// Delete a vehicle after confirmation. Residents may only delete their own.
    pub async fn delete_vehicle(
        &self,
        console: &mut impl Console,
        actor: &Actor,
    ) -> ServiceResult<Outcome<Vehicle>> {
        let vehicle_number = prompt::vehicle_number(console, "Enter Vehicle Number to delete: ")?;

        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::delete_vehicle_in(&mut tx, console, &vehicle_number, actor).await;
        let outcome = settle(tx, console, result).await?;

        if outcome.is_done() {
            console.say(DisplayMessages::VEHICLE_DELETED);
        }
        Ok(outcome)
    }

    async fn delete_vehicle_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        vehicle_number: &str,
        actor: &Actor,
    ) -> ServiceResult<Outcome<Vehicle>> {
        let Some(found) = vehicles::find_with_owner(conn, vehicle_number).await? else {
            return Ok(Rejection::VehicleNotFound(vehicle_number.to_string()).into());
        };
        if actor
            .scope()
            .is_some_and(|owner| owner != found.vehicle.resident_id)
        {
            return Ok(Rejection::NotOwner(vehicle_number.to_string()).into());
        }

        console.say(&format!(
            "Vehicle {} ({}, {}) owned by {}",
            found.vehicle.vehicle_number,
            found.vehicle.vehicle_brand,
            found.vehicle.vehicle_type,
            found.owner_name
        ));
        if let Some(parked) = parking::find_by_vehicle(conn, vehicle_number).await? {
            console.say(&format!(
                "This vehicle is parked in slot {} and will be removed from it.",
                parked.slot_id
            ));
        }

        if !prompt::yes_no(console, "Are you sure you want to delete this vehicle? (y/n): ")? {
            return Ok(Outcome::Cancelled);
        }

        deregister(conn, vehicle_number, actor.scope()).await
    }

    /// The resident's vehicles with where each one is parked.
    pub async fn list_for_resident(&self, resident_id: &str) -> ServiceResult<Vec<VehicleStatus>> {
        let mut conn = self.db.acquire().await?;
        Ok(vehicles::statuses_for_resident(&mut conn, resident_id).await?)
    }

    pub async fn search_vehicle(&self, vehicle_number: &str) -> ServiceResult<Option<VehicleWithOwner>> {
        let number = vehicle_number.trim().to_ascii_uppercase();
        let mut conn = self.db.acquire().await?;
        Ok(vehicles::find_with_owner(&mut conn, &number).await?)
    }

    /// Every registered vehicle, sorted by an allow-listed column.
    pub async fn list_all(&self, sort_by: &str) -> ServiceResult<Vec<Vehicle>> {
        let mut conn = self.db.acquire().await?;
        Ok(vehicles::list_all(&mut conn, sort_by).await?)
    }
}
