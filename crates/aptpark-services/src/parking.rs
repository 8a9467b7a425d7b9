//! Slot allocation, release and the parking views.
//!
//! Resident vehicles park in slots 1..=1200, each wing holding at most 400 of
//! them at once. Guests park in the spare slots 1201..=1350 and wait in the
//! [`GuestWaitList`] when those are full. Releasing a slot archives the
//! session in the history table, whose schema computes the hours and the
//! guest charge.

use crate::console::Console;
use crate::error::{Outcome, Rejection, ServiceError, ServiceResult};
use crate::messages::DisplayMessages;
use crate::prompt;
use crate::report;
use crate::unit_of_work::{announce, settle};
use crate::vehicles::{NewVehicle, unregistered_number};
use crate::views;
use crate::waitlist::{Enqueued, GuestWaitList};
use aptpark_core::constants::{CANCEL_SLOT, SPARE_PARKING_CAPACITY, WING_PARKING_CAPACITY};
use aptpark_core::{ParkingArea, Wing, validation};
use aptpark_storage::repositories::{
    HistoryFilter, ParkedFilter, history, parking, residents, vehicles,
};
use aptpark_storage::{
    ActiveParking, Database, HistoryEntry, NewParkingRecord, NewWaitlistEntry, ParkedSlot,
    ParkedVehicleView, ParkingRecord, Vehicle, WaitlistEntry, transaction,
};
use sqlx::SqliteConnection;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Occupancy of one wing's share of resident parking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WingOccupancy {
    pub wing: Wing,
    pub occupied: i64,
}

impl WingOccupancy {
    pub fn remaining(&self) -> i64 {
        (WING_PARKING_CAPACITY - self.occupied).max(0)
    }
}

/// Snapshot of both parking areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub wings: Vec<WingOccupancy>,
    pub guest_occupied: i64,
}

impl Availability {
    pub fn guest_remaining(&self) -> i64 {
        (SPARE_PARKING_CAPACITY - self.guest_occupied).max(0)
    }
}

/// Park one of the resident's own vehicles in a resident slot.
///
/// The slot and the wing's occupancy are checked here, right before the
/// insert, within the caller's transaction.
pub async fn park_in_slot(
    conn: &mut SqliteConnection,
    resident_id: &str,
    vehicle_number: &str,
    slot_id: i64,
) -> ServiceResult<Outcome<ParkedSlot>> {
    let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
        return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
    };
    let Some(vehicle) = vehicles::find(conn, vehicle_number).await? else {
        return Ok(Rejection::VehicleNotFound(vehicle_number.to_string()).into());
    };
    if vehicle.resident_id != resident_id || vehicle.is_guest() {
        return Ok(Rejection::NotOwner(vehicle_number.to_string()).into());
    }
    if parking::find_by_vehicle(conn, vehicle_number).await?.is_some() {
        return Ok(Rejection::VehicleAlreadyParked(vehicle_number.to_string()).into());
    }
    if ParkingArea::for_slot(slot_id) != Some(ParkingArea::Resident) {
        return Ok(Rejection::SlotOutOfRange {
            slot: slot_id,
            area: ParkingArea::Resident,
        }
        .into());
    }
    if !parking::slot_state(conn, slot_id).await?.is_free() {
        return Ok(Rejection::SlotOccupied(slot_id).into());
    }
    if parking::occupied_in_wing(conn, resident.wing).await? >= WING_PARKING_CAPACITY {
        return Ok(Rejection::WingParkingFull(resident.wing).into());
    }

    let parked = parking::occupy(conn, ParkingArea::Resident, slot_id, vehicle_number).await?;
    info!(vehicle = %vehicle_number, slot = slot_id, resident_id, "Vehicle parked");
    Ok(Outcome::Done(parked))
}

/// Register a guest vehicle under its host and park it in a spare slot.
pub async fn park_guest_in_slot(
    conn: &mut SqliteConnection,
    resident_id: &str,
    guest: &NewVehicle,
    slot_id: i64,
) -> ServiceResult<Outcome<ParkedSlot>> {
    if !residents::exists(conn, resident_id).await? {
        return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
    }
    if parking::occupied_spare(conn).await? >= SPARE_PARKING_CAPACITY {
        return Ok(Rejection::GuestParkingFull.into());
    }

    let number = validation::vehicle_number(&guest.vehicle_number)?;
    let brand = validation::non_empty("Vehicle brand", &guest.vehicle_brand)?;
    if vehicles::exists(conn, &number).await? {
        return Ok(Rejection::VehicleAlreadyRegistered(number).into());
    }
    if ParkingArea::for_slot(slot_id) != Some(ParkingArea::Guest) {
        return Ok(Rejection::SlotOutOfRange {
            slot: slot_id,
            area: ParkingArea::Guest,
        }
        .into());
    }
    if !parking::slot_state(conn, slot_id).await?.is_free() {
        return Ok(Rejection::SlotOccupied(slot_id).into());
    }

    vehicles::insert(
        conn,
        &Vehicle::guest(&number, resident_id, guest.vehicle_type, &brand),
    )
    .await?;
    let parked = parking::occupy(conn, ParkingArea::Guest, slot_id, &number).await?;

    info!(vehicle = %number, slot = slot_id, host = resident_id, "Guest vehicle parked");
    Ok(Outcome::Done(parked))
}

/// End a parking session of one of the resident's vehicles.
///
/// The session is archived with its original `time_in` before the slot is
/// freed; a guest vehicle's registration ends with its session.
pub async fn release(
    conn: &mut SqliteConnection,
    resident_id: &str,
    vehicle_number: &str,
) -> ServiceResult<Outcome<ParkingRecord>> {
    let Some(vehicle) = vehicles::find(conn, vehicle_number).await? else {
        return Ok(Rejection::VehicleNotFound(vehicle_number.to_string()).into());
    };
    if vehicle.resident_id != resident_id {
        return Ok(Rejection::NotOwner(vehicle_number.to_string()).into());
    }
    let Some(parked) = parking::find_by_vehicle(conn, vehicle_number).await? else {
        return Ok(Rejection::VehicleNotParked(vehicle_number.to_string()).into());
    };

    let record = history::archive(
        conn,
        &NewParkingRecord {
            slot_id: parked.slot_id,
            vehicle_number: vehicle.vehicle_number.clone(),
            resident_id: Some(resident_id.to_string()),
            vehicle_brand: vehicle.vehicle_brand.clone(),
            vehicle_type: vehicle.vehicle_type,
            time_in: Some(parked.time_in),
        },
    )
    .await?;
    parking::release(conn, parked.area(), vehicle_number).await?;

    if vehicle.is_guest() {
        vehicles::delete(conn, vehicle_number).await?;
    }

    info!(
        vehicle = %vehicle_number,
        slot = parked.slot_id,
        hours = record.total_hours,
        charge = record.charge_amount,
        "Vehicle removed from slot"
    );
    Ok(Outcome::Done(record))
}

/// Ask for a free slot in `area`; `None` when the operator enters 0.
async fn pick_free_slot(
    conn: &mut SqliteConnection,
    console: &mut impl Console,
    area: ParkingArea,
) -> ServiceResult<Option<i64>> {
    let range = area.slots();
    let question = format!(
        "Enter slot number ({}-{}, {} to cancel): ",
        range.start(),
        range.end(),
        CANCEL_SLOT
    );

    loop {
        let slot = prompt::integer(console, &question)?;
        if slot == CANCEL_SLOT {
            return Ok(None);
        }
        if !range.contains(&slot) {
            console.say(&Rejection::SlotOutOfRange { slot, area }.to_string());
            continue;
        }
        if parking::slot_state(conn, slot).await?.is_free() {
            return Ok(Some(slot));
        }
        console.say(DisplayMessages::SLOT_OCCUPIED);
    }
}

/// Parking use cases, owning the guest waiting list.
#[derive(Debug)]
pub struct ParkingService {
    db: Database,
    waitlist: GuestWaitList,
}

impl ParkingService {
    /// Build the service, rebuilding the waiting list from the store.
    pub async fn new(db: Database, waitlist_capacity: usize) -> ServiceResult<Self> {
        let waitlist = GuestWaitList::load(db.clone(), waitlist_capacity).await?;
        Ok(Self { db, waitlist })
    }

    pub fn waitlist(&self) -> &GuestWaitList {
        &self.waitlist
    }

    /// Pick an unparked vehicle and a free resident slot for it.
    pub async fn park_resident_vehicle(
        &self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<ParkedSlot>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::park_resident_in(&mut tx, console, resident_id).await;
        let outcome = settle(tx, console, result).await?;

        if let Outcome::Done(parked) = &outcome {
            console.say(&format!(
                "Vehicle {} parked in slot {}.",
                parked.vehicle_number, parked.slot_id
            ));
        }
        Ok(outcome)
    }

    async fn park_resident_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<ParkedSlot>> {
        let Some(resident) = residents::find_by_id(conn, resident_id).await? else {
            return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
        };
        if parking::occupied_in_wing(conn, resident.wing).await? >= WING_PARKING_CAPACITY {
            return Ok(Rejection::WingParkingFull(resident.wing).into());
        }

        let unparked = vehicles::unparked_for_resident(conn, resident_id).await?;
        if unparked.is_empty() {
            return Ok(Rejection::NoVehiclesToPark.into());
        }

        console.say("Vehicles available to park:");
        for (index, vehicle) in unparked.iter().enumerate() {
            console.say(&format!(
                "{}. {} ({}, {})",
                index + 1,
                vehicle.vehicle_number,
                vehicle.vehicle_brand,
                vehicle.vehicle_type
            ));
        }
        let picked = prompt::choice(
            console,
            &format!("Select vehicle (1-{}, 0 to cancel): ", unparked.len()),
            0..=unparked.len() as i64,
        )?;
        let Some(vehicle) = usize::try_from(picked - 1).ok().and_then(|i| unparked.get(i)) else {
            return Ok(Outcome::Cancelled);
        };

        let Some(slot_id) = pick_free_slot(conn, console, ParkingArea::Resident).await? else {
            return Ok(Outcome::Cancelled);
        };

        park_in_slot(conn, resident_id, &vehicle.vehicle_number, slot_id).await
    }

    /// Park a visitor's vehicle in a spare slot, offering the waiting list
    /// when spare parking is full.
    pub async fn park_guest_vehicle(
        &mut self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<ParkedSlot>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::park_guest_in(&mut tx, console, resident_id).await;
        let outcome = settle(tx, console, result).await?;

        match &outcome {
            Outcome::Done(parked) => console.say(&format!(
                "Guest vehicle {} parked in slot {}.",
                parked.vehicle_number, parked.slot_id
            )),
            Outcome::Rejected(Rejection::GuestParkingFull) => {
                self.offer_waitlist(console, resident_id).await?;
            }
            _ => {}
        }
        Ok(outcome)
    }

    async fn park_guest_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<ParkedSlot>> {
        if !residents::exists(conn, resident_id).await? {
            return Ok(Rejection::ResidentNotFound(resident_id.to_string()).into());
        }
        let occupied = parking::occupied_spare(conn).await?;
        if occupied >= SPARE_PARKING_CAPACITY {
            return Ok(Rejection::GuestParkingFull.into());
        }
        console.say(&format!(
            "Guest slots available: {}",
            SPARE_PARKING_CAPACITY - occupied
        ));

        let vehicle_number =
            unregistered_number(conn, console, "Enter Guest Vehicle Number: ").await?;
        let vehicle_type = prompt::vehicle_type(console)?;
        let vehicle_brand = prompt::non_empty(console, "Enter Vehicle Brand: ", "Vehicle brand")?;

        let Some(slot_id) = pick_free_slot(conn, console, ParkingArea::Guest).await? else {
            return Ok(Outcome::Cancelled);
        };

        park_guest_in_slot(
            conn,
            resident_id,
            &NewVehicle {
                vehicle_number,
                vehicle_type,
                vehicle_brand,
            },
            slot_id,
        )
        .await
    }

    async fn offer_waitlist(
        &mut self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<()> {
        if self.waitlist.is_full() {
            console.say(&Rejection::WaitlistFull.to_string());
            return Ok(());
        }
        if !prompt::yes_no(console, "Add the guest vehicle to the waiting list? (y/n): ")? {
            return Ok(());
        }

        let vehicle_number = prompt::vehicle_number(console, "Enter Guest Vehicle Number: ")?;
        let vehicle_type = prompt::vehicle_type(console)?;
        let vehicle_brand = prompt::non_empty(console, "Enter Vehicle Brand: ", "Vehicle brand")?;

        let entry = NewWaitlistEntry {
            resident_id: resident_id.to_string(),
            vehicle_number,
            vehicle_brand,
            vehicle_type,
        };
        match self.enqueue_guest(&entry).await? {
            Outcome::Done(stored) => {
                console.say(DisplayMessages::GUEST_WAITLISTED);
                console.say(&format!(
                    "Waiting list ID: {} (position {})",
                    stored.waitlist_id,
                    self.waitlist.len()
                ));
            }
            other => announce(console, &other),
        }
        Ok(())
    }

    /// Put a guest vehicle at the back of the waiting list.
    ///
    /// A vehicle that is already registered, or already waiting, could never
    /// be parked from the list and is turned away.
    pub async fn enqueue_guest(
        &mut self,
        entry: &NewWaitlistEntry,
    ) -> ServiceResult<Outcome<WaitlistEntry>> {
        let number = validation::vehicle_number(&entry.vehicle_number)?;
        if self.waitlist.contains(&number) {
            return Ok(Rejection::AlreadyWaiting(number).into());
        }
        {
            let mut conn = self.db.acquire().await?;
            if !residents::exists(&mut conn, &entry.resident_id).await? {
                return Ok(Rejection::ResidentNotFound(entry.resident_id.clone()).into());
            }
            if vehicles::exists(&mut conn, &number).await? {
                return Ok(Rejection::VehicleAlreadyRegistered(number).into());
            }
        }

        let entry = NewWaitlistEntry {
            vehicle_number: number,
            ..entry.clone()
        };
        match self.waitlist.enqueue(&entry).await? {
            Enqueued::Added(stored) => Ok(Outcome::Done(stored)),
            Enqueued::Full => Ok(Rejection::WaitlistFull.into()),
        }
    }

    /// Park the front of the waiting list in a chosen spare slot.
    ///
    /// The entry leaves the queue only once a slot has been chosen. An entry
    /// that can never be parked (host gone, vehicle registered meanwhile,
    /// malformed details) is dropped; any other failure queues it again at
    /// the back.
    pub async fn admit_next_waiting_guest(
        &mut self,
        console: &mut impl Console,
    ) -> ServiceResult<Outcome<ParkedSlot>> {
        let Some(front) = self.waitlist.peek().cloned() else {
            let outcome: Outcome<ParkedSlot> = Rejection::WaitlistEmpty.into();
            announce(console, &outcome);
            return Ok(outcome);
        };
        console.say(&format!(
            "Next in line: {} ({}, {}) for {} waiting since {}",
            front.vehicle_number,
            front.vehicle_brand,
            front.vehicle_type,
            front.resident_id,
            front.time_added.format("%Y-%m-%d %H:%M:%S")
        ));

        let slot = {
            let mut conn = self.db.acquire().await?;
            if parking::occupied_spare(&mut conn).await? >= SPARE_PARKING_CAPACITY {
                None
            } else {
                Some(pick_free_slot(&mut conn, console, ParkingArea::Guest).await?)
            }
        };
        let slot_id = match slot {
            None => {
                let outcome: Outcome<ParkedSlot> = Rejection::GuestParkingFull.into();
                announce(console, &outcome);
                return Ok(outcome);
            }
            Some(None) => {
                announce::<ParkedSlot>(console, &Outcome::Cancelled);
                return Ok(Outcome::Cancelled);
            }
            Some(Some(slot_id)) => slot_id,
        };

        let Some(entry) = self.waitlist.dequeue().await? else {
            let outcome: Outcome<ParkedSlot> = Rejection::WaitlistEmpty.into();
            announce(console, &outcome);
            return Ok(outcome);
        };

        let guest = NewVehicle {
            vehicle_number: entry.vehicle_number.clone(),
            vehicle_type: entry.vehicle_type,
            vehicle_brand: entry.vehicle_brand.clone(),
        };
        let mut tx = transaction::begin(&self.db).await?;
        let result = park_guest_in_slot(&mut tx, &entry.resident_id, &guest, slot_id).await;
        let outcome = settle(tx, console, result).await;

        if let Ok(Outcome::Done(parked)) = &outcome {
            console.say(&format!(
                "Guest vehicle {} parked in slot {}.",
                parked.vehicle_number, parked.slot_id
            ));
            return outcome;
        }
        let unparkable = match &outcome {
            Ok(Outcome::Rejected(Rejection::ResidentNotFound(_))) => Some("its host no longer exists"),
            Ok(Outcome::Rejected(Rejection::VehicleAlreadyRegistered(_))) => {
                Some("it is already registered")
            }
            Err(ServiceError::Invalid(_)) => Some("its details are invalid"),
            _ => None,
        };
        if let Some(reason) = unparkable {
            warn!(vehicle = %entry.vehicle_number, host = %entry.resident_id, reason, "Dropping waiting guest");
            console.say(&format!(
                "Vehicle {} was removed from the waiting list; {reason}.",
                entry.vehicle_number
            ));
            return outcome;
        }

        let requeue = NewWaitlistEntry {
            resident_id: entry.resident_id,
            vehicle_number: entry.vehicle_number,
            vehicle_brand: entry.vehicle_brand,
            vehicle_type: entry.vehicle_type,
        };
        match self.waitlist.enqueue(&requeue).await? {
            Enqueued::Added(_) => console.say(&format!(
                "Vehicle {} was returned to the back of the waiting list.",
                requeue.vehicle_number
            )),
            Enqueued::Full => {
                warn!(vehicle = %requeue.vehicle_number, "Could not return guest to waiting list");
                console.warn(&format!(
                    "Vehicle {} could not be returned to the waiting list.",
                    requeue.vehicle_number
                ));
            }
        }
        outcome
    }

    /// Show the resident's parked vehicles and free the chosen slot.
    pub async fn remove_parked_vehicle(
        &self,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<ParkingRecord>> {
        let mut tx = transaction::begin(&self.db).await?;
        let result = Self::remove_parked_in(&mut tx, console, resident_id).await;
        let outcome = settle(tx, console, result).await?;

        if let Outcome::Done(record) = &outcome {
            console.say(&format!(
                "Vehicle {} removed from slot {}.",
                record.vehicle_number, record.slot_id
            ));
            if record.charge_amount > 0.0 {
                console.say(&format!(
                    "Parking charge for guest vehicle {}: ₹{:.2} ({:.2} hours)",
                    record.vehicle_number, record.charge_amount, record.total_hours
                ));
            }
        }
        Ok(outcome)
    }

    async fn remove_parked_in(
        conn: &mut SqliteConnection,
        console: &mut impl Console,
        resident_id: &str,
    ) -> ServiceResult<Outcome<ParkingRecord>> {
        let active = parking::active_for_resident(conn, resident_id).await?;
        if active.is_empty() {
            return Ok(Rejection::NothingParked.into());
        }

        console.say(&views::active_parking_table(&active));
        let picked = prompt::choice(
            console,
            &format!("Select vehicle to remove (1-{}, 0 to cancel): ", active.len()),
            0..=active.len() as i64,
        )?;
        let Some(session) = usize::try_from(picked - 1).ok().and_then(|i| active.get(i)) else {
            return Ok(Outcome::Cancelled);
        };

        release(conn, resident_id, &session.vehicle_number).await
    }

    pub async fn occupied_in_wing(&self, wing: Wing) -> ServiceResult<i64> {
        let mut conn = self.db.acquire().await?;
        Ok(parking::occupied_in_wing(&mut conn, wing).await?)
    }

    pub async fn occupied_spare(&self) -> ServiceResult<i64> {
        let mut conn = self.db.acquire().await?;
        Ok(parking::occupied_spare(&mut conn).await?)
    }

    pub async fn availability(&self) -> ServiceResult<Availability> {
        let mut conn = self.db.acquire().await?;
        let mut wings = Vec::with_capacity(Wing::ALL.len());
        for wing in Wing::ALL {
            wings.push(WingOccupancy {
                wing,
                occupied: parking::occupied_in_wing(&mut conn, wing).await?,
            });
        }

        Ok(Availability {
            wings,
            guest_occupied: parking::occupied_spare(&mut conn).await?,
        })
    }

    /// Unoccupied slot numbers of an area, ascending.
    pub async fn free_slots(&self, area: ParkingArea) -> ServiceResult<Vec<i64>> {
        let mut conn = self.db.acquire().await?;
        let taken = parking::occupied_slots(&mut conn, area).await?;
        Ok(area
            .slots()
            .filter(|slot| taken.binary_search(slot).is_err())
            .collect())
    }

    pub async fn parked_vehicles(&self, filter: ParkedFilter) -> ServiceResult<Vec<ParkedVehicleView>> {
        let mut conn = self.db.acquire().await?;
        Ok(parking::list_parked(&mut conn, filter).await?)
    }

    /// Sessions currently open for the resident's vehicles, guests included.
    pub async fn my_parked(&self, resident_id: &str) -> ServiceResult<Vec<ActiveParking>> {
        let mut conn = self.db.acquire().await?;
        Ok(parking::active_for_resident(&mut conn, resident_id).await?)
    }

    pub async fn history(&self, filter: &HistoryFilter) -> ServiceResult<Vec<HistoryEntry>> {
        let mut conn = self.db.acquire().await?;
        Ok(history::list(&mut conn, filter).await?)
    }

    pub fn waiting_guests(&self) -> Vec<WaitlistEntry> {
        self.waitlist.snapshot()
    }

    /// Write the full parking history to `path` and return its absolute path.
    pub async fn write_history_report(&self, path: &Path) -> ServiceResult<PathBuf> {
        let entries = self.history(&HistoryFilter::default()).await?;
        report::write_history_report(&entries, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::tenancy::{ResidentForm, admit};
    use crate::vehicles::register;
    use aptpark_core::VehicleType;

    async fn setup() -> Database {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        admit(
            &mut conn,
            &ResidentForm {
                first_name: "amit".into(),
                last_name: "shah".into(),
                contact_number: "9876543210".into(),
                wing: Wing::A,
            },
        )
        .await
        .unwrap();
        register(
            &mut conn,
            "RES001",
            &NewVehicle {
                vehicle_number: "GJ01AB1234".into(),
                vehicle_type: VehicleType::FourWheeler,
                vehicle_brand: "Honda".into(),
            },
        )
        .await
        .unwrap();
        db
    }

    fn guest(number: &str) -> NewVehicle {
        NewVehicle {
            vehicle_number: number.into(),
            vehicle_type: VehicleType::FourWheeler,
            vehicle_brand: "Kia".into(),
        }
    }

    #[tokio::test]
    async fn test_park_in_slot_rejections() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();

        let out_of_range = park_in_slot(&mut conn, "RES001", "GJ01AB1234", 1201).await.unwrap();
        assert!(matches!(
            out_of_range.rejection(),
            Some(Rejection::SlotOutOfRange { slot: 1201, .. })
        ));

        let foreign = park_in_slot(&mut conn, "RES002", "GJ01AB1234", 5).await.unwrap();
        assert_eq!(
            foreign.rejection(),
            Some(&Rejection::ResidentNotFound("RES002".into()))
        );

        let parked = park_in_slot(&mut conn, "RES001", "GJ01AB1234", 5).await.unwrap();
        assert_eq!(parked.done().unwrap().slot_id, 5);

        let again = park_in_slot(&mut conn, "RES001", "GJ01AB1234", 6).await.unwrap();
        assert_eq!(
            again.rejection(),
            Some(&Rejection::VehicleAlreadyParked("GJ01AB1234".into()))
        );
    }

    #[tokio::test]
    async fn test_guest_session_lifecycle() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();

        let parked = park_guest_in_slot(&mut conn, "RES001", &guest("MH12CD0001"), 1201)
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(parked.area(), ParkingArea::Guest);

        let resident = residents::find_by_id(&mut conn, "RES001").await.unwrap().unwrap();
        assert_eq!(resident.vehicle_count, 1);

        let record = release(&mut conn, "RES001", "MH12CD0001").await.unwrap().done().unwrap();
        assert_eq!(record.slot_id, 1201);
        assert_eq!(record.charge_amount, 20.0);
        assert!(!vehicles::exists(&mut conn, "MH12CD0001").await.unwrap());
        assert_eq!(parking::occupied_spare(&mut conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_release_rejects_unparked_and_foreign() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();

        let idle = release(&mut conn, "RES001", "GJ01AB1234").await.unwrap();
        assert_eq!(
            idle.rejection(),
            Some(&Rejection::VehicleNotParked("GJ01AB1234".into()))
        );

        park_in_slot(&mut conn, "RES001", "GJ01AB1234", 5).await.unwrap();
        let foreign = release(&mut conn, "RES002", "GJ01AB1234").await.unwrap();
        assert_eq!(foreign.rejection(), Some(&Rejection::NotOwner("GJ01AB1234".into())));
    }

    #[tokio::test]
    async fn test_park_resident_vehicle_interactive() {
        let db = setup().await;
        {
            let mut conn = db.acquire().await.unwrap();
            register(
                &mut conn,
                "RES001",
                &NewVehicle {
                    vehicle_number: "GJ01CD0001".into(),
                    vehicle_type: VehicleType::TwoWheeler,
                    vehicle_brand: "Activa".into(),
                },
            )
            .await
            .unwrap();
            park_in_slot(&mut conn, "RES001", "GJ01CD0001", 7).await.unwrap();
        }
        let service = ParkingService::new(db, 5).await.unwrap();

        // Only the unparked car is offered; slot 7 is taken, 1300 out of range
        let mut console = ScriptedConsole::new(["1", "7", "1300", "8"]);
        let parked = service
            .park_resident_vehicle(&mut console, "RES001")
            .await
            .unwrap()
            .done()
            .unwrap();

        assert_eq!(parked.slot_id, 8);
        assert_eq!(parked.vehicle_number, "GJ01AB1234");
        assert!(console.output_contains(DisplayMessages::SLOT_OCCUPIED));

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let none_left = service.park_resident_vehicle(&mut console, "RES001").await.unwrap();
        assert_eq!(none_left.rejection(), Some(&Rejection::NoVehiclesToPark));
    }

    #[tokio::test]
    async fn test_slot_zero_cancels_without_writes() {
        let db = setup().await;
        let service = ParkingService::new(db, 5).await.unwrap();
        let mut console = ScriptedConsole::new(["1", "0"]);

        let outcome = service.park_resident_vehicle(&mut console, "RES001").await.unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(service.occupied_in_wing(Wing::A).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_reports_guest_charge() {
        let db = setup().await;
        let mut service = ParkingService::new(db, 5).await.unwrap();

        let mut console = ScriptedConsole::new(["MH12CD0001", "1", "Kia", "1201"]);
        assert!(service.park_guest_vehicle(&mut console, "RES001").await.unwrap().is_done());

        let mut console = ScriptedConsole::new(["1"]);
        let record = service
            .remove_parked_vehicle(&mut console, "RES001")
            .await
            .unwrap()
            .done()
            .unwrap();

        assert_eq!(record.vehicle_number, "MH12CD0001");
        assert!(console.output_contains("₹20.00"));
        assert!(service.my_parked("RES001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_availability_and_free_slots() {
        let db = setup().await;
        {
            let mut conn = db.acquire().await.unwrap();
            park_in_slot(&mut conn, "RES001", "GJ01AB1234", 1).await.unwrap();
            park_guest_in_slot(&mut conn, "RES001", &guest("MH12CD0001"), 1350)
                .await
                .unwrap();
        }
        let service = ParkingService::new(db, 5).await.unwrap();

        let availability = service.availability().await.unwrap();
        assert_eq!(availability.wings[0].occupied, 1);
        assert_eq!(availability.wings[0].remaining(), 399);
        assert_eq!(availability.guest_remaining(), 149);

        let free = service.free_slots(ParkingArea::Resident).await.unwrap();
        assert_eq!(free.first(), Some(&2));
        assert_eq!(free.len(), 1199);
        let free_guest = service.free_slots(ParkingArea::Guest).await.unwrap();
        assert_eq!(free_guest.last(), Some(&1349));
    }

    #[tokio::test]
    async fn test_admit_next_waiting_guest() {
        let db = setup().await;
        let mut service = ParkingService::new(db, 5).await.unwrap();

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let empty = service.admit_next_waiting_guest(&mut console).await.unwrap();
        assert_eq!(empty.rejection(), Some(&Rejection::WaitlistEmpty));

        service
            .enqueue_guest(&NewWaitlistEntry {
                resident_id: "RES001".into(),
                vehicle_number: "MH12CD0001".into(),
                vehicle_brand: "Kia".into(),
                vehicle_type: VehicleType::FourWheeler,
            })
            .await
            .unwrap();

        // Cancel keeps the entry queued
        let mut console = ScriptedConsole::new(["0"]);
        let cancelled = service.admit_next_waiting_guest(&mut console).await.unwrap();
        assert_eq!(cancelled, Outcome::Cancelled);
        assert_eq!(service.waitlist().len(), 1);

        let mut console = ScriptedConsole::new(["1205"]);
        let parked = service
            .admit_next_waiting_guest(&mut console)
            .await
            .unwrap()
            .done()
            .unwrap();
        assert_eq!(parked.slot_id, 1205);
        assert!(service.waitlist().is_empty());
    }

    fn waiting(resident_id: &str, number: &str) -> NewWaitlistEntry {
        NewWaitlistEntry {
            resident_id: resident_id.into(),
            vehicle_number: number.into(),
            vehicle_brand: "Kia".into(),
            vehicle_type: VehicleType::FourWheeler,
        }
    }

    #[tokio::test]
    async fn test_enqueue_turns_away_unparkable_guests() {
        let db = setup().await;
        let mut service = ParkingService::new(db, 5).await.unwrap();

        let registered = service.enqueue_guest(&waiting("RES001", "GJ01AB1234")).await.unwrap();
        assert_eq!(
            registered.rejection(),
            Some(&Rejection::VehicleAlreadyRegistered("GJ01AB1234".into()))
        );

        let unknown_host = service.enqueue_guest(&waiting("RES404", "MH12CD0009")).await.unwrap();
        assert_eq!(
            unknown_host.rejection(),
            Some(&Rejection::ResidentNotFound("RES404".into()))
        );

        assert!(service.enqueue_guest(&waiting("RES001", "MH12CD0001")).await.unwrap().is_done());
        let twice = service.enqueue_guest(&waiting("RES001", "mh12cd0001")).await.unwrap();
        assert_eq!(
            twice.rejection(),
            Some(&Rejection::AlreadyWaiting("MH12CD0001".into()))
        );

        assert_eq!(service.waiting_guests().len(), 1);
    }

    #[tokio::test]
    async fn test_guest_registered_while_waiting_is_dropped() {
        let db = setup().await;
        let mut service = ParkingService::new(db.clone(), 5).await.unwrap();
        service.enqueue_guest(&waiting("RES001", "MH12CD0001")).await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        register(
            &mut conn,
            "RES001",
            &NewVehicle {
                vehicle_number: "MH12CD0001".into(),
                vehicle_type: VehicleType::TwoWheeler,
                vehicle_brand: "Activa".into(),
            },
        )
        .await
        .unwrap();
        drop(conn);

        let mut console = ScriptedConsole::new(["1201"]);
        let outcome = service.admit_next_waiting_guest(&mut console).await.unwrap();
        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::VehicleAlreadyRegistered("MH12CD0001".into()))
        );
        assert!(service.waitlist().is_empty());
        assert!(console.output_contains("already registered"));

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let again = service.admit_next_waiting_guest(&mut console).await.unwrap();
        assert_eq!(again.rejection(), Some(&Rejection::WaitlistEmpty));
    }

    #[tokio::test]
    async fn test_storage_failure_requeues_entry() {
        let db = setup().await;
        let mut service = ParkingService::new(db.clone(), 5).await.unwrap();
        service.enqueue_guest(&waiting("RES001", "MH12CD0001")).await.unwrap();
        service.enqueue_guest(&waiting("RES001", "MH12CD0002")).await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_vehicle BEFORE INSERT ON vehicle \
             BEGIN SELECT RAISE(ABORT, 'vehicle table locked'); END",
        )
        .execute(&mut *conn)
        .await
        .unwrap();
        drop(conn);

        let mut console = ScriptedConsole::new(["1201"]);
        let outcome = service.admit_next_waiting_guest(&mut console).await;

        assert!(matches!(outcome, Err(ServiceError::Storage(_))));
        let order: Vec<String> = service
            .waiting_guests()
            .into_iter()
            .map(|entry| entry.vehicle_number)
            .collect();
        assert_eq!(order, ["MH12CD0002", "MH12CD0001"]);
        assert!(console.output_contains("returned to the back"));
    }

    #[tokio::test]
    async fn test_waiting_guest_of_removed_host_is_dropped() {
        let db = setup().await;
        let mut service = ParkingService::new(db.clone(), 5).await.unwrap();
        service.enqueue_guest(&waiting("RES001", "MH12CD0001")).await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        residents::delete(&mut conn, "RES001").await.unwrap();
        drop(conn);

        let mut console = ScriptedConsole::new(["1201"]);
        let outcome = service.admit_next_waiting_guest(&mut console).await.unwrap();

        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::ResidentNotFound("RES001".into()))
        );
        assert!(service.waitlist().is_empty());
        assert!(console.output_contains("host no longer exists"));
    }
}
