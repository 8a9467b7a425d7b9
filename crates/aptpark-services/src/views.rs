//! Console renderings of listings.
//!
//! Every function returns the finished text block; an empty listing renders
//! as a single "No records found." line.

use crate::messages::DisplayMessages;
use crate::parking::Availability;
use crate::report::{TIME_FORMAT, history_table};
use crate::table::Table;
use aptpark_core::constants::{SPARE_PARKING_CAPACITY, WING_PARKING_CAPACITY};
use aptpark_storage::{
    ActiveParking, HistoryEntry, ParkedVehicleView, Resident, Vehicle, VehicleStatus,
    WaitlistEntry,
};

fn finish(table: Table) -> String {
    if table.is_empty() {
        DisplayMessages::NO_RECORDS.to_string()
    } else {
        table.render()
    }
}

pub fn residents_table(residents: &[Resident]) -> String {
    let mut table = Table::new(&[
        ("ID", 8),
        ("Name", 22),
        ("Contact", 12),
        ("Wing", 4),
        ("House", 5),
        ("Plan", 9),
        ("Vehicles", 8),
        ("Valid Until", 12),
    ]);
    for r in residents {
        table.push_row([
            r.resident_id.clone(),
            r.full_name(),
            r.contact_number.clone(),
            r.wing.to_string(),
            r.house_number.to_string(),
            r.subscription_tier.to_string(),
            r.vehicle_count.to_string(),
            r.subscription_valid_until
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
        ]);
    }
    finish(table)
}

/// Profile block for one resident.
pub fn resident_details(resident: &Resident) -> String {
    let mut lines = vec![
        format!("Resident ID:  {}", resident.resident_id),
        format!("Name:         {}", resident.full_name()),
        format!("Contact:      {}", resident.contact_number),
        format!("Wing/House:   {}-{}", resident.wing, resident.house_number),
        format!("Username:     {}", resident.username),
        format!(
            "Subscription: {} (₹{:.2})",
            resident.subscription_tier, resident.subscription_cost
        ),
        format!("Vehicles:     {}", resident.vehicle_count),
    ];
    if let (Some(start), Some(end)) = (
        resident.subscription_start_date,
        resident.subscription_valid_until,
    ) {
        lines.push(format!("Valid:        {start} to {end}"));
    }
    lines.join("\n")
}

pub fn vehicles_table(vehicles: &[Vehicle]) -> String {
    let mut table = Table::new(&[
        ("Vehicle No.", 12),
        ("Resident ID", 11),
        ("Type", 10),
        ("Brand", 12),
        ("Owner", 8),
    ]);
    for v in vehicles {
        table.push_row([
            v.vehicle_number.clone(),
            v.resident_id.clone(),
            v.vehicle_type.to_string(),
            v.vehicle_brand.clone(),
            v.owner_type.to_string(),
        ]);
    }
    finish(table)
}

pub fn vehicle_statuses_table(statuses: &[VehicleStatus]) -> String {
    let mut table = Table::new(&[
        ("Vehicle No.", 12),
        ("Type", 10),
        ("Brand", 12),
        ("Parked", 6),
        ("Slot", 5),
        ("Location", 16),
    ]);
    for s in statuses {
        table.push_row([
            s.vehicle.vehicle_number.clone(),
            s.vehicle.vehicle_type.to_string(),
            s.vehicle.vehicle_brand.clone(),
            if s.is_parked() { "Yes" } else { "No" }.to_string(),
            s.parked_slot.map_or_else(|| "-".to_string(), |slot| slot.to_string()),
            s.location().to_string(),
        ]);
    }
    finish(table)
}

pub fn parked_table(parked: &[ParkedVehicleView]) -> String {
    let mut table = Table::new(&[
        ("Slot", 5),
        ("Vehicle No.", 12),
        ("Brand", 12),
        ("Type", 10),
        ("Resident", 8),
        ("Owner Name", 20),
        ("Wing", 4),
        ("Time In", 19),
    ]);
    for p in parked {
        table.push_row([
            p.slot_id.to_string(),
            p.vehicle_number.clone(),
            p.vehicle_brand.clone(),
            p.vehicle_type.to_string(),
            p.resident_id.clone(),
            p.owner_name.clone(),
            p.wing.to_string(),
            p.time_in.format(TIME_FORMAT).to_string(),
        ]);
    }
    finish(table)
}

/// Numbered list of a resident's open sessions; the number is the menu choice.
pub fn active_parking_table(active: &[ActiveParking]) -> String {
    let mut table = Table::new(&[
        ("Sr.", 4),
        ("Slot", 5),
        ("Vehicle No.", 12),
        ("Brand", 12),
        ("Type", 10),
        ("Parking", 9),
        ("Time In", 19),
    ]);
    for (index, a) in active.iter().enumerate() {
        table.push_row([
            (index + 1).to_string(),
            a.slot_id.to_string(),
            a.vehicle_number.clone(),
            a.vehicle_brand.clone(),
            a.vehicle_type.to_string(),
            a.parking_type().to_string(),
            a.time_in.format(TIME_FORMAT).to_string(),
        ]);
    }
    finish(table)
}

pub fn history(entries: &[HistoryEntry]) -> String {
    finish(history_table(entries))
}

pub fn waitlist_table(entries: &[WaitlistEntry]) -> String {
    let mut table = Table::new(&[
        ("Pos", 4),
        ("ID", 5),
        ("Host", 8),
        ("Vehicle No.", 12),
        ("Brand", 12),
        ("Type", 10),
        ("Waiting Since", 19),
    ]);
    for (index, e) in entries.iter().enumerate() {
        table.push_row([
            (index + 1).to_string(),
            e.waitlist_id.to_string(),
            e.resident_id.clone(),
            e.vehicle_number.clone(),
            e.vehicle_brand.clone(),
            e.vehicle_type.to_string(),
            e.time_added.format(TIME_FORMAT).to_string(),
        ]);
    }
    finish(table)
}

pub fn availability(availability: &Availability) -> String {
    let mut lines: Vec<String> = availability
        .wings
        .iter()
        .map(|w| {
            format!(
                "Wing {}: {} of {} resident slots used, {} remaining",
                w.wing,
                w.occupied,
                WING_PARKING_CAPACITY,
                w.remaining()
            )
        })
        .collect();
    lines.push(format!(
        "Guest parking: {} of {} slots used, {} remaining",
        availability.guest_occupied,
        SPARE_PARKING_CAPACITY,
        availability.guest_remaining()
    ));
    lines.join("\n")
}

/// Free slot numbers folded into ranges, e.g. `1-4, 6, 8-1200`.
pub fn slot_ranges(slots: &[i64]) -> String {
    let mut parts = Vec::new();
    let mut iter = slots.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        parts.push(if start == end {
            start.to_string()
        } else {
            format!("{start}-{end}")
        });
    }

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parking::WingOccupancy;
    use aptpark_core::{VehicleType, Wing};

    #[test]
    fn test_empty_listing() {
        assert_eq!(vehicles_table(&[]), DisplayMessages::NO_RECORDS);
        assert_eq!(history(&[]), DisplayMessages::NO_RECORDS);
    }

    #[test]
    fn test_vehicle_status_columns() {
        let statuses = [VehicleStatus {
            vehicle: Vehicle::resident_owned("GJ01AB1234", "RES001", VehicleType::FourWheeler, "Honda"),
            parked_slot: Some(1201),
        }];

        let text = vehicle_statuses_table(&statuses);
        assert!(text.contains("Yes"));
        assert!(text.contains("Guest Parking"));
    }

    #[test]
    fn test_slot_ranges() {
        assert_eq!(slot_ranges(&[1, 2, 3, 5, 7, 8]), "1-3, 5, 7-8");
        assert_eq!(slot_ranges(&[]), "none");
    }

    #[test]
    fn test_availability_lines() {
        let text = availability(&Availability {
            wings: vec![WingOccupancy {
                wing: Wing::B,
                occupied: 10,
            }],
            guest_occupied: 150,
        });

        assert!(text.contains("Wing B: 10 of 400 resident slots used, 390 remaining"));
        assert!(text.contains("150 of 150 slots used, 0 remaining"));
    }
}
