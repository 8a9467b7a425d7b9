//! Administrator menu.

use super::{Flow, Shell, tolerate};
use aptpark_core::{ParkingArea, Wing};
use aptpark_services::console::Console;
use aptpark_services::{Actor, ServiceResult, prompt, views};
use aptpark_storage::Admin;
use aptpark_storage::repositories::history::HistoryFilter;
use aptpark_storage::repositories::parking::ParkedFilter;
use aptpark_storage::repositories::vehicles::SORT_COLUMNS;
use chrono::Local;

const ADMIN_MENU: &str = "\n===== ADMIN MENU =====\n\
1. Manage Residents\n\
2. Manage Vehicles\n\
3. View Parked Vehicles\n\
4. View Available Slots\n\
5. Parking History\n\
6. Guest Waiting List\n\
7. Change Admin Credentials\n\
8. Logout";

const RESIDENTS_MENU: &str = "\n--- Manage Residents ---\n\
1. Add Resident\n\
2. Edit Resident\n\
3. Delete Resident\n\
4. Search Resident\n\
5. View Residents by Wing\n\
6. Upgrade Subscription\n\
7. Back";

const VEHICLES_MENU: &str = "\n--- Manage Vehicles ---\n\
1. Add Vehicle\n\
2. Delete Vehicle\n\
3. Search Vehicle\n\
4. View Vehicles of a Resident\n\
5. View All Vehicles\n\
6. Back";

const PARKED_MENU: &str = "\n--- Parked Vehicles ---\n\
1. Resident Parking (by wing)\n\
2. Guest Parking\n\
3. All Parked Vehicles\n\
4. Back";

const HISTORY_MENU: &str = "\n--- Parking History ---\n\
1. Resident Parking\n\
2. Guest Parking\n\
3. All\n\
4. Generate Report File\n\
5. Back";

const WAITLIST_MENU: &str = "\n--- Guest Waiting List ---\n\
1. View Waiting List\n\
2. Park Next Waiting Guest\n\
3. Back";

impl<C: Console> Shell<C> {
    pub(super) async fn admin_menu(&mut self, mut admin: Admin) -> ServiceResult<()> {
        loop {
            self.console.say(ADMIN_MENU);
            let flow = match prompt::choice(&mut self.console, "Enter choice: ", 1..=8)? {
                1 => self.manage_residents().await?,
                2 => self.manage_vehicles().await?,
                3 => self.show_parked().await?,
                4 => self.show_available_slots().await?,
                5 => self.show_history().await?,
                6 => self.manage_waitlist().await?,
                7 => {
                    let changed = self.auth.change_admin_credentials(&mut self.console, &admin).await;
                    match tolerate(&mut self.console, changed)? {
                        Some(outcome) => match outcome.done() {
                            Some(updated) => {
                                admin = updated;
                                Flow::Logout
                            }
                            None => Flow::Stay,
                        },
                        None => Flow::Stay,
                    }
                }
                _ => Flow::Logout,
            };

            if flow == Flow::Logout {
                self.console.say(&format!("Logged out {}.", admin.name));
                return Ok(());
            }
        }
    }

    async fn manage_residents(&mut self) -> ServiceResult<Flow> {
        self.console.say(RESIDENTS_MENU);
        match prompt::choice(&mut self.console, "Enter choice: ", 1..=7)? {
            1 => {
                let added = self.tenancy.add_resident(&mut self.console).await;
                tolerate(&mut self.console, added)?;
            }
            2 => {
                let rid = prompt::resident_id(&mut self.console)?;
                let edited = self.tenancy.edit_resident(&mut self.console, &rid).await;
                tolerate(&mut self.console, edited)?;
            }
            3 => {
                let rid = prompt::resident_id(&mut self.console)?;
                let deleted = self.tenancy.delete_resident(&mut self.console, &rid).await;
                tolerate(&mut self.console, deleted)?;
            }
            4 => {
                let rid = prompt::resident_id(&mut self.console)?;
                let found = self.tenancy.search_resident(&rid).await;
                match tolerate(&mut self.console, found)? {
                    Some(Some(resident)) => self.console.say(&views::resident_details(&resident)),
                    Some(None) => self.console.say(&format!("Resident {rid} not found.")),
                    None => {}
                }
            }
            5 => {
                let wing = self.pick_wing_filter()?;
                let listed = self.tenancy.list_residents(wing).await;
                if let Some(residents) = tolerate(&mut self.console, listed)? {
                    self.console.say(&views::residents_table(&residents));
                }
            }
            6 => {
                let rid = prompt::resident_id(&mut self.console)?;
                let upgraded = self.tenancy.upgrade_subscription(&mut self.console, &rid).await;
                tolerate(&mut self.console, upgraded)?;
            }
            _ => {}
        }
        Ok(Flow::Stay)
    }

    async fn manage_vehicles(&mut self) -> ServiceResult<Flow> {
        self.console.say(VEHICLES_MENU);
        match prompt::choice(&mut self.console, "Enter choice: ", 1..=6)? {
            1 => {
                let rid = prompt::resident_id(&mut self.console)?;
                let added = self
                    .vehicles
                    .add_vehicle_for_resident(&mut self.console, &rid, &Actor::Admin)
                    .await;
                tolerate(&mut self.console, added)?;
            }
            2 => {
                let deleted = self.vehicles.delete_vehicle(&mut self.console, &Actor::Admin).await;
                tolerate(&mut self.console, deleted)?;
            }
            3 => {
                let number = prompt::non_empty(&mut self.console, "Enter Vehicle Number: ", "Vehicle number")?;
                let found = self.vehicles.search_vehicle(&number).await;
                match tolerate(&mut self.console, found)? {
                    Some(Some(found)) => {
                        let vehicle = &found.vehicle;
                        self.console.say(&format!(
                            "Vehicle {} ({} {}, {}) belongs to {} [{}]",
                            vehicle.vehicle_number,
                            vehicle.vehicle_brand,
                            vehicle.vehicle_type,
                            vehicle.owner_type,
                            found.owner_name,
                            vehicle.resident_id
                        ));
                    }
                    Some(None) => self.console.say(&format!("Vehicle {number} not found.")),
                    None => {}
                }
            }
            4 => {
                let rid = prompt::resident_id(&mut self.console)?;
                let listed = self.vehicles.list_for_resident(&rid).await;
                if let Some(statuses) = tolerate(&mut self.console, listed)? {
                    self.console.say(&views::vehicle_statuses_table(&statuses));
                }
            }
            5 => {
                for (i, column) in SORT_COLUMNS.iter().enumerate() {
                    self.console.say(&format!("{}. Sort by {column}", i + 1));
                }
                let picked = prompt::choice(&mut self.console, "Enter choice: ", 1..=SORT_COLUMNS.len() as i64)?;
                let column = SORT_COLUMNS[(picked - 1) as usize];
                let listed = self.vehicles.list_all(column).await;
                if let Some(vehicles) = tolerate(&mut self.console, listed)? {
                    self.console.say(&views::vehicles_table(&vehicles));
                }
            }
            _ => {}
        }
        Ok(Flow::Stay)
    }

    async fn show_parked(&mut self) -> ServiceResult<Flow> {
        self.console.say(PARKED_MENU);
        let filter = match prompt::choice(&mut self.console, "Enter choice: ", 1..=4)? {
            1 => ParkedFilter {
                area: Some(ParkingArea::Resident),
                wing: self.pick_wing_filter()?,
            },
            2 => ParkedFilter {
                area: Some(ParkingArea::Guest),
                wing: None,
            },
            3 => ParkedFilter::default(),
            _ => return Ok(Flow::Stay),
        };

        let listed = self.parking.parked_vehicles(filter).await;
        if let Some(parked) = tolerate(&mut self.console, listed)? {
            self.console.say(&views::parked_table(&parked));
        }
        Ok(Flow::Stay)
    }

    async fn show_available_slots(&mut self) -> ServiceResult<Flow> {
        let availability = self.parking.availability().await;
        if let Some(availability) = tolerate(&mut self.console, availability)? {
            self.console.say(&views::availability(&availability));
        }

        for area in [ParkingArea::Resident, ParkingArea::Guest] {
            let free = self.parking.free_slots(area).await;
            if let Some(free) = tolerate(&mut self.console, free)? {
                self.console.say(&format!("Free {} slots: {}", area.label(), views::slot_ranges(&free)));
            }
        }
        Ok(Flow::Stay)
    }

    async fn show_history(&mut self) -> ServiceResult<Flow> {
        self.console.say(HISTORY_MENU);
        let filter = match prompt::choice(&mut self.console, "Enter choice: ", 1..=5)? {
            1 => HistoryFilter {
                area: Some(ParkingArea::Resident),
                wing: self.pick_wing_filter()?,
                resident_id: None,
            },
            2 => HistoryFilter {
                area: Some(ParkingArea::Guest),
                ..HistoryFilter::default()
            },
            3 => HistoryFilter::default(),
            4 => {
                let file = format!("parking_history_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
                let path = self.report_dir.join(file);
                let written = self.parking.write_history_report(&path).await;
                if let Some(path) = tolerate(&mut self.console, written)? {
                    self.console.say(&format!("Report written to {}", path.display()));
                }
                return Ok(Flow::Stay);
            }
            _ => return Ok(Flow::Stay),
        };

        let listed = self.parking.history(&filter).await;
        if let Some(entries) = tolerate(&mut self.console, listed)? {
            self.console.say(&views::history(&entries));
        }
        Ok(Flow::Stay)
    }

    async fn manage_waitlist(&mut self) -> ServiceResult<Flow> {
        self.console.say(WAITLIST_MENU);
        match prompt::choice(&mut self.console, "Enter choice: ", 1..=3)? {
            1 => {
                let waiting = self.parking.waiting_guests();
                self.console.say(&views::waitlist_table(&waiting));
            }
            2 => {
                let admitted = self.parking.admit_next_waiting_guest(&mut self.console).await;
                tolerate(&mut self.console, admitted)?;
            }
            _ => {}
        }
        Ok(Flow::Stay)
    }

    /// A wing, or `None` for every wing.
    fn pick_wing_filter(&mut self) -> ServiceResult<Option<Wing>> {
        if prompt::yes_no(&mut self.console, "Filter by wing? (y/n): ")? {
            Ok(Some(prompt::wing(&mut self.console, "Enter Wing (A/B/C): ")?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::shell;
    use aptpark_services::messages::DisplayMessages;

    const LOGIN: [&str; 3] = ["1", "admin", "Admin@123"];

    fn session(actions: &[&str]) -> Vec<String> {
        LOGIN
            .iter()
            .chain(actions)
            .chain(["8", "3"].iter())
            .map(|s| s.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_add_resident_then_list_wing() {
        let inputs = session(&[
            "1", "1", "Amit", "Shah", "9876543210", "A", "n", "n",
            "1", "5", "y", "A",
        ]);
        let mut shell = shell(&inputs.iter().map(String::as_str).collect::<Vec<_>>()).await;
        shell.run().await.unwrap();

        assert!(shell.console.output_contains(DisplayMessages::RESIDENT_ADDED));
        assert!(shell.console.output_contains("RES001"));
        assert!(shell.console.output_contains("amit1"));
    }

    #[tokio::test]
    async fn test_lowercase_resident_id_reaches_every_action() {
        let inputs = session(&[
            "1", "1", "Amit", "Shah", "9876543210", "A", "n", "n",
            "1", "4", " res1 ",
            "1", "2", "res001", "", "", "",
            "1", "3", "Res001", "y",
        ]);
        let mut shell = shell(&inputs.iter().map(String::as_str).collect::<Vec<_>>()).await;
        shell.run().await.unwrap();

        assert!(!shell.console.output_contains("not found"));
        assert!(shell.console.output_contains(DisplayMessages::RESIDENT_UPDATED));
        assert!(shell.console.output_contains(DisplayMessages::RESIDENT_DELETED));
    }

    #[tokio::test]
    async fn test_empty_listings() {
        let inputs = session(&["3", "3", "5", "3", "6", "1"]);
        let mut shell = shell(&inputs.iter().map(String::as_str).collect::<Vec<_>>()).await;
        shell.run().await.unwrap();

        let empty = shell
            .console
            .output()
            .iter()
            .filter(|line| line.contains(DisplayMessages::NO_RECORDS))
            .count();
        assert_eq!(empty, 3);
    }

    #[tokio::test]
    async fn test_available_slots() {
        let inputs = session(&["4"]);
        let mut shell = shell(&inputs.iter().map(String::as_str).collect::<Vec<_>>()).await;
        shell.run().await.unwrap();

        assert!(shell.console.output_contains("Wing A: 0 of 400"));
        assert!(shell.console.output_contains("1-1200"));
        assert!(shell.console.output_contains("1201-1350"));
    }

    #[tokio::test]
    async fn test_history_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = session(&["5", "4"]);
        let mut shell = shell(&inputs.iter().map(String::as_str).collect::<Vec<_>>()).await;
        shell.report_dir = dir.path().to_path_buf();
        shell.run().await.unwrap();

        assert!(shell.console.output_contains("Report written to"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_credentials_change_logs_out() {
        let inputs: Vec<&str> = vec![
            "1", "admin", "Admin@123", "7", "manager", "Secure@12", "Secure@12",
            "1", "manager", "Secure@12", "8", "3",
        ];
        let mut shell = shell(&inputs).await;
        shell.run().await.unwrap();

        assert!(shell.console.output_contains(DisplayMessages::CREDENTIALS_CHANGED));
        assert!(shell.console.output_contains("Welcome, manager!"));
    }
}
