//! Resident menu, scoped to the logged-in resident.

use super::{Flow, Shell, tolerate};
use aptpark_services::console::Console;
use aptpark_services::{Actor, ServiceResult, prompt, views};
use aptpark_storage::repositories::history::HistoryFilter;

const RESIDENT_MENU: &str = "\n===== RESIDENT MENU =====\n\
1. Park My Vehicle\n\
2. Park Guest Vehicle\n\
3. Remove Parked Vehicle\n\
4. My Parked Vehicles\n\
5. Manage My Vehicles\n\
6. Upgrade Subscription\n\
7. My Parking History\n\
8. Logout";

const MY_VEHICLES_MENU: &str = "\n--- My Vehicles ---\n\
1. Add Vehicle\n\
2. Remove Vehicle\n\
3. List My Vehicles\n\
4. Back";

impl<C: Console> Shell<C> {
    pub(super) async fn resident_menu(&mut self, resident_id: String) -> ServiceResult<()> {
        let actor = Actor::Resident(resident_id.clone());

        loop {
            self.console.say(RESIDENT_MENU);
            let flow = match prompt::choice(&mut self.console, "Enter choice: ", 1..=8)? {
                1 => {
                    let parked = self.parking.park_resident_vehicle(&mut self.console, &resident_id).await;
                    tolerate(&mut self.console, parked)?;
                    Flow::Stay
                }
                2 => {
                    let parked = self.parking.park_guest_vehicle(&mut self.console, &resident_id).await;
                    tolerate(&mut self.console, parked)?;
                    Flow::Stay
                }
                3 => {
                    let removed = self.parking.remove_parked_vehicle(&mut self.console, &resident_id).await;
                    tolerate(&mut self.console, removed)?;
                    Flow::Stay
                }
                4 => {
                    let active = self.parking.my_parked(&resident_id).await;
                    if let Some(active) = tolerate(&mut self.console, active)? {
                        self.console.say(&views::active_parking_table(&active));
                    }
                    Flow::Stay
                }
                5 => self.my_vehicles(&resident_id, &actor).await?,
                6 => {
                    let upgraded = self.tenancy.upgrade_subscription(&mut self.console, &resident_id).await;
                    tolerate(&mut self.console, upgraded)?;
                    Flow::Stay
                }
                7 => {
                    let filter = HistoryFilter {
                        resident_id: Some(resident_id.clone()),
                        ..HistoryFilter::default()
                    };
                    let listed = self.parking.history(&filter).await;
                    if let Some(entries) = tolerate(&mut self.console, listed)? {
                        self.console.say(&views::history(&entries));
                    }
                    Flow::Stay
                }
                _ => Flow::Logout,
            };

            if flow == Flow::Logout {
                self.console.say("Logged out.");
                return Ok(());
            }
        }
    }

    async fn my_vehicles(&mut self, resident_id: &str, actor: &Actor) -> ServiceResult<Flow> {
        self.console.say(MY_VEHICLES_MENU);
        match prompt::choice(&mut self.console, "Enter choice: ", 1..=4)? {
            1 => {
                let added = self
                    .vehicles
                    .add_vehicle_for_resident(&mut self.console, resident_id, actor)
                    .await;
                tolerate(&mut self.console, added)?;
            }
            2 => {
                let deleted = self.vehicles.delete_vehicle(&mut self.console, actor).await;
                tolerate(&mut self.console, deleted)?;
            }
            3 => {
                let listed = self.vehicles.list_for_resident(resident_id).await;
                if let Some(statuses) = tolerate(&mut self.console, listed)? {
                    self.console.say(&views::vehicle_statuses_table(&statuses));
                }
            }
            _ => {}
        }
        Ok(Flow::Stay)
    }
}
