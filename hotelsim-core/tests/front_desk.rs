use std::cell::RefCell;
use std::rc::Rc;

use hotelsim_core::{
    AssignmentStrategy, FloorLayout, FrontDesk, Hotel, HotelObserver, Reservation, RoomType,
    StayPurpose, TicketTier,
};

#[derive(Default)]
struct Tally {
    reserved: Vec<String>,
    freed: Vec<(String, RoomType)>,
}

struct SharedTally(Rc<RefCell<Tally>>);

impl HotelObserver for SharedTally {
    fn on_reserve(&mut self, room_name: &str) {
        self.0.borrow_mut().reserved.push(room_name.to_string());
    }

    fn on_free(&mut self, room_name: &str, room_type: RoomType) {
        self.0
            .borrow_mut()
            .freed
            .push((room_name.to_string(), room_type));
    }
}

fn layout() -> FloorLayout {
    FloorLayout::from_codes(&["EBL", "EZE", "LBE"]).expect("valid codes")
}

fn feed() -> Vec<Reservation> {
    vec![
        Reservation::new("Alice", "Dupont", 2, true, StayPurpose::Tourism, 1),
        Reservation::new("Marc", "Leroy", 1, false, StayPurpose::Business, 0),
        Reservation::new("Ines", "Haddad", 2, false, StayPurpose::Tourism, 0),
        Reservation::new("Tom", "Bauer", 4, false, StayPurpose::Other, 3),
        Reservation::new("Zoe", "Martin", 1, true, StayPurpose::Other, 0),
    ]
}

fn run(seed: u64, strategy: AssignmentStrategy) -> Vec<(String, String)> {
    let mut desk = FrontDesk::new(Hotel::new(2, layout()), seed).with_strategy(strategy);
    desk.assign_all(feed()).expect("assignments succeed");
    desk.assignments()
        .iter()
        .map(|request| (request.reservation.last_name.clone(), request.room.clone()))
        .collect()
}

#[test]
fn every_strategy_places_each_guest_in_a_distinct_hotel_room() {
    for strategy in AssignmentStrategy::ALL {
        let mut desk = FrontDesk::new(Hotel::new(2, layout()), 7).with_strategy(strategy);
        let outcome = desk.assign_all(feed()).unwrap();
        assert_eq!(outcome.assigned.len(), 5, "{strategy}");
        assert!(outcome.waiting.is_empty());

        let mut rooms: Vec<&str> = desk
            .assignments()
            .iter()
            .map(|request| request.room.as_str())
            .collect();
        rooms.sort_unstable();
        rooms.dedup();
        assert_eq!(rooms.len(), 5, "{strategy} double-booked a room");
        for room in rooms {
            let occupant = desk.hotel().room(room).unwrap().reservation().unwrap();
            assert!(feed().contains(occupant));
        }
        assert_eq!(desk.hotel().available_rooms().len(), 16 - 5);
    }
}

#[test]
fn same_seed_same_assignments() {
    assert_eq!(
        run(99, AssignmentStrategy::Random),
        run(99, AssignmentStrategy::Random)
    );
}

#[test]
fn observer_sees_every_occupancy_change() {
    let tally = Rc::new(RefCell::new(Tally::default()));
    let mut desk = FrontDesk::new(Hotel::new(1, layout()), 3)
        .with_strategy(AssignmentStrategy::StayPurpose);
    desk.set_observer(Box::new(SharedTally(Rc::clone(&tally))));

    desk.assign_all(feed()).unwrap();
    let business = desk
        .assignments()
        .iter()
        .find(|request| request.reservation.last_name == "Leroy")
        .map(|request| request.room.clone())
        .unwrap();
    assert_eq!(business, "A2B");

    let checkout = desk.checkout(&business, 4).unwrap();
    assert_eq!(checkout.guest.first_name, "Marc");
    assert_eq!(checkout.ticket.discount(), 50);

    let tally = tally.borrow();
    assert_eq!(tally.reserved.len(), 5);
    assert_eq!(
        tally.freed,
        vec![(String::from("A2B"), RoomType::Business)]
    );
}

#[test]
fn hotel_fills_and_checkout_makes_room() {
    let mut desk = FrontDesk::new(Hotel::new(1, FloorLayout::from_codes(&["EE"]).unwrap()), 5)
        .with_strategy(AssignmentStrategy::QuietZone);
    let outcome = desk.assign_all(feed()).unwrap();
    assert_eq!(outcome.assigned.len(), 2);
    assert_eq!(outcome.waiting.len(), 3);

    let room = outcome.assigned[0].room.clone();
    let checkout = desk.checkout(&room, 1).unwrap();
    assert_eq!(checkout.ticket.discount(), 25);
    assert_ne!(checkout.ticket.tier(), TicketTier::Gold);

    let next = desk.assign(outcome.waiting[0].clone()).unwrap().unwrap();
    assert_eq!(next.room, room);
}
