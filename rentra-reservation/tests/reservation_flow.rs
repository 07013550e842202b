use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use rentra_domain::payment::PaymentMethod;
use rentra_domain::period::RentalPeriod;
use rentra_domain::vehicle::VehicleCategory;
use rentra_domain::RentalError;
use rentra_reservation::{reports, InMemorySnapshotRepository, ReservationService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn period(s: (i32, u32, u32), e: (i32, u32, u32)) -> RentalPeriod {
    RentalPeriod::new(date(s.0, s.1, s.2), date(e.0, e.1, e.2)).unwrap()
}

#[test]
fn end_to_end_rental_flow() {
    let svc = ReservationService::new();

    let vehicle = svc
        .add_vehicle("Toyota Corolla", VehicleCategory::Car, 100)
        .unwrap();
    let customer = svc
        .register_customer("Lerato N", "lerato@example.com", "DL-100")
        .unwrap();

    let booking = svc
        .book(vehicle, customer, period((2024, 3, 1), (2024, 3, 4)))
        .unwrap();

    // Availability is a derived projection of the ledger.
    assert!(!svc.current_availability(vehicle, date(2024, 3, 2)).unwrap());
    assert!(svc.current_availability(vehicle, date(2024, 3, 10)).unwrap());

    // March revenue: 3 nights at 100/day.
    assert_eq!(
        reports::revenue_between(&svc, date(2024, 3, 1), date(2024, 4, 1)),
        300
    );

    svc.record_payment(booking, 300, PaymentMethod::CreditCard, vec![])
        .unwrap();
    assert_eq!(svc.total_paid(booking), 300);
}

#[test]
fn half_open_boundary_at_the_service_surface() {
    let svc = ReservationService::new();
    let vehicle = svc
        .add_vehicle("Honda CB500", VehicleCategory::Bike, 50)
        .unwrap();
    let customer = svc
        .register_customer("Sipho D", "sipho@example.com", "DL-200")
        .unwrap();

    svc.book(vehicle, customer, period((2024, 1, 1), (2024, 1, 5)))
        .unwrap();
    // Starts the day the first booking ends: same-day turnover.
    svc.book(vehicle, customer, period((2024, 1, 5), (2024, 1, 10)))
        .unwrap();
    // Strictly inside the first booking.
    let result = svc.book(vehicle, customer, period((2024, 1, 4), (2024, 1, 6)));
    assert!(matches!(result, Err(RentalError::Conflict(_))));
}

#[test]
fn racing_overlapping_bookings_admit_exactly_one() {
    let svc = Arc::new(ReservationService::new());
    let vehicle = svc
        .add_vehicle("Ford Transit", VehicleCategory::Van, 150)
        .unwrap();
    let customer = svc
        .register_customer("Nadia K", "nadia@example.com", "DL-300")
        .unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let svc = Arc::clone(&svc);
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            svc.book(vehicle, customer, period((2024, 6, 1), (2024, 6, 8)))
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(RentalError::Conflict(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(
        svc.bookings_for_vehicle(vehicle)
            .iter()
            .filter(|b| b.is_active())
            .count(),
        1
    );
}

#[test]
fn racing_book_and_customer_removal_stay_consistent() {
    for _ in 0..200 {
        let svc = Arc::new(ReservationService::new());
        let vehicle = svc
            .add_vehicle("Toyota Corolla", VehicleCategory::Car, 100)
            .unwrap();
        let customer = svc
            .register_customer("Lerato N", "lerato@example.com", "DL-100")
            .unwrap();

        let barrier = Arc::new(Barrier::new(3));
        let mut bookers = Vec::new();
        for i in 0..2u32 {
            let svc = Arc::clone(&svc);
            let barrier = Arc::clone(&barrier);
            bookers.push(std::thread::spawn(move || {
                barrier.wait();
                // Disjoint windows, so the bookers never conflict
                // with each other.
                let start = 1 + i * 10;
                svc.book(vehicle, customer, period((2024, 8, start), (2024, 8, start + 5)))
            }));
        }
        let remover = {
            let svc = Arc::clone(&svc);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                svc.remove_customer(customer)
            })
        };

        let booked = bookers
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        let removed = remover.join().unwrap().is_ok();

        // Either the removal won and no booking landed, or at least
        // one booking landed and the removal was refused. An Active
        // booking must never reference an absent customer.
        if removed {
            assert_eq!(booked, 0, "booking landed against a removed customer");
        }
        if booked > 0 {
            assert!(svc.get_customer(customer).is_ok());
        }
    }
}

#[test]
fn deadline_variant_succeeds_when_uncontended() {
    let svc = ReservationService::new();
    let vehicle = svc
        .add_vehicle("Mazda BT-50", VehicleCategory::Truck, 200)
        .unwrap();
    let customer = svc
        .register_customer("Pieter V", "pieter@example.com", "DL-400")
        .unwrap();

    let deadline = Instant::now() + Duration::from_millis(100);
    let booking = svc
        .book_within(vehicle, customer, period((2024, 7, 1), (2024, 7, 3)), deadline)
        .unwrap();
    svc.update_booking_within(booking, period((2024, 7, 2), (2024, 7, 4)), deadline)
        .unwrap();

    assert_eq!(
        svc.get_booking(booking).unwrap().period,
        period((2024, 7, 2), (2024, 7, 4))
    );
}

#[tokio::test]
async fn snapshot_survives_a_restart() {
    let svc = ReservationService::new();
    let vehicle = svc
        .add_vehicle("Toyota Corolla", VehicleCategory::Car, 100)
        .unwrap();
    let customer = svc
        .register_customer("Lerato N", "lerato@example.com", "DL-100")
        .unwrap();
    let booking = svc
        .book(vehicle, customer, period((2024, 3, 1), (2024, 3, 4)))
        .unwrap();
    svc.record_payment(booking, 300, PaymentMethod::Cash, vec![])
        .unwrap();

    let repo = InMemorySnapshotRepository::new();
    svc.save_to(&repo).await.unwrap();

    let restored = ReservationService::load_from(&repo).await.unwrap().unwrap();

    // Reads reflect the committed writes.
    assert_eq!(restored.list_vehicles(), svc.list_vehicles());
    assert_eq!(restored.total_paid(booking), 300);
    assert!(!restored.current_availability(vehicle, date(2024, 3, 2)).unwrap());

    // The restored ledger still enforces the overlap invariant.
    let result = restored.book(vehicle, customer, period((2024, 3, 2), (2024, 3, 5)));
    assert!(matches!(result, Err(RentalError::Conflict(_))));

    // Duplicate license numbers cannot sneak in through a restore.
    let dup = restored.register_customer("Imposter", "x@example.com", "DL-100");
    assert!(matches!(dup, Err(RentalError::Conflict(_))));
}
