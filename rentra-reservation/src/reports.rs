use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use rentra_domain::booking::Booking;
use rentra_domain::ids::CustomerId;
use rentra_domain::vehicle::Vehicle;

use crate::service::ReservationService;

/// Read-only aggregations for the reporting collaborator. Everything
/// here goes through the service's read operations; reports never
/// mutate state.

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerRentals {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub total_bookings: usize,
    pub active_bookings: usize,
}

/// Vehicles with no Active booking covering `as_of`, in fleet order.
pub fn available_vehicles(svc: &ReservationService, as_of: NaiveDate) -> Vec<Vehicle> {
    svc.list_vehicles()
        .into_iter()
        // A vehicle removed from the fleet between the listing and
        // the check counts as not available rather than failing the
        // whole report.
        .filter(|vehicle| svc.current_availability(vehicle.id, as_of).unwrap_or(false))
        .collect()
}

/// Booking counts per registered customer, in registration order.
pub fn rentals_by_customer(svc: &ReservationService) -> Vec<CustomerRentals> {
    svc.list_customers()
        .into_iter()
        .map(|customer| {
            let bookings = svc.bookings_for_customer(customer.id);
            CustomerRentals {
                customer_id: customer.id,
                customer_name: customer.name,
                total_bookings: bookings.len(),
                active_bookings: bookings.iter().filter(|b| b.is_active()).count(),
            }
        })
        .collect()
}

/// Revenue over Active bookings starting within `[from, to)`:
/// price per day × nights for each booking.
pub fn revenue_between(svc: &ReservationService, from: NaiveDate, to: NaiveDate) -> i64 {
    svc.list_bookings()
        .iter()
        .filter(|booking| booking.is_active())
        .filter(|booking| from <= booking.period.start() && booking.period.start() < to)
        .map(|booking| booking_revenue(svc, booking))
        .sum()
}

/// Revenue per calendar month of `year`, bucketed by booking start
/// date.
pub fn monthly_revenue(svc: &ReservationService, year: i32) -> [i64; 12] {
    let mut months = [0i64; 12];
    for booking in svc.list_bookings() {
        if !booking.is_active() || booking.period.start().year() != year {
            continue;
        }
        let month = booking.period.start().month0() as usize;
        months[month] += booking_revenue(svc, &booking);
    }
    months
}

/// Summary payload for the reporting collaborator.
pub fn revenue_summary(svc: &ReservationService, year: i32) -> serde_json::Value {
    let months = monthly_revenue(svc, year);
    serde_json::json!({
        "year": year,
        "total_cents": months.iter().sum::<i64>(),
        "monthly_cents": months,
    })
}

fn booking_revenue(svc: &ReservationService, booking: &Booking) -> i64 {
    match svc.get_vehicle(booking.vehicle_id) {
        Ok(vehicle) => vehicle.price_per_day_cents * booking.period.nights(),
        // Vehicle since removed from the fleet: nothing to price.
        Err(_) => 0,
    }
}
