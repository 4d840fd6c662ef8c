use crate::blocks::{end_of_day_clamped, TimeBlock};
use crate::models::{AvailabilityResponse, Reservation};
use chrono::NaiveDate;

pub const DEFAULT_BLOCK_CAPACITY: u32 = 20;

pub fn check_availability(
    reservations: &[Reservation],
    date: NaiveDate,
    block: &TimeBlock,
    people: u32,
    capacity: u32,
) -> AvailabilityResponse {
    let in_block: Vec<&Reservation> = reservations
        .iter()
        .filter(|reservation| occupies(reservation, date, block))
        .collect();
    let occupied: u32 = in_block.iter().map(|reservation| reservation.occupants).sum();

    AvailabilityResponse {
        available: occupied.saturating_add(people) <= capacity,
        date: date.to_string(),
        block: block.label(),
        people,
        occupied,
        capacity,
        reservations_in_block: in_block.len(),
    }
}

fn occupies(reservation: &Reservation, date: NaiveDate, block: &TimeBlock) -> bool {
    match (reservation.start, reservation.duration_minutes) {
        (Some(start), Some(minutes)) if start.date() == date => {
            block.overlaps(start.time(), end_of_day_clamped(start.time(), minutes))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReservationStatus;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn party(id: u64, h: u32, occupants: u32) -> Reservation {
        Reservation {
            id,
            start: date().and_hms_opt(h, 0, 0),
            duration_minutes: Some(30),
            occupants,
            kart_ids: Vec::new(),
            customer_ids: Vec::new(),
            total: 0.0,
            status: ReservationStatus::Confirmed,
            notes: None,
        }
    }

    #[test]
    fn counts_only_overlapping_parties() {
        let block = TimeBlock::parse("10:00-11:00").unwrap();
        let reservations = vec![party(1, 10, 8), party(2, 10, 6), party(3, 12, 10)];
        let result = check_availability(&reservations, date(), &block, 6, DEFAULT_BLOCK_CAPACITY);
        assert!(result.available);
        assert_eq!(result.occupied, 14);
        assert_eq!(result.reservations_in_block, 2);
    }

    #[test]
    fn rejects_party_over_capacity() {
        let block = TimeBlock::parse("10:00-11:00").unwrap();
        let reservations = vec![party(1, 10, 15)];
        let result = check_availability(&reservations, date(), &block, 6, DEFAULT_BLOCK_CAPACITY);
        assert!(!result.available);
    }

    #[test]
    fn other_days_do_not_count() {
        let block = TimeBlock::parse("10:00-11:00").unwrap();
        let mut other = party(1, 10, 20);
        other.start = date().succ_opt().and_then(|next| next.and_hms_opt(10, 0, 0));
        let result = check_availability(&[other], date(), &block, 1, DEFAULT_BLOCK_CAPACITY);
        assert!(result.available);
        assert_eq!(result.occupied, 0);
    }
}
