//! Itinerary combination.
//!
//! Two operations fold fragments into composite itineraries:
//!
//! - [`combine`] joins an outbound and an inbound into a round trip
//! - [`combine_alternative`] splices the via-to-destination round trip into
//!   the origin-to-via round trip at the first arrival in the via city

use chrono::Duration;

use crate::domain::{DomainError, FlightItinerary};

fn add_durations(a: Duration, b: Duration) -> Result<Duration, DomainError> {
    a.checked_add(&b).ok_or(DomainError::DurationOverflow)
}

/// Join an outbound and an inbound itinerary into a round trip.
///
/// Legs are concatenated and durations summed. The price and offer ids are
/// the inbound's: the site prices the inbound page for the whole round trip.
/// Origin and destination are the outbound's.
///
/// # Errors
///
/// Returns [`DomainError::DurationOverflow`] if the summed duration is out of
/// range.
pub fn combine(
    outbound: &FlightItinerary,
    inbound: &FlightItinerary,
) -> Result<FlightItinerary, DomainError> {
    let mut legs = Vec::with_capacity(outbound.leg_count() + inbound.leg_count());
    legs.extend_from_slice(outbound.legs());
    legs.extend_from_slice(inbound.legs());

    Ok(FlightItinerary::from_parts(
        legs,
        inbound.total_price(),
        add_durations(outbound.total_duration(), inbound.total_duration())?,
        outbound.origin(),
        outbound.destination(),
        inbound.offer().clone(),
    ))
}

/// Splice `leg2` into `leg1` after the first leg of `leg1` arriving in the
/// via city (`leg1.destination()`).
///
/// The result flies origin to via, the whole of `leg2`, then the rest of
/// `leg1` back home. Prices and durations are summed, offer ids joined.
///
/// # Errors
///
/// Returns [`DomainError::SpliceNotFound`] if no leg of `leg1` arrives in the
/// via city, [`DomainError::DurationOverflow`] if the summed duration is out
/// of range.
pub fn combine_alternative(
    leg1: &FlightItinerary,
    leg2: &FlightItinerary,
) -> Result<FlightItinerary, DomainError> {
    let via = leg1.destination();
    let split = leg1
        .first_arrival_in(via)
        .ok_or(DomainError::SpliceNotFound(via))?;
    let (head, tail) = leg1.legs().split_at(split + 1);

    let mut legs = Vec::with_capacity(leg1.leg_count() + leg2.leg_count());
    legs.extend_from_slice(head);
    legs.extend_from_slice(leg2.legs());
    legs.extend_from_slice(tail);

    Ok(FlightItinerary::from_parts(
        legs,
        leg1.total_price() + leg2.total_price(),
        add_durations(leg1.total_duration(), leg2.total_duration())?,
        leg1.origin(),
        leg2.destination(),
        leg1.offer().joined(leg2.offer()),
    ))
}
