use chrono::NaiveDateTime;

use gym_data::Member;

use crate::datetime::{whole_days, SameMonth};

/// A billing month is counted as 30 days, not as a calendar month.
pub const DAYS_PER_MONTH: i64 = 30;

/// Whole days since the last payment, `None` if the member never paid.
pub fn days_since_payment(member: &Member, now: NaiveDateTime) -> Option<i64> {
    member.last_paid_at.map(|paid| whole_days(paid, now))
}

/// Is the payment of a member overdue?
/// A member who never paid is unpaid. Otherwise the member
/// is unpaid once more days than the payment duration
/// (in 30 day months) have passed since the last payment.
pub fn is_unpaid(member: &Member, now: NaiveDateTime) -> bool {
    match days_since_payment(member, now) {
        None => true,
        Some(days) => {
            days > member.payment_duration_months as i64 * DAYS_PER_MONTH
        }
    }
}

/// Did the member pay within the calendar month of `now`?
///
/// This is the status shown in the member roster. It is not the
/// same as `!is_unpaid`: a payment made at the end of last month
/// is still within the billing period, but not in this month.
pub fn is_paid_in_month(member: &Member, now: NaiveDateTime) -> bool {
    member
        .last_paid_at
        .map(|paid| paid.same_month(&now))
        .unwrap_or(false)
}

/// All members with an overdue payment, in roster order.
pub fn unpaid_members(members: &[Member], now: NaiveDateTime) -> Vec<Member> {
    members
        .iter()
        .filter(|m| is_unpaid(m, now))
        .cloned()
        .collect()
}
