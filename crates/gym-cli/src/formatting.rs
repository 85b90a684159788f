use chrono::NaiveDateTime;

use gym_data::Member;
use gym_payments::is_paid_in_month;

macro_rules! next_attr {
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

/// Date of the last payment or "Not Paid"
pub fn format_last_paid(last_paid_at: Option<NaiveDateTime>) -> String {
    match last_paid_at {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "Not Paid".to_string(),
    }
}

/// Roster status: paid in the current calendar month
pub fn format_fees_paid(member: &Member, now: NaiveDateTime) -> &'static str {
    if is_paid_in_month(member, now) {
        "Yes"
    } else {
        "No"
    }
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        println!("ID:\t\t\t{}", self.id);
        println!("Name:\t\t\t{}", self.name);
        println!("Contact:\t\t{}", self.contact);
        println!("Last Paid:\t\t{}", format_last_paid(self.last_paid_at));
        println!("Duration (months):\t{}", self.payment_duration_months);
    }
}

impl PrintFormatted for (Member, Member) {
    fn print_formatted(&self) {
        let (old, new) = self;
        let last_paid_old = format_last_paid(old.last_paid_at);
        let last_paid_new = format_last_paid(new.last_paid_at);

        println!("ID:\t\t\t{}", old.id);
        let next_name = next_attr!(old, new, name);
        println!("Name:\t\t\t{}{}", old.name, next_name);
        let next_contact = next_attr!(old, new, contact);
        println!("Contact:\t\t{}{}", old.contact, next_contact);
        // Compare timestamps, re-paying on the same day is a change too
        let next_last_paid = if old.last_paid_at != new.last_paid_at {
            format!(" -> {}", last_paid_new)
        } else {
            "".to_string()
        };
        println!("Last Paid:\t\t{}{}", last_paid_old, next_last_paid);
        let next_duration = next_attr!(old, new, payment_duration_months);
        println!(
            "Duration (months):\t{}{}",
            old.payment_duration_months, next_duration
        );
    }
}

/// Table of members with an overdue payment
pub struct UnpaidTable<'a>(pub &'a [Member]);

impl PrintFormatted for UnpaidTable<'_> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:<20}\t{:>17}\t{}",
            "ID", "Name", "Contact", "Duration (months)", "Last Paid Date"
        );
        println!("{:-<100}", "-");
        for member in self.0 {
            println!(
                "{:>4}\t{:<24}\t{:<20}\t{:>17}\t{}",
                member.id,
                member.name,
                member.contact,
                member.payment_duration_months,
                format_last_paid(member.last_paid_at)
            );
        }
    }
}

/// Read-only list of all members
pub struct RosterTable<'a> {
    pub members: &'a [Member],
    pub now: NaiveDateTime,
}

impl PrintFormatted for RosterTable<'_> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:<20}\t{:<9}\t{:<14}\t{}",
            "ID", "Name", "Contact", "Fees Paid", "Last Paid Date", "Payment Duration"
        );
        println!("{:-<120}", "-");
        for member in self.members {
            println!(
                "{:>4}\t{:<24}\t{:<20}\t{:<9}\t{:<14}\t{}",
                member.id,
                member.name,
                member.contact,
                format_fees_paid(member, self.now),
                format_last_paid(member.last_paid_at),
                member.payment_duration_months
            );
        }
    }
}
