use anyhow::Result;
use chrono::NaiveDateTime;
use inquire::{Confirm, Text};

use gym_data::{Member, MemberUpdate};
use gym_payments::is_paid_in_month;

/// What the edit dialog hands back on save.
/// An empty name or contact keeps the stored value.
/// `paid: None` leaves the last payment untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub name: String,
    pub contact: String,
    pub paid: Option<bool>,
}

/// Result of the modal edit dialog
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Saved(Member),
    Cancelled,
}

impl EditRequest {
    /// Ask for the new member details. The fees paid toggle
    /// starts checked if the member paid this calendar month.
    pub fn prompt(member: &Member, now: NaiveDateTime) -> Result<Self> {
        let name = Text::new("Name:").with_default(&member.name).prompt()?;
        let contact = Text::new("Contact:")
            .with_default(&member.contact)
            .prompt()?;
        let paid = Confirm::new("Fees paid?")
            .with_default(is_paid_in_month(member, now))
            .prompt()?;
        Ok(Self {
            name,
            contact,
            paid: Some(paid),
        })
    }

    /// Translate the dialog into a partial update. A checked toggle
    /// records a payment at `now`, an unchecked one clears it.
    pub fn into_update(self, now: NaiveDateTime) -> MemberUpdate {
        let non_empty = |s: String| {
            if s.trim().is_empty() {
                None
            } else {
                Some(s)
            }
        };
        MemberUpdate {
            name: non_empty(self.name),
            contact: non_empty(self.contact),
            last_paid_at: self.paid.map(|paid| paid.then_some(now)),
            payment_duration_months: None,
        }
    }
}
