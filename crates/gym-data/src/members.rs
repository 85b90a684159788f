use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    Query, Retrieve, Update, ValidationError, MAX_DURATION_MONTHS,
    MIN_DURATION_MONTHS,
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemberFilter {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    pub contact: String,
    pub last_paid_at: Option<NaiveDateTime>,
    pub payment_duration_months: u8,
}

impl Default for Member {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            contact: String::new(),
            last_paid_at: None,
            payment_duration_months: MIN_DURATION_MONTHS,
        }
    }
}

/// Input of the add member form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub contact: String,
    pub payment_duration_months: u8,
}

impl NewMember {
    /// Check the form before anything is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.contact.trim().is_empty() {
            return Err(ValidationError::EmptyContact);
        }
        let range = MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS;
        if !range.contains(&self.payment_duration_months) {
            return Err(ValidationError::DurationOutOfRange(
                self.payment_duration_months,
            ));
        }
        Ok(())
    }
}

impl From<NewMember> for Member {
    fn from(new: NewMember) -> Self {
        Member {
            name: new.name,
            contact: new.contact,
            payment_duration_months: new.payment_duration_months,
            last_paid_at: None,
            ..Default::default()
        }
    }
}

/// A partial update of the mutable member fields.
/// `last_paid_at: Some(None)` clears the payment date.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub last_paid_at: Option<Option<NaiveDateTime>>,
    pub payment_duration_months: Option<u8>,
}

impl MemberUpdate {
    /// Mark a member as paid at the given time.
    pub fn paid_at(at: NaiveDateTime) -> Self {
        Self {
            last_paid_at: Some(Some(at)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the update to a member. The id is never touched.
    pub fn apply(self, member: Member) -> Member {
        Member {
            id: member.id,
            name: self.name.unwrap_or(member.name),
            contact: self.contact.unwrap_or(member.contact),
            last_paid_at: self.last_paid_at.unwrap_or(member.last_paid_at),
            payment_duration_months: self
                .payment_duration_months
                .unwrap_or(member.payment_duration_months),
        }
    }
}

/// Look up a member by id. An unknown id is not an error here.
pub async fn find_member<DB>(db: &DB, id: u32) -> Result<Option<Member>>
where
    DB: Query<Member, Filter = MemberFilter>,
{
    let mut members = db
        .query(&MemberFilter {
            id: Some(id),
            ..Default::default()
        })
        .await?;
    Ok(members.pop())
}

/// Fetch the member, apply the partial update and store it.
pub async fn update_member<DB>(
    db: &DB,
    id: u32,
    update: MemberUpdate,
) -> Result<Member>
where
    DB: Retrieve<Member, Key = u32> + Update<Member>,
{
    let member: Member = db.retrieve(id).await?;
    db.update(update.apply(member)).await
}

/// Set the last payment of a member to `now`.
pub async fn mark_paid<DB>(db: &DB, id: u32, now: NaiveDateTime) -> Result<Member>
where
    DB: Retrieve<Member, Key = u32> + Update<Member>,
{
    update_member(db, id, MemberUpdate::paid_at(now)).await
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn paid_at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_new_member_validate() {
        let new = NewMember {
            name: "Arnold".to_string(),
            contact: "+491701234567".to_string(),
            payment_duration_months: 1,
        };
        assert_eq!(new.validate(), Ok(()));

        let empty_name = NewMember {
            name: "  ".to_string(),
            ..new.clone()
        };
        assert_eq!(empty_name.validate(), Err(ValidationError::EmptyName));

        let empty_contact = NewMember {
            contact: "".to_string(),
            ..new.clone()
        };
        assert_eq!(
            empty_contact.validate(),
            Err(ValidationError::EmptyContact)
        );

        let too_long = NewMember {
            payment_duration_months: 13,
            ..new.clone()
        };
        assert_eq!(
            too_long.validate(),
            Err(ValidationError::DurationOutOfRange(13))
        );
        let zero = NewMember {
            payment_duration_months: 0,
            ..new
        };
        assert_eq!(zero.validate(), Err(ValidationError::DurationOutOfRange(0)));
    }

    #[test]
    fn test_new_member_into_member() {
        let member: Member = NewMember {
            name: "Arnold".to_string(),
            contact: "+491701234567".to_string(),
            payment_duration_months: 3,
        }
        .into();
        assert_eq!(member.name, "Arnold");
        assert_eq!(member.contact, "+491701234567");
        assert_eq!(member.payment_duration_months, 3);
        assert_eq!(member.last_paid_at, None);
    }

    #[test]
    fn test_member_default_duration() {
        assert_eq!(Member::default().payment_duration_months, 1);
    }

    #[test]
    fn test_member_update_apply() {
        let member = Member {
            id: 23,
            name: "Arnold".to_string(),
            contact: "+49170".to_string(),
            last_paid_at: Some(paid_at(2024, 3, 1)),
            payment_duration_months: 6,
        };

        let update = MemberUpdate {
            name: Some("Arnie".to_string()),
            ..Default::default()
        };
        let updated = update.apply(member.clone());
        assert_eq!(updated.id, 23);
        assert_eq!(updated.name, "Arnie");
        assert_eq!(updated.contact, "+49170");
        assert_eq!(updated.last_paid_at, member.last_paid_at);
        assert_eq!(updated.payment_duration_months, 6);

        // Clearing the payment date
        let update = MemberUpdate {
            last_paid_at: Some(None),
            ..Default::default()
        };
        assert_eq!(update.apply(member.clone()).last_paid_at, None);

        let update = MemberUpdate::paid_at(paid_at(2024, 4, 2));
        assert_eq!(
            update.apply(member).last_paid_at,
            Some(paid_at(2024, 4, 2))
        );
    }

    #[test]
    fn test_member_update_is_empty() {
        assert!(MemberUpdate::default().is_empty());
        assert!(!MemberUpdate::paid_at(paid_at(2024, 1, 1)).is_empty());
    }
}
