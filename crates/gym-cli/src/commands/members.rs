
use std::fmt;

use anyhow::{Error, Result};
use chrono::NaiveDateTime;
use clap::Args;
use inquire::{Confirm, Select};

use gym_data::{
    mark_paid, update_member, Insert, Member, MemberFilter, NewMember, Query,
    Retrieve, MAX_DURATION_MONTHS, MIN_DURATION_MONTHS,
};
use gym_db::{Connection, QueryError};
use gym_payments::{datetime, unpaid_members};

use crate::{
    dialogs::{EditOutcome, EditRequest},
    formatting::{format_last_paid, PrintFormatted, RosterTable, UnpaidTable},
};

/// Name the member in not found errors, keep other errors as they are.
fn member_not_found(id: u32) -> impl FnOnce(Error) -> Error {
    move |err| match err.downcast_ref::<QueryError>() {
        Some(QueryError::NotFound) => {
            err.context(format!("Member {} not found", id))
        }
        _ => err,
    }
}

/// Fetch all members
async fn all_members(db: &Connection) -> Result<Vec<Member>> {
    db.query(&MemberFilter::default()).await
}

#[derive(Args, Debug)]
pub struct AddMember {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub contact: String,
    /// Payment duration in months
    #[clap(
        short,
        long,
        default_value_t = MIN_DURATION_MONTHS,
        value_parser = clap::value_parser!(u8).range(
            MIN_DURATION_MONTHS as i64..=MAX_DURATION_MONTHS as i64)
    )]
    pub duration: u8,
}

impl AddMember {
    /// Validate the input and create the member
    pub async fn execute(self, db: &Connection) -> Result<Member> {
        let new = NewMember {
            name: self.name,
            contact: self.contact,
            payment_duration_months: self.duration,
        };
        new.validate()?;
        db.insert(new.into()).await
    }

    /// Run the command and add a member to the database
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member = self.execute(db).await?;
        println!("Member {} added with id {}.", member.name, member.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListUnpaid {}

impl ListUnpaid {
    pub async fn execute(
        &self,
        db: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Member>> {
        let members = all_members(db).await?;
        Ok(unpaid_members(&members, now))
    }

    /// Run the command and list unpaid members
    pub async fn run(self, db: &Connection) -> Result<()> {
        let members = self.execute(db, datetime::now()).await?;
        println!("{} unpaid members.", members.len());
        UnpaidTable(&members).print_formatted();
        Ok(())
    }
}

/// A row of the unpaid members selection
struct UnpaidChoice(Member);

impl fmt::Display for UnpaidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}  {}  ({}, last paid: {})",
            self.0.id,
            self.0.name,
            self.0.contact,
            format_last_paid(self.0.last_paid_at)
        )
    }
}

#[derive(Args, Debug)]
pub struct PayMember {
    /// Member to mark as paid, select from the unpaid members if omitted
    #[clap(short, long)]
    pub id: Option<u32>,
}

impl PayMember {
    /// Mark the fees of a member as paid at `now`
    pub async fn execute(
        &self,
        db: &Connection,
        id: u32,
        now: NaiveDateTime,
    ) -> Result<Member> {
        mark_paid(db, id, now).await.map_err(member_not_found(id))
    }

    /// Pick a member from the unpaid table
    async fn select(&self, db: &Connection, now: NaiveDateTime) -> Result<Option<u32>> {
        let unpaid = ListUnpaid {}.execute(db, now).await?;
        if unpaid.is_empty() {
            return Ok(None);
        }
        let choices: Vec<UnpaidChoice> = unpaid.into_iter().map(UnpaidChoice).collect();
        let choice = Select::new("Mark fees as paid for:", choices).prompt_skippable()?;
        Ok(choice.map(|c| c.0.id))
    }

    /// Run the command and mark a member as paid
    pub async fn run(self, db: &Connection) -> Result<()> {
        let now = datetime::now();
        let id = match self.id {
            Some(id) => id,
            None => match self.select(db, now).await? {
                Some(id) => id,
                None => {
                    println!("No member selected.");
                    return Ok(());
                }
            },
        };
        let member = self.execute(db, id, now).await?;
        println!("Fees marked as paid for {}!", member.name);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub contact: Option<String>,
    /// Print the members as JSON
    #[clap(long)]
    pub json: bool,
}

impl ListMembers {
    pub async fn execute(&self, db: &Connection) -> Result<Vec<Member>> {
        let filter = MemberFilter {
            name: self.name.clone(),
            contact: self.contact.clone(),
            ..Default::default()
        };
        db.query(&filter).await
    }

    /// Run the command and list members
    pub async fn run(self, db: &Connection) -> Result<()> {
        let members = self.execute(db).await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&members)?);
            return Ok(());
        }

        println!("{} members.", members.len());
        RosterTable {
            members: &members,
            now: datetime::now(),
        }
        .print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    #[clap(short, long)]
    pub id: u32,
}

impl ShowMember {
    /// Run the command and show a member
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db
            .retrieve(self.id)
            .await
            .map_err(member_not_found(self.id))?;
        println!();
        member.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct EditMember {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub contact: Option<String>,
    /// Record a payment now
    #[clap(long, conflicts_with = "unpaid")]
    pub paid: bool,
    /// Clear the last payment
    #[clap(long)]
    pub unpaid: bool,
    /// Save without asking
    #[clap(short, long)]
    pub yes: bool,
}

impl EditMember {
    /// Without any field options the dialog asks for everything.
    fn is_interactive(&self) -> bool {
        self.name.is_none() && self.contact.is_none() && !self.paid && !self.unpaid
    }

    /// The request given by command line options
    pub fn request(&self) -> EditRequest {
        let paid = match (self.paid, self.unpaid) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        EditRequest {
            name: self.name.clone().unwrap_or_default(),
            contact: self.contact.clone().unwrap_or_default(),
            paid,
        }
    }

    /// Apply an edit request to a member. `confirm` sees the old
    /// and the new member and decides if the changes are saved.
    pub async fn execute<F>(
        db: &Connection,
        member: Member,
        request: EditRequest,
        now: NaiveDateTime,
        confirm: F,
    ) -> Result<EditOutcome>
    where
        F: FnOnce(&Member, &Member) -> Result<bool>,
    {
        let update = request.into_update(now);
        let edited = update.clone().apply(member.clone());
        if !confirm(&member, &edited)? {
            return Ok(EditOutcome::Cancelled);
        }
        let member = update_member(db, member.id, update)
            .await
            .map_err(member_not_found(member.id))?;
        Ok(EditOutcome::Saved(member))
    }

    /// Run the edit dialog
    pub async fn run(self, db: &Connection) -> Result<()> {
        let now = datetime::now();
        let member: Member = db
            .retrieve(self.id)
            .await
            .map_err(member_not_found(self.id))?;

        let request = if self.is_interactive() {
            EditRequest::prompt(&member, now)?
        } else {
            self.request()
        };

        let skip_confirm = self.yes;
        let outcome = Self::execute(db, member, request, now, |old, new| {
            println!();
            (old.clone(), new.clone()).print_formatted();
            println!();
            if skip_confirm {
                return Ok(true);
            }
            let ok = Confirm::new("Save changes?").with_default(true).prompt()?;
            Ok(ok)
        })
        .await?;

        match outcome {
            EditOutcome::Saved(_) => println!("Member details updated successfully!"),
            EditOutcome::Cancelled => println!("Nothing changed."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, NaiveDate};
    use gym_data::ValidationError;
    use gym_db::open_test;
    use gym_payments::is_unpaid;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn add(name: &str, contact: &str, duration: u8) -> AddMember {
        AddMember {
            name: name.to_string(),
            contact: contact.to_string(),
            duration,
        }
    }

    #[tokio::test]
    async fn test_add_member() {
        let (_handle, db) = open_test().await;
        let member = add("Arnold", "+49170", 3).execute(&db).await.unwrap();

        let fetched: Member = db.retrieve(member.id).await.unwrap();
        assert_eq!(fetched.name, "Arnold");
        assert_eq!(fetched.contact, "+49170");
        assert_eq!(fetched.payment_duration_months, 3);
        assert_eq!(fetched.last_paid_at, None);
    }

    #[tokio::test]
    async fn test_add_member_validation() {
        let (_handle, db) = open_test().await;
        let err = add("", "+49170", 1).execute(&db).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyName)
        );
        let err = add("Arnold", "", 1).execute(&db).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyContact)
        );

        // Nothing was written
        assert!(all_members(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_unpaid() {
        let (_handle, db) = open_test().await;
        let never = add("Never", "+491", 1).execute(&db).await.unwrap();
        let recent = add("Recent", "+492", 1).execute(&db).await.unwrap();
        let overdue = add("Overdue", "+493", 1).execute(&db).await.unwrap();

        let pay = PayMember { id: None };
        pay.execute(&db, recent.id, now() - Duration::days(20))
            .await
            .unwrap();
        pay.execute(&db, overdue.id, now() - Duration::days(40))
            .await
            .unwrap();

        let unpaid: Vec<u32> = ListUnpaid {}
            .execute(&db, now())
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(unpaid, vec![never.id, overdue.id]);
    }

    #[tokio::test]
    async fn test_pay_member() {
        let (_handle, db) = open_test().await;
        let member = add("Arnold", "+49170", 1).execute(&db).await.unwrap();
        assert!(is_unpaid(&member, datetime::now()));

        let before = datetime::now();
        let pay = PayMember { id: Some(member.id) };
        let member = pay.execute(&db, member.id, datetime::now()).await.unwrap();
        assert!(member.last_paid_at.unwrap() >= before);
        assert!(!is_unpaid(&member, datetime::now()));
    }

    #[tokio::test]
    async fn test_pay_unknown_member() {
        let (_handle, db) = open_test().await;
        let pay = PayMember { id: Some(99) };
        let err = pay.execute(&db, 99, now()).await.unwrap_err();
        assert_eq!(err.to_string(), "Member 99 not found");
        assert_eq!(err.downcast_ref::<QueryError>(), Some(&QueryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_members_filter() {
        let (_handle, db) = open_test().await;
        add("Arnold", "+491", 1).execute(&db).await.unwrap();
        add("Franco", "+492", 1).execute(&db).await.unwrap();

        let all = ListMembers {
            name: None,
            contact: None,
            json: false,
        };
        assert_eq!(all.execute(&db).await.unwrap().len(), 2);

        let by_name = ListMembers {
            name: Some("fran".to_string()),
            contact: None,
            json: false,
        };
        let members = by_name.execute(&db).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Franco");
    }

    #[tokio::test]
    async fn test_edit_name_and_contact() {
        let (_handle, db) = open_test().await;
        let member = add("Arnold", "+49170", 6).execute(&db).await.unwrap();

        let request = EditRequest {
            name: "Arnie".to_string(),
            contact: "+49171".to_string(),
            paid: None,
        };
        let outcome = EditMember::execute(&db, member.clone(), request, now(), |_, _| Ok(true))
            .await
            .unwrap();
        let EditOutcome::Saved(edited) = outcome else {
            panic!("expected saved member");
        };
        assert_eq!(edited.id, member.id);
        assert_eq!(edited.name, "Arnie");
        assert_eq!(edited.contact, "+49171");
        assert_eq!(edited.payment_duration_months, 6);
        assert_eq!(edited.last_paid_at, None);
    }

    #[tokio::test]
    async fn test_edit_paid_toggle() {
        let (_handle, db) = open_test().await;
        let member = add("Arnold", "+49170", 1).execute(&db).await.unwrap();

        // Checking the toggle records a payment
        let request = EditRequest {
            name: "".to_string(),
            contact: "".to_string(),
            paid: Some(true),
        };
        let outcome = EditMember::execute(&db, member.clone(), request, now(), |_, _| Ok(true))
            .await
            .unwrap();
        let EditOutcome::Saved(paid) = outcome else {
            panic!("expected saved member");
        };
        assert_eq!(paid.last_paid_at, Some(now()));
        assert_eq!(paid.name, "Arnold");

        // Unchecking clears it again
        let request = EditRequest {
            name: "".to_string(),
            contact: "".to_string(),
            paid: Some(false),
        };
        let outcome = EditMember::execute(&db, paid, request, now(), |_, _| Ok(true))
            .await
            .unwrap();
        let EditOutcome::Saved(unpaid) = outcome else {
            panic!("expected saved member");
        };
        assert_eq!(unpaid.last_paid_at, None);
    }

    #[tokio::test]
    async fn test_edit_cancelled() {
        let (_handle, db) = open_test().await;
        let member = add("Arnold", "+49170", 1).execute(&db).await.unwrap();

        let request = EditRequest {
            name: "Arnie".to_string(),
            contact: "".to_string(),
            paid: Some(true),
        };
        let outcome = EditMember::execute(&db, member.clone(), request, now(), |old, new| {
            assert_eq!(old.name, "Arnold");
            assert_eq!(new.name, "Arnie");
            Ok(false)
        })
        .await
        .unwrap();
        assert_eq!(outcome, EditOutcome::Cancelled);

        let stored: Member = db.retrieve(member.id).await.unwrap();
        assert_eq!(stored, member);
    }

    #[test]
    fn test_edit_request_from_options() {
        let cmd = EditMember {
            id: 1,
            name: Some("Arnie".to_string()),
            contact: None,
            paid: false,
            unpaid: true,
            yes: true,
        };
        assert!(!cmd.is_interactive());
        assert_eq!(
            cmd.request(),
            EditRequest {
                name: "Arnie".to_string(),
                contact: "".to_string(),
                paid: Some(false),
            }
        );

        let cmd = EditMember {
            id: 1,
            name: None,
            contact: None,
            paid: false,
            unpaid: false,
            yes: false,
        };
        assert!(cmd.is_interactive());
        assert_eq!(cmd.request().paid, None);
    }
}
