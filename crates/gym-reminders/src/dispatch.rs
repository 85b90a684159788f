use chrono::NaiveDateTime;

use gym_data::Member;
use gym_payments::is_unpaid;

use crate::{Message, Transport};

/// The reminder text for a member
pub fn reminder_message(member: &Member) -> String {
    format!(
        "Hello {}, please pay your gym fees for this month.",
        member.name
    )
}

/// Outcome of a reminder run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReminderReport {
    /// Ids of members a reminder was sent to
    pub sent: Vec<u32>,
    /// Ids of members where sending failed, with the reason
    pub failed: Vec<(u32, String)>,
}

impl ReminderReport {
    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed.len()
    }
}

/// Send a reminder to every unpaid member.
///
/// Messages are sent one after another. A failed send is
/// logged and recorded in the report, the remaining members
/// are still reminded. Nothing is retried.
pub async fn send_reminders<T>(
    transport: &T,
    sender: &str,
    members: &[Member],
    now: NaiveDateTime,
) -> ReminderReport
where
    T: Transport + ?Sized,
{
    let mut report = ReminderReport::default();
    for member in members.iter().filter(|m| is_unpaid(m, now)) {
        let message = Message {
            body: reminder_message(member),
            from: sender.to_string(),
            to: member.contact.clone(),
        };
        match transport.send(&message).await {
            Ok(()) => {
                log::info!("sent reminder to {} ({})", member.name, member.contact);
                report.sent.push(member.id);
            }
            Err(e) => {
                log::warn!(
                    "could not send reminder to {} ({}): {}",
                    member.name,
                    member.contact,
                    e
                );
                report.failed.push((member.id, e.to_string()));
            }
        }
    }
    report
}
