
use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use clap::Args;

use gym_data::{Member, MemberFilter, Query};
use gym_db::Connection;
use gym_payments::datetime;
use gym_reminders::{
    send_reminders, Channel, DryRunTransport, Message, ReminderReport, Transport,
    TwilioConfig, TwilioTransport, DEFAULT_API_URL,
};

/// Messaging API settings
#[derive(Args, Debug)]
pub struct TransportArgs {
    #[clap(long, env = "TWILIO_ACCOUNT_SID", hide_env_values = true)]
    pub account_sid: Option<String>,
    #[clap(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,
    /// Sender number
    #[clap(long, env = "TWILIO_FROM")]
    pub from: Option<String>,
    #[clap(long, env = "REMINDER_CHANNEL", default_value_t = Channel::Whatsapp)]
    pub channel: Channel,
    #[clap(long, env = "TWILIO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

impl TransportArgs {
    fn required(value: &Option<String>, env: &str) -> Result<String> {
        value
            .clone()
            .ok_or_else(|| anyhow!("{} is not set", env))
    }

    /// Build the configured transport and sender address
    pub fn transport(&self) -> Result<(TwilioTransport, String)> {
        let config = TwilioConfig {
            api_url: self.api_url.clone(),
            account_sid: Self::required(&self.account_sid, "TWILIO_ACCOUNT_SID")?,
            auth_token: Self::required(&self.auth_token, "TWILIO_AUTH_TOKEN")?,
            channel: self.channel,
        };
        let from = Self::required(&self.from, "TWILIO_FROM")?;
        Ok((TwilioTransport::new(config)?, from))
    }
}

/// Send reminders to all members with an overdue payment
pub async fn remind_unpaid<T>(
    db: &Connection,
    transport: &T,
    sender: &str,
    now: NaiveDateTime,
) -> Result<ReminderReport>
where
    T: Transport + ?Sized,
{
    let members: Vec<Member> = db.query(&MemberFilter::default()).await?;
    Ok(send_reminders(transport, sender, &members, now).await)
}

/// One line per message a dry run would send
pub fn dry_run_line(message: &Message) -> String {
    format!("{}\t{}", message.to, message.body)
}

/// Summary of a reminder run
pub fn report_lines(report: &ReminderReport, dry_run: bool) -> Vec<String> {
    if report.attempted() == 0 {
        return vec!["No unpaid members, no reminders sent.".to_string()];
    }
    if dry_run {
        return vec![format!("{} reminders would be sent.", report.sent.len())];
    }

    let mut lines = vec![format!(
        "Reminders sent to {} unpaid members.",
        report.sent.len()
    )];
    if !report.failed.is_empty() {
        lines.push(format!(
            "{} reminders could not be sent:",
            report.failed.len()
        ));
        for (id, reason) in &report.failed {
            lines.push(format!("{:>4}\t{}", id, reason));
        }
    }
    lines
}

#[derive(Args, Debug)]
pub struct SendReminders {
    /// Print the messages instead of sending them
    #[clap(long)]
    pub dry_run: bool,

    #[clap(flatten)]
    pub transport: TransportArgs,
}

impl SendReminders {
    /// Run the command and send reminders
    pub async fn run(self, db: &Connection) -> Result<()> {
        let now = datetime::now();
        let report = if self.dry_run {
            let sender = self.transport.from.clone().unwrap_or_default();
            let transport = DryRunTransport::default();
            let report = remind_unpaid(db, &transport, &sender, now).await?;
            for message in transport.into_messages() {
                println!("{}", dry_run_line(&message));
            }
            report
        } else {
            let (transport, sender) = self.transport.transport()?;
            remind_unpaid(db, &transport, &sender, now).await?
        };

        for line in report_lines(&report, self.dry_run) {
            println!("{}", line);
        }
        Ok(())
    }
}
