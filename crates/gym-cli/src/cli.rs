
use clap::{Parser, Subcommand};

use crate::commands::{
    AddMember, EditMember, ListMembers, ListUnpaid, PayMember, SendReminders,
    ShowMember,
};

#[derive(Parser, Debug)]
#[clap(name = "gym", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(long, env = "GYM_MEMBERS_DB", default_value = "members.sqlite3")]
    pub members_db: String,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a member
    #[clap(name = "add")]
    Add(AddMember),
    /// List members with an overdue payment
    #[clap(name = "unpaid")]
    Unpaid(ListUnpaid),
    /// Mark the fees of a member as paid
    #[clap(name = "pay")]
    Pay(PayMember),
    /// Send reminders to all unpaid members
    #[clap(name = "remind")]
    Remind(SendReminders),
    /// List all members
    #[clap(name = "list")]
    List(ListMembers),
    /// Show a member
    #[clap(name = "show")]
    Show(ShowMember),
    /// Edit a member
    #[clap(name = "edit")]
    Edit(EditMember),
}
