
use anyhow::Result;

use gym_cli::cli::{Cli, Command};
use gym_db::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let cli = Cli::init();
    log::debug!("using members database {}", cli.members_db);

    let conn = Connection::open(&cli.members_db).await?;
    conn.migrate().await?;

    match cli.command {
        Command::Add(cmd) => cmd.run(&conn).await,
        Command::Unpaid(cmd) => cmd.run(&conn).await,
        Command::Pay(cmd) => cmd.run(&conn).await,
        Command::Remind(cmd) => cmd.run(&conn).await,
        Command::List(cmd) => cmd.run(&conn).await,
        Command::Show(cmd) => cmd.run(&conn).await,
        Command::Edit(cmd) => cmd.run(&conn).await,
    }?;

    Ok(())
}
