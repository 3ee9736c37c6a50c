//! ledgerdesk command-line front end

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use ledgerdesk_config::Config;
use ledgerdesk_core::{
    CoreError, CounterpartyDraft, Ledger, LedgerFilter, LedgerOperations, Session, TransactionDraft,
    TransactionView,
};
use ledgerdesk_remote::HttpRemoteStore;
use ledgerdesk_utils::{format_amount, SecretSequence};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "ledgerdesk")]
#[command(version = "0.1.0")]
#[command(about = "Counterparties, credit/debit ledger and balances over a bookkeeping service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "ledgerdesk.yaml")]
    config: PathBuf,

    /// Username to sign in with
    #[arg(short, long, env = "LEDGERDESK_USER")]
    user: Option<String>,

    /// Password to sign in with
    #[arg(short, long, env = "LEDGERDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counterparty count, transaction count and overall balance
    Summary,
    /// List counterparties
    Parties,
    /// Create a counterparty
    AddParty {
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// List every transaction
    Transactions,
    /// Filtered ledger with totals
    Ledger {
        #[arg(long)]
        party: Option<i64>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Transactions of one day (today by default)
    Register {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record a transaction
    Add(TransactionArgs),
    /// Edit a transaction; omitted fields keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction
    Delete { id: i64 },
    /// Show one transaction
    Show { id: i64 },
    /// List user accounts (admin)
    Users,
    /// Revoke a user account (admin)
    Revoke { id: i64 },
    /// Erase all server data (admin)
    Wipe {
        #[arg(long)]
        yes: bool,
    },
    /// Feed keys to the unlock sequence detector
    Unlock { keys: Vec<String> },
    /// Write a default configuration file
    InitConfig {
        /// Destination; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct TransactionArgs {
    #[arg(long)]
    party: Option<i64>,
    /// Credit or Debit
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

impl TransactionArgs {
    /// Draft for a new transaction
    fn into_draft(self) -> TransactionDraft {
        TransactionDraft {
            counterparty_id: self.party,
            transaction_type: self.kind,
            amount: self.amount.unwrap_or_default(),
            date: self.date,
            description: self.description.unwrap_or_default(),
        }
    }

    /// Draft for an edit, starting from the cached record
    fn over(self, current: &TransactionView) -> TransactionDraft {
        TransactionDraft {
            counterparty_id: self.party.or(Some(current.counterparty_id)),
            transaction_type: self.kind.or_else(|| Some(current.transaction_type.to_string())),
            amount: self.amount.unwrap_or_else(|| current.amount.to_string()),
            date: self.date.or(Some(current.day())),
            description: self.description.unwrap_or_else(|| current.description.clone()),
        }
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        match e.downcast_ref::<CoreError>() {
            Some(core) => eprintln!("{}", core.to_details()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if let Command::InitConfig { output, force } = &args.command {
        return init_config(output.as_ref(), *force);
    }

    let config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();
    log::debug!("Remote store at {}", config.remote.base_url);

    if let Command::Unlock { keys } = &args.command {
        return unlock(&config, keys);
    }

    let rt = Runtime::new()?;
    rt.block_on(dispatch(args, config))
}

fn init_config(output: Option<&PathBuf>, force: bool) -> anyhow::Result<()> {
    let template = Config::generate_default();
    match output {
        None => print!("{}", template),
        Some(path) => {
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            std::fs::write(path, template)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn unlock(config: &Config, keys: &[String]) -> anyhow::Result<()> {
    let mut detector = SecretSequence::new(&config.unlock.sequence)?;
    let fired = keys.iter().map(|k| detector.push_str(k)).sum::<usize>();
    if fired > 0 {
        println!("Unlocked");
    } else {
        println!("Locked");
    }
    Ok(())
}

async fn dispatch(args: Args, config: Config) -> anyhow::Result<()> {
    let places = config.display.decimal_places;
    let json = args.json;

    let store = Arc::new(HttpRemoteStore::new(config.clone())?);
    let username = args.user.unwrap_or_default();
    let password = args.password.unwrap_or_default();
    let session = Session::login(store.as_ref(), &config.auth, &username, &password).await?;

    let mut ledger = Ledger::new(store);
    ledger.load_all(session.is_admin()).await?;

    match args.command {
        Command::Summary => {
            let summary = ledger.summary();
            if json {
                return print_json(&summary);
            }
            println!("Counterparties: {}", summary.counterparty_count);
            println!("Transactions:   {}", summary.transaction_count);
            println!("Total credit:   {}", format_amount(summary.totals.total_credit, places));
            println!("Total debit:    {}", format_amount(summary.totals.total_debit, places));
            println!("Balance:        {}", format_amount(summary.totals.balance, places));
        }
        Command::Parties => {
            if json {
                return print_json(&ledger.counterparties());
            }
            for party in ledger.counterparties() {
                println!("{:>6}  {:<24} {:<24} {}", party.id, party.name, party.address, party.phone);
            }
        }
        Command::AddParty { name, address, phone } => {
            let draft = CounterpartyDraft::new(&name).with_address(&address).with_phone(&phone);
            ledger.create_counterparty(&draft).await?;
            ledger.refresh_counterparties().await?;
            println!("Counterparty {} added ({} total)", name.trim(), ledger.counterparties().len());
        }
        Command::Transactions => {
            let transactions = ledger.transactions().to_vec();
            if json {
                return print_json(&transactions);
            }
            print_transactions(&transactions, places);
        }
        Command::Ledger { party, from, to } => {
            let filter = LedgerFilter { counterparty_id: party, from, to };
            let report = ledger.ledger(&filter);
            if json {
                return print_json(&report);
            }
            println!("{}", report.period);
            print_transactions(&report.transactions, places);
            println!(
                "Credit {}  Debit {}  Balance {}",
                format_amount(report.totals.total_credit, places),
                format_amount(report.totals.total_debit, places),
                format_amount(report.totals.balance, places)
            );
        }
        Command::Register { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let register = ledger.by_exact_date(date);
            if json {
                return print_json(&register);
            }
            println!("{}", register.date);
            print_transactions(&register.transactions, places);
            println!(
                "Credit {}  Debit {}",
                format_amount(register.total_credit, places),
                format_amount(register.total_debit, places)
            );
        }
        Command::Add(fields) => {
            ledger.create_transaction(&fields.into_draft()).await?;
            ledger.refresh_transactions().await?;
            println!("Transaction recorded ({} total)", ledger.transactions().len());
        }
        Command::Edit { id, fields } => {
            let draft = fields.over(ledger.require_transaction(id)?);
            ledger.update_transaction(id, &draft).await?;
            let view = ledger.require_transaction(id)?;
            print_transactions(std::slice::from_ref(view), places);
        }
        Command::Delete { id } => {
            ledger.require_transaction(id)?;
            ledger.delete_transaction(id).await?;
            println!("Transaction {} deleted", id);
        }
        Command::Show { id } => {
            ledger.refresh_transaction(id).await?;
            let view = ledger.require_transaction(id)?;
            if json {
                return print_json(view);
            }
            print_transactions(std::slice::from_ref(view), places);
            if !view.description.is_empty() {
                println!("        {}", view.description);
            }
        }
        Command::Users => {
            session.require_admin()?;
            if json {
                return print_json(&ledger.accounts());
            }
            for account in ledger.accounts() {
                let status = if account.is_active { "active" } else { "revoked" };
                println!("{:>6}  {:<20} {:<10} {}", account.id, account.username, account.role.as_str(), status);
            }
        }
        Command::Revoke { id } => {
            session.require_admin()?;
            ledger.revoke_account(id).await?;
            println!("Account {} revoked", id);
        }
        Command::Wipe { yes } => {
            session.require_admin()?;
            if !yes {
                bail!("Refusing to erase all server data without --yes");
            }
            ledger.wipe_remote().await?;
            println!("All data erased");
        }
        Command::Unlock { .. } | Command::InitConfig { .. } => {}
    }

    Ok(())
}

fn print_transactions(transactions: &[TransactionView], places: u32) {
    for tx in transactions {
        println!(
            "{:>6}  {}  {:<20} {:<7} {:>14}",
            tx.id,
            tx.day(),
            tx.counterparty_name,
            tx.transaction_type.as_str(),
            format_amount(tx.amount, places)
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
