use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use serde_json::json;

use folio_ledger::{
    Books, BooksSnapshot, Deletion, Document, LedgerFilter, LifecycleAction, NewPayment,
    NewReceipt, NewTransaction,
};
use folio_server::FolioServer;
use folio_store::{load_json, save_json, SnapshotLock};
use folio_types::{AccountRef, Period};

use crate::cli::*;
use crate::config::CliConfig;

/// Used when neither `--data` nor the config names a books file.
pub const DEFAULT_DATA_FILE: &str = "folio.json";

struct Session {
    data_file: PathBuf,
    config: CliConfig,
    format: OutputFormat,
}

impl Session {
    fn open_books(&self) -> anyhow::Result<Books> {
        if !self.data_file.exists() {
            bail!(
                "no books at {}; run `folio init` first",
                self.data_file.display()
            );
        }
        let snapshot: BooksSnapshot = load_json(&self.data_file)
            .with_context(|| format!("reading {}", self.data_file.display()))?;
        Ok(Books::from_snapshot(snapshot, self.config.books.clone())?)
    }

    /// Load the books for a command that saves them back. Keep the lock
    /// until [`save_books`](Self::save_books) has returned.
    fn lock_books(&self) -> anyhow::Result<(SnapshotLock, Books)> {
        let lock = self.lock()?;
        Ok((lock, self.open_books()?))
    }

    fn lock(&self) -> anyhow::Result<SnapshotLock> {
        SnapshotLock::acquire(&self.data_file)
            .with_context(|| format!("locking {}", self.data_file.display()))
    }

    fn save_books(&self, books: &Books) -> anyhow::Result<()> {
        save_json(&self.data_file, &books.snapshot()?)
            .with_context(|| format!("writing {}", self.data_file.display()))
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => text(),
        }
        Ok(())
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        data,
        config,
        format,
        ..
    } = cli;
    let config = CliConfig::load(config.as_deref())?;
    let data_file = data
        .or_else(|| config.data_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
    let session = Session {
        data_file,
        config,
        format,
    };

    match command {
        Command::Init(args) => cmd_init(&session, args),
        Command::Next(args) => cmd_next(&session, args),
        Command::Add(args) => cmd_add(&session, args.document),
        Command::Show(args) => cmd_show(&session, args),
        Command::Submit(args) => cmd_transition(&session, args, LifecycleAction::Submit),
        Command::Post(args) => cmd_transition(&session, args, LifecycleAction::Post),
        Command::Void(args) => cmd_transition(&session, args, LifecycleAction::Void),
        Command::Status(args) => cmd_status(&session, args),
        Command::Delete(args) => cmd_delete(&session, args),
        Command::Ledger(args) => cmd_ledger(&session, args),
        Command::Payments(args) => cmd_payments(&session, args),
        Command::Summary(args) => cmd_summary(&session, args),
        Command::Serve(args) => cmd_serve(&session, args),
    }
}

fn cmd_init(session: &Session, args: InitArgs) -> anyhow::Result<()> {
    let _lock = session.lock()?;
    if session.data_file.exists() && !args.force {
        bail!(
            "{} already exists (use --force to start over)",
            session.data_file.display()
        );
    }
    save_json(&session.data_file, &BooksSnapshot::default())?;
    session.emit(&json!({ "dataFile": session.data_file }), || {
        println!(
            "{} Initialized empty books in {}",
            "✓".green().bold(),
            session.data_file.display().to_string().bold()
        );
    })
}

fn cmd_next(session: &Session, args: NextArgs) -> anyhow::Result<()> {
    let books = session.open_books()?;
    let period = args.period.unwrap_or_else(Period::current);
    let number = match args.scheme {
        NumberTarget::Transaction => books.allocate_transaction_number(period)?,
        NumberTarget::Voucher => {
            let kind = args.kind.context("voucher numbers need --type")?;
            books.allocate_voucher_number(kind, period)?
        }
        NumberTarget::ReceiptVoucher => books.allocate_receipt_voucher_number()?,
        NumberTarget::PaymentVoucher => books.allocate_payment_voucher_number()?,
    };
    session.emit(&json!({ "number": number }), || {
        println!("{}", number.yellow().bold());
    })
}

fn cmd_add(session: &Session, document: AddCommand) -> anyhow::Result<()> {
    let (_lock, books) = session.lock_books()?;
    let created = match document {
        AddCommand::Transaction(args) => {
            let fields = args.fields;
            let date = fields.date.unwrap_or_else(today);
            let period = args.period.unwrap_or_else(|| Period::from_date(date));
            let draft = NewTransaction {
                kind: args.kind,
                date,
                name: fields.name,
                description: fields.description,
                account: fields.account.map(AccountRef::new),
                bank: fields.bank.map(AccountRef::new),
                amount: fields.amount,
                payment_method: fields.method.unwrap_or_default(),
            };
            Document::Transaction(books.create_transaction(draft, period)?)
        }
        AddCommand::Receipt(args) => {
            let fields = args.fields;
            let date = fields.date.unwrap_or_else(today);
            let period = args.period.unwrap_or_else(|| Period::from_date(date));
            let draft = NewReceipt {
                date,
                customer_name: fields.name,
                description: fields.description,
                account: fields.account.map(AccountRef::new),
                bank: fields.bank.map(AccountRef::new),
                amount: fields.amount,
                payment_method: fields.method.unwrap_or_default(),
            };
            Document::Receipt(books.create_receipt(draft, period)?)
        }
        AddCommand::Payment(fields) => {
            let draft = NewPayment {
                date: fields.date.unwrap_or_else(today),
                supplier_name: fields.name,
                description: fields.description,
                account: fields.account.map(AccountRef::new),
                bank: fields.bank.map(AccountRef::new),
                amount: fields.amount,
                payment_method: fields.method.unwrap_or_default(),
            };
            Document::Payment(books.create_payment(draft)?)
        }
    };
    session.save_books(&books)?;
    session.emit(&created, || {
        println!(
            "{} Created {} {}",
            "✓".green().bold(),
            created.kind(),
            numbers(&created).yellow().bold()
        );
        println!("  id: {}", created.id().to_string().dimmed());
    })
}

fn cmd_show(session: &Session, args: IdArgs) -> anyhow::Result<()> {
    let books = session.open_books()?;
    let document = books.get(&args.id)?;
    session.emit(&document, || print_document(&document))
}

fn cmd_transition(session: &Session, args: IdArgs, action: LifecycleAction) -> anyhow::Result<()> {
    let (_lock, books) = session.lock_books()?;
    let document = books.transition(&args.id, action)?;
    session.save_books(&books)?;
    session.emit(&document, || {
        println!(
            "{} {} is now {}",
            "✓".green().bold(),
            numbers(&document).yellow(),
            paint_status(&document.status())
        );
    })
}

fn cmd_status(session: &Session, args: StatusArgs) -> anyhow::Result<()> {
    let (_lock, books) = session.lock_books()?;
    let document = books.set_status(&args.id, &args.status)?;
    session.save_books(&books)?;
    session.emit(&document, || {
        println!(
            "{} {} set to {}",
            "✓".green().bold(),
            numbers(&document).yellow(),
            paint_status(&document.status())
        );
    })
}

fn cmd_delete(session: &Session, args: IdArgs) -> anyhow::Result<()> {
    let (_lock, books) = session.lock_books()?;
    let deletion = books.delete(&args.id)?;
    session.save_books(&books)?;
    session.emit(&json!({ "id": args.id, "deletion": deletion }), || match deletion {
        Deletion::Deactivated => println!(
            "{} Deactivated {} (its numbers stay taken)",
            "✓".green().bold(),
            args.id.short_id()
        ),
        Deletion::Removed => println!("{} Removed {}", "✓".green().bold(), args.id.short_id()),
    })
}

fn cmd_ledger(session: &Session, args: ListArgs) -> anyhow::Result<()> {
    let books = session.open_books()?;
    let mut entries = books.list_ledger(&ledger_filter(args.filter))?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    session.emit(&entries, || {
        if entries.is_empty() {
            println!("No entries.");
        }
        for entry in &entries {
            println!(
                "{}  {:<12} {:<10} {:<8} {} {:>12}  {}",
                entry.date,
                entry.transaction_number,
                entry.voucher_number,
                entry.kind.as_str(),
                paint_status(&format!("{:<10}", entry.status)),
                entry.amount.to_string(),
                entry.name
            );
        }
    })
}

fn cmd_payments(session: &Session, args: ListArgs) -> anyhow::Result<()> {
    let books = session.open_books()?;
    let mut payments = books.list_payments(&ledger_filter(args.filter))?;
    if let Some(limit) = args.limit {
        payments.truncate(limit);
    }
    session.emit(&payments, || {
        if payments.is_empty() {
            println!("No payments.");
        }
        for payment in &payments {
            println!(
                "{}  {:<8} {} {:>12}  {}",
                payment.date,
                payment.voucher_number,
                paint_status(&format!("{:<10}", payment.status.as_str())),
                payment.amount.to_string(),
                payment.supplier_name
            );
        }
    })
}

fn cmd_summary(session: &Session, args: FilterArgs) -> anyhow::Result<()> {
    let books = session.open_books()?;
    let summary = books.summarize(&ledger_filter(args))?;
    session.emit(&summary, || {
        println!(
            "{} entries, total {}",
            summary.total.count.to_string().bold(),
            summary.total.amount.to_string().bold()
        );
        if !summary.by_kind.is_empty() {
            println!("\nBy type:");
            for (kind, totals) in &summary.by_kind {
                println!(
                    "  {:<10} {:>5} {:>14}",
                    kind.as_str(),
                    totals.count,
                    totals.amount.to_string()
                );
            }
        }
        if !summary.by_status.is_empty() {
            println!("\nBy status:");
            for (status, totals) in &summary.by_status {
                println!(
                    "  {} {:>5} {:>14}",
                    paint_status(&format!("{status:<10}")),
                    totals.count,
                    totals.amount.to_string()
                );
            }
        }
    })
}

fn cmd_serve(session: &Session, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = session.config.server_for(&session.data_file);
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let server = FolioServer::open(config)?;
    println!(
        "Serving {} on {}",
        session.data_file.display().to_string().bold(),
        format!("http://{}", server.config().bind_addr).cyan()
    );
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

fn ledger_filter(args: FilterArgs) -> LedgerFilter {
    LedgerFilter {
        kind: args.kind,
        status: args.status,
        account: args.account.map(AccountRef::new),
        from: args.from,
        to: args.to,
        search: args.search,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn numbers(document: &Document) -> String {
    match document.transaction_number() {
        Some(txn) => format!("{txn} / {}", document.voucher_number()),
        None => document.voucher_number().to_string(),
    }
}

fn paint_status(label: &str) -> ColoredString {
    match label.trim() {
        "Draft" => label.yellow(),
        "Pending" => label.cyan(),
        "Posted" | "Completed" => label.green(),
        "Void" | "Cancelled" => label.red(),
        _ => label.normal(),
    }
}

fn print_document(document: &Document) {
    let (date, name, description) = match document {
        Document::Transaction(t) => (t.date, &t.name, &t.description),
        Document::Receipt(r) => (r.date, &r.customer_name, &r.description),
        Document::Payment(p) => (p.date, &p.supplier_name, &p.description),
    };
    println!("{} {}", document.kind().to_string().bold(), numbers(document).yellow().bold());
    println!("  id:      {}", document.id());
    println!("  store:   {}", document.store());
    println!("  status:  {}", paint_status(&document.status()));
    println!("  date:    {date}");
    println!("  name:    {name}");
    if !description.is_empty() {
        println!("  note:    {description}");
    }
    println!("  amount:  {}", document.amount());
    if let Document::Transaction(t) = document {
        if !t.is_active {
            println!("  {}", "deleted (inactive)".red());
        }
    }
}
