use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use folio_types::{DocumentId, DocumentKind, PaymentMethod, Period};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: document numbering, lifecycles and the merged ledger for small-business books",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Books data file (JSON snapshot)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty books file
    Init(InitArgs),
    /// Preview the next free number of a scheme
    Next(NextArgs),
    /// Record a new document
    Add(AddArgs),
    /// Show one document
    Show(IdArgs),
    /// Submit a receipt or payment for approval
    Submit(IdArgs),
    /// Post a document
    Post(IdArgs),
    /// Void or cancel a document
    Void(IdArgs),
    /// Assign a status directly
    Status(StatusArgs),
    /// Delete a document
    Delete(IdArgs),
    /// List the merged ledger of transactions and receipts
    Ledger(ListArgs),
    /// List payment vouchers
    Payments(ListArgs),
    /// Totals over the merged ledger
    Summary(FilterArgs),
    /// Serve the books over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing books file
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum NumberTarget {
    Transaction,
    Voucher,
    ReceiptVoucher,
    PaymentVoucher,
}

#[derive(Args)]
pub struct NextArgs {
    pub scheme: NumberTarget,
    /// Document kind, for transaction vouchers
    #[arg(long = "type")]
    pub kind: Option<DocumentKind>,
    /// Accounting period as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub period: Option<Period>,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(subcommand)]
    pub document: AddCommand,
}

#[derive(Subcommand)]
pub enum AddCommand {
    /// A generic transaction (receipt, payment, invoice or bill)
    Transaction(AddTransactionArgs),
    /// A receipt voucher
    Receipt(AddReceiptArgs),
    /// A payment voucher
    Payment(DocumentFields),
}

#[derive(Args)]
pub struct AddTransactionArgs {
    #[arg(long = "type")]
    pub kind: DocumentKind,
    #[arg(long)]
    pub period: Option<Period>,
    #[command(flatten)]
    pub fields: DocumentFields,
}

#[derive(Args)]
pub struct AddReceiptArgs {
    #[arg(long)]
    pub period: Option<Period>,
    #[command(flatten)]
    pub fields: DocumentFields,
}

#[derive(Args)]
pub struct DocumentFields {
    /// Counterparty: customer, supplier or other party
    #[arg(long)]
    pub name: String,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Decimal,
    /// Document date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long)]
    pub method: Option<PaymentMethod>,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: DocumentId,
}

#[derive(Args)]
pub struct StatusArgs {
    pub id: DocumentId,
    pub status: String,
}

#[derive(Args)]
pub struct FilterArgs {
    #[arg(long = "type")]
    pub kind: Option<DocumentKind>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
