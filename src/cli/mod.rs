//! CLI module for the ConnectSphere command-line interface.
//!
//! With no subcommand the binary starts the HTTP API server. The
//! subcommands work directly on the workspace snapshot on disk:
//! - `contacts|leads|deals|activities list [--filter Q]` - List records
//! - `contacts|leads|deals|activities add ...` - Create a record
//! - `contacts|leads|deals|activities update <id> ...` - Edit a record
//! - `contacts|leads|deals|activities delete <id>` - Delete with cascades
//! - `deals move <id> <stage>` - Move a deal to another pipeline stage
//! - `pipeline` - Deal totals per stage
//! - `recent` - Latest activities
//! - `summary` - Workspace headline numbers
//! - `config check` - Validate configuration file

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::crm::{
    new_id, now_timestamp, Activity, ActivityType, Contact, CrmStore, Deal, DealStage,
    DeleteReport, EntityKind, FileKeyValueStore, Lead, LeadStatus, Record,
};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "connectsphere")]
#[command(author, version, about = "A small CRM: contacts, deals and client engagement", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CONNECTSPHERE_CONFIG", default_value = "connectsphere.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Contact management commands
    #[command(subcommand)]
    Contacts(ContactCommands),

    /// Lead management commands
    #[command(subcommand)]
    Leads(LeadCommands),

    /// Deal management commands
    #[command(subcommand)]
    Deals(DealCommands),

    /// Activity management commands
    #[command(subcommand)]
    Activities(ActivityCommands),

    /// Show deal totals for every pipeline stage
    Pipeline,

    /// Show the most recent activities
    Recent {
        /// Number of activities to show
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Show workspace headline numbers
    Summary,

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Contact subcommands
#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// List contacts, optionally narrowed by a case-insensitive search
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Create a contact
    Add(ContactFields),
    /// Change fields of an existing contact
    Update {
        /// Contact ID
        id: String,
        #[command(flatten)]
        changes: ContactChanges,
    },
    /// Delete a contact with its leads, deals and activities
    Delete {
        /// Contact ID
        id: String,
    },
}

/// Lead subcommands
#[derive(Subcommand, Debug)]
pub enum LeadCommands {
    /// List leads, optionally narrowed by a case-insensitive search
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Create a lead
    Add(LeadFields),
    /// Change fields of an existing lead
    Update {
        /// Lead ID
        id: String,
        #[command(flatten)]
        changes: LeadChanges,
    },
    /// Delete a lead
    Delete {
        /// Lead ID
        id: String,
    },
}

/// Deal subcommands
#[derive(Subcommand, Debug)]
pub enum DealCommands {
    /// List deals, optionally narrowed by a case-insensitive search
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Create a deal
    Add(DealFields),
    /// Change fields of an existing deal
    Update {
        /// Deal ID
        id: String,
        #[command(flatten)]
        changes: DealChanges,
    },
    /// Delete a deal and its activities
    Delete {
        /// Deal ID
        id: String,
    },
    /// Move a deal to another pipeline stage
    Move {
        /// Deal ID
        id: String,
        /// Target stage (new, contacted, proposal, negotiation, won, lost)
        stage: DealStage,
    },
}

/// Activity subcommands
#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// List activities, optionally narrowed by a case-insensitive search
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Log an activity
    Add(ActivityFields),
    /// Change fields of an existing activity
    Update {
        /// Activity ID
        id: String,
        #[command(flatten)]
        changes: ActivityChanges,
    },
    /// Delete an activity
    Delete {
        /// Activity ID
        id: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

// ============================================================================
// Record fields
// ============================================================================

/// An empty string clears an optional field
fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ContactFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub notes: Option<String>,
}

impl ContactFields {
    pub fn into_contact(self) -> Contact {
        Contact {
            id: new_id(),
            name: self.name,
            company: self.company,
            email: self.email,
            phone: self.phone,
            notes: self.notes.and_then(optional),
            created_at: now_timestamp(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ContactChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl ContactChanges {
    pub fn apply(self, contact: &mut Contact) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(company) = self.company {
            contact.company = company;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(notes) = self.notes {
            contact.notes = optional(notes);
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct LeadFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: String,
    /// cold, warm, hot, converted or lost
    #[arg(long, default_value = "cold")]
    pub status: LeadStatus,
    #[arg(long)]
    pub contact_id: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl LeadFields {
    pub fn into_lead(self) -> Lead {
        Lead {
            id: new_id(),
            name: self.name,
            company: self.company,
            status: self.status,
            contact_id: self.contact_id.and_then(optional),
            notes: self.notes.and_then(optional),
            created_at: now_timestamp(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LeadChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub status: Option<LeadStatus>,
    #[arg(long)]
    pub contact_id: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl LeadChanges {
    pub fn apply(self, lead: &mut Lead) {
        if let Some(name) = self.name {
            lead.name = name;
        }
        if let Some(company) = self.company {
            lead.company = company;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(contact_id) = self.contact_id {
            lead.contact_id = optional(contact_id);
        }
        if let Some(notes) = self.notes {
            lead.notes = optional(notes);
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DealFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: String,
    /// Amount such as 12000 or $4,500.50
    #[arg(long)]
    pub value: String,
    #[arg(long, default_value = "new")]
    pub stage: DealStage,
    #[arg(long)]
    pub contact_id: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl DealFields {
    pub fn into_deal(self) -> Deal {
        Deal {
            id: new_id(),
            name: self.name,
            company: self.company,
            value: self.value,
            stage: self.stage,
            contact_id: self.contact_id.and_then(optional),
            notes: self.notes.and_then(optional),
            created_at: now_timestamp(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DealChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub stage: Option<DealStage>,
    #[arg(long)]
    pub contact_id: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl DealChanges {
    pub fn apply(self, deal: &mut Deal) {
        if let Some(name) = self.name {
            deal.name = name;
        }
        if let Some(company) = self.company {
            deal.company = company;
        }
        if let Some(value) = self.value {
            deal.value = value;
        }
        if let Some(stage) = self.stage {
            deal.stage = stage;
        }
        if let Some(contact_id) = self.contact_id {
            deal.contact_id = optional(contact_id);
        }
        if let Some(notes) = self.notes {
            deal.notes = optional(notes);
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ActivityFields {
    /// call, meeting, email or note
    #[arg(long = "type", default_value = "call")]
    pub activity_type: ActivityType,
    #[arg(long)]
    pub notes: String,
    #[arg(long)]
    pub contact_id: Option<String>,
    #[arg(long)]
    pub deal_id: Option<String>,
}

impl ActivityFields {
    pub fn into_activity(self) -> Activity {
        Activity {
            id: new_id(),
            activity_type: self.activity_type,
            notes: self.notes,
            contact_id: self.contact_id.and_then(optional),
            deal_id: self.deal_id.and_then(optional),
            created_at: now_timestamp(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ActivityChanges {
    #[arg(long = "type")]
    pub activity_type: Option<ActivityType>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub contact_id: Option<String>,
    #[arg(long)]
    pub deal_id: Option<String>,
}

impl ActivityChanges {
    pub fn apply(self, activity: &mut Activity) {
        if let Some(activity_type) = self.activity_type {
            activity.activity_type = activity_type;
        }
        if let Some(notes) = self.notes {
            activity.notes = notes;
        }
        if let Some(contact_id) = self.contact_id {
            activity.contact_id = optional(contact_id);
        }
        if let Some(deal_id) = self.deal_id {
            activity.deal_id = optional(deal_id);
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Run a CLI command
pub fn run_command(cli: &Cli) -> Result<()> {
    let command = match &cli.command {
        Some(Commands::Config(ConfigCommands::Check)) => return cmd_config_check(cli),
        Some(command) => command,
        // No subcommand means start the server - this is handled in main.rs
        None => return Ok(()),
    };

    let config = Config::load(&cli.config)?;
    let mut store = open_workspace(&config)?;
    run_workspace_command(&mut store, command)
}

/// Run a subcommand against an already loaded workspace
pub fn run_workspace_command(store: &mut CrmStore, command: &Commands) -> Result<()> {
    match command {
        Commands::Contacts(cmd) => match cmd {
            ContactCommands::List { filter } => {
                apply_filter::<Contact>(store, filter.as_deref());
                print_contacts(&store.visible::<Contact>());
                Ok(())
            }
            ContactCommands::Add(fields) => cmd_add(store, fields.clone().into_contact()),
            ContactCommands::Update { id, changes } => {
                cmd_update::<Contact>(store, id, |c| changes.clone().apply(c))
            }
            ContactCommands::Delete { id } => cmd_delete(store, EntityKind::Contact, id),
        },
        Commands::Leads(cmd) => match cmd {
            LeadCommands::List { filter } => {
                apply_filter::<Lead>(store, filter.as_deref());
                print_leads(&store.visible::<Lead>());
                Ok(())
            }
            LeadCommands::Add(fields) => cmd_add(store, fields.clone().into_lead()),
            LeadCommands::Update { id, changes } => {
                cmd_update::<Lead>(store, id, |l| changes.clone().apply(l))
            }
            LeadCommands::Delete { id } => cmd_delete(store, EntityKind::Lead, id),
        },
        Commands::Deals(cmd) => match cmd {
            DealCommands::List { filter } => {
                apply_filter::<Deal>(store, filter.as_deref());
                print_deals(&store.visible::<Deal>());
                Ok(())
            }
            DealCommands::Add(fields) => cmd_add(store, fields.clone().into_deal()),
            DealCommands::Update { id, changes } => {
                cmd_update::<Deal>(store, id, |d| changes.clone().apply(d))
            }
            DealCommands::Delete { id } => cmd_delete(store, EntityKind::Deal, id),
            DealCommands::Move { id, stage } => cmd_move_deal(store, id, *stage),
        },
        Commands::Activities(cmd) => match cmd {
            ActivityCommands::List { filter } => {
                apply_filter::<Activity>(store, filter.as_deref());
                print_activities(store, &store.visible::<Activity>());
                Ok(())
            }
            ActivityCommands::Add(fields) => cmd_add(store, fields.clone().into_activity()),
            ActivityCommands::Update { id, changes } => {
                cmd_update::<Activity>(store, id, |a| changes.clone().apply(a))
            }
            ActivityCommands::Delete { id } => cmd_delete(store, EntityKind::Activity, id),
        },
        Commands::Pipeline => {
            cmd_pipeline(store);
            Ok(())
        }
        Commands::Recent { limit } => {
            print_activities(store, &store.recent_activities(*limit));
            Ok(())
        }
        Commands::Summary => {
            cmd_summary(store);
            Ok(())
        }
        Commands::Config(_) => Ok(()),
    }
}

/// Load the workspace snapshot from the configured directory
pub fn open_workspace(config: &Config) -> Result<CrmStore> {
    let port = FileKeyValueStore::open(&config.workspace.dir).with_context(|| {
        format!(
            "Failed to open workspace directory: {}",
            config.workspace.dir.display()
        )
    })?;
    CrmStore::load(Box::new(port), config.workspace.persist_policy())
        .context("Failed to load workspace")
}

fn apply_filter<T: Record>(store: &mut CrmStore, filter: Option<&str>) {
    if let Some(query) = filter {
        store.set_filter(T::KIND, query);
    }
}

fn cmd_add<T: Record>(store: &mut CrmStore, record: T) -> Result<()> {
    let id = record.id().to_string();
    store
        .add(record)
        .with_context(|| format!("Failed to save new {}", T::KIND))?;
    println!("[OK] Created {} {}", T::KIND, id);
    Ok(())
}

fn cmd_update<T: Record>(store: &mut CrmStore, id: &str, edit: impl FnOnce(&mut T)) -> Result<()> {
    let Some(mut record) = store.get::<T>(id).cloned() else {
        anyhow::bail!("No {} found with ID: {}", T::KIND, id);
    };
    edit(&mut record);
    store
        .update(record)
        .with_context(|| format!("Failed to update {} {}", T::KIND, id))?;
    println!("[OK] Updated {} {}", T::KIND, id);
    Ok(())
}

fn cmd_delete(store: &mut CrmStore, kind: EntityKind, id: &str) -> Result<()> {
    let report = store
        .delete(kind, id)
        .with_context(|| format!("Failed to delete {} {}", kind, id))?;

    if !report.deleted {
        println!("[!!] No {} found with ID: {}", kind, id);
    } else {
        println!("[OK] Deleted {} {}", kind, id);
    }
    print_cascades(&report);
    Ok(())
}

fn print_cascades(report: &DeleteReport) {
    for (dependent, removed) in &report.cascaded {
        if *removed > 0 {
            println!("     also removed {} dependent {} record(s)", removed, dependent);
        }
    }
}

fn cmd_move_deal(store: &mut CrmStore, id: &str, stage: DealStage) -> Result<()> {
    if store.get::<Deal>(id).is_none() {
        anyhow::bail!("No deal found with ID: {}", id);
    }
    if store.move_deal(id, stage)? {
        println!("[OK] Moved deal {} to {}", id, stage.title());
    } else {
        println!("Deal {} is already in {}", id, stage.title());
    }
    Ok(())
}

fn cmd_pipeline(store: &CrmStore) {
    let columns = store.deals_by_stage();
    let totals = store.pipeline_totals();

    println!();
    println!("{:<16}  {:>6}  {:>14}", "STAGE", "DEALS", "VALUE");
    println!("{}", "-".repeat(40));
    for ((stage, deals), (_, total)) in columns.iter().zip(totals.iter()) {
        println!(
            "{:<16}  {:>6}  {:>14}",
            stage.title(),
            deals.len(),
            format_money(*total)
        );
    }
    println!();
}

fn cmd_summary(store: &CrmStore) {
    let summary = store.summary(Utc::now());

    println!();
    println!("=== Workspace Summary ===");
    println!();
    println!("Contacts:              {}", summary.total_contacts);
    println!("Open deals:            {}", summary.open_deals);
    println!("Open deal value:       {}", format_money(summary.open_deal_value));
    println!("Activities (7 days):   {}", summary.activities_last_7_days);
    println!();
}

fn print_contacts(contacts: &[&Contact]) {
    if contacts.is_empty() {
        println!("No contacts found.");
        return;
    }

    println!();
    println!(
        "{:<36}  {:<20}  {:<24}  {:<28}  {:<16}",
        "ID", "NAME", "COMPANY", "EMAIL", "PHONE"
    );
    println!("{}", "-".repeat(132));
    for c in contacts {
        println!(
            "{:<36}  {:<20}  {:<24}  {:<28}  {:<16}",
            c.id,
            truncate(&c.name, 20),
            truncate(&c.company, 24),
            truncate(&c.email, 28),
            truncate(&c.phone, 16)
        );
    }
    println!();
}

fn print_leads(leads: &[&Lead]) {
    if leads.is_empty() {
        println!("No leads found.");
        return;
    }

    println!();
    println!("{:<36}  {:<20}  {:<24}  {:<10}", "ID", "NAME", "COMPANY", "STATUS");
    println!("{}", "-".repeat(96));
    for l in leads {
        println!(
            "{:<36}  {:<20}  {:<24}  {:<10}",
            l.id,
            truncate(&l.name, 20),
            truncate(&l.company, 24),
            l.status.to_string()
        );
    }
    println!();
}

fn print_deals(deals: &[&Deal]) {
    if deals.is_empty() {
        println!("No deals found.");
        return;
    }

    println!();
    println!(
        "{:<36}  {:<24}  {:<20}  {:>12}  {:<14}",
        "ID", "NAME", "COMPANY", "VALUE", "STAGE"
    );
    println!("{}", "-".repeat(116));
    for d in deals {
        println!(
            "{:<36}  {:<24}  {:<20}  {:>12}  {:<14}",
            d.id,
            truncate(&d.name, 24),
            truncate(&d.company, 20),
            format_money(d.amount()),
            d.stage.title()
        );
    }
    println!();
}

/// Names of the contact and deal an activity refers to, or "-" if neither resolves
fn related_names(store: &CrmStore, activity: &Activity) -> String {
    let contact = activity
        .contact_id
        .as_deref()
        .and_then(|id| store.get::<Contact>(id))
        .map(|c| c.name.as_str());
    let deal = activity
        .deal_id
        .as_deref()
        .and_then(|id| store.get::<Deal>(id))
        .map(|d| d.name.as_str());

    match (contact, deal) {
        (Some(contact), Some(deal)) => format!("{} / {}", contact, deal),
        (Some(name), None) | (None, Some(name)) => name.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn print_activities(store: &CrmStore, activities: &[&Activity]) {
    if activities.is_empty() {
        println!("No activities found.");
        return;
    }

    println!();
    println!(
        "{:<36}  {:<8}  {:<24}  {:<30}  {:<40}",
        "ID", "TYPE", "WHEN", "RELATED", "NOTES"
    );
    println!("{}", "-".repeat(146));
    for a in activities {
        println!(
            "{:<36}  {:<8}  {:<24}  {:<30}  {:<40}",
            a.id,
            a.activity_type.as_str(),
            a.created_at,
            truncate(&related_names(store, a), 30),
            truncate(&a.notes, 40)
        );
    }
    println!();
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("A default configuration will be used when starting the server.");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            let problems = config.validate();
            if problems.is_empty() {
                println!("[OK] Configuration file is valid!");
            } else {
                println!("[!!] Configuration has {} problem(s):", problems.len());
                for problem in &problems {
                    println!("  - {}", problem);
                }
            }
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("Server:");
            println!("  Host:         {}", config.server.host);
            println!("  API Port:     {}", config.server.api_port);
            println!("  CORS:         {}", if config.server.cors_permissive { "permissive" } else { "same-origin" });
            println!();
            println!("Storage:");
            println!("  Seed data:    {}", config.storage.seed_fixtures);
            println!();
            println!("Workspace:");
            println!("  Directory:    {}", config.workspace.dir.display());
            println!("  Persist []:   {}", config.workspace.persist_empty_collections);
            println!();
            println!("Logging:");
            println!("  Level:        {}", config.logging.level);
            println!();

            if !problems.is_empty() {
                anyhow::bail!("Configuration check failed");
            }
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            anyhow::bail!("Configuration check failed")
        }
    }
}

fn format_money(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
