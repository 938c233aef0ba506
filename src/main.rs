mod address;
mod codes;
mod config;
mod db;
mod export;
mod filter;
mod geo;
mod models;
mod normalize;
mod paging;
mod registry;
mod trade;
mod tui;
mod validate;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use config::Config;
use db::Database;
use filter::{Criteria, MailOption};
use models::{AttachmentRecord, EquipmentRecord, FarmerRecord, SaleStatus, SaleType};
use normalize::RawDocument;
use registry::{Registry, ViewState};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "farmreg")]
#[command(about = "Farmer and farm-equipment registry - search, chart, export and trade")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Register a farmer
    Add {
        #[command(flatten)]
        fields: FarmerFields,
    },

    /// Import farmers from a JSON file (one document or an array)
    Import {
        /// Path to the JSON file
        file: PathBuf,

        /// Validate only, write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// List farmers, newest first
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Page number (out-of-range pages clamp)
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        page: i64,
    },

    /// Show farmer details
    Show {
        /// Farmer ID (or unique prefix)
        id: String,
    },

    /// Edit a farmer's details
    Edit {
        /// Farmer ID (or unique prefix)
        id: String,

        #[command(flatten)]
        fields: FarmerFields,
    },

    /// Delete farmers
    Delete {
        /// Farmer IDs (or unique prefixes)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Show what would be removed without removing
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a machine to a farmer
    Equipment {
        /// Farmer ID (or unique prefix)
        farmer: String,

        #[command(flatten)]
        machine: EquipmentFields,
    },

    /// Show the trade board
    Trade {
        /// sale or purchase
        #[arg(short = 't', long)]
        trade_type: Option<String>,

        /// available, reserved or completed
        #[arg(short, long)]
        status: Option<String>,

        /// Equipment type (code or label)
        #[arg(short, long)]
        equipment: Option<String>,
    },

    /// Change the sale status of a traded machine
    TradeStatus {
        /// Farmer ID (or unique prefix)
        farmer: String,

        /// Equipment ID
        equipment: String,

        /// available, reserved or completed
        status: String,
    },

    /// Farmer and equipment counts by region
    Stats {
        /// City to break down by township ("all" for the whole province)
        #[arg(short, long, default_value = geo::ALL_CITIES)]
        zoom: String,

        /// Print the chart series as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Export farmers to CSV
    Export {
        /// Output file
        out: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Browse farmers interactively
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Text in name, phone, business name or address
    #[arg(short, long)]
    search: Option<String>,

    /// City or county (e.g. 영암군)
    #[arg(long)]
    city: Option<String>,

    /// Township: 읍, 면 or 동
    #[arg(long)]
    district: Option<String>,

    /// Village (리)
    #[arg(long)]
    village: Option<String>,

    /// Farming type (code or label)
    #[arg(long)]
    farming: Option<String>,

    /// Mail preference: all, yes, no
    #[arg(long, default_value = "all")]
    mail: String,

    /// Sale type of any machine: all, new, used
    #[arg(long)]
    sale_type: Option<String>,

    /// Equipment type of any machine (code or label)
    #[arg(long)]
    equipment: Option<String>,

    /// Manufacturer of any machine (code or label)
    #[arg(long)]
    manufacturer: Option<String>,
}

#[derive(Args)]
struct FarmerFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// Business name
    #[arg(long)]
    business: Option<String>,

    #[arg(long)]
    zip: Option<String>,

    /// Lot-number address (used for regions)
    #[arg(long)]
    jibun: Option<String>,

    /// Road-name address
    #[arg(long)]
    road: Option<String>,

    /// Address detail
    #[arg(long)]
    detail: Option<String>,

    /// Accepts mail (true/false)
    #[arg(long)]
    mail: Option<bool>,

    /// Age group, e.g. 50대
    #[arg(long)]
    age: Option<String>,

    /// Farming types (code or label); replaces the current set
    #[arg(long, value_delimiter = ',')]
    farming: Vec<String>,

    /// Main crop as category[:detail,detail]; repeatable, replaces the current set
    #[arg(long)]
    crop: Vec<String>,

    /// Rating 0-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    rating: Option<u8>,

    #[arg(long)]
    memo: Option<String>,
}

#[derive(Args)]
struct EquipmentFields {
    /// Equipment type (code or label)
    #[arg(short = 't', long = "type")]
    kind: String,

    /// Manufacturer (code or label)
    #[arg(short, long)]
    manufacturer: Option<String>,

    #[arg(long)]
    model: Option<String>,

    /// Condition 0-5
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=5))]
    condition: u8,

    /// new or used
    #[arg(long)]
    sale_type: Option<String>,

    /// sale or purchase (puts the machine on the trade board)
    #[arg(long)]
    trade_type: Option<String>,

    /// Desired price
    #[arg(long)]
    price: Option<String>,

    /// Attachments: loader, rotary, frontWheel, rearWheel
    #[arg(long, value_delimiter = ',')]
    attach: Vec<String>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmreg=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db = match &config.db_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open()?,
    };

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!(
                "Database initialized at {} ({} farmer(s))",
                db.path().display(),
                db.count_farmers()?
            );
        }

        Commands::Add { fields } => {
            db.ensure_initialized()?;
            let name = fields
                .name
                .as_deref()
                .ok_or_else(|| anyhow!("--name is required"))?;
            let mut record = FarmerRecord {
                name: validate::validate_name(name)?,
                ..Default::default()
            };
            apply_fields(&mut record, &fields)?;
            let id = db.insert_farmer(&serde_json::to_value(&record)?)?;
            println!("Registered {} ({})", record.name, short_id(&id));
        }

        Commands::Import { file, dry_run } => {
            db.ensure_initialized()?;
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let parsed: Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let docs = match parsed {
                Value::Array(items) => items,
                other => vec![other],
            };

            let mut imported = 0;
            let mut rejected = 0;
            for (i, doc) in docs.iter().enumerate() {
                match check_document(doc) {
                    Ok(doc) => {
                        let record = normalize::normalize(&RawDocument::new("", doc.clone()));
                        for code in unknown_codes(&record) {
                            warn!(document = i + 1, "unknown {} kept as-is", code);
                        }
                        if !dry_run {
                            db.insert_farmer(&doc)?;
                        }
                        imported += 1;
                    }
                    Err(e) => {
                        rejected += 1;
                        eprintln!("  #{}: {}", i + 1, e);
                    }
                }
            }

            info!(imported, rejected, "import finished");
            if dry_run {
                println!("Would import {} farmer(s), {} rejected", imported, rejected);
            } else {
                println!("Imported {} farmer(s), {} rejected", imported, rejected);
            }
        }

        Commands::List { filters, page } => {
            let registry = load_registry(&db)?;
            let state = ViewState::default()
                .with_criteria(filters.to_criteria()?)
                .with_page(page);
            let view = registry.view(&state, config.page_size);

            if view.total_matches == 0 {
                println!("No farmers found.");
            } else {
                println!(
                    "{:<10} {:<10} {:<15} {:<36} {:>5} {:<10}",
                    "ID", "NAME", "PHONE", "ADDRESS", "EQUIP", "CREATED"
                );
                println!("{}", "-".repeat(92));
                for record in &view.page.items {
                    println!(
                        "{:<10} {:<10} {:<15} {:<36} {:>5} {:<10}",
                        short_id(&record.id),
                        truncate(&record.name, 8),
                        record.phone,
                        truncate(record.display_address(), 34),
                        record.equipments.len(),
                        record
                            .created_at
                            .map(|t| t.format("%Y-%m-%d").to_string())
                            .unwrap_or_default()
                    );
                }
                println!();
                println!(
                    "{} match(es) of {} | page {}/{} | {}",
                    view.total_matches,
                    registry.len(),
                    view.page.page,
                    view.page.total_pages,
                    page_buttons(&view.window, view.page.page)
                );
            }
        }

        Commands::Show { id } => {
            let id = resolve(&db, &id)?;
            let registry = load_registry(&db)?;
            match registry.get(&id) {
                Some(record) => print_farmer(record),
                None => println!("Farmer {} not found.", id),
            }
        }

        Commands::Edit { id, fields } => {
            db.ensure_initialized()?;
            let id = resolve(&db, &id)?;
            let doc = db
                .get_document(&id)?
                .ok_or_else(|| anyhow!("Farmer {} not found", id))?;
            let mut record = normalize::normalize(&doc);
            if let Some(name) = &fields.name {
                record.name = validate::validate_name(name)?;
            }
            apply_fields(&mut record, &fields)?;
            db.update_farmer(&id, &merge_document(&doc.fields, &record)?)?;
            println!("Updated {} ({})", record.name, short_id(&id));
        }

        Commands::Delete { ids, dry_run } => {
            db.ensure_initialized()?;
            let mut removed = 0;
            for id in ids {
                let full = match db.resolve_id(&id)? {
                    Some(full) => full,
                    None => {
                        println!("  {} not found", id);
                        continue;
                    }
                };
                if dry_run {
                    println!("  Would remove {}", short_id(&full));
                    removed += 1;
                    continue;
                }
                if let Some(images) = db.delete_farmer(&full)? {
                    if !images.is_empty() {
                        warn!(id = %full, ?images, "deleted farmer left stored images behind");
                        println!(
                            "  Removed {} ({} image(s) to clean up)",
                            short_id(&full),
                            images.len()
                        );
                    } else {
                        println!("  Removed {}", short_id(&full));
                    }
                    removed += 1;
                }
            }
            if dry_run {
                println!("\nTotal that would be removed: {}", removed);
            } else {
                println!("\nTotal removed: {}", removed);
            }
        }

        Commands::Equipment { farmer, machine } => {
            db.ensure_initialized()?;
            let id = resolve(&db, &farmer)?;
            let doc = db
                .get_document(&id)?
                .ok_or_else(|| anyhow!("Farmer {} not found", id))?;
            let mut record = normalize::normalize(&doc);
            let equipment = build_equipment(&machine)?;
            let label = codes::EQUIPMENT_TYPES.label(&equipment.kind).to_string();
            let equipment_id = equipment.id.clone();
            record.equipments.push(equipment);
            db.update_farmer(&id, &merge_document(&doc.fields, &record)?)?;
            println!("Added {} to {} (equipment {})", label, record.name, equipment_id);
        }

        Commands::Trade {
            trade_type,
            status,
            equipment,
        } => {
            let registry = load_registry(&db)?;
            let query = trade::TradeQuery {
                trade_type: trade_type
                    .map(|t| resolve_code(&codes::TRADE_TYPES, &t))
                    .transpose()?,
                sale_status: status.map(|s| parse_status(&s)).transpose()?,
                equipment_type: equipment.map(|e| lenient_code(&codes::EQUIPMENT_TYPES, &e)),
            };
            let listings = trade::listings(registry.records(), &query);
            if listings.is_empty() {
                println!("No trade listings.");
            } else {
                println!(
                    "{:<6} {:<8} {:<24} {:>12} {:<10} {:<10} {:<15}",
                    "TRADE", "STATUS", "MACHINE", "PRICE", "CONDITION", "OWNER", "PHONE"
                );
                println!("{}", "-".repeat(91));
                for listing in &listings {
                    let e = listing.equipment;
                    println!(
                        "{:<6} {:<8} {:<24} {:>12} {:<10} {:<10} {:<15}",
                        codes::TRADE_TYPES.label(&e.trade_type),
                        codes::SALE_STATUSES.label(e.sale_status.code()),
                        truncate(
                            &format!(
                                "{} {} {}",
                                codes::EQUIPMENT_TYPES.label(&e.kind),
                                codes::MANUFACTURERS.label(&e.manufacturer),
                                e.model
                            ),
                            22
                        ),
                        e.desired_price,
                        stars(e.condition),
                        truncate(&listing.farmer.name, 8),
                        listing.farmer.phone
                    );
                }
                println!("\n{} listing(s)", listings.len());
            }
        }

        Commands::TradeStatus {
            farmer,
            equipment,
            status,
        } => {
            db.ensure_initialized()?;
            let id = resolve(&db, &farmer)?;
            let status = parse_status(&status)?;
            let doc = db
                .get_document(&id)?
                .ok_or_else(|| anyhow!("Farmer {} not found", id))?;
            let mut record = normalize::normalize(&doc);
            if !trade::set_sale_status(&mut record, &equipment, status) {
                bail!("{} has no equipment '{}'", record.name, equipment);
            }
            db.update_farmer(&id, &merge_document(&doc.fields, &record)?)?;
            println!(
                "Equipment {} is now {}",
                equipment,
                codes::SALE_STATUSES.label(status.code())
            );
        }

        Commands::Stats {
            zoom: city,
            json,
            filters,
        } => {
            let registry = load_registry(&db)?;
            if city != geo::ALL_CITIES && !codes::is_known_city(&city) {
                warn!(%city, "not a city of {}", codes::PROVINCE);
            }
            let state = ViewState::default()
                .with_criteria(filters.to_criteria()?)
                .with_city(&city);
            let stats = registry.stats(&state);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats_json(&stats, &city)?)?);
            } else {
                print_stats(&stats, &city);
            }
        }

        Commands::Export { out, filters } => {
            let registry = load_registry(&db)?;
            let records = registry.filtered(&filters.to_criteria()?);
            let file = std::fs::File::create(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            let rows = export::write_csv(file, records)?;
            println!("Exported {} farmer(s) to {}", rows, out.display());
        }

        Commands::Browse { filters } => {
            let registry = load_registry(&db)?;
            let state = ViewState::default().with_criteria(filters.to_criteria()?);
            tui::run_browse(&registry, state, config.page_size)?;
        }
    }

    Ok(())
}

impl FilterArgs {
    fn to_criteria(&self) -> Result<Criteria> {
        let city = self.city.clone().unwrap_or_default();
        if !city.is_empty() && !codes::is_known_city(&city) {
            warn!(%city, "not a city of {}", codes::PROVINCE);
        }
        let district = self.district.clone().unwrap_or_default();
        if !city.is_empty()
            && !district.is_empty()
            && codes::is_known_city(&city)
            && !codes::townships(&city).contains(&district.as_str())
        {
            warn!(%city, %district, "township not listed for this city");
        }

        let sale_type = match self.sale_type.as_deref() {
            None | Some("all") => String::new(),
            Some(s) => resolve_code(&codes::SALE_TYPES, s)?,
        };

        Ok(Criteria {
            search_term: self.search.clone().unwrap_or_default(),
            city,
            district,
            village: self.village.clone().unwrap_or_default(),
            farming_type: self
                .farming
                .as_deref()
                .map(|f| lenient_code(&codes::FARMING_TYPES, f))
                .unwrap_or_default(),
            mail_option: self.mail.parse::<MailOption>()?,
            sale_type,
            equipment_type: self
                .equipment
                .as_deref()
                .map(|e| lenient_code(&codes::EQUIPMENT_TYPES, e))
                .unwrap_or_default(),
            manufacturer: self
                .manufacturer
                .as_deref()
                .map(|m| lenient_code(&codes::MANUFACTURERS, m))
                .unwrap_or_default(),
        })
    }
}

fn load_registry(db: &Database) -> Result<Registry> {
    db.ensure_initialized()?;
    let mut registry = Registry::new();
    registry.reload(db)?;
    Ok(registry)
}

fn resolve(db: &Database, id: &str) -> Result<String> {
    db.resolve_id(id)?
        .ok_or_else(|| anyhow!("Farmer '{}' not found", id))
}

/// Code for a code-or-label input; unknown values pass through with a warning.
fn lenient_code(table: &codes::CodeTable, input: &str) -> String {
    match table.resolve(input) {
        Some(code) => code.to_string(),
        None => {
            warn!(value = input, "unknown {}", table.name);
            input.trim().to_string()
        }
    }
}

fn resolve_code(table: &codes::CodeTable, input: &str) -> Result<String> {
    table.resolve(input).map(str::to_string).ok_or_else(|| {
        anyhow!(
            "Unknown {} '{}' (one of: {})",
            table.name,
            input,
            table.codes().collect::<Vec<_>>().join(", ")
        )
    })
}

fn parse_status(input: &str) -> Result<SaleStatus> {
    let code = resolve_code(&codes::SALE_STATUSES, input)?;
    SaleStatus::parse_strict(&code).ok_or_else(|| anyhow!("Unknown sale status '{}'", input))
}

fn apply_fields(record: &mut FarmerRecord, fields: &FarmerFields) -> Result<()> {
    if let Some(phone) = &fields.phone {
        record.phone = validate::validate_phone(phone)?;
    }
    if let Some(v) = &fields.business {
        record.business_name = v.trim().to_string();
    }
    if let Some(v) = &fields.zip {
        record.zip_code = v.trim().to_string();
    }
    if let Some(v) = &fields.jibun {
        record.jibun_address = v.trim().to_string();
        if !v.trim().is_empty() && !address::parse(v).is_located() {
            warn!(address = %v, "address has no recognizable city; left out of region stats");
        }
    }
    if let Some(v) = &fields.road {
        record.road_address = v.trim().to_string();
    }
    if let Some(v) = &fields.detail {
        record.address_detail = v.trim().to_string();
    }
    if let Some(v) = fields.mail {
        record.can_receive_mail = v;
    }
    if let Some(v) = &fields.age {
        record.age_group = v.trim().to_string();
    }
    if !fields.farming.is_empty() {
        record.farming_types = Default::default();
        for input in &fields.farming {
            let code = resolve_code(&codes::FARMING_TYPES, input)?;
            record.farming_types.set(&code, true);
        }
    }
    if !fields.crop.is_empty() {
        record.main_crop = Default::default();
        for entry in &fields.crop {
            let (category, details) = entry.split_once(':').unwrap_or((entry.as_str(), ""));
            let category = resolve_code(&codes::CROP_CATEGORIES, category)?;
            let details: Vec<String> = details
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(|d| match codes::crop_details(&category) {
                    Some(table) => lenient_code(table, d),
                    None => d.to_string(),
                })
                .collect();
            record.main_crop.set(&category, true, details);
        }
    }
    if let Some(v) = fields.rating {
        record.rating = v;
    }
    if let Some(v) = &fields.memo {
        record.memo = v.clone();
    }
    Ok(())
}

fn build_equipment(machine: &EquipmentFields) -> Result<EquipmentRecord> {
    let attachments = machine
        .attach
        .iter()
        .map(|a| {
            Ok(AttachmentRecord {
                kind: resolve_code(&codes::ATTACHMENT_TYPES, a)?,
                ..Default::default()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let trade_type = match &machine.trade_type {
        Some(t) => resolve_code(&codes::TRADE_TYPES, t)?,
        None => String::new(),
    };
    let sale_type = match &machine.sale_type {
        Some(s) => Some(
            SaleType::from_code(&resolve_code(&codes::SALE_TYPES, s)?)
                .ok_or_else(|| anyhow!("Unknown sale type '{}'", s))?,
        ),
        None => None,
    };

    Ok(EquipmentRecord {
        id: uuid::Uuid::new_v4().simple().to_string()[..8].to_string(),
        kind: resolve_code(&codes::EQUIPMENT_TYPES, &machine.kind)?,
        manufacturer: machine
            .manufacturer
            .as_deref()
            .map(|m| lenient_code(&codes::MANUFACTURERS, m))
            .unwrap_or_default(),
        model: machine.model.clone().unwrap_or_default(),
        condition: machine.condition,
        sale_type,
        trade_type,
        desired_price: machine.price.clone().unwrap_or_default(),
        sale_status: SaleStatus::Available,
        images: Vec::new(),
        attachments,
    })
}

/// Validates an imported document's name and phone, normalizing the phone.
fn check_document(doc: &Value) -> Result<Value> {
    let Some(obj) = doc.as_object() else {
        bail!("not a JSON object");
    };
    let mut obj = obj.clone();
    let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
    let name = validate::validate_name(name)?;
    obj.insert("name".into(), Value::String(name));
    if let Some(phone) = obj.get("phone").and_then(Value::as_str) {
        let phone = validate::validate_phone(phone)?;
        obj.insert("phone".into(), Value::String(phone));
    }
    Ok(Value::Object(obj))
}

/// Equipment codes in a record that no table knows. They still load and
/// display as their raw value.
fn unknown_codes(record: &FarmerRecord) -> Vec<String> {
    let mut unknown = Vec::new();
    let mut check = |table: &codes::CodeTable, code: &str| {
        if !code.is_empty() && !table.contains(code) {
            unknown.push(format!("{} '{}'", table.name, code));
        }
    };
    for e in &record.equipments {
        check(&codes::EQUIPMENT_TYPES, &e.kind);
        check(&codes::MANUFACTURERS, &e.manufacturer);
        check(&codes::TRADE_TYPES, &e.trade_type);
        for a in &e.attachments {
            check(&codes::ATTACHMENT_TYPES, &a.kind);
            check(&codes::MANUFACTURERS, &a.manufacturer);
        }
    }
    unknown
}

/// Writes the edited record over the stored document, keeping any fields
/// the record does not model.
fn merge_document(stored: &Value, record: &FarmerRecord) -> Result<Value> {
    let mut merged = match stored {
        Value::Object(obj) => obj.clone(),
        _ => Default::default(),
    };
    if let Value::Object(fields) = serde_json::to_value(record)? {
        merged.extend(fields);
    }
    Ok(Value::Object(merged))
}

fn print_farmer(record: &FarmerRecord) {
    println!("Farmer {}", record.id);
    println!("이름: {}", record.name);
    if !record.phone.is_empty() {
        println!("전화: {}", record.phone);
    }
    if !record.business_name.is_empty() {
        println!("상호: {}", record.business_name);
    }
    if !record.jibun_address.is_empty() {
        println!("지번주소: {}", record.jibun_address);
    }
    if !record.road_address.is_empty() {
        println!("도로명주소: {}", record.road_address);
    }
    if !record.address_detail.is_empty() {
        println!("상세주소: {}", record.address_detail);
    }
    let region = record.region();
    if let Some(city) = &region.city {
        println!(
            "지역: {} {} {}",
            city,
            region.district.as_deref().unwrap_or("-"),
            region.village.as_deref().unwrap_or("-")
        );
    }
    println!("우편수신: {}", if record.can_receive_mail { "예" } else { "아니오" });
    if !record.age_group.is_empty() {
        println!("연령대: {}", record.age_group);
    }
    println!("영농형태: {}", or_dash(&export::farming_summary(record)));
    println!("주작물: {}", or_dash(&export::crop_summary(record)));
    println!("평점: {}", stars(record.rating));
    if let Some(created) = record.created_at {
        println!("등록: {}", created.format("%Y-%m-%d %H:%M"));
    }
    if let Some(updated) = record.updated_at {
        println!("수정: {}", updated.format("%Y-%m-%d %H:%M"));
    }

    if !record.equipments.is_empty() {
        println!("\n보유장비 ({}):", record.equipments.len());
        for e in &record.equipments {
            println!(
                "  [{}] {} {} {} - 상태 {}",
                e.id,
                codes::EQUIPMENT_TYPES.label(&e.kind),
                codes::MANUFACTURERS.label(&e.manufacturer),
                e.model,
                stars(e.condition)
            );
            if !e.trade_type.is_empty() {
                println!(
                    "      {} / {} / {} {}",
                    codes::TRADE_TYPES.label(&e.trade_type),
                    codes::SALE_STATUSES.label(e.sale_status.code()),
                    e.sale_type
                        .map(|s| codes::SALE_TYPES.label(s.code()))
                        .unwrap_or("-"),
                    e.desired_price
                );
            }
            for a in &e.attachments {
                println!(
                    "      + {} {} {}",
                    codes::ATTACHMENT_TYPES.label(&a.kind),
                    codes::MANUFACTURERS.label(&a.manufacturer),
                    a.model
                );
                for line in textwrap::wrap(&a.memo, 60) {
                    println!("        {}", line);
                }
            }
            if !e.images.is_empty() {
                println!("      사진 {}장", e.images.len());
            }
        }
    }

    if !record.memo.is_empty() {
        println!("\n--- 메모 ---");
        println!("{}", textwrap::fill(&record.memo, 70));
    }
}

fn print_stats(stats: &geo::GeoStats, city: &str) {
    if stats.is_empty() {
        println!("No located farmers for {}.", city);
        return;
    }
    let scale = stats.scale();
    let width = 40.0;
    let bar = |n: u64| -> String {
        let len = if scale.y_axis_max == 0 {
            0
        } else {
            (n as f64 / scale.y_axis_max as f64 * width).round() as usize
        };
        "#".repeat(len)
    };

    println!("{:<12} {:>8} {:>8}", "REGION", "FARMERS", "MACHINES");
    println!("{}", "-".repeat(72));
    for (label, customers, equipment) in stats.rows() {
        println!("{:<12} {:>8} {:>8}  {}", label, customers, equipment, bar(customers));
    }
    println!(
        "\nTotal: {} farmer(s), {} machine(s) in {} region(s) | axis 0..{} step {}",
        stats.customers.iter().sum::<u64>(),
        stats.equipment.iter().sum::<u64>(),
        stats.len(),
        scale.y_axis_max,
        scale.tick_step
    );
}

fn stats_json(stats: &geo::GeoStats, city: &str) -> Result<Value> {
    Ok(serde_json::json!({
        "city": city,
        "series": serde_json::to_value(stats)?,
        "scale": serde_json::to_value(stats.scale())?,
    }))
}

fn page_buttons(window: &paging::PageWindow, current: usize) -> String {
    let mut parts = Vec::new();
    if window.has_prev_group() {
        parts.push("<<".to_string());
    }
    for p in window.pages() {
        if p == current {
            parts.push(format!("[{}]", p));
        } else {
            parts.push(p.to_string());
        }
    }
    if window.has_next_group() {
        parts.push(">>".to_string());
    }
    parts.join(" ")
}

fn stars(n: u8) -> String {
    let n = n.min(5) as usize;
    format!("{}{}", "★".repeat(n), "☆".repeat(5 - n))
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
