use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use vnaddr_core::{Lexicon, LexiconTables, StrictKey};

/// List the strict keys a lexicon file produces and report spellings that
/// collide on the same key with different values.
#[derive(Parser)]
#[command(name = "lexicon_keys")]
struct Args {
    /// Lexicon TOML; the built-in tables when omitted
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Print every key, not just the summary and collisions
    #[arg(long)]
    all: bool,

    /// Exit non-zero when collisions are found
    #[arg(long)]
    strict: bool,
}

fn print_table<V: std::fmt::Display>(name: &str, table: &std::collections::BTreeMap<String, V>) {
    println!("[{}] {} entries", name, table.len());
    for (raw, value) in table {
        let key = StrictKey::new(raw);
        let marker = if key.is_empty() { "  (empty key, ignored)" } else { "" };
        println!("  {:<24} {:<24} -> {}{}", key.as_str(), raw, value, marker);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let lexicon = match &args.lexicon {
        Some(p) => Arc::new(Lexicon::load_toml(p)?),
        None => Lexicon::builtin(),
    };
    let tables: &LexiconTables = lexicon.tables();

    println!("district names:   {}", tables.district_names.len());
    println!("district aliases: {}", tables.district_aliases.len());
    println!("wards:            {}", tables.ward_to_district.len());
    println!("ward labels:      {}", tables.ward_names.len());
    println!("fee rows:         {}", tables.ship_fee_by_ward.len() + tables.ship_fee_by_district.len());
    println!("router rows:      {}", tables.area_to_router.len());
    println!("default router:   {}", tables.default_router);
    println!("multi-word names: {}", lexicon.multiword_district_names().join(" | "));

    if args.all {
        print_table("district_names", &tables.district_names);
        print_table("district_aliases", &tables.district_aliases);
        print_table("ward_to_district", &tables.ward_to_district);
        print_table("ward_names", &tables.ward_names);
        print_table("ship_fee_by_ward", &tables.ship_fee_by_ward);
        print_table("ship_fee_by_district", &tables.ship_fee_by_district);
        print_table("area_to_router", &tables.area_to_router);
    }

    let collisions = tables.strict_collisions();
    if collisions.is_empty() {
        println!("no strict-key collisions");
        return Ok(());
    }
    println!("{} strict-key collisions:", collisions.len());
    for (key, spellings) in &collisions {
        println!("  {} <- {}", key, spellings.join(", "));
    }
    if args.strict {
        bail!("{} strict-key collisions", collisions.len());
    }
    Ok(())
}
