use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ff_mechanics::{EncounterStatus, LogKind};

pub fn run(opts: &super::Options) -> Result<(), String> {
    let adventure = super::open(opts);
    let player = adventure.player();

    let name = if player.name.is_empty() {
        "(unnamed adventurer)"
    } else {
        player.name.as_str()
    };
    println!("  {}", name.bold());
    if !player.stats_rolled() {
        println!("  {}", "Stats not rolled yet. Run: ffm roll".yellow());
    }

    let mut sheet = Table::new();
    sheet.set_content_arrangement(ContentArrangement::Dynamic);
    sheet.set_header(vec!["SKILL", "STAMINA", "LUCK", "Provisions", "Gold", "Potion"]);
    let potion = if player.potion.used {
        format!("{} (used)", player.potion.choice)
    } else {
        player.potion.choice.to_string()
    };
    sheet.add_row(vec![
        player.skill.to_string(),
        player.stamina.to_string(),
        player.luck.to_string(),
        player.provisions.to_string(),
        player.gold.to_string(),
        potion,
    ]);
    println!("{sheet}");

    println!("  Equipment: {}", list_or_dash(&player.equipment));
    println!("  Treasure:  {}", list_or_dash(&player.treasure));
    println!();

    let registry = adventure.registry();
    if registry.is_empty() {
        println!("  No monsters yet.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Id", "Monster", "SKILL", "STAMINA", "Status", ""]);
        for (i, e) in registry.iter().enumerate() {
            let active = registry.active_encounter_id.as_ref() == Some(&e.id);
            let status = match e.status {
                EncounterStatus::Active => e.status.to_string(),
                EncounterStatus::Defeated => e.status.to_string().red().to_string(),
                EncounterStatus::Escaped => e.status.to_string().dimmed().to_string(),
            };
            table.add_row(vec![
                (i + 1).to_string(),
                e.id.to_string(),
                e.name.clone(),
                e.skill.to_string(),
                e.stamina.to_string(),
                status,
                if active { "active".to_string() } else { String::new() },
            ]);
        }
        println!("{table}");
        println!();
        println!("  {} monsters", registry.len());
    }

    if let Some(latest) = adventure.logs().latest(LogKind::Combat) {
        println!("  Last round: {latest}");
    }

    Ok(())
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "—".to_string()
    } else {
        items.join(", ")
    }
}
