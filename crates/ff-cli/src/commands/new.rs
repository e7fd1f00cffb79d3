use colored::Colorize;

pub fn run(opts: &super::Options, name: &str) -> Result<(), String> {
    let mut adventure = super::open(opts);
    let had_save = adventure.has_save();
    adventure.new_adventure(name).map_err(|e| e.to_string())?;

    if had_save {
        println!("  {} previous adventure", "Replaced".yellow());
    }
    let name = &adventure.player().name;
    if name.is_empty() {
        println!("  {} a new adventure", "Started".bold());
    } else {
        println!("  {} a new adventure for {}", "Started".bold(), name.bold());
    }
    println!("  Next: ffm roll");
    Ok(())
}
