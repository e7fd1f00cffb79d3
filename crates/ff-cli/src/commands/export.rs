use std::path::Path;

pub fn run(opts: &super::Options, output: Option<&Path>) -> Result<(), String> {
    let adventure = super::open(opts);

    if let Some(path) = output {
        adventure.export_to(path).map_err(|e| e.to_string())?;
        println!("  Exported to {}", path.display());
    } else {
        let json = adventure.export_json().map_err(|e| e.to_string())?;
        println!("{json}");
    }

    Ok(())
}
