/// Run a single play-mode command against the saved adventure.
pub fn run(opts: &super::Options, line: &str) -> Result<(), String> {
    let mut adventure = super::open(opts);
    let output = adventure.process(line).map_err(|e| e.to_string())?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
