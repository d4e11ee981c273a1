use std::fs;

pub fn config_export() {
    print!("{}", tib_core::config::default_toml());
}

pub fn config_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let c = die!(tib_core::config::parse_config_toml(&content), "Error: {}");
    println!(
        "OK: {} inputs, output={}, optimize={}, mode={}",
        c.build.inputs.len(),
        c.build.output.display(),
        c.build.optimize,
        c.filter.mode()
    );
}

pub fn table_export() {
    print!("{}", tib_core::translit::default_toml());
}

pub fn table_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let table = die!(tib_core::translit::parse_table_toml(&content), "Error: {}");
    println!(
        "OK: {} consonants, {} vowels, {} symbols, {} mode overlays",
        table.consonants.len(),
        table.vowels.len(),
        table.symbols.len(),
        table.modes.len()
    );
}
