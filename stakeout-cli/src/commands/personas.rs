use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use stakeout_game::PERSONAS;

pub fn handle_personas() {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Personality"]);

    for (index, persona) in PERSONAS.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            persona.name.to_string(),
            persona.personality.to_string(),
        ]);
    }

    println!("{}", table);
}
