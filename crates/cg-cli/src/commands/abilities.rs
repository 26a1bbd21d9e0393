use cg_mechanics::abilities::parse_sort_order;
use cg_mechanics::{Ability, AbilityRequest, AbilityScores, RollingOption};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

/// Ability flags collected from the command line.
pub struct AbilityArgs {
    pub method: String,
    pub order: Option<String>,
    pub level: Vec<String>,
    pub bonus: Vec<String>,
    pub monster: bool,
    pub ctx_ref: String,
}

/// Parse repeated `CODE=N` flags into one record, summing repeats.
fn parse_bonuses(entries: &[String]) -> Result<AbilityScores, String> {
    let mut scores = AbilityScores::default();
    for entry in entries {
        let (code, amount) = entry
            .split_once('=')
            .ok_or_else(|| format!("expected CODE=N, got '{entry}'"))?;
        let ability = code.parse::<Ability>().map_err(|e| e.to_string())?;
        let amount: i32 = amount
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number in '{entry}'", amount.trim()))?;
        scores[ability] = scores[ability].saturating_add(amount);
    }
    Ok(scores)
}

pub fn run(args: &AbilityArgs, seed: Option<u64>, audit: bool, json: bool) -> Result<(), String> {
    let rolling_option = args
        .method
        .parse::<RollingOption>()
        .map_err(|e| e.to_string())?;
    let sort_order = match &args.order {
        Some(order) => parse_sort_order(order).map_err(|e| e.to_string())?,
        None => Ability::ALL,
    };

    let request = AbilityRequest {
        rolling_option,
        sort_order,
        level_change_increase: parse_bonuses(&args.level)?,
        additional_bonus: parse_bonuses(&args.bonus)?,
        ctx_ref: args.ctx_ref.clone(),
        is_monster_or_god: args.monster,
    };

    let array = super::roller(seed, audit)
        .ability_array(&request)
        .map_err(|e| e.to_string())?;

    if json {
        return super::print_json(&array);
    }

    let raw: Vec<String> = array.raw().iter().map(i32::to_string).collect();
    println!(
        "  {} {}",
        "Abilities".bold(),
        format!("({}, ceiling {})", array.rolling_option(), array.ceiling()).dimmed()
    );
    println!("  Raw: [{}]", raw.join(", "));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ability", "Base", "Level", "Bonus", "Score", "Modifier"]);

    for ability in array.sort_order() {
        let ability = *ability;
        table.add_row(vec![
            ability.as_str().to_uppercase(),
            array.base()[ability].to_string(),
            array.level_change_increase()[ability].to_string(),
            array.additional_bonus()[ability].to_string(),
            array.score(ability).to_string(),
            super::signed(array.modifier(ability)),
        ]);
    }

    println!("{table}");
    Ok(())
}
